use leavedesk_workflow::{LeaveType, LeaveTypeDraft, LeaveTypeId, WorkflowResult};
use reqwest::Method;

use super::{
    client::{ApiClient, Auth},
    types::{ApiMessage, LeaveTypePayload, LeaveTypesResponse},
};

fn payload(draft: &LeaveTypeDraft) -> LeaveTypePayload {
    LeaveTypePayload {
        name: draft.name.clone(),
        description: draft.description.clone().unwrap_or_default(),
    }
}

impl ApiClient {
    pub async fn list_leave_types(&self) -> WorkflowResult<Vec<LeaveType>> {
        let response: LeaveTypesResponse =
            self.get_json("/api/leave-types", Auth::Anonymous).await?;
        Ok(response.leave_types)
    }

    pub async fn create_leave_type(&self, draft: &LeaveTypeDraft) -> WorkflowResult<ApiMessage> {
        self.send_for_message(
            Method::POST,
            "/api/admin/leave-types",
            Some(&payload(draft)),
            Auth::Current,
        )
        .await
    }

    pub async fn update_leave_type(
        &self,
        id: &LeaveTypeId,
        draft: &LeaveTypeDraft,
    ) -> WorkflowResult<ApiMessage> {
        self.send_for_message(
            Method::PUT,
            &format!("/api/admin/leave-types/{}", id),
            Some(&payload(draft)),
            Auth::Current,
        )
        .await
    }

    pub async fn delete_leave_type(&self, id: &LeaveTypeId) -> WorkflowResult<ApiMessage> {
        self.send_for_message::<()>(
            Method::DELETE,
            &format!("/api/admin/leave-types/{}", id),
            None,
            Auth::Current,
        )
        .await
    }
}
