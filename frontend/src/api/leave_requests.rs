use leavedesk_workflow::{LeaveStatistics, WorkflowResult};
use reqwest::Method;

use super::{
    client::{ApiClient, Auth},
    types::{
        ApiMessage, ApplyLeaveRequest, LeaveHistoryResponse, LeaveRequestRecord,
        ReviewLeaveRequest,
    },
};

impl ApiClient {
    pub async fn apply_leave(&self, request: &ApplyLeaveRequest) -> WorkflowResult<ApiMessage> {
        self.send_for_message(
            Method::POST,
            "/api/employee/apply-leave",
            Some(request),
            Auth::Current,
        )
        .await
    }

    pub async fn leave_history(&self) -> WorkflowResult<Vec<LeaveRequestRecord>> {
        let response: LeaveHistoryResponse = self
            .get_json("/api/employee/leave-history", Auth::Current)
            .await?;
        Ok(response.leave_history)
    }

    pub async fn admin_leave_requests(&self) -> WorkflowResult<Vec<LeaveRequestRecord>> {
        self.get_json("/api/admin/leave-requests", Auth::Current)
            .await
    }

    pub async fn review_leave(&self, review: &ReviewLeaveRequest) -> WorkflowResult<ApiMessage> {
        self.send_for_message(
            Method::POST,
            "/api/admin/review-leave",
            Some(review),
            Auth::Current,
        )
        .await
    }

    pub async fn leave_stats(&self) -> WorkflowResult<LeaveStatistics> {
        self.get_json("/api/admin/leave-stats", Auth::Current).await
    }
}
