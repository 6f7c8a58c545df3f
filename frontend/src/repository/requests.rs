use leavedesk_workflow::{
    store::RequestStore, Decision, LeaveRequest, LeaveStatistics, LeaveType, Principal,
    RequestFilter, RequestId, RequestStatus, WorkflowError, WorkflowResult,
};
use std::rc::Rc;

use crate::api::{ApiClient, ApplyLeaveRequest, ReviewLeaveRequest};

/// Leave requests as seen by the signed-in principal: administrators read
/// the full listing, employees their own history.
#[derive(Clone)]
pub struct HttpRequestStore {
    client: Rc<ApiClient>,
}

impl HttpRequestStore {
    pub fn new(client: Rc<ApiClient>) -> Self {
        Self { client }
    }

    fn principal(&self) -> WorkflowResult<Principal> {
        self.client
            .sessions()
            .current()
            .map(|session| session.principal)
            .ok_or_else(|| WorkflowError::Authentication("Please log in to continue".to_string()))
    }

    async fn fetch_visible(&self) -> WorkflowResult<Vec<LeaveRequest>> {
        let principal = self.principal()?;
        let records = if principal.is_admin() {
            self.client.admin_leave_requests().await?
        } else {
            self.client.leave_history().await?
        };
        let catalog = self.client.list_leave_types().await?;
        Ok(records
            .into_iter()
            .map(|record| record.into_leave_request(&principal.identity, &catalog))
            .collect())
    }
}

impl RequestStore for HttpRequestStore {
    // The backend assigns the id; the stored request is read back from the
    // requester's history. An unconfirmed submission is an error since the
    // local id is unknown to the backend.
    async fn create_request(&self, request: LeaveRequest) -> WorkflowResult<LeaveRequest> {
        self.client
            .apply_leave(&ApplyLeaveRequest {
                leave_type_id: request.leave_type_id.clone(),
                start_date: request.start_date,
                end_date: request.end_date,
            })
            .await?;
        let stored = self
            .fetch_visible()
            .await?
            .into_iter()
            .filter(|r| {
                r.is_pending()
                    && r.leave_type_id == request.leave_type_id
                    && r.start_date == request.start_date
                    && r.end_date == request.end_date
            })
            .max_by_key(|r| r.created_at);
        stored.ok_or_else(|| {
            log::warn!(
                "submitted leave request for {} not found in history",
                request.requester
            );
            WorkflowError::State(
                "Leave request was submitted but could not be confirmed, please refresh"
                    .to_string(),
            )
        })
    }

    async fn get_request(&self, id: &RequestId) -> WorkflowResult<LeaveRequest> {
        self.fetch_visible()
            .await?
            .into_iter()
            .find(|r| &r.id == id)
            .ok_or_else(|| WorkflowError::NotFound("Leave request not found".to_string()))
    }

    async fn list_requests(&self, filter: &RequestFilter) -> WorkflowResult<Vec<LeaveRequest>> {
        let visible = self.fetch_visible().await?;
        Ok(filter.apply(visible.iter()))
    }

    async fn update_request_status(
        &self,
        id: &RequestId,
        expected_version: u64,
        status: RequestStatus,
    ) -> WorkflowResult<LeaveRequest> {
        let action = match status {
            RequestStatus::Approved => Decision::Approve,
            RequestStatus::Rejected => Decision::Reject,
            RequestStatus::Pending => {
                return Err(WorkflowError::State(
                    "A decided leave request cannot return to pending".to_string(),
                ))
            }
        };
        let current = self.get_request(id).await?;
        self.client
            .review_leave(&ReviewLeaveRequest {
                leave_request_id: id.clone(),
                action,
                expected_status: RequestStatus::Pending,
                expected_version,
            })
            .await?;
        Ok(LeaveRequest {
            status,
            version: expected_version + 1,
            ..current
        })
    }

    // The backend counts per leave type itself.
    async fn summarize(&self, _catalog: &[LeaveType]) -> WorkflowResult<LeaveStatistics> {
        self.client.leave_stats().await
    }
}
