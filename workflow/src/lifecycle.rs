//! Leave request submission and review on top of the stores.

use crate::{
    error::WorkflowResult,
    leave_request::{LeaveRequest, LeaveRequestDraft, RequestFilter},
    principal::{Principal, Role},
    review::Decision,
    statistics::LeaveStatistics,
    store::{CatalogStore, RequestStore},
    time::Clock,
    types::RequestId,
};

#[derive(Clone)]
pub struct LeaveRequests<R, C> {
    requests: R,
    catalog: C,
    clock: Clock,
}

impl<R, C> LeaveRequests<R, C>
where
    R: RequestStore,
    C: CatalogStore,
{
    pub fn new(requests: R, catalog: C, clock: Clock) -> Self {
        Self {
            requests,
            catalog,
            clock,
        }
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Validates the draft against the live catalog and stores a new pending
    /// request for `principal`.
    pub async fn submit(
        &self,
        principal: &Principal,
        draft: &LeaveRequestDraft,
    ) -> WorkflowResult<LeaveRequest> {
        principal.require_role(Role::Employee, "apply for leave")?;
        let catalog = self.catalog.list_leave_types().await?;
        let request = LeaveRequest::create(
            principal,
            draft,
            &catalog,
            self.clock.today(),
            self.clock.now(),
        )?;
        let stored = self.requests.create_request(request).await?;
        log::info!(
            "leave request {} submitted by {} ({} day(s))",
            stored.id,
            stored.requester,
            stored.duration()
        );
        Ok(stored)
    }

    /// Approves or rejects a pending request. The store only accepts the
    /// change if nobody decided the request since it was fetched.
    pub async fn review(
        &self,
        principal: &Principal,
        id: &RequestId,
        decision: Decision,
    ) -> WorkflowResult<LeaveRequest> {
        principal.require_admin("review leave requests")?;
        let current = self.requests.get_request(id).await?;
        let decided = current.transition(principal, decision)?;
        self.requests
            .update_request_status(id, current.version, decided.status)
            .await
    }

    pub async fn list_for_requester(&self, identity: &str) -> WorkflowResult<Vec<LeaveRequest>> {
        self.requests
            .list_requests(&RequestFilter::for_requester(identity))
            .await
    }

    /// The signed-in principal's own requests.
    pub async fn history(&self, principal: &Principal) -> WorkflowResult<Vec<LeaveRequest>> {
        self.list_for_requester(&principal.identity).await
    }

    pub async fn list_all(&self, principal: &Principal) -> WorkflowResult<Vec<LeaveRequest>> {
        principal.require_admin("list all leave requests")?;
        self.requests.list_requests(&RequestFilter::all()).await
    }

    pub async fn list_pending(&self, principal: &Principal) -> WorkflowResult<Vec<LeaveRequest>> {
        principal.require_admin("list pending leave requests")?;
        self.requests.list_requests(&RequestFilter::pending()).await
    }

    pub async fn statistics(&self, principal: &Principal) -> WorkflowResult<LeaveStatistics> {
        principal.require_admin("view leave statistics")?;
        let catalog = self.catalog.list_leave_types().await?;
        self.requests.summarize(&catalog).await
    }
}
