//! Collaborator interfaces the workflow persists through.
//!
//! Implementations live next to their transport: in-memory versions in
//! [`memory`], HTTP versions in the frontend crate.

pub mod memory;

use crate::{
    error::WorkflowResult,
    leave_request::{LeaveRequest, RequestFilter, RequestStatus},
    leave_type::{LeaveType, LeaveTypeDraft},
    principal::{PendingPrincipal, Registration},
    review::Decision,
    session::{AuthGrant, Session},
    statistics::LeaveStatistics,
    types::{LeaveTypeId, PrincipalId, RequestId},
};

pub use memory::{MemoryCatalogStore, MemoryDirectory, MemoryRequestStore};

/// Persistence for leave requests.
#[allow(async_fn_in_trait)]
pub trait RequestStore {
    async fn create_request(&self, request: LeaveRequest) -> WorkflowResult<LeaveRequest>;

    async fn get_request(&self, id: &RequestId) -> WorkflowResult<LeaveRequest>;

    async fn list_requests(&self, filter: &RequestFilter) -> WorkflowResult<Vec<LeaveRequest>>;

    /// Sets `status` only if the stored request is still pending at
    /// `expected_version`; otherwise fails with a state error.
    async fn update_request_status(
        &self,
        id: &RequestId,
        expected_version: u64,
        status: RequestStatus,
    ) -> WorkflowResult<LeaveRequest>;

    /// Counters over every stored request. Stores backed by a server-side
    /// summary override this.
    async fn summarize(&self, catalog: &[LeaveType]) -> WorkflowResult<LeaveStatistics> {
        let requests = self.list_requests(&RequestFilter::all()).await?;
        Ok(LeaveStatistics::from_requests(&requests, catalog))
    }
}

/// Persistence for the leave type catalog.
#[allow(async_fn_in_trait)]
pub trait CatalogStore {
    async fn list_leave_types(&self) -> WorkflowResult<Vec<LeaveType>>;

    async fn create_leave_type(&self, draft: LeaveTypeDraft) -> WorkflowResult<LeaveType>;

    async fn update_leave_type(
        &self,
        id: &LeaveTypeId,
        draft: LeaveTypeDraft,
    ) -> WorkflowResult<LeaveType>;

    async fn delete_leave_type(&self, id: &LeaveTypeId) -> WorkflowResult<()>;
}

/// Credential checks and the account approval queue.
#[allow(async_fn_in_trait)]
pub trait AuthService {
    async fn authenticate(&self, identity: &str, secret: &str) -> WorkflowResult<AuthGrant>;

    async fn register(&self, registration: &Registration) -> WorkflowResult<PendingPrincipal>;

    async fn logout(&self, session: &Session) -> WorkflowResult<()>;

    async fn list_pending_principals(&self) -> WorkflowResult<Vec<PendingPrincipal>>;

    async fn review_principal(&self, id: &PrincipalId, decision: Decision) -> WorkflowResult<()>;
}
