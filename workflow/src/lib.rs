//! Leave management workflow: the leave request lifecycle, the leave type
//! catalog and the session/identity rules shared by every client.
//!
//! Persistence sits behind the traits in [`store`]; the services in
//! [`lifecycle`], [`catalog`] and [`accounts`] enforce roles and state
//! transitions on top of them.

pub mod accounts;
pub mod catalog;
pub mod error;
pub mod leave_request;
pub mod leave_type;
pub mod lifecycle;
pub mod principal;
pub mod review;
pub mod session;
pub mod statistics;
pub mod store;
pub mod time;
pub mod types;
pub mod workspace;

pub use accounts::Accounts;
pub use catalog::LeaveCatalog;
pub use error::{FieldError, WorkflowError, WorkflowResult};
pub use leave_request::{LeaveRequest, LeaveRequestDraft, RequestFilter, RequestStatus};
pub use leave_type::{LeaveType, LeaveTypeDraft};
pub use lifecycle::LeaveRequests;
pub use principal::{AccountStatus, PendingPrincipal, Principal, Registration, Role};
pub use review::Decision;
pub use session::{AuthGrant, Session, SessionPolicy};
pub use statistics::LeaveStatistics;
pub use time::Clock;
pub use types::{LeaveTypeId, PrincipalId, RequestId};
pub use workspace::{Section, Workspace};
