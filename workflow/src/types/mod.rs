pub mod id;

pub use id::{LeaveTypeId, PrincipalId, RequestId};
