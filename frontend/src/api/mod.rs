mod auth;
pub mod client;
mod leave_requests;
mod leave_types;
pub mod types;

pub use client::*;
pub use types::*;
