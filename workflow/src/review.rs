//! Review state machine shared by leave requests and account registrations.
//!
//! Both lifecycles start in a pending state and are decided exactly once by an
//! administrator. Decided states are terminal.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{WorkflowError, WorkflowResult};

/// An administrator's verdict on a pending item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    /// Wire value used by the review endpoints (`approve` / `reject`).
    pub fn as_action(&self) -> &'static str {
        match self {
            Decision::Approve => "approve",
            Decision::Reject => "reject",
        }
    }

    /// Past-tense verb used in notifications.
    pub fn past_tense(&self) -> &'static str {
        match self {
            Decision::Approve => "approved",
            Decision::Reject => "rejected",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_action())
    }
}

/// A status enum driven by the review state machine.
pub trait ReviewStatus: Copy + Eq + fmt::Debug {
    /// Status every reviewable item starts in.
    const PENDING: Self;

    /// Status reached by applying `decision` to a pending item.
    fn decided(decision: Decision) -> Self;

    /// Human-readable name of the reviewed entity, used in error messages.
    fn subject() -> &'static str;

    fn is_pending(&self) -> bool {
        *self == Self::PENDING
    }

    fn is_final(&self) -> bool {
        !self.is_pending()
    }
}

/// Applies `decision` to `current`, failing when the item was already decided.
pub fn review<S: ReviewStatus>(current: S, decision: Decision) -> WorkflowResult<S> {
    if current.is_final() {
        return Err(WorkflowError::State(format!(
            "{} has already been finalized ({:?})",
            S::subject(),
            current
        )));
    }
    Ok(S::decided(decision))
}
