use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    error::{WorkflowError, WorkflowResult},
    types::LeaveTypeId,
};

/// An administrator-defined category of leave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveType {
    pub id: LeaveTypeId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Name and description submitted by the leave type form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct LeaveTypeDraft {
    #[validate(length(min = 2, message = "Name is required (minimum 2 characters)"))]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl LeaveTypeDraft {
    /// Normalizes and validates raw form values.
    pub fn new(name: &str, description: Option<&str>) -> WorkflowResult<Self> {
        let draft = Self {
            name: name.trim().to_string(),
            description: description
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
        };
        draft.validate()?;
        Ok(draft)
    }

    pub fn into_leave_type(self, id: LeaveTypeId) -> LeaveType {
        LeaveType {
            id,
            name: self.name,
            description: self.description,
        }
    }
}

impl LeaveType {
    pub fn apply(&self, draft: LeaveTypeDraft) -> LeaveType {
        draft.into_leave_type(self.id.clone())
    }
}

/// Finds `id` in a catalog snapshot.
pub fn resolve<'a>(catalog: &'a [LeaveType], id: &LeaveTypeId) -> WorkflowResult<&'a LeaveType> {
    catalog
        .iter()
        .find(|lt| &lt.id == id)
        .ok_or_else(|| WorkflowError::NotFound(format!("Leave type {} not found", id)))
}

/// Finds a leave type by display name, ignoring case.
pub fn lookup_by_name<'a>(catalog: &'a [LeaveType], name: &str) -> Option<&'a LeaveType> {
    let name = name.trim();
    catalog.iter().find(|lt| lt.name.eq_ignore_ascii_case(name))
}
