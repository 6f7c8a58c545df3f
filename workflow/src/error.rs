use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A single rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("validation failed: {}", join_fields(.0))]
    Validation(Vec<FieldError>),
    #[error("not authorized: {0}")]
    Authorization(String),
    #[error("invalid state: {0}")]
    State(String),
    #[error("authentication failed: {0}")]
    Authentication(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("network error: {0}")]
    Network(String),
}

fn join_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;

impl WorkflowError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        WorkflowError::Validation(vec![FieldError::new(field, message)])
    }

    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            WorkflowError::Validation(fields) => fields,
            _ => &[],
        }
    }

    /// Whether the user can fix the problem and resubmit the same action.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            WorkflowError::Validation(_) | WorkflowError::Network(_)
        )
    }

    /// Whether the caller must send the user back to the login screen.
    pub fn requires_login(&self) -> bool {
        matches!(self, WorkflowError::Authentication(_))
    }

    /// Whether the entity shown to the user is stale and must be fetched again.
    pub fn requires_refetch(&self) -> bool {
        matches!(self, WorkflowError::State(_) | WorkflowError::NotFound(_))
    }

    /// Text suitable for a toast notification.
    pub fn user_message(&self) -> String {
        match self {
            WorkflowError::Validation(fields) => fields
                .first()
                .map(|f| f.message.clone())
                .unwrap_or_else(|| "Please check your inputs.".to_string()),
            WorkflowError::Authorization(msg)
            | WorkflowError::State(msg)
            | WorkflowError::Authentication(msg)
            | WorkflowError::NotFound(msg) => msg.clone(),
            WorkflowError::Network(_) => {
                "No response from server. Please check your internet connection.".to_string()
            }
        }
    }
}

impl From<validator::ValidationErrors> for WorkflowError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    FieldError::new(field.to_string(), message)
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        WorkflowError::Validation(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 2, message = "Minimum 2 characters"))]
        name: String,
    }

    #[test]
    fn validator_errors_keep_field_and_message() {
        let err: WorkflowError = Sample { name: "x".into() }.validate().unwrap_err().into();
        assert_eq!(
            err.field_errors(),
            &[FieldError::new("name", "Minimum 2 characters")]
        );
        assert_eq!(err.user_message(), "Minimum 2 characters");
    }

    #[test]
    fn display_joins_field_errors() {
        let err = WorkflowError::Validation(vec![
            FieldError::new("start_date", "required"),
            FieldError::new("end_date", "required"),
        ]);
        assert_eq!(
            err.to_string(),
            "validation failed: start_date: required, end_date: required"
        );
    }

    #[test]
    fn classification_helpers() {
        assert!(WorkflowError::validation("name", "bad").is_recoverable());
        assert!(WorkflowError::Network("timeout".into()).is_recoverable());
        assert!(!WorkflowError::Authorization("no".into()).is_recoverable());
        assert!(WorkflowError::Authentication("expired".into()).requires_login());
        assert!(WorkflowError::State("finalized".into()).requires_refetch());
        assert!(WorkflowError::Network("x".into())
            .user_message()
            .contains("internet connection"));
    }
}
