//! # Framework Errors
//!
//! Common error types shared by every resource screen. Transport failures live
//! in [`crate::api::ApiError`]; the types here cover field bindings and the
//! manager's own state machine.

/// Errors raised while binding an input value to a draft field.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldError {
    #[error("Unknown field: {0}")]
    UnknownField(String),
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl FieldError {
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        FieldError::InvalidValue {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors that can occur within the console framework itself.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FrameworkError {
    #[error("Manager closed")]
    ManagerClosed,
    #[error("Manager dropped response channel")]
    ManagerDropped,
    #[error("Record not found on the current page: {0}")]
    NotFound(String),
    #[error("Form is not open")]
    FormClosed,
    #[error("A save is already in progress")]
    SubmitInFlight,
    #[error("No delete is awaiting confirmation")]
    NothingToConfirm,
    #[error("A delete is already in progress")]
    DeleteInFlight,
    #[error(transparent)]
    Field(#[from] FieldError),
}
