//! Session error type definitions

use thiserror::Error;

/// Authentication / session errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Credential rejected by the identity provider in a way attributable to
    /// a single form field. Propagated unmodified so a UI can attach the
    /// message to that field.
    #[error("Validation failed for field '{field}': {message}")]
    FieldValidation { field: String, message: String },

    /// Any other failure from the identity provider; shown as a form-level
    /// status message.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Directory lookup miss. Expected case distinguishing an existing user
    /// from a first-time identity; handled internally by reconciliation.
    #[error("User not found")]
    NotFound,

    /// Current user requested while no user is resolved
    #[error("Unauthenticated")]
    Unauthenticated,

    /// Transport or decode failure talking to an external service
    #[error("Provider error: {0}")]
    Provider(String),
}

impl AuthError {
    /// Stable error code for programmatic dispatch
    pub fn error_code(&self) -> &str {
        match self {
            Self::FieldValidation { .. } => "field_validation",
            Self::Auth(_) => "auth_failed",
            Self::NotFound => "not_found",
            Self::Unauthenticated => "unauthenticated",
            Self::Provider(_) => "provider_error",
        }
    }

    /// Field-level validation error helper
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FieldValidation { field: field.into(), message: message.into() }
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        Self::Provider(err.to_string())
    }
}
