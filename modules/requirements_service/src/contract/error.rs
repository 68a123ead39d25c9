//! Contract error types for requirements service
//!
//! These errors are transport-agnostic. The REST layer maps them to Problem Details.

use thiserror::Error;

/// Requirements service domain errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequirementsError {
    /// Resource not found or soft-deleted
    #[error("{resource} with id '{id}' was not found")]
    NotFound {
        /// Resource type (project, document, ...)
        resource: String,
        /// Resource identifier
        id: String,
    },

    /// Unique constraint would be violated
    #[error("{resource} already exists: {detail}")]
    Duplicate { resource: String, detail: String },

    /// One or more input rules failed
    #[error("Validation failed: {}", errors.join(", "))]
    Validation { errors: Vec<String> },

    #[error("Incorrect email or password")]
    InvalidCredentials,

    /// Too many failed logins inside the lockout window
    #[error("Too many login attempts. Try again later.")]
    TooManyAttempts {
        /// Seconds until the oldest counted attempt leaves the window
        retry_after_secs: u64,
    },

    #[error("Token has expired")]
    TokenExpired,

    #[error("Could not validate credentials")]
    InvalidToken,

    /// Caller does not own the resource
    #[error("Not authorized to perform this action")]
    Forbidden,

    #[error("Internal error")]
    Internal,
}

impl RequirementsError {
    pub fn not_found(resource: &str, id: impl ToString) -> Self {
        Self::NotFound {
            resource: resource.to_string(),
            id: id.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            errors: vec![message.into()],
        }
    }
}
