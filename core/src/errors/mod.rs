//! Domain-specific error types and error handling.

mod types;


// Re-export all error types
pub use types::{AuthError, StorageError, TokenError};

use std::fmt::Display;

use nexo_shared::utils::validation::ValidationErrors;
use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    /// Malformed input, rejected before any side effect
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("{entity} with ID \"{id}\" not found")]
    NotFound { entity: &'static str, id: String },

    /// Authorization policy denial
    #[error("{reason}")]
    Forbidden { reason: String },

    #[error("{message}")]
    Conflict { message: String },

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl Display) -> Self {
        DomainError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        DomainError::Forbidden {
            reason: reason.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        DomainError::Internal {
            message: message.into(),
        }
    }

    /// Single-field validation failure
    pub fn invalid(field: &str, message: impl Into<String>, code: &str) -> Self {
        DomainError::Validation(ValidationErrors::single(field, message, code))
    }
}

impl From<ValidationErrors> for DomainError {
    fn from(errors: ValidationErrors) -> Self {
        DomainError::Validation(errors)
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
