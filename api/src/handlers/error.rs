//! Mapping of domain and request errors onto HTTP responses
//!
//! Every failure leaves the API as an [`ErrorResponse`] body with a stable
//! error code. Internal errors are logged in full and returned opaque.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use nexo_core::errors::{AuthError, DomainError, StorageError, TokenError};
use nexo_shared::errors::{error_codes, ErrorResponse};
use nexo_shared::utils::validation::ValidationErrors;

/// Error type returned by every handler
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Request shape rejected before reaching a service
    #[error("{0}")]
    BadRequest(String),

    /// DTO validation failures
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    PayloadTooLarge(String),
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut converted = ValidationErrors::new();
        for (field, failures) in errors.field_errors() {
            for failure in failures {
                let message = failure
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                converted.add_error(field.to_string(), message, failure.code.to_string());
            }
        }
        ApiError::Validation(converted)
    }
}

impl ApiError {
    fn body(&self) -> ErrorResponse {
        match self {
            ApiError::Domain(error) => domain_body(error),
            ApiError::BadRequest(message) => ErrorResponse::new(error_codes::BAD_REQUEST, message),
            ApiError::Validation(errors) => ErrorResponse::validation(errors),
            ApiError::Unauthorized(message) => ErrorResponse::new(error_codes::UNAUTHORIZED, message),
            ApiError::PayloadTooLarge(message) => {
                ErrorResponse::new(error_codes::PAYLOAD_TOO_LARGE, message)
            }
        }
    }
}

fn domain_body(error: &DomainError) -> ErrorResponse {
    match error {
        DomainError::Validation(errors) => ErrorResponse::validation(errors),
        DomainError::NotFound { .. } => ErrorResponse::new(error_codes::NOT_FOUND, error.to_string()),
        DomainError::Forbidden { reason } => ErrorResponse::new(error_codes::FORBIDDEN, reason),
        DomainError::Conflict { message } => ErrorResponse::new(error_codes::CONFLICT, message),
        DomainError::Unauthorized => {
            ErrorResponse::new(error_codes::UNAUTHORIZED, "Authentication required")
        }
        DomainError::Auth(AuthError::InvalidCredentials) => {
            ErrorResponse::new(error_codes::INVALID_CREDENTIALS, "Invalid credentials")
        }
        DomainError::Auth(auth) => ErrorResponse::new(error_codes::UNAUTHORIZED, auth.to_string()),
        DomainError::Token(TokenError::TokenExpired) => {
            ErrorResponse::new(error_codes::TOKEN_EXPIRED, "Token has expired")
        }
        DomainError::Token(token) => ErrorResponse::new(error_codes::TOKEN_INVALID, token.to_string()),
        DomainError::Storage(StorageError::NotConfigured(_)) | DomainError::Internal { .. } => {
            ErrorResponse::new(error_codes::INTERNAL_ERROR, "An internal error occurred")
        }
        DomainError::Storage(storage) => {
            ErrorResponse::new(error_codes::STORAGE_ERROR, storage.to_string())
        }
    }
}

fn domain_status(error: &DomainError) -> StatusCode {
    match error {
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Forbidden { .. } => StatusCode::FORBIDDEN,
        DomainError::Conflict { .. } => StatusCode::CONFLICT,
        DomainError::Unauthorized | DomainError::Auth(_) | DomainError::Token(_) => {
            StatusCode::UNAUTHORIZED
        }
        DomainError::Storage(StorageError::NotConfigured(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        DomainError::Storage(_) => StatusCode::BAD_GATEWAY,
        DomainError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Domain(error) => domain_status(error),
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("Request failed: {}", self);
        } else {
            log::debug!("Request rejected ({}): {}", status.as_u16(), self);
        }
        HttpResponse::build(status).json(self.body())
    }
}

/// Result type used by route handlers
pub type ApiResult<T> = Result<T, ApiError>;
