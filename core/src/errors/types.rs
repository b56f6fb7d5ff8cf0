//! Error types for authentication, tokens and object storage

use thiserror::Error;

/// Authentication-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown email or wrong password; deliberately indistinguishable
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Token is valid but the account behind it no longer exists
    #[error("Account no longer exists")]
    AccountUnavailable,

    #[error("Missing bearer token")]
    MissingToken,
}

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token format")]
    InvalidTokenFormat,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Invalid claims")]
    InvalidClaims,

    #[error("Token generation failed")]
    TokenGenerationFailed,
}

/// Object storage failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Object storage is not configured: {0}")]
    NotConfigured(String),

    #[error("Object storage rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Cannot resolve a storage key from URL: {url}")]
    InvalidUrl { url: String },

    #[error("Object storage request failed: {0}")]
    Transport(String),
}
