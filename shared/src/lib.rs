//! Shared utilities and common types for NexoStore server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types read once from the process environment
//! - Error codes and response structures
//! - Validation error collections

pub mod config;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, CorsConfig, DatabaseConfig, Environment, JwtConfig, LoggingConfig,
    PasswordConfig, ServerConfig, StorageConfig, SuperAdminConfig,
};
pub use errors::{error_codes, ErrorResponse};
pub use types::{HealthResponse, MessageResponse};
pub use utils::validation;
