//! # NexoStore Core
//!
//! Core business logic and domain layer for the NexoStore backend.
//! This crate contains domain entities, the authorization policy, business
//! services, repository and storage interfaces, and the error types that
//! form the foundation of the application architecture.

pub mod domain;
pub mod errors;
pub mod policy;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use policy::*;
pub use repositories::*;
pub use services::*;
