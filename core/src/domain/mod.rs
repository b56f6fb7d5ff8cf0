//! Domain layer containing business entities and request-scoped identities.

pub mod entities;

// Re-export commonly used domain types
pub use entities::*;
