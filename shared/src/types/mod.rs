//! Type definitions shared by the API layer
//!
//! - `response` - confirmation messages and health checks

pub mod response;

pub use response::{HealthResponse, HealthStatus, MessageResponse};
