//! Token service module for JWT management
//!
//! Issues and verifies the HS256 access tokens that carry the caller
//! identity (`sub`, `email`, `role`).

mod config;
mod service;


pub use config::TokenServiceConfig;
pub use service::TokenService;
