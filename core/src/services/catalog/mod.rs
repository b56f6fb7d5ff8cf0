//! Catalog module
//!
//! `CatalogService` owns product persistence and ownership checks.
//! `ProductWorkflow` wraps it with the two-phase "upload images, then
//! persist" flow and the compensating cleanup of uploaded objects.

mod config;
mod service;
mod workflow;


pub use config::CatalogConfig;
pub use service::CatalogService;
pub use workflow::{ProductWorkflow, PublishRequest, ReviseRequest};
