//! Account directory
//!
//! Registration, admin-managed CRUD over accounts, role changes and the
//! deletion cascade that releases a manager's stored images.

mod config;
mod service;

#[cfg(test)]
mod tests;

pub use config::AccountServiceConfig;
pub use service::AccountService;
