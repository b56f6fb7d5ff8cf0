//! Database module - MySQL implementations using SQLx
//!
//! Connection pool management, the embedded migrations and the repository
//! implementations for accounts and products.

pub mod connection;
pub mod mysql;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use connection::{DatabasePool, PoolStatistics};
pub use mysql::{MySqlProductRepository, MySqlUserRepository};
