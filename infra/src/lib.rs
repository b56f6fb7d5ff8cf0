//! # Infrastructure Layer
//!
//! Concrete implementations of the ports defined in `nexo_core`:
//!
//! - **Database**: MySQL repositories for accounts and products using SQLx,
//!   with embedded migrations
//! - **Storage**: Supabase Storage client for product images
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)

use nexo_core::errors::DomainError;
use nexo_shared::config::AppConfig;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Object storage module - Supabase Storage client
pub mod storage;

#[cfg(feature = "mysql")]
pub use database::{DatabasePool, MySqlProductRepository, MySqlUserRepository};
pub use storage::SupabaseStorage;

/// Infrastructure service container
#[cfg(feature = "mysql")]
#[derive(Clone)]
pub struct InfrastructureServices {
    pub database: DatabasePool,
    pub storage: SupabaseStorage,
}

#[cfg(feature = "mysql")]
impl InfrastructureServices {
    pub fn user_repository(&self) -> MySqlUserRepository {
        MySqlUserRepository::new(self.database.get_pool().clone())
    }

    pub fn product_repository(&self) -> MySqlProductRepository {
        MySqlProductRepository::new(self.database.get_pool().clone())
    }
}

/// Initialize infrastructure services
///
/// Connects and probes the database pool, applies migrations when enabled and builds
/// the storage client.
#[cfg(feature = "mysql")]
pub async fn initialize(config: &AppConfig) -> Result<InfrastructureServices, InfrastructureError> {
    tracing::info!("Initializing infrastructure services...");

    let database = DatabasePool::new(&config.database).await?;
    database.health_check().await?;
    if config.database.run_migrations {
        database.run_migrations().await?;
    }
    let storage = SupabaseStorage::new(&config.storage)?;

    tracing::info!("Infrastructure services initialized successfully");

    Ok(InfrastructureServices { database, storage })
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failure
    #[error("Migration error: {0}")]
    Migration(String),

    /// HTTP client error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(error: InfrastructureError) -> Self {
        DomainError::internal(error.to_string())
    }
}
