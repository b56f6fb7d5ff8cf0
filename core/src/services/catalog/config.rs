//! Configuration for the catalog workflow

use nexo_shared::config::StorageConfig;

/// Limits applied to image uploads
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Maximum number of files in one upload
    pub max_files_per_upload: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            max_files_per_upload: 10,
        }
    }
}

impl From<&StorageConfig> for CatalogConfig {
    fn from(config: &StorageConfig) -> Self {
        Self {
            max_files_per_upload: config.max_files_per_upload,
        }
    }
}
