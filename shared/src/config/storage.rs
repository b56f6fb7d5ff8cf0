//! Object storage configuration

use serde::{Deserialize, Serialize};

use super::{env_non_empty, env_or};

/// Supabase Storage settings for product images
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`
    pub base_url: Option<String>,

    /// Service role key used as bearer token
    #[serde(skip_serializing)]
    pub service_role_key: Option<String>,

    /// Bucket holding product images
    pub bucket: String,

    /// Maximum accepted size of a single uploaded file
    pub max_file_size_bytes: usize,

    /// Maximum number of files accepted by one upload request
    pub max_files_per_upload: usize,

    /// HTTP timeout for storage calls in seconds
    pub request_timeout: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            service_role_key: None,
            bucket: String::from("product-images"),
            max_file_size_bytes: 5 * 1024 * 1024,
            max_files_per_upload: 10,
            request_timeout: 30,
        }
    }
}

impl StorageConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: env_non_empty("SUPABASE_URL"),
            service_role_key: env_non_empty("SUPABASE_SERVICE_ROLE_KEY"),
            bucket: env_non_empty("STORAGE_BUCKET").unwrap_or(defaults.bucket),
            max_file_size_bytes: env_or("STORAGE_MAX_FILE_SIZE_BYTES", defaults.max_file_size_bytes),
            max_files_per_upload: env_or("STORAGE_MAX_FILES", defaults.max_files_per_upload),
            request_timeout: env_or("STORAGE_TIMEOUT", defaults.request_timeout),
        }
    }

    pub fn new(base_url: impl Into<String>, service_role_key: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            service_role_key: Some(service_role_key.into()),
            ..Default::default()
        }
    }

    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }

    /// Both the project URL and the service key are present
    pub fn is_configured(&self) -> bool {
        self.base_url.is_some() && self.service_role_key.is_some()
    }
}
