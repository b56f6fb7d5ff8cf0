use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};

use super::keys::object_key_from_url;
use crate::errors::StorageError;

/// File received from a client, ready to be stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub original_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(
        original_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            original_name: original_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

/// Result of one successful upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedImage {
    #[serde(rename = "originalname")]
    pub original_name: String,
    #[serde(rename = "publicUrl")]
    pub public_url: String,
}

/// Object storage for product images
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store a file under a fresh unique key and return its public URL
    ///
    /// Fails with [`StorageError`] when the gateway is misconfigured or the
    /// backend rejects the write. Never returns a malformed URL.
    async fn upload(&self, file: ImageUpload) -> Result<String, StorageError>;

    /// Delete the object behind `url`
    ///
    /// The key is the final path segment of the URL. A missing object counts
    /// as deleted.
    async fn delete(&self, url: &str) -> Result<(), StorageError>;

    /// Best-effort batch delete
    ///
    /// URLs without a resolvable key are skipped with a warning. The
    /// remaining deletions run concurrently; the first failure is returned
    /// after all of them have settled.
    async fn delete_many(&self, urls: &[String]) -> Result<(), StorageError> {
        let deletions = urls.iter().filter_map(|url| {
            if object_key_from_url(url).is_none() {
                tracing::warn!(url = %url, "Skipping image URL without a storage key");
                return None;
            }
            Some(self.delete(url))
        });

        join_all(deletions)
            .await
            .into_iter()
            .collect::<Result<Vec<()>, StorageError>>()
            .map(|_| ())
    }
}
