//! In-memory object storage for tests and local runs

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::keys::{generate_object_key, object_key_from_url};
use super::traits::{ImageUpload, ObjectStorage};
use crate::errors::StorageError;

const MOCK_BASE_URL: &str = "https://storage.nexostore.test/product-images";

/// Mock object storage
///
/// Keeps the set of stored URLs and the log of delete requests. Uploads of
/// selected file names and all deletes can be made to fail.
#[derive(Clone, Default)]
pub struct MockObjectStorage {
    stored: Arc<Mutex<Vec<String>>>,
    deleted: Arc<Mutex<Vec<String>>>,
    failing_uploads: Arc<Mutex<HashSet<String>>>,
    fail_deletes: Arc<AtomicBool>,
}

impl MockObjectStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the upload of any file named `original_name`
    pub async fn fail_upload_of(&self, original_name: &str) {
        self.failing_uploads.lock().await.insert(original_name.to_string());
    }

    /// Make every delete fail
    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Put an object in place as if it had been uploaded earlier
    pub async fn seed(&self, url: impl Into<String>) {
        self.stored.lock().await.push(url.into());
    }

    /// URLs currently stored
    pub async fn stored(&self) -> Vec<String> {
        self.stored.lock().await.clone()
    }

    /// Every URL a delete was requested for, in order
    pub async fn deleted(&self) -> Vec<String> {
        self.deleted.lock().await.clone()
    }

    pub async fn contains(&self, url: &str) -> bool {
        self.stored.lock().await.iter().any(|stored| stored == url)
    }
}

#[async_trait]
impl ObjectStorage for MockObjectStorage {
    async fn upload(&self, file: ImageUpload) -> Result<String, StorageError> {
        if self.failing_uploads.lock().await.contains(&file.original_name) {
            return Err(StorageError::Rejected {
                status: 500,
                message: format!("Upload of {} rejected", file.original_name),
            });
        }

        let url = format!("{}/{}", MOCK_BASE_URL, generate_object_key(&file.original_name));
        self.stored.lock().await.push(url.clone());
        Ok(url)
    }

    async fn delete(&self, url: &str) -> Result<(), StorageError> {
        self.deleted.lock().await.push(url.to_string());

        if object_key_from_url(url).is_none() {
            return Err(StorageError::InvalidUrl {
                url: url.to_string(),
            });
        }
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StorageError::Transport("Simulated storage outage".to_string()));
        }

        // Missing objects count as deleted.
        self.stored.lock().await.retain(|stored| stored != url);
        Ok(())
    }
}
