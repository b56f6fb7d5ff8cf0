//! Supabase Storage implementation of `ObjectStorage`
//!
//! Objects are written to `{base}/storage/v1/object/{bucket}/{key}` and
//! served from `{base}/storage/v1/object/public/{bucket}/{key}`. The service
//! role key authenticates every call.

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

use nexo_core::errors::StorageError;
use nexo_core::services::storage::{
    generate_object_key, object_key_from_url, ImageUpload, ObjectStorage,
};
use nexo_shared::config::StorageConfig;

use crate::InfrastructureError;

#[derive(Debug, Clone)]
struct Credentials {
    base_url: String,
    service_role_key: String,
}

/// Error body returned by the storage API
#[derive(Debug, Deserialize)]
struct StorageApiError {
    #[serde(default, alias = "statusCode")]
    status_code: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Supabase Storage client
#[derive(Clone)]
pub struct SupabaseStorage {
    client: Client,
    credentials: Credentials,
    bucket: String,
}

impl SupabaseStorage {
    /// Build the client; a missing project URL or service key is a
    /// configuration error
    pub fn new(config: &StorageConfig) -> Result<Self, InfrastructureError> {
        let credentials = match (&config.base_url, &config.service_role_key) {
            (Some(base_url), Some(key)) => Credentials {
                base_url: base_url.trim_end_matches('/').to_string(),
                service_role_key: key.clone(),
            },
            _ => {
                return Err(InfrastructureError::Config(
                    "Supabase URL or Service Role Key is not configured".to_string(),
                ))
            }
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .build()?;

        info!(bucket = %config.bucket, "Supabase storage client initialized");

        Ok(Self {
            client,
            credentials,
            bucket: config.bucket.clone(),
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Public address of an object key
    pub fn public_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.credentials.base_url, self.bucket, key
        )
    }

    fn bucket_url(&self) -> String {
        format!("{}/storage/v1/object/{}", self.credentials.base_url, self.bucket)
    }

    /// Remove keys in one request; the API ignores keys that do not exist
    async fn remove(&self, keys: &[&str]) -> Result<(), StorageError> {
        let credentials = &self.credentials;

        let response = self
            .client
            .delete(self.bucket_url())
            .bearer_auth(&credentials.service_role_key)
            .header("apikey", &credentials.service_role_key)
            .json(&serde_json::json!({ "prefixes": keys }))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status.is_success() {
            debug!(count = keys.len(), "Storage objects removed");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        if is_missing_object(status, &body) {
            warn!(keys = ?keys, "Storage objects already gone, skipping deletion");
            return Ok(());
        }
        Err(rejection(status, &body))
    }
}

#[async_trait]
impl ObjectStorage for SupabaseStorage {
    async fn upload(&self, file: ImageUpload) -> Result<String, StorageError> {
        let credentials = &self.credentials;
        let key = generate_object_key(&file.original_name);
        let size = file.bytes.len();

        let response = self
            .client
            .post(format!("{}/{}", self.bucket_url(), key))
            .bearer_auth(&credentials.service_role_key)
            .header("apikey", &credentials.service_role_key)
            .header(header::CONTENT_TYPE, &file.content_type)
            .header("x-upsert", "false")
            .body(file.bytes)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                original_name = %file.original_name,
                status = status.as_u16(),
                "Upload rejected by storage"
            );
            return Err(rejection(status, &body));
        }

        debug!(key = %key, size, "Image uploaded");
        Ok(self.public_url(&key))
    }

    async fn delete(&self, url: &str) -> Result<(), StorageError> {
        let key = object_key_from_url(url).ok_or_else(|| StorageError::InvalidUrl {
            url: url.to_string(),
        })?;
        self.remove(&[key]).await
    }

    async fn delete_many(&self, urls: &[String]) -> Result<(), StorageError> {
        let keys: Vec<&str> = urls
            .iter()
            .filter_map(|url| {
                let key = object_key_from_url(url);
                if key.is_none() {
                    warn!(url = %url, "Skipping image URL without a storage key");
                }
                key
            })
            .collect();

        if keys.is_empty() {
            return Ok(());
        }
        self.remove(&keys).await
    }
}

fn transport_error(error: reqwest::Error) -> StorageError {
    StorageError::Transport(error.to_string())
}

/// 404s and `not_found` bodies mean the object is already gone
pub(crate) fn is_missing_object(status: StatusCode, body: &str) -> bool {
    if status == StatusCode::NOT_FOUND {
        return true;
    }
    match serde_json::from_str::<StorageApiError>(body) {
        Ok(api) => {
            api.status_code.as_deref() == Some("404")
                || api
                    .error
                    .as_deref()
                    .map(|e| e.eq_ignore_ascii_case("not_found"))
                    .unwrap_or(false)
        }
        Err(_) => false,
    }
}

/// Map a non-success response to a storage error with the API's message
pub(crate) fn rejection(status: StatusCode, body: &str) -> StorageError {
    let message = serde_json::from_str::<StorageApiError>(body)
        .ok()
        .and_then(|api| api.message.or(api.error))
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("Unknown error").to_string()
            } else {
                body.trim().to_string()
            }
        });

    StorageError::Rejected {
        status: status.as_u16(),
        message,
    }
}
