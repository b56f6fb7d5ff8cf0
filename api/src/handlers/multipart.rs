//! Buffered reading of `multipart/form-data` bodies
//!
//! Files arrive under one field name (repeated); every other part is read as
//! UTF-8 text. Parts are buffered in memory, bounded by [`MultipartLimits`].

use std::collections::HashMap;
use std::str::FromStr;

use actix_multipart::{Field, Multipart};
use futures_util::TryStreamExt;
use nexo_core::services::ImageUpload;
use nexo_shared::config::StorageConfig;
use nexo_shared::utils::validation::ValidationErrors;
use rust_decimal::Decimal;

use super::error::{ApiError, ApiResult};

const MAX_TEXT_FIELD_BYTES: usize = 64 * 1024;

/// Size limits for one multipart request
#[derive(Debug, Clone, Copy)]
pub struct MultipartLimits {
    pub max_file_size_bytes: usize,
    pub max_files: usize,
}

impl From<&StorageConfig> for MultipartLimits {
    fn from(config: &StorageConfig) -> Self {
        Self {
            max_file_size_bytes: config.max_file_size_bytes,
            max_files: config.max_files_per_upload,
        }
    }
}

/// Parsed multipart body
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, Vec<String>>,
    pub files: Vec<ImageUpload>,
}

impl MultipartForm {
    /// First non-blank value of a text field
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .and_then(|values| values.iter().map(|v| v.trim()).find(|v| !v.is_empty()))
            .map(str::to_string)
    }

    /// Every non-blank value of a repeated text field
    pub fn texts(&self, name: &str) -> Vec<String> {
        self.fields
            .get(name)
            .map(|values| {
                values
                    .iter()
                    .map(|v| v.trim())
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Required text field
    pub fn required_text(&self, name: &str) -> ApiResult<String> {
        self.text(name).ok_or_else(|| {
            ApiError::Validation(ValidationErrors::single(
                name,
                format!("{} is required", name),
                "required",
            ))
        })
    }

    /// Optional decimal field such as `price`
    pub fn decimal(&self, name: &str) -> ApiResult<Option<Decimal>> {
        match self.text(name) {
            None => Ok(None),
            Some(raw) => Decimal::from_str(&raw).map(Some).map_err(|_| {
                ApiError::Validation(ValidationErrors::single(
                    name,
                    format!("{} must be a number", name),
                    "number",
                ))
            }),
        }
    }

    pub fn required_decimal(&self, name: &str) -> ApiResult<Decimal> {
        self.decimal(name)?.ok_or_else(|| {
            ApiError::Validation(ValidationErrors::single(
                name,
                format!("{} is required", name),
                "required",
            ))
        })
    }
}

/// Read a whole multipart payload, collecting files sent as `file_field`
pub async fn read_multipart(
    mut payload: Multipart,
    file_field: &str,
    limits: MultipartLimits,
) -> ApiResult<MultipartForm> {
    let mut form = MultipartForm::default();

    while let Some(field) = payload.try_next().await.map_err(bad_multipart)? {
        let disposition = field.content_disposition();
        let name = disposition.get_name().unwrap_or_default().to_string();
        let file_name = disposition.get_filename().map(str::to_string);

        match file_name {
            Some(original_name) if name == file_field => {
                if form.files.len() >= limits.max_files {
                    return Err(ApiError::Validation(ValidationErrors::single(
                        file_field,
                        format!("At most {} files can be uploaded at once", limits.max_files),
                        "too_many_files",
                    )));
                }
                let content_type = field
                    .content_type()
                    .map(|mime| mime.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let bytes = read_field(field, limits.max_file_size_bytes, &original_name).await?;
                form.files
                    .push(ImageUpload::new(original_name, content_type, bytes));
            }
            Some(_) => {
                log::debug!("Ignoring unexpected file part '{}'", name);
                read_field(field, limits.max_file_size_bytes, &name).await?;
            }
            None => {
                let bytes = read_field(field, MAX_TEXT_FIELD_BYTES, &name).await?;
                let value = String::from_utf8(bytes)
                    .map_err(|_| ApiError::BadRequest(format!("Field '{}' is not valid UTF-8", name)))?;
                form.fields.entry(name).or_default().push(value);
            }
        }
    }

    Ok(form)
}

async fn read_field(mut field: Field, limit: usize, label: &str) -> ApiResult<Vec<u8>> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(bad_multipart)? {
        if bytes.len() + chunk.len() > limit {
            return Err(ApiError::PayloadTooLarge(format!(
                "'{}' exceeds the limit of {} bytes",
                label, limit
            )));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

fn bad_multipart(error: actix_multipart::MultipartError) -> ApiError {
    ApiError::BadRequest(format!("Malformed multipart body: {}", error))
}
