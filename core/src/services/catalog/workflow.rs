//! Two-phase product workflow: upload images, then persist the product.
//!
//! Uploads happen before the catalog write, so a failed write leaves
//! orphaned objects behind unless they are removed here. Publishing removes
//! every uploaded object on failure; revising removes only the objects it
//! uploaded itself and never touches images the product already had.

use std::sync::Arc;

use futures::future::join_all;
use nexo_shared::utils::validation::ValidationErrors;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::config::CatalogConfig;
use super::service::CatalogService;
use crate::domain::entities::product::check_scalar_fields;
use crate::domain::entities::{AuthenticatedCaller, NewProduct, Product, ProductChanges};
use crate::errors::{DomainError, DomainResult};
use crate::policy::ProductAction;
use crate::repositories::{ProductRepository, UserRepository};
use crate::services::storage::{ImageUpload, ObjectStorage, UploadedImage};

/// Publish a product from freshly received files
#[derive(Debug, Clone)]
pub struct PublishRequest {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub images: Vec<ImageUpload>,
    /// Original file name of the image to use as cover
    pub cover_image_name: Option<String>,
}

/// Revise a product, keeping some existing images and adding new ones
#[derive(Debug, Clone, Default)]
pub struct ReviseRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    /// Existing image URLs to keep; the rest are dropped
    pub retained_image_urls: Vec<String>,
    pub new_images: Vec<ImageUpload>,
    /// Original file name of a new image to use as cover
    pub cover_image_name: Option<String>,
    /// Retained image URL to use as cover
    pub cover_image_url: Option<String>,
}

/// Coordinates object storage with catalog writes
pub struct ProductWorkflow<P: ProductRepository, U: UserRepository, S: ObjectStorage> {
    catalog: Arc<CatalogService<P, U>>,
    storage: Arc<S>,
    config: CatalogConfig,
}

impl<P, U, S> ProductWorkflow<P, U, S>
where
    P: ProductRepository,
    U: UserRepository,
    S: ObjectStorage,
{
    pub fn new(catalog: Arc<CatalogService<P, U>>, storage: Arc<S>, config: CatalogConfig) -> Self {
        Self {
            catalog,
            storage,
            config,
        }
    }

    /// Upload images, then create the product
    ///
    /// Authorization and field validation run before anything is uploaded.
    /// The cover is the upload named `cover_image_name`, else the first
    /// image. If the catalog write fails, every uploaded object is deleted.
    pub async fn publish(
        &self,
        actor: &AuthenticatedCaller,
        request: PublishRequest,
    ) -> DomainResult<Product> {
        self.catalog.policy().check_publish_products(actor)?;

        let mut errors = ValidationErrors::new();
        check_scalar_fields(
            Some(&request.name),
            Some(&request.description),
            Some(request.price),
            &mut errors,
        );
        self.check_files(&request.images, false, &mut errors);
        errors.into_result()?;

        let uploaded = self.upload_all(request.images).await?;
        let urls: Vec<String> = uploaded.iter().map(|image| image.public_url.clone()).collect();
        let cover = pick_uploaded_cover(&uploaded, request.cover_image_name.as_deref())
            .or_else(|| urls.first().cloned());

        let input = NewProduct::new(request.name, request.description, request.price)
            .with_images(urls.clone(), cover);

        match self.catalog.create_product(actor, input).await {
            Ok(product) => Ok(product),
            Err(error) => {
                tracing::warn!(error = %error, "Publishing failed, removing uploaded images");
                self.discard(&urls).await;
                Err(error)
            }
        }
    }

    /// Upload new images, then update the product
    ///
    /// The final image set is the retained URLs followed by the new uploads.
    /// Cover precedence: the new upload named `cover_image_name`, then
    /// `cover_image_url` if it is still in the set, then the first image.
    /// On failure only the new uploads are deleted.
    pub async fn revise(
        &self,
        actor: &AuthenticatedCaller,
        product_id: Uuid,
        request: ReviseRequest,
    ) -> DomainResult<Product> {
        let product = self.catalog.find_product(product_id).await?;
        self.catalog
            .policy()
            .check_mutate_product(actor, &product, ProductAction::Update)?;

        let mut errors = ValidationErrors::new();
        check_scalar_fields(
            request.name.as_deref(),
            request.description.as_deref(),
            request.price,
            &mut errors,
        );
        if request
            .retained_image_urls
            .iter()
            .any(|url| !product.has_image(url.trim()))
        {
            errors.add_error(
                "existingImages",
                "Retained images must belong to the product",
                "unknown_image",
            );
        }
        self.check_files(&request.new_images, true, &mut errors);
        errors.into_result()?;

        let uploaded = self.upload_all(request.new_images).await?;
        let new_urls: Vec<String> = uploaded.iter().map(|image| image.public_url.clone()).collect();

        let mut all_urls: Vec<String> = request
            .retained_image_urls
            .iter()
            .map(|url| url.trim().to_string())
            .collect();
        all_urls.extend(new_urls.iter().cloned());

        let cover = pick_uploaded_cover(&uploaded, request.cover_image_name.as_deref())
            .or_else(|| {
                request
                    .cover_image_url
                    .as_deref()
                    .map(str::trim)
                    .filter(|url| all_urls.iter().any(|candidate| candidate.as_str() == *url))
                    .map(str::to_string)
            })
            .or_else(|| all_urls.first().cloned());

        let changes = ProductChanges {
            name: request.name,
            description: request.description,
            price: request.price,
            image_urls: Some(all_urls),
            cover_image: Some(cover),
        };

        match self.catalog.update_product(actor, product_id, changes).await {
            Ok(product) => Ok(product),
            Err(error) => {
                tracing::warn!(
                    product_id = %product_id,
                    error = %error,
                    "Revision failed, removing newly uploaded images"
                );
                self.discard(&new_urls).await;
                Err(error)
            }
        }
    }

    /// Upload a batch of images on behalf of `actor`
    ///
    /// All or nothing: if one upload fails the others are deleted again.
    pub async fn upload_images(
        &self,
        actor: &AuthenticatedCaller,
        files: Vec<ImageUpload>,
    ) -> DomainResult<Vec<UploadedImage>> {
        let mut errors = ValidationErrors::new();
        self.check_files(&files, false, &mut errors);
        errors.into_result()?;

        let uploaded = self.upload_all(files).await?;
        tracing::info!(actor_id = %actor.id, count = uploaded.len(), "Images uploaded");
        Ok(uploaded)
    }

    /// Delete stored images by URL
    pub async fn delete_images(
        &self,
        actor: &AuthenticatedCaller,
        urls: Vec<String>,
    ) -> DomainResult<String> {
        if urls.is_empty() {
            return Ok("No images to delete.".to_string());
        }

        self.storage.delete_many(&urls).await?;
        tracing::info!(actor_id = %actor.id, count = urls.len(), "Images deleted");
        Ok("Images deleted successfully.".to_string())
    }

    fn check_files(&self, files: &[ImageUpload], allow_empty: bool, errors: &mut ValidationErrors) {
        if files.is_empty() && !allow_empty {
            errors.add_error("images", "No files provided for upload.", "required");
        }
        if files.len() > self.config.max_files_per_upload {
            errors.add_error(
                "images",
                format!(
                    "At most {} files can be uploaded at once",
                    self.config.max_files_per_upload
                ),
                "too_many_files",
            );
        }
        for file in files {
            if file.bytes.is_empty() {
                errors.add_error("images", format!("File {} is empty", file.original_name), "empty_file");
            } else if !file.content_type.starts_with("image/") {
                errors.add_error(
                    "images",
                    format!("File {} is not an image", file.original_name),
                    "not_an_image",
                );
            }
        }
    }

    /// Upload concurrently; on any failure delete the successful ones
    async fn upload_all(&self, files: Vec<ImageUpload>) -> DomainResult<Vec<UploadedImage>> {
        let uploads = files.into_iter().map(|file| async move {
            let original_name = file.original_name.clone();
            self.storage
                .upload(file)
                .await
                .map(|public_url| UploadedImage {
                    original_name,
                    public_url,
                })
        });

        let mut uploaded = Vec::new();
        let mut first_error = None;
        for result in join_all(uploads).await {
            match result {
                Ok(image) => uploaded.push(image),
                Err(error) => {
                    tracing::warn!(error = %error, "Image upload failed");
                    first_error.get_or_insert(error);
                }
            }
        }

        match first_error {
            None => Ok(uploaded),
            Some(error) => {
                let urls: Vec<String> = uploaded.into_iter().map(|image| image.public_url).collect();
                self.discard(&urls).await;
                Err(DomainError::Storage(error))
            }
        }
    }

    /// Best-effort removal of objects that will not be referenced
    async fn discard(&self, urls: &[String]) {
        if urls.is_empty() {
            return;
        }
        match self.storage.delete_many(urls).await {
            Ok(()) => tracing::info!(count = urls.len(), "Removed unreferenced uploads"),
            Err(error) => tracing::warn!(
                count = urls.len(),
                error = %error,
                "Could not remove unreferenced uploads"
            ),
        }
    }
}

fn pick_uploaded_cover(uploaded: &[UploadedImage], cover_name: Option<&str>) -> Option<String> {
    let cover_name = cover_name?;
    uploaded
        .iter()
        .find(|image| image.original_name == cover_name)
        .map(|image| image.public_url.clone())
}
