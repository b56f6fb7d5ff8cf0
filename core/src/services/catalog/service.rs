//! Product persistence guarded by the authorization policy

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::try_join_all;
use nexo_shared::utils::validation::ValidationErrors;
use uuid::Uuid;

use crate::domain::entities::product::{check_cover, round_price};
use crate::domain::entities::{
    normalize_image_urls, AuthenticatedCaller, ManagerSummary, NewProduct, Product,
    ProductChanges, ProductListing,
};
use crate::errors::{DomainError, DomainResult};
use crate::policy::{AuthorizationPolicy, ProductAction};
use crate::repositories::{ProductRepository, UserRepository};

/// Catalog service for products and their images
pub struct CatalogService<P: ProductRepository, U: UserRepository> {
    products: Arc<P>,
    users: Arc<U>,
    policy: Arc<AuthorizationPolicy>,
}

impl<P: ProductRepository, U: UserRepository> CatalogService<P, U> {
    pub fn new(products: Arc<P>, users: Arc<U>, policy: Arc<AuthorizationPolicy>) -> Self {
        Self {
            products,
            users,
            policy,
        }
    }

    pub fn policy(&self) -> &AuthorizationPolicy {
        &self.policy
    }

    /// Publish a product owned by `actor`
    ///
    /// The image URLs must already point at uploaded objects. Product and
    /// images are written in one transaction; on failure nothing is stored
    /// and the caller owns the cleanup of those objects.
    pub async fn create_product(
        &self,
        actor: &AuthenticatedCaller,
        input: NewProduct,
    ) -> DomainResult<Product> {
        self.policy.check_publish_products(actor)?;

        let input = NewProduct {
            image_urls: normalize_image_urls(input.image_urls),
            cover_image: normalize_cover(input.cover_image),
            ..input
        };
        input.validate()?;

        let product = self.products.create(Product::new(actor.id, input)).await?;
        tracing::info!(
            product_id = %product.id,
            manager_id = %product.manager_id,
            images = product.images.len(),
            "Product created"
        );
        Ok(product)
    }

    /// Load a product or fail with `NotFound`
    pub async fn find_product(&self, id: Uuid) -> DomainResult<Product> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Product", id))
    }

    /// Public read of one product with its manager
    pub async fn get_product(&self, id: Uuid) -> DomainResult<ProductListing> {
        let product = self.find_product(id).await?;
        let mut listings = self.with_managers(vec![product]).await?;
        listings
            .pop()
            .ok_or_else(|| DomainError::internal("Product listing vanished"))
    }

    /// Public catalog, newest first
    pub async fn list_products(&self) -> DomainResult<Vec<ProductListing>> {
        let products = self.products.find_all().await?;
        self.with_managers(products).await
    }

    /// Products published by one manager
    pub async fn list_products_by_manager(
        &self,
        manager_id: Uuid,
    ) -> DomainResult<Vec<ProductListing>> {
        let products = self.products.find_by_manager(manager_id).await?;
        self.with_managers(products).await
    }

    /// Apply a partial update
    ///
    /// Steps: load (NotFound), authorize (Forbidden), validate, then persist.
    /// When `image_urls` is present the whole image set is replaced. Without
    /// an explicit cover, the current cover survives only if it is still
    /// part of the image set.
    pub async fn update_product(
        &self,
        actor: &AuthenticatedCaller,
        id: Uuid,
        changes: ProductChanges,
    ) -> DomainResult<Product> {
        let mut product = self.find_product(id).await?;
        self.policy
            .check_mutate_product(actor, &product, ProductAction::Update)?;
        changes.validate()?;

        if let Some(name) = changes.name {
            product.name = name.trim().to_string();
        }
        if let Some(description) = changes.description {
            product.description = description.trim().to_string();
        }
        if let Some(price) = changes.price {
            product.price = round_price(price);
        }

        let replacement = changes.image_urls.map(normalize_image_urls);
        let urls = replacement.clone().unwrap_or_else(|| product.image_urls());

        let cover = match changes.cover_image {
            Some(explicit) => {
                let cover = normalize_cover(explicit);
                let mut errors = ValidationErrors::new();
                check_cover(cover.as_deref(), &urls, &mut errors);
                errors.into_result()?;
                cover
            }
            None => product
                .cover_image
                .clone()
                .filter(|current| urls.contains(current)),
        };

        match replacement {
            Some(urls) => product.replace_images(urls, cover),
            None => {
                product.cover_image = cover;
                product.refresh_cover_flags();
            }
        }
        product.touch();

        let updated = self.products.update(product).await?;
        tracing::info!(
            product_id = %updated.id,
            actor_id = %actor.id,
            images = updated.images.len(),
            "Product updated"
        );
        Ok(updated)
    }

    /// Delete a product's catalog entry
    ///
    /// Image rows cascade; the stored objects are left untouched.
    pub async fn delete_product(&self, actor: &AuthenticatedCaller, id: Uuid) -> DomainResult<String> {
        let product = self.find_product(id).await?;
        self.policy
            .check_mutate_product(actor, &product, ProductAction::Delete)?;

        if !self.products.delete(id).await? {
            return Err(DomainError::not_found("Product", id));
        }

        tracing::info!(product_id = %id, actor_id = %actor.id, "Product deleted");
        Ok(format!("Product with ID \"{}\" successfully deleted", id))
    }

    async fn with_managers(&self, products: Vec<Product>) -> DomainResult<Vec<ProductListing>> {
        let mut manager_ids: Vec<Uuid> = products.iter().map(|p| p.manager_id).collect();
        manager_ids.sort();
        manager_ids.dedup();

        let managers = try_join_all(manager_ids.iter().map(|id| self.users.find_by_id(*id))).await?;
        let summaries: HashMap<Uuid, ManagerSummary> = managers
            .into_iter()
            .flatten()
            .map(|user| (user.id, user.summary()))
            .collect();

        Ok(products
            .into_iter()
            .map(|product| {
                let manager = summaries.get(&product.manager_id).cloned();
                ProductListing { product, manager }
            })
            .collect())
    }
}

/// Trim a cover URL; blank means no cover
fn normalize_cover(cover: Option<String>) -> Option<String> {
    cover
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
}
