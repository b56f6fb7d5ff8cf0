//! Product repository trait.
//!
//! A product and its image set are one aggregate: every write covers both
//! in a single transaction so partial application is never observable.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::product::Product;
use crate::errors::DomainError;

/// Repository trait for Product persistence operations
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Persist a new product together with all of its images
    ///
    /// # Returns
    /// * `Ok(Product)` - The stored product
    /// * `Err(DomainError)` - Nothing was committed
    async fn create(&self, product: Product) -> Result<Product, DomainError>;

    /// Find a product with its images
    ///
    /// # Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - No product with this id
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, DomainError>;

    /// List every product with its images, newest first
    async fn find_all(&self) -> Result<Vec<Product>, DomainError>;

    /// List the products owned by a manager, newest first
    async fn find_by_manager(&self, manager_id: Uuid) -> Result<Vec<Product>, DomainError>;

    /// Update the product row and replace its entire image set
    ///
    /// Existing image rows are removed and `product.images` inserted; this is
    /// a full replace, not a merge.
    ///
    /// # Returns
    /// * `Ok(Product)` - The updated product
    /// * `Err(DomainError::NotFound)` - The product vanished meanwhile
    async fn update(&self, product: Product) -> Result<Product, DomainError>;

    /// Delete a product; its image rows cascade
    ///
    /// # Returns
    /// * `Ok(true)` - Product was deleted
    /// * `Ok(false)` - Product not found
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
}
