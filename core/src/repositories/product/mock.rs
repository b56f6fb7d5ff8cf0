//! In-memory implementation of ProductRepository for tests and local runs

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::product::Product;
use crate::errors::DomainError;

use super::trait_::ProductRepository;

/// Mock product repository
///
/// Clones share the same store. `fail_writes` makes `create` and `update`
/// fail without touching the store, which is how compensation paths are
/// exercised.
#[derive(Clone, Default)]
pub struct MockProductRepository {
    products: Arc<RwLock<HashMap<Uuid, Product>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MockProductRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent creates and updates fail
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Drop every product owned by `manager_id`
    pub async fn remove_by_manager(&self, manager_id: Uuid) -> usize {
        let mut products = self.products.write().await;
        let before = products.len();
        products.retain(|_, p| p.manager_id != manager_id);
        before - products.len()
    }

    pub async fn len(&self) -> usize {
        self.products.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.products.read().await.is_empty()
    }

    fn check_writable(&self) -> Result<(), DomainError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DomainError::internal("Simulated database failure"));
        }
        Ok(())
    }
}

fn newest_first(mut products: Vec<Product>) -> Vec<Product> {
    products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    products
}

#[async_trait]
impl ProductRepository for MockProductRepository {
    async fn create(&self, product: Product) -> Result<Product, DomainError> {
        self.check_writable()?;
        self.products.write().await.insert(product.id, product.clone());
        Ok(product)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, DomainError> {
        Ok(self.products.read().await.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Product>, DomainError> {
        let products = self.products.read().await;
        Ok(newest_first(products.values().cloned().collect()))
    }

    async fn find_by_manager(&self, manager_id: Uuid) -> Result<Vec<Product>, DomainError> {
        let products = self.products.read().await;
        Ok(newest_first(
            products
                .values()
                .filter(|p| p.manager_id == manager_id)
                .cloned()
                .collect(),
        ))
    }

    async fn update(&self, product: Product) -> Result<Product, DomainError> {
        self.check_writable()?;
        let mut products = self.products.write().await;
        if !products.contains_key(&product.id) {
            return Err(DomainError::not_found("Product", product.id));
        }
        products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        Ok(self.products.write().await.remove(&id).is_some())
    }
}
