//! In-memory implementation of UserRepository for tests and local runs

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::user::{User, UserFilter};
use crate::errors::DomainError;
use crate::repositories::product::MockProductRepository;

use super::trait_::UserRepository;

/// Mock user repository
///
/// When linked to a [`MockProductRepository`] through
/// [`MockUserRepository::with_products`], deleting a user also removes the
/// products it manages, like the `ON DELETE CASCADE` foreign key does.
#[derive(Clone, Default)]
pub struct MockUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    products: Option<MockProductRepository>,
}

impl MockUserRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Cascade user deletion into `products`
    pub fn with_products(products: MockProductRepository) -> Self {
        Self {
            users: Arc::default(),
            products: Some(products),
        }
    }

    /// Insert a user directly, bypassing uniqueness checks
    pub async fn insert(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_all(&self, filter: &UserFilter) -> Result<Vec<User>, DomainError> {
        let users = self.users.read().await;
        let mut matching: Vec<User> = users.values().filter(|u| filter.matches(u)).cloned().collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == user.email) {
            return Err(DomainError::Conflict {
                message: format!("User with email \"{}\" already exists", user.email),
            });
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        if !users.contains_key(&user.id) {
            return Err(DomainError::not_found("User", user.id));
        }
        if users.values().any(|u| u.id != user.id && u.email == user.email) {
            return Err(DomainError::Conflict {
                message: format!("User with email \"{}\" already exists", user.email),
            });
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let removed = self.users.write().await.remove(&id).is_some();
        if removed {
            if let Some(products) = &self.products {
                products.remove_by_manager(id).await;
            }
        }
        Ok(removed)
    }
}
