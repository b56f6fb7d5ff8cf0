//! User repository trait defining the interface for account persistence.
//!
//! The trait is async-first and keeps the database behind the domain
//! boundary. Implementations must enforce email uniqueness and cascade the
//! deletion of a user to the products it owns.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::user::{User, UserFilter};
use crate::errors::DomainError;

/// Repository trait for User entity persistence operations
///
/// # Example Implementation
/// ```no_run
/// use async_trait::async_trait;
/// use uuid::Uuid;
/// use nexo_core::repositories::UserRepository;
/// use nexo_core::domain::entities::{User, UserFilter};
/// use nexo_core::errors::DomainError;
///
/// struct MySqlUserRepository {
///     // database connection pool
/// }
///
/// #[async_trait]
/// impl UserRepository for MySqlUserRepository {
///     async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
///         // Implementation here
///         Ok(None)
///     }
///
///     // ... other methods
/// #   async fn find_by_email(&self, _: &str) -> Result<Option<User>, DomainError> { Ok(None) }
/// #   async fn find_all(&self, _: &UserFilter) -> Result<Vec<User>, DomainError> { Ok(vec![]) }
/// #   async fn create(&self, user: User) -> Result<User, DomainError> { Ok(user) }
/// #   async fn update(&self, user: User) -> Result<User, DomainError> { Ok(user) }
/// #   async fn delete(&self, _: Uuid) -> Result<bool, DomainError> { Ok(false) }
/// }
/// ```
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their unique identifier
    ///
    /// # Arguments
    /// * `id` - The UUID of the user
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user found with given ID
    /// * `Err(DomainError)` - Database or other error occurred
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Find a user by email address
    ///
    /// # Arguments
    /// * `email` - Normalized (trimmed, lowercased) email address
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No account uses this email
    /// * `Err(DomainError)` - Database or other error occurred
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// List users matching a filter, newest first
    ///
    /// # Arguments
    /// * `filter` - Optional search term (name or email) and role
    async fn find_all(&self, filter: &UserFilter) -> Result<Vec<User>, DomainError>;

    /// Create a new user in the repository
    ///
    /// # Returns
    /// * `Ok(User)` - The created user
    /// * `Err(DomainError::Conflict)` - The email is already taken
    /// * `Err(DomainError)` - Creation failed
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Update an existing user in the repository
    ///
    /// # Returns
    /// * `Ok(User)` - The updated user
    /// * `Err(DomainError::NotFound)` - No such user
    /// * `Err(DomainError::Conflict)` - The new email is already taken
    async fn update(&self, user: User) -> Result<User, DomainError>;

    /// Delete a user; the products it manages go with it by cascade
    ///
    /// # Returns
    /// * `Ok(true)` - User was deleted
    /// * `Ok(false)` - User not found
    /// * `Err(DomainError)` - Deletion failed
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;

    /// Check if an account already uses the given email
    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError> {
        Ok(self.find_by_email(email).await?.is_some())
    }
}
