//! Main account service implementation

use std::sync::Arc;

use nexo_shared::utils::validation::Validate;
use uuid::Uuid;

use super::config::AccountServiceConfig;
use crate::domain::entities::{
    normalize_email, AccountChanges, AuthenticatedCaller, NewAccount, Role, User, UserFilter,
    UserProfile,
};
use crate::errors::{DomainError, DomainResult};
use crate::policy::AuthorizationPolicy;
use crate::repositories::{ProductRepository, UserRepository};
use crate::services::password::PasswordHasher;
use crate::services::storage::ObjectStorage;

/// Account service
///
/// Generic over the user and product repositories and the object storage
/// used to release images when a manager is deleted.
pub struct AccountService<U, P, S>
where
    U: UserRepository,
    P: ProductRepository,
    S: ObjectStorage,
{
    users: Arc<U>,
    products: Arc<P>,
    storage: Arc<S>,
    policy: Arc<AuthorizationPolicy>,
    passwords: PasswordHasher,
    config: AccountServiceConfig,
}

impl<U, P, S> AccountService<U, P, S>
where
    U: UserRepository,
    P: ProductRepository,
    S: ObjectStorage,
{
    pub fn new(
        users: Arc<U>,
        products: Arc<P>,
        storage: Arc<S>,
        policy: Arc<AuthorizationPolicy>,
        config: AccountServiceConfig,
    ) -> Self {
        Self {
            users,
            products,
            storage,
            policy,
            passwords: PasswordHasher::new(config.bcrypt_cost),
            config,
        }
    }

    pub fn password_hasher(&self) -> PasswordHasher {
        self.passwords
    }

    /// Public sign-up; the account is always a client
    pub async fn register(&self, input: NewAccount) -> DomainResult<UserProfile> {
        if !self.config.allow_registration {
            return Err(DomainError::forbidden("Registration is disabled"));
        }
        let user = self.store_new_account(NewAccount { role: None, ..input }, Role::Client).await?;
        tracing::info!(user_id = %user.id, "Account registered");
        Ok(user.profile())
    }

    /// Admin-created account with a chosen role (client by default)
    pub async fn create_user(
        &self,
        actor: &AuthenticatedCaller,
        input: NewAccount,
    ) -> DomainResult<UserProfile> {
        self.policy.check_administer_users(actor)?;
        let role = input.role.unwrap_or(Role::Client);
        let user = self.store_new_account(input, role).await?;
        tracing::info!(user_id = %user.id, actor_id = %actor.id, role = %role, "Account created");
        Ok(user.profile())
    }

    pub async fn list_users(
        &self,
        actor: &AuthenticatedCaller,
        filter: &UserFilter,
    ) -> DomainResult<Vec<UserProfile>> {
        self.policy.check_administer_users(actor)?;
        let users = self.users.find_all(filter).await?;
        Ok(users.iter().map(User::profile).collect())
    }

    /// Own account, or any account for admins
    pub async fn get_user(&self, actor: &AuthenticatedCaller, id: Uuid) -> DomainResult<UserProfile> {
        if actor.id != id {
            self.policy.check_administer_users(actor)?;
        }
        Ok(self.load(id).await?.profile())
    }

    /// Update profile fields; roles change only through `update_role`
    pub async fn update_user(
        &self,
        actor: &AuthenticatedCaller,
        id: Uuid,
        changes: AccountChanges,
    ) -> DomainResult<UserProfile> {
        self.policy.check_update_user(actor, id)?;
        changes.validate()?;
        let mut user = self.load(id).await?;

        if let Some(name) = changes.name {
            user.name = name.trim().to_string();
        }
        if let Some(email) = changes.email {
            let email = normalize_email(&email);
            if email != user.email {
                self.policy.check_change_email(actor, &user, &email)?;
                if self.users.exists_by_email(&email).await? {
                    return Err(email_taken(&email));
                }
                user.email = email;
            }
        }
        if let Some(password) = changes.password {
            user.password_hash = self.passwords.hash(&password).await?;
        }
        if let Some(phone) = changes.phone {
            user.phone = non_blank(phone);
        }
        if let Some(phone_country) = changes.phone_country {
            user.phone_country = non_blank(phone_country);
        }
        if let Some(avatar_url) = changes.avatar_url {
            user.avatar_url = non_blank(avatar_url);
        }
        user.touch();

        let updated = self.users.update(user).await?;
        tracing::info!(user_id = %updated.id, actor_id = %actor.id, "Account updated");
        Ok(updated.profile())
    }

    /// Delete an account and everything it owns
    ///
    /// Order: load (NotFound), Super Admin immunity, no self-deletion, admin
    /// requirement. Images of the owned products are then released from
    /// storage on a best-effort basis before the row is removed; the
    /// database cascade takes the products and image rows with it.
    pub async fn delete_user(&self, actor: &AuthenticatedCaller, id: Uuid) -> DomainResult<String> {
        let target = self.load(id).await?;
        self.policy.check_delete_user(actor, &target)?;

        let owned = self.products.find_by_manager(target.id).await?;
        let image_urls: Vec<String> = owned
            .iter()
            .flat_map(|product| product.image_urls())
            .collect();
        self.release_images(target.id, &image_urls).await;

        if !self.users.delete(target.id).await? {
            return Err(DomainError::not_found("User", id));
        }

        tracing::info!(
            user_id = %id,
            actor_id = %actor.id,
            products = owned.len(),
            images = image_urls.len(),
            "Account deleted"
        );
        Ok(format!("User with ID \"{}\" successfully deleted", id))
    }

    /// Change the role of an account
    ///
    /// Authorization is evaluated first; asking for the current role is then
    /// a no-op that returns the account without writing.
    pub async fn update_role(
        &self,
        actor: &AuthenticatedCaller,
        id: Uuid,
        new_role: Role,
    ) -> DomainResult<UserProfile> {
        let mut target = self.load(id).await?;
        self.policy.check_change_role(actor, &target, new_role)?;

        if target.role == new_role {
            return Ok(target.profile());
        }

        let previous = target.role;
        target.role = new_role;
        target.touch();
        let updated = self.users.update(target).await?;
        tracing::info!(
            user_id = %updated.id,
            actor_id = %actor.id,
            from = %previous,
            to = %new_role,
            "Role changed"
        );
        Ok(updated.profile())
    }

    async fn load(&self, id: Uuid) -> DomainResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))
    }

    async fn store_new_account(&self, input: NewAccount, role: Role) -> DomainResult<User> {
        input.validate()?;
        let email = normalize_email(&input.email);
        if self.users.exists_by_email(&email).await? {
            return Err(email_taken(&email));
        }

        let password_hash = self.passwords.hash(&input.password).await?;
        let mut user = User::new(input.name, &email, password_hash, role);
        user.phone = input.phone.and_then(non_blank);
        user.phone_country = input.phone_country.and_then(non_blank);
        user.avatar_url = input.avatar_url.and_then(non_blank);

        self.users.create(user).await
    }

    /// Storage cleanup never blocks the account deletion
    async fn release_images(&self, user_id: Uuid, urls: &[String]) {
        if urls.is_empty() {
            return;
        }
        if let Err(error) = self.storage.delete_many(urls).await {
            tracing::warn!(
                user_id = %user_id,
                count = urls.len(),
                error = %error,
                "Failed to delete product images of removed account"
            );
        }
    }
}

fn email_taken(email: &str) -> DomainError {
    DomainError::Conflict {
        message: format!("User with email \"{}\" already exists", email),
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
