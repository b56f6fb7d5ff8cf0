//! Main authentication service implementation

use std::sync::Arc;

use crate::domain::entities::{normalize_email, AccessToken, AuthenticatedCaller, UserProfile};
use crate::errors::{AuthError, DomainResult};
use crate::repositories::UserRepository;
use crate::services::password::PasswordHasher;
use crate::services::token::TokenService;

/// Authentication service
pub struct AuthService<U: UserRepository> {
    users: Arc<U>,
    tokens: Arc<TokenService>,
    passwords: PasswordHasher,
}

impl<U: UserRepository> AuthService<U> {
    pub fn new(users: Arc<U>, tokens: Arc<TokenService>, passwords: PasswordHasher) -> Self {
        Self {
            users,
            tokens,
            passwords,
        }
    }

    /// Exchange email and password for an access token
    ///
    /// An unknown email and a wrong password yield the same
    /// `AuthError::InvalidCredentials`.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<AccessToken> {
        let email = normalize_email(email);
        let user = match self.users.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                tracing::info!(email = %email, "Login attempt for unknown email");
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        if !self.passwords.verify(password, &user.password_hash).await? {
            tracing::info!(user_id = %user.id, "Login attempt with wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }

        let access_token = self.tokens.generate_access_token(&user)?;
        tracing::info!(user_id = %user.id, role = %user.role, "User logged in");
        Ok(AccessToken { access_token })
    }

    /// Sanitized profile of the authenticated caller
    pub async fn profile(&self, caller: &AuthenticatedCaller) -> DomainResult<UserProfile> {
        self.users
            .find_by_id(caller.id)
            .await?
            .map(|user| user.profile())
            .ok_or_else(|| AuthError::AccountUnavailable.into())
    }

    /// Resolve a bearer token into the caller identity
    pub fn authenticate(&self, token: &str) -> DomainResult<AuthenticatedCaller> {
        let claims = self.tokens.verify_access_token(token)?;
        Ok(claims.into_caller()?)
    }
}
