//! Unit tests for authentication service

use std::sync::Arc;

use crate::domain::entities::{AuthenticatedCaller, Role, User};
use crate::errors::{AuthError, DomainError};
use crate::repositories::{MockUserRepository, UserRepository};
use crate::services::auth::AuthService;
use crate::services::password::PasswordHasher;
use crate::services::token::{TokenService, TokenServiceConfig};

async fn setup() -> (AuthService<MockUserRepository>, Arc<MockUserRepository>, User) {
    let users = Arc::new(MockUserRepository::new());
    let hasher = PasswordHasher::new(4);
    let hash = hasher.hash("secret123").await.unwrap();
    let user = users
        .create(User::new("Andrea", "andrea@nexostore.com", hash, Role::Manager))
        .await
        .unwrap();

    let tokens = Arc::new(TokenService::new(TokenServiceConfig::default()));
    (AuthService::new(users.clone(), tokens, hasher), users, user)
}

#[tokio::test]
async fn test_login_issues_verifiable_token() {
    let (service, _, user) = setup().await;

    let token = service.login(" Andrea@NexoStore.com ", "secret123").await.unwrap();
    let caller = service.authenticate(&token.access_token).unwrap();

    assert_eq!(caller.id, user.id);
    assert_eq!(caller.role, Role::Manager);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let (service, _, _) = setup().await;

    let wrong_password = service.login("andrea@nexostore.com", "nope").await;
    let unknown_email = service.login("ghost@nexostore.com", "secret123").await;

    assert!(matches!(
        wrong_password,
        Err(DomainError::Auth(AuthError::InvalidCredentials))
    ));
    assert!(matches!(
        unknown_email,
        Err(DomainError::Auth(AuthError::InvalidCredentials))
    ));
}

#[tokio::test]
async fn test_profile_of_deleted_account() {
    let (service, users, user) = setup().await;
    let caller = AuthenticatedCaller::new(user.id, user.email.clone(), user.role);

    let profile = service.profile(&caller).await.unwrap();
    assert_eq!(profile.email, "andrea@nexostore.com");

    users.delete(user.id).await.unwrap();
    assert!(matches!(
        service.profile(&caller).await,
        Err(DomainError::Auth(AuthError::AccountUnavailable))
    ));
}
