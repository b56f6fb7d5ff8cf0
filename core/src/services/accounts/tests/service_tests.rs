//! Unit tests for account service

use std::sync::Arc;

use nexo_shared::config::SuperAdminConfig;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::entities::{
    AccountChanges, AuthenticatedCaller, NewAccount, NewProduct, Product, Role, User, UserFilter,
};
use crate::errors::DomainError;
use crate::policy::AuthorizationPolicy;
use crate::repositories::{
    MockProductRepository, MockUserRepository, ProductRepository, UserRepository,
};
use crate::services::accounts::{AccountService, AccountServiceConfig};
use crate::services::storage::MockObjectStorage;

const ROOT_EMAIL: &str = "root@nexostore.com";
const BUCKET: &str = "https://storage.nexostore.test/product-images";

type TestAccounts = AccountService<MockUserRepository, MockProductRepository, MockObjectStorage>;

struct Fixture {
    users: Arc<MockUserRepository>,
    products: Arc<MockProductRepository>,
    storage: Arc<MockObjectStorage>,
    accounts: TestAccounts,
}

impl Fixture {
    fn new(super_admin_mode: bool) -> Self {
        let products = MockProductRepository::new();
        let users = Arc::new(MockUserRepository::with_products(products.clone()));
        let products = Arc::new(products);
        let storage = Arc::new(MockObjectStorage::new());
        let policy = Arc::new(AuthorizationPolicy::new(SuperAdminConfig::new(
            ROOT_EMAIL,
            super_admin_mode,
        )));
        let config = AccountServiceConfig {
            bcrypt_cost: 4,
            ..Default::default()
        };
        let accounts = AccountService::new(
            users.clone(),
            products.clone(),
            storage.clone(),
            policy,
            config,
        );

        Self {
            users,
            products,
            storage,
            accounts,
        }
    }

    async fn add_user(&self, name: &str, email: &str, role: Role) -> AuthenticatedCaller {
        let user = self
            .users
            .create(User::new(name, email, "hash", role))
            .await
            .unwrap();
        AuthenticatedCaller::new(user.id, user.email, user.role)
    }

    async fn add_product(&self, manager_id: Uuid, images: &[&str]) -> Product {
        let urls: Vec<String> = images.iter().map(|key| format!("{}/{}", BUCKET, key)).collect();
        for url in &urls {
            self.storage.seed(url.clone()).await;
        }
        let input = NewProduct::new("Chair", "Oak chair", Decimal::new(4900, 2)).with_images(urls, None);
        self.products.create(Product::new(manager_id, input)).await.unwrap()
    }
}

fn is_forbidden(err: &DomainError, reason: &str) -> bool {
    matches!(err, DomainError::Forbidden { reason: r } if r == reason)
}

#[tokio::test]
async fn test_register_always_creates_client() {
    let fx = Fixture::new(false);

    let profile = fx
        .accounts
        .register(NewAccount::new("Luz", " Luz@Example.com ", "secret1").with_role(Role::Admin))
        .await
        .unwrap();

    assert_eq!(profile.role, Role::Client);
    assert_eq!(profile.email, "luz@example.com");

    let stored = fx.users.find_by_id(profile.id).await.unwrap().unwrap();
    assert_ne!(stored.password_hash, "secret1");
    assert!(fx
        .accounts
        .password_hasher()
        .verify("secret1", &stored.password_hash)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let fx = Fixture::new(false);
    fx.add_user("Luz", "luz@example.com", Role::Client).await;

    let err = fx
        .accounts
        .register(NewAccount::new("Other", "LUZ@example.com", "secret1"))
        .await
        .unwrap_err();

    match err {
        DomainError::Conflict { message } => {
            assert_eq!(message, "User with email \"luz@example.com\" already exists")
        }
        other => panic!("expected conflict, got {:?}", other),
    }
}

#[tokio::test]
async fn test_register_validates_input() {
    let fx = Fixture::new(false);

    let err = fx
        .accounts
        .register(NewAccount::new("", "not-an-email", "123"))
        .await
        .unwrap_err();

    match err {
        DomainError::Validation(errors) => {
            assert!(errors.has_field("name"));
            assert!(errors.has_field("email"));
            assert!(errors.has_field("password"));
        }
        other => panic!("expected validation error, got {:?}", other),
    }
    assert!(fx.users.is_empty().await);
}

#[tokio::test]
async fn test_create_user_requires_admin_and_defaults_to_client() {
    let fx = Fixture::new(false);
    let admin = fx.add_user("Ada", "ada@nexostore.com", Role::Admin).await;
    let manager = fx.add_user("Mia", "mia@nexostore.com", Role::Manager).await;

    let err = fx
        .accounts
        .create_user(&manager, NewAccount::new("Bo", "bo@example.com", "secret1"))
        .await
        .unwrap_err();
    assert!(is_forbidden(&err, "Only admins can manage users"));

    let client = fx
        .accounts
        .create_user(&admin, NewAccount::new("Bo", "bo@example.com", "secret1"))
        .await
        .unwrap();
    assert_eq!(client.role, Role::Client);

    let promoted = fx
        .accounts
        .create_user(
            &admin,
            NewAccount::new("Cy", "cy@example.com", "secret1").with_role(Role::Manager),
        )
        .await
        .unwrap();
    assert_eq!(promoted.role, Role::Manager);
}

#[tokio::test]
async fn test_list_users_filters_and_requires_admin() {
    let fx = Fixture::new(false);
    let admin = fx.add_user("Ada", "ada@nexostore.com", Role::Admin).await;
    let client = fx.add_user("Bo", "bo@example.com", Role::Client).await;
    fx.add_user("Mia", "mia@nexostore.com", Role::Manager).await;

    let err = fx
        .accounts
        .list_users(&client, &UserFilter::default())
        .await
        .unwrap_err();
    assert!(is_forbidden(&err, "Only admins can manage users"));

    let all = fx.accounts.list_users(&admin, &UserFilter::default()).await.unwrap();
    assert_eq!(all.len(), 3);

    let managers = fx
        .accounts
        .list_users(&admin, &UserFilter::new(None, Some(Role::Manager)))
        .await
        .unwrap();
    assert_eq!(managers.len(), 1);
    assert_eq!(managers[0].name, "Mia");
}

#[tokio::test]
async fn test_get_user_self_or_admin() {
    let fx = Fixture::new(false);
    let admin = fx.add_user("Ada", "ada@nexostore.com", Role::Admin).await;
    let bo = fx.add_user("Bo", "bo@example.com", Role::Client).await;
    let cy = fx.add_user("Cy", "cy@example.com", Role::Client).await;

    assert_eq!(fx.accounts.get_user(&bo, bo.id).await.unwrap().name, "Bo");
    assert_eq!(fx.accounts.get_user(&admin, bo.id).await.unwrap().name, "Bo");
    assert!(fx.accounts.get_user(&cy, bo.id).await.is_err());

    let err = fx.accounts.get_user(&admin, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity: "User", .. }));
}

#[tokio::test]
async fn test_update_user_applies_changes() {
    let fx = Fixture::new(false);
    let bo = fx.add_user("Bo", "bo@example.com", Role::Client).await;

    let changes = AccountChanges {
        name: Some("Bo Peep".into()),
        email: Some("Peep@Example.com".into()),
        password: Some("newsecret".into()),
        phone: Some("  ".into()),
        ..Default::default()
    };
    let updated = fx.accounts.update_user(&bo, bo.id, changes).await.unwrap();

    assert_eq!(updated.name, "Bo Peep");
    assert_eq!(updated.email, "peep@example.com");
    assert_eq!(updated.role, Role::Client);

    let stored = fx.users.find_by_id(bo.id).await.unwrap().unwrap();
    assert!(stored.phone.is_none());
    assert!(fx
        .accounts
        .password_hasher()
        .verify("newsecret", &stored.password_hash)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_update_user_rejects_taken_email_and_foreign_target() {
    let fx = Fixture::new(false);
    let bo = fx.add_user("Bo", "bo@example.com", Role::Client).await;
    let cy = fx.add_user("Cy", "cy@example.com", Role::Client).await;

    let err = fx
        .accounts
        .update_user(
            &bo,
            bo.id,
            AccountChanges {
                email: Some("cy@example.com".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict { .. }));

    let err = fx
        .accounts
        .update_user(
            &bo,
            cy.id,
            AccountChanges {
                name: Some("Hijacked".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(is_forbidden(&err, "You are not allowed to update this user"));
}

#[tokio::test]
async fn test_update_user_keeps_own_email() {
    let fx = Fixture::new(false);
    let bo = fx.add_user("Bo", "bo@example.com", Role::Client).await;

    let updated = fx
        .accounts
        .update_user(
            &bo,
            bo.id,
            AccountChanges {
                email: Some("BO@example.com".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.email, "bo@example.com");
}

#[tokio::test]
async fn test_admin_cannot_rename_super_admin_to_strip_protection() {
    let fx = Fixture::new(false);
    let root = fx.add_user("Root", ROOT_EMAIL, Role::Admin).await;
    let admin = fx.add_user("Ada", "ada@nexostore.com", Role::Admin).await;

    let err = fx
        .accounts
        .update_user(
            &admin,
            root.id,
            AccountChanges {
                email: Some("renamed@nexostore.com".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(is_forbidden(&err, "Only the Super Admin can change the Super Admin email"));

    let stored = fx.users.find_by_id(root.id).await.unwrap().unwrap();
    assert_eq!(stored.email, ROOT_EMAIL);
    let err = fx.accounts.delete_user(&admin, root.id).await.unwrap_err();
    assert!(is_forbidden(&err, "The Super Admin account cannot be deleted"));

    let renamed = fx
        .accounts
        .update_user(
            &root,
            root.id,
            AccountChanges {
                name: Some("Root Admin".into()),
                email: Some("ROOT@nexostore.com".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "Root Admin");
}

#[tokio::test]
async fn test_super_admin_email_cannot_be_taken_over() {
    let fx = Fixture::new(false);
    let admin = fx.add_user("Ada", "ada@nexostore.com", Role::Admin).await;
    let bo = fx.add_user("Bo", "bo@example.com", Role::Client).await;

    for actor in [&bo, &admin] {
        let err = fx
            .accounts
            .update_user(
                actor,
                bo.id,
                AccountChanges {
                    email: Some(ROOT_EMAIL.into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(is_forbidden(&err, "This email is reserved for the Super Admin account"));
    }
    let stored = fx.users.find_by_id(bo.id).await.unwrap().unwrap();
    assert_eq!(stored.email, "bo@example.com");
}

#[tokio::test]
async fn test_delete_manager_releases_images_and_cascades() {
    let fx = Fixture::new(false);
    let admin = fx.add_user("Ada", "ada@nexostore.com", Role::Admin).await;
    let manager = fx.add_user("Mia", "mia@nexostore.com", Role::Manager).await;
    let other = fx.add_user("Olu", "olu@nexostore.com", Role::Manager).await;

    let owned = fx.add_product(manager.id, &["u1.png", "u2.png"]).await;
    let kept = fx.add_product(other.id, &["u3.png"]).await;

    let message = fx.accounts.delete_user(&admin, manager.id).await.unwrap();
    assert_eq!(
        message,
        format!("User with ID \"{}\" successfully deleted", manager.id)
    );

    assert!(fx.users.find_by_id(manager.id).await.unwrap().is_none());
    assert!(fx.products.find_by_id(owned.id).await.unwrap().is_none());
    assert!(fx.products.find_by_id(kept.id).await.unwrap().is_some());

    let mut deleted = fx.storage.deleted().await;
    deleted.sort();
    assert_eq!(deleted, owned.image_urls());
    assert_eq!(fx.storage.stored().await, kept.image_urls());
}

#[tokio::test]
async fn test_delete_survives_storage_outage() {
    let fx = Fixture::new(false);
    let admin = fx.add_user("Ada", "ada@nexostore.com", Role::Admin).await;
    let manager = fx.add_user("Mia", "mia@nexostore.com", Role::Manager).await;
    fx.add_product(manager.id, &["u1.png"]).await;
    fx.storage.fail_deletes(true);

    fx.accounts.delete_user(&admin, manager.id).await.unwrap();

    assert!(fx.users.find_by_id(manager.id).await.unwrap().is_none());
    assert_eq!(fx.products.len().await, 0);
}

#[tokio::test]
async fn test_delete_rules_in_order() {
    let fx = Fixture::new(true);
    let root = fx.add_user("Root", ROOT_EMAIL, Role::Admin).await;
    let admin = fx.add_user("Ada", "ada@nexostore.com", Role::Admin).await;
    let client = fx.add_user("Bo", "bo@example.com", Role::Client).await;

    let err = fx.accounts.delete_user(&root, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));

    let err = fx.accounts.delete_user(&admin, root.id).await.unwrap_err();
    assert!(is_forbidden(&err, "The Super Admin account cannot be deleted"));

    let err = fx.accounts.delete_user(&admin, admin.id).await.unwrap_err();
    assert!(is_forbidden(&err, "You cannot delete your own account"));

    let err = fx.accounts.delete_user(&client, admin.id).await.unwrap_err();
    assert!(is_forbidden(&err, "Only admins can delete users"));

    assert_eq!(fx.users.len().await, 3);
}

#[tokio::test]
async fn test_update_role_persists_change() {
    let fx = Fixture::new(false);
    let admin = fx.add_user("Ada", "ada@nexostore.com", Role::Admin).await;
    let bo = fx.add_user("Bo", "bo@example.com", Role::Client).await;

    let updated = fx
        .accounts
        .update_role(&admin, bo.id, Role::Manager)
        .await
        .unwrap();
    assert_eq!(updated.role, Role::Manager);

    let stored = fx.users.find_by_id(bo.id).await.unwrap().unwrap();
    assert_eq!(stored.role, Role::Manager);
}

#[tokio::test]
async fn test_update_role_same_role_is_noop_after_authorization() {
    let fx = Fixture::new(false);
    let admin = fx.add_user("Ada", "ada@nexostore.com", Role::Admin).await;
    let bo = fx.add_user("Bo", "bo@example.com", Role::Client).await;
    let before = fx.users.find_by_id(bo.id).await.unwrap().unwrap();

    let unchanged = fx
        .accounts
        .update_role(&admin, bo.id, Role::Client)
        .await
        .unwrap();
    assert_eq!(unchanged.role, Role::Client);
    let after = fx.users.find_by_id(bo.id).await.unwrap().unwrap();
    assert_eq!(after.updated_at, before.updated_at);

    let err = fx
        .accounts
        .update_role(&bo, bo.id, Role::Client)
        .await
        .unwrap_err();
    assert!(is_forbidden(&err, "Only admins can change user roles"));
}

#[tokio::test]
async fn test_update_role_guards_super_admin_and_self_promotion() {
    let fx = Fixture::new(true);
    let root = fx.add_user("Root", ROOT_EMAIL, Role::Admin).await;
    let admin = fx.add_user("Ada", "ada@nexostore.com", Role::Admin).await;
    let manager = fx.add_user("Mia", "mia@nexostore.com", Role::Manager).await;

    let err = fx
        .accounts
        .update_role(&admin, root.id, Role::Client)
        .await
        .unwrap_err();
    assert!(is_forbidden(&err, "Only the Super Admin can change the Super Admin role"));

    let err = fx
        .accounts
        .update_role(&manager, manager.id, Role::Admin)
        .await
        .unwrap_err();
    assert!(is_forbidden(&err, "You cannot promote yourself to admin"));

    let demoted = fx
        .accounts
        .update_role(&root, admin.id, Role::Manager)
        .await
        .unwrap();
    assert_eq!(demoted.role, Role::Manager);
}

#[tokio::test]
async fn test_registration_can_be_disabled() {
    let fx = Fixture::new(false);
    let accounts = AccountService::new(
        fx.users.clone(),
        fx.products.clone(),
        fx.storage.clone(),
        Arc::new(AuthorizationPolicy::default()),
        AccountServiceConfig {
            bcrypt_cost: 4,
            allow_registration: false,
        },
    );

    let err = accounts
        .register(NewAccount::new("Luz", "luz@example.com", "secret1"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden { .. }));
}
