//! Shared fixtures for the HTTP API tests
//!
//! The application runs on the in-memory repositories and storage from
//! `nexo_core`, so every test gets an isolated world.

#![allow(dead_code)]

use std::sync::Arc;

use actix_web::web;
use rust_decimal::Decimal;

use nexo_api::AppState;
use nexo_core::domain::entities::{NewProduct, Product, Role, User};
use nexo_core::repositories::{MockProductRepository, MockUserRepository, ProductRepository};
use nexo_core::services::{MockObjectStorage, PasswordHasher};
use nexo_shared::config::{AppConfig, SuperAdminConfig};

pub const PASSWORD: &str = "secret123";
pub const SUPER_ADMIN_EMAIL: &str = "root@nexostore.com";

pub type TestState = AppState<MockUserRepository, MockProductRepository, MockObjectStorage>;

pub struct TestWorld {
    pub users: Arc<MockUserRepository>,
    pub products: Arc<MockProductRepository>,
    pub storage: Arc<MockObjectStorage>,
    pub config: AppConfig,
    pub state: web::Data<TestState>,
}

impl TestWorld {
    pub fn new() -> Self {
        Self::with_super_admin(SuperAdminConfig::new(SUPER_ADMIN_EMAIL, false))
    }

    pub fn with_super_admin(super_admin: SuperAdminConfig) -> Self {
        let mut config = AppConfig::default();
        config.auth.super_admin = super_admin;
        Self::with_config(config)
    }

    pub fn with_config(mut config: AppConfig) -> Self {
        config.auth.password.bcrypt_cost = 4;

        let products = Arc::new(MockProductRepository::new());
        let users = Arc::new(MockUserRepository::with_products((*products).clone()));
        let storage = Arc::new(MockObjectStorage::new());
        let state = web::Data::new(AppState::new(
            users.clone(),
            products.clone(),
            storage.clone(),
            &config,
        ));

        Self {
            users,
            products,
            storage,
            config,
            state,
        }
    }

    /// Store an account with [`PASSWORD`] and return it with a bearer token
    pub async fn user(&self, name: &str, email: &str, role: Role) -> (User, String) {
        let hash = PasswordHasher::new(4).hash(PASSWORD).await.unwrap();
        let user = User::new(name, email, hash, role);
        self.users.insert(user.clone()).await;
        let token = self.state.tokens.generate_access_token(&user).unwrap();
        (user, token)
    }

    /// Store a product for `manager` whose images already exist in storage
    pub async fn product(&self, manager: &User, name: &str, image_names: &[&str]) -> Product {
        let urls: Vec<String> = image_names
            .iter()
            .map(|name| format!("https://storage.nexostore.test/product-images/{}", name))
            .collect();
        for url in &urls {
            self.storage.seed(url.clone()).await;
        }
        let cover = urls.first().cloned();
        let input = NewProduct::new(name, format!("{} description", name), Decimal::new(1999, 2))
            .with_images(urls, cover);
        self.products
            .create(Product::new(manager.id, input))
            .await
            .unwrap()
    }
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

/// Text part of a multipart body
pub struct TextPart<'a>(pub &'a str, pub &'a str);

/// File part of a multipart body: field, file name, content type, bytes
pub struct FilePart<'a>(pub &'a str, pub &'a str, pub &'a str, pub &'a [u8]);

const BOUNDARY: &str = "nexostore-test-boundary";

/// Encode a `multipart/form-data` body and its content type
pub fn multipart(texts: &[TextPart<'_>], files: &[FilePart<'_>]) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for TextPart(name, value) in texts {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    for FilePart(field, file_name, content_type, bytes) in files {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                BOUNDARY, field, file_name, content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    (format!("multipart/form-data; boundary={}", BOUNDARY), body)
}
