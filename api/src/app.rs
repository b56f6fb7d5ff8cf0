//! Application state and factory
//!
//! This module wires the core services into an [`AppState`] and builds the
//! Actix-web application around it.

use std::sync::Arc;

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::Logger,
    web, App, Error, HttpResponse,
};
use nexo_core::policy::AuthorizationPolicy;
use nexo_core::repositories::{ProductRepository, UserRepository};
use nexo_core::services::{
    AccountService, AccountServiceConfig, AuthService, CatalogConfig, CatalogService,
    ObjectStorage, PasswordHasher, ProductWorkflow, TokenService, TokenServiceConfig,
};
use nexo_shared::config::AppConfig;
use nexo_shared::errors::{error_codes, ErrorResponse};

use crate::handlers::MultipartLimits;
use crate::middleware::{create_cors, JwtAuth, SecurityMiddleware};
use crate::routes;

/// Shared services handed to every handler
pub struct AppState<U, P, S>
where
    U: UserRepository,
    P: ProductRepository,
    S: ObjectStorage,
{
    pub auth: Arc<AuthService<U>>,
    pub catalog: Arc<CatalogService<P, U>>,
    pub workflow: Arc<ProductWorkflow<P, U, S>>,
    pub accounts: Arc<AccountService<U, P, S>>,
    pub tokens: Arc<TokenService>,
    pub upload_limits: MultipartLimits,
}

impl<U, P, S> AppState<U, P, S>
where
    U: UserRepository,
    P: ProductRepository,
    S: ObjectStorage,
{
    /// Build every service from the repositories, the storage gateway and
    /// the loaded configuration
    pub fn new(users: Arc<U>, products: Arc<P>, storage: Arc<S>, config: &AppConfig) -> Self {
        let policy = Arc::new(AuthorizationPolicy::new(config.auth.super_admin.clone()));
        let tokens = Arc::new(TokenService::new(TokenServiceConfig::from(&config.auth.jwt)));
        let passwords = PasswordHasher::new(config.auth.password.bcrypt_cost);

        let catalog = Arc::new(CatalogService::new(
            products.clone(),
            users.clone(),
            policy.clone(),
        ));
        let workflow = Arc::new(ProductWorkflow::new(
            catalog.clone(),
            storage.clone(),
            CatalogConfig::from(&config.storage),
        ));
        let accounts = Arc::new(AccountService::new(
            users.clone(),
            products,
            storage,
            policy,
            AccountServiceConfig::from(&config.auth),
        ));
        let auth = Arc::new(AuthService::new(users, tokens.clone(), passwords));

        Self {
            auth,
            catalog,
            workflow,
            accounts,
            tokens,
            upload_limits: MultipartLimits::from(&config.storage),
        }
    }
}

/// Create and configure the application with all dependencies
pub fn create_app<U, P, S>(
    state: web::Data<AppState<U, P, S>>,
    config: &AppConfig,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
>
where
    U: UserRepository + 'static,
    P: ProductRepository + 'static,
    S: ObjectStorage + 'static,
{
    let jwt = JwtAuth::new(state.tokens.clone());

    App::new()
        .app_data(state)
        .app_data(web::JsonConfig::default().error_handler(routes::json_error))
        .app_data(web::QueryConfig::default().error_handler(routes::query_error))
        .app_data(web::PathConfig::default().error_handler(routes::path_error))
        // Order matters: security first, then CORS, then logging
        .wrap(Logger::default())
        .wrap(create_cors(&config.cors))
        .wrap(SecurityMiddleware::new(config.environment, &config.server))
        .route("/health", web::get().to(routes::health::health_check))
        .configure(|cfg| routes::configure::<U, P, S>(cfg, jwt))
        .default_service(web::route().to(not_found))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
