//! Route table of the HTTP API

pub mod auth;
pub mod health;
pub mod products;
pub mod upload;
pub mod users;

use actix_web::{
    error::{JsonPayloadError, PathError, QueryPayloadError},
    web, HttpRequest,
};

use nexo_core::repositories::{ProductRepository, UserRepository};
use nexo_core::services::ObjectStorage;

use crate::handlers::ApiError;
use crate::middleware::JwtAuth;

/// Register every resource
///
/// Reads of the catalog are public. Everything else sits behind `jwt`.
pub fn configure<U, P, S>(cfg: &mut web::ServiceConfig, jwt: JwtAuth)
where
    U: UserRepository + 'static,
    P: ProductRepository + 'static,
    S: ObjectStorage + 'static,
{
    cfg.service(
        web::scope("/auth")
            .route("/login", web::post().to(auth::login::<U, P, S>))
            .route("/register", web::post().to(auth::register::<U, P, S>))
            .route(
                "/profile",
                web::get().to(auth::profile::<U, P, S>).wrap(jwt.clone()),
            ),
    )
    .service(
        web::scope("/products")
            .route("", web::get().to(products::list_products::<U, P, S>))
            .route(
                "",
                web::post()
                    .to(products::create_product::<U, P, S>)
                    .wrap(jwt.clone()),
            )
            .route(
                "/publish",
                web::post()
                    .to(products::publish_product::<U, P, S>)
                    .wrap(jwt.clone()),
            )
            .route(
                "/manager/{manager_id}",
                web::get().to(products::list_products_by_manager::<U, P, S>),
            )
            .route("/{id}", web::get().to(products::get_product::<U, P, S>))
            .route(
                "/{id}",
                web::patch()
                    .to(products::update_product::<U, P, S>)
                    .wrap(jwt.clone()),
            )
            .route(
                "/{id}",
                web::delete()
                    .to(products::delete_product::<U, P, S>)
                    .wrap(jwt.clone()),
            )
            .route(
                "/{id}/revise",
                web::post()
                    .to(products::revise_product::<U, P, S>)
                    .wrap(jwt.clone()),
            ),
    )
    .service(
        web::scope("/upload")
            .wrap(jwt.clone())
            .route("/images", web::post().to(upload::upload_images::<U, P, S>))
            .route(
                "/delete-images",
                web::post().to(upload::delete_images::<U, P, S>),
            ),
    )
    .service(
        web::scope("/users")
            .wrap(jwt)
            .route("", web::post().to(users::create_user::<U, P, S>))
            .route("", web::get().to(users::list_users::<U, P, S>))
            .route("/{id}", web::get().to(users::get_user::<U, P, S>))
            .route("/{id}", web::patch().to(users::update_user::<U, P, S>))
            .route("/{id}", web::delete().to(users::delete_user::<U, P, S>))
            .route("/{id}/role", web::patch().to(users::update_role::<U, P, S>)),
    );
}

/// Malformed JSON bodies become `BAD_REQUEST` error responses
pub fn json_error(error: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::BadRequest(format!("Invalid JSON body: {}", error)).into()
}

/// Malformed query strings become `BAD_REQUEST` error responses
pub fn query_error(error: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::BadRequest(format!("Invalid query string: {}", error)).into()
}

/// Unparseable path parameters such as a malformed UUID
pub fn path_error(error: PathError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::BadRequest(format!("Invalid path parameter: {}", error)).into()
}
