use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use nexo_core::repositories::{ProductRepository, UserRepository};
use nexo_core::services::ObjectStorage;
use nexo_shared::types::MessageResponse;

use crate::app::AppState;
use crate::dto::{CreateProductRequest, UpdateProductRequest};
use crate::handlers::ApiResult;
use crate::middleware::AuthContext;

/// Handler for POST /products (manager or admin)
///
/// The caller becomes the owner. Returns the created product (201).
pub async fn create_product<U, P, S>(
    state: web::Data<AppState<U, P, S>>,
    auth: AuthContext,
    request: web::Json<CreateProductRequest>,
) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    P: ProductRepository + 'static,
    S: ObjectStorage + 'static,
{
    let request = request.into_inner();
    request.validate()?;

    let product = state
        .catalog
        .create_product(&auth.caller, request.into())
        .await?;
    log::info!("[{}] Product {} created by {}", auth.jti, product.id, auth.caller.id);
    Ok(HttpResponse::Created().json(product))
}

/// Handler for GET /products
pub async fn list_products<U, P, S>(state: web::Data<AppState<U, P, S>>) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    P: ProductRepository + 'static,
    S: ObjectStorage + 'static,
{
    let listings = state.catalog.list_products().await?;
    Ok(HttpResponse::Ok().json(listings))
}

/// Handler for GET /products/{id}
pub async fn get_product<U, P, S>(
    state: web::Data<AppState<U, P, S>>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    P: ProductRepository + 'static,
    S: ObjectStorage + 'static,
{
    let listing = state.catalog.get_product(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(listing))
}

/// Handler for GET /products/manager/{manager_id}
pub async fn list_products_by_manager<U, P, S>(
    state: web::Data<AppState<U, P, S>>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    P: ProductRepository + 'static,
    S: ObjectStorage + 'static,
{
    let listings = state
        .catalog
        .list_products_by_manager(path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(listings))
}

/// Handler for PATCH /products/{id} (owner or super admin)
///
/// Sending `imageUrls` replaces the whole image set; omitting it keeps the
/// current images.
pub async fn update_product<U, P, S>(
    state: web::Data<AppState<U, P, S>>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    request: web::Json<UpdateProductRequest>,
) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    P: ProductRepository + 'static,
    S: ObjectStorage + 'static,
{
    let request = request.into_inner();
    request.validate()?;

    let product = state
        .catalog
        .update_product(&auth.caller, path.into_inner(), request.into())
        .await?;
    Ok(HttpResponse::Ok().json(product))
}

/// Handler for DELETE /products/{id} (owner or super admin)
pub async fn delete_product<U, P, S>(
    state: web::Data<AppState<U, P, S>>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    P: ProductRepository + 'static,
    S: ObjectStorage + 'static,
{
    let message = state
        .catalog
        .delete_product(&auth.caller, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new(message)))
}
