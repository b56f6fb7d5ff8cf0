use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use uuid::Uuid;

use nexo_core::repositories::{ProductRepository, UserRepository};
use nexo_core::services::{ObjectStorage, PublishRequest, ReviseRequest};

use crate::app::AppState;
use crate::handlers::{read_multipart, ApiResult};
use crate::middleware::AuthContext;

const IMAGES_FIELD: &str = "images";

/// Handler for POST /products/publish (multipart, manager or admin)
///
/// Fields: `name`, `description`, `price`, `images` (files, at least one)
/// and an optional `coverImageName` naming one of the uploaded files.
pub async fn publish_product<U, P, S>(
    state: web::Data<AppState<U, P, S>>,
    auth: AuthContext,
    payload: Multipart,
) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    P: ProductRepository + 'static,
    S: ObjectStorage + 'static,
{
    let form = read_multipart(payload, IMAGES_FIELD, state.upload_limits).await?;
    let request = PublishRequest {
        name: form.required_text("name")?,
        description: form.required_text("description")?,
        price: form.required_decimal("price")?,
        cover_image_name: form.text("coverImageName"),
        images: form.files,
    };

    log::info!(
        "[{}] Publishing product with {} images for {}",
        auth.jti,
        request.images.len(),
        auth.caller.id
    );
    let product = state.workflow.publish(&auth.caller, request).await?;
    Ok(HttpResponse::Created().json(product))
}

/// Handler for POST /products/{id}/revise (multipart, owner or super admin)
///
/// Fields are all optional: `name`, `description`, `price`, `images` (new
/// files), `existingImages` (repeated, URLs to keep), `coverImageName` and
/// `coverImageUrl`. Existing images not listed are dropped from the product.
pub async fn revise_product<U, P, S>(
    state: web::Data<AppState<U, P, S>>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    payload: Multipart,
) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    P: ProductRepository + 'static,
    S: ObjectStorage + 'static,
{
    let product_id = path.into_inner();
    let form = read_multipart(payload, IMAGES_FIELD, state.upload_limits).await?;

    let request = ReviseRequest {
        name: form.text("name"),
        description: form.text("description"),
        price: form.decimal("price")?,
        retained_image_urls: form.texts("existingImages"),
        cover_image_name: form.text("coverImageName"),
        cover_image_url: form.text("coverImageUrl"),
        new_images: form.files,
    };

    let product = state
        .workflow
        .revise(&auth.caller, product_id, request)
        .await?;
    Ok(HttpResponse::Ok().json(product))
}
