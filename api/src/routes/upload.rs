//! Standalone image upload endpoints used by the storefront editor

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};

use nexo_core::repositories::{ProductRepository, UserRepository};
use nexo_core::services::ObjectStorage;
use nexo_shared::types::MessageResponse;

use crate::app::AppState;
use crate::dto::{DeleteImagesRequest, UploadImagesResponse};
use crate::handlers::{read_multipart, ApiResult};
use crate::middleware::AuthContext;

/// Handler for POST /upload/images
///
/// Multipart field `images`, one to ten files. Either every file is stored
/// or none is.
///
/// ## Success (200 OK)
/// ```json
/// { "uploadedImages": [{ "originalname": "a.png", "publicUrl": "https://..." }] }
/// ```
pub async fn upload_images<U, P, S>(
    state: web::Data<AppState<U, P, S>>,
    auth: AuthContext,
    payload: Multipart,
) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    P: ProductRepository + 'static,
    S: ObjectStorage + 'static,
{
    let form = read_multipart(payload, "images", state.upload_limits).await?;
    log::info!("[{}] Received {} files for upload", auth.jti, form.files.len());

    let uploaded_images = state.workflow.upload_images(&auth.caller, form.files).await?;
    Ok(HttpResponse::Ok().json(UploadImagesResponse { uploaded_images }))
}

/// Handler for POST /upload/delete-images
///
/// An empty list is not an error; the response says nothing was deleted.
pub async fn delete_images<U, P, S>(
    state: web::Data<AppState<U, P, S>>,
    auth: AuthContext,
    request: web::Json<DeleteImagesRequest>,
) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    P: ProductRepository + 'static,
    S: ObjectStorage + 'static,
{
    let message = state
        .workflow
        .delete_images(&auth.caller, request.into_inner().image_urls)
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new(message)))
}
