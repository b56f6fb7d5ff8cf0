use actix_web::{web, HttpResponse};
use validator::Validate;

use nexo_core::repositories::{ProductRepository, UserRepository};
use nexo_core::services::ObjectStorage;

use crate::app::AppState;
use crate::dto::RegisterRequest;
use crate::handlers::ApiResult;

/// Handler for POST /auth/register
///
/// Creates a client account and returns its public profile (201). A taken
/// email yields 409.
pub async fn register<U, P, S>(
    state: web::Data<AppState<U, P, S>>,
    request: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    P: ProductRepository + 'static,
    S: ObjectStorage + 'static,
{
    let request = request.into_inner();
    request.validate()?;

    let profile = state.accounts.register(request.into()).await?;
    log::info!("Registered account {}", profile.id);
    Ok(HttpResponse::Created().json(profile))
}
