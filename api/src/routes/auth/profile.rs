use actix_web::{web, HttpResponse};

use nexo_core::repositories::{ProductRepository, UserRepository};
use nexo_core::services::ObjectStorage;

use crate::app::AppState;
use crate::handlers::ApiResult;
use crate::middleware::AuthContext;

/// Handler for GET /auth/profile (requires authentication)
pub async fn profile<U, P, S>(
    state: web::Data<AppState<U, P, S>>,
    auth: AuthContext,
) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    P: ProductRepository + 'static,
    S: ObjectStorage + 'static,
{
    let profile = state.auth.profile(&auth.caller).await?;
    Ok(HttpResponse::Ok().json(profile))
}
