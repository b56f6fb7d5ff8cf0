use actix_web::{web, HttpResponse};
use validator::Validate;

use nexo_core::repositories::{ProductRepository, UserRepository};
use nexo_core::services::ObjectStorage;

use crate::app::AppState;
use crate::dto::{LoginRequest, LoginResponse};
use crate::handlers::ApiResult;

/// Handler for POST /auth/login
///
/// # Request Body
///
/// ```json
/// { "email": "manager@nexostore.com", "password": "secret123" }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// { "access_token": "eyJhbGciOi..." }
/// ```
///
/// ## Errors
/// - 400 when the body is malformed
/// - 401 `INVALID_CREDENTIALS` for an unknown email or a wrong password
pub async fn login<U, P, S>(
    state: web::Data<AppState<U, P, S>>,
    request: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    P: ProductRepository + 'static,
    S: ObjectStorage + 'static,
{
    let request = request.into_inner();
    request.validate()?;

    let token = state.auth.login(&request.email, &request.password).await?;
    Ok(HttpResponse::Ok().json(LoginResponse::from(token)))
}
