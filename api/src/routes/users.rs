//! Account directory endpoints; every route requires authentication

use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use nexo_core::domain::entities::UserFilter;
use nexo_core::repositories::{ProductRepository, UserRepository};
use nexo_core::services::ObjectStorage;
use nexo_shared::types::MessageResponse;

use crate::app::AppState;
use crate::dto::{CreateUserRequest, UpdateRoleRequest, UpdateUserRequest, UserQuery};
use crate::handlers::ApiResult;
use crate::middleware::AuthContext;

/// Handler for POST /users (admin)
pub async fn create_user<U, P, S>(
    state: web::Data<AppState<U, P, S>>,
    auth: AuthContext,
    request: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    P: ProductRepository + 'static,
    S: ObjectStorage + 'static,
{
    let request = request.into_inner();
    request.validate()?;

    let profile = state.accounts.create_user(&auth.caller, request.into()).await?;
    Ok(HttpResponse::Created().json(profile))
}

/// Handler for GET /users?search=&role= (admin)
pub async fn list_users<U, P, S>(
    state: web::Data<AppState<U, P, S>>,
    auth: AuthContext,
    query: web::Query<UserQuery>,
) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    P: ProductRepository + 'static,
    S: ObjectStorage + 'static,
{
    let filter = UserFilter::from(query.into_inner());
    let users = state.accounts.list_users(&auth.caller, &filter).await?;
    Ok(HttpResponse::Ok().json(users))
}

/// Handler for GET /users/{id} (self or admin)
pub async fn get_user<U, P, S>(
    state: web::Data<AppState<U, P, S>>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    P: ProductRepository + 'static,
    S: ObjectStorage + 'static,
{
    let profile = state.accounts.get_user(&auth.caller, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// Handler for PATCH /users/{id} (self or admin)
pub async fn update_user<U, P, S>(
    state: web::Data<AppState<U, P, S>>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    request: web::Json<UpdateUserRequest>,
) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    P: ProductRepository + 'static,
    S: ObjectStorage + 'static,
{
    let request = request.into_inner();
    request.validate()?;

    let profile = state
        .accounts
        .update_user(&auth.caller, path.into_inner(), request.into())
        .await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// Handler for DELETE /users/{id} (admin)
///
/// Products of the account are removed with it and their stored images are
/// released.
pub async fn delete_user<U, P, S>(
    state: web::Data<AppState<U, P, S>>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    P: ProductRepository + 'static,
    S: ObjectStorage + 'static,
{
    let user_id = path.into_inner();
    let message = state.accounts.delete_user(&auth.caller, user_id).await?;
    log::info!("[{}] Account {} deleted by {}", auth.jti, user_id, auth.caller.id);
    Ok(HttpResponse::Ok().json(MessageResponse::new(message)))
}

/// Handler for PATCH /users/{id}/role (admin)
///
/// Body `{"newRole": "manager"}`; `{"role": ...}` is accepted too.
pub async fn update_role<U, P, S>(
    state: web::Data<AppState<U, P, S>>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    request: web::Json<UpdateRoleRequest>,
) -> ApiResult<HttpResponse>
where
    U: UserRepository + 'static,
    P: ProductRepository + 'static,
    S: ObjectStorage + 'static,
{
    let profile = state
        .accounts
        .update_role(&auth.caller, path.into_inner(), request.into_inner().new_role)
        .await?;
    Ok(HttpResponse::Ok().json(profile))
}
