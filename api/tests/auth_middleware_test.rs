//! Integration tests for JWT authentication middleware

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test::{call_service, init_service, read_body_json, TestRequest};
use actix_web::{web, App, HttpResponse};
use serde_json::Value;

use nexo_api::middleware::{AuthContext, JwtAuth};
use nexo_core::domain::entities::{Role, User};
use nexo_core::services::{TokenService, TokenServiceConfig};

async fn whoami(auth: AuthContext) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "id": auth.caller.id,
        "role": auth.caller.role,
    }))
}

fn tokens() -> Arc<TokenService> {
    Arc::new(TokenService::new(TokenServiceConfig::default()))
}

#[actix_web::test]
async fn test_middleware_requires_auth_header() {
    let app = init_service(
        App::new()
            .wrap(JwtAuth::new(tokens()))
            .route("/protected", web::get().to(whoami)),
    )
    .await;

    let resp = call_service(&app, TestRequest::get().uri("/protected").to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_middleware_rejects_foreign_token() {
    let foreign = TokenService::new(TokenServiceConfig {
        jwt_secret: "another-secret".to_string(),
        ..TokenServiceConfig::default()
    });
    let user = User::new("Marta", "marta@nexostore.com", "hash", Role::Manager);
    let token = foreign.generate_access_token(&user).unwrap();

    let app = init_service(
        App::new()
            .wrap(JwtAuth::new(tokens()))
            .route("/protected", web::get().to(whoami)),
    )
    .await;

    let req = TestRequest::get()
        .uri("/protected")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_middleware_injects_caller() {
    let tokens = tokens();
    let user = User::new("Marta", "marta@nexostore.com", "hash", Role::Manager);
    let token = tokens.generate_access_token(&user).unwrap();

    let app = init_service(
        App::new()
            .wrap(JwtAuth::new(tokens.clone()))
            .route("/protected", web::get().to(whoami)),
    )
    .await;

    let req = TestRequest::get()
        .uri("/protected")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = read_body_json(resp).await;
    assert_eq!(body["id"], user.id.to_string());
    assert_eq!(body["role"], "manager");
}

#[actix_web::test]
async fn test_auth_context_extractor_without_middleware() {
    let app = init_service(App::new().route("/protected", web::get().to(whoami))).await;

    let resp = call_service(&app, TestRequest::get().uri("/protected").to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
