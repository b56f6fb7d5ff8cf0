//! Integration tests for the authentication endpoints

mod common;

use actix_web::http::StatusCode;
use actix_web::test::{call_service, init_service, read_body_json, TestRequest};
use serde_json::{json, Value};

use common::{bearer, TestWorld, PASSWORD};
use nexo_api::create_app;
use nexo_core::domain::entities::Role;
use nexo_core::repositories::UserRepository;
use nexo_shared::config::AppConfig;

#[actix_web::test]
async fn test_login_returns_access_token() {
    let world = TestWorld::new();
    world.user("Marta", "marta@nexostore.com", Role::Manager).await;
    let app = init_service(create_app(world.state.clone(), &world.config)).await;

    let req = TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "email": "MARTA@nexostore.com", "password": PASSWORD }))
        .to_request();
    let resp = call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = read_body_json(resp).await;
    let token = body["access_token"].as_str().unwrap();
    let claims = world.state.tokens.verify_access_token(token).unwrap();
    assert_eq!(claims.email, "marta@nexostore.com");
    assert_eq!(claims.role, Role::Manager);
}

#[actix_web::test]
async fn test_login_rejects_wrong_password_and_unknown_email_alike() {
    let world = TestWorld::new();
    world.user("Marta", "marta@nexostore.com", Role::Manager).await;
    let app = init_service(create_app(world.state.clone(), &world.config)).await;

    for (email, password) in [("marta@nexostore.com", "wrong-password"), ("ghost@nexostore.com", PASSWORD)] {
        let req = TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({ "email": email, "password": password }))
            .to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body: Value = read_body_json(resp).await;
        assert_eq!(body["error"], "INVALID_CREDENTIALS");
    }
}

#[actix_web::test]
async fn test_register_always_creates_client() {
    let world = TestWorld::new();
    let app = init_service(create_app(world.state.clone(), &world.config)).await;

    let req = TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({
            "name": "Lucia",
            "email": "lucia@nexostore.com",
            "password": PASSWORD,
            "role": "admin"
        }))
        .to_request();
    let resp = call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = read_body_json(resp).await;
    assert_eq!(body["role"], "client");
    assert!(body.get("passwordHash").is_none());
    assert!(body.get("password").is_none());
}

#[actix_web::test]
async fn test_register_rejects_taken_email() {
    let world = TestWorld::new();
    world.user("Lucia", "lucia@nexostore.com", Role::Client).await;
    let app = init_service(create_app(world.state.clone(), &world.config)).await;

    let req = TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({ "name": "Lucia", "email": "lucia@nexostore.com", "password": PASSWORD }))
        .to_request();
    let resp = call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn test_register_closed_when_disabled() {
    let mut config = AppConfig::default();
    config.auth.allow_registration = false;
    let world = TestWorld::with_config(config);
    let app = init_service(create_app(world.state.clone(), &world.config)).await;

    let req = TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({ "name": "Lucia", "email": "lucia@nexostore.com", "password": PASSWORD }))
        .to_request();
    let resp = call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert!(world.users.find_by_email("lucia@nexostore.com").await.unwrap().is_none());
}

#[actix_web::test]
async fn test_register_validates_body() {
    let world = TestWorld::new();
    let app = init_service(create_app(world.state.clone(), &world.config)).await;

    let req = TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({ "name": "", "email": "not-an-email", "password": PASSWORD }))
        .to_request();
    let resp = call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = read_body_json(resp).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert!(body["details"]["fields"]["email"].is_array());
}

#[actix_web::test]
async fn test_profile_requires_token() {
    let world = TestWorld::new();
    let app = init_service(create_app(world.state.clone(), &world.config)).await;

    let resp = call_service(&app, TestRequest::get().uri("/auth/profile").to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = TestRequest::get()
        .uri("/auth/profile")
        .insert_header(bearer("not-a-jwt"))
        .to_request();
    let resp = call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_profile_returns_sanitized_user() {
    let world = TestWorld::new();
    let (user, token) = world.user("Marta", "marta@nexostore.com", Role::Manager).await;
    let app = init_service(create_app(world.state.clone(), &world.config)).await;

    let req = TestRequest::get()
        .uri("/auth/profile")
        .insert_header(bearer(&token))
        .to_request();
    let resp = call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = read_body_json(resp).await;
    assert_eq!(body["id"], user.id.to_string());
    assert_eq!(body["email"], "marta@nexostore.com");
    assert!(body.get("passwordHash").is_none());
}

#[actix_web::test]
async fn test_health_and_unknown_route() {
    let world = TestWorld::new();
    let app = init_service(create_app(world.state.clone(), &world.config)).await;

    let resp = call_service(&app, TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");

    let resp = call_service(&app, TestRequest::get().uri("/nowhere").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
