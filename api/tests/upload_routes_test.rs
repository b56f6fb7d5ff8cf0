//! Integration tests for the standalone upload endpoints

mod common;

use actix_web::http::StatusCode;
use actix_web::test::{call_service, init_service, read_body_json, TestRequest};
use serde_json::{json, Value};

use common::{bearer, multipart, FilePart, TestWorld};
use nexo_api::create_app;
use nexo_core::domain::entities::Role;

#[actix_web::test]
async fn test_upload_images_returns_public_urls() {
    let world = TestWorld::new();
    let (_, token) = world.user("Marta", "marta@nexostore.com", Role::Manager).await;
    let app = init_service(create_app(world.state.clone(), &world.config)).await;

    let (content_type, body) = multipart(
        &[],
        &[
            FilePart("images", "front.png", "image/png", b"png"),
            FilePart("images", "back.jpg", "image/jpeg", b"jpg"),
        ],
    );
    let req = TestRequest::post()
        .uri("/upload/images")
        .insert_header(bearer(&token))
        .insert_header(("Content-Type", content_type))
        .set_payload(body)
        .to_request();
    let resp = call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = read_body_json(resp).await;
    let uploaded = body["uploadedImages"].as_array().unwrap();
    assert_eq!(uploaded.len(), 2);
    assert_eq!(uploaded[0]["originalname"], "front.png");
    assert!(uploaded[0]["publicUrl"]
        .as_str()
        .unwrap()
        .starts_with("https://storage.nexostore.test/"));
}

#[actix_web::test]
async fn test_upload_requires_token() {
    let world = TestWorld::new();
    let app = init_service(create_app(world.state.clone(), &world.config)).await;

    let (content_type, body) = multipart(&[], &[FilePart("images", "a.png", "image/png", b"png")]);
    let req = TestRequest::post()
        .uri("/upload/images")
        .insert_header(("Content-Type", content_type))
        .set_payload(body)
        .to_request();
    let resp = call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(world.storage.stored().await.is_empty());
}

#[actix_web::test]
async fn test_upload_rejects_empty_and_non_image_files() {
    let world = TestWorld::new();
    let (_, token) = world.user("Marta", "marta@nexostore.com", Role::Manager).await;
    let app = init_service(create_app(world.state.clone(), &world.config)).await;

    let cases = [
        multipart(&[], &[]),
        multipart(&[], &[FilePart("images", "notes.txt", "text/plain", b"hello")]),
        multipart(&[], &[FilePart("images", "empty.png", "image/png", b"")]),
    ];
    for (content_type, body) in cases {
        let req = TestRequest::post()
            .uri("/upload/images")
            .insert_header(bearer(&token))
            .insert_header(("Content-Type", content_type))
            .set_payload(body)
            .to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
    assert!(world.storage.stored().await.is_empty());
}

#[actix_web::test]
async fn test_upload_rejects_more_than_ten_files() {
    let world = TestWorld::new();
    let (_, token) = world.user("Marta", "marta@nexostore.com", Role::Manager).await;
    let app = init_service(create_app(world.state.clone(), &world.config)).await;

    let names: Vec<String> = (0..11).map(|i| format!("img-{}.png", i)).collect();
    let files: Vec<FilePart<'_>> = names
        .iter()
        .map(|name| FilePart("images", name, "image/png", b"png"))
        .collect();
    let (content_type, body) = multipart(&[], &files);

    let req = TestRequest::post()
        .uri("/upload/images")
        .insert_header(bearer(&token))
        .insert_header(("Content-Type", content_type))
        .set_payload(body)
        .to_request();
    let resp = call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(world.storage.stored().await.is_empty());
}

#[actix_web::test]
async fn test_delete_images() {
    let world = TestWorld::new();
    let (_, token) = world.user("Marta", "marta@nexostore.com", Role::Manager).await;
    let url = "https://storage.nexostore.test/product-images/old.png";
    world.storage.seed(url).await;
    let app = init_service(create_app(world.state.clone(), &world.config)).await;

    let req = TestRequest::post()
        .uri("/upload/delete-images")
        .insert_header(bearer(&token))
        .set_json(json!({ "imageUrls": [] }))
        .to_request();
    let body: Value = read_body_json(call_service(&app, req).await).await;
    assert_eq!(body["message"], "No images to delete.");

    let req = TestRequest::post()
        .uri("/upload/delete-images")
        .insert_header(bearer(&token))
        .set_json(json!({ "imageUrls": [url] }))
        .to_request();
    let resp = call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = read_body_json(resp).await;
    assert_eq!(body["message"], "Images deleted successfully.");
    assert!(!world.storage.contains(url).await);
}
