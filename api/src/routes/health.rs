use actix_web::HttpResponse;
use nexo_shared::types::HealthResponse;

/// Health check endpoint handler
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse::healthy("nexostore-api", env!("CARGO_PKG_VERSION")))
}
