use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;
use dotenv::dotenv;
use log::{info, warn};

use nexo_api::{create_app, AppState};
use nexo_shared::config::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();
    let config = AppConfig::from_env();

    // Initialize logger; RUST_LOG wins over the per-environment default
    env_logger::init_from_env(
        env_logger::Env::new().default_filter_or(config.logging.level.as_str()),
    );

    info!("Starting NexoStore API Server ({:?})", config.environment);
    if config.auth.jwt.is_using_default_secret() {
        warn!("JWT_SECRET is not set; using the development secret");
    }
    if config.auth.super_admin.mode_enabled {
        info!("Super admin mode is enabled");
    }

    let infra = nexo_infra::initialize(&config)
        .await
        .context("Failed to initialize infrastructure")?;
    info!("{}", infra.database.get_statistics());

    let state = web::Data::new(AppState::new(
        Arc::new(infra.user_repository()),
        Arc::new(infra.product_repository()),
        Arc::new(infra.storage.clone()),
        &config,
    ));

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let app_config = config.clone();
    let payload_limit = config.server.max_payload_size;

    let mut server = HttpServer::new(move || {
        create_app(state.clone(), &app_config)
            .app_data(web::PayloadConfig::new(payload_limit))
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await?;

    infra.database.close().await;
    info!("Server stopped");
    Ok(())
}
