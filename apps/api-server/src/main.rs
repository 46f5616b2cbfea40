//! # Todo API Server
//!
//! The main entry point for the Actix-web HTTP server.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

use api_server::config::AppConfig;
use api_server::observability::RequestIdMiddleware;
use api_server::state::AppState;
use api_server::telemetry::{TelemetryConfig, init_telemetry};
use todo_core::ports::RateLimiter;
use todo_infra::InMemoryRateLimiter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!("Starting Todo API Server on {}:{}", config.host, config.port);

    let state = AppState::new(config.database.as_ref(), config.jwt.clone()).await;

    let auth_limiter: Arc<dyn RateLimiter> = Arc::new(
        InMemoryRateLimiter::new(config.auth_rate_limit.clone())
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?,
    );

    HttpServer::new(move || {
        App::new()
            .wrap(RequestIdMiddleware)
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(|cfg| api_server::configure_app(cfg, auth_limiter.clone()))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
