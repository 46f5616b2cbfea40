//! # Todo API Server
//!
//! Actix-web application exposing the todo service under `/api`.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod state;
pub mod telemetry;

use std::sync::Arc;

use actix_web::web;
use todo_core::ports::RateLimiter;

/// Everything an `App` needs besides `AppState` and the outer middleware:
/// extractor error handlers, routes and the 404 fallback.
pub fn configure_app(cfg: &mut web::ServiceConfig, auth_limiter: Arc<dyn RateLimiter>) {
    middleware::error::configure_extractors(cfg);
    handlers::configure_routes(cfg, auth_limiter);
    cfg.default_service(web::route().to(middleware::error::route_not_found));
}
