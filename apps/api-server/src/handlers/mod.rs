//! HTTP handlers and route configuration.

mod auth;
pub mod docs;
mod health;
mod todos;

use std::sync::Arc;

use actix_web::web;
use todo_core::ports::RateLimiter;

use crate::middleware::rate_limit::RateLimitMiddleware;

/// Configure all application routes. `auth_limiter` throttles everything
/// under `/api/auth`.
pub fn configure_routes(cfg: &mut web::ServiceConfig, auth_limiter: Arc<dyn RateLimiter>) {
    cfg.service(
        web::scope("/api-docs")
            .route("", web::get().to(docs::swagger_ui))
            .route("/openapi.json", web::get().to(docs::openapi_json)),
    )
    .service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/auth")
                    .wrap(RateLimitMiddleware::new(auth_limiter))
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            // Protected routes
            .service(
                web::scope("/todos")
                    .route("", web::get().to(todos::list))
                    .route("", web::post().to(todos::create))
                    .route("/grouped", web::get().to(todos::grouped))
                    .route("/{id}", web::get().to(todos::get))
                    .route("/{id}", web::put().to(todos::update))
                    .route("/{id}", web::delete().to(todos::delete)),
            ),
    );
}
