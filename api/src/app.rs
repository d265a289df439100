//! Application wiring
//!
//! Registers state, the principal validator, and all routes on an actix
//! `ServiceConfig`. Kept generic over the repository implementations so
//! integration tests can run the real HTTP surface against the in-memory
//! mocks.

use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::middleware::auth::{AuthGateway, PrincipalValidator};
use crate::routes::auth::{
    login::login, logout::logout, refresh::refresh, sessions::list_sessions, AppState,
};

use flock_core::repositories::{SessionRepository, UserCache, UserRepository};

/// Register application state and all routes
///
/// Use with `App::new().configure(|cfg| configure_app(cfg, state))`.
pub fn configure_app<U, S, C>(cfg: &mut web::ServiceConfig, app_state: web::Data<AppState<U, S, C>>)
where
    U: UserRepository + 'static,
    S: SessionRepository + 'static,
    C: UserCache + 'static,
{
    // The gateway consumes the auth service through its dyn interface
    let validator: Arc<dyn PrincipalValidator> = app_state.auth_service.clone();

    cfg.app_data(app_state)
        .app_data(web::Data::new(validator))
        // Health check endpoint
        .route("/health", web::get().to(health_check))
        // API v1 routes
        .service(
            web::scope("/api/v1").service(
                web::scope("/auth")
                    .route("/login", web::post().to(login::<U, S, C>))
                    .route("/refresh", web::post().to(refresh::<U, S, C>))
                    .route(
                        "/logout",
                        web::post().to(logout::<U, S, C>).wrap(AuthGateway),
                    )
                    .route(
                        "/sessions",
                        web::get().to(list_sessions::<U, S, C>).wrap(AuthGateway),
                    ),
            ),
        )
        // Default 404 handler
        .default_service(web::route().to(not_found));
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "flock-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": "not_found",
        "message": "The requested resource was not found"
    }))
}
