//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store, orchestrator, catalog and authenticator wiring
//! - `routes/`: HTTP routes + handlers (one file per module)
//! - `dto.rs`: request DTOs that need server-side data before they become commands
//! - `errors.rs`: consistent JSON error responses

use std::sync::Arc;

use axum::{
    Extension, Router,
    routing::{get, post},
};
use tower::ServiceBuilder;

use crate::config::AppConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router from configuration (used by `main.rs`).
pub fn build_app(config: &AppConfig) -> anyhow::Result<Router> {
    let services = services::AppServices::from_config(config)?;
    Ok(router(Arc::new(services)))
}

/// Build the router around already-wired services.
pub fn router(services: Arc<services::AppServices>) -> Router {
    let auth_state = middleware::AuthState {
        auth: services.auth.clone(),
    };

    // Protected routes: bearer token required; each handler gates its module.
    let protected = routes::router().layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    Router::new()
        .route("/health", get(routes::system::health))
        .route("/auth/login", post(routes::auth::login))
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::request_log))
                .layer(Extension(services)),
        )
}
