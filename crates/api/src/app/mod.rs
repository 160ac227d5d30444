//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store bundle + one service instance per domain crate
//! - `routes/`: HTTP routes + handlers (one file per resource family)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use crate::config::AppConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
pub fn build_app(config: AppConfig) -> Router {
    let services = Arc::new(services::build_services(&config));
    let auth_state = middleware::AuthState {
        tokens: services.tokens.clone(),
        trust_forwarded: config.trust_forwarded_identity,
    };

    // Resource routes sit behind the auth middleware; the auth endpoints
    // and the health probe handle credentials (or none) themselves.
    let protected = routes::protected_router().layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/auth", routes::auth::router())
        .merge(protected)
        .layer(ServiceBuilder::new().layer(Extension(services)))
}
