//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: inventory store and the operations handlers call
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(services: AppServices) -> Router {
    let services = Arc::new(services);

    // Session-scoped routes: every request gets a resolved session.
    let scoped = routes::router().layer(axum::middleware::from_fn(middleware::session_middleware));

    Router::new()
        .route("/health", get(routes::system::health))
        .route(
            "/session",
            post(routes::session::start_session).delete(routes::session::end_session),
        )
        .merge(scoped)
        .layer(ServiceBuilder::new().layer(Extension(services)))
}
