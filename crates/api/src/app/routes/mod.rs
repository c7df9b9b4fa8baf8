use axum::Router;

pub mod inventory;
pub mod session;
pub mod system;

/// Router for all session-scoped endpoints.
pub fn router() -> Router {
    Router::new().merge(inventory::router())
}
