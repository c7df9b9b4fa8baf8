use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};

use stockroom_core::{DomainError, SessionId};

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::{ResolvedSession, SessionContext};

pub fn router() -> Router {
    Router::new()
        .route("/inventory", get(list_items))
        .route("/inventory/items", get(list_items).post(add_item))
        .route("/inventory/items/:reference", delete(remove_item))
}

pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> Response {
    let (session_id, body) = services.listing(session.presented());
    (Extension(ResolvedSession(session_id)), Json(body)).into_response()
}

pub async fn add_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    body: Result<Json<dto::AddItemRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    let (session_id, added) = services.add_item(session.presented(), body);
    respond(session_id, StatusCode::CREATED, added)
}

pub async fn remove_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Path(reference): Path<String>,
) -> Response {
    let (session_id, removed) = services.remove_item(session.presented(), &reference);
    respond(session_id, StatusCode::OK, removed)
}

fn respond(
    session_id: SessionId,
    status: StatusCode,
    outcome: Result<serde_json::Value, DomainError>,
) -> Response {
    let res = match outcome {
        Ok(body) => (status, Json(body)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    };
    (Extension(ResolvedSession(session_id)), res).into_response()
}
