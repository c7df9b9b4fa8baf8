use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::app::errors;
use crate::app::services::AppServices;
use crate::context;
use crate::middleware::attach_session_header;

pub async fn start_session(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let session_id = services.store().start_session();

    let mut res = (
        StatusCode::CREATED,
        Json(serde_json::json!({
            "session_id": session_id.to_string(),
            "scope": services.store().scope(),
        })),
    )
        .into_response();
    attach_session_header(&mut res, session_id);
    res
}

/// Discard the caller's session and its inventory. Ending an unknown or
/// already expired session is not an error.
pub async fn end_session(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
) -> axum::response::Response {
    let Some(session_id) = context::presented_session(&headers) else {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_id",
            format!("a valid {} header is required", context::SESSION_HEADER),
        );
    };

    services.store().end_session(session_id);
    StatusCode::NO_CONTENT.into_response()
}
