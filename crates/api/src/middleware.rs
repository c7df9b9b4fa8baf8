use axum::{
    http::HeaderValue,
    middleware::Next,
    response::Response,
};

use stockroom_core::SessionId;

use crate::context::{ResolvedSession, SessionContext, SESSION_HEADER};

/// Hand the presented session id to the handler and echo back the session it
/// actually used, so a client without a live session learns its new one.
pub async fn session_middleware(
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let context = SessionContext::from_headers(req.headers());
    req.extensions_mut().insert(context);

    let mut res = next.run(req).await;
    if let Some(ResolvedSession(session_id)) = res.extensions().get::<ResolvedSession>().copied() {
        attach_session_header(&mut res, session_id);
    }
    res
}

pub fn attach_session_header(res: &mut Response, session_id: SessionId) {
    if let Ok(value) = HeaderValue::from_str(&session_id.to_string()) {
        res.headers_mut().insert(SESSION_HEADER, value);
    }
}
