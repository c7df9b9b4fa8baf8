use axum::http::HeaderMap;

use stockroom_core::SessionId;

/// Header carrying the opaque session id in both directions.
pub const SESSION_HEADER: &str = "x-session-id";

/// Session context for a request.
///
/// Inserted by the session middleware; present for all inventory routes.
/// Holds only what the client presented: the store decides, atomically with
/// the inventory access, which session is actually used.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SessionContext {
    presented: Option<SessionId>,
}

impl SessionContext {
    pub fn new(presented: Option<SessionId>) -> Self {
        Self { presented }
    }

    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self::new(presented_session(headers))
    }

    pub fn presented(&self) -> Option<SessionId> {
        self.presented
    }
}

/// Response extension naming the session a handler actually used. The
/// session middleware turns it into the response header.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ResolvedSession(pub SessionId);

/// The session id the client sent, if it is present and well-formed.
pub fn presented_session(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get(SESSION_HEADER)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}
