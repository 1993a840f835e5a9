//! Cookie-based session identity.
//!
//! Every request gets a [`SessionId`] in its extensions: either parsed from
//! the session cookie or freshly generated, in which case the response sets
//! the cookie.

use axum::{
    extract::Request,
    http::{header, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::domain::SessionId;

pub const SESSION_COOKIE: &str = "halomod_session";

pub async fn session_identity(mut request: Request, next: Next) -> Response {
    let existing = request
        .headers()
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_session_cookie);

    let (id, fresh) = match existing {
        Some(id) => (id, false),
        None => (SessionId::generate(), true),
    };
    request.extensions_mut().insert(id);

    let mut response = next.run(request).await;

    if fresh {
        debug!(session = %id, "issued new session cookie");
        let cookie = format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax");
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }

    response
}

fn parse_session_cookie(header: &str) -> Option<SessionId> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| value.trim().parse().ok())
}
