//! Session cookie handling for the browser-facing routes
//!
//! A session is an opaque uuid carried in a cookie; the id is minted on
//! first contact and re-sent with every browser response so the store's
//! idle TTL keeps sliding.

use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use linker_domain::constants::SESSION_COOKIE_NAME;
use uuid::Uuid;

/// Extract the session id from the request cookies, if present.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE_NAME).then(|| value.to_string())
    })
}

/// Extract the session id, or mint a fresh one.
pub fn session_id_or_new(headers: &HeaderMap) -> String {
    session_id_from_headers(headers).unwrap_or_else(new_session_id)
}

/// Mint a new opaque session id.
pub fn new_session_id() -> String {
    Uuid::now_v7().to_string()
}

/// `Set-Cookie` value re-issuing the session id.
pub fn session_cookie(session_id: &str) -> String {
    format!("{SESSION_COOKIE_NAME}={session_id}; Path=/; HttpOnly; SameSite=Lax")
}
