//! Bearer API key gating for management routes
//!
//! A single shared key, compared by exact match against the
//! `Authorization: Bearer <key>` header. Browser-facing routes are gated
//! by token/session validity instead and never pass through here.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use linker_domain::LinkerError;

use crate::context::AppContext;
use crate::error::ApiError;

/// Middleware enforcing the shared API key.
pub async fn require_api_key(
    State(ctx): State<AppContext>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| LinkerError::Unauthorized("missing authorization header".into()))?;

    let token = match header.split_once(' ') {
        Some(("Bearer", token)) => token,
        _ => return Err(LinkerError::Unauthorized("malformed authorization header".into()).into()),
    };

    if token != ctx.config.server.api_key {
        return Err(LinkerError::Unauthorized("api key mismatch".into()).into());
    }

    Ok(next.run(request).await)
}
