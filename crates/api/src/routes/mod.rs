//! Router assembly
//!
//! Management routes sit behind the shared API key; `/v1/auth` and
//! `/v1/callback` are reached via browser redirect and are gated by
//! token/session validity instead.

pub mod flow;
pub mod manage;
pub mod system;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::middleware;
use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::require_api_key;
use crate::context::AppContext;

/// Build the application router.
pub fn router(ctx: AppContext) -> Router {
    let protected = Router::new()
        .route("/start", post(flow::start))
        .route("/recheck", post(flow::recheck))
        .route("/list", post(manage::list))
        .route("/list/discord", get(manage::list_discord))
        .route("/list/wikidot", get(manage::list_wikidot))
        .route("/unlink", patch(manage::unlink))
        .route("/relink", patch(manage::relink))
        .route_layer(middleware::from_fn_with_state(ctx.clone(), require_api_key));

    let browser =
        Router::new().route("/auth", get(flow::auth)).route("/callback", get(flow::callback));

    Router::new()
        .nest("/v1", protected.merge(browser))
        .route("/system/healthcheck", get(system::healthcheck))
        .layer(cors_layer(&ctx.config.server.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> =
        origins.iter().filter_map(|origin| origin.parse().ok()).collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PATCH])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}
