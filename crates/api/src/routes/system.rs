//! System routes

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use linker_domain::LinkerError;
use serde_json::{json, Value};

use crate::context::AppContext;
use crate::error::ApiError;

/// GET /system/healthcheck - liveness plus a database ping.
pub async fn healthcheck(State(ctx): State<AppContext>) -> Result<Json<Value>, ApiError> {
    let db = Arc::clone(&ctx.db);
    tokio::task::spawn_blocking(move || db.health_check())
        .await
        .map_err(|err| LinkerError::Internal(format!("task join error: {err}")))??;

    Ok(Json(json!({"status": "ok"})))
}
