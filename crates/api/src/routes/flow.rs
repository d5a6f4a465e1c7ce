//! Linking flow routes: /start, /auth, /callback, /recheck

use axum::extract::{Query, State};
use axum::http::header::{LOCATION, SET_COOKIE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use linker_domain::LinkerError;

use crate::context::AppContext;
use crate::dto::{
    AuthQuery, CallbackQuery, FlowStartRequest, FlowStartResponse, RecheckRequest,
    RecheckResponse,
};
use crate::error::ApiError;
use crate::session;
use crate::views;

/// POST /v1/start - issue a linking token for a Discord account.
pub async fn start(
    State(ctx): State<AppContext>,
    Json(body): Json<FlowStartRequest>,
) -> Result<Json<FlowStartResponse>, ApiError> {
    let profile = body.discord.into_profile()?;
    let token = ctx.linking.start_flow(&profile).await?;

    Ok(Json(FlowStartResponse {
        url: format!("{}/v1/auth?token={token}", ctx.config.server.site_url),
    }))
}

/// GET /v1/auth?token= - validate the token and bounce to the provider.
pub async fn auth(
    State(ctx): State<AppContext>,
    Query(query): Query<AuthQuery>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let Some(account) = ctx.linking.resolve_account_from_token(&query.token).await? else {
        return Ok(error_page_response(StatusCode::BAD_REQUEST, "invalid token"));
    };

    let session_id = session::session_id_or_new(&headers);
    let url = ctx.linking.begin_authorization(&session_id, &account, &query.token).await?;

    Ok((
        StatusCode::FOUND,
        [(LOCATION, url), (SET_COOKIE, session::session_cookie(&session_id))],
        (),
    )
        .into_response())
}

/// GET /v1/callback?code=&state= - consume the provider callback.
pub async fn callback(
    State(ctx): State<AppContext>,
    Query(query): Query<CallbackQuery>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let Some(session_id) = session::session_id_from_headers(&headers) else {
        return Ok(error_page_response(StatusCode::BAD_REQUEST, "invalid session"));
    };

    match ctx.linking.complete_callback(&session_id, &query.code, &query.state).await {
        Ok(outcome) => {
            let message = if outcome.newly_linked {
                "Accounts linked successfully."
            } else {
                "These accounts are already linked."
            };
            let page = views::success_page(message, &outcome.discord, &outcome.wikidot);

            Ok((
                StatusCode::OK,
                [(SET_COOKIE, session::session_cookie(&session_id))],
                Html(page),
            )
                .into_response())
        }
        Err(LinkerError::InvalidSession(_)) => {
            Ok(error_page_response(StatusCode::BAD_REQUEST, "invalid session"))
        }
        Err(LinkerError::StateMismatch(_)) => {
            Ok(error_page_response(StatusCode::BAD_REQUEST, "invalid state"))
        }
        Err(LinkerError::UpstreamExchange(_)) => {
            Ok(error_page_response(StatusCode::BAD_REQUEST, "invalid token"))
        }
        Err(LinkerError::NotFound(_)) => {
            Ok(error_page_response(StatusCode::NOT_FOUND, "discord id not found"))
        }
        Err(err) => Err(err.into()),
    }
}

/// POST /v1/recheck - refresh display fields and membership flags.
pub async fn recheck(
    State(ctx): State<AppContext>,
    Json(body): Json<RecheckRequest>,
) -> Result<Json<RecheckResponse>, ApiError> {
    let profile = body.discord.into_profile()?;
    let outcome = ctx.linking.recheck(&profile).await?;

    Ok(Json(RecheckResponse {
        discord: (&outcome.discord).into(),
        wikidot: outcome.wikidot.iter().map(Into::into).collect(),
    }))
}

fn error_page_response(status: StatusCode, error_code: &str) -> Response {
    (status, Html(views::error_page(error_code))).into_response()
}
