//! Domain error → HTTP response mapping
//!
//! API routes answer structured JSON; everything unclassified collapses
//! into the generic 500 envelope at this single boundary, so no partial
//! response bytes ever precede an error body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use linker_domain::LinkerError;
use serde_json::json;
use tracing::error;

/// Wrapper that carries a domain error out of a handler
#[derive(Debug)]
pub struct ApiError(pub LinkerError);

impl From<LinkerError> for ApiError {
    fn from(err: LinkerError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            LinkerError::Unauthorized(_) => {
                (StatusCode::UNAUTHORIZED, Json(json!({"detail": "Unauthorized"}))).into_response()
            }
            LinkerError::NotFound(_) => {
                (StatusCode::NOT_FOUND, Json(json!({"detail": "Not Found"}))).into_response()
            }
            LinkerError::InvalidToken(_)
            | LinkerError::InvalidSession(_)
            | LinkerError::StateMismatch(_)
            | LinkerError::UnsupportedChallengeMethod(_)
            | LinkerError::InvalidInput(_) => {
                (StatusCode::BAD_REQUEST, Json(json!({"detail": "Bad Request"}))).into_response()
            }
            LinkerError::UpstreamExchange(_) => {
                (StatusCode::BAD_REQUEST, Json(json!({"detail": "Bad Request"}))).into_response()
            }
            err => {
                error!(error = %err, "request failed with internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"status": "internal server error"})),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_maps_to_401() {
        let response = ApiError(LinkerError::Unauthorized("bad key".into())).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn not_found_maps_to_404() {
        let response = ApiError(LinkerError::NotFound("missing".into())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn database_errors_collapse_into_the_generic_envelope() {
        let response = ApiError(LinkerError::Database("disk gone".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
