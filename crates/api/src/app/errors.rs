use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use linkwise_core::ResolveError;

/// Map a resolver error to its HTTP response.
///
/// Invalid input is the caller's fault (400, message echoed); a store
/// failure is ours (500, cause logged, not echoed).
pub fn resolve_error_to_response(err: ResolveError) -> axum::response::Response {
    match err {
        ResolveError::InvalidRequest(msg) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_request", msg)
        }
        ResolveError::Store(cause) => {
            tracing::error!(error = %cause, "contact store failure");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "store_error",
                "internal server error",
            )
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
