use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};

use linkwise_core::IdentifyRequest;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/", post(identify))
}

pub async fn identify(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<dto::IdentifyRequestBody>, JsonRejection>,
) -> axum::response::Response {
    // A non-string email/phoneNumber (or malformed JSON) fails extraction;
    // both are the caller's fault, not a server error.
    let Json(body) = match payload {
        Ok(p) => p,
        Err(rejection) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_request",
                rejection.body_text(),
            );
        }
    };

    let request = match IdentifyRequest::new(body.email, body.phone_number) {
        Ok(r) => r,
        Err(e) => return errors::resolve_error_to_response(e),
    };

    match services.resolver.resolve(&request).await {
        Ok(view) => (
            StatusCode::OK,
            Json(dto::IdentifyResponseBody { contact: view }),
        )
            .into_response(),
        Err(e) => errors::resolve_error_to_response(e),
    }
}
