use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::error::Error;

/// Every pipeline failure surfaces to the caller as a 400 with a
/// machine-readable code; configuration errors never reach a request
/// handler in normal operation.
#[must_use]
pub fn status_for(error: &Error) -> StatusCode {
    match error {
        Error::VerificationFailed(_)
        | Error::RecordPersist(_)
        | Error::NamespaceProvision(_)
        | Error::PolicyApply(_)
        | Error::SessionCreation(_) => StatusCode::BAD_REQUEST,
        Error::Proxy(_) => StatusCode::BAD_GATEWAY,
        Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let body = json!({ "error": self.code() });
        (status_for(&self), Json(body)).into_response()
    }
}
