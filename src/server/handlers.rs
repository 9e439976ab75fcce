use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use super::AppState;
use super::dto::{SignInRequest, SignInResponse};
use crate::error::Error;
use crate::signin;

/// POST /persona/sign-in
///
/// The audience is taken from the request's Origin header, so the
/// verifier rejects assertions presented by a different origin than
/// they were issued for.
pub async fn sign_in(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<SignInRequest>,
) -> Response {
    let audience = headers
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    let record =
        match signin::sign_in(&*state.verifier, &*state.store, &req.assertion, audience).await {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!("sign-in failed: {err}");
                return err.into_response();
            }
        };

    let Some(token) = record.session_token.clone() else {
        return Error::SessionCreation("missing session token".to_string()).into_response();
    };

    let body = SignInResponse {
        ok: true,
        db: format!("{}/db/{}", state.public_url, record.db),
        email: record.name.clone(),
        name: record.name,
    };

    let cookie = format!("{}={token}", signin::AUTH_COOKIE);
    let Ok(cookie) = cookie.parse::<HeaderValue>() else {
        return Error::SessionCreation("session token is not header-safe".to_string())
            .into_response();
    };

    let mut response = (StatusCode::OK, Json(body)).into_response();
    response.headers_mut().insert(header::SET_COOKIE, cookie);
    response
}

/// POST /persona/sign-out
///
/// The session cookie lives client-side and is not sent back to us, so
/// there is nothing to invalidate here; callers get the historical
/// failure-shaped success reply.
pub async fn sign_out() -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "ok": true }))).into_response()
}
