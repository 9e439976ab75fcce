mod common;

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use tower::ServiceExt;

use couch_persona::config::ServerConfig;
use couch_persona::identity;
use couch_persona::server::{AppState, create_router};

use common::{StubStore, StubVerifier};

const ALICE: &str = "alice@example.com";

fn test_app(verifier: StubVerifier, store: StubStore) -> Router {
    let config = ServerConfig {
        host_url: "https://auth.example.com".to_string(),
        ..ServerConfig::default()
    };
    let state = AppState::new(Arc::new(verifier), Arc::new(store), &config).unwrap();
    create_router(Arc::new(state))
}

fn sign_in_request() -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/persona/sign-in")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ORIGIN, "https://app.example.com")
        .body(Body::from(r#"{"assertion":"assertion-blob"}"#))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_sign_in_success_envelope_and_cookie() {
    let app = test_app(StubVerifier::accepting(ALICE), StubStore::empty());

    let response = app.oneshot(sign_in_request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("AuthSession="));

    let json = body_json(response).await;
    assert_eq!(json["ok"], true);
    assert_eq!(json["email"], ALICE);
    assert_eq!(json["name"], ALICE);
    assert_eq!(
        json["db"],
        format!(
            "https://auth.example.com/db/{}",
            identity::database_name(ALICE)
        )
    );
}

#[tokio::test]
async fn test_sign_in_rejection_reports_verifier_reason() {
    let app = test_app(
        StubVerifier::rejecting("assertion has expired"),
        StubStore::empty(),
    );

    let response = app.oneshot(sign_in_request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"], "assertion has expired");
}

#[tokio::test]
async fn test_sign_in_database_failure_reports_code() {
    let mut store = StubStore::empty();
    store.fail_ensure_database = true;
    let app = test_app(StubVerifier::accepting(ALICE), store);

    let response = app.oneshot(sign_in_request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"], "error_creating_database");
}

// Sign-out performs no server-side invalidation; the reply has always
// been a failure status wrapping an ok body.
#[tokio::test]
async fn test_sign_out_current_behavior() {
    let app = test_app(StubVerifier::accepting(ALICE), StubStore::empty());

    let request = Request::builder()
        .method("POST")
        .uri("/persona/sign-out")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["ok"], true);
}

#[tokio::test]
async fn test_health() {
    let app = test_app(StubVerifier::accepting(ALICE), StubStore::empty());

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_cors_headers_mirror_origin() {
    let app = test_app(StubVerifier::accepting(ALICE), StubStore::empty());

    let request = Request::builder()
        .method("POST")
        .uri("/persona/sign-out")
        .header(header::ORIGIN, "https://app.example.com")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let headers = response.headers();

    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "https://app.example.com"
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_METHODS).unwrap(),
        "GET,PUT,POST,DELETE"
    );
    assert_eq!(
        headers
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .unwrap(),
        "true"
    );
}
