use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::{
    Router,
    routing::{any, get, post},
};

use super::cors;
use super::handlers;
use super::proxy::{self, ProxyTarget};
use crate::auth::AssertionVerifier;
use crate::config::ServerConfig;
use crate::error::Result;
use crate::store::CouchStore;

pub struct AppState {
    pub verifier: Arc<dyn AssertionVerifier>,
    pub store: Arc<dyn CouchStore>,
    pub proxy: ProxyTarget,
    /// Externally reachable base URL, reported in the sign-in envelope.
    pub public_url: String,
}

impl AppState {
    pub fn new(
        verifier: Arc<dyn AssertionVerifier>,
        store: Arc<dyn CouchStore>,
        config: &ServerConfig,
    ) -> Result<Self> {
        Ok(Self {
            verifier,
            store,
            proxy: ProxyTarget::new(config)?,
            public_url: config.host_url.trim_end_matches('/').to_string(),
        })
    }
}

async fn health() -> &'static str {
    "OK"
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    tracing::info!(
        "{} {} {} {}ms",
        method,
        uri.path(),
        status.as_u16(),
        latency.as_millis()
    );

    response
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/persona/sign-in", post(handlers::sign_in))
        .route("/persona/sign-out", post(handlers::sign_out))
        .route("/db", any(proxy::forward))
        .route("/db/", any(proxy::forward))
        .route("/db/{*path}", any(proxy::forward))
        .layer(middleware::from_fn(log_request))
        .layer(middleware::from_fn(cors::allow_cross_domain))
        .with_state(state)
}
