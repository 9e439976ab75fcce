use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{Uri, header};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use reqwest::Client;

use super::AppState;
use crate::config::ServerConfig;
use crate::error::{Error, Result};

/// Forwarding target for the transparent `/db/` passthrough. Requests
/// are relayed to the backend with the prefix stripped and the
/// configured admin credentials attached; status, headers and body come
/// back unchanged.
pub struct ProxyTarget {
    client: Client,
    base_url: String,
    username: String,
    password: String,
}

impl ProxyTarget {
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build proxy client: {e}")))?;
        Ok(Self {
            client,
            base_url: config.couch_url.trim_end_matches('/').to_string(),
            username: config.admin_username.clone(),
            password: config.admin_password.clone(),
        })
    }

    /// Rewrites `/db/<path>` to `<couch>/<path>`, keeping the query string.
    fn target_url(&self, uri: &Uri) -> String {
        let path = uri.path().strip_prefix("/db").unwrap_or(uri.path());
        let path = path.strip_prefix('/').unwrap_or(path);
        match uri.query() {
            Some(query) => format!("{}/{path}?{query}", self.base_url),
            None => format!("{}/{path}", self.base_url),
        }
    }

    async fn relay(&self, request: Request) -> Result<Response> {
        let (parts, body) = request.into_parts();
        let url = self.target_url(&parts.uri);
        let body = axum::body::to_bytes(body, usize::MAX)
            .await
            .map_err(|e| Error::Proxy(format!("failed to read request body: {e}")))?;

        let mut outbound = self
            .client
            .request(parts.method, url)
            .basic_auth(&self.username, Some(&self.password));
        for (name, value) in &parts.headers {
            if *name == header::HOST
                || *name == header::AUTHORIZATION
                || *name == header::CONTENT_LENGTH
            {
                continue;
            }
            outbound = outbound.header(name.clone(), value.clone());
        }

        let reply = outbound
            .body(body)
            .send()
            .await
            .map_err(|e| Error::Proxy(e.to_string()))?;

        let status = reply.status();
        let headers = reply.headers().clone();
        let bytes: Bytes = reply
            .bytes()
            .await
            .map_err(|e| Error::Proxy(e.to_string()))?;

        let mut response = Response::new(Body::from(bytes));
        *response.status_mut() = status;
        for (name, value) in &headers {
            if *name == header::TRANSFER_ENCODING || *name == header::CONNECTION {
                continue;
            }
            response.headers_mut().append(name.clone(), value.clone());
        }
        Ok(response)
    }
}

/// Handler behind `/db`, `/db/` and `/db/{*path}` for every method.
pub async fn forward(State(state): State<Arc<AppState>>, request: Request) -> Response {
    match state.proxy.relay(request).await {
        Ok(response) => response,
        Err(err) => {
            tracing::warn!("proxy request failed: {err}");
            err.into_response()
        }
    }
}
