// Upstream client implementation
// Relays proxied requests to the backend API server

use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    extract::Request,
    http::{header, HeaderMap, HeaderName, StatusCode, Uri},
    response::{IntoResponse, Response},
};

use crate::error::{AppError, AppResult};
use crate::utils::http::{create_relay_client, RelayClient};

/// Largest request body relayed to the backend
const MAX_BODY_BYTES: usize = 100 * 1024 * 1024;

/// Connection-scoped headers that must not be relayed
fn is_hop_by_hop(name: &HeaderName) -> bool {
    matches!(
        name.as_str(),
        "connection"
            | "keep-alive"
            | "proxy-authenticate"
            | "proxy-authorization"
            | "te"
            | "trailer"
            | "transfer-encoding"
            | "upgrade"
    )
}

fn copy_headers(from: &HeaderMap, to: &mut HeaderMap, skip: &[HeaderName]) {
    for (name, value) in from {
        if is_hop_by_hop(name) || skip.contains(name) {
            continue;
        }
        to.append(name.clone(), value.clone());
    }
}

pub struct UpstreamClient {
    http_client: RelayClient,
    base_url: String,
    timeout: Option<Duration>,
    body_limit: usize,
}

impl UpstreamClient {
    /// `base_url` must be a plain `http://host:port` address
    pub fn new(base_url: &str, timeout_secs: Option<u64>) -> AppResult<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let uri: Uri = base_url
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid upstream URL {:?}: {}", base_url, e)))?;
        if uri.scheme_str() != Some("http") || uri.authority().is_none() {
            return Err(AppError::Config(format!(
                "Upstream URL must be http://host[:port], got {:?}",
                base_url
            )));
        }
        if let Some(secs) = timeout_secs {
            tracing::info!("Upstream timeout set to {}s", secs);
        }

        Ok(Self {
            http_client: create_relay_client(),
            base_url,
            timeout: timeout_secs.map(Duration::from_secs),
            body_limit: MAX_BODY_BYTES,
        })
    }

    /// Cap on buffered request bodies; larger ones get 413
    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }

    /// Build the backend URL for a rewritten path-and-query
    fn build_url(&self, path_and_query: &str) -> String {
        format!("{}{}", self.base_url, path_and_query)
    }

    /// Relay a request to the backend and hand its response back verbatim.
    ///
    /// End-to-end headers, `Host` included, pass through untouched; nothing is
    /// added on the way. Transport failures become 502 Bad Gateway, timeouts
    /// 504 Gateway Timeout. Nothing is retried.
    pub async fn forward(&self, request: Request, path_and_query: &str) -> Response {
        let url = self.build_url(path_and_query);
        let (parts, body) = request.into_parts();

        let uri: Uri = match url.parse() {
            Ok(uri) => uri,
            Err(e) => {
                tracing::warn!("Cannot relay to {}: {}", url, e);
                return (StatusCode::BAD_REQUEST, "Invalid request target").into_response();
            }
        };

        let body = match to_bytes(body, self.body_limit).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Rejected request body for {}: {}", url, e);
                return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
            }
        };

        let mut upstream_request = Request::new(Body::from(body));
        *upstream_request.method_mut() = parts.method.clone();
        *upstream_request.uri_mut() = uri;
        copy_headers(
            &parts.headers,
            upstream_request.headers_mut(),
            &[header::CONTENT_LENGTH],
        );

        let pending = self.http_client.request(upstream_request);
        let result = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, pending).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::error!("Upstream timed out: {} {}", parts.method, url);
                    return (StatusCode::GATEWAY_TIMEOUT, "Upstream request timed out")
                        .into_response();
                }
            },
            None => pending.await,
        };

        let relayed = result
            .map_err(|e| AppError::Server(format!("Upstream transport: {}", e)))
            .and_then(Self::relay_response);
        match relayed {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Upstream request failed: {} {}: {}", parts.method, url, e);
                (StatusCode::BAD_GATEWAY, "Upstream unavailable").into_response()
            }
        }
    }

    fn relay_response(upstream: Response<hyper::body::Incoming>) -> AppResult<Response> {
        let (parts, body) = upstream.into_parts();
        let mut builder = Response::builder().status(parts.status);
        if let Some(headers) = builder.headers_mut() {
            copy_headers(&parts.headers, headers, &[]);
        }
        builder
            .body(Body::new(body))
            .map_err(|e| AppError::Server(format!("Failed to build response: {}", e)))
    }
}
