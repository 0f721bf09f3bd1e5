use crate::error::AppResult;
use axum::body::Body;
use hyper_util::client::legacy::{connect::HttpConnector, Client as HyperClient};
use hyper_util::rt::TokioExecutor;
use reqwest::Client;
use std::time::Duration;

/// Connection-pooled HTTP/1 client used to relay gateway traffic
pub type RelayClient = HyperClient<HttpConnector, Body>;

/// Create the HTTP client used for backend API calls
pub fn create_client(timeout_secs: Option<u64>) -> AppResult<Client> {
    let mut builder = Client::builder();
    if let Some(secs) = timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    Ok(builder.build()?)
}

/// Create the client used for relaying gateway traffic.
/// It never follows redirects and never adds request headers beyond `Host`
/// when the caller sent none.
pub fn create_relay_client() -> RelayClient {
    HyperClient::builder(TokioExecutor::new()).build_http()
}
