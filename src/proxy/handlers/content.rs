// Front-end build served from disk
use std::convert::Infallible;
use std::path::Path;

use axum::{
    extract::Request,
    response::{IntoResponse, Response},
};
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};

/// Serves the static site. Paths with no matching file fall back to the
/// application shell document so client-side routes resolve.
#[derive(Clone)]
pub struct ContentHandler {
    service: ServeDir<ServeFile>,
}

impl ContentHandler {
    pub fn new(static_dir: impl AsRef<Path>, fallback_document: &str) -> Self {
        let dir = static_dir.as_ref();
        let service = ServeDir::new(dir).fallback(ServeFile::new(dir.join(fallback_document)));
        Self { service }
    }

    pub async fn handle(&self, request: Request) -> Response {
        let result: Result<_, Infallible> = self.service.clone().oneshot(request).await;
        match result {
            Ok(response) => response.into_response(),
            Err(never) => match never {},
        }
    }
}
