// Request classification: reserved prefix goes upstream, everything else to the content handler

use axum::{
    extract::{Request, State},
    response::Response,
};
use tracing::debug;

use crate::proxy::server::AppState;

/// Where an inbound request is sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Forward to the backend with this path-and-query (prefix removed)
    Upstream(String),
    /// Serve from the front-end build
    Content,
}

/// Classify a request target against the reserved prefix.
///
/// Only paths of the form `{prefix}/...` match; the bare prefix does not.
/// The prefix is stripped once and the query string is kept as-is.
pub fn classify(prefix: &str, path_and_query: &str) -> Route {
    let prefix = prefix.trim_end_matches('/');
    match path_and_query.strip_prefix(prefix) {
        Some(rest) if rest.starts_with('/') => Route::Upstream(rest.to_string()),
        _ => Route::Content,
    }
}

/// Fallback handler for every inbound request
pub async fn dispatch(State(state): State<AppState>, request: Request) -> Response {
    let path_and_query = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/")
        .to_string();

    match classify(&state.api_prefix, &path_and_query) {
        Route::Upstream(target) => {
            debug!("Proxying {} -> {}", path_and_query, target);
            state.upstream.forward(request, &target).await
        }
        Route::Content => state.content.handle(request).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixed_paths_go_upstream() {
        assert_eq!(
            classify("/api", "/api/product_specs?keyword=x"),
            Route::Upstream("/product_specs?keyword=x".to_string())
        );
        assert_eq!(
            classify("/api", "/api/product_repo/3/stock/SN-1"),
            Route::Upstream("/product_repo/3/stock/SN-1".to_string())
        );
        assert_eq!(classify("/api", "/api/"), Route::Upstream("/".to_string()));
    }

    #[test]
    fn test_prefix_is_stripped_once() {
        assert_eq!(
            classify("/api", "/api/api/login"),
            Route::Upstream("/api/login".to_string())
        );
    }

    #[test]
    fn test_other_paths_go_to_content() {
        assert_eq!(classify("/api", "/"), Route::Content);
        assert_eq!(classify("/api", "/api"), Route::Content);
        assert_eq!(classify("/api", "/api?x=1"), Route::Content);
        assert_eq!(classify("/api", "/apis/list"), Route::Content);
        assert_eq!(classify("/api", "/login?redirect=%2Fapi%2F"), Route::Content);
    }

    #[test]
    fn test_trailing_slash_in_prefix() {
        assert_eq!(
            classify("/api/", "/api/materials"),
            Route::Upstream("/materials".to_string())
        );
    }
}
