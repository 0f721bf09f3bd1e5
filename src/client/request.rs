use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::error::{AppError, AppResult};

/// One backend call: verb, path segments, query pairs and an optional JSON body.
///
/// Segments are percent-encoded individually, so values such as serial numbers
/// or order numbers cannot escape their position in the path. Query pairs are
/// form-urlencoded in insertion order.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub(crate) method: Method,
    segments: Vec<String>,
    query: Vec<(String, String)>,
    pub(crate) body: Option<Value>,
    pub(crate) authenticated: bool,
}

impl ApiRequest {
    /// `path` is split on `/`; empty pieces are dropped
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            segments: path
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            query: Vec::new(),
            body: None,
            authenticated: true,
        }
    }

    pub fn get(path: &str) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: &str) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: &str) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: &str) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append a single path segment, encoded as a whole
    pub fn segment(mut self, segment: impl ToString) -> Self {
        self.segments.push(segment.to_string());
        self
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Append a query pair unless the value is absent or empty
    pub fn query_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value.map(|v| v.to_string()).filter(|v| !v.is_empty()) {
            Some(v) => self.query(key, v),
            None => self,
        }
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> AppResult<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// A credential rejection on this call is reported as a plain failure
    pub fn unauthenticated(mut self) -> Self {
        self.authenticated = false;
        self
    }

    pub fn url(&self, base: &Url) -> AppResult<Url> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Config(format!("Base URL cannot carry paths: {}", base)))?
            .pop_if_empty()
            .extend(&self.segments);
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(self.query.iter());
        }
        Ok(url)
    }

    /// `METHOD /path` for log lines
    pub fn describe(&self) -> String {
        format!("{} /{}", self.method, self.segments.join("/"))
    }
}
