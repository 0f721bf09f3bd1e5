use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, AppResult};

/// API client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout (seconds). None leaves the transport default.
    #[serde(default)]
    pub request_timeout: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout: None,
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:3000/api".to_string()
}

impl ClientConfig {
    pub fn parsed_base_url(&self) -> AppResult<Url> {
        let url = Url::parse(&self.base_url)?;
        if url.cannot_be_a_base() {
            return Err(AppError::Config(format!(
                "Base URL cannot carry paths: {}",
                self.base_url
            )));
        }
        Ok(url)
    }
}
