use crate::client::ClientConfig;
use crate::proxy::ProxyConfig;
use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Gateway (router + proxy) settings
    #[serde(default)]
    pub proxy: ProxyConfig,
    /// Settings for consumers of the backend API client
    #[serde(default)]
    pub client: ClientConfig,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }
}
