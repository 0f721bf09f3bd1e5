use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Listening port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Whether other hosts may connect
    /// - false: loopback only 127.0.0.1
    /// - true: all interfaces 0.0.0.0 (default)
    #[serde(default = "default_allow_lan_access")]
    pub allow_lan_access: bool,

    /// Reserved path prefix proxied to the backend
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,

    /// Backend API address (http://host:port)
    #[serde(default = "default_upstream_url")]
    pub upstream_url: String,

    /// Directory holding the built front end
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    /// Document served for unknown paths, relative to `static_dir`
    #[serde(default = "default_fallback_document")]
    pub fallback_document: String,

    /// Upstream request timeout (seconds). None leaves the transport default.
    #[serde(default)]
    pub request_timeout: Option<u64>,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            allow_lan_access: default_allow_lan_access(),
            api_prefix: default_api_prefix(),
            upstream_url: default_upstream_url(),
            static_dir: default_static_dir(),
            fallback_document: default_fallback_document(),
            request_timeout: None,
        }
    }
}

fn default_port() -> u16 {
    3000
}

fn default_allow_lan_access() -> bool {
    true
}

fn default_api_prefix() -> String {
    "/api".to_string()
}

fn default_upstream_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_static_dir() -> String {
    "build".to_string()
}

fn default_fallback_document() -> String {
    "index.html".to_string()
}

impl ProxyConfig {
    /// Get the actual listen address
    /// - allow_lan_access = false: "127.0.0.1"
    /// - allow_lan_access = true: "0.0.0.0"
    pub fn get_bind_address(&self) -> &str {
        if self.allow_lan_access {
            "0.0.0.0"
        } else {
            "127.0.0.1"
        }
    }

    /// Apply `PORT`, `API_SERVER`, `STATIC_DIR` and `ALLOW_LAN_ACCESS` from the process environment
    pub fn apply_env(&mut self) -> AppResult<()> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    pub fn apply_env_with<F>(&mut self, lookup: F) -> AppResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT").filter(|v| !v.trim().is_empty()) {
            self.port = port
                .trim()
                .parse()
                .map_err(|e| AppError::Config(format!("Invalid PORT {:?}: {}", port, e)))?;
        }
        if let Some(upstream) = lookup("API_SERVER").filter(|v| !v.trim().is_empty()) {
            self.upstream_url = upstream.trim().to_string();
        }
        if let Some(dir) = lookup("STATIC_DIR").filter(|v| !v.trim().is_empty()) {
            self.static_dir = dir;
        }
        if let Some(flag) = lookup("ALLOW_LAN_ACCESS") {
            self.allow_lan_access = match flag.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                other => {
                    return Err(AppError::Config(format!(
                        "Invalid ALLOW_LAN_ACCESS {:?}",
                        other
                    )))
                }
            };
        }
        Ok(())
    }
}
