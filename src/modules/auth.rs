//! Credential lifecycle for the backend API.
//!
//! An [`AuthSession`] owns the bearer token: a reactive in-memory cell that
//! UI code can subscribe to, plus an optional durable [`TokenStorage`]. A
//! session without storage models a context that cannot reach durable
//! storage (server-side rendering): it never yields a token.
//!
//! Navigation to the login view goes through an injected [`Navigator`]; the
//! session itself never decides where the user ends up.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

use reqwest::Client;
use serde_json::{Map, Value};
use tokio::sync::watch;
use url::{form_urlencoded, Url};

use crate::client::{ApiRequest, ClientConfig};
use crate::error::{AppError, AppResult};
use crate::models::Credentials;

/// Key the token is stored under
pub const TOKEN_KEY: &str = "token";

const SESSION_FILE: &str = "session.json";

/// Durable token storage
pub trait TokenStorage: Send + Sync {
    fn load(&self) -> AppResult<Option<String>>;
    fn store(&self, token: &str) -> AppResult<()>;
    fn remove(&self) -> AppResult<()>;
}

/// Memory-only storage, for tests and short-lived tools
#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn load(&self) -> AppResult<Option<String>> {
        self.token
            .read()
            .map(|t| t.clone())
            .map_err(|e| AppError::Storage(format!("Failed to acquire lock: {}", e)))
    }

    fn store(&self, token: &str) -> AppResult<()> {
        let mut slot = self
            .token
            .write()
            .map_err(|e| AppError::Storage(format!("Failed to acquire lock: {}", e)))?;
        *slot = Some(token.to_string());
        Ok(())
    }

    fn remove(&self) -> AppResult<()> {
        let mut slot = self
            .token
            .write()
            .map_err(|e| AppError::Storage(format!("Failed to acquire lock: {}", e)))?;
        *slot = None;
        Ok(())
    }
}

/// Key/value JSON file persisted across restarts
#[derive(Debug)]
pub struct FileTokenStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileTokenStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// `session.json` in the application data directory
    pub fn in_data_dir() -> AppResult<Self> {
        Ok(Self::new(
            crate::modules::config::get_data_dir()?.join(SESSION_FILE),
        ))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> AppResult<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let content = fs::read_to_string(&self.path)?;
        serde_json::from_str(&content).map_err(|e| {
            AppError::Storage(format!("Failed to parse {:?}: {}", self.path, e))
        })
    }

    /// Atomic write: temp file then rename
    fn write_entries(&self, entries: &Map<String, Value>) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, serde_json::to_string_pretty(entries)?)?;
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }

    fn update<F>(&self, apply: F) -> AppResult<()>
    where
        F: FnOnce(&mut Map<String, Value>),
    {
        let _lock = self
            .write_lock
            .lock()
            .map_err(|e| AppError::Storage(format!("Failed to acquire lock: {}", e)))?;
        let mut entries = self.read_entries()?;
        apply(&mut entries);
        self.write_entries(&entries)
    }
}

impl TokenStorage for FileTokenStorage {
    fn load(&self) -> AppResult<Option<String>> {
        // A non-string token entry reads as no token
        Ok(self
            .read_entries()?
            .remove(TOKEN_KEY)
            .and_then(|v| v.as_str().map(str::to_string)))
    }

    fn store(&self, token: &str) -> AppResult<()> {
        self.update(|entries| {
            entries.insert(TOKEN_KEY.to_string(), Value::from(token));
        })
    }

    fn remove(&self) -> AppResult<()> {
        self.update(|entries| {
            entries.remove(TOKEN_KEY);
        })
    }
}

/// Supplied by the UI layer: where the user is, and how to send them elsewhere
pub trait Navigator: Send + Sync {
    fn current_location(&self) -> String;
    fn navigate(&self, location: &str);
}

/// Login view location carrying the page to come back to
pub fn login_url(return_path: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("redirect", return_path)
        .finish();
    format!("/login?{}", query)
}

pub struct AuthSession {
    http_client: Client,
    base_url: Url,
    storage: Option<Arc<dyn TokenStorage>>,
    navigator: Option<Arc<dyn Navigator>>,
    token_tx: watch::Sender<Option<String>>,
}

impl AuthSession {
    /// Session without durable storage or navigation
    pub fn new(config: &ClientConfig) -> AppResult<Self> {
        let (token_tx, _) = watch::channel(None);
        Ok(Self {
            http_client: crate::utils::http::create_client(config.request_timeout)?,
            base_url: config.parsed_base_url()?,
            storage: None,
            navigator: None,
            token_tx,
        })
    }

    /// Attach durable storage. A token already stored there is picked up.
    pub fn with_storage(mut self, storage: Arc<dyn TokenStorage>) -> Self {
        self.storage = Some(storage);
        let restored = self.get_token();
        self.token_tx.send_replace(restored);
        self
    }

    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Observe token changes (login, logout, rejection)
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.token_tx.subscribe()
    }

    /// Exchange credentials for a token. Failures are logged, never raised.
    pub async fn login(&self, username: &str, password: &str) -> bool {
        match self.try_login(username, password).await {
            Ok(logged_in) => logged_in,
            Err(e) => {
                tracing::error!("Login failed: {}", e);
                false
            }
        }
    }

    async fn try_login(&self, username: &str, password: &str) -> AppResult<bool> {
        let url = ApiRequest::post("login").url(&self.base_url)?;
        let response = self
            .http_client
            .post(url)
            .json(&Credentials {
                email: username.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::warn!("Login rejected with status {}", response.status());
            return Ok(false);
        }

        let token: String = response.json().await?;
        if token.is_empty() {
            tracing::warn!("Login succeeded but no token was returned");
            return Ok(false);
        }

        if let Some(storage) = &self.storage {
            storage.store(&token)?;
        }
        self.token_tx.send_replace(Some(token));
        tracing::info!("Logged in as {}", username);
        Ok(true)
    }

    pub fn is_authenticated(&self) -> bool {
        self.get_token().is_some()
    }

    /// Send the user to the login view when there is no token.
    /// Returns whether the caller may proceed.
    pub fn require_auth(&self, return_path: &str) -> bool {
        if self.is_authenticated() {
            return true;
        }
        self.navigate(&login_url(return_path));
        false
    }

    /// The backend rejected the token: drop it and go to the login view
    pub fn reauthenticate(&self, return_path: &str) {
        self.logout();
        self.navigate(&login_url(return_path));
    }

    pub fn logout(&self) {
        self.token_tx.send_replace(None);
        if let Some(storage) = &self.storage {
            if let Err(e) = storage.remove() {
                tracing::warn!("Failed to clear stored token: {}", e);
            }
        }
    }

    /// The durably stored token. Always `None` without storage.
    pub fn get_token(&self) -> Option<String> {
        let storage = self.storage.as_ref()?;
        match storage.load() {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!("Failed to read stored token: {}", e);
                None
            }
        }
    }

    pub fn current_location(&self) -> String {
        self.navigator
            .as_ref()
            .map(|n| n.current_location())
            .unwrap_or_else(|| "/".to_string())
    }

    fn navigate(&self, location: &str) {
        match &self.navigator {
            Some(navigator) => navigator.navigate(location),
            None => tracing::debug!("No navigator attached, skipping redirect to {}", location),
        }
    }
}
