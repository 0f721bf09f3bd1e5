pub mod auth;
pub mod config;
pub mod logger;

// Re-export commonly used items at the modules namespace level
pub use auth::{AuthSession, FileTokenStorage, MemoryTokenStorage, Navigator, TokenStorage};
pub use config::*;
pub use logger::*;
