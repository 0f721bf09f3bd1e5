// proxy module - request router and reverse proxy for the backend API

pub mod config;
pub mod handlers; // Requests served by the gateway itself
pub mod middleware; // Axum middleware
pub mod router; // Prefix classification and dispatch
pub mod server;
pub mod upstream; // Upstream client

pub use config::ProxyConfig;
pub use router::{classify, Route};
pub use server::AxumServer;
