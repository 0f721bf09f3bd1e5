// Typed client for the inventory backend API

pub mod api;
pub mod config;
pub mod request;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use request::ApiRequest;
