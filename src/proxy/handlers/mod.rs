// Handlers for requests that stay on the gateway
pub mod content;

pub use content::ContentHandler;
