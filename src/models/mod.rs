pub mod config;
pub mod inventory;
pub mod result;

pub use config::AppConfig;
pub use inventory::*;
pub use result::ApiResult;
