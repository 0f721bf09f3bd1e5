pub mod client;
pub mod error;
pub mod models;
pub mod modules;
pub mod proxy; // Gateway: router, upstream relay, static content
mod utils;

use modules::logger;
use proxy::AxumServer;
use tracing::{error, info};

/// Run the gateway until Ctrl-C
pub async fn run() -> anyhow::Result<()> {
    // Initialize logger
    logger::init_logger();

    let config = modules::config::load_app_config()?;
    let (server, handle) = match AxumServer::start(&config.proxy).await {
        Ok(started) => started,
        Err(e) => {
            error!("Failed to start gateway: {}", e);
            return Err(e.into());
        }
    };

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");

    server.stop();
    handle.await?;
    Ok(())
}
