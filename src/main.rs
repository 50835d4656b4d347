//! Main entry point for the match server.
//!
//! Initializes logging, reads the network configuration from the environment
//! and runs the listener until the lobby shuts it down for inactivity.

use log::info;
use triqui_server::server::listener;
use triqui_server::{ServerConfig, ServerError};

#[actix::main]
async fn main() -> Result<(), ServerError> {
    // Initialize logger from environment variable (default to info level).
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from_env();
    listener::run(config).await?;

    info!("Server stopped");
    Ok(())
}
