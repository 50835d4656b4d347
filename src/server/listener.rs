//! TCP listener.
//!
//! Binds the configured address, starts the lobby and hands every accepted
//! socket to its own `Connection` actor until the lobby signals shutdown.

use std::sync::Arc;

use actix::Actor;
use log::{info, warn};
use tokio::net::TcpListener;
use tokio::sync::Notify;

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::server::connection::Connection;
use crate::server::lobby::Lobby;

/// Bind the listening socket. Failure here is fatal.
pub async fn bind(config: &ServerConfig) -> Result<TcpListener, ServerError> {
    let addr = config.bind_addr();
    TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })
}

/// Accept connections on `listener` until the lobby shuts the server down.
/// Must run inside an actix system.
pub async fn serve(listener: TcpListener, config: ServerConfig) -> Result<(), ServerError> {
    let shutdown = Arc::new(Notify::new());
    let lobby = Lobby::new(config, shutdown.clone()).start();

    if let Ok(addr) = listener.local_addr() {
        info!("[Listener] Server started on {}", addr);
    }

    loop {
        tokio::select! {
            _ = shutdown.notified() => {
                info!("[Listener] Shutdown requested, no longer accepting connections");
                break;
            }
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    info!("[Listener] Client connected from {}", peer);
                    Connection::start(stream, peer, lobby.clone());
                }
                Err(e) => warn!("[Listener] Accept failed: {}", e),
            },
        }
    }
    Ok(())
}

/// Bind and serve.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let listener = bind(&config).await?;
    serve(listener, config).await
}
