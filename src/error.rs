//! Error taxonomy for the server.
//!
//! Connection-scoped errors (`ConnectionLost`, `MalformedMessage`) only ever
//! tear down the connection that raised them. `Bind` is fatal at startup.

use std::io;

use crate::game::types::MoveError;

/// Errors surfaced by the server layer.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("connection lost: {0}")]
    ConnectionLost(String),

    #[error("malformed message: {0}")]
    MalformedMessage(String),

    #[error("invalid move: {0}")]
    InvalidMove(#[from] MoveError),

    #[error("cannot bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },
}
