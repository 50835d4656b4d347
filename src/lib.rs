//! Match server for a two-player 3x3 grid game.
//!
//! Two TCP clients register by name, get paired into a session and play a
//! best-of-three match with tie-break rounds. Game rules live in [`game`];
//! sockets, pairing and actors live in [`server`].

pub mod config;
pub mod error;
pub mod game;
pub mod server;

pub use config::ServerConfig;
pub use error::ServerError;
