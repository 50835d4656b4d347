/// Main configuration module.
///
/// Re-exports submodules for game, lobby and network configuration.
pub mod game;
pub mod lobby;
pub mod server;

pub use server::ServerConfig;
