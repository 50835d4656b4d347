/// Lobby module: handles connection admission, registration, pairing and idle shutdown.

pub mod messages;
pub mod server;

pub use server::Lobby;
