/// Game session module: one actor per paired match, wrapping the session state machine.

pub mod messages;
pub mod server;

pub use server::GameSession;
