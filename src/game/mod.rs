//! Game logic: board, match scoring and the session state machine.
//!
//! Nothing in here touches the network; the server layer feeds it moves and
//! delivers the messages it returns.

pub mod board;
pub mod scoring;
pub mod state;
pub mod types;
