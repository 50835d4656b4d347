use actix::prelude::*;

use super::server::GameSession;
use crate::game::types::PlayerIndex;

/// Connection -> session: a decoded `movimiento` frame.
#[derive(Message, Debug)]
#[rtype(result = "()")]
pub struct ApplyMove {
    pub player: PlayerIndex,
    pub position: usize,
}

/// Lobby -> session: the connection seated as `player` is gone.
#[derive(Message, Debug)]
#[rtype(result = "()")]
pub struct PlayerLeft {
    pub player: PlayerIndex,
}

/// Session -> connection: binds the connection to its seat in the session.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Joined {
    pub session: Addr<GameSession>,
    pub player: PlayerIndex,
}
