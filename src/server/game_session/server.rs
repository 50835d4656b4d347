/// Game session actor.
///
/// Owns the session state machine for one paired match. Every move and every
/// disconnect is a message to this actor, so validation, mutation and the
/// resulting broadcast happen as one step relative to the other player.

use actix::prelude::*;
use log::{debug, info, warn};
use uuid::Uuid;

use super::messages::{ApplyMove, Joined, PlayerLeft};
use crate::config::game::PLAYERS_PER_MATCH;
use crate::error::ServerError;
use crate::game::state::{Outbound, Recipient, SessionState};
use crate::server::connection::{Close, Connection, Deliver};
use crate::server::lobby::Lobby;
use crate::server::lobby::messages::SessionEnded;

/// A registered player: display name plus its connection.
#[derive(Clone)]
pub struct Seat {
    pub name: String,
    pub addr: Addr<Connection>,
}

pub struct GameSession {
    pub session_id: Uuid,
    seats: [Seat; PLAYERS_PER_MATCH],
    state: SessionState,
    lobby: Addr<Lobby>,
}

impl GameSession {
    /// Create a session for two registered players. Seat order is
    /// registration order and fixes the player indices.
    pub fn new(session_id: Uuid, seats: [Seat; PLAYERS_PER_MATCH], lobby: Addr<Lobby>) -> Self {
        Self {
            session_id,
            seats,
            state: SessionState::new(),
            lobby,
        }
    }

    fn dispatch(&self, outbound: Vec<Outbound>) {
        for Outbound { to, message } in outbound {
            match to {
                Recipient::Player(player) => self.seats[player].addr.do_send(Deliver(message)),
                Recipient::Both => {
                    for seat in &self.seats {
                        seat.addr.do_send(Deliver(message.clone()));
                    }
                }
            }
        }
    }

    /// Close every connection still seated and stop the session.
    fn close_all(&mut self, ctx: &mut Context<Self>) {
        for seat in &self.seats {
            seat.addr.do_send(Close);
        }
        ctx.stop();
    }
}

impl Actor for GameSession {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(
            "[GameSession] Session {} opened for {} and {}",
            self.session_id, self.seats[0].name, self.seats[1].name
        );
        for (player, seat) in self.seats.iter().enumerate() {
            seat.addr.do_send(Joined {
                session: ctx.address(),
                player,
            });
        }
        let mut outbound = Vec::new();
        for seat in &self.seats {
            outbound.extend(self.state.register(seat.name.clone()));
        }
        self.dispatch(outbound);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        info!("[GameSession] Session {} closed", self.session_id);
        self.lobby.do_send(SessionEnded {
            session_id: self.session_id,
        });
    }
}

impl Handler<ApplyMove> for GameSession {
    type Result = ();

    fn handle(&mut self, msg: ApplyMove, ctx: &mut Context<Self>) -> Self::Result {
        debug!(
            "[GameSession] Move received: player {} position {}",
            msg.player, msg.position
        );
        match self.state.apply_move(msg.player, msg.position) {
            Ok(outbound) => {
                self.dispatch(outbound);
                if self.state.is_over() {
                    info!("[GameSession] Match over in session {}", self.session_id);
                    self.close_all(ctx);
                }
            }
            Err(e) => {
                // Rejected moves are never answered; the client just sees no update.
                let err = ServerError::from(e);
                warn!("[GameSession] Rejected move from {}: {}", self.seats[msg.player].name, err);
            }
        }
    }
}

impl Handler<PlayerLeft> for GameSession {
    type Result = ();

    fn handle(&mut self, msg: PlayerLeft, ctx: &mut Context<Self>) -> Self::Result {
        if self.state.is_over() {
            return;
        }
        info!(
            "[GameSession] {} left session {}, tearing down",
            self.seats[msg.player].name, self.session_id
        );
        let outbound = self.state.disconnect(msg.player);
        self.dispatch(outbound);
        self.close_all(ctx);
    }
}
