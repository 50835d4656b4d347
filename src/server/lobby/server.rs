/// Lobby actor.
///
/// Admits at most `MAX_CONNECTIONS` connections, buffers the first registered
/// player until a second one registers, then opens a game session for the
/// pair. A seated connection that stops is reported to its session from here,
/// so a match is torn down even when the connection never learned its seat.
/// Also owns the idle watch: the last-activity timestamp is written only
/// here, from `Activity` messages sent by the connections.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use actix::prelude::*;
use log::{debug, info, warn};
use tokio::sync::Notify;
use uuid::Uuid;

use super::messages::{Activity, Join, Leave, Register, SessionEnded};
use crate::config::ServerConfig;
use crate::config::game::PLAYERS_PER_MATCH;
use crate::config::lobby::MAX_CONNECTIONS;
use crate::game::types::PlayerIndex;
use crate::server::connection::{Close, Connection, Deliver};
use crate::server::game_session::GameSession;
use crate::server::game_session::messages::PlayerLeft;
use crate::server::game_session::server::Seat;
use crate::server::protocol::ServerMessage;

/// A registered player waiting for an opponent.
struct WaitingPlayer {
    connection_id: Uuid,
    seat: Seat,
}

/// The match being played: its actor and the connection behind each seat.
struct ActiveSession {
    session_id: Uuid,
    addr: Addr<GameSession>,
    players: [Uuid; PLAYERS_PER_MATCH],
}

impl ActiveSession {
    fn seat_of(&self, connection_id: Uuid) -> Option<PlayerIndex> {
        self.players.iter().position(|id| *id == connection_id)
    }
}

pub struct Lobby {
    /// Every admitted connection, registered or not.
    connections: HashMap<Uuid, Addr<Connection>>,
    /// First registered player, until a second one arrives.
    waiting: Option<WaitingPlayer>,
    /// The match currently being played, if any.
    session: Option<ActiveSession>,
    last_activity: Instant,
    config: ServerConfig,
    /// Signals the accept loop to stop.
    shutdown: Arc<Notify>,
}

impl Lobby {
    pub fn new(config: ServerConfig, shutdown: Arc<Notify>) -> Self {
        Self {
            connections: HashMap::new(),
            waiting: None,
            session: None,
            last_activity: Instant::now(),
            config,
            shutdown,
        }
    }

    fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    fn pair(
        &mut self,
        first: WaitingPlayer,
        second_id: Uuid,
        second: Seat,
        ctx: &mut Context<Self>,
    ) {
        let session_id = Uuid::new_v4();
        info!(
            "[Lobby] Pairing {} with {} in session {}",
            first.seat.name, second.name, session_id
        );
        let addr = GameSession::new(session_id, [first.seat, second], ctx.address()).start();
        self.session = Some(ActiveSession {
            session_id,
            addr,
            players: [first.connection_id, second_id],
        });
    }

    /// Shut down when nothing happened for the configured time and no match is running.
    fn check_idle(&mut self, ctx: &mut Context<Self>) {
        if self.session.is_some() {
            return;
        }
        let idle = self.last_activity.elapsed();
        if idle <= self.config.idle_timeout {
            return;
        }
        info!(
            "[Lobby] No activity for {}s, closing {} connection(s) and shutting down",
            idle.as_secs(),
            self.connections.len()
        );
        for addr in self.connections.values() {
            addr.do_send(Deliver(ServerMessage::server_closed()));
            addr.do_send(Close);
        }
        self.waiting = None;
        self.shutdown.notify_one();
        ctx.stop();
    }
}

impl Actor for Lobby {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        ctx.run_interval(self.config.idle_check_interval, |act, ctx| {
            act.check_idle(ctx);
        });
    }
}

impl Handler<Join> for Lobby {
    type Result = ();

    /// Admit a connection, or refuse it when the server is full.
    fn handle(&mut self, msg: Join, _ctx: &mut Self::Context) -> Self::Result {
        self.touch();
        if self.connections.len() >= MAX_CONNECTIONS {
            warn!(
                "[Lobby] Refusing connection {}: {} already connected",
                msg.connection_id,
                self.connections.len()
            );
            msg.addr.do_send(Deliver(ServerMessage::server_full()));
            msg.addr.do_send(Close);
            return;
        }
        self.connections.insert(msg.connection_id, msg.addr);
        debug!("[Lobby] Connection {} admitted", msg.connection_id);
    }
}

impl Handler<Register> for Lobby {
    type Result = ();

    fn handle(&mut self, msg: Register, ctx: &mut Self::Context) -> Self::Result {
        self.touch();
        if !self.connections.contains_key(&msg.connection_id) {
            // Refused connections may still send their name before closing.
            return;
        }
        let seat = Seat {
            name: msg.name,
            addr: msg.addr,
        };
        match self.waiting.take() {
            Some(first) if first.connection_id != msg.connection_id => {
                self.pair(first, msg.connection_id, seat, ctx)
            }
            Some(first) => self.waiting = Some(first),
            None => {
                info!("[Lobby] {} is waiting for an opponent", seat.name);
                self.waiting = Some(WaitingPlayer {
                    connection_id: msg.connection_id,
                    seat,
                });
            }
        }
    }
}

impl Handler<Leave> for Lobby {
    type Result = ();

    fn handle(&mut self, msg: Leave, _ctx: &mut Self::Context) -> Self::Result {
        if self.connections.remove(&msg.connection_id).is_none() {
            return;
        }
        if self
            .waiting
            .as_ref()
            .is_some_and(|w| w.connection_id == msg.connection_id)
        {
            if let Some(w) = self.waiting.take() {
                info!("[Lobby] {} left before an opponent arrived", w.seat.name);
            }
        }
        if let Some(active) = &self.session {
            if let Some(player) = active.seat_of(msg.connection_id) {
                debug!(
                    "[Lobby] Seated connection {} left session {}",
                    msg.connection_id, active.session_id
                );
                active.addr.do_send(PlayerLeft { player });
            }
        }
        debug!("[Lobby] Connection {} left", msg.connection_id);
    }
}

impl Handler<Activity> for Lobby {
    type Result = ();

    fn handle(&mut self, _msg: Activity, _ctx: &mut Self::Context) -> Self::Result {
        self.touch();
    }
}

impl Handler<SessionEnded> for Lobby {
    type Result = ();

    fn handle(&mut self, msg: SessionEnded, _ctx: &mut Self::Context) -> Self::Result {
        if self
            .session
            .as_ref()
            .is_some_and(|active| active.session_id == msg.session_id)
        {
            self.session = None;
            self.touch();
            info!("[Lobby] Session {} ended, lobby open", msg.session_id);
        }
    }
}
