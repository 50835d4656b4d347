/// Per-connection actor.
///
/// Decodes newline-delimited frames from one TCP client and relays them to the
/// lobby (name frame) or to the game session (moves). Serializes every
/// outbound `ServerMessage` as one JSON line. When the actor stops, for any
/// reason, the lobby is told; it tears down the session the connection sat in.

use std::net::SocketAddr;
use std::time::Duration;

use actix::io::{FramedWrite, WriteHandler};
use actix::prelude::*;
use log::{debug, info, warn};
use tokio::net::TcpStream;
use tokio::net::tcp::OwnedWriteHalf;
use tokio_util::codec::{FramedRead, LinesCodec, LinesCodecError};
use uuid::Uuid;

use crate::config::lobby::MAX_FRAME_LENGTH;
use crate::error::ServerError;
use crate::game::types::PlayerIndex;
use crate::server::game_session::GameSession;
use crate::server::game_session::messages::{ApplyMove, Joined};
use crate::server::lobby::Lobby;
use crate::server::lobby::messages::{Activity, Join, Leave, Register};
use crate::server::protocol::{ClientMessage, ServerMessage};

/// Time allowed for a final message to flush before the socket is dropped.
const CLOSE_GRACE: Duration = Duration::from_secs(2);

/// Write one message to the client.
#[derive(Message, Clone, Debug)]
#[rtype(result = "()")]
pub struct Deliver(pub ServerMessage);

/// Flush pending writes, then close the connection. Messages delivered before
/// `Close` are written first.
#[derive(Message, Debug)]
#[rtype(result = "()")]
pub struct Close;

struct SessionSeat {
    session: Addr<GameSession>,
    player: PlayerIndex,
}

pub struct Connection {
    pub connection_id: Uuid,
    peer: SocketAddr,
    name: Option<String>,
    seat: Option<SessionSeat>,
    closing: bool,
    lobby: Addr<Lobby>,
    framed: FramedWrite<String, OwnedWriteHalf, LinesCodec>,
}

impl Connection {
    /// Spawn the actor for an accepted socket.
    pub fn start(stream: TcpStream, peer: SocketAddr, lobby: Addr<Lobby>) -> Addr<Self> {
        let (read_half, write_half) = stream.into_split();
        Connection::create(move |ctx| {
            ctx.add_stream(FramedRead::new(
                read_half,
                LinesCodec::new_with_max_length(MAX_FRAME_LENGTH),
            ));
            Connection {
                connection_id: Uuid::new_v4(),
                peer,
                name: None,
                seat: None,
                closing: false,
                lobby,
                framed: FramedWrite::new(write_half, LinesCodec::new(), ctx),
            }
        })
    }

    fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("<unregistered>")
    }

    fn send(&mut self, msg: &ServerMessage) {
        match serde_json::to_string(msg) {
            Ok(line) => {
                self.framed.write(line);
            }
            Err(e) => warn!("[Connection] Failed to serialize {:?}: {}", msg, e),
        }
    }

    /// Handle one decoded frame. An error means the connection must go.
    fn process_frame(&mut self, frame: String, ctx: &mut Context<Self>) -> Result<(), ServerError> {
        if self.name.is_none() {
            let name = frame.trim();
            if name.is_empty() {
                return Err(ServerError::MalformedMessage("empty player name".to_string()));
            }
            info!("[Connection] {} registered as {}", self.peer, name);
            self.name = Some(name.to_string());
            self.lobby.do_send(Register {
                connection_id: self.connection_id,
                name: name.to_string(),
                addr: ctx.address(),
            });
            return Ok(());
        }

        let msg: ClientMessage = serde_json::from_str(&frame)
            .map_err(|e| ServerError::MalformedMessage(e.to_string()))?;
        match msg {
            ClientMessage::Move { position } => match &self.seat {
                Some(seat) => seat.session.do_send(ApplyMove {
                    player: seat.player,
                    position,
                }),
                None => warn!("[Connection] {} moved before being paired, ignored", self.label()),
            },
            ClientMessage::Unknown => {
                debug!("[Connection] {} sent an unknown frame type, ignored", self.label());
            }
        }
        Ok(())
    }

    fn shut_down(&mut self, ctx: &mut Context<Self>) {
        if self.closing {
            return;
        }
        self.closing = true;
        self.framed.close();
        ctx.run_later(CLOSE_GRACE, |_, ctx| ctx.stop());
    }
}

impl Actor for Connection {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        debug!("[Connection] {} connected as {}", self.peer, self.connection_id);
        self.lobby.do_send(Join {
            connection_id: self.connection_id,
            addr: ctx.address(),
        });
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        info!("[Connection] {} ({}) disconnected", self.label(), self.peer);
        self.lobby.do_send(Leave {
            connection_id: self.connection_id,
        });
    }
}

impl StreamHandler<Result<String, LinesCodecError>> for Connection {
    fn handle(&mut self, frame: Result<String, LinesCodecError>, ctx: &mut Self::Context) {
        if self.closing {
            return;
        }
        self.lobby.do_send(Activity);
        let result = match frame {
            Ok(frame) => self.process_frame(frame, ctx),
            Err(LinesCodecError::MaxLineLengthExceeded) => Err(ServerError::MalformedMessage(
                format!("frame longer than {} bytes", MAX_FRAME_LENGTH),
            )),
            Err(e) => Err(ServerError::ConnectionLost(e.to_string())),
        };
        if let Err(e) = result {
            warn!("[Connection] Dropping {} ({}): {}", self.label(), self.peer, e);
            ctx.stop();
        }
    }

    /// Peer closed its side of the stream.
    fn finished(&mut self, ctx: &mut Self::Context) {
        debug!("[Connection] {} reached end of stream", self.label());
        ctx.stop();
    }
}

impl WriteHandler<LinesCodecError> for Connection {
    fn error(&mut self, err: LinesCodecError, _ctx: &mut Self::Context) -> Running {
        warn!("[Connection] Write to {} failed: {}", self.label(), err);
        Running::Stop
    }
}

impl Handler<Joined> for Connection {
    type Result = ();

    fn handle(&mut self, msg: Joined, _ctx: &mut Self::Context) -> Self::Result {
        self.seat = Some(SessionSeat {
            session: msg.session,
            player: msg.player,
        });
    }
}

impl Handler<Deliver> for Connection {
    type Result = ();

    fn handle(&mut self, msg: Deliver, _ctx: &mut Self::Context) -> Self::Result {
        if !self.closing {
            self.send(&msg.0);
        }
    }
}

impl Handler<Close> for Connection {
    type Result = ();

    fn handle(&mut self, _msg: Close, ctx: &mut Self::Context) -> Self::Result {
        self.seat = None;
        self.shut_down(ctx);
    }
}
