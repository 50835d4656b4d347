//! Wire protocol.
//!
//! Every frame is one line of UTF-8. The first client frame is the raw player
//! name; every later frame and every server frame is a JSON object tagged by
//! its `tipo` field.

use serde::{Deserialize, Serialize};

use crate::config::game::PLAYERS_PER_MATCH;
use crate::game::board::Board;
use crate::game::types::{Mark, PlayerIndex};

// Server -> client
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "tipo")]
pub enum ServerMessage {
    /// Sent individually to each player when a match starts.
    #[serde(rename = "inicio_juego")]
    MatchStarted {
        #[serde(rename = "turno")]
        your_turn: bool,
        #[serde(rename = "simbolo")]
        mark: Mark,
        #[serde(rename = "nombres")]
        names: [String; PLAYERS_PER_MATCH],
        #[serde(rename = "puntuaciones")]
        scores: [u32; PLAYERS_PER_MATCH],
    },
    #[serde(rename = "estado_juego")]
    GameState {
        #[serde(rename = "tablero")]
        board: Board,
        #[serde(rename = "turno")]
        turn: PlayerIndex,
        #[serde(rename = "puntuaciones")]
        scores: [u32; PLAYERS_PER_MATCH],
    },
    #[serde(rename = "fin_juego")]
    MatchOver {
        #[serde(rename = "ganador")]
        winner: Option<String>,
        #[serde(rename = "empate_global")]
        draw: bool,
        #[serde(rename = "puntuaciones")]
        scores: [u32; PLAYERS_PER_MATCH],
    },
    #[serde(rename = "servidor_cerrado")]
    ServerClosed {
        #[serde(rename = "mensaje")]
        message: String,
    },
    #[serde(rename = "servidor_lleno")]
    ServerFull {
        #[serde(rename = "mensaje")]
        message: String,
    },
    #[serde(rename = "conexion_cerrada")]
    ConnectionClosed {
        #[serde(rename = "mensaje")]
        message: String,
    },
}

impl ServerMessage {
    pub fn server_closed() -> Self {
        Self::ServerClosed {
            message: "El servidor ha sido cerrado por inactividad.".to_string(),
        }
    }

    pub fn server_full() -> Self {
        Self::ServerFull {
            message: "El servidor ya tiene dos jugadores conectados.".to_string(),
        }
    }

    pub fn opponent_left(name: &str) -> Self {
        Self::ConnectionClosed {
            message: format!("{} se desconectó. La partida ha terminado.", name),
        }
    }
}

// Client -> server
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "tipo")]
pub enum ClientMessage {
    #[serde(rename = "movimiento")]
    Move {
        #[serde(rename = "posicion")]
        position: usize,
    },
    /// Any other `tipo`; ignored by the server.
    #[serde(other)]
    Unknown,
}
