use serde::{Deserialize, Serialize};

/// Index of a player inside a session (`0` or `1`).
pub type PlayerIndex = usize;

/// Symbol exclusively assigned to a player for the duration of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

/// A board cell. Serialized as `" "`, `"X"` or `"O"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    #[serde(rename = " ")]
    Empty,
    X,
    O,
}

impl From<Mark> for Cell {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::X => Cell::X,
            Mark::O => Cell::O,
        }
    }
}

/// Result of evaluating a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardStatus {
    InProgress,
    Won,
    Full,
}

/// Why a move was rejected. Rejections never change state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("position {0} is outside the board")]
    OutOfRange(usize),

    #[error("cell {0} is already taken")]
    Occupied(usize),

    #[error("player {0} moved out of turn")]
    NotYourTurn(PlayerIndex),

    #[error("no round is in progress")]
    NoRoundInProgress,
}

/// Opposite player index.
pub fn opponent(player: PlayerIndex) -> PlayerIndex {
    1 - player
}
