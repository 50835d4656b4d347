/// Game configuration constants.
///
/// This module defines the gameplay parameters: board dimensions and the
/// round threshold that drives the tie-break policy.
pub const BOARD_SIZE: usize = 3;

/// Number of cells on the board.
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// Rounds that must be played before a match can be decided.
pub const ROUNDS_THRESHOLD: u32 = 3;

/// Number of players in a match.
pub const PLAYERS_PER_MATCH: usize = 2;
