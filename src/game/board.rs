//! 3x3 board and win/draw evaluation.

use serde::{Deserialize, Serialize};

use crate::config::game::CELL_COUNT;
use crate::game::types::{BoardStatus, Cell, Mark, MoveError};

/// The 8 winning triples: rows, columns, diagonals.
pub const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    cells: [Cell; CELL_COUNT],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cells(&self) -> &[Cell; CELL_COUNT] {
        &self.cells
    }

    pub fn get(&self, position: usize) -> Option<Cell> {
        self.cells.get(position).copied()
    }

    /// Write `mark` into `position`. Fails without touching the board if the
    /// position is out of range or already taken.
    pub fn apply(&mut self, position: usize, mark: Mark) -> Result<(), MoveError> {
        let cell = self
            .cells
            .get_mut(position)
            .ok_or(MoveError::OutOfRange(position))?;
        if *cell != Cell::Empty {
            return Err(MoveError::Occupied(position));
        }
        *cell = mark.into();
        Ok(())
    }

    /// First completed line, if any.
    pub fn winning_line(&self) -> Option<[usize; 3]> {
        LINES.iter().copied().find(|&[a, b, c]| {
            self.cells[a] != Cell::Empty
                && self.cells[a] == self.cells[b]
                && self.cells[b] == self.cells[c]
        })
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| *c != Cell::Empty)
    }

    pub fn evaluate(&self) -> BoardStatus {
        if self.winning_line().is_some() {
            BoardStatus::Won
        } else if self.is_full() {
            BoardStatus::Full
        } else {
            BoardStatus::InProgress
        }
    }

    pub fn reset(&mut self) {
        self.cells = [Cell::Empty; CELL_COUNT];
    }
}
