//! A knowledge-based minesweeper player.
//!
//! The player never sees the mine layout. After each probe it receives the number
//! of adjacent mines and records that as a [`Constraint`] in its [`KnowledgeBase`].
//! Inference then runs to a fixpoint, marking every cell that is provably safe or
//! provably a mine, before the next move is chosen.

use itertools::iproduct;
use std::fmt;

pub mod board;
pub mod constraint;
pub mod game;
pub mod inference;
pub mod knowledge;
pub mod log;
pub mod moves;

pub use board::Board;
pub use constraint::Constraint;
pub use game::{Game, GameState, MoveKind, Outcome, Turn};
pub use knowledge::KnowledgeBase;

/// A `(row, col)` coordinate on the board.
///
/// Ordering is row-major, which is what makes move selection reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Cell { row, col }
    }

    pub fn in_bounds(self, height: usize, width: usize) -> bool {
        self.row < height && self.col < width
    }

    /// All cells within Chebyshev distance one of `self`, excluding `self`,
    /// clipped to a `height` x `width` board.
    pub fn neighbors(self, height: usize, width: usize) -> impl Iterator<Item = Cell> {
        let rows = self.row.saturating_sub(1)..(self.row + 2).min(height);
        let cols = self.col.saturating_sub(1)..(self.col + 2).min(width);

        iproduct!(rows, cols)
            .map(|(row, col)| Cell { row, col })
            .filter(move |&cell| cell != self)
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Cell { row, col }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Every cell of a `height` x `width` board, in row-major order.
pub fn all_cells(height: usize, width: usize) -> impl Iterator<Item = Cell> {
    iproduct!(0..height, 0..width).map(Cell::from)
}
