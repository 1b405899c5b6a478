//! The ground truth the player probes against.
//!
//! The board knows where the mines are and answers adjacency counts. It also keeps
//! the player-visible state (revealed counts and flags) so a game can be rendered
//! and judged.

use crate::Cell;
use rand::Rng;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

pub struct Board {
    height: usize,
    width: usize,
    mines: BTreeSet<Cell>,
    revealed: BTreeMap<Cell, usize>,
    flagged: BTreeSet<Cell>,
    detonated: Option<Cell>,
}

impl Board {
    /// Places `mines` mines uniformly at random.
    pub fn new<R: Rng + ?Sized>(
        height: usize,
        width: usize,
        mines: usize,
        rng: &mut R,
    ) -> anyhow::Result<Self> {
        let total = cell_count(height, width)?;
        anyhow::ensure!(
            mines < total,
            "Total mines must be less than the number of cells on the board."
        );

        let cells = rand::seq::index::sample(rng, total, mines)
            .into_iter()
            .map(|index| Cell::new(index / width, index % width));
        Self::from_mines(height, width, cells)
    }

    /// A board with a fixed mine layout.
    pub fn from_mines(
        height: usize,
        width: usize,
        mines: impl IntoIterator<Item = Cell>,
    ) -> anyhow::Result<Self> {
        cell_count(height, width)?;
        let mines: BTreeSet<Cell> = mines.into_iter().collect();
        if let Some(outside) = mines.iter().find(|cell| !cell.in_bounds(height, width)) {
            anyhow::bail!("mine {outside} is outside the {height}x{width} board");
        }

        Ok(Board {
            height,
            width,
            mines,
            revealed: BTreeMap::new(),
            flagged: BTreeSet::new(),
            detonated: None,
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn mines(&self) -> &BTreeSet<Cell> {
        &self.mines
    }

    pub fn is_mine(&self, cell: Cell) -> bool {
        self.mines.contains(&cell)
    }

    /// Number of mines adjacent to `cell`, not counting the cell itself.
    pub fn nearby_mines(&self, cell: Cell) -> usize {
        cell.neighbors(self.height, self.width)
            .filter(|neighbor| self.mines.contains(neighbor))
            .count()
    }

    pub fn is_revealed(&self, cell: Cell) -> bool {
        self.revealed.contains_key(&cell)
    }

    /// Uncovers `cell`, returning its adjacency count, or `None` if it was a mine.
    pub fn reveal(&mut self, cell: Cell) -> Option<usize> {
        if self.is_mine(cell) {
            self.detonated = Some(cell);
            return None;
        }
        let count = self.nearby_mines(cell);
        self.revealed.insert(cell, count);
        Some(count)
    }

    pub fn flag(&mut self, cell: Cell) {
        self.flagged.insert(cell);
    }

    pub fn detonated(&self) -> Option<Cell> {
        self.detonated
    }

    /// Every safe cell is uncovered, or every mine (and nothing else) is flagged.
    pub fn won(&self) -> bool {
        if self.detonated.is_some() {
            return false;
        }
        let cleared = self.revealed.len() + self.mines.len() == self.height * self.width;
        let flagged = !self.mines.is_empty() && self.flagged == self.mines;
        cleared || flagged
    }

    /// The board with every mine uncovered, for showing the layout once a game is over.
    pub fn layout(&self) -> Layout<'_> {
        Layout(self)
    }

    fn render(&self, f: &mut fmt::Formatter<'_>, show_mines: bool) -> fmt::Result {
        write!(f, "   ")?;
        for col in 0..self.width {
            write!(f, "{:^3}", col)?;
        }
        writeln!(f, "\n  +{}", "---".repeat(self.width))?;

        for row in 0..self.height {
            write!(f, "{:^2}|", row)?;
            for col in 0..self.width {
                let cell = Cell::new(row, col);
                let display = if self.detonated == Some(cell) {
                    " X ".to_string()
                } else if let Some(count) = self.revealed.get(&cell) {
                    format!(" {} ", count)
                } else if show_mines && self.mines.contains(&cell) {
                    " * ".to_string()
                } else if self.flagged.contains(&cell) {
                    " F ".to_string()
                } else {
                    " ■ ".to_string()
                };
                write!(f, "{}", display)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Fails on empty boards and on shapes whose cell count does not fit in `usize`.
fn cell_count(height: usize, width: usize) -> anyhow::Result<usize> {
    anyhow::ensure!(height > 0 && width > 0, "board must have at least one cell");
    height
        .checked_mul(width)
        .ok_or_else(|| anyhow::anyhow!("a {height}x{width} board has too many cells"))
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, false)
    }
}

pub struct Layout<'a>(&'a Board);

impl fmt::Display for Layout<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.render(f, true)
    }
}
