//! Move selection. Read-only queries over the knowledge base.

use crate::log::targets::MOVES as LOG_MOVES;
use crate::{Cell, KnowledgeBase, all_cells};
use rand::Rng;
use rand::prelude::IndexedRandom;

impl KnowledgeBase {
    /// Cells proven safe that have not been probed yet, in row-major order.
    pub fn safe_moves(&self) -> impl Iterator<Item = Cell> + '_ {
        self.safes()
            .iter()
            .copied()
            .filter(|cell| !self.moves_made().contains(cell) && !self.mines().contains(cell))
    }

    /// The first provably safe unprobed cell, if inference has found one.
    pub fn make_safe_move(&self) -> Option<Cell> {
        let choice = self.safe_moves().next();
        if let Some(cell) = choice {
            log::debug!(target: LOG_MOVES, "Safe move {cell}");
        }
        choice
    }

    /// A uniformly random cell that is neither probed nor a known mine.
    pub fn make_random_move<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Cell> {
        let candidates: Vec<Cell> = all_cells(self.height(), self.width())
            .filter(|cell| !self.moves_made().contains(cell) && !self.mines().contains(cell))
            .collect();

        let choice = candidates.choose(rng).copied();
        match choice {
            Some(cell) => log::debug!(
                target: LOG_MOVES,
                "Random move {cell} out of {} candidates",
                candidates.len()
            ),
            None => log::debug!(target: LOG_MOVES, "No move left"),
        }
        choice
    }
}
