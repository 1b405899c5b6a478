use crate::log::targets::KNOWLEDGE as LOG_KNOWLEDGE;
use crate::{Cell, Constraint};
use slotmap::{SlotMap, new_key_type};
use std::collections::BTreeSet;

new_key_type! {
    /// Stable handle to a constraint in the knowledge base arena.
    pub struct ConstraintKey;
}

/// A certain fact about a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Fact {
    Mine(Cell),
    Safe(Cell),
}

/// Everything the player knows about one game.
///
/// After every call to [`KnowledgeBase::add_knowledge`]:
/// - no cell is both in `safes` and `mines`,
/// - no constraint mentions a probed cell,
/// - no constraint mentions a cell in `safes` or `mines`.
pub struct KnowledgeBase {
    height: usize,
    width: usize,
    moves_made: BTreeSet<Cell>,
    safes: BTreeSet<Cell>,
    mines: BTreeSet<Cell>,
    pub(crate) constraints: SlotMap<ConstraintKey, Constraint>,
    /// Facts recorded but not yet cascaded into the constraints.
    pub(crate) pending: Vec<Fact>,
}

impl KnowledgeBase {
    pub fn new(height: usize, width: usize) -> Self {
        KnowledgeBase {
            height,
            width,
            moves_made: BTreeSet::new(),
            safes: BTreeSet::new(),
            mines: BTreeSet::new(),
            constraints: SlotMap::with_key(),
            pending: Vec::new(),
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn moves_made(&self) -> &BTreeSet<Cell> {
        &self.moves_made
    }

    pub fn safes(&self) -> &BTreeSet<Cell> {
        &self.safes
    }

    pub fn mines(&self) -> &BTreeSet<Cell> {
        &self.mines
    }

    pub fn constraints(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints.values()
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Records the feedback for a probed cell: `count` of its neighbors are mines.
    ///
    /// Inference runs to a fixpoint before this returns. Probes outside the board,
    /// probes of a known mine and counts larger than the neighborhood are rejected
    /// without touching any state.
    pub fn add_knowledge(&mut self, cell: Cell, count: usize) -> anyhow::Result<()> {
        let (height, width) = (self.height, self.width);
        anyhow::ensure!(
            cell.in_bounds(height, width),
            "cell {cell} is outside the {height}x{width} board"
        );
        anyhow::ensure!(
            !self.mines.contains(&cell),
            "cell {cell} was probed but is a known mine"
        );
        let around = cell.neighbors(height, width).count();
        anyhow::ensure!(
            count <= around,
            "cell {cell} has {around} neighbors and cannot border {count} mines"
        );

        log::debug!(target: LOG_KNOWLEDGE, "Probed {cell}: {count} adjacent mines");

        self.moves_made.insert(cell);
        if self.safes.insert(cell) {
            self.pending.push(Fact::Safe(cell));
        }

        let mut constraint = Constraint::new(
            cell.neighbors(height, width)
                .filter(|neighbor| !self.moves_made.contains(neighbor)),
            count as isize,
        );
        // Fold in what is already known so no stale cell enters the theory.
        for neighbor in cell.neighbors(height, width) {
            if self.mines.contains(&neighbor) {
                constraint.mark_mine(neighbor);
            } else if self.safes.contains(&neighbor) {
                constraint.mark_safe(neighbor);
            }
        }

        log::trace!(target: LOG_KNOWLEDGE, "New constraint {constraint}");
        self.constraints.insert(constraint);

        self.infer();
        Ok(())
    }

    /// Records `cell` as a mine and cascades the fact into every constraint.
    pub(crate) fn mark_mine(&mut self, cell: Cell) {
        log::debug!(target: LOG_KNOWLEDGE, "Mine: {cell}");
        self.mines.insert(cell);
        self.apply_fact(Fact::Mine(cell));
    }

    /// Records `cell` as safe and cascades the fact into every constraint.
    pub(crate) fn mark_safe(&mut self, cell: Cell) {
        log::debug!(target: LOG_KNOWLEDGE, "Safe: {cell}");
        self.safes.insert(cell);
        self.apply_fact(Fact::Safe(cell));
    }

    /// The only place constraints learn about facts.
    pub(crate) fn apply_fact(&mut self, fact: Fact) {
        for constraint in self.constraints.values_mut() {
            match fact {
                Fact::Mine(cell) => constraint.mark_mine(cell),
                Fact::Safe(cell) => constraint.mark_safe(cell),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_knowledge_base_is_empty() {
        // A fresh knowledge base knows nothing
        let kb = KnowledgeBase::new(4, 5);
        assert_eq!((kb.height(), kb.width()), (4, 5));
        assert!(kb.moves_made().is_empty());
        assert!(kb.safes().is_empty());
        assert!(kb.mines().is_empty());
        assert_eq!(kb.constraint_count(), 0);
    }

    #[test]
    fn test_probe_is_recorded_as_move_and_safe() {
        // The probed cell is both a move and a safe cell
        let mut kb = KnowledgeBase::new(3, 3);
        kb.add_knowledge(Cell::new(1, 1), 2).unwrap();

        assert!(kb.moves_made().contains(&Cell::new(1, 1)));
        assert!(kb.safes().contains(&Cell::new(1, 1)));
        assert_eq!(kb.constraint_count(), 1);

        let constraint = kb.constraints().next().unwrap();
        assert_eq!(constraint.len(), 8);
        assert_eq!(constraint.count(), 2);
    }

    #[test]
    fn test_new_constraint_skips_probed_cells() {
        // A later probe does not mention cells already probed
        let mut kb = KnowledgeBase::new(1, 4);
        kb.add_knowledge(Cell::new(0, 0), 1).unwrap();
        kb.add_knowledge(Cell::new(0, 2), 1).unwrap();

        for constraint in kb.constraints() {
            assert!(constraint.cells().is_disjoint(kb.moves_made()));
        }
    }

    #[test]
    fn test_new_constraint_folds_known_mines() {
        // A neighbor known to be a mine is removed and counted out
        let mut kb = KnowledgeBase::new(1, 3);
        kb.add_knowledge(Cell::new(0, 0), 1).unwrap();
        assert!(kb.mines().contains(&Cell::new(0, 1)));

        kb.add_knowledge(Cell::new(0, 2), 1).unwrap();
        for constraint in kb.constraints() {
            assert!(!constraint.contains(&Cell::new(0, 1)));
        }
        assert_eq!(kb.constraint_count(), 0);
    }

    #[test]
    fn test_out_of_bounds_probe_is_rejected() {
        // Probes off the board are errors and change nothing
        let mut kb = KnowledgeBase::new(2, 2);
        let result = kb.add_knowledge(Cell::new(2, 0), 0);

        assert!(result.is_err());
        assert!(kb.moves_made().is_empty());
        assert_eq!(kb.constraint_count(), 0);
    }

    #[test]
    fn test_impossible_count_is_rejected() {
        // A corner cell on a 2x2 board has three neighbors, so four mines is impossible
        let mut kb = KnowledgeBase::new(2, 2);
        let err = kb.add_knowledge(Cell::new(0, 0), 4).unwrap_err();

        assert!(err.to_string().contains("cannot border 4 mines"));
        assert!(kb.safes().is_empty());
    }

    #[test]
    fn test_probing_known_mine_is_rejected() {
        // Feedback for a cell already proven to be a mine is contradictory
        let mut kb = KnowledgeBase::new(1, 2);
        kb.add_knowledge(Cell::new(0, 0), 1).unwrap();

        assert!(kb.add_knowledge(Cell::new(0, 1), 1).is_err());
        assert!(!kb.moves_made().contains(&Cell::new(0, 1)));
    }
}
