use crate::Cell;
use std::collections::BTreeSet;
use std::fmt;

/// A logical statement about the board: exactly `count` of `cells` are mines.
///
/// The count is signed. Cascading facts from inconsistent feedback can push it below
/// zero, and the inference loop discards such constraints instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Constraint {
    cells: BTreeSet<Cell>,
    count: isize,
}

impl Constraint {
    pub fn new(cells: impl IntoIterator<Item = Cell>, count: isize) -> Self {
        Constraint {
            cells: cells.into_iter().collect(),
            count,
        }
    }

    pub fn cells(&self) -> &BTreeSet<Cell> {
        &self.cells
    }

    pub fn count(&self) -> isize {
        self.count
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn contains(&self, cell: &Cell) -> bool {
        self.cells.contains(cell)
    }

    /// Every cell is a mine when the number of unknowns equals the count.
    /// A zero count never yields mines, so an empty constraint stays vacuous.
    pub fn known_mines(&self) -> BTreeSet<Cell> {
        if self.cells.len() as isize == self.count && self.count != 0 {
            self.cells.clone()
        } else {
            BTreeSet::new()
        }
    }

    pub fn known_safes(&self) -> BTreeSet<Cell> {
        if self.count == 0 {
            self.cells.clone()
        } else {
            BTreeSet::new()
        }
    }

    pub fn mark_mine(&mut self, cell: Cell) {
        if self.cells.remove(&cell) {
            self.count -= 1;
        }
    }

    pub fn mark_safe(&mut self, cell: Cell) {
        self.cells.remove(&cell);
    }

    /// Nothing left to say: no unknown cells remain.
    pub fn is_vacuous(&self) -> bool {
        self.cells.is_empty()
    }

    /// The count cannot be met by any assignment of the remaining cells.
    pub fn is_inconsistent(&self) -> bool {
        self.count < 0 || self.count > self.cells.len() as isize
    }

    /// Subset elimination: if `self` is a proper subset of `other`, the cells only
    /// `other` has must hold exactly the mines `other` has beyond `self`.
    pub fn eliminate_from(&self, other: &Constraint) -> Option<Constraint> {
        if self.cells.len() >= other.cells.len() || !self.cells.is_subset(&other.cells) {
            return None;
        }
        Some(Constraint {
            cells: other.cells.difference(&self.cells).copied().collect(),
            count: other.count - self.count,
        })
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, cell) in self.cells.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{cell}")?;
        }
        write!(f, "}} = {}", self.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(coords: &[(usize, usize)]) -> Vec<Cell> {
        coords.iter().copied().map(Cell::from).collect()
    }

    #[test]
    fn test_mark_mine_removes_and_decrements() {
        // Marking a member cell as a mine drops it and lowers the count by one
        let mut constraint = Constraint::new(cells(&[(0, 0), (0, 1), (1, 0)]), 2);
        constraint.mark_mine(Cell::new(0, 1));

        assert!(!constraint.contains(&Cell::new(0, 1)));
        assert_eq!(constraint.len(), 2);
        assert_eq!(constraint.count(), 1);
    }

    #[test]
    fn test_mark_safe_keeps_count() {
        // Marking a member cell as safe drops it without touching the count
        let mut constraint = Constraint::new(cells(&[(0, 0), (0, 1)]), 1);
        constraint.mark_safe(Cell::new(0, 0));

        assert_eq!(constraint, Constraint::new(cells(&[(0, 1)]), 1));
    }

    #[test]
    fn test_marks_on_foreign_cell_are_noops() {
        // Cells outside the constraint leave it untouched
        let original = Constraint::new(cells(&[(0, 0), (0, 1)]), 1);
        let mut constraint = original.clone();
        constraint.mark_mine(Cell::new(5, 5));
        constraint.mark_safe(Cell::new(4, 4));

        assert_eq!(constraint, original);
    }

    #[test]
    fn test_zero_count_means_all_safe() {
        // A zero count makes every cell safe and none a mine
        let constraint = Constraint::new(cells(&[(0, 0), (0, 1), (1, 1)]), 0);

        assert_eq!(&constraint.known_safes(), constraint.cells());
        assert!(constraint.known_mines().is_empty());
    }

    #[test]
    fn test_full_count_means_all_mines() {
        // As many mines as cells makes every cell a mine
        let constraint = Constraint::new(cells(&[(2, 2), (2, 3)]), 2);

        assert_eq!(&constraint.known_mines(), constraint.cells());
        assert!(constraint.known_safes().is_empty());
    }

    #[test]
    fn test_ambiguous_constraint_knows_nothing() {
        // Two cells with one mine could go either way
        let constraint = Constraint::new(cells(&[(0, 0), (0, 1)]), 1);

        assert!(constraint.known_mines().is_empty());
        assert!(constraint.known_safes().is_empty());
    }

    #[test]
    fn test_empty_constraint_is_not_all_mines() {
        // The zero-count guard keeps an empty constraint from reporting mines
        let constraint = Constraint::new(Vec::new(), 0);

        assert!(constraint.known_mines().is_empty());
        assert!(constraint.known_safes().is_empty());
        assert!(constraint.is_vacuous());
    }

    #[test]
    fn test_subset_elimination() {
        // {a,b,c}=2 minus {a,b}=1 leaves {c}=1
        let superset = Constraint::new(cells(&[(0, 0), (0, 1), (0, 2)]), 2);
        let subset = Constraint::new(cells(&[(0, 0), (0, 1)]), 1);

        assert_eq!(
            subset.eliminate_from(&superset),
            Some(Constraint::new(cells(&[(0, 2)]), 1))
        );
        assert_eq!(superset.eliminate_from(&subset), None);
    }

    #[test]
    fn test_elimination_needs_proper_subset() {
        // Equal or overlapping cell sets derive nothing
        let a = Constraint::new(cells(&[(0, 0), (0, 1)]), 1);
        let b = Constraint::new(cells(&[(0, 0), (0, 1)]), 1);
        let c = Constraint::new(cells(&[(0, 1), (0, 2)]), 1);

        assert_eq!(a.eliminate_from(&b), None);
        assert_eq!(a.eliminate_from(&c), None);
    }

    #[test]
    fn test_inconsistency() {
        // Negative and over-full counts cannot be satisfied
        assert!(Constraint::new(cells(&[(0, 0)]), -1).is_inconsistent());
        assert!(Constraint::new(cells(&[(0, 0)]), 2).is_inconsistent());
        assert!(!Constraint::new(cells(&[(0, 0)]), 1).is_inconsistent());
    }

    #[test]
    fn test_display() {
        // Cells print in row-major order followed by the count
        let constraint = Constraint::new(cells(&[(1, 0), (0, 1)]), 1);
        assert_eq!(constraint.to_string(), "{(0, 1), (1, 0)} = 1");
    }
}
