//! Fixpoint inference over the knowledge base.
//!
//! A pass reads a snapshot of the live constraints and collects three things:
//! constraints to discard, constraints derived by subset elimination, and cells
//! that some constraint pins down as safe or as a mine. Only after the snapshot is
//! exhausted are these applied. Passes repeat until one changes nothing.
//!
//! Pairwise subset elimination is the only deductive rule. It is sound but not
//! complete: facts that need three or more constraints combined at once are never
//! found.

use crate::Constraint;
use crate::knowledge::{ConstraintKey, KnowledgeBase};
use crate::log::targets::INFERENCE as LOG_INFERENCE;
use itertools::Itertools;
use std::collections::BTreeSet;

impl KnowledgeBase {
    /// Runs inference to a fixpoint, returning the number of changes made.
    ///
    /// Called at a fixpoint this returns zero.
    pub fn infer(&mut self) -> usize {
        let mut total = 0;
        let mut passes = 0;

        loop {
            passes += 1;
            let changes = self.inference_pass();
            if changes == 0 {
                break;
            }
            total += changes;
        }

        log::debug!(
            target: LOG_INFERENCE,
            "Fixpoint after {passes} passes: {total} changes, {} constraints, {} safes, {} mines",
            self.constraints.len(),
            self.safes().len(),
            self.mines().len()
        );
        total
    }

    fn inference_pass(&mut self) -> usize {
        for fact in std::mem::take(&mut self.pending) {
            self.apply_fact(fact);
        }

        let mut changes = 0;

        let (live, discarded) = self.partition_constraints();

        let mut new_mines = BTreeSet::new();
        let mut new_safes = BTreeSet::new();
        for &key in &live {
            new_mines.extend(self.constraints[key].known_mines());
            new_safes.extend(self.constraints[key].known_safes());
        }

        let derived = self.eliminate_subsets(&live);

        for key in discarded {
            self.constraints.remove(key);
            changes += 1;
        }

        for constraint in derived {
            self.constraints.insert(constraint);
            changes += 1;
        }

        for cell in new_mines {
            if self.mines().contains(&cell) {
                continue;
            }
            if self.safes().contains(&cell) {
                log::warn!(target: LOG_INFERENCE, "Ignoring mine {cell}: already known safe");
                continue;
            }
            self.mark_mine(cell);
            changes += 1;
        }

        for cell in new_safes {
            if self.safes().contains(&cell) {
                continue;
            }
            if self.mines().contains(&cell) {
                log::warn!(target: LOG_INFERENCE, "Ignoring safe {cell}: already known mine");
                continue;
            }
            self.mark_safe(cell);
            changes += 1;
        }

        log::trace!(target: LOG_INFERENCE, "Pass made {changes} changes");
        changes
    }

    /// Splits the arena into live constraints and those to discard: empty ones,
    /// negative counts and duplicates of an earlier live constraint.
    fn partition_constraints(&self) -> (Vec<ConstraintKey>, Vec<ConstraintKey>) {
        let mut live: Vec<ConstraintKey> = Vec::new();
        let mut discarded = Vec::new();

        for (key, constraint) in &self.constraints {
            if constraint.is_inconsistent() {
                log::warn!(target: LOG_INFERENCE, "Inconsistent constraint {constraint}");
            }

            if constraint.is_vacuous() || constraint.count() < 0 {
                log::trace!(target: LOG_INFERENCE, "Discarding {constraint}");
                discarded.push(key);
            } else if live.iter().any(|&other| self.constraints[other] == *constraint) {
                log::trace!(target: LOG_INFERENCE, "Discarding duplicate {constraint}");
                discarded.push(key);
            } else {
                live.push(key);
            }
        }

        (live, discarded)
    }

    /// Derives `superset - subset` for every pair of live constraints where one
    /// contains the other, keeping only results that are not already known.
    fn eliminate_subsets(&self, live: &[ConstraintKey]) -> Vec<Constraint> {
        let mut derived: Vec<Constraint> = Vec::new();

        for (&a, &b) in live.iter().tuple_combinations() {
            let (a, b) = (&self.constraints[a], &self.constraints[b]);
            let Some(candidate) = a.eliminate_from(b).or_else(|| b.eliminate_from(a)) else {
                continue;
            };

            if candidate.count() < 0 {
                log::warn!(target: LOG_INFERENCE, "Negative derivation from {a} and {b}");
                continue;
            }

            let known = live.iter().any(|&key| self.constraints[key] == candidate)
                || derived.contains(&candidate);
            if !known {
                log::trace!(target: LOG_INFERENCE, "Derived {candidate} from {a} and {b}");
                derived.push(candidate);
            }
        }

        derived
    }
}
