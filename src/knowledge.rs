//! The knowledge base: everything the AI has proven about the board.
//!
//! Each revealed clue becomes a [`Constraint`]. After every observation the
//! base is driven to a fixed point:
//! 1. Subset difference: `A ⊂ B` gives `B − A = b − a`
//! 2. Intersection (configurable, see [`IntersectionRule`])
//! 3. Dedup
//! 4. Trivial conclusions (`count == 0` / `count == |cells|`) are marked
//! 5. Empty constraints are dropped
//!
//! Derivations are staged per pass and applied afterwards, so the
//! collection is never mutated while it is being read.

use crate::config::{InferenceConfig, IntersectionRule};
use crate::constraint::Constraint;
use crate::error::{Contradiction, InferenceError, Result};
use crate::rng::WasmRng;
use crate::types::{BoardQuery, Cell, NeighborCache};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, trace, warn};

/// Outcome of one call to [`KnowledgeBase::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Passes run, including the final one that changed nothing.
    pub passes: usize,
    /// Whether anything (constraint, mine, safe) was learned.
    pub changed: bool,
    /// `max_passes` stopped the loop before the fixed point.
    pub truncated: bool,
}

#[derive(Debug, Clone)]
pub struct KnowledgeBase<Q: BoardQuery = NeighborCache> {
    board: Q,
    config: InferenceConfig,
    moves_made: BTreeSet<Cell>,
    safes: BTreeSet<Cell>,
    mines: BTreeSet<Cell>,
    constraints: Vec<Constraint>,
}

impl KnowledgeBase<NeighborCache> {
    pub fn new(height: usize, width: usize) -> Self {
        Self::with_board(NeighborCache::new(height, width), InferenceConfig::default())
    }

    pub fn with_config(height: usize, width: usize, config: InferenceConfig) -> Self {
        Self::with_board(NeighborCache::new(height, width), config)
    }
}

impl<Q: BoardQuery> KnowledgeBase<Q> {
    pub fn with_board(board: Q, config: InferenceConfig) -> Self {
        Self {
            board,
            config,
            moves_made: BTreeSet::new(),
            safes: BTreeSet::new(),
            mines: BTreeSet::new(),
            constraints: Vec::new(),
        }
    }

    pub fn board(&self) -> &Q {
        &self.board
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Cells already probed.
    pub fn moves_made(&self) -> &BTreeSet<Cell> {
        &self.moves_made
    }

    /// Cells proven safe, probed or not.
    pub fn safes(&self) -> &BTreeSet<Cell> {
        &self.safes
    }

    /// Cells proven to be mines.
    pub fn mines(&self) -> &BTreeSet<Cell> {
        &self.mines
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Record that `cell` is a mine and strip it from every constraint.
    pub fn mark_mine(&mut self, cell: Cell) -> Result<()> {
        if self.safes.contains(&cell) {
            return Err(Contradiction::MineWasSafe(cell).into());
        }
        if !self.mines.insert(cell) {
            return Ok(());
        }
        trace!(cell = %cell, "marked mine");
        for constraint in &mut self.constraints {
            constraint.remove_as_mine(cell)?;
        }
        Ok(())
    }

    /// Record that `cell` is safe and strip it from every constraint.
    pub fn mark_safe(&mut self, cell: Cell) -> Result<()> {
        if self.mines.contains(&cell) {
            return Err(Contradiction::SafeWasMine(cell).into());
        }
        if !self.safes.insert(cell) {
            return Ok(());
        }
        trace!(cell = %cell, "marked safe");
        for constraint in &mut self.constraints {
            constraint.remove_as_safe(cell)?;
        }
        Ok(())
    }

    /// Take in a revealed cell and the number of mines around it, then
    /// propagate until nothing more can be concluded.
    pub fn observe(&mut self, cell: Cell, count: usize) -> Result<()> {
        if !self.board.in_bounds(cell) {
            return Err(InferenceError::OutOfBounds {
                cell,
                height: self.board.height(),
                width: self.board.width(),
            });
        }
        let neighbor_count = self.board.neighbors(cell).len();
        if count > neighbor_count {
            return Err(InferenceError::InvalidClue {
                cell,
                count,
                neighbors: neighbor_count,
            });
        }
        debug!(cell = %cell, count, "observe");

        self.moves_made.insert(cell);
        self.mark_safe(cell)?;

        let mut unknown = BTreeSet::new();
        let mut remaining = count as i64;
        for &n in self.board.neighbors(cell) {
            if self.safes.contains(&n) {
                continue;
            }
            if self.mines.contains(&n) {
                remaining -= 1;
                continue;
            }
            unknown.insert(n);
        }

        let constraint = Constraint::from_signed(unknown, remaining)?;
        if !constraint.is_empty() {
            self.insert(constraint)?;
        }

        self.resolve()?;
        Ok(())
    }

    /// Run resolution passes until one changes nothing (or `max_passes`).
    /// Calling it again right after it returns is a no-op.
    pub fn resolve(&mut self) -> Result<Resolution> {
        let mut passes = 0;
        let mut learned = false;
        let mut truncated = false;

        loop {
            if let Some(max) = self.config.max_passes {
                if passes >= max {
                    warn!(
                        passes,
                        constraints = self.constraints.len(),
                        "resolution stopped at max_passes"
                    );
                    truncated = true;
                    break;
                }
            }
            passes += 1;

            let mut changed = false;

            // Phase 1: derive from a stable view, then apply.
            for constraint in self.derive()? {
                if self.insert(constraint)? {
                    changed = true;
                }
            }
            changed |= self.dedup()?;

            // Phase 2: collect trivial conclusions, then mark.
            let mut new_mines = BTreeSet::new();
            let mut new_safes = BTreeSet::new();
            for constraint in &self.constraints {
                new_mines.extend(constraint.known_mines());
                new_safes.extend(constraint.known_safes());
            }
            for cell in new_mines {
                if !self.mines.contains(&cell) {
                    self.mark_mine(cell)?;
                    changed = true;
                }
            }
            for cell in new_safes {
                if !self.safes.contains(&cell) {
                    self.mark_safe(cell)?;
                    changed = true;
                }
            }

            self.constraints.retain(|c| !c.is_empty());
            self.dedup()?;

            if !changed {
                break;
            }
            learned = true;
        }

        debug!(
            passes,
            constraints = self.constraints.len(),
            safes = self.safes.len(),
            mines = self.mines.len(),
            "resolution finished"
        );
        Ok(Resolution {
            passes,
            changed: learned,
            truncated,
        })
    }

    /// Any proven-safe cell not yet probed, smallest first.
    pub fn next_safe_move(&self) -> Option<Cell> {
        self.safes.difference(&self.moves_made).next().copied()
    }

    /// A uniformly random cell that is neither probed nor a known mine.
    /// `None` once the board is exhausted.
    pub fn suggest_fallback_move(&self, rng: &mut WasmRng) -> Option<Cell> {
        let candidates: Vec<Cell> = self
            .board
            .cells()
            .filter(|c| !self.moves_made.contains(c) && !self.mines.contains(c))
            .collect();
        rng.choose(&candidates).copied()
    }

    /// Add a constraint unless an identical one is present.
    /// The same cells with a different count is a contradiction.
    fn insert(&mut self, constraint: Constraint) -> Result<bool> {
        for existing in &self.constraints {
            if existing.cells() == constraint.cells() {
                if existing.count() == constraint.count() {
                    return Ok(false);
                }
                return Err(Contradiction::ConflictingCounts {
                    cells: constraint.len(),
                    first: existing.count(),
                    second: constraint.count(),
                }
                .into());
            }
        }
        trace!(constraint = %constraint, "new constraint");
        self.constraints.push(constraint);
        Ok(true)
    }

    /// Drop structural duplicates, keeping first occurrences.
    ///
    /// Marking can shrink two stored constraints onto the same cells; if
    /// their counts differ that is a contradiction.
    fn dedup(&mut self) -> Result<bool> {
        let before = self.constraints.len();
        let mut counts: HashMap<&BTreeSet<Cell>, usize> = HashMap::with_capacity(before);
        for constraint in &self.constraints {
            let first = *counts.entry(constraint.cells()).or_insert(constraint.count());
            if first != constraint.count() {
                return Err(Contradiction::ConflictingCounts {
                    cells: constraint.len(),
                    first,
                    second: constraint.count(),
                }
                .into());
            }
        }

        let mut seen = HashSet::with_capacity(before);
        self.constraints.retain(|c| seen.insert(c.clone()));
        Ok(self.constraints.len() != before)
    }

    /// Every constraint implied by a pair of stored ones.
    fn derive(&self) -> Result<Vec<Constraint>> {
        let mut derived = Vec::new();
        let n = self.constraints.len();

        for i in 0..n {
            let a = &self.constraints[i];
            for j in 0..n {
                if i == j {
                    continue;
                }
                let b = &self.constraints[j];

                if a.is_strict_subset(b) {
                    derived.push(a.difference_from(b)?);
                } else if i < j && !b.is_strict_subset(a) && a.cells() != b.cells() {
                    if let Some(overlap) = self.intersect(a, b)? {
                        derived.push(overlap);
                    }
                }
            }
        }

        Ok(derived)
    }

    fn intersect(&self, a: &Constraint, b: &Constraint) -> Result<Option<Constraint>> {
        if self.config.intersection == IntersectionRule::Disabled {
            return Ok(None);
        }
        let shared: BTreeSet<Cell> = a.cells().intersection(b.cells()).copied().collect();
        if shared.is_empty() {
            return Ok(None);
        }

        let size = shared.len() as i64;
        let (ac, bc) = (a.count() as i64, b.count() as i64);
        let count = match self.config.intersection {
            IntersectionRule::Disabled => return Ok(None),
            IntersectionRule::Bounded => {
                // Cells outside the overlap can absorb at most their own number of mines.
                let a_out = a.len() as i64 - size;
                let b_out = b.len() as i64 - size;
                let lo = 0i64.max(ac - a_out).max(bc - b_out);
                let hi = ac.min(bc).min(size);
                if lo > hi {
                    return Err(Contradiction::CountOutOfRange {
                        cells: shared.len(),
                        mines: lo,
                    }
                    .into());
                }
                if lo != hi {
                    return Ok(None);
                }
                lo
            }
            IntersectionRule::MinCount => ac.min(bc).min(size),
        };

        Constraint::from_signed(shared, count).map(Some)
    }
}
