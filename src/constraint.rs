//! A single unit of knowledge: "exactly `count` of these cells are mines".

use crate::error::{Contradiction, Result};
use crate::types::Cell;
use std::collections::BTreeSet;
use std::fmt;

/// `count` of `cells` are mines, with `0 <= count <= |cells|` always.
///
/// Constraints are plain values owned by the knowledge base. Equality and
/// hashing are structural over the cell set and the count.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Constraint {
    cells: BTreeSet<Cell>,
    count: usize,
}

impl Constraint {
    pub fn new(cells: impl IntoIterator<Item = Cell>, count: usize) -> Result<Self> {
        let cells: BTreeSet<Cell> = cells.into_iter().collect();
        if count > cells.len() {
            return Err(Contradiction::CountOutOfRange {
                cells: cells.len(),
                mines: count as i64,
            }
            .into());
        }
        Ok(Self { cells, count })
    }

    /// Build from a count that may have gone negative during derivation.
    pub(crate) fn from_signed(cells: BTreeSet<Cell>, count: i64) -> Result<Self> {
        if count < 0 || count as usize > cells.len() {
            return Err(Contradiction::CountOutOfRange {
                cells: cells.len(),
                mines: count,
            }
            .into());
        }
        Ok(Self {
            cells,
            count: count as usize,
        })
    }

    #[inline]
    pub fn cells(&self) -> &BTreeSet<Cell> {
        &self.cells
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// An empty constraint carries no information.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    /// Every cell, when the count equals the number of cells.
    pub fn known_mines(&self) -> BTreeSet<Cell> {
        if !self.cells.is_empty() && self.count == self.cells.len() {
            self.cells.clone()
        } else {
            BTreeSet::new()
        }
    }

    /// Every cell, when the count is zero.
    pub fn known_safes(&self) -> BTreeSet<Cell> {
        if self.count == 0 {
            self.cells.clone()
        } else {
            BTreeSet::new()
        }
    }

    /// Account for `cell` being a mine. Returns whether the constraint changed.
    pub fn remove_as_mine(&mut self, cell: Cell) -> Result<bool> {
        if !self.cells.contains(&cell) {
            return Ok(false);
        }
        if self.count == 0 {
            return Err(Contradiction::MineWasSafe(cell).into());
        }
        self.cells.remove(&cell);
        self.count -= 1;
        Ok(true)
    }

    /// Account for `cell` being safe. Returns whether the constraint changed.
    pub fn remove_as_safe(&mut self, cell: Cell) -> Result<bool> {
        if !self.cells.contains(&cell) {
            return Ok(false);
        }
        if self.count == self.cells.len() {
            return Err(Contradiction::SafeWasMine(cell).into());
        }
        self.cells.remove(&cell);
        Ok(true)
    }

    /// `self.cells` is a proper subset of `other.cells`.
    #[inline]
    pub fn is_strict_subset(&self, other: &Constraint) -> bool {
        self.cells.len() < other.cells.len() && self.cells.is_subset(&other.cells)
    }

    /// `other − self`, valid when `self` is a strict subset of `other`.
    pub fn difference_from(&self, other: &Constraint) -> Result<Constraint> {
        let cells: BTreeSet<Cell> = other.cells.difference(&self.cells).copied().collect();
        Constraint::from_signed(cells, other.count as i64 - self.count as i64)
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
    use crate::error::InferenceError;

    fn c(cells: &[(usize, usize)], count: usize) -> Constraint {
        Constraint::new(cells.iter().map(|&p| Cell::from(p)), count).unwrap()
    }

    #[test]
    fn test_new_rejects_count_above_size() {
        let err = Constraint::new([Cell::new(0, 0)], 2).unwrap_err();
        assert_eq!(
            err,
            InferenceError::Contradiction(Contradiction::CountOutOfRange { cells: 1, mines: 2 })
        );
    }

    #[test]
    fn test_known_mines_and_safes() {
        let all = c(&[(0, 0), (0, 1)], 2);
        assert_eq!(all.known_mines().len(), 2);
        assert!(all.known_safes().is_empty());

        let none = c(&[(0, 0), (0, 1)], 0);
        assert!(none.known_mines().is_empty());
        assert_eq!(none.known_safes().len(), 2);

        let some = c(&[(0, 0), (0, 1)], 1);
        assert!(some.known_mines().is_empty());
        assert!(some.known_safes().is_empty());
    }

    #[test]
    fn test_remove_as_mine_decrements() {
        let mut k = c(&[(0, 0), (0, 1), (1, 1)], 2);
        assert!(k.remove_as_mine(Cell::new(0, 1)).unwrap());
        assert_eq!(k, c(&[(0, 0), (1, 1)], 1));
        // Not contained: no-op
        assert!(!k.remove_as_mine(Cell::new(5, 5)).unwrap());
        assert_eq!(k.count(), 1);
    }

    #[test]
    fn test_remove_as_safe_keeps_count() {
        let mut k = c(&[(0, 0), (0, 1), (1, 1)], 2);
        assert!(k.remove_as_safe(Cell::new(0, 0)).unwrap());
        assert_eq!(k, c(&[(0, 1), (1, 1)], 2));
        assert!(!k.remove_as_safe(Cell::new(0, 0)).unwrap());
    }

    #[test]
    fn test_removal_contradictions() {
        let mut zero = c(&[(0, 0), (0, 1)], 0);
        assert!(zero.remove_as_mine(Cell::new(0, 0)).is_err());

        let mut full = c(&[(0, 0), (0, 1)], 2);
        assert!(full.remove_as_safe(Cell::new(0, 1)).is_err());
    }

    #[test]
    fn test_equality_ignores_insertion_order() {
        let a = c(&[(1, 1), (0, 0)], 1);
        let b = c(&[(0, 0), (1, 1)], 1);
        assert_eq!(a, b);
        assert_ne!(a, c(&[(0, 0), (1, 1)], 0));
    }

    #[test]
    fn test_difference_from_subset() {
        let small = c(&[(0, 0), (0, 1)], 1);
        let big = c(&[(0, 0), (0, 1), (0, 2)], 1);
        assert!(small.is_strict_subset(&big));
        assert!(!big.is_strict_subset(&small));
        assert!(!small.is_strict_subset(&small));
        assert_eq!(small.difference_from(&big).unwrap(), c(&[(0, 2)], 0));
    }

    #[test]
    fn test_difference_negative_is_contradiction() {
        let small = c(&[(0, 0), (0, 1)], 2);
        let big = c(&[(0, 0), (0, 1), (0, 2)], 1);
        assert!(small.difference_from(&big).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(c(&[(0, 1), (0, 0)], 1).to_string(), "{(0, 0), (0, 1)} = 1");
    }
}
