//! Errors raised by the inference engine.
//!
//! "No safe move" and "board exhausted" are normal outcomes reported as
//! `None`, never as errors.

use crate::types::Cell;
use thiserror::Error;

pub type Result<T, E = InferenceError> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InferenceError {
    #[error("cell {cell} is outside the {height}x{width} board")]
    OutOfBounds {
        cell: Cell,
        height: usize,
        width: usize,
    },

    #[error("clue {count} at {cell} exceeds its {neighbors} neighbours")]
    InvalidClue {
        cell: Cell,
        count: usize,
        neighbors: usize,
    },

    /// The observations disagree with what is already known. The knowledge
    /// base that returned this is no longer trustworthy.
    #[error("contradiction: {0}")]
    Contradiction(Contradiction),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Contradiction {
    #[error("{mines} mines claimed among {cells} cells")]
    CountOutOfRange { cells: usize, mines: i64 },

    #[error("the same {cells} cells hold both {first} and {second} mines")]
    ConflictingCounts {
        cells: usize,
        first: usize,
        second: usize,
    },

    #[error("cell {0} is already known to be safe")]
    MineWasSafe(Cell),

    #[error("cell {0} is already known to be a mine")]
    SafeWasMine(Cell),
}

impl From<Contradiction> for InferenceError {
    fn from(c: Contradiction) -> Self {
        InferenceError::Contradiction(c)
    }
}
