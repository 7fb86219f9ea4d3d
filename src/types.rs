//! Core board types shared by the game and the inference engine.
//!
//! Grids use flat `Vec` storage with row-major layout:
//! `cells[row * width + col]`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One board position. Ordered row-major, so a `BTreeSet<Cell>` iterates
/// top-left to bottom-right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    #[inline(always)]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Geometry of a fixed-size board, as seen by the inference engine.
///
/// The engine never asks whether a cell is a mine; it only needs bounds and
/// the clipped 8-connected neighbourhood of a cell.
pub trait BoardQuery {
    fn height(&self) -> usize;

    fn width(&self) -> usize;

    #[inline]
    fn in_bounds(&self, cell: Cell) -> bool {
        cell.row < self.height() && cell.col < self.width()
    }

    /// Neighbours of `cell` within Chebyshev distance 1, excluding `cell`.
    /// Callers must check `in_bounds` first.
    fn neighbors(&self, cell: Cell) -> &[Cell];

    #[inline]
    fn cell_count(&self) -> usize {
        self.height() * self.width()
    }

    /// Every cell of the board in row-major order.
    fn cells(&self) -> Cells {
        Cells {
            width: self.width(),
            next: 0,
            total: self.cell_count(),
        }
    }
}

/// Row-major iterator over board cells, returned by [`BoardQuery::cells`].
pub struct Cells {
    width: usize,
    next: usize,
    total: usize,
}

impl Iterator for Cells {
    type Item = Cell;

    fn next(&mut self) -> Option<Cell> {
        if self.next >= self.total {
            return None;
        }
        let idx = self.next;
        self.next += 1;
        Some(Cell::new(idx / self.width, idx % self.width))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.total - self.next;
        (left, Some(left))
    }
}

/// Adjacent-mine numbers: 0-8 for every non-mine cell.
/// Mine cells keep 0; their value is never revealed.
#[derive(Clone, Debug)]
pub struct Counts {
    pub height: usize,
    pub width: usize,
    pub cells: Vec<u8>,
}

impl Counts {
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            cells: vec![0; height * width],
        }
    }

    #[inline(always)]
    pub fn get(&self, cell: Cell) -> u8 {
        self.cells[cell.row * self.width + cell.col]
    }

    #[inline(always)]
    pub fn set(&mut self, cell: Cell, val: u8) {
        self.cells[cell.row * self.width + cell.col] = val;
    }
}

/// Ground-truth mine positions.
/// Uses `Vec<u8>` (0/1) instead of `Vec<bool>` for simpler WASM interop.
#[derive(Clone, Debug)]
pub struct Mines {
    pub height: usize,
    pub width: usize,
    pub cells: Vec<u8>,
}

impl Mines {
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            cells: vec![0; height * width],
        }
    }

    #[inline(always)]
    pub fn get(&self, cell: Cell) -> bool {
        self.cells[cell.row * self.width + cell.col] != 0
    }

    #[inline(always)]
    pub fn set(&mut self, cell: Cell, val: bool) {
        self.cells[cell.row * self.width + cell.col] = val as u8;
    }

    /// Count total mines on the board.
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&v| v != 0).count()
    }

    /// Mine cells in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Cell> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, v)| **v != 0)
            .map(move |(idx, _)| Cell::new(idx / width, idx % width))
    }
}

/// Pre-computed neighbour table for every cell.
///
/// Indexed by `row * width + col`; each entry is a slice of in-bounds
/// neighbours in scan order (row offset -1..=1, then column offset -1..=1).
#[derive(Clone, Debug)]
pub struct NeighborCache {
    height: usize,
    width: usize,
    /// Flat storage of all neighbour cells.
    data: Vec<Cell>,
    /// offsets[i] = start index in `data` for cell i.
    /// offsets[i+1] - offsets[i] = number of neighbours for cell i.
    offsets: Vec<usize>,
}

impl NeighborCache {
    /// Build the neighbour cache for a board of the given dimensions.
    pub fn new(height: usize, width: usize) -> Self {
        let total = height * width;
        let mut data = Vec::with_capacity(total * 8);
        let mut offsets = Vec::with_capacity(total + 1);

        for row in 0..height {
            for col in 0..width {
                offsets.push(data.len());
                for dr in -1i64..=1 {
                    for dc in -1i64..=1 {
                        if dr == 0 && dc == 0 {
                            continue;
                        }
                        let nr = row as i64 + dr;
                        let nc = col as i64 + dc;
                        if nr >= 0 && nr < height as i64 && nc >= 0 && nc < width as i64 {
                            data.push(Cell::new(nr as usize, nc as usize));
                        }
                    }
                }
            }
        }
        offsets.push(data.len()); // sentinel

        Self {
            height,
            width,
            data,
            offsets,
        }
    }
}

impl BoardQuery for NeighborCache {
    #[inline]
    fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn width(&self) -> usize {
        self.width
    }

    #[inline(always)]
    fn neighbors(&self, cell: Cell) -> &[Cell] {
        let idx = cell.row * self.width + cell.col;
        &self.data[self.offsets[idx]..self.offsets[idx + 1]]
    }
}
