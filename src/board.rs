//! The game the AI plays against: mine placement, clue numbers, flags.
//!
//! The inference engine never reads from here directly. The controlling
//! loop reveals a cell and forwards the number it gets back.

use crate::rng::WasmRng;
use crate::types::{BoardQuery, Cell, Counts, Mines, NeighborCache};
use std::collections::BTreeSet;

const MAX_PLACEMENT_ATTEMPTS: usize = 100_000;

/// Place mines randomly, skipping cells within `safe_radius` (Chebyshev) of
/// `safe`. With `safe = None` every cell is eligible.
pub fn place_mines_random(
    height: usize,
    width: usize,
    mine_count: usize,
    safe: Option<(Cell, usize)>,
    rng: &mut WasmRng,
) -> Mines {
    let mut mines = Mines::new(height, width);
    if height == 0 || width == 0 {
        return mines;
    }
    let mut placed = 0;
    let mut attempts = 0;

    while placed < mine_count && attempts < MAX_PLACEMENT_ATTEMPTS {
        attempts += 1;
        let cell = Cell::new(rng.gen_range(height), rng.gen_range(width));

        // Check exclusion zone
        if let Some((start, radius)) = safe {
            if cell.row.abs_diff(start.row) <= radius && cell.col.abs_diff(start.col) <= radius {
                continue;
            }
        }

        if !mines.get(cell) {
            mines.set(cell, true);
            placed += 1;
        }
    }

    mines
}

/// Calculate the neighbour mine counts for all non-mine cells.
///
/// Mine cells keep 0; nothing ever reveals them.
pub fn calculate_numbers(mines: &Mines, neighbors: &NeighborCache) -> Counts {
    let mut counts = Counts::new(mines.height, mines.width);

    for cell in neighbors.cells() {
        if mines.get(cell) {
            continue;
        }
        let count = neighbors
            .neighbors(cell)
            .iter()
            .filter(|&&n| mines.get(n))
            .count();
        counts.set(cell, count as u8);
    }

    counts
}

/// A Minesweeper board with ground truth and the player's flags.
#[derive(Clone, Debug)]
pub struct Minesweeper {
    mines: Mines,
    counts: Counts,
    neighbors: NeighborCache,
    flagged: BTreeSet<Cell>,
}

impl Minesweeper {
    /// Random board with `mine_count` mines anywhere.
    pub fn new(height: usize, width: usize, mine_count: usize, rng: &mut WasmRng) -> Self {
        Self::from_mines(place_mines_random(height, width, mine_count, None, rng))
    }

    /// Random board that keeps the `radius` square around `start` mine-free,
    /// so the first reveal never loses.
    pub fn with_safe_zone(
        height: usize,
        width: usize,
        mine_count: usize,
        start: Cell,
        radius: usize,
        rng: &mut WasmRng,
    ) -> Self {
        Self::from_mines(place_mines_random(
            height,
            width,
            mine_count,
            Some((start, radius)),
            rng,
        ))
    }

    /// Board with a fixed layout. Out-of-bounds cells are ignored.
    pub fn with_mines(height: usize, width: usize, cells: impl IntoIterator<Item = Cell>) -> Self {
        let mut mines = Mines::new(height, width);
        for cell in cells {
            if cell.row < height && cell.col < width {
                mines.set(cell, true);
            }
        }
        Self::from_mines(mines)
    }

    pub fn from_mines(mines: Mines) -> Self {
        let neighbors = NeighborCache::new(mines.height, mines.width);
        let counts = calculate_numbers(&mines, &neighbors);
        Self {
            mines,
            counts,
            neighbors,
            flagged: BTreeSet::new(),
        }
    }

    #[inline]
    pub fn is_mine(&self, cell: Cell) -> bool {
        self.mines.get(cell)
    }

    /// Number of mines adjacent to `cell`, not counting `cell` itself.
    #[inline]
    pub fn nearby_mines(&self, cell: Cell) -> u8 {
        self.counts.get(cell)
    }

    /// Reveal a cell: its clue, or `None` when it was a mine.
    pub fn reveal(&self, cell: Cell) -> Option<u8> {
        if self.is_mine(cell) {
            None
        } else {
            Some(self.nearby_mines(cell))
        }
    }

    pub fn flag(&mut self, cell: Cell) {
        self.flagged.insert(cell);
    }

    /// Cells the player has flagged, right or wrong.
    pub fn mines_found(&self) -> &BTreeSet<Cell> {
        &self.flagged
    }

    pub fn mine_count(&self) -> usize {
        self.mines.count()
    }

    pub fn mines(&self) -> &Mines {
        &self.mines
    }

    pub fn counts(&self) -> &Counts {
        &self.counts
    }

    /// Won once the flags are exactly the mines.
    pub fn won(&self) -> bool {
        self.flagged.len() == self.mines.count()
            && self.flagged.iter().all(|&c| self.mines.get(c))
    }
}

impl BoardQuery for Minesweeper {
    fn height(&self) -> usize {
        self.mines.height
    }

    fn width(&self) -> usize {
        self.mines.width
    }

    fn neighbors(&self, cell: Cell) -> &[Cell] {
        self.neighbors.neighbors(cell)
    }
}

/// Result of a board generation attempt.
pub struct BoardResult {
    pub game: Minesweeper,
    /// How many random layouts were tried before finding a solvable one.
    pub attempts: u32,
    /// True if a solvable board was found within max_attempts.
    pub success: bool,
}

/// Generate a board that can be cleared from `start` without guessing.
///
/// The `is_solvable_fn` parameter allows injecting the solver, which keeps
/// this module independent of the inference engine.
pub fn generate_solvable_board<F>(
    height: usize,
    width: usize,
    mine_count: usize,
    start: Cell,
    safe_radius: usize,
    max_attempts: u32,
    rng: &mut WasmRng,
    is_solvable_fn: F,
) -> BoardResult
where
    F: Fn(&Minesweeper, Cell) -> bool,
{
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;

        let game = Minesweeper::with_safe_zone(height, width, mine_count, start, safe_radius, rng);

        if is_solvable_fn(&game, start) {
            return BoardResult {
                game,
                attempts,
                success: true,
            };
        }

        if attempts >= max_attempts {
            // Return the last attempted board (not solvable, but best effort)
            return BoardResult {
                game,
                attempts,
                success: false,
            };
        }
    }
}
