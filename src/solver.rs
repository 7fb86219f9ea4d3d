//! Driving the engine against a board.
//!
//! - `play`: the full reveal → observe → select loop, guessing when stuck
//! - `is_solvable`: the same loop with guessing disabled
//! - `get_hint`: best proven-safe cell for a UI hint

use crate::board::Minesweeper;
use crate::config::InferenceConfig;
use crate::error::Result;
use crate::knowledge::KnowledgeBase;
use crate::selector::{MoveKind, MoveSelector};
use crate::types::{BoardQuery, Cell};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "result")]
pub enum Outcome {
    /// Every mine is flagged and nothing else is.
    Won,
    /// A revealed cell was a mine.
    Lost { at: Cell },
    /// No move left, yet the flags do not match the mines. Only reachable
    /// with an unsound intersection rule.
    Stalled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameReport {
    pub outcome: Outcome,
    pub safe_moves: usize,
    pub fallback_moves: usize,
    /// Cells revealed without hitting a mine.
    pub revealed: usize,
}

/// Play `game` to the end. Every proven mine is flagged on the board as
/// soon as it is known.
pub fn play(
    game: &mut Minesweeper,
    config: InferenceConfig,
    selector: &mut MoveSelector,
) -> Result<GameReport> {
    let mut kb = KnowledgeBase::with_config(game.height(), game.width(), config);
    let mut safe_moves = 0;
    let mut fallback_moves = 0;
    let mut revealed = 0;

    let safe_cells = game.cell_count() - game.mine_count();

    let outcome = loop {
        // Every safe cell is open, so whatever is left is a mine, even the
        // ones no clue could pin down.
        if kb.moves_made().len() == safe_cells {
            let rest: Vec<Cell> = game
                .cells()
                .filter(|c| !kb.moves_made().contains(c))
                .collect();
            for cell in rest {
                game.flag(cell);
            }
        }
        if game.won() {
            break Outcome::Won;
        }
        let Some(mv) = selector.select(&kb) else {
            break Outcome::Stalled;
        };
        match mv.kind {
            MoveKind::Safe => safe_moves += 1,
            MoveKind::Fallback => fallback_moves += 1,
        }

        let Some(count) = game.reveal(mv.cell) else {
            break Outcome::Lost { at: mv.cell };
        };
        revealed += 1;
        kb.observe(mv.cell, count as usize)?;

        for &mine in kb.mines() {
            game.flag(mine);
        }
    };

    debug!(?outcome, safe_moves, fallback_moves, revealed, "game finished");
    Ok(GameReport {
        outcome,
        safe_moves,
        fallback_moves,
        revealed,
    })
}

/// Whether the engine clears every safe cell of `game` from `start`
/// without a single guess.
pub fn is_solvable(game: &Minesweeper, start: Cell, config: &InferenceConfig) -> bool {
    if !game.in_bounds(start) || game.is_mine(start) {
        return false;
    }
    let mut kb = KnowledgeBase::with_config(game.height(), game.width(), config.clone());

    let mut next = Some(start);
    while let Some(cell) = next {
        let Some(count) = game.reveal(cell) else {
            return false;
        };
        if kb.observe(cell, count as usize).is_err() {
            return false;
        }
        next = kb.next_safe_move();
    }

    kb.moves_made().len() == game.cell_count() - game.mine_count()
}

/// Hint result for the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Hint {
    pub cell: Cell,
    /// Neighbours whose status is still unknown.
    pub score: usize,
}

/// The proven-safe, unprobed cell with the most undecided neighbours,
/// since its clue says the most. Ties go to the smallest cell.
pub fn get_hint<Q: BoardQuery>(kb: &KnowledgeBase<Q>) -> Option<Hint> {
    let mut best: Option<Hint> = None;

    for &cell in kb.safes().difference(kb.moves_made()) {
        let score = kb
            .board()
            .neighbors(cell)
            .iter()
            .filter(|&&n| !kb.safes().contains(&n) && !kb.mines().contains(&n))
            .count();
        if best.map_or(true, |b| score > b.score) {
            best = Some(Hint { cell, score });
        }
    }

    best
}
