//! Move selection: a proven-safe cell when one exists, otherwise a guess.

use crate::knowledge::KnowledgeBase;
use crate::rng::WasmRng;
use crate::types::{BoardQuery, Cell};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveKind {
    /// Deduced safe.
    Safe,
    /// Random pick among cells not known to be mines.
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub cell: Cell,
    pub kind: MoveKind,
}

pub struct MoveSelector {
    rng: WasmRng,
}

impl MoveSelector {
    pub fn new(rng: WasmRng) -> Self {
        Self { rng }
    }

    /// Seeded selector, for reproducible games.
    pub fn from_seed(seed: u64) -> Self {
        Self::new(WasmRng::from_seed(seed))
    }

    /// The next move to make, or `None` when every cell is either probed or
    /// a known mine. Does not touch the knowledge base; the caller reports
    /// the outcome through [`KnowledgeBase::observe`].
    pub fn select<Q: BoardQuery>(&mut self, kb: &KnowledgeBase<Q>) -> Option<Move> {
        if let Some(cell) = kb.next_safe_move() {
            return Some(Move {
                cell,
                kind: MoveKind::Safe,
            });
        }
        let cell = kb.suggest_fallback_move(&mut self.rng)?;
        debug!(cell = %cell, "no safe move known, guessing");
        Some(Move {
            cell,
            kind: MoveKind::Fallback,
        })
    }

    pub fn rng_mut(&mut self) -> &mut WasmRng {
        &mut self.rng
    }
}

impl Default for MoveSelector {
    fn default() -> Self {
        Self::new(WasmRng::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefers_safe_move() {
        let mut kb = KnowledgeBase::new(1, 3);
        kb.observe(Cell::new(0, 0), 0).unwrap();

        let mut sel = MoveSelector::from_seed(1);
        let mv = sel.select(&kb).unwrap();
        assert_eq!(mv, Move { cell: Cell::new(0, 1), kind: MoveKind::Safe });
        // Pure query: asking again gives the same answer
        assert_eq!(sel.select(&kb), Some(mv));
    }

    #[test]
    fn test_falls_back_when_nothing_is_proven() {
        let mut kb = KnowledgeBase::new(3, 3);
        kb.observe(Cell::new(1, 1), 1).unwrap();

        let mut sel = MoveSelector::from_seed(5);
        for _ in 0..20 {
            let mv = sel.select(&kb).unwrap();
            assert_eq!(mv.kind, MoveKind::Fallback);
            assert_ne!(mv.cell, Cell::new(1, 1));
        }
    }

    #[test]
    fn test_exhausted_board() {
        let mut kb = KnowledgeBase::new(1, 2);
        kb.observe(Cell::new(0, 0), 1).unwrap();
        assert!(kb.mines().contains(&Cell::new(0, 1)));

        let mut sel = MoveSelector::from_seed(3);
        assert_eq!(sel.select(&kb), None);
    }

    #[test]
    fn test_move_serializes() {
        let mv = Move { cell: Cell::new(2, 4), kind: MoveKind::Fallback };
        let json = serde_json::to_string(&mv).unwrap();
        assert_eq!(json, r#"{"cell":{"row":2,"col":4},"kind":"fallback"}"#);
    }
}
