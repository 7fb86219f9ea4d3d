//! Knowledge-based Minesweeper AI.
//!
//! The engine turns revealed clues into constraints over unknown cells and
//! propagates them to a fixed point, so it only guesses when no cell is
//! provably safe. Usable natively or from JavaScript via wasm-bindgen.
//!
//! Typical loop:
//! ```
//! use minesweeper_ai::{Cell, KnowledgeBase, MoveSelector, Minesweeper};
//!
//! let game = Minesweeper::with_mines(3, 3, [Cell::new(0, 0)]);
//! let mut kb = KnowledgeBase::new(3, 3);
//! let mut selector = MoveSelector::from_seed(7);
//!
//! let first = Cell::new(2, 2);
//! kb.observe(first, game.nearby_mines(first) as usize).unwrap();
//! let next = selector.select(&kb).unwrap();
//! assert!(!game.is_mine(next.cell));
//! ```

pub mod board;
pub mod config;
pub mod constraint;
pub mod error;
pub mod knowledge;
pub mod rng;
pub mod selector;
pub mod solver;
pub mod types;

pub use board::Minesweeper;
pub use config::{InferenceConfig, IntersectionRule};
pub use constraint::Constraint;
pub use error::{Contradiction, InferenceError, Result};
pub use knowledge::{KnowledgeBase, Resolution};
pub use rng::WasmRng;
pub use selector::{Move, MoveKind, MoveSelector};
pub use types::{BoardQuery, Cell, NeighborCache};

// ─── WASM Exports (only compiled for wasm32 target) ─────────────────────────

#[cfg(target_arch = "wasm32")]
mod wasm_exports {
    use crate::board::{self, Minesweeper};
    use crate::config::InferenceConfig;
    use crate::knowledge::KnowledgeBase;
    use crate::selector::MoveSelector;
    use crate::solver;
    use crate::types::Cell;
    use wasm_bindgen::prelude::*;

    /// One AI player. Each instance owns its knowledge; games never share state.
    #[wasm_bindgen(js_name = "MinesweeperAi")]
    pub struct WasmAi {
        kb: KnowledgeBase,
        selector: MoveSelector,
    }

    #[wasm_bindgen(js_class = "MinesweeperAi")]
    impl WasmAi {
        #[wasm_bindgen(constructor)]
        pub fn new(height: usize, width: usize) -> WasmAi {
            WasmAi {
                kb: KnowledgeBase::new(height, width),
                selector: MoveSelector::default(),
            }
        }

        /// Create with a config object, e.g. `{ intersection: "disabled" }`.
        #[wasm_bindgen(js_name = "withConfig")]
        pub fn with_config(height: usize, width: usize, config: JsValue) -> Result<WasmAi, JsError> {
            let config: InferenceConfig = if config.is_undefined() || config.is_null() {
                InferenceConfig::default()
            } else {
                serde_wasm_bindgen::from_value(config)?
            };
            Ok(WasmAi {
                kb: KnowledgeBase::with_config(height, width, config),
                selector: MoveSelector::default(),
            })
        }

        /// Feed a revealed cell and its number. Throws on contradiction.
        pub fn observe(&mut self, row: usize, col: usize, count: u8) -> Result<(), JsError> {
            self.kb.observe(Cell::new(row, col), count as usize)?;
            Ok(())
        }

        /// `{ row, col }` of a proven-safe cell, or `null`.
        #[wasm_bindgen(js_name = "nextSafeMove")]
        pub fn next_safe_move(&self) -> Result<JsValue, JsError> {
            cell_or_null(self.kb.next_safe_move())
        }

        /// `{ row, col }` of a random unprobed, non-mine cell, or `null`.
        #[wasm_bindgen(js_name = "suggestFallbackMove")]
        pub fn suggest_fallback_move(&mut self) -> Result<JsValue, JsError> {
            let cell = self.kb.suggest_fallback_move(self.selector.rng_mut());
            cell_or_null(cell)
        }

        /// `{ cell, kind }` with kind `"safe"` or `"fallback"`, or `null`.
        #[wasm_bindgen(js_name = "nextMove")]
        pub fn next_move(&mut self) -> Result<JsValue, JsError> {
            match self.selector.select(&self.kb) {
                Some(mv) => Ok(serde_wasm_bindgen::to_value(&mv)?),
                None => Ok(JsValue::NULL),
            }
        }

        /// `{ cell, score }` or `null`.
        pub fn hint(&self) -> Result<JsValue, JsError> {
            match solver::get_hint(&self.kb) {
                Some(hint) => Ok(serde_wasm_bindgen::to_value(&hint)?),
                None => Ok(JsValue::NULL),
            }
        }

        pub fn safes(&self) -> Result<JsValue, JsError> {
            Ok(serde_wasm_bindgen::to_value(self.kb.safes())?)
        }

        pub fn mines(&self) -> Result<JsValue, JsError> {
            Ok(serde_wasm_bindgen::to_value(self.kb.mines())?)
        }

        #[wasm_bindgen(js_name = "movesMade")]
        pub fn moves_made(&self) -> Result<JsValue, JsError> {
            Ok(serde_wasm_bindgen::to_value(self.kb.moves_made())?)
        }
    }

    fn cell_or_null(cell: Option<Cell>) -> Result<JsValue, JsError> {
        match cell {
            Some(cell) => Ok(serde_wasm_bindgen::to_value(&cell)?),
            None => Ok(JsValue::NULL),
        }
    }

    /// Generate a board the AI can clear from the start cell without guessing.
    /// Returns JS object: `{ success: bool, attempts: u32, mines: Uint8Array, counts: Uint8Array }`
    /// with row-major arrays.
    #[wasm_bindgen(js_name = "generateBoard")]
    pub fn wasm_generate_board(
        height: usize,
        width: usize,
        mine_count: usize,
        start_row: usize,
        start_col: usize,
        safe_radius: usize,
        max_attempts: u32,
    ) -> Result<JsValue, JsValue> {
        let config = InferenceConfig::default();
        let mut rng = crate::rng::WasmRng::new();
        let result = board::generate_solvable_board(
            height,
            width,
            mine_count,
            Cell::new(start_row, start_col),
            safe_radius,
            max_attempts,
            &mut rng,
            |game: &Minesweeper, start| solver::is_solvable(game, start, &config),
        );

        let obj = js_sys::Object::new();
        js_sys::Reflect::set(&obj, &"success".into(), &result.success.into())?;
        js_sys::Reflect::set(&obj, &"attempts".into(), &result.attempts.into())?;

        let mines = &result.game.mines().cells;
        let mines_arr = js_sys::Uint8Array::new_with_length(mines.len() as u32);
        mines_arr.copy_from(mines);
        js_sys::Reflect::set(&obj, &"mines".into(), &mines_arr.into())?;

        let counts = &result.game.counts().cells;
        let counts_arr = js_sys::Uint8Array::new_with_length(counts.len() as u32);
        counts_arr.copy_from(counts);
        js_sys::Reflect::set(&obj, &"counts".into(), &counts_arr.into())?;

        Ok(obj.into())
    }

    /// Ping function to verify WASM is loaded.
    #[wasm_bindgen(js_name = "ping")]
    pub fn wasm_ping() -> String {
        "WASM minesweeper AI ready".to_string()
    }
}
