// tests/inference_properties.rs
#![forbid(unsafe_code)]

/**
 * Property tests for the knowledge base, driven by real generated boards.
 *
 * A game is played with ground truth available to the test: proven-safe
 * moves are taken when known, otherwise the test reveals a random non-mine
 * cell so the game always runs to the end.
 *
 * Invariants covered:
 * - Every stored constraint has `0 <= count <= |cells|` and matches ground truth.
 * - `safes`, `mines` and `moves_made` only grow.
 * - `safes` and `mines` stay disjoint and agree with ground truth.
 * - Constraints never mention a decided cell and are never duplicated.
 * - Resolving again right after `observe` changes nothing.
 * - Marking a mine drops it from every constraint and lowers each count by one.
 */
use minesweeper_ai::{
    BoardQuery, Cell, InferenceConfig, IntersectionRule, KnowledgeBase, Minesweeper,
    WasmRng,
};
use proptest::prelude::*;
use std::collections::HashSet;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn assert_consistent(kb: &KnowledgeBase, game: &Minesweeper) {
    assert!(kb.safes().is_disjoint(kb.mines()));
    for &s in kb.safes() {
        assert!(!game.is_mine(s), "{s} proven safe but is a mine");
    }
    for &m in kb.mines() {
        assert!(game.is_mine(m), "{m} proven mine but is safe");
    }

    let mut seen = HashSet::new();
    for c in kb.constraints() {
        assert!(!c.is_empty());
        assert!(c.count() <= c.len());
        assert!(c.cells().is_disjoint(kb.safes()));
        assert!(c.cells().is_disjoint(kb.mines()));
        let actual = c.cells().iter().filter(|&&cell| game.is_mine(cell)).count();
        assert_eq!(actual, c.count(), "{c} disagrees with the board");
        assert!(seen.insert(c.clone()), "duplicate constraint {c}");
    }
}

/// Play to the end, checking invariants after every observation.
fn play_checked(game: &Minesweeper, config: InferenceConfig, seed: u64) -> KnowledgeBase {
    let mut kb = KnowledgeBase::with_config(game.height(), game.width(), config);
    let mut rng = WasmRng::from_seed(seed);

    loop {
        let cell = match kb.next_safe_move() {
            Some(cell) => cell,
            None => {
                let open: Vec<Cell> = game
                    .cells()
                    .filter(|&c| !game.is_mine(c) && !kb.moves_made().contains(&c))
                    .collect();
                match rng.choose(&open) {
                    Some(&cell) => cell,
                    None => break,
                }
            }
        };
        assert!(!game.is_mine(cell), "engine walked into a mine at {cell}");

        let safes = kb.safes().clone();
        let mines = kb.mines().clone();
        let moves = kb.moves_made().clone();

        kb.observe(cell, game.nearby_mines(cell) as usize).unwrap();

        assert!(kb.safes().is_superset(&safes));
        assert!(kb.mines().is_superset(&mines));
        assert!(kb.moves_made().is_superset(&moves));
        assert!(kb.moves_made().contains(&cell));
        assert_consistent(&kb, game);

        let again = kb.resolve().unwrap();
        assert!(!again.changed);
        assert_eq!(again.passes, 1);
    }

    kb
}

#[test]
fn scenario_subset_difference_makes_third_cell_safe() {
    init_tracing();
    let (a, b, c) = (Cell::new(0, 0), Cell::new(0, 1), Cell::new(0, 2));
    // Mine at B. Revealing (1,0) gives {A,B,(1,1)} = 1, then revealing (1,1)
    // shrinks that to {A,B} = 1 and adds {A,B,C,(1,2)} = 1.
    let game = Minesweeper::with_mines(2, 4, [b]);
    let mut kb = KnowledgeBase::new(2, 4);
    kb.observe(Cell::new(1, 0), game.nearby_mines(Cell::new(1, 0)) as usize).unwrap();
    kb.observe(Cell::new(1, 1), game.nearby_mines(Cell::new(1, 1)) as usize).unwrap();

    // Subset difference: {C,(1,2)} = 0
    assert!(kb.safes().contains(&c));
    assert!(kb.safes().contains(&Cell::new(1, 2)));
    assert!(!kb.safes().contains(&a));
    assert_consistent(&kb, &game);
}

#[test]
fn full_game_on_beginner_board_is_consistent() {
    init_tracing();
    let mut rng = WasmRng::from_seed(2024);
    let game = Minesweeper::with_safe_zone(9, 9, 10, Cell::new(4, 4), 1, &mut rng);
    let kb = play_checked(&game, InferenceConfig::default(), 2024);

    assert_eq!(kb.moves_made().len(), 81 - 10);
    assert_eq!(kb.next_safe_move(), None);
}

#[test]
fn observing_a_revealed_cell_again_changes_nothing() {
    let mut rng = WasmRng::from_seed(5);
    let game = Minesweeper::with_safe_zone(6, 6, 6, Cell::new(0, 0), 1, &mut rng);
    let mut kb = KnowledgeBase::new(6, 6);
    let start = Cell::new(0, 0);
    kb.observe(start, game.nearby_mines(start) as usize).unwrap();

    let snapshot = kb.clone();
    kb.observe(start, game.nearby_mines(start) as usize).unwrap();
    assert_eq!(kb.constraints(), snapshot.constraints());
    assert_eq!(kb.safes(), snapshot.safes());
    assert_eq!(kb.mines(), snapshot.mines());
    assert_eq!(kb.moves_made(), snapshot.moves_made());
}

proptest! {
    #[test]
    fn generated_games_respect_core_invariants(
        seed in any::<u64>(),
        height in 1usize..8,
        width in 1usize..8,
        density in 0usize..40,
        disabled in any::<bool>(),
    ) {
        let mut rng = WasmRng::from_seed(seed);
        let mine_count = height * width * density / 100;
        let game = Minesweeper::new(height, width, mine_count, &mut rng);
        let config = InferenceConfig {
            intersection: if disabled { IntersectionRule::Disabled } else { IntersectionRule::Bounded },
            ..Default::default()
        };

        let kb = play_checked(&game, config, seed);
        prop_assert_eq!(kb.moves_made().len(), height * width - game.mine_count());
    }

    #[test]
    fn mark_mine_shrinks_every_constraint_holding_it(
        seed in any::<u64>(),
        reveals in 1usize..6,
    ) {
        let mut rng = WasmRng::from_seed(seed);
        let game = Minesweeper::new(7, 7, 10, &mut rng);
        let config = InferenceConfig { intersection: IntersectionRule::Disabled, ..Default::default() };
        let mut kb = KnowledgeBase::with_config(7, 7, config);

        let open: Vec<Cell> = game.cells().filter(|&c| !game.is_mine(c)).collect();
        for _ in 0..reveals {
            if let Some(&cell) = rng.choose(&open) {
                kb.observe(cell, game.nearby_mines(cell) as usize).unwrap();
            }
        }

        // Pick a real mine still mentioned by some constraint
        let target = kb
            .constraints()
            .iter()
            .flat_map(|c| c.cells().iter().copied())
            .find(|&c| game.is_mine(c));
        if let Some(mine) = target {
            let before = kb.constraints().to_vec();
            kb.mark_mine(mine).unwrap();
            prop_assert_eq!(before.len(), kb.constraints().len());
            for (old, new) in before.iter().zip(kb.constraints()) {
                prop_assert!(!new.contains(mine));
                if old.contains(mine) {
                    prop_assert_eq!(new.count() + 1, old.count());
                    prop_assert_eq!(new.len() + 1, old.len());
                } else {
                    prop_assert_eq!(old, new);
                }
            }
        }
    }
}
