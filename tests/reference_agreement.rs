//! Property tests checking the bit-packed engine against a naive
//! per-cell reference implementation, per spec.md §8 ("Agreement with a
//! reference"). The reference sums Moore neighbors directly and applies
//! the same `(B, S)` masks the engine's kernel uses internally.

use life_engine::{Grid, Rule, StepOptions};
use proptest::prelude::*;

/// Naive O(m·n) reference: for every cell, count live Moore neighbors by
/// direct indexing (out-of-bounds reads as dead, i.e. Dirichlet), then
/// apply `(birth, survival)` neighbor-count sets exactly as the spec
/// defines them.
fn reference_step(cells: &[Vec<bool>], height: usize, width: usize, rule: Rule) -> Vec<Vec<bool>> {
    let mut next = vec![vec![false; width]; height];
    for r in 0..height {
        for c in 0..width {
            let mut count = 0u8;
            for dr in -1i64..=1 {
                for dc in -1i64..=1 {
                    if dr == 0 && dc == 0 {
                        continue;
                    }
                    let nr = r as i64 + dr;
                    let nc = c as i64 + dc;
                    if nr >= 0 && nr < height as i64 && nc >= 0 && nc < width as i64 && cells[nr as usize][nc as usize]
                    {
                        count += 1;
                    }
                }
            }
            let alive = cells[r][c];
            let survives = count > 0 && rule.survival_counts().any(|k| k == count);
            let born = count > 0 && rule.birth_counts().any(|k| k == count);
            next[r][c] = (alive && survives) || (!alive && born);
        }
    }
    next
}

fn bitmap_strategy(max_height: usize, max_width: usize) -> impl Strategy<Value = Vec<Vec<bool>>> {
    (1..=max_height, 1..=max_width).prop_flat_map(|(h, w)| {
        prop::collection::vec(prop::collection::vec(any::<bool>(), w), h)
    })
}

fn rule_strategy() -> impl Strategy<Value = Rule> {
    prop_oneof![
        Just(Rule::CONWAY),
        Just(Rule::HIGHLIFE),
        Just(Rule::SEEDS),
        Just(Rule::B234_S),
        (prop::collection::vec(1u8..=8, 0..5), prop::collection::vec(1u8..=8, 0..5)).prop_map(
            |(b, s)| {
                let birth: String = b.iter().map(|k| k.to_string()).collect();
                let survival: String = s.iter().map(|k| k.to_string()).collect();
                Rule::parse(&format!("B{birth}/S{survival}")).unwrap()
            }
        ),
    ]
}

fn seed(grid: &mut Grid, bitmap: &[Vec<bool>]) {
    for (r, row) in bitmap.iter().enumerate() {
        for (c, &alive) in row.iter().enumerate() {
            if alive {
                grid.set(r, c, true).unwrap();
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// The engine matches the naive reference for one generation, across
    /// dimensions that straddle the C=62 cluster boundary and a mix of
    /// popular and arbitrary totalistic rules.
    #[test]
    fn engine_matches_reference_after_one_step(
        bitmap in bitmap_strategy(20, 140),
        rule in rule_strategy(),
    ) {
        let height = bitmap.len();
        let width = bitmap[0].len();

        let mut grid = Grid::new(height, width, rule).unwrap();
        seed(&mut grid, &bitmap);
        grid.step(StepOptions::default());

        let expected = reference_step(&bitmap, height, width, rule);
        for r in 0..height {
            for c in 0..width {
                prop_assert_eq!(
                    grid.get(r, c).unwrap(),
                    expected[r][c],
                    "mismatch at ({}, {}) for rule {}",
                    r, c, rule
                );
            }
        }
    }

    /// Determinism: chunk length and parallel/serial choice never change
    /// the result, for arbitrary bitmaps and rules over several steps.
    #[test]
    fn result_independent_of_chunking_and_parallelism(
        bitmap in bitmap_strategy(30, 130),
        rule in rule_strategy(),
        chunk_len in 1usize..40,
        generations in 1usize..4,
    ) {
        let height = bitmap.len();
        let width = bitmap[0].len();

        let mut serial = Grid::new(height, width, rule).unwrap();
        let mut odd_chunked = Grid::new(height, width, rule).unwrap();
        let mut forced_parallel = Grid::new(height, width, rule).unwrap();
        seed(&mut serial, &bitmap);
        seed(&mut odd_chunked, &bitmap);
        seed(&mut forced_parallel, &bitmap);

        for _ in 0..generations {
            serial.step(StepOptions { chunk_len: 64, parallel: Some(false) });
            odd_chunked.step(StepOptions { chunk_len, parallel: Some(false) });
            forced_parallel.step(StepOptions { chunk_len, parallel: Some(true) });
        }

        for r in 0..height {
            for c in 0..width {
                let a = serial.get(r, c).unwrap();
                prop_assert_eq!(a, odd_chunked.get(r, c).unwrap());
                prop_assert_eq!(a, forced_parallel.get(r, c).unwrap());
            }
        }
    }

    /// B/S (both empty) collapses any grid to all-dead after one step.
    #[test]
    fn always_die_rule_collapses_any_bitmap(
        bitmap in bitmap_strategy(15, 90),
    ) {
        let height = bitmap.len();
        let width = bitmap[0].len();
        let always_die = Rule::parse("B/S").unwrap();
        let mut grid = Grid::new(height, width, always_die).unwrap();
        seed(&mut grid, &bitmap);
        grid.step(StepOptions::default());
        for r in 0..height {
            for c in 0..width {
                prop_assert!(!grid.get(r, c).unwrap());
            }
        }
    }
}
