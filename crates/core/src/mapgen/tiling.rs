//! Tile-grid factorisation: how many copies of one tile fit along each axis.

use std::ops::RangeInclusive;

use rand_chacha::rand_core::Rng;
use serde::Serialize;

use super::error::MapGenError;
use super::random::range_i32;

/// A `row_tiles x col_tiles` grid of identical `tile_rows x tile_cols` tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Tiling {
    pub row_tiles: i32,
    pub col_tiles: i32,
    pub tile_rows: i32,
    pub tile_cols: i32,
}

impl Tiling {
    pub fn world_rows(&self) -> i32 {
        self.tile_rows * self.row_tiles
    }

    pub fn world_cols(&self) -> i32 {
        self.tile_cols * self.col_tiles
    }

    pub fn tile_count(&self) -> usize {
        (self.row_tiles * self.col_tiles) as usize
    }
}

/// Every ordered pair `(a, b)` with `a * b == value`, smallest `a` first.
pub fn factor_pairs(value: i32) -> Vec<(i32, i32)> {
    (1..=value).filter(|a| value % a == 0).map(|a| (a, value / a)).collect()
}

/// Tile sizes that let `tiles` copies span a world between `min_size` and
/// `max_size`, or `None` when no such size exists.
pub fn tile_size_range(min_size: i32, max_size: i32, tiles: i32) -> Option<RangeInclusive<i32>> {
    let min_tile = (min_size + tiles - 1) / tiles;
    let max_tile = max_size / tiles;
    (min_tile <= max_tile).then_some(min_tile..=max_tile)
}

/// Draws a feasible factor pair of `teams`, then a tile size on each axis.
pub fn plan_tiling<R: Rng + ?Sized>(
    rng: &mut R,
    teams: usize,
    width: (i32, i32),
    height: (i32, i32),
) -> Result<Tiling, MapGenError> {
    let no_fit = || MapGenError::NoFeasibleTiling {
        teams,
        min_width: width.0,
        max_width: width.1,
        min_height: height.0,
        max_height: height.1,
    };

    let feasible: Vec<_> = factor_pairs(teams as i32)
        .into_iter()
        .filter_map(|(row_tiles, col_tiles)| {
            let rows = tile_size_range(width.0, width.1, row_tiles)?;
            let cols = tile_size_range(height.0, height.1, col_tiles)?;
            Some((row_tiles, col_tiles, rows, cols))
        })
        .collect();

    if feasible.is_empty() {
        return Err(no_fit());
    }

    let (row_tiles, col_tiles, rows, cols) =
        feasible[range_i32(rng, 0, feasible.len() as i32) as usize].clone();
    let tile_rows = range_i32(rng, *rows.start(), *rows.end() + 1);
    let tile_cols = range_i32(rng, *cols.start(), *cols.end() + 1);

    Ok(Tiling { row_tiles, col_tiles, tile_rows, tile_cols })
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand_chacha::ChaCha8Rng;
    use rand_chacha::rand_core::SeedableRng;

    use super::*;

    #[test]
    fn factor_pairs_cover_both_orientations() {
        assert_eq!(factor_pairs(1), vec![(1, 1)]);
        assert_eq!(factor_pairs(6), vec![(1, 6), (2, 3), (3, 2), (6, 1)]);
        assert_eq!(factor_pairs(7), vec![(1, 7), (7, 1)]);
    }

    #[test]
    fn tile_size_range_rounds_inward() {
        assert_eq!(tile_size_range(75, 100, 2), Some(38..=50));
        assert_eq!(tile_size_range(64, 96, 3), Some(22..=32));
        assert_eq!(tile_size_range(10, 10, 3), None);
        assert_eq!(tile_size_range(9, 9, 3), Some(3..=3));
    }

    #[test]
    fn infeasible_bounds_fail_with_descriptive_error() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = plan_tiling(&mut rng, 7, (10, 12), (10, 12)).unwrap_err();
        assert_eq!(
            err,
            MapGenError::NoFeasibleTiling {
                teams: 7,
                min_width: 10,
                max_width: 12,
                min_height: 10,
                max_height: 12
            }
        );
        assert!(err.to_string().contains("unable to fit a valid tiling"));
    }

    #[test]
    fn single_feasible_pair_is_always_chosen() {
        // 31 columns cannot be split in two, so the 2x1 arrangement is the only fit.
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let tiling = plan_tiling(&mut rng, 2, (20, 21), (31, 31)).unwrap();
            assert_eq!(tiling, Tiling { row_tiles: 2, col_tiles: 1, tile_rows: 10, tile_cols: 31 });
        }
    }

    proptest! {
        #[test]
        fn planned_tiling_multiplies_to_team_count_and_respects_bounds(
            seed in any::<u64>(),
            teams in 1_usize..=10,
            min_width in 8_i32..120,
            width_span in 0_i32..60,
            min_height in 8_i32..120,
            height_span in 0_i32..60,
        ) {
            let width = (min_width, min_width + width_span);
            let height = (min_height, min_height + height_span);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            match plan_tiling(&mut rng, teams, width, height) {
                Ok(tiling) => {
                    prop_assert_eq!(tiling.tile_count(), teams);
                    prop_assert!(tile_size_range(width.0, width.1, tiling.row_tiles).is_some());
                    prop_assert!(tile_size_range(height.0, height.1, tiling.col_tiles).is_some());
                    prop_assert!((width.0..=width.1).contains(&tiling.world_rows()));
                    prop_assert!((height.0..=height.1).contains(&tiling.world_cols()));
                }
                Err(MapGenError::NoFeasibleTiling { .. }) => {
                    let any_fit = factor_pairs(teams as i32).into_iter().any(|(a, b)| {
                        tile_size_range(width.0, width.1, a).is_some()
                            && tile_size_range(height.0, height.1, b).is_some()
                    });
                    prop_assert!(!any_fit);
                }
                Err(other) => prop_assert!(false, "unexpected error {other}"),
            }
        }
    }
}
