//! High-level generation orchestration: one random stream threaded through
//! tiling, cave, hill and team stages, then assembly.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::geometry::Vector;
use crate::grid::CellGrid;
use crate::map_format::fingerprint;
use crate::types::Cell;

use super::assemble::{TileBlueprint, assemble_world};
use super::carve::carve_nodes;
use super::cave::build_cave;
use super::error::MapGenError;
use super::fairness::TeamRotation;
use super::hills::place_hills;
use super::model::{GeneratedMap, GenerationReport};
use super::params::GenerationParams;
use super::random::{range_i32, range_usize};
use super::regions::join_regions;
use super::tiling::{Tiling, plan_tiling};

pub struct MapGenerator {
    params: GenerationParams,
    seed: u64,
}

impl MapGenerator {
    pub fn new(params: GenerationParams, seed: u64) -> Result<Self, MapGenError> {
        params.validate()?;
        Ok(Self { params, seed })
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn generate(&self) -> Result<GeneratedMap, MapGenError> {
        let params = &self.params;
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);

        let tiling = plan_tiling(
            &mut rng,
            params.teams,
            (params.min_width, params.max_width),
            (params.min_height, params.max_height),
        )?;
        let stagger = choose_stagger(&mut rng, &tiling);
        debug!(?tiling, ?stagger, seed = self.seed, "tiling planned");

        let mut tile = CellGrid::filled(tiling.tile_rows, tiling.tile_cols, Cell::WATER)?;
        let cave = build_cave(&mut rng, tiling.tile_rows, tiling.tile_cols, stagger);
        carve_nodes(&mut rng, &mut tile, &cave.nodes, stagger);
        let joined = join_regions(&mut tile);
        debug!(
            kept = cave.nodes.len(),
            sampled = cave.sampled,
            joined,
            land = tile.count(Cell::is_land),
            "tile carved"
        );

        let hills_per_team = range_usize(&mut rng, params.min_hills, params.max_hills + 1);
        let hills =
            place_hills(&mut rng, &tile, &cave.nodes, hills_per_team, params.max_hill_attempts)?;
        debug!(hills_per_team, ?hills, "hills placed");

        let rotation = TeamRotation::shuffled(&mut rng, params.teams)?;
        let land_cells = tile.count(Cell::is_land) * tiling.tile_count();
        let blueprint = TileBlueprint { tile, hills, stagger, tiling };
        let world = assemble_world(&blueprint, &rotation)?;

        let report = GenerationReport {
            seed: self.seed,
            tiling,
            stagger,
            hills_per_team,
            hill_positions: blueprint.hills,
            team_order: rotation.order().to_vec(),
            cave_nodes: cave.nodes.len(),
            sampled_nodes: cave.sampled,
            land_cells,
            fingerprint: fingerprint(&world),
        };
        info!(
            seed = report.seed,
            rows = world.rows(),
            cols = world.cols(),
            teams = world.teams(),
            hills = world.entity_count(),
            fingerprint = report.fingerprint,
            "world generated"
        );

        Ok(GeneratedMap { world, report })
    }
}

/// Brick offset for the tile grid. Only one axis is staggered, by anything
/// short of a full tile on that axis that adds up to whole tiles once the
/// world wraps.
fn choose_stagger<R: Rng + ?Sized>(rng: &mut R, tiling: &Tiling) -> Vector {
    if range_i32(rng, 0, 2) == 0 {
        Vector::new(wrapping_offset(rng, tiling.tile_rows, tiling.col_tiles), 0)
    } else {
        Vector::new(0, wrapping_offset(rng, tiling.tile_cols, tiling.row_tiles))
    }
}

/// A multiple of `tile_len / gcd(tile_len, crossings)` below `tile_len`, so
/// `offset * crossings` is a whole number of tiles.
fn wrapping_offset<R: Rng + ?Sized>(rng: &mut R, tile_len: i32, crossings: i32) -> i32 {
    let choices = gcd(tile_len, crossings);
    range_i32(rng, 0, choices) * (tile_len / choices)
}

fn gcd(mut a: i32, mut b: i32) -> i32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::geometry::Position;
    use crate::map_format::render_map;
    use crate::mapgen::hills::is_hill_site;
    use crate::mapgen::regions::land_regions;
    use crate::types::{EntityKind, MAX_TEAMS};
    use crate::world::World;

    fn four_team_params() -> GenerationParams {
        GenerationParams {
            teams: 4,
            min_width: 75,
            max_width: 100,
            min_height: 75,
            max_height: 100,
            min_hills: 2,
            max_hills: 2,
            max_hill_attempts: Some(100_000),
            ..GenerationParams::default()
        }
    }

    fn hill_neighbourhood_is_land(world: &World, pos: Position) -> bool {
        (-1..=1).all(|dr| {
            (-1..=1).all(|dc| world.cell(world.position(pos.row + dr, pos.col + dc)).is_land())
        })
    }

    #[test]
    fn four_team_scenario_matches_expected_shape() {
        let generated = MapGenerator::new(four_team_params(), 1).unwrap().generate().unwrap();
        let world = &generated.world;
        let report = &generated.report;

        assert_eq!(report.tiling.tile_count(), 4);
        assert!((75..=100).contains(&world.rows()));
        assert!((75..=100).contains(&world.cols()));
        assert_eq!(world.rows() % report.tiling.row_tiles, 0);
        assert_eq!(world.cols() % report.tiling.col_tiles, 0);
        assert_eq!(report.hills_per_team, 2);

        let mut per_team = [0_usize; MAX_TEAMS];
        for entity in world.entities() {
            assert_eq!(entity.kind(), EntityKind::Hill);
            assert!(hill_neighbourhood_is_land(world, entity.position()), "{entity}");
            per_team[entity.team().index()] += 1;
        }
        assert_eq!(&per_team[..4], &[2, 2, 2, 2]);
        assert!(per_team[4..].iter().all(|&count| count == 0));

        assert!(report.land_cells > 0);
        assert!(report.land_cells < world.size().rows as usize * world.size().cols as usize);
    }

    #[test]
    fn hill_positions_in_the_report_are_valid_tile_sites() {
        let generated = MapGenerator::new(four_team_params(), 7).unwrap().generate().unwrap();
        let report = &generated.report;
        let tile_rows = report.tiling.tile_rows;
        let tile_cols = report.tiling.tile_cols;

        let mut tile = CellGrid::filled(tile_rows, tile_cols, Cell::WATER).unwrap();
        for row in 0..tile_rows {
            for col in 0..tile_cols {
                let pos = Position::new(row, col);
                tile.set(pos, generated.world.cell(pos));
            }
        }
        assert_eq!(report.hill_positions.len(), 2);
        for hill in &report.hill_positions {
            assert!(is_hill_site(&tile, *hill), "{hill:?}");
        }
    }

    #[test]
    fn same_seed_produces_byte_identical_output() {
        let a = MapGenerator::new(four_team_params(), 123_456).unwrap().generate().unwrap();
        let b = MapGenerator::new(four_team_params(), 123_456).unwrap().generate().unwrap();
        assert_eq!(render_map(&a.world), render_map(&b.world));
        assert_eq!(a.report, b.report);
    }

    #[test]
    fn changing_seed_changes_output() {
        let a = MapGenerator::new(four_team_params(), 1).unwrap().generate().unwrap();
        let b = MapGenerator::new(four_team_params(), 2).unwrap().generate().unwrap();
        assert_ne!(render_map(&a.world), render_map(&b.world));
    }

    #[test]
    fn invalid_params_are_rejected_up_front() {
        let params = GenerationParams { teams: 0, ..GenerationParams::default() };
        assert!(matches!(MapGenerator::new(params, 1), Err(MapGenError::InvalidParams(_))));

        let params = GenerationParams { max_hills: usize::MAX, ..GenerationParams::default() };
        assert!(matches!(MapGenerator::new(params, 1), Err(MapGenError::InvalidParams(_))));
    }

    #[test]
    fn impossible_world_size_fails_generation() {
        let params = GenerationParams { teams: 7, ..GenerationParams::default() }
            .with_width(10)
            .with_height(10);
        let err = MapGenerator::new(params, 1).unwrap().generate().unwrap_err();
        assert!(matches!(err, MapGenError::NoFeasibleTiling { teams: 7, .. }));
    }

    #[test]
    fn stagger_moves_exactly_one_axis_within_a_tile() {
        let tiling = Tiling { row_tiles: 2, col_tiles: 2, tile_rows: 30, tile_cols: 40 };
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut seen = Vec::new();
        for _ in 0..200 {
            let stagger = choose_stagger(&mut rng, &tiling);
            assert!(stagger.rows == 0 || stagger.cols == 0);
            assert!((0..30).contains(&stagger.rows));
            assert!((0..40).contains(&stagger.cols));
            if !seen.contains(&stagger) {
                seen.push(stagger);
            }
        }
        seen.sort_by_key(|stagger| (stagger.rows, stagger.cols));
        assert_eq!(seen, vec![Vector::ZERO, Vector::new(0, 20), Vector::new(15, 0)]);
    }

    #[test]
    fn stagger_adds_up_to_whole_tiles_around_the_world() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for (row_tiles, col_tiles, tile_rows, tile_cols) in
            [(2, 2, 42, 39), (1, 4, 25, 18), (3, 2, 21, 16), (5, 1, 17, 64), (1, 1, 50, 50)]
        {
            let tiling = Tiling { row_tiles, col_tiles, tile_rows, tile_cols };
            for _ in 0..50 {
                let stagger = choose_stagger(&mut rng, &tiling);
                assert_eq!((stagger.rows * col_tiles) % tile_rows, 0, "{tiling:?} {stagger:?}");
                assert_eq!((stagger.cols * row_tiles) % tile_cols, 0, "{tiling:?} {stagger:?}");
            }
        }
        assert_eq!(gcd(42, 2), 2);
        assert_eq!(gcd(39, 2), 1);
        assert_eq!(gcd(64, 5), 1);
    }

    #[test]
    fn carved_tile_is_one_land_region() {
        for seed in [1_u64, 3, 6, 9, 11] {
            let generated =
                MapGenerator::new(four_team_params(), seed).unwrap().generate().unwrap();
            let tiling = generated.report.tiling;
            let mut tile =
                CellGrid::filled(tiling.tile_rows, tiling.tile_cols, Cell::WATER).unwrap();
            for row in 0..tiling.tile_rows {
                for col in 0..tiling.tile_cols {
                    let pos = Position::new(row, col);
                    tile.set(pos, generated.world.cell(pos));
                }
            }
            assert_eq!(land_regions(&tile).1, 1, "seed {seed}");
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn every_team_gets_the_drawn_number_of_hills(
            seed in any::<u64>(),
            teams in 1_usize..=4,
            max_hills in 1_usize..=3,
        ) {
            let params = GenerationParams {
                teams,
                min_width: 80,
                max_width: 120,
                min_height: 80,
                max_height: 120,
                min_hills: 1,
                max_hills,
                max_hill_attempts: Some(100_000),
                ..GenerationParams::default()
            };
            let generated = MapGenerator::new(params, seed).unwrap().generate().unwrap();
            let hills_per_team = generated.report.hills_per_team;
            prop_assert!((1..=max_hills).contains(&hills_per_team));

            let mut per_team = vec![0_usize; teams];
            for entity in generated.world.entities() {
                per_team[entity.team().index()] += 1;
            }
            prop_assert_eq!(per_team, vec![hills_per_team; teams]);
        }
    }
}
