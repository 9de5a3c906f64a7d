//! Procedural map generation split into pipeline stages.
//!
//! `tiling` picks the tile grid, `cave`, `carve` and `regions` build one tile, `hills`
//! places the per-slot hills, `fairness` maps slots to teams, and `assemble`
//! lays the tile across the world.

pub mod assemble;
pub mod fairness;
pub mod model;
pub mod params;
pub mod random;
pub mod tiling;

mod carve;
mod cave;
mod error;
mod generator;
mod hills;
mod regions;

pub use assemble::{TileBlueprint, assemble_world, tile_origin};
pub use error::MapGenError;
pub use fairness::TeamRotation;
pub use generator::MapGenerator;
pub use hills::is_hill_site;
pub use model::{GeneratedMap, GenerationReport};
pub use params::GenerationParams;
pub use tiling::{Tiling, plan_tiling};

pub fn generate_map(params: &GenerationParams, seed: u64) -> Result<GeneratedMap, MapGenError> {
    MapGenerator::new(params.clone(), seed)?.generate()
}

#[cfg(test)]
mod tests {
    use super::{GenerationParams, MapGenerator};
    use crate::map_format::render_map;

    #[test]
    fn generate_map_matches_map_generator_output() {
        let params = GenerationParams {
            teams: 3,
            max_hill_attempts: Some(100_000),
            ..GenerationParams::default()
        };

        let from_helper = super::generate_map(&params, 123).unwrap();
        let from_generator = MapGenerator::new(params, 123).unwrap().generate().unwrap();

        assert_eq!(from_helper.report, from_generator.report);
        assert_eq!(render_map(&from_helper.world), render_map(&from_generator.world));
    }
}
