//! Lays the generated tile across the whole world and registers its hills.

use tracing::debug;

use crate::geometry::{Position, Vector};
use crate::grid::CellGrid;
use crate::world::World;

use super::error::MapGenError;
use super::fairness::TeamRotation;
use super::tiling::Tiling;

/// Everything the assembler needs from the generated tile.
#[derive(Clone, Debug)]
pub struct TileBlueprint {
    pub tile: CellGrid,
    /// Tile-local hill positions, one per slot.
    pub hills: Vec<Position>,
    pub stagger: Vector,
    pub tiling: Tiling,
}

/// Top-left corner of tile copy `(r, c)`. Each step along one axis pushes the
/// other axis by the stagger, which gives the brick layout.
pub fn tile_origin(tiling: &Tiling, stagger: Vector, r: i32, c: i32) -> Position {
    Position::new(r * tiling.tile_rows + stagger.rows * c, c * tiling.tile_cols + stagger.cols * r)
}

pub fn assemble_world(
    blueprint: &TileBlueprint,
    rotation: &TeamRotation,
) -> Result<World, MapGenError> {
    let tiling = &blueprint.tiling;
    let mut world = World::new(tiling.world_rows(), tiling.world_cols(), rotation.team_count())?;
    let tile_size = Vector::new(tiling.tile_rows, tiling.tile_cols);

    for c in 0..tiling.col_tiles {
        for r in 0..tiling.row_tiles {
            let origin = tile_origin(tiling, blueprint.stagger, r, c);
            let instance = (r + c * tiling.row_tiles) as usize;
            world.set_cells(origin, tile_size, &blueprint.tile)?;

            for (slot, hill) in blueprint.hills.iter().enumerate() {
                let team = rotation.team_for(instance, slot);
                world.create_hill(origin.offset(hill.to_vector()), team);
            }
        }
    }

    debug!(
        rows = world.rows(),
        cols = world.cols(),
        hills = world.entity_count(),
        "tile copies assembled"
    );
    Ok(world)
}
