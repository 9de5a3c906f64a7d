//! Public results of a generation run.

use serde::Serialize;

use crate::geometry::{Position, Vector};
use crate::types::TeamId;
use crate::world::World;

use super::tiling::Tiling;

/// How a world came out: enough to explain and reproduce it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub seed: u64,
    pub tiling: Tiling,
    pub stagger: Vector,
    pub hills_per_team: usize,
    /// Tile-local positions, indexed by hill slot.
    pub hill_positions: Vec<Position>,
    pub team_order: Vec<TeamId>,
    /// Nodes left inside the tile after filtering, corridor nodes included.
    pub cave_nodes: usize,
    pub sampled_nodes: usize,
    pub land_cells: usize,
    pub fingerprint: u64,
}

#[derive(Clone, Debug)]
pub struct GeneratedMap {
    pub world: World,
    pub report: GenerationReport,
}
