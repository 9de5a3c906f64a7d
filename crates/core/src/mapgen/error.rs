use thiserror::Error;

use crate::types::WorldError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MapGenError {
    #[error("invalid generation parameters: {0}")]
    InvalidParams(String),
    #[error(
        "unable to fit a valid tiling for {teams} teams inside width {min_width}..={max_width} \
         and height {min_height}..={max_height}"
    )]
    NoFeasibleTiling {
        teams: usize,
        min_width: i32,
        max_width: i32,
        min_height: i32,
        max_height: i32,
    },
    #[error("cave has {available} caverns but {needed} hills per team were requested")]
    NotEnoughCaverns { needed: usize, available: usize },
    #[error("no valid position for hill slot {slot} after {attempts} attempts")]
    HillPlacementExhausted { slot: usize, attempts: u32 },
    #[error(transparent)]
    World(#[from] WorldError),
}
