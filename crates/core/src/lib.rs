pub mod geometry;
pub mod grid;
pub mod map_format;
pub mod mapgen;
pub mod types;
pub mod world;

pub use geometry::{Position, Vector};
pub use grid::CellGrid;
pub use map_format::{
    MapHeader, MapParseError, fingerprint, parse_header, parse_map, render_map, write_map,
};
pub use mapgen::{
    GeneratedMap, GenerationParams, GenerationReport, MapGenError, MapGenerator, generate_map,
};
pub use types::*;
pub use world::World;
