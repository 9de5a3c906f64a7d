use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::geometry::Position;

/// Number of teams the map glyph alphabet can express (`0`-`9`, `a`-`j`).
pub const MAX_TEAMS: usize = 10;

/// Validated team index in `[0, MAX_TEAMS)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TeamId(u8);

impl TeamId {
    pub const FIRST: Self = Self(0);

    pub fn new(index: usize) -> Result<Self, WorldError> {
        if index >= MAX_TEAMS {
            return Err(WorldError::TeamOutOfRange { team: index });
        }
        Ok(Self(index as u8))
    }

    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Terrain {
    Unknown,
    Land,
    Water,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    terrain: Terrain,
    team: Option<TeamId>,
}

impl Cell {
    pub const UNKNOWN: Self = Self::new(Terrain::Unknown);
    pub const LAND: Self = Self::new(Terrain::Land);
    pub const WATER: Self = Self::new(Terrain::Water);

    pub const fn new(terrain: Terrain) -> Self {
        Self { terrain, team: None }
    }

    pub const fn owned(terrain: Terrain, team: TeamId) -> Self {
        Self { terrain, team: Some(team) }
    }

    pub fn terrain(self) -> Terrain {
        self.terrain
    }

    pub fn team(self) -> Option<TeamId> {
        self.team
    }

    pub fn is_land(self) -> bool {
        self.terrain == Terrain::Land
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.terrain {
            Terrain::Unknown => "unknown",
            Terrain::Land => "land",
            Terrain::Water => "water",
        };
        match self.team {
            Some(team) => write!(f, "{kind} (team {team})"),
            None => f.write_str(kind),
        }
    }
}

/// Entity kinds in registry order; the order only matters for grouping within one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum EntityKind {
    Ant,
    DeadAnt,
    Hill,
    Food,
}

/// Registry-assigned identifier. Starts at 1 and is never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct EntityId(u32);

impl EntityId {
    pub(crate) const MIN: Self = Self(0);

    pub(crate) fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

/// A positioned game object.
///
/// Field order is the registry key: position, then kind, then id. Entities are
/// immutable values; moving one means removing it and inserting a relocated
/// copy (see `World::set_entity_position`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity {
    position: Position,
    kind: EntityKind,
    id: EntityId,
    team: TeamId,
}

impl Entity {
    pub(crate) fn new(id: EntityId, position: Position, kind: EntityKind, team: TeamId) -> Self {
        Self { position, kind, id, team }
    }

    /// Smallest possible registry key at `position`.
    pub(crate) fn lower_bound(position: Position) -> Self {
        Self { position, kind: EntityKind::Ant, id: EntityId::MIN, team: TeamId::FIRST }
    }

    pub(crate) fn relocated(self, position: Position) -> Self {
        Self { position, ..self }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn team(&self) -> TeamId {
        self.team
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            EntityKind::Ant => write!(f, "Ant (team {})", self.team),
            EntityKind::DeadAnt => write!(f, "Dead ant (team {})", self.team),
            EntityKind::Hill => write!(f, "Hill (team {})", self.team),
            EntityKind::Food => f.write_str("Food"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorldError {
    #[error("rows and columns must be > 0 (got {rows}x{cols})")]
    InvalidDimensions { rows: i32, cols: i32 },
    #[error("team index {team} must be below {}", MAX_TEAMS)]
    TeamOutOfRange { team: usize },
    #[error("a world supports at most {} teams (got {teams})", MAX_TEAMS)]
    TooManyTeams { teams: usize },
    #[error("expected at least {rows}x{cols} cell values, pattern is {actual_rows}x{actual_cols}")]
    PatternTooSmall { rows: i32, cols: i32, actual_rows: i32, actual_cols: i32 },
}
