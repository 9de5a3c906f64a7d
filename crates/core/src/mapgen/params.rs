//! Generation parameters shared by the CLI, config files, and tests.

use serde::{Deserialize, Serialize};

use crate::types::MAX_TEAMS;

use super::error::MapGenError;

/// Upper bound on hills per team. Tiles never hold this many caverns.
pub const MAX_HILLS_PER_TEAM: usize = 64;

/// Flat generation request. "Width" bounds the row axis and "height" bounds the
/// column axis.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationParams {
    pub seed: Option<u64>,
    pub teams: usize,
    pub min_width: i32,
    pub max_width: i32,
    pub min_height: i32,
    pub max_height: i32,
    pub min_hills: usize,
    pub max_hills: usize,
    /// Cap on hill position samples per hill. `None` retries until a valid
    /// position turns up.
    pub max_hill_attempts: Option<u32>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            seed: None,
            teams: 2,
            min_width: 64,
            max_width: 96,
            min_height: 64,
            max_height: 96,
            min_hills: 1,
            max_hills: 4,
            max_hill_attempts: None,
        }
    }
}

impl GenerationParams {
    pub fn with_width(mut self, width: i32) -> Self {
        self.min_width = width;
        self.max_width = width;
        self
    }

    pub fn with_height(mut self, height: i32) -> Self {
        self.min_height = height;
        self.max_height = height;
        self
    }

    pub fn validate(&self) -> Result<(), MapGenError> {
        if self.teams == 0 || self.teams > MAX_TEAMS {
            return Err(MapGenError::InvalidParams(format!(
                "team count must be between 1 and {MAX_TEAMS} (got {})",
                self.teams
            )));
        }
        for (name, min, max) in [
            ("width", self.min_width, self.max_width),
            ("height", self.min_height, self.max_height),
        ] {
            if min < 1 {
                return Err(MapGenError::InvalidParams(format!(
                    "minimum {name} must be positive (got {min})"
                )));
            }
            if min > max {
                return Err(MapGenError::InvalidParams(format!(
                    "minimum {name} {min} exceeds maximum {name} {max}"
                )));
            }
        }
        if self.min_hills == 0 {
            return Err(MapGenError::InvalidParams(
                "each team needs at least one hill".to_string(),
            ));
        }
        if self.min_hills > self.max_hills {
            return Err(MapGenError::InvalidParams(format!(
                "minimum hills {} exceeds maximum hills {}",
                self.min_hills, self.max_hills
            )));
        }
        if self.max_hills > MAX_HILLS_PER_TEAM {
            return Err(MapGenError::InvalidParams(format!(
                "maximum hills must be at most {MAX_HILLS_PER_TEAM} (got {})",
                self.max_hills
            )));
        }
        if self.max_hill_attempts == Some(0) {
            return Err(MapGenError::InvalidParams(
                "hill attempt cap must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
