//! Generation parameters from defaults, an optional TOML file, and CLI flags,
//! in increasing precedence.

use std::fs;
use std::path::Path;

use antmap_core::GenerationParams;
use anyhow::{Context, Result};
use clap::Args;

/// Command-line overrides. Unset flags leave the underlying value alone.
#[derive(Args, Clone, Debug, Default, PartialEq, Eq)]
pub struct ParamOverrides {
    /// Number of teams the world supports
    #[arg(short, long)]
    pub teams: Option<usize>,
    /// Exact world width (rows); sets both bounds
    #[arg(short, long)]
    pub width: Option<i32>,
    #[arg(long)]
    pub min_width: Option<i32>,
    #[arg(long)]
    pub max_width: Option<i32>,
    /// Exact world height (columns); sets both bounds
    #[arg(short = 'H', long)]
    pub height: Option<i32>,
    #[arg(long)]
    pub min_height: Option<i32>,
    #[arg(long)]
    pub max_height: Option<i32>,
    /// Minimum anthills per team
    #[arg(long)]
    pub min_hills: Option<usize>,
    /// Maximum anthills per team
    #[arg(long)]
    pub max_hills: Option<usize>,
    /// Give up after this many samples per hill instead of retrying forever
    #[arg(long)]
    pub max_hill_attempts: Option<u32>,
}

impl ParamOverrides {
    pub fn apply(&self, params: &mut GenerationParams) {
        let pairs = [
            (self.teams, &mut params.teams),
            (self.min_hills, &mut params.min_hills),
            (self.max_hills, &mut params.max_hills),
        ];
        for (value, slot) in pairs {
            if let Some(value) = value {
                *slot = value;
            }
        }

        let bounds = [
            (self.min_width, &mut params.min_width),
            (self.max_width, &mut params.max_width),
            (self.min_height, &mut params.min_height),
            (self.max_height, &mut params.max_height),
        ];
        for (value, slot) in bounds {
            if let Some(value) = value {
                *slot = value;
            }
        }

        if let Some(width) = self.width {
            params.min_width = width;
            params.max_width = width;
        }
        if let Some(height) = self.height {
            params.min_height = height;
            params.max_height = height;
        }
        if self.max_hill_attempts.is_some() {
            params.max_hill_attempts = self.max_hill_attempts;
        }
    }
}

pub fn parse_params(text: &str) -> Result<GenerationParams> {
    toml::from_str(text).context("failed to parse generation config")
}

pub fn load_params(path: &Path) -> Result<GenerationParams> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    parse_params(&text).with_context(|| format!("invalid config file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn partial_file_keeps_defaults_for_missing_keys() {
        let params = parse_params("teams = 4\nmax_hills = 2\n").expect("valid config");
        assert_eq!(
            params,
            GenerationParams { teams: 4, max_hills: 2, ..GenerationParams::default() }
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(parse_params("teams = 4\nplayers = 3\n").is_err());
    }

    #[test]
    fn flags_override_file_values() {
        let mut params = parse_params("teams = 4\nmin_width = 70\nseed = 9\n").unwrap();
        let overrides = ParamOverrides {
            teams: Some(6),
            height: Some(90),
            max_hill_attempts: Some(500),
            ..ParamOverrides::default()
        };
        overrides.apply(&mut params);

        assert_eq!(params.teams, 6);
        assert_eq!((params.min_width, params.max_width), (70, 96));
        assert_eq!((params.min_height, params.max_height), (90, 90));
        assert_eq!(params.max_hill_attempts, Some(500));
        assert_eq!(params.seed, Some(9));
    }

    #[test]
    fn exact_width_beats_explicit_bounds() {
        let mut params = GenerationParams::default();
        let overrides =
            ParamOverrides { width: Some(80), min_width: Some(10), ..ParamOverrides::default() };
        overrides.apply(&mut params);
        assert_eq!((params.min_width, params.max_width), (80, 80));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempdir().expect("tempdir");
        let err = load_params(&dir.path().join("absent.toml")).unwrap_err();
        assert!(err.to_string().contains("absent.toml"), "{err}");
    }

    #[test]
    fn load_reads_file_from_disk() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("worldgen.toml");
        fs::write(&path, "teams = 3\nmin_hills = 2\nmax_hills = 3\n").unwrap();
        let params = load_params(&path).unwrap();
        assert_eq!((params.teams, params.min_hills, params.max_hills), (3, 2, 3));
    }
}
