use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use antmap_core::{EntityKind, Position, World, fingerprint, parse_map};
use antmap_tools::{format_fingerprint, touching_hills};
use antmap_tools::logging::init_tracing;
use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::Serialize;
use tracing::warn;

/// Parses a generated map and checks it is fit to play on.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Map file to check; reads stdin when omitted
    map: Option<PathBuf>,
    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct MapReport {
    author: Option<String>,
    rows: i32,
    cols: i32,
    teams: usize,
    hills_per_team: Vec<usize>,
    land_ratio: f64,
    exposed_hills: Vec<Position>,
    /// Hill pairs within one cell of each other on both axes.
    touching_hills: Vec<(Position, Position)>,
    fingerprint: String,
}

impl MapReport {
    fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.teams == 0 {
            problems.push("map declares no teams".to_string());
        }
        if self.hills_per_team.iter().any(|&count| count == 0) {
            problems.push(format!("some team has no hill: {:?}", self.hills_per_team));
        }
        if self.hills_per_team.windows(2).any(|pair| pair[0] != pair[1]) {
            problems.push(format!("hill counts differ between teams: {:?}", self.hills_per_team));
        }
        for hill in &self.exposed_hills {
            problems.push(format!("hill at {},{} is not surrounded by land", hill.row, hill.col));
        }
        for (a, b) in &self.touching_hills {
            problems.push(format!("hills at {},{} and {},{} touch", a.row, a.col, b.row, b.col));
        }
        problems
    }
}

fn inspect(world: &World) -> MapReport {
    let mut hills_per_team = vec![0_usize; world.teams()];
    let mut exposed_hills = Vec::new();
    for entity in world.entities().filter(|entity| entity.kind() == EntityKind::Hill) {
        if let Some(count) = hills_per_team.get_mut(entity.team().index()) {
            *count += 1;
        }
        let pos = entity.position();
        let enclosed = (-1..=1).all(|dr| {
            (-1..=1).all(|dc| world.cell(world.position(pos.row + dr, pos.col + dc)).is_land())
        });
        if !enclosed {
            exposed_hills.push(pos);
        }
    }

    let mut land = 0_usize;
    for row in 0..world.rows() {
        for col in 0..world.cols() {
            if world.cell(Position::new(row, col)).is_land() {
                land += 1;
            }
        }
    }
    let area = (world.rows() as usize) * (world.cols() as usize);

    MapReport {
        author: world.author().map(str::to_string),
        rows: world.rows(),
        cols: world.cols(),
        teams: world.teams(),
        hills_per_team,
        land_ratio: land as f64 / area as f64,
        exposed_hills,
        touching_hills: touching_hills(world),
        fingerprint: format_fingerprint(fingerprint(world)),
    }
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read map file {}", path.display())),
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text).context("failed to read map from stdin")?;
            Ok(text)
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let text = read_input(args.map.as_ref())?;
    let world = parse_map(&text).context("map did not parse")?;
    let report = inspect(&world);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Size: {}x{}", report.rows, report.cols);
        println!("Teams: {}", report.teams);
        println!("Hills per team: {:?}", report.hills_per_team);
        println!("Land ratio: {:.3}", report.land_ratio);
        println!("Fingerprint: {}", report.fingerprint);
    }

    let problems = report.problems();
    for problem in &problems {
        warn!("{problem}");
    }
    if !problems.is_empty() {
        bail!("map failed {} check(s)", problems.len());
    }
    Ok(())
}
