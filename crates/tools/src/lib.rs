pub mod config;
pub mod logging;
pub mod seed;

use antmap_core::{EntityKind, Position, World};
use seed::SeedChoice;

pub const GENERATOR_NAME: &str = "antmap-worldgen";

/// Format a fingerprint as `0x` followed by exactly 16 lowercase hex digits.
pub fn format_fingerprint(hash: u64) -> String {
    format!("0x{hash:016x}")
}

/// Arguments recorded in the author line. A generated seed is prepended as
/// `--seed <n>` so the recorded command reproduces the map.
pub fn recorded_arguments(seed: SeedChoice, args: &[String]) -> Vec<String> {
    match seed {
        SeedChoice::Explicit(_) => args.to_vec(),
        SeedChoice::Generated(value) => ["--seed".to_string(), value.to_string()]
            .into_iter()
            .chain(args.iter().cloned())
            .collect(),
    }
}

/// `<name>, Version <version>, Arguments [ "<arg>", ... ]`
pub fn author_line(version: &str, args: &[String]) -> String {
    let quoted: Vec<String> = args.iter().map(|arg| format!("\"{arg}\"")).collect();
    format!("{GENERATOR_NAME}, Version {version}, Arguments [ {} ]", quoted.join(", "))
}

/// Hill pairs less than two cells apart on both axes, measured the short way
/// round the torus. Pairs come in registry order.
pub fn touching_hills(world: &World) -> Vec<(Position, Position)> {
    let hills: Vec<Position> = world
        .entities()
        .filter(|entity| entity.kind() == EntityKind::Hill)
        .map(|entity| entity.position())
        .collect();

    let mut pairs = Vec::new();
    for (i, &a) in hills.iter().enumerate() {
        for &b in &hills[i + 1..] {
            let apart = world.subtract(a, b);
            if apart.rows.abs() <= 1 && apart.cols.abs() <= 1 {
                pairs.push((a, b));
            }
        }
    }
    pairs
}
