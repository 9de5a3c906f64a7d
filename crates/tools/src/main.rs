use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use antmap_core::{GenerationParams, generate_map, render_map};
use antmap_tools::config::{ParamOverrides, load_params};
use antmap_tools::logging::init_tracing;
use antmap_tools::seed::{SeedChoice, generate_runtime_seed};
use antmap_tools::{author_line, format_fingerprint, recorded_arguments};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

/// Generates a tiled, toroidal ant-contest map and prints it.
#[derive(Parser)]
#[command(name = "antmap-worldgen", author, version, about, long_about = None)]
struct Args {
    /// Seed for the generator; a fresh one is derived when omitted
    #[arg(short, long)]
    seed: Option<u64>,
    /// TOML file with generation parameters
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Write the map here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Print a JSON generation report on stderr
    #[arg(long)]
    summary: bool,
    #[command(flatten)]
    overrides: ParamOverrides,
}

fn main() -> Result<()> {
    init_tracing();
    let raw_args: Vec<String> = env::args().collect();
    let args = Args::parse_from(&raw_args);

    let mut params = match &args.config {
        Some(path) => load_params(path)?,
        None => GenerationParams::default(),
    };
    args.overrides.apply(&mut params);

    let seed = SeedChoice::resolve(args.seed.or(params.seed), generate_runtime_seed);
    params.seed = Some(seed.value());

    let generated = generate_map(&params, seed.value())
        .with_context(|| format!("failed to generate a map for seed {}", seed.value()))?;
    let mut world = generated.world;
    let recorded = recorded_arguments(seed, raw_args.get(1..).unwrap_or_default());
    world.set_author(author_line(env!("CARGO_PKG_VERSION"), &recorded));

    let text = render_map(&world);
    match &args.output {
        Some(path) => fs::write(path, &text)
            .with_context(|| format!("failed to write map to {}", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes()).context("failed to write map to stdout")?;
            stdout.flush().context("failed to flush stdout")?;
        }
    }

    info!(
        seed = seed.value(),
        rows = world.rows(),
        cols = world.cols(),
        fingerprint = %format_fingerprint(generated.report.fingerprint),
        "map written"
    );

    if args.summary {
        let report = serde_json::to_string_pretty(&generated.report)
            .context("failed to serialize generation report")?;
        eprintln!("{report}");
    }

    Ok(())
}
