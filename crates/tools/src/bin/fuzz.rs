use antmap_core::{
    EntityKind, GenerationParams, GenerationReport, MapGenError, MapGenerator, World, fingerprint,
};
use antmap_tools::{format_fingerprint, touching_hills};
use antmap_tools::logging::init_tracing;
use anyhow::{Result, bail};
use clap::Parser;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use tracing::{info, warn};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 200)]
    runs: u32,
    /// Per-hill sample cap; a run that hits it counts as a failure
    #[arg(long, default_value_t = 100_000)]
    max_hill_attempts: u32,
}

fn choose<T: Copy>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    slice[rng.next_u64() as usize % slice.len()]
}

fn random_params(rng: &mut ChaCha8Rng, max_hill_attempts: u32) -> GenerationParams {
    let min_width = choose(rng, &[48, 64, 80, 96]);
    let min_height = choose(rng, &[48, 64, 80, 96]);
    let min_hills = choose(rng, &[1_usize, 1, 2]);
    GenerationParams {
        seed: None,
        teams: choose(rng, &[1_usize, 2, 2, 3, 4, 4, 6, 8]),
        min_width,
        max_width: min_width + choose(rng, &[0, 16, 32, 48]),
        min_height,
        max_height: min_height + choose(rng, &[0, 16, 32, 48]),
        min_hills,
        max_hills: min_hills + choose(rng, &[0_usize, 1, 2]),
        max_hill_attempts: Some(max_hill_attempts),
    }
}

fn check_world(world: &World, teams: usize, report: &GenerationReport) -> Result<()> {
    let tiling = &report.tiling;
    if world.rows() % tiling.row_tiles != 0 || world.cols() % tiling.col_tiles != 0 {
        bail!(
            "world {}x{} does not divide into {}x{} tiles",
            world.rows(),
            world.cols(),
            tiling.row_tiles,
            tiling.col_tiles
        );
    }
    if fingerprint(world) != report.fingerprint {
        bail!(
            "fingerprint drifted: report {} vs world {}",
            format_fingerprint(report.fingerprint),
            format_fingerprint(fingerprint(world))
        );
    }

    let mut per_team = vec![0_usize; teams];
    for entity in world.entities() {
        if entity.kind() != EntityKind::Hill {
            bail!("unexpected entity {entity}");
        }
        let pos = entity.position();
        let enclosed = (-1..=1).all(|dr| {
            (-1..=1).all(|dc| world.cell(world.position(pos.row + dr, pos.col + dc)).is_land())
        });
        if !enclosed {
            bail!("hill {entity} is not surrounded by land");
        }
        per_team[entity.team().index()] += 1;
    }
    if per_team.iter().any(|&count| count != report.hills_per_team) {
        bail!("uneven hill counts {per_team:?}, expected {} each", report.hills_per_team);
    }
    if let Some((a, b)) = touching_hills(world).first() {
        bail!("hills at {},{} and {},{} touch", a.row, a.col, b.row, b.col);
    }
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    println!("Starting map fuzz harness on seed {} for {} runs...", args.seed, args.runs);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut generated_count = 0_u32;
    let mut infeasible_count = 0_u32;
    let mut stuck_count = 0_u32;

    for run in 0..args.runs {
        let params = random_params(&mut rng, args.max_hill_attempts);
        let map_seed = rng.next_u64();
        let generator = MapGenerator::new(params.clone(), map_seed)?;

        let generated = match generator.generate() {
            Ok(generated) => generated,
            Err(MapGenError::NoFeasibleTiling { .. }) => {
                infeasible_count += 1;
                continue;
            }
            Err(
                err @ (MapGenError::HillPlacementExhausted { .. }
                | MapGenError::NotEnoughCaverns { .. }),
            ) => {
                warn!(run, map_seed, ?params, %err, "no room for hills");
                stuck_count += 1;
                continue;
            }
            Err(err) => bail!("run {run} (map seed {map_seed}, {params:?}) failed: {err}"),
        };

        if let Err(err) = check_world(&generated.world, params.teams, &generated.report) {
            bail!("Invariant failed on run {run} (map seed {map_seed}): {err}");
        }
        info!(
            run,
            map_seed,
            fingerprint = %format_fingerprint(generated.report.fingerprint),
            "run passed"
        );
        generated_count += 1;
    }

    println!(
        "Fuzzing completed successfully: {generated_count} maps checked, {infeasible_count} \
         parameter sets had no feasible tiling, {stuck_count} ran out of hill sites."
    );
    Ok(())
}
