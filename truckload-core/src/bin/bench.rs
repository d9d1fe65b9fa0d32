//! Synthetic-load benchmark harness. Generates a pseudo-random batch of
//! boxes and times the packer (and, below the MCTS threshold, the
//! refiner) against it. Modeled on `coreba::bin::heuristic`'s
//! generate-then-time-then-report shape, swapping the teacher's
//! `JobOrdering`/`JobFit` enums for a single `count` knob plus the
//! `OptimizerConfig` the library already exposes.

use std::time::Instant;

use clap::Parser;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use truckload_core::{
    optimize, Box as TruckBox, CancellationToken, Destination, NullObserver, OptimizerConfig,
    TemperatureZone, TruckDimensions,
};

/// Generates a synthetic load and times the optimizer against it.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Number of boxes to generate.
    #[arg(short, long, default_value_t = 200)]
    count: usize,

    /// Seed for the synthetic-load generator.
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Truck width.
    #[arg(long, default_value_t = 8.0)]
    width: f64,
    /// Truck height.
    #[arg(long, default_value_t = 28.0)]
    height: f64,
    /// Truck length.
    #[arg(long, default_value_t = 9.0)]
    length: f64,
}

fn gen_boxes(count: usize, seed: u64) -> Vec<TruckBox> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let zones = [TemperatureZone::Regular, TemperatureZone::Cold, TemperatureZone::Frozen];
    let destinations = [Destination::Stop1, Destination::Stop2, Destination::Stop3, Destination::Stop4];

    (0..count)
        .map(|i| {
            TruckBox::new(
                format!("box-{i}"),
                rng.gen_range(0.2..2.0),
                rng.gen_range(0.2..2.0),
                rng.gen_range(0.2..2.0),
                rng.gen_range(1.0..80.0),
                zones[rng.gen_range(0..zones.len())],
                rng.gen_bool(0.1),
                destinations[rng.gen_range(0..destinations.len())],
            )
        })
        .collect()
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let boxes = gen_boxes(args.count, args.seed);
    let truck = TruckDimensions::new(args.width, args.height, args.length);
    let config = OptimizerConfig::default();

    let started = Instant::now();
    let result = optimize(boxes, truck, &config, &NullObserver, &CancellationToken::new())?;
    let elapsed = started.elapsed();

    println!("Generated {} boxes, seed {}", args.count, args.seed);
    println!("Placement time: {} ms", elapsed.as_millis());
    println!(
        "Placed: {}\tUnplaced: {}\tPlacement rate: {:.1}%",
        result.placed.len(),
        result.unplaced.len(),
        100.0 * result.placed.len() as f64 / args.count.max(1) as f64
    );
    println!(
        "Stability: {:.1}\tSafety: {:.1}\tUtilization: {:.1}",
        result.scores.stability, result.scores.safety, result.scores.utilization
    );

    Ok(())
}
