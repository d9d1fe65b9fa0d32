//! CLI front-end for [`truckload_core::optimize`].
//!
//! Reads a JSON load plan (boxes, truck, and an optional config override)
//! and prints a placement report. Modeled on
//! `coreba::bin::heuristic`'s `clap::Parser` + `Instant`-timed summary
//! shape.

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use serde::Deserialize;

use truckload_core::{optimize, CancellationToken, NullObserver, OptimizerConfig, TruckDimensions};

/// Loads boxes into a truck and reports the resulting placement.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a JSON load plan: `{"truck": {...}, "boxes": [...], "config": {...}}`.
    #[arg(value_parser = clap::value_parser!(PathBuf))]
    plan: PathBuf,

    /// Print the full placed-box list, not just the summary.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

#[derive(Deserialize)]
struct LoadPlan {
    truck: TruckDimensions,
    boxes: Vec<truckload_core::Box>,
    #[serde(default)]
    config: OptimizerConfig,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let contents = std::fs::read_to_string(&args.plan)?;
    let plan: LoadPlan = serde_json::from_str(&contents)?;

    let started = Instant::now();
    let result = optimize(plan.boxes, plan.truck, &plan.config, &NullObserver, &CancellationToken::new())?;
    let elapsed = started.elapsed();

    println!("Placement time: {} ms", elapsed.as_millis());
    println!(
        "Placed: {}\tUnplaced: {}",
        result.placed.len(),
        result.unplaced.len()
    );
    println!(
        "Stability: {:.1}\tSafety: {:.1}\tUtilization: {:.1}",
        result.scores.stability, result.scores.safety, result.scores.utilization
    );
    if result.mcts_budget_exhausted {
        println!("(MCTS refinement used its full iteration budget)");
    }

    if args.verbose {
        for b in &result.loading_sequence {
            println!(
                "{}\t{:?}\t({:.2}, {:.2}, {:.2})",
                b.descr.id, b.orientation, b.position.x, b.position.y, b.position.z
            );
        }
        for b in &result.unplaced {
            println!("UNPLACED\t{}", b.id);
        }
    }

    Ok(())
}
