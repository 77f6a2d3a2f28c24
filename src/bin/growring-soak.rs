// src/bin/growring-soak.rs
//! growring soak tester
//!
//! Pushes and pops pseudorandom runs of a monotonically increasing `u64`
//! sequence through a `RingBuffer` and checks the sequence comes back intact.
//! Runs until Ctrl+C unless `--rounds` is given.
//!
//! Usage:
//!   growring-soak [--seed N] [--rounds N] [--words-max N] ...

use anyhow::{Context, Result, bail, ensure};
use clap::Parser;
use growring::{Soak, SoakConfig};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "growring-soak")]
#[command(about = "Randomized push/pop soak test for the growring ring buffer")]
struct Args {
    /// Seed of the pseudorandom generator (default: derived from the clock)
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many rounds (default: run until interrupted)
    #[arg(long)]
    rounds: Option<u64>,

    /// Maximum number of chunks pushed per round
    #[arg(long, default_value_t = 20)]
    chunk_count_max: usize,

    /// Chunk and pop sizes are drawn from 1..WORDS_MAX u64 words
    #[arg(long, default_value_t = 2048)]
    words_max: usize,

    /// Drain while the buffer holds more than this many bytes
    #[arg(long, default_value_t = 1024)]
    drain_threshold: usize,

    /// Initial capacity of the ring buffer in bytes
    #[arg(long, default_value_t = growring::INITIAL_CAPACITY)]
    initial_capacity: usize,

    /// Log progress every N rounds (0 disables)
    #[arg(long, default_value_t = 10_000)]
    report_every: u64,
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or(0)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    ensure!(args.chunk_count_max >= 1, "--chunk-count-max must be at least 1");
    ensure!(args.words_max >= 2, "--words-max must be at least 2");
    ensure!(
        (2..=growring::MAX_INITIAL_CAPACITY).contains(&args.initial_capacity),
        "--initial-capacity must be between 2 and {}",
        growring::MAX_INITIAL_CAPACITY
    );

    let config = SoakConfig {
        chunk_count_max: args.chunk_count_max,
        words_max: args.words_max,
        drain_threshold: args.drain_threshold,
        initial_capacity: args.initial_capacity,
        seed: args.seed.unwrap_or_else(clock_seed),
        rounds: args.rounds,
        report_every: args.report_every,
    };
    tracing::info!(?config, "soak configuration");

    let stop = Arc::new(AtomicBool::new(false));
    let flag = stop.clone();
    ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
    })
    .context("Failed to set Ctrl+C handler")?;

    let seed = config.seed;
    let started = Instant::now();
    let report = Soak::new(config)
        .run(&stop)
        .with_context(|| format!("Soak run with seed {} aborted", seed))?;
    let elapsed = started.elapsed();

    println!("\nResults:");
    println!("  Seed:         {}", seed);
    println!("  Rounds:       {}", report.rounds);
    println!("  Written:      {} words", report.written);
    println!("  Read:         {} words", report.read);
    println!("  Mismatches:   {}", report.mismatches);
    println!("  Max capacity: {} bytes", report.max_capacity);
    println!(
        "  Throughput:   {:.2}M words/sec",
        report.read as f64 / elapsed.as_secs_f64().max(f64::EPSILON) / 1_000_000.0
    );

    if !report.is_clean() {
        bail!(
            "{} mismatched values with seed {}",
            report.mismatches,
            seed
        );
    }

    println!("\nClean finish!");
    Ok(())
}
