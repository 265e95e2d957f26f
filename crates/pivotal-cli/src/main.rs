//! Command-line front end for the Pivotal determinant engines.
//!
//! Loads or generates a square matrix, benchmarks the sequential engine
//! against the parallel one, and prints the timing report. A sweep mode
//! runs the comparison over a grid of sizes and thread counts.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use pivotal_det::{benchmark, BenchmarkResult};
use pivotal_matrix::{load_matrix, save_matrix, SquareMatrix};

/// Dense-matrix determinants, sequentially and in parallel.
#[derive(Parser)]
#[command(name = "pivotal", version, about)]
struct Cli {
    /// Load the input matrix from a text file
    #[arg(short, long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Maximum number of worker threads
    #[arg(short, long, default_value_t = 4)]
    threads: usize,

    /// Size of the randomly generated matrix when no file is given
    #[arg(short, long, default_value_t = 5)]
    size: usize,

    /// Value range for random entries
    #[arg(
        short,
        long,
        num_args = 2,
        value_names = ["MIN", "MAX"],
        default_values_t = [-10, 10],
        allow_negative_numbers = true
    )]
    range: Vec<i64>,

    /// Seed for the random fill (drawn from the OS when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Save the input matrix to a text file
    #[arg(long, value_name = "FILE")]
    save: Option<PathBuf>,

    /// Write a random sample matrix of --size to FILE and exit
    #[arg(long, value_name = "FILE")]
    create_sample: Option<PathBuf>,

    /// Benchmark a grid of sizes and thread counts
    #[arg(long)]
    sweep: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.threads < 1 {
        bail!("thread count must be at least 1");
    }
    if cli.size < 1 {
        bail!("matrix size must be at least 1");
    }
    let (min, max) = (cli.range[0], cli.range[1]);
    if min >= max {
        bail!("range minimum ({min}) must be below range maximum ({max})");
    }

    let mut rng = match cli.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    if let Some(path) = cli.create_sample.as_ref() {
        let mut matrix = SquareMatrix::zeros(cli.size);
        matrix.fill_random(min, max, &mut rng);
        save_matrix(&matrix, path)
            .with_context(|| format!("saving sample matrix to {}", path.display()))?;
        println!("Wrote {0}x{0} sample matrix to {1}", cli.size, path.display());
        return Ok(());
    }

    if cli.sweep {
        run_sweep(min, max, &mut rng);
        return Ok(());
    }

    let matrix = match cli.file.as_ref() {
        Some(path) => load_matrix(path)
            .with_context(|| format!("loading matrix from {}", path.display()))?,
        None => {
            let mut m = SquareMatrix::zeros(cli.size);
            m.fill_random(min, max, &mut rng);
            m
        }
    };

    if let Some(path) = cli.save.as_ref() {
        save_matrix(&matrix, path)
            .with_context(|| format!("saving matrix to {}", path.display()))?;
    }

    let result = benchmark(&matrix, cli.threads);
    print_report(&matrix, &result);
    Ok(())
}

fn print_report(matrix: &SquareMatrix, result: &BenchmarkResult) {
    println!("Matrix size:     {0}x{0}", matrix.size());
    println!("Determinant:     {:.6}", result.determinant);
    println!(
        "Sequential time: {:.3} ms",
        result.sequential_time.as_secs_f64() * 1e3
    );
    println!(
        "Parallel time:   {:.3} ms",
        result.parallel_time.as_secs_f64() * 1e3
    );
    println!("Speedup:         {:.3}x", result.speedup);
    println!(
        "Efficiency:      {:.1}% ({:.4})",
        result.efficiency * 100.0,
        result.efficiency
    );
    println!("Threads used:    {}", result.threads_used);
}

fn run_sweep(min: i64, max: i64, rng: &mut ChaCha8Rng) {
    const SIZES: [usize; 4] = [32, 64, 128, 256];
    const THREADS: [usize; 4] = [1, 2, 4, 8];

    println!("  size | threads |   determinant | seq (ms) | par (ms) | speedup | efficiency");
    println!("-------+---------+---------------+----------+----------+---------+-----------");
    for size in SIZES {
        let mut matrix = SquareMatrix::zeros(size);
        matrix.fill_random(min, max, rng);
        for threads in THREADS {
            let r = benchmark(&matrix, threads);
            println!(
                "{size:>6} | {threads:>7} | {:>13.4e} | {:>8.3} | {:>8.3} | {:>6.2}x | {:>9.1}%",
                r.determinant,
                r.sequential_time.as_secs_f64() * 1e3,
                r.parallel_time.as_secs_f64() * 1e3,
                r.speedup,
                r.efficiency * 100.0,
            );
        }
        println!("-------+---------+---------------+----------+----------+---------+-----------");
    }
}
