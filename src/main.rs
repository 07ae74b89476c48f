use anyhow::Result;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Instant;

use percolate::PercolationStats;

/// Percolate - Monte Carlo estimation of the percolation threshold
///
/// Runs repeated randomized trials on an n-by-n site lattice and reports the
/// mean open fraction at which the lattice first percolates, with a 95%
/// confidence interval.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Grid dimension (the lattice is n-by-n)
    #[clap(value_name = "N")]
    n: usize,

    /// Number of independent trials
    #[clap(value_name = "TRIALS")]
    trials: usize,

    /// Seed for reproducible runs (entropy-seeded if not specified)
    #[clap(long = "seed")]
    seed: Option<u64>,

    /// Number of threads for parallel trials
    #[clap(short = 't', long = "threads", default_value = "8")]
    threads: usize,

    /// Run trials sequentially on a single thread
    #[clap(long = "sequential")]
    sequential: bool,

    /// Quiet mode (no progress output)
    #[clap(long = "quiet")]
    quiet: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if !args.sequential {
        rayon::ThreadPoolBuilder::new()
            .num_threads(args.threads)
            .build_global()?;
    }

    if !args.quiet {
        eprintln!(
            "Running {} trial(s) on a {}x{} grid...",
            args.trials, args.n, args.n
        );
    }

    let start = Instant::now();

    let stats = if args.sequential {
        let mut rng = match args.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        PercolationStats::run(args.n, args.trials, &mut rng)?
    } else {
        PercolationStats::run_parallel(args.n, args.trials, args.seed)?
    };

    let elapsed = start.elapsed().as_secs_f64();

    println!("mean            = {:.6}", stats.mean());
    println!("stddev          = {:.6}", stats.stddev());
    println!(
        "95% confidence  = [{:.6}, {:.6}]",
        stats.confidence_low(),
        stats.confidence_high()
    );
    println!("elapsed time    = {elapsed:.3}s");

    Ok(())
}
