/// Monte Carlo estimation of the percolation threshold
///
/// Each trial opens uniformly random sites on a fresh grid until it
/// percolates and records the fraction of open sites. Trials are independent
/// and own their grid, so the parallel runner fans them out with rayon and
/// aggregates only after every result has been collected.
use crate::percolation::{Percolation, PercolationError};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

/// Two-sided 95% normal quantile
const CONFIDENCE_95: f64 = 1.96;

/// Source of uniformly distributed integers, injected into the trial loop
pub trait UniformSource {
    /// Uniformly distributed integer in `[low, high)`
    fn uniform(&mut self, low: usize, high: usize) -> usize;
}

/// Any rand RNG is a uniform source
impl<R: Rng> UniformSource for R {
    fn uniform(&mut self, low: usize, high: usize) -> usize {
        self.gen_range(low..high)
    }
}

/// Aggregated results of a batch of percolation trials
pub struct PercolationStats {
    trials: usize,
    thresholds: Vec<f64>,
    mean: f64,
    stddev: f64,
    conf_low: f64,
    conf_high: f64,
}

impl PercolationStats {
    /// Run `trials` sequential trials on n-by-n grids, drawing sites from
    /// `source`
    ///
    /// All trials complete before this returns; the query methods are pure
    /// reads of the finished batch.
    pub fn run<S: UniformSource>(
        n: usize,
        trials: usize,
        source: &mut S,
    ) -> Result<Self, PercolationError> {
        Self::check_args(n, trials)?;

        let mut thresholds = Vec::with_capacity(trials);
        for trial in 0..trials {
            let fraction = run_trial(n, source)?;
            debug!("trial {trial}: open fraction {fraction:.6}");
            thresholds.push(fraction);
        }

        Ok(Self::aggregate(thresholds))
    }

    /// Run trials across the rayon pool, one grid per worker at a time
    ///
    /// Each trial gets its own RNG seeded from `seed` plus the trial index,
    /// so a fixed seed gives reproducible results regardless of thread count
    /// or scheduling. Without a seed the base is drawn from entropy.
    pub fn run_parallel(
        n: usize,
        trials: usize,
        seed: Option<u64>,
    ) -> Result<Self, PercolationError> {
        Self::check_args(n, trials)?;

        let base_seed = seed.unwrap_or_else(|| rand::thread_rng().gen());
        let thresholds: Vec<f64> = (0..trials)
            .into_par_iter()
            .map(|trial| {
                let mut rng = StdRng::seed_from_u64(base_seed.wrapping_add(trial as u64));
                run_trial(n, &mut rng)
            })
            .collect::<Result<_, _>>()?;

        Ok(Self::aggregate(thresholds))
    }

    fn check_args(n: usize, trials: usize) -> Result<(), PercolationError> {
        if n == 0 {
            return Err(PercolationError::InvalidDimension);
        }
        if trials == 0 {
            return Err(PercolationError::InvalidTrialCount);
        }
        Ok(())
    }

    fn aggregate(thresholds: Vec<f64>) -> Self {
        let trials = thresholds.len();
        let count = trials as f64;

        let mean = thresholds.iter().sum::<f64>() / count;

        // Sample variance with Bessel's correction. A single trial divides
        // zero by zero and the NaN propagates into the confidence bounds;
        // callers wanting a defined stddev need at least two trials.
        let variance = thresholds
            .iter()
            .map(|t| (t - mean) * (t - mean))
            .sum::<f64>()
            / (count - 1.0);
        let stddev = variance.sqrt();

        let margin = CONFIDENCE_95 * stddev / count.sqrt();

        info!("{trials} trials done: mean {mean:.6}, stddev {stddev:.6}");

        PercolationStats {
            trials,
            thresholds,
            mean,
            stddev,
            conf_low: mean - margin,
            conf_high: mean + margin,
        }
    }

    /// Sample mean of the percolation threshold
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Sample standard deviation of the percolation threshold
    ///
    /// NaN when the batch holds a single trial.
    pub fn stddev(&self) -> f64 {
        self.stddev
    }

    /// Low endpoint of the 95% confidence interval
    pub fn confidence_low(&self) -> f64 {
        self.conf_low
    }

    /// High endpoint of the 95% confidence interval
    pub fn confidence_high(&self) -> f64 {
        self.conf_high
    }

    /// Number of completed trials
    pub fn trials(&self) -> usize {
        self.trials
    }

    /// Per-trial open fractions in completion order
    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }
}

/// Open random sites on a fresh grid until it percolates, returning the open
/// fraction
///
/// Re-drawing an already-open site is a harmless no-op, so the loop retries
/// by construction rather than tracking which sites remain blocked.
fn run_trial<S: UniformSource>(n: usize, source: &mut S) -> Result<f64, PercolationError> {
    let mut grid = Percolation::new(n)?;

    while !grid.percolates() {
        let row = source.uniform(0, n);
        let col = source.uniform(0, n);
        grid.open(row, col)?;
    }

    Ok(grid.open_sites() as f64 / (n * n) as f64)
}
