//! Batches of independent runs over derived seeds
//!
//! Per-run seeds are drawn from `base_seed` before any run starts, so a batch
//! gives the same summary whether or not runs execute in parallel.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::ScenarioConfig;
use crate::error::{ConfigError, Result};
use crate::model::{BatchSummary, PercentileSet, RunSummary};
use crate::simulation::{ScenarioSimulator, Simulator};

/// Seeds for `runs` independent runs
pub fn derive_seeds(base_seed: u64, runs: usize) -> Vec<u64> {
    let mut rng = ChaCha8Rng::seed_from_u64(base_seed);
    (0..runs).map(|_| rng.next_u64()).collect()
}

/// Run a single seeded instance of the scenario
pub fn run_seeded(config: &ScenarioConfig, seed: u64) -> Result<RunSummary> {
    let config = config.clone().with_seed(seed);
    let mut simulator = ScenarioSimulator::from_config(&config)?;
    Ok(simulator.run())
}

#[cfg(feature = "parallel")]
fn run_all(config: &ScenarioConfig, seeds: &[u64]) -> Result<Vec<RunSummary>> {
    use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

    seeds
        .par_iter()
        .map(|&seed| run_seeded(config, seed))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn run_all(config: &ScenarioConfig, seeds: &[u64]) -> Result<Vec<RunSummary>> {
    seeds
        .iter()
        .map(|&seed| run_seeded(config, seed))
        .collect()
}

/// Run the scenario `runs` times and summarize the final balances
pub fn run_batch(config: &ScenarioConfig, runs: usize, base_seed: u64) -> Result<BatchSummary> {
    if runs == 0 {
        return Err(ConfigError::NonPositiveCount { field: "runs" }.into());
    }
    config.clone().with_seed(base_seed).validate()?;

    let seeds = derive_seeds(base_seed, runs);
    let summaries = run_all(config, &seeds)?;
    let batch = summarize_batch(&summaries, base_seed);

    tracing::info!(
        runs,
        mean = batch.mean_final_balance,
        p50 = batch.percentiles.p50,
        profitable_share = batch.profitable_share,
        "batch complete"
    );
    Ok(batch)
}

fn summarize_batch(summaries: &[RunSummary], base_seed: u64) -> BatchSummary {
    let runs = summaries.len();
    let mut finals: Vec<f64> = summaries.iter().map(|s| s.final_balance).collect();
    finals.sort_by(f64::total_cmp);

    let mean = finals.iter().sum::<f64>() / runs as f64;
    let profitable = summaries.iter().filter(|s| s.is_profitable()).count();
    let starved = summaries
        .iter()
        .filter(|s| s.insufficient_funds_at.is_some())
        .count();

    BatchSummary {
        runs,
        base_seed,
        mean_final_balance: mean,
        min_final_balance: finals[0],
        max_final_balance: finals[runs - 1],
        percentiles: PercentileSet {
            p5: percentile(&finals, 0.05),
            p50: percentile(&finals, 0.50),
            p95: percentile(&finals, 0.95),
        },
        profitable_share: profitable as f64 / runs as f64,
        insufficient_funds_share: starved as f64 / runs as f64,
    }
}

/// Nearest-rank percentile of an ascending, non-empty slice
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let rank = ((sorted.len() - 1) as f64 * p).round() as usize;
    sorted[rank.min(sorted.len() - 1)]
}
