//! Seeded random sources for the simulators
//!
//! All randomness flows from `ChaCha8Rng`, whose output stream is fixed by its
//! seed on every platform. Two samplers built from the same table and seed and
//! called the same way return the same sequence.
//!
//! Tiered and direct sampling make different numbers of draws per outcome, so
//! the same seed produces different sequences under each.

use rand::distr::weighted::WeightedIndex;
use rand::distr::{Distribution as _, Uniform};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, DistributionError, Result};
use crate::model::{Distribution, Outcome, OutcomeTable};

/// Draws outcomes from an `OutcomeTable`
pub trait OutcomeSampler {
    /// Draw the next outcome
    fn draw(&mut self) -> &Outcome;

    /// Reset the random source so the sequence starts over
    fn restart(&mut self);

    fn seed(&self) -> u64;

    fn table(&self) -> &OutcomeTable;
}

fn weighted_index(dist: &Distribution) -> Result<WeightedIndex<f64>> {
    WeightedIndex::new(dist.probabilities())
        .map_err(|_| DistributionError::ZeroTotalWeight.into())
}

/// Two-stage sampling: pick a tier by probability, then an outcome uniformly within it
#[derive(Debug, Clone)]
pub struct TieredSampler {
    table: OutcomeTable,
    seed: u64,
    rng: ChaCha8Rng,
    tiers: WeightedIndex<f64>,
}

impl TieredSampler {
    pub fn new(table: OutcomeTable, seed: u64) -> Result<Self> {
        let tiers = weighted_index(table.tier_distribution())?;
        Ok(Self {
            table,
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            tiers,
        })
    }
}

impl OutcomeSampler for TieredSampler {
    fn draw(&mut self) -> &Outcome {
        let tier = self.tiers.sample(&mut self.rng);
        let pool = self.table.tier_slice(tier);
        let pick = self.rng.random_range(0..pool.len());
        &pool[pick]
    }

    fn restart(&mut self) {
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
    }

    fn seed(&self) -> u64 {
        self.seed
    }

    fn table(&self) -> &OutcomeTable {
        &self.table
    }
}

impl Iterator for TieredSampler {
    type Item = Outcome;

    fn next(&mut self) -> Option<Outcome> {
        Some(self.draw().clone())
    }
}

/// Single-stage sampling: pick an outcome directly by its own probability
#[derive(Debug, Clone)]
pub struct DirectSampler {
    table: OutcomeTable,
    seed: u64,
    rng: ChaCha8Rng,
    outcomes: WeightedIndex<f64>,
}

impl DirectSampler {
    pub fn new(table: OutcomeTable, seed: u64) -> Result<Self> {
        let outcomes = weighted_index(table.outcome_distribution())?;
        Ok(Self {
            table,
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            outcomes,
        })
    }
}

impl OutcomeSampler for DirectSampler {
    fn draw(&mut self) -> &Outcome {
        let index = self.outcomes.sample(&mut self.rng);
        &self.table.outcomes()[index]
    }

    fn restart(&mut self) {
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
    }

    fn seed(&self) -> u64 {
        self.seed
    }

    fn table(&self) -> &OutcomeTable {
        &self.table
    }
}

impl Iterator for DirectSampler {
    type Item = Outcome;

    fn next(&mut self) -> Option<Outcome> {
        Some(self.draw().clone())
    }
}

/// Which sampling model a consumption scenario uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingStrategy {
    /// Tier first, then uniformly within the tier (case openings)
    Tiered,
    /// Directly by per-outcome probability (trade-ups)
    Direct,
}

/// A sampler chosen at runtime from a `SamplingStrategy`
#[derive(Debug, Clone)]
pub enum Sampler {
    Tiered(TieredSampler),
    Direct(DirectSampler),
}

impl Sampler {
    pub fn new(strategy: SamplingStrategy, table: OutcomeTable, seed: u64) -> Result<Self> {
        Ok(match strategy {
            SamplingStrategy::Tiered => Sampler::Tiered(TieredSampler::new(table, seed)?),
            SamplingStrategy::Direct => Sampler::Direct(DirectSampler::new(table, seed)?),
        })
    }

    pub fn strategy(&self) -> SamplingStrategy {
        match self {
            Sampler::Tiered(_) => SamplingStrategy::Tiered,
            Sampler::Direct(_) => SamplingStrategy::Direct,
        }
    }
}

impl OutcomeSampler for Sampler {
    fn draw(&mut self) -> &Outcome {
        match self {
            Sampler::Tiered(s) => s.draw(),
            Sampler::Direct(s) => s.draw(),
        }
    }

    fn restart(&mut self) {
        match self {
            Sampler::Tiered(s) => s.restart(),
            Sampler::Direct(s) => s.restart(),
        }
    }

    fn seed(&self) -> u64 {
        match self {
            Sampler::Tiered(s) => s.seed(),
            Sampler::Direct(s) => s.seed(),
        }
    }

    fn table(&self) -> &OutcomeTable {
        match self {
            Sampler::Tiered(s) => s.table(),
            Sampler::Direct(s) => s.table(),
        }
    }
}

/// Uniform price deltas in `[low, high]` for the random-walk simulator
#[derive(Debug, Clone)]
pub struct PriceWalk {
    seed: u64,
    rng: ChaCha8Rng,
    delta: Uniform<f64>,
}

impl PriceWalk {
    pub fn new(low: f64, high: f64, seed: u64) -> Result<Self> {
        if !low.is_finite() || !high.is_finite() || low > high {
            return Err(ConfigError::InvalidRange { low, high }.into());
        }
        let delta = Uniform::new_inclusive(low, high)
            .map_err(|_| ConfigError::InvalidRange { low, high })?;
        Ok(Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            delta,
        })
    }

    pub fn next_delta(&mut self) -> f64 {
        self.delta.sample(&mut self.rng)
    }

    pub fn restart(&mut self) {
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Iterator for PriceWalk {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        Some(self.next_delta())
    }
}
