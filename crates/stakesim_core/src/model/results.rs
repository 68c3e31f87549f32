//! Run and batch summaries

use serde::{Deserialize, Serialize};

use crate::simulation_state::SimulationStatus;

/// Outcome of a single simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub steps: u32,
    pub status: SimulationStatus,
    pub starting_balance: f64,
    pub final_balance: f64,
    /// `final_balance - starting_balance`
    pub net_result: f64,
    /// Number of successful purchases (consumption runs only)
    pub purchases: u32,
    pub total_fees: f64,
    /// First step at which the balance could no longer cover the cost
    pub insufficient_funds_at: Option<u32>,
}

impl RunSummary {
    pub fn is_profitable(&self) -> bool {
        self.net_result > 0.0
    }
}

/// Standard percentiles of a batch of final balances
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileSet {
    pub p5: f64,
    pub p50: f64,
    pub p95: f64,
}

/// Aggregated results of many independent runs of one scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub runs: usize,
    pub base_seed: u64,
    pub mean_final_balance: f64,
    pub min_final_balance: f64,
    pub max_final_balance: f64,
    pub percentiles: PercentileSet,
    /// Share of runs that ended above their starting balance
    pub profitable_share: f64,
    /// Share of runs that hit insufficient funds at some step
    pub insufficient_funds_share: f64,
}
