//! Step records - the append-only log of a simulation run
//!
//! Every step of every simulator appends exactly one `StepRecord`. The log
//! can be replayed to audit a run or handed to whatever draws the chart.

use serde::{Deserialize, Serialize};

/// A single recorded step with the balance it left behind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Step index; 0 is the starting point
    pub step: u32,
    pub event: StepEvent,
    /// Balance (or portfolio value) after the step
    pub balance: f64,
}

impl StepRecord {
    pub fn new(step: u32, event: StepEvent, balance: f64) -> Self {
        Self {
            step,
            event,
            balance,
        }
    }

    pub fn is_purchase(&self) -> bool {
        matches!(self.event, StepEvent::Purchase { .. })
    }

    pub fn outcome_name(&self) -> Option<&str> {
        match &self.event {
            StepEvent::Purchase { outcome, .. } => Some(outcome),
            _ => None,
        }
    }

    pub fn outcome_value(&self) -> Option<f64> {
        match &self.event {
            StepEvent::Purchase { value, .. } => Some(*value),
            _ => None,
        }
    }

    pub fn fee(&self) -> Option<f64> {
        match &self.event {
            StepEvent::Purchase { fee, .. } | StepEvent::Sale { fee, .. } => Some(*fee),
            _ => None,
        }
    }

    pub fn profit(&self) -> Option<f64> {
        match &self.event {
            StepEvent::Purchase { profit, .. } => Some(*profit),
            _ => None,
        }
    }

    /// Flatten into the per-step tuple consumed by presentation layers
    pub fn report(&self) -> StepReport {
        StepReport {
            step: self.step,
            balance: self.balance,
            outcome_name: self.outcome_name().map(str::to_owned),
            outcome_value: self.outcome_value(),
            fee: self.fee(),
            profit: self.profit(),
        }
    }
}

/// What happened during a step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StepEvent {
    /// Initial state before any step has run
    Start,

    // === Consumption ===
    /// Paid the attempt cost and received an outcome
    Purchase {
        tier: String,
        outcome: String,
        /// Gross market value of the outcome
        value: f64,
        value_after_fees: f64,
        fee: f64,
        cost: f64,
        /// `value_after_fees - cost`
        profit: f64,
    },
    /// Balance could not cover the cost; nothing was bought
    InsufficientFunds { cost: f64 },

    // === Deterministic growth ===
    Growth {
        deposit: f64,
        interest: f64,
        /// Appreciation on top of deposits and interest (recomputed each step, not cumulative)
        asset_gains: f64,
        total_deposits: f64,
        total_interest: f64,
        /// Compounding balance after this step
        principal: f64,
    },

    // === Random walk ===
    PriceMove { delta: f64, price: f64 },
    /// One-time sale of the whole position
    Sale {
        price: f64,
        gross: f64,
        fee: f64,
        proceeds: f64,
    },
}

/// Flat per-step view: `(step, balance, outcome?, value?, fee?, profit?)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    pub step: u32,
    pub balance: f64,
    pub outcome_name: Option<String>,
    pub outcome_value: Option<f64>,
    pub fee: Option<f64>,
    pub profit: Option<f64>,
}
