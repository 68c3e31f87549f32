//! Stepwise economic simulations
//!
//! This crate models small gambling and investment scenarios as seeded,
//! step-at-a-time simulations that record every step for later display.
//! It supports:
//! - Outcome tables grouped into tiers with validated probability distributions
//! - Tiered (tier, then uniform) and direct (per-outcome) sampling from a ChaCha8 source
//! - Consumption runs: pay a cost, draw an outcome, apply a fee multiplier
//! - Deterministic growth runs: deposits, compounding and linear appreciation
//! - Random-walk runs: a bounded uniform price walk followed by one sale
//! - Batches of independent runs with percentile summaries
//!
//! # Example
//!
//! ```ignore
//! use stakesim_core::config::Preset;
//! use stakesim_core::simulation::run_scenario;
//!
//! let config = Preset::TradeUp.config()?;
//! let run = run_scenario(&config)?;
//! for report in run.history.reports() {
//!     println!("{} {:.2}", report.step, report.balance);
//! }
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod error;
pub mod monte_carlo;
pub mod recorder;
pub mod sampler;
pub mod simulation;
pub mod simulation_state;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::{ConsumptionConfig, GrowthConfig, Preset, RandomWalkConfig, ScenarioConfig};
pub use error::{ConfigError, DistributionError, MAX_STEPS, SimError};
pub use recorder::StepRecorder;
pub use sampler::{DirectSampler, OutcomeSampler, SamplingStrategy, TieredSampler};
pub use simulation::{ScenarioRun, Simulator, run_scenario};
pub use simulation_state::{SimulationState, SimulationStatus};
