//! Step-at-a-time simulators
//!
//! Every simulator owns its `SimulationState`, advances it one step per call
//! to [`Simulator::step`] and appends one record per step. Nothing outside the
//! step operation mutates the state.

mod consumption;
mod growth;
mod random_walk;

pub use consumption::ConsumptionSimulator;
pub use growth::{GrowthPoint, GrowthSimulator};
pub use random_walk::RandomWalkSimulator;

use serde::{Deserialize, Serialize};

use crate::config::ScenarioConfig;
use crate::error::Result;
use crate::model::{RunSummary, StepRecord};
use crate::recorder::StepRecorder;
use crate::simulation_state::{SimulationState, SimulationStatus};

pub trait Simulator {
    fn state(&self) -> &SimulationState;

    fn status(&self) -> SimulationStatus;

    /// Advance one step and return its record, or `None` once completed
    fn step(&mut self) -> Option<&StepRecord>;

    fn summary(&self) -> RunSummary;

    /// Step until completion
    fn run(&mut self) -> RunSummary {
        while self.step().is_some() {}
        self.summary()
    }

    fn history(&self) -> &[StepRecord] {
        self.state().history.history()
    }
}

pub(crate) fn summarize(
    state: &SimulationState,
    status: SimulationStatus,
    starting_balance: f64,
    insufficient_funds_at: Option<u32>,
) -> RunSummary {
    RunSummary {
        steps: state.step,
        status,
        starting_balance,
        final_balance: state.balance,
        net_result: state.balance - starting_balance,
        purchases: state.history.purchases().count() as u32,
        total_fees: state.history.total_fees(),
        insufficient_funds_at,
    }
}

/// Any of the three simulators, built from a `ScenarioConfig`
#[derive(Debug, Clone)]
pub enum ScenarioSimulator {
    Consumption(ConsumptionSimulator),
    Growth(GrowthSimulator),
    RandomWalk(RandomWalkSimulator),
}

impl ScenarioSimulator {
    pub fn from_config(config: &ScenarioConfig) -> Result<Self> {
        Ok(match config {
            ScenarioConfig::Consumption(c) => {
                ScenarioSimulator::Consumption(ConsumptionSimulator::new(c)?)
            }
            ScenarioConfig::Growth(c) => ScenarioSimulator::Growth(GrowthSimulator::new(*c)?),
            ScenarioConfig::RandomWalk(c) => {
                ScenarioSimulator::RandomWalk(RandomWalkSimulator::new(*c)?)
            }
        })
    }

    fn inner(&self) -> &dyn Simulator {
        match self {
            ScenarioSimulator::Consumption(s) => s,
            ScenarioSimulator::Growth(s) => s,
            ScenarioSimulator::RandomWalk(s) => s,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Simulator {
        match self {
            ScenarioSimulator::Consumption(s) => s,
            ScenarioSimulator::Growth(s) => s,
            ScenarioSimulator::RandomWalk(s) => s,
        }
    }
}

impl Simulator for ScenarioSimulator {
    fn state(&self) -> &SimulationState {
        self.inner().state()
    }

    fn status(&self) -> SimulationStatus {
        self.inner().status()
    }

    fn step(&mut self) -> Option<&StepRecord> {
        self.inner_mut().step()
    }

    fn summary(&self) -> RunSummary {
        self.inner().summary()
    }
}

/// Completed run: summary plus the full step log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioRun {
    pub summary: RunSummary,
    pub history: StepRecorder,
}

/// Build the scenario's simulator and run it to completion
pub fn run_scenario(config: &ScenarioConfig) -> Result<ScenarioRun> {
    let mut simulator = ScenarioSimulator::from_config(config)?;
    let summary = simulator.run();
    tracing::debug!(
        steps = summary.steps,
        final_balance = summary.final_balance,
        net_result = summary.net_result,
        "scenario run complete"
    );
    Ok(ScenarioRun {
        summary,
        history: simulator.state().history.clone(),
    })
}
