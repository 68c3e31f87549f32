use serde::{Deserialize, Serialize};

use crate::model::{StepEvent, StepRecord};
use crate::recorder::StepRecorder;

/// Upper bound on records reserved up front; longer runs grow the log as they go
const PREALLOCATED_STEPS: u32 = 4096;

/// Where a simulator is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimulationStatus {
    Running,
    /// Balance cannot cover the next attempt; steps still advance but buy nothing
    InsufficientFunds,
    Completed,
}

impl SimulationStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, SimulationStatus::Completed)
    }
}

/// Runtime state of one run, mutated only by its simulator's step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationState {
    pub step: u32,
    pub balance: f64,
    pub history: StepRecorder,
}

impl SimulationState {
    /// Fresh state with the `Start` record already logged at step 0
    pub fn new(initial_balance: f64, expected_steps: u32) -> Self {
        let capacity = expected_steps.min(PREALLOCATED_STEPS) as usize + 1;
        let mut history = StepRecorder::with_capacity(capacity);
        history.record(StepRecord::new(0, StepEvent::Start, initial_balance));
        Self {
            step: 0,
            balance: initial_balance,
            history,
        }
    }

    pub fn initial_balance(&self) -> f64 {
        self.history
            .history()
            .first()
            .map_or(self.balance, |r| r.balance)
    }

    /// Advance to the next step, set the balance and log the event
    pub(crate) fn commit(&mut self, event: StepEvent, balance: f64) -> &StepRecord {
        self.step += 1;
        self.balance = balance;
        self.history
            .record(StepRecord::new(self.step, event, balance))
    }
}
