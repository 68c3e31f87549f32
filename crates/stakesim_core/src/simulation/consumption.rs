use crate::config::ConsumptionConfig;
use crate::error::Result;
use crate::model::{RunSummary, StepEvent, StepRecord};
use crate::sampler::{OutcomeSampler, Sampler};
use crate::simulation_state::{SimulationState, SimulationStatus};

use super::{Simulator, summarize};

/// Pays a fixed cost per step and credits a randomly drawn outcome.
///
/// When the balance cannot cover the cost the step buys nothing and the
/// balance stays where it is, but the step counter still advances.
#[derive(Debug, Clone)]
pub struct ConsumptionSimulator {
    cost: f64,
    fee_rate: f64,
    attempts: u32,
    starting_balance: f64,
    sampler: Sampler,
    state: SimulationState,
    status: SimulationStatus,
    insufficient_funds_at: Option<u32>,
}

impl ConsumptionSimulator {
    pub fn new(config: &ConsumptionConfig) -> Result<Self> {
        let seed = config.validated_seed()?;
        let sampler = Sampler::new(config.sampling, config.table.clone(), seed)?;

        Ok(Self {
            cost: config.cost,
            fee_rate: config.fee_rate,
            attempts: config.attempts,
            starting_balance: config.starting_balance,
            sampler,
            state: SimulationState::new(config.starting_balance, config.attempts),
            status: SimulationStatus::Running,
            insufficient_funds_at: None,
        })
    }

    pub fn sampler(&self) -> &Sampler {
        &self.sampler
    }

    pub fn insufficient_funds_at(&self) -> Option<u32> {
        self.insufficient_funds_at
    }
}

impl Simulator for ConsumptionSimulator {
    fn state(&self) -> &SimulationState {
        &self.state
    }

    fn status(&self) -> SimulationStatus {
        self.status
    }

    fn step(&mut self) -> Option<&StepRecord> {
        if self.status.is_terminal() {
            return None;
        }

        let step = self.state.step + 1;
        let balance = self.state.balance;

        let (event, new_balance) = if balance < self.cost {
            if self.status != SimulationStatus::InsufficientFunds {
                tracing::debug!(step, balance, cost = self.cost, "insufficient funds");
                self.status = SimulationStatus::InsufficientFunds;
                self.insufficient_funds_at = Some(step);
            }
            (StepEvent::InsufficientFunds { cost: self.cost }, balance)
        } else {
            let outcome = self.sampler.draw();
            let value_after_fees = outcome.value * self.fee_rate;
            let event = StepEvent::Purchase {
                tier: outcome.tier.clone(),
                outcome: outcome.name.clone(),
                value: outcome.value,
                value_after_fees,
                fee: outcome.value - value_after_fees,
                cost: self.cost,
                profit: value_after_fees - self.cost,
            };
            (event, balance - self.cost + value_after_fees)
        };

        if step >= self.attempts {
            self.status = SimulationStatus::Completed;
        }

        Some(self.state.commit(event, new_balance))
    }

    fn summary(&self) -> RunSummary {
        summarize(
            &self.state,
            self.status,
            self.starting_balance,
            self.insufficient_funds_at,
        )
    }
}
