use crate::config::RandomWalkConfig;
use crate::error::Result;
use crate::model::{RunSummary, StepEvent, StepRecord};
use crate::sampler::PriceWalk;
use crate::simulation_state::{SimulationState, SimulationStatus};

use super::{Simulator, summarize};

/// Holds a fixed number of units while the unit price takes a bounded
/// uniform random walk, then sells everything once.
///
/// Steps `1..=days` move the price; step `days + 1` is the sale. The balance
/// is the portfolio value (price times units) until the sale, and the
/// proceeds after fees afterwards.
#[derive(Debug, Clone)]
pub struct RandomWalkSimulator {
    config: RandomWalkConfig,
    walk: PriceWalk,
    price: f64,
    proceeds: Option<f64>,
    state: SimulationState,
    status: SimulationStatus,
}

impl RandomWalkSimulator {
    pub fn new(config: RandomWalkConfig) -> Result<Self> {
        let seed = config.validated_seed()?;
        let walk = PriceWalk::new(config.delta_low, config.delta_high, seed)?;

        Ok(Self {
            walk,
            price: config.buy_price,
            proceeds: None,
            state: SimulationState::new(config.initial_cost(), config.days.saturating_add(1)),
            status: SimulationStatus::Running,
            config,
        })
    }

    pub fn config(&self) -> &RandomWalkConfig {
        &self.config
    }

    /// Current unit price
    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn portfolio_value(&self) -> f64 {
        self.price * f64::from(self.config.units)
    }

    /// Sale proceeds after fees, once sold
    pub fn proceeds(&self) -> Option<f64> {
        self.proceeds
    }

    /// Proceeds minus the initial purchase cost, once sold
    pub fn net_result(&self) -> Option<f64> {
        self.proceeds.map(|p| p - self.config.initial_cost())
    }

    fn sell(&mut self) -> (StepEvent, f64) {
        let gross = self.portfolio_value();
        let proceeds = gross * self.config.fee_rate;
        self.proceeds = Some(proceeds);
        self.status = SimulationStatus::Completed;
        tracing::debug!(price = self.price, gross, proceeds, "position sold");

        let event = StepEvent::Sale {
            price: self.price,
            gross,
            fee: gross - proceeds,
            proceeds,
        };
        (event, proceeds)
    }
}

impl Simulator for RandomWalkSimulator {
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

        let (event, balance) = if self.state.step < self.config.days {
            let delta = self.walk.next_delta();
            self.price += delta;
            (
                StepEvent::PriceMove {
                    delta,
                    price: self.price,
                },
                self.portfolio_value(),
            )
        } else {
            self.sell()
        };

        Some(self.state.commit(event, balance))
    }

    fn summary(&self) -> RunSummary {
        summarize(&self.state, self.status, self.config.initial_cost(), None)
    }
}
