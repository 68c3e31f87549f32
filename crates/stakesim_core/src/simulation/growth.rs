use serde::{Deserialize, Serialize};

use crate::config::GrowthConfig;
use crate::error::Result;
use crate::model::{RunSummary, StepEvent, StepRecord};
use crate::simulation_state::{SimulationState, SimulationStatus};

use super::{Simulator, summarize};

/// Position of a growth run after some number of periods
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthPoint {
    pub period: u32,
    /// Running balance that interest compounds on
    pub principal: f64,
    pub total_deposits: f64,
    pub total_interest: f64,
    pub asset_gains: f64,
    /// Interest earned in this period alone
    pub interest: f64,
}

impl GrowthPoint {
    pub fn initial(config: &GrowthConfig) -> Self {
        Self {
            period: 0,
            principal: config.initial_capital,
            total_deposits: 0.0,
            total_interest: 0.0,
            asset_gains: 0.0,
            interest: 0.0,
        }
    }

    /// Capital plus deposits
    pub fn baseline(&self, config: &GrowthConfig) -> f64 {
        config.initial_capital + self.total_deposits
    }

    /// Baseline plus compounded interest
    pub fn with_interest(&self, config: &GrowthConfig) -> f64 {
        self.baseline(config) + self.total_interest
    }

    /// Everything, including asset appreciation
    pub fn total_value(&self, config: &GrowthConfig) -> f64 {
        self.with_interest(config) + self.asset_gains
    }

    /// Rebuild a point from a recorded growth step
    pub fn from_record(config: &GrowthConfig, record: &StepRecord) -> Option<Self> {
        match record.event {
            StepEvent::Start => Some(Self::initial(config)),
            StepEvent::Growth {
                interest,
                asset_gains,
                total_deposits,
                total_interest,
                principal,
                ..
            } => Some(Self {
                period: record.step,
                principal,
                total_deposits,
                total_interest,
                asset_gains,
                interest,
            }),
            _ => None,
        }
    }

    fn to_event(self, config: &GrowthConfig) -> StepEvent {
        StepEvent::Growth {
            deposit: config.periodic_deposit,
            interest: self.interest,
            asset_gains: self.asset_gains,
            total_deposits: self.total_deposits,
            total_interest: self.total_interest,
            principal: self.principal,
        }
    }
}

/// Deposits, compounding and linear appreciation; no randomness.
///
/// The value after period `k` depends only on the config and the point at
/// `k - 1`, see [`GrowthSimulator::advance`].
#[derive(Debug, Clone)]
pub struct GrowthSimulator {
    config: GrowthConfig,
    point: GrowthPoint,
    state: SimulationState,
    status: SimulationStatus,
}

impl GrowthSimulator {
    pub fn new(config: GrowthConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            point: GrowthPoint::initial(&config),
            state: SimulationState::new(config.initial_capital, config.total_periods),
            status: SimulationStatus::Running,
            config,
        })
    }

    /// Compute the point one period after `prev`
    pub fn advance(config: &GrowthConfig, prev: &GrowthPoint) -> GrowthPoint {
        let period = prev.period + 1;

        let mut principal = prev.principal + config.periodic_deposit;
        let total_deposits = prev.total_deposits + config.periodic_deposit;
        let interest = principal * config.periodic_rate();
        principal += interest;
        let total_interest = prev.total_interest + interest;

        let base = config.initial_capital + total_deposits + total_interest;
        let elapsed = f64::from(period) / f64::from(config.total_periods);
        let asset_gains = base * (config.appreciation * elapsed);

        GrowthPoint {
            period,
            principal,
            total_deposits,
            total_interest,
            asset_gains,
            interest,
        }
    }

    /// Point after `period` periods, computed from scratch
    pub fn point_at(config: &GrowthConfig, period: u32) -> GrowthPoint {
        let mut point = GrowthPoint::initial(config);
        while point.period < period {
            point = Self::advance(config, &point);
        }
        point
    }

    /// Total value after `period` periods, computed from scratch
    pub fn value_at(config: &GrowthConfig, period: u32) -> f64 {
        Self::point_at(config, period).total_value(config)
    }

    pub fn config(&self) -> &GrowthConfig {
        &self.config
    }

    pub fn current(&self) -> &GrowthPoint {
        &self.point
    }

    /// Recorded points, period 0 first
    pub fn points(&self) -> Vec<GrowthPoint> {
        self.state
            .history
            .history()
            .iter()
            .filter_map(|r| GrowthPoint::from_record(&self.config, r))
            .collect()
    }

    /// Growth of total value over each block of `span` periods recorded so far.
    ///
    /// A trailing partial block is included. With weekly periods and a span of
    /// 52 this is the per-year breakdown.
    pub fn period_gains(&self, span: u32) -> Vec<f64> {
        if span == 0 {
            return Vec::new();
        }
        let balances: Vec<f64> = self.state.history.balances().collect();
        let last = balances.len().saturating_sub(1);

        let mut gains = Vec::new();
        let mut from = 0;
        while from < last {
            let to = (from + span as usize).min(last);
            gains.push(balances[to] - balances[from]);
            from = to;
        }
        gains
    }
}

impl Simulator for GrowthSimulator {
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

        self.point = Self::advance(&self.config, &self.point);
        if self.point.period >= self.config.total_periods {
            self.status = SimulationStatus::Completed;
            tracing::debug!(periods = self.point.period, "growth run complete");
        }

        let value = self.point.total_value(&self.config);
        Some(self.state.commit(self.point.to_event(&self.config), value))
    }

    fn summary(&self) -> RunSummary {
        summarize(&self.state, self.status, self.config.initial_capital, None)
    }
}
