//! Scenario configuration
//!
//! Each simulator variant has an immutable config struct. A config is validated
//! when a simulator is built from it; nothing reads module-level constants.
//!
//! ```ignore
//! use stakesim_core::config::{GrowthConfig, ScenarioConfig};
//! use stakesim_core::simulation::run_scenario;
//!
//! let config = GrowthConfig::new(200.0)
//!     .deposit(0.50)
//!     .annual_rate(0.15)
//!     .periods(52, 52);
//! let run = run_scenario(&ScenarioConfig::Growth(config))?;
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, check_amount, check_count, check_fee_rate, check_steps};
use crate::model::OutcomeTable;
use crate::sampler::SamplingStrategy;

pub mod presets;

pub use presets::Preset;

fn default_fee_rate() -> f64 {
    1.0
}

/// Consumption scenario: pay a fixed cost per attempt, receive a random outcome
#[derive(Debug, Clone)]
pub struct ConsumptionConfig {
    pub starting_balance: f64,
    /// Price of one attempt
    pub cost: f64,
    pub attempts: u32,
    /// Fraction of an outcome's value kept after fees (1.0 = no fee)
    pub fee_rate: f64,
    pub seed: Option<u64>,
    pub sampling: SamplingStrategy,
    pub table: OutcomeTable,
}

impl ConsumptionConfig {
    #[must_use]
    pub fn new(table: OutcomeTable, sampling: SamplingStrategy) -> Self {
        Self {
            starting_balance: 0.0,
            cost: 0.0,
            attempts: 1,
            fee_rate: default_fee_rate(),
            seed: None,
            sampling,
            table,
        }
    }

    #[must_use]
    pub fn starting_balance(mut self, balance: f64) -> Self {
        self.starting_balance = balance;
        self
    }

    #[must_use]
    pub fn cost(mut self, cost: f64) -> Self {
        self.cost = cost;
        self
    }

    #[must_use]
    pub fn attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    #[must_use]
    pub fn fee_rate(mut self, fee_rate: f64) -> Self {
        self.fee_rate = fee_rate;
        self
    }

    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check everything except the seed
    pub fn validate_settings(&self) -> Result<(), ConfigError> {
        check_amount("starting balance", self.starting_balance)?;
        check_amount("cost", self.cost)?;
        check_steps("attempts", self.attempts)?;
        check_fee_rate(self.fee_rate)
    }

    /// Validate and return the seed a run needs
    pub fn validated_seed(&self) -> Result<u64, ConfigError> {
        self.validate_settings()?;
        self.seed.ok_or(ConfigError::MissingSeed)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validated_seed().map(|_| ())
    }
}

/// Deterministic growth scenario: periodic deposits, compounding, appreciation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthConfig {
    pub initial_capital: f64,
    pub periodic_deposit: f64,
    /// Annual percentage yield, compounded once per period
    pub annual_rate: f64,
    /// Appreciation reached at the final period, applied linearly over time
    #[serde(default)]
    pub appreciation: f64,
    pub periods_per_year: u32,
    pub total_periods: u32,
}

impl GrowthConfig {
    #[must_use]
    pub fn new(initial_capital: f64) -> Self {
        Self {
            initial_capital,
            periodic_deposit: 0.0,
            annual_rate: 0.0,
            appreciation: 0.0,
            periods_per_year: 52,
            total_periods: 52,
        }
    }

    #[must_use]
    pub fn deposit(mut self, amount: f64) -> Self {
        self.periodic_deposit = amount;
        self
    }

    #[must_use]
    pub fn annual_rate(mut self, rate: f64) -> Self {
        self.annual_rate = rate;
        self
    }

    #[must_use]
    pub fn appreciation(mut self, appreciation: f64) -> Self {
        self.appreciation = appreciation;
        self
    }

    #[must_use]
    pub fn periods(mut self, periods_per_year: u32, total_periods: u32) -> Self {
        self.periods_per_year = periods_per_year;
        self.total_periods = total_periods;
        self
    }

    /// Per-period rate equivalent to `annual_rate` compounded `periods_per_year` times
    #[must_use]
    pub fn periodic_rate(&self) -> f64 {
        periodic_rate(self.annual_rate, self.periods_per_year)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_amount("initial capital", self.initial_capital)?;
        check_amount("periodic deposit", self.periodic_deposit)?;
        check_amount("annual rate", self.annual_rate)?;
        check_amount("appreciation", self.appreciation)?;
        check_count("periods per year", self.periods_per_year)?;
        check_steps("total periods", self.total_periods)?;
        Ok(())
    }
}

/// Convert an annual rate to the equivalent rate per period using compound interest
#[must_use]
#[inline]
pub fn periodic_rate(annual_rate: f64, periods_per_year: u32) -> f64 {
    (1.0 + annual_rate).powf(1.0 / f64::from(periods_per_year)) - 1.0
}

/// Random-walk scenario: buy units, let the price drift, sell once at the end
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RandomWalkConfig {
    pub initial_capital: f64,
    pub buy_price: f64,
    pub units: u32,
    pub days: u32,
    /// Smallest daily price change
    pub delta_low: f64,
    /// Largest daily price change
    pub delta_high: f64,
    /// Fraction of the sale value kept after fees
    #[serde(default = "default_fee_rate")]
    pub fee_rate: f64,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl RandomWalkConfig {
    #[must_use]
    pub fn new(initial_capital: f64, buy_price: f64, units: u32) -> Self {
        Self {
            initial_capital,
            buy_price,
            units,
            days: 1,
            delta_low: 0.0,
            delta_high: 0.0,
            fee_rate: default_fee_rate(),
            seed: None,
        }
    }

    #[must_use]
    pub fn days(mut self, days: u32) -> Self {
        self.days = days;
        self
    }

    #[must_use]
    pub fn delta_range(mut self, low: f64, high: f64) -> Self {
        self.delta_low = low;
        self.delta_high = high;
        self
    }

    #[must_use]
    pub fn fee_rate(mut self, fee_rate: f64) -> Self {
        self.fee_rate = fee_rate;
        self
    }

    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Cost of the initial purchase
    #[must_use]
    pub fn initial_cost(&self) -> f64 {
        self.buy_price * f64::from(self.units)
    }

    /// Capital left over after the initial purchase
    #[must_use]
    pub fn leftover_cash(&self) -> f64 {
        self.initial_capital - self.initial_cost()
    }

    /// Sale price per unit at which proceeds after fees equal the purchase price
    #[must_use]
    pub fn break_even_price(&self) -> f64 {
        self.buy_price / self.fee_rate
    }

    #[must_use]
    pub fn break_even_value(&self) -> f64 {
        self.break_even_price() * f64::from(self.units)
    }

    /// Check everything except the seed
    pub fn validate_settings(&self) -> Result<(), ConfigError> {
        check_amount("initial capital", self.initial_capital)?;
        check_amount("buy price", self.buy_price)?;
        check_count("units", self.units)?;
        check_steps("days", self.days)?;
        check_fee_rate(self.fee_rate)?;
        if !self.delta_low.is_finite() || !self.delta_high.is_finite() {
            return Err(ConfigError::NonFiniteAmount {
                field: "price delta",
            });
        }
        if self.delta_low > self.delta_high {
            return Err(ConfigError::InvalidRange {
                low: self.delta_low,
                high: self.delta_high,
            });
        }
        let cost = self.initial_cost();
        if cost > self.initial_capital {
            return Err(ConfigError::InsufficientCapital {
                capital: self.initial_capital,
                cost,
            });
        }
        Ok(())
    }

    /// Validate and return the seed a run needs
    pub fn validated_seed(&self) -> Result<u64, ConfigError> {
        self.validate_settings()?;
        self.seed.ok_or(ConfigError::MissingSeed)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validated_seed().map(|_| ())
    }
}

/// Any runnable scenario
#[derive(Debug, Clone)]
pub enum ScenarioConfig {
    Consumption(ConsumptionConfig),
    Growth(GrowthConfig),
    RandomWalk(RandomWalkConfig),
}

impl ScenarioConfig {
    /// Seed of a random scenario; `None` for deterministic ones or when unset
    pub fn seed(&self) -> Option<u64> {
        match self {
            ScenarioConfig::Consumption(c) => c.seed,
            ScenarioConfig::Growth(_) => None,
            ScenarioConfig::RandomWalk(c) => c.seed,
        }
    }

    /// Replace the seed; deterministic scenarios are returned unchanged
    #[must_use]
    pub fn with_seed(self, seed: u64) -> Self {
        match self {
            ScenarioConfig::Consumption(c) => ScenarioConfig::Consumption(c.seed(seed)),
            ScenarioConfig::Growth(c) => ScenarioConfig::Growth(c),
            ScenarioConfig::RandomWalk(c) => ScenarioConfig::RandomWalk(c.seed(seed)),
        }
    }

    pub fn is_random(&self) -> bool {
        !matches!(self, ScenarioConfig::Growth(_))
    }

    /// Validate everything a seed override cannot change
    pub fn validate_settings(&self) -> Result<(), ConfigError> {
        match self {
            ScenarioConfig::Consumption(c) => c.validate_settings(),
            ScenarioConfig::Growth(c) => c.validate(),
            ScenarioConfig::RandomWalk(c) => c.validate_settings(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            ScenarioConfig::Consumption(c) => c.validate(),
            ScenarioConfig::Growth(c) => c.validate(),
            ScenarioConfig::RandomWalk(c) => c.validate(),
        }
    }
}
