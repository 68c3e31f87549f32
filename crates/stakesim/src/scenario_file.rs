//! YAML scenario files
//!
//! A scenario file holds one scenario in a human-editable shape:
//!
//! ```yaml
//! kind: consumption
//! starting_balance: 200.0
//! cost: 3.48
//! attempts: 52
//! seed: 42
//! table:
//!   type: tiered
//!   tiers:
//!     - name: Mil-Spec
//!       probability: 0.7992
//!       outcomes:
//!         - name: P90 | Ancient Earth
//!           value: 0.07
//! ```
//!
//! `ScenarioData` is converted to a core `ScenarioConfig`, which validates
//! probabilities and amounts.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use stakesim_core::config::{ConsumptionConfig, GrowthConfig, RandomWalkConfig, ScenarioConfig};
use stakesim_core::error::SimError;
use stakesim_core::model::{Distribution, OutcomeTable, TierPool};
use stakesim_core::sampler::SamplingStrategy;

fn default_fee_rate() -> f64 {
    1.0
}

fn default_periods_per_year() -> u32 {
    52
}

/// YAML-friendly representation of a scenario
/// Uses struct variants to avoid serde_saphyr issues with tagged newtype variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScenarioData {
    Consumption {
        starting_balance: f64,
        cost: f64,
        attempts: u32,
        #[serde(default = "default_fee_rate")]
        fee_rate: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seed: Option<u64>,
        table: TableData,
    },
    Growth {
        initial_capital: f64,
        #[serde(default)]
        periodic_deposit: f64,
        #[serde(default)]
        annual_rate: f64,
        #[serde(default)]
        appreciation: f64,
        #[serde(default = "default_periods_per_year")]
        periods_per_year: u32,
        total_periods: u32,
    },
    RandomWalk {
        initial_capital: f64,
        buy_price: f64,
        units: u32,
        days: u32,
        delta_low: f64,
        delta_high: f64,
        #[serde(default = "default_fee_rate")]
        fee_rate: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seed: Option<u64>,
    },
}

/// Outcome table; the variant also picks the sampling strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TableData {
    /// Draw a tier by probability, then an outcome uniformly within it
    Tiered { tiers: Vec<TierData> },
    /// Draw an outcome directly by its own probability
    Direct {
        #[serde(default = "default_direct_tier")]
        tier: String,
        /// Treat probabilities as raw weights and normalize them
        #[serde(default)]
        normalize: bool,
        outcomes: Vec<WeightedOutcomeData>,
    },
}

fn default_direct_tier() -> String {
    "Default".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierData {
    pub name: String,
    pub probability: f64,
    pub outcomes: Vec<OutcomeData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeData {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedOutcomeData {
    pub name: String,
    pub value: f64,
    pub probability: f64,
}

/// Error types for scenario file operations
#[derive(Debug)]
pub enum ScenarioFileError {
    Io(String),
    Parse(String),
    Serialize(String),
    Invalid(SimError),
}

impl std::fmt::Display for ScenarioFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScenarioFileError::Io(msg) => write!(f, "IO error: {}", msg),
            ScenarioFileError::Parse(msg) => write!(f, "Parse error: {}", msg),
            ScenarioFileError::Serialize(msg) => write!(f, "Serialization error: {}", msg),
            ScenarioFileError::Invalid(err) => write!(f, "Invalid scenario: {}", err),
        }
    }
}

impl std::error::Error for ScenarioFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScenarioFileError::Invalid(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SimError> for ScenarioFileError {
    fn from(err: SimError) -> Self {
        ScenarioFileError::Invalid(err)
    }
}

impl ScenarioData {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_saphyr::Error> {
        serde_saphyr::from_str(yaml)
    }

    /// Save to YAML string
    pub fn to_yaml(&self) -> Result<String, serde_saphyr::ser::Error> {
        serde_saphyr::to_string(self)
    }

    pub fn to_config(&self) -> Result<ScenarioConfig, SimError> {
        Ok(match self {
            ScenarioData::Consumption {
                starting_balance,
                cost,
                attempts,
                fee_rate,
                seed,
                table,
            } => {
                let (table, sampling) = table.to_table()?;
                let mut config = ConsumptionConfig::new(table, sampling)
                    .starting_balance(*starting_balance)
                    .cost(*cost)
                    .attempts(*attempts)
                    .fee_rate(*fee_rate);
                config.seed = *seed;
                ScenarioConfig::Consumption(config)
            }
            ScenarioData::Growth {
                initial_capital,
                periodic_deposit,
                annual_rate,
                appreciation,
                periods_per_year,
                total_periods,
            } => ScenarioConfig::Growth(
                GrowthConfig::new(*initial_capital)
                    .deposit(*periodic_deposit)
                    .annual_rate(*annual_rate)
                    .appreciation(*appreciation)
                    .periods(*periods_per_year, *total_periods),
            ),
            ScenarioData::RandomWalk {
                initial_capital,
                buy_price,
                units,
                days,
                delta_low,
                delta_high,
                fee_rate,
                seed,
            } => {
                let mut config = RandomWalkConfig::new(*initial_capital, *buy_price, *units)
                    .days(*days)
                    .delta_range(*delta_low, *delta_high)
                    .fee_rate(*fee_rate);
                config.seed = *seed;
                ScenarioConfig::RandomWalk(config)
            }
        })
    }
}

impl TableData {
    fn to_table(&self) -> Result<(OutcomeTable, SamplingStrategy), SimError> {
        match self {
            TableData::Tiered { tiers } => {
                let distribution =
                    Distribution::new(tiers.iter().map(|t| (t.name.as_str(), t.probability)))?;
                let pools = tiers
                    .iter()
                    .map(|t| TierPool {
                        tier: t.name.clone(),
                        outcomes: t.outcomes.iter().map(|o| (o.name.clone(), o.value)).collect(),
                    })
                    .collect();
                Ok((
                    OutcomeTable::tiered(pools, distribution)?,
                    SamplingStrategy::Tiered,
                ))
            }
            TableData::Direct {
                tier,
                normalize,
                outcomes,
            } => {
                let entries = outcomes.iter().map(|o| (o.name.as_str(), o.probability));
                let distribution = if *normalize {
                    Distribution::from_weights(entries)?
                } else {
                    Distribution::new(entries)?
                };
                let values = outcomes.iter().map(|o| (o.name.clone(), o.value)).collect();
                Ok((
                    OutcomeTable::per_outcome(tier.clone(), values, distribution)?,
                    SamplingStrategy::Direct,
                ))
            }
        }
    }

    fn from_table(table: &OutcomeTable, sampling: SamplingStrategy) -> Self {
        match sampling {
            SamplingStrategy::Tiered => TableData::Tiered {
                tiers: table
                    .tier_distribution()
                    .entries()
                    .iter()
                    .map(|(name, probability)| TierData {
                        name: name.clone(),
                        probability: *probability,
                        outcomes: table
                            .outcomes_in(name)
                            .unwrap_or_default()
                            .iter()
                            .map(|o| OutcomeData {
                                name: o.name.clone(),
                                value: o.value,
                            })
                            .collect(),
                    })
                    .collect(),
            },
            SamplingStrategy::Direct => TableData::Direct {
                tier: table.tier_names().next().unwrap_or("Default").to_string(),
                normalize: false,
                outcomes: table
                    .outcomes()
                    .iter()
                    .zip(table.outcome_distribution().probabilities())
                    .map(|(o, probability)| WeightedOutcomeData {
                        name: o.name.clone(),
                        value: o.value,
                        probability,
                    })
                    .collect(),
            },
        }
    }
}

impl From<&ScenarioConfig> for ScenarioData {
    fn from(config: &ScenarioConfig) -> Self {
        match config {
            ScenarioConfig::Consumption(c) => ScenarioData::Consumption {
                starting_balance: c.starting_balance,
                cost: c.cost,
                attempts: c.attempts,
                fee_rate: c.fee_rate,
                seed: c.seed,
                table: TableData::from_table(&c.table, c.sampling),
            },
            ScenarioConfig::Growth(c) => ScenarioData::Growth {
                initial_capital: c.initial_capital,
                periodic_deposit: c.periodic_deposit,
                annual_rate: c.annual_rate,
                appreciation: c.appreciation,
                periods_per_year: c.periods_per_year,
                total_periods: c.total_periods,
            },
            ScenarioConfig::RandomWalk(c) => ScenarioData::RandomWalk {
                initial_capital: c.initial_capital,
                buy_price: c.buy_price,
                units: c.units,
                days: c.days,
                delta_low: c.delta_low,
                delta_high: c.delta_high,
                fee_rate: c.fee_rate,
                seed: c.seed,
            },
        }
    }
}

/// Read and validate a scenario file.
///
/// A random scenario may leave its seed out; the caller supplies one and
/// validates the seeded config before running it.
pub fn load(path: &Path) -> Result<ScenarioConfig, ScenarioFileError> {
    let content = fs::read_to_string(path).map_err(|e| {
        ScenarioFileError::Io(format!("Failed to read {}: {}", path.display(), e))
    })?;
    let data = ScenarioData::from_yaml(&content)
        .map_err(|e| ScenarioFileError::Parse(format!("Failed to parse {}: {}", path.display(), e)))?;

    let config = data.to_config()?;
    config.validate_settings().map_err(SimError::from)?;
    tracing::debug!(path = %path.display(), "loaded scenario file");
    Ok(config)
}

/// Render a scenario as YAML
pub fn to_yaml(config: &ScenarioConfig) -> Result<String, ScenarioFileError> {
    ScenarioData::from(config)
        .to_yaml()
        .map_err(|e| ScenarioFileError::Serialize(format!("Failed to serialize scenario: {}", e)))
}
