use std::fmt;

/// Errors raised while building a probability distribution
#[derive(Debug, Clone, PartialEq)]
pub enum DistributionError {
    Empty,
    EmptyLabel,
    DuplicateLabel(String),
    NonFiniteProbability { label: String },
    NegativeProbability { label: String, probability: f64 },
    /// Probabilities sum to something other than 1 (outside tolerance)
    NotNormalized { sum: f64 },
    /// Raw weights cannot be normalized because they sum to zero
    ZeroTotalWeight,
}

impl fmt::Display for DistributionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistributionError::Empty => write!(f, "distribution has no entries"),
            DistributionError::EmptyLabel => write!(f, "distribution label cannot be empty"),
            DistributionError::DuplicateLabel(label) => {
                write!(f, "label {label:?} appears more than once")
            }
            DistributionError::NonFiniteProbability { label } => {
                write!(f, "probability for {label:?} is not finite")
            }
            DistributionError::NegativeProbability { label, probability } => {
                write!(f, "probability for {label:?} is negative ({probability})")
            }
            DistributionError::NotNormalized { sum } => {
                write!(f, "probabilities sum to {sum}, expected 1")
            }
            DistributionError::ZeroTotalWeight => write!(f, "weights sum to zero"),
        }
    }
}

impl std::error::Error for DistributionError {}

/// Errors raised while validating simulation configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A count (attempts, days, weeks, runs) must be at least one
    NonPositiveCount { field: &'static str },
    /// A step count above `MAX_STEPS`
    TooManySteps { field: &'static str, count: u32 },
    NegativeAmount { field: &'static str, value: f64 },
    NonFiniteAmount { field: &'static str },
    /// Fee multiplier must lie in (0, 1]
    InvalidFeeRate(f64),
    /// Lower bound of a uniform range exceeds the upper bound
    InvalidRange { low: f64, high: f64 },
    MissingSeed,
    UnknownTier(String),
    EmptyTier(String),
    /// A tier in the outcome pools has no probability entry
    TierWithoutProbability(String),
    /// A probability entry names an outcome that is not in the table
    UnknownOutcome(String),
    OutcomeWithoutProbability(String),
    DuplicateOutcome(String),
    /// Starting capital does not cover the initial purchase
    InsufficientCapital { capital: f64, cost: f64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositiveCount { field } => {
                write!(f, "{field} must be greater than zero")
            }
            ConfigError::TooManySteps { field, count } => {
                write!(f, "{field} is {count}, at most {MAX_STEPS} steps are supported")
            }
            ConfigError::NegativeAmount { field, value } => {
                write!(f, "{field} cannot be negative (got {value})")
            }
            ConfigError::NonFiniteAmount { field } => write!(f, "{field} must be finite"),
            ConfigError::InvalidFeeRate(rate) => {
                write!(f, "fee rate {rate} must be greater than 0 and at most 1")
            }
            ConfigError::InvalidRange { low, high } => {
                write!(f, "invalid range: low ({low}) is greater than high ({high})")
            }
            ConfigError::MissingSeed => write!(f, "a seed is required for random scenarios"),
            ConfigError::UnknownTier(tier) => write!(f, "tier {tier:?} has no outcomes"),
            ConfigError::EmptyTier(tier) => write!(f, "tier {tier:?} is empty"),
            ConfigError::TierWithoutProbability(tier) => {
                write!(f, "tier {tier:?} has no probability")
            }
            ConfigError::UnknownOutcome(name) => {
                write!(f, "outcome {name:?} is not in the table")
            }
            ConfigError::OutcomeWithoutProbability(name) => {
                write!(f, "outcome {name:?} has no probability")
            }
            ConfigError::DuplicateOutcome(name) => {
                write!(f, "outcome {name:?} is defined more than once")
            }
            ConfigError::InsufficientCapital { capital, cost } => {
                write!(f, "capital {capital:.2} does not cover initial cost {cost:.2}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Top-level error for building and running simulations
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    InvalidDistribution(DistributionError),
    Configuration(ConfigError),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidDistribution(e) => write!(f, "invalid distribution: {e}"),
            SimError::Configuration(e) => write!(f, "configuration error: {e}"),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::InvalidDistribution(e) => Some(e),
            SimError::Configuration(e) => Some(e),
        }
    }
}

impl From<DistributionError> for SimError {
    fn from(err: DistributionError) -> Self {
        SimError::InvalidDistribution(err)
    }
}

impl From<ConfigError> for SimError {
    fn from(err: ConfigError) -> Self {
        SimError::Configuration(err)
    }
}

pub type Result<T> = std::result::Result<T, SimError>;

/// Largest number of steps a single run may take
pub const MAX_STEPS: u32 = 1_000_000;

/// Reject negative or non-finite amounts
pub(crate) fn check_amount(field: &'static str, value: f64) -> std::result::Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFiniteAmount { field });
    }
    if value < 0.0 {
        return Err(ConfigError::NegativeAmount { field, value });
    }
    Ok(())
}

pub(crate) fn check_count(field: &'static str, count: u32) -> std::result::Result<(), ConfigError> {
    if count == 0 {
        return Err(ConfigError::NonPositiveCount { field });
    }
    Ok(())
}

/// A count that drives the number of steps in a run
pub(crate) fn check_steps(field: &'static str, count: u32) -> std::result::Result<(), ConfigError> {
    check_count(field, count)?;
    if count > MAX_STEPS {
        return Err(ConfigError::TooManySteps { field, count });
    }
    Ok(())
}

pub(crate) fn check_fee_rate(rate: f64) -> std::result::Result<(), ConfigError> {
    if !rate.is_finite() || rate <= 0.0 || rate > 1.0 {
        return Err(ConfigError::InvalidFeeRate(rate));
    }
    Ok(())
}
