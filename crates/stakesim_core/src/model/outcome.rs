//! Outcome tables
//!
//! An `OutcomeTable` groups named outcomes into tiers and carries the
//! probabilities needed to draw from them. Tables come in two shapes:
//! - tiered: each tier has a probability, outcomes within a tier are equally likely
//! - per-outcome: every outcome has its own probability
//!
//! Both shapes expose a tier distribution and a per-outcome distribution, so
//! either sampling strategy can run against either table.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use super::distribution::Distribution;
use crate::error::{ConfigError, Result, check_amount};

/// One possible result of a draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub name: String,
    pub value: f64,
    pub tier: String,
}

/// Named outcomes of a single tier, as `(name, value)` pairs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierPool {
    pub tier: String,
    pub outcomes: Vec<(String, f64)>,
}

impl TierPool {
    pub fn new<S: Into<String>>(tier: S, outcomes: &[(&str, f64)]) -> Self {
        Self {
            tier: tier.into(),
            outcomes: outcomes
                .iter()
                .map(|(name, value)| ((*name).to_string(), *value))
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
struct TierSpan {
    name: String,
    start: usize,
    end: usize,
}

#[derive(Debug, Clone)]
pub struct OutcomeTable {
    /// Outcomes stored contiguously per tier, tiers in distribution order
    outcomes: Vec<Outcome>,
    tiers: Vec<TierSpan>,
    tier_distribution: Distribution,
    outcome_distribution: Distribution,
    by_name: FxHashMap<String, usize>,
}

impl OutcomeTable {
    /// Build a table whose tiers carry the probabilities.
    ///
    /// Every tier named in `tier_probabilities` needs a non-empty pool and
    /// every pool needs a probability. Within a tier each outcome has
    /// probability `p(tier) / |tier|`.
    pub fn tiered(pools: Vec<TierPool>, tier_probabilities: Distribution) -> Result<Self> {
        let mut pools_by_tier: FxHashMap<String, Vec<(String, f64)>> = FxHashMap::default();
        for pool in pools {
            if tier_probabilities.probability_of(&pool.tier).is_none() {
                return Err(ConfigError::TierWithoutProbability(pool.tier).into());
            }
            if pool.outcomes.is_empty() {
                return Err(ConfigError::EmptyTier(pool.tier).into());
            }
            pools_by_tier
                .entry(pool.tier)
                .or_default()
                .extend(pool.outcomes);
        }

        let mut outcomes = Vec::new();
        let mut tiers = Vec::with_capacity(tier_probabilities.len());
        let mut derived = Vec::new();

        for (tier, p) in tier_probabilities.entries() {
            let pool = pools_by_tier
                .remove(tier)
                .ok_or_else(|| ConfigError::UnknownTier(tier.clone()))?;
            let start = outcomes.len();
            let share = p / pool.len() as f64;
            for (name, value) in pool {
                derived.push((name.clone(), share));
                outcomes.push(Outcome {
                    name,
                    value,
                    tier: tier.clone(),
                });
            }
            tiers.push(TierSpan {
                name: tier.clone(),
                start,
                end: outcomes.len(),
            });
        }

        let by_name = index_outcomes(&outcomes)?;
        let outcome_distribution = Distribution::new(derived)?;

        Ok(Self {
            outcomes,
            tiers,
            tier_distribution: tier_probabilities,
            outcome_distribution,
            by_name,
        })
    }

    /// Build a single-tier table where every outcome carries its own probability.
    ///
    /// Outcomes are stored in the order of `probabilities`.
    pub fn per_outcome<S: Into<String>>(
        tier: S,
        outcomes: Vec<(String, f64)>,
        probabilities: Distribution,
    ) -> Result<Self> {
        let tier = tier.into();

        let mut values: FxHashMap<String, f64> = FxHashMap::default();
        for (name, value) in outcomes {
            if probabilities.probability_of(&name).is_none() {
                return Err(ConfigError::OutcomeWithoutProbability(name).into());
            }
            if values.insert(name.clone(), value).is_some() {
                return Err(ConfigError::DuplicateOutcome(name).into());
            }
        }

        let mut ordered = Vec::with_capacity(probabilities.len());
        for label in probabilities.labels() {
            let value = *values
                .get(label)
                .ok_or_else(|| ConfigError::UnknownOutcome(label.to_string()))?;
            ordered.push(Outcome {
                name: label.to_string(),
                value,
                tier: tier.clone(),
            });
        }

        let by_name = index_outcomes(&ordered)?;
        let tier_distribution = Distribution::new([(tier.clone(), 1.0)])?;

        Ok(Self {
            tiers: vec![TierSpan {
                name: tier,
                start: 0,
                end: ordered.len(),
            }],
            outcomes: ordered,
            tier_distribution,
            outcome_distribution: probabilities,
            by_name,
        })
    }

    pub fn tier_names(&self) -> impl Iterator<Item = &str> {
        self.tiers.iter().map(|t| t.name.as_str())
    }

    pub fn outcomes_in(&self, tier: &str) -> Option<&[Outcome]> {
        self.tiers
            .iter()
            .find(|t| t.name == tier)
            .map(|t| &self.outcomes[t.start..t.end])
    }

    pub fn outcome(&self, name: &str) -> Option<&Outcome> {
        self.by_name.get(name).map(|&i| &self.outcomes[i])
    }

    pub fn value_of(&self, name: &str) -> Option<f64> {
        self.outcome(name).map(|o| o.value)
    }

    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn tier_distribution(&self) -> &Distribution {
        &self.tier_distribution
    }

    pub fn outcome_distribution(&self) -> &Distribution {
        &self.outcome_distribution
    }

    /// Probability-weighted mean outcome value
    pub fn expected_value(&self) -> f64 {
        self.outcomes
            .iter()
            .zip(self.outcome_distribution.probabilities())
            .map(|(o, p)| o.value * p)
            .sum()
    }

    /// Outcomes of the tier at `index` in tier-distribution order
    pub(crate) fn tier_slice(&self, index: usize) -> &[Outcome] {
        let span = &self.tiers[index];
        &self.outcomes[span.start..span.end]
    }
}

fn index_outcomes(outcomes: &[Outcome]) -> Result<FxHashMap<String, usize>> {
    let mut seen = FxHashSet::default();
    let mut by_name = FxHashMap::default();
    for (i, outcome) in outcomes.iter().enumerate() {
        check_amount("outcome value", outcome.value)?;
        if !seen.insert(outcome.name.as_str()) {
            return Err(ConfigError::DuplicateOutcome(outcome.name.clone()).into());
        }
        by_name.insert(outcome.name.clone(), i);
    }
    Ok(by_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;

    fn two_tier_table() -> OutcomeTable {
        OutcomeTable::tiered(
            vec![
                TierPool::new("B", &[("big", 10.0)]),
                TierPool::new("A", &[("small", 1.0), ("tiny", 0.5)]),
            ],
            Distribution::new([("A", 0.8), ("B", 0.2)]).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_tiers_follow_distribution_order() {
        let table = two_tier_table();
        let tiers: Vec<_> = table.tier_names().collect();
        assert_eq!(tiers, vec!["A", "B"]);
        assert_eq!(table.outcomes_in("A").unwrap().len(), 2);
        assert_eq!(table.outcomes_in("B").unwrap()[0].name, "big");
        assert!(table.outcomes_in("C").is_none());
    }

    #[test]
    fn test_value_lookup() {
        let table = two_tier_table();
        assert_eq!(table.value_of("big"), Some(10.0));
        assert_eq!(table.outcome("tiny").unwrap().tier, "A");
        assert_eq!(table.value_of("missing"), None);
    }

    #[test]
    fn test_derived_outcome_distribution() {
        let table = two_tier_table();
        let dist = table.outcome_distribution();
        assert!((dist.probability_of("small").unwrap() - 0.4).abs() < 1e-12);
        assert!((dist.probability_of("tiny").unwrap() - 0.4).abs() < 1e-12);
        assert!((dist.probability_of("big").unwrap() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_expected_value() {
        let table = two_tier_table();
        let expected = 0.4 * 1.0 + 0.4 * 0.5 + 0.2 * 10.0;
        assert!((table.expected_value() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_tier_without_pool_fails() {
        let err = OutcomeTable::tiered(
            vec![TierPool::new("A", &[("small", 1.0)])],
            Distribution::new([("A", 0.5), ("B", 0.5)]).unwrap(),
        )
        .unwrap_err();
        assert_eq!(err, SimError::Configuration(ConfigError::UnknownTier("B".into())));
    }

    #[test]
    fn test_pool_without_probability_fails() {
        let err = OutcomeTable::tiered(
            vec![
                TierPool::new("A", &[("small", 1.0)]),
                TierPool::new("Z", &[("zed", 1.0)]),
            ],
            Distribution::new([("A", 1.0)]).unwrap(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            SimError::Configuration(ConfigError::TierWithoutProbability("Z".into()))
        );
    }

    #[test]
    fn test_empty_tier_and_bad_values_fail() {
        let err = OutcomeTable::tiered(
            vec![TierPool::new("A", &[])],
            Distribution::new([("A", 1.0)]).unwrap(),
        )
        .unwrap_err();
        assert_eq!(err, SimError::Configuration(ConfigError::EmptyTier("A".into())));

        let err = OutcomeTable::tiered(
            vec![TierPool::new("A", &[("neg", -1.0)])],
            Distribution::new([("A", 1.0)]).unwrap(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SimError::Configuration(ConfigError::NegativeAmount { .. })
        ));
    }

    #[test]
    fn test_duplicate_outcome_across_tiers_fails() {
        let err = OutcomeTable::tiered(
            vec![
                TierPool::new("A", &[("same", 1.0)]),
                TierPool::new("B", &[("same", 2.0)]),
            ],
            Distribution::new([("A", 0.5), ("B", 0.5)]).unwrap(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            SimError::Configuration(ConfigError::DuplicateOutcome("same".into()))
        );
    }

    #[test]
    fn test_per_outcome_table() {
        let table = OutcomeTable::per_outcome(
            "Restricted",
            vec![("x".to_string(), 5.0), ("y".to_string(), 1.0)],
            Distribution::from_weights([("y", 3.0), ("x", 1.0)]).unwrap(),
        )
        .unwrap();

        let names: Vec<_> = table.outcomes().iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["y", "x"]);
        assert_eq!(table.tier_distribution().len(), 1);
        assert!((table.expected_value() - (0.75 * 1.0 + 0.25 * 5.0)).abs() < 1e-12);
    }

    #[test]
    fn test_per_outcome_mismatch_fails() {
        let err = OutcomeTable::per_outcome(
            "T",
            vec![("x".to_string(), 5.0)],
            Distribution::new([("x", 0.5), ("y", 0.5)]).unwrap(),
        )
        .unwrap_err();
        assert_eq!(err, SimError::Configuration(ConfigError::UnknownOutcome("y".into())));

        let err = OutcomeTable::per_outcome(
            "T",
            vec![("x".to_string(), 5.0), ("z".to_string(), 1.0)],
            Distribution::new([("x", 1.0)]).unwrap(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            SimError::Configuration(ConfigError::OutcomeWithoutProbability("z".into()))
        );
    }
}
