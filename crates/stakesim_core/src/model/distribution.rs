//! Validated discrete probability distributions
//!
//! A `Distribution` is an ordered list of `(label, probability)` pairs whose
//! probabilities are non-negative and sum to 1. Order is preserved; samplers
//! index into it.

use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::error::DistributionError;

/// Allowed deviation of the probability sum from 1
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    entries: Vec<(String, f64)>,
}

impl Distribution {
    /// Build from probabilities that must already sum to 1
    pub fn new<I, S>(entries: I) -> Result<Self, DistributionError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let entries: Vec<(String, f64)> = entries
            .into_iter()
            .map(|(label, p)| (label.into(), p))
            .collect();
        validate_entries(&entries)?;

        let sum: f64 = entries.iter().map(|(_, p)| p).sum();
        if (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(DistributionError::NotNormalized { sum });
        }

        Ok(Self { entries })
    }

    /// Build from raw non-negative weights, normalizing them to sum to 1
    pub fn from_weights<I, S>(weights: I) -> Result<Self, DistributionError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let weights: Vec<(String, f64)> = weights
            .into_iter()
            .map(|(label, w)| (label.into(), w))
            .collect();
        validate_entries(&weights)?;

        let total: f64 = weights.iter().map(|(_, w)| w).sum();
        if total <= 0.0 {
            return Err(DistributionError::ZeroTotalWeight);
        }

        Ok(Self {
            entries: weights.into_iter().map(|(l, w)| (l, w / total)).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(label, _)| label.as_str())
    }

    pub fn probabilities(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|(_, p)| *p)
    }

    pub fn entries(&self) -> &[(String, f64)] {
        &self.entries
    }

    pub fn probability_of(&self, label: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, p)| *p)
    }

    pub fn total(&self) -> f64 {
        self.probabilities().sum()
    }
}

fn validate_entries(entries: &[(String, f64)]) -> Result<(), DistributionError> {
    if entries.is_empty() {
        return Err(DistributionError::Empty);
    }

    let mut seen = FxHashSet::default();
    for (label, p) in entries {
        if label.is_empty() {
            return Err(DistributionError::EmptyLabel);
        }
        if !seen.insert(label.as_str()) {
            return Err(DistributionError::DuplicateLabel(label.clone()));
        }
        if !p.is_finite() {
            return Err(DistributionError::NonFiniteProbability {
                label: label.clone(),
            });
        }
        if *p < 0.0 {
            return Err(DistributionError::NegativeProbability {
                label: label.clone(),
                probability: *p,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_sum_within_tolerance() {
        let dist = Distribution::new([("a", 0.5), ("b", 0.5 + 5e-7)]).unwrap();
        assert_eq!(dist.len(), 2);
        assert!((dist.total() - 1.0).abs() <= PROBABILITY_TOLERANCE);
    }

    #[test]
    fn test_rejects_sum_outside_tolerance() {
        let err = Distribution::new([("a", 0.5), ("b", 0.49)]).unwrap_err();
        assert!(matches!(err, DistributionError::NotNormalized { .. }));

        let err = Distribution::new([("a", 0.5), ("b", 0.5 + 1e-5)]).unwrap_err();
        assert!(matches!(err, DistributionError::NotNormalized { .. }));
    }

    #[test]
    fn test_rejects_negative_probability() {
        let err = Distribution::new([("a", 1.2), ("b", -0.2)]).unwrap_err();
        assert_eq!(
            err,
            DistributionError::NegativeProbability {
                label: "b".to_string(),
                probability: -0.2
            }
        );
    }

    #[test]
    fn test_rejects_malformed_entries() {
        let empty: [(&str, f64); 0] = [];
        assert_eq!(Distribution::new(empty).unwrap_err(), DistributionError::Empty);
        assert_eq!(
            Distribution::new([("a", 0.5), ("a", 0.5)]).unwrap_err(),
            DistributionError::DuplicateLabel("a".to_string())
        );
        assert!(matches!(
            Distribution::new([("a", f64::NAN)]).unwrap_err(),
            DistributionError::NonFiniteProbability { .. }
        ));
        assert_eq!(
            Distribution::new([("", 1.0)]).unwrap_err(),
            DistributionError::EmptyLabel
        );
    }

    #[test]
    fn test_from_weights_normalizes() {
        let dist = Distribution::from_weights([("x", 13.64), ("y", 9.09), ("z", 9.09)]).unwrap();
        assert!((dist.total() - 1.0).abs() < 1e-12);
        let px = dist.probability_of("x").unwrap();
        assert!((px - 13.64 / 31.82).abs() < 1e-12);
    }

    #[test]
    fn test_from_weights_rejects_zero_total() {
        assert_eq!(
            Distribution::from_weights([("x", 0.0), ("y", 0.0)]).unwrap_err(),
            DistributionError::ZeroTotalWeight
        );
    }

    #[test]
    fn test_order_is_preserved() {
        let dist = Distribution::new([("c", 0.2), ("a", 0.3), ("b", 0.5)]).unwrap();
        let labels: Vec<_> = dist.labels().collect();
        assert_eq!(labels, vec!["c", "a", "b"]);
    }
}
