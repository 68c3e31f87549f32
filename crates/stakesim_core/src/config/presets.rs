//! Built-in scenarios
//!
//! The four built-in scenarios and their constants.

use serde::{Deserialize, Serialize};

use super::{ConsumptionConfig, GrowthConfig, RandomWalkConfig, ScenarioConfig};
use crate::error::Result;
use crate::model::{Distribution, OutcomeTable, TierPool};
use crate::sampler::SamplingStrategy;

/// Marketplace fee multiplier: 85% of the sale value is kept
pub const MARKET_FEE_RATE: f64 = 0.85;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    /// 52 weekly openings of the Fever case
    FeverCase,
    /// 52 trade-up contracts, outcomes sold with the market fee
    TradeUp,
    /// 74 units bought, held 90 days, sold with the market fee
    Flipper,
    /// Three years of weekly deposits into a yield-bearing position
    #[serde(rename = "investor")]
    SmartInvestor,
}

impl Preset {
    pub const ALL: [Preset; 4] = [
        Preset::FeverCase,
        Preset::TradeUp,
        Preset::Flipper,
        Preset::SmartInvestor,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Preset::FeverCase => "fever-case",
            Preset::TradeUp => "trade-up",
            Preset::Flipper => "flipper",
            Preset::SmartInvestor => "investor",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Preset::FeverCase => "Open one Fever case per week for 52 weeks",
            Preset::TradeUp => "52 trade-up contracts with a 15% market fee",
            Preset::Flipper => "Buy 74 AK-47 | Slate, hold 90 days, sell with fees",
            Preset::SmartInvestor => "Weekly deposits at 15% APY plus asset growth, 3 years",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Seed used when none is given
    pub fn default_seed(self) -> Option<u64> {
        match self {
            Preset::FeverCase | Preset::TradeUp => Some(42),
            Preset::Flipper => Some(5),
            Preset::SmartInvestor => None,
        }
    }

    pub fn config(self) -> Result<ScenarioConfig> {
        Ok(match self {
            Preset::FeverCase => ScenarioConfig::Consumption(fever_case()?),
            Preset::TradeUp => ScenarioConfig::Consumption(trade_up()?),
            Preset::Flipper => ScenarioConfig::RandomWalk(flipper()),
            Preset::SmartInvestor => ScenarioConfig::Growth(smart_investor()),
        })
    }
}

/// Drop table of the Fever case; `ST_` tiers are the StatTrak variants
pub fn fever_case_table() -> Result<OutcomeTable> {
    let pools = vec![
        TierPool::new(
            "Blue",
            &[
                ("M4A4 | Choppa", 0.10),
                ("MP7 | Nexus", 0.12),
                ("MAC-10 | Resupply", 0.08),
                ("P2000 | Sure Grip", 0.09),
                ("SG 553 | Mockingbird", 0.11),
            ],
        ),
        TierPool::new(
            "ST_Blue",
            &[
                ("ST M4A4 | Choppa", 0.30),
                ("ST MP7 | Nexus", 0.35),
                ("ST MAC-10 | Resupply", 0.25),
                ("ST P2000 | Sure Grip", 0.28),
                ("ST SG 553 | Mockingbird", 0.32),
            ],
        ),
        TierPool::new(
            "Purple",
            &[
                ("Nova | Rising Sun", 0.50),
                ("P90 | Wave Breaker", 0.55),
                ("FAMAS | Bad Trip", 0.45),
                ("Galil AR | Control", 0.60),
                ("USP-S | PC-GRN", 0.40),
            ],
        ),
        TierPool::new(
            "ST_Purple",
            &[
                ("ST Nova | Rising Sun", 1.50),
                ("ST P90 | Wave Breaker", 1.60),
                ("ST FAMAS | Bad Trip", 1.40),
                ("ST Galil AR | Control", 1.75),
                ("ST USP-S | PC-GRN", 1.20),
            ],
        ),
        TierPool::new(
            "Pink",
            &[
                ("Desert Eagle | Serpent Strike", 3.00),
                ("UMP-45 | K.O. Factory", 2.20),
                ("Glock-18 | Shinobu", 2.50),
            ],
        ),
        TierPool::new(
            "ST_Pink",
            &[
                ("ST Desert Eagle | Serpent Strike", 7.00),
                ("ST UMP-45 | K.O. Factory", 5.50),
                ("ST Glock-18 | Shinobu", 6.00),
            ],
        ),
        TierPool::new(
            "Red",
            &[("AK-47 | Searing Rage", 12.00), ("AWP | Printstream", 75.00)],
        ),
        TierPool::new(
            "ST_Red",
            &[
                ("ST AK-47 | Searing Rage", 30.00),
                ("ST AWP | Printstream", 200.00),
            ],
        ),
        TierPool::new(
            "Gold",
            &[
                ("Navaja Knife | Slaughter", 280.00),
                ("Stiletto Knife | Case Hardened", 350.00),
                ("Ursus Knife | Doppler", 400.00),
                ("Talon Knife | Tiger Tooth", 500.00),
            ],
        ),
    ];

    let probabilities = Distribution::new([
        ("Blue", 0.71928),
        ("ST_Blue", 0.07992),
        ("Purple", 0.14382),
        ("ST_Purple", 0.01598),
        ("Pink", 0.0288),
        ("ST_Pink", 0.0032),
        ("Red", 0.00576),
        ("ST_Red", 0.00064),
        ("Gold", 0.0026),
    ])?;

    OutcomeTable::tiered(pools, probabilities)
}

pub fn fever_case() -> Result<ConsumptionConfig> {
    Ok(
        ConsumptionConfig::new(fever_case_table()?, SamplingStrategy::Tiered)
            .starting_balance(200.00)
            .cost(3.48)
            .attempts(52)
            .seed(42),
    )
}

/// Trade-up contract outcomes, weighted by their raw odds in percent
pub fn trade_up_table() -> Result<OutcomeTable> {
    let outcomes: [(&str, f64, f64); 9] = [
        ("Galil AR | Stone Cold", 15.11, 13.64),
        ("M249 | Nebula Crusader", 9.05, 13.64),
        ("P250 | Wingshot", 7.40, 13.64),
        ("MP7 | Special Delivery", 7.40, 9.09),
        ("USP-S | Ticket to Hell", 1.89, 9.09),
        ("M4A1-S | Night Terror", 1.99, 9.09),
        ("G3SG1 | Dream Glade", 2.11, 9.09),
        ("PP-Bizon | Space Cat", 1.61, 9.09),
        ("XM1014 | Zombie Offensive", 1.58, 9.09),
    ];

    let weights = Distribution::from_weights(outcomes.iter().map(|(name, _, w)| (*name, *w)))?;
    let values = outcomes
        .iter()
        .map(|(name, value, _)| ((*name).to_string(), *value))
        .collect();

    OutcomeTable::per_outcome("Trade-Up", values, weights)
}

pub fn trade_up() -> Result<ConsumptionConfig> {
    Ok(
        ConsumptionConfig::new(trade_up_table()?, SamplingStrategy::Direct)
            .starting_balance(200.00)
            .cost(4.33)
            .attempts(52)
            .fee_rate(MARKET_FEE_RATE)
            .seed(42),
    )
}

pub fn flipper() -> RandomWalkConfig {
    RandomWalkConfig::new(200.00, 2.70, 74)
        .days(90)
        .delta_range(-0.05, 0.065)
        .fee_rate(MARKET_FEE_RATE)
        .seed(5)
}

pub fn smart_investor() -> GrowthConfig {
    GrowthConfig::new(200.00)
        .deposit(0.50)
        .annual_rate(0.15)
        .appreciation(0.30)
        .periods(52, 156)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_presets_build_and_validate() {
        for preset in Preset::ALL {
            let config = preset.config().unwrap();
            config.validate().unwrap();
            assert_eq!(config.seed(), preset.default_seed());
        }
    }

    #[test]
    fn test_preset_names_round_trip() {
        for preset in Preset::ALL {
            assert_eq!(Preset::from_name(preset.name()), Some(preset));
        }
        assert_eq!(Preset::from_name("lottery"), None);
    }

    #[test]
    fn test_serialized_name_matches_cli_name() {
        for preset in Preset::ALL {
            assert_eq!(serde_json::to_value(preset).unwrap(), preset.name());
        }
    }

    #[test]
    fn test_fever_case_table_shape() {
        let table = fever_case_table().unwrap();
        assert_eq!(table.tier_names().count(), 9);
        assert_eq!(table.outcomes().len(), 36);
        assert_eq!(table.value_of("ST AWP | Printstream"), Some(200.00));
        // Expected value per case is below the 3.48 price
        assert!(table.expected_value() < 3.48);
    }

    #[test]
    fn test_trade_up_table_normalized() {
        let table = trade_up_table().unwrap();
        let dist = table.outcome_distribution();
        assert!((dist.total() - 1.0).abs() < 1e-12);
        let top = dist.probability_of("Galil AR | Stone Cold").unwrap();
        assert!((top - 13.64 / 95.46).abs() < 1e-9);
    }
}
