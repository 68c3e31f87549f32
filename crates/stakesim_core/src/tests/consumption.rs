//! Tests for pay-per-attempt consumption runs
//!
//! These tests verify that:
//! - Every purchase moves the balance by `value_after_fees - cost`
//! - A balance below the cost freezes the balance but the step still advances
//! - Runs complete after exactly `attempts` steps
//! - Invalid configs are rejected before anything runs

use crate::config::{ConsumptionConfig, presets};
use crate::error::{ConfigError, SimError};
use crate::model::{Distribution, OutcomeTable, StepEvent};
use crate::sampler::SamplingStrategy;
use crate::simulation::{ConsumptionSimulator, Simulator};
use crate::simulation_state::SimulationStatus;

/// Table whose only outcome is worth `value`
fn single_outcome_table(value: f64) -> OutcomeTable {
    OutcomeTable::per_outcome(
        "Only",
        vec![("Thing".to_string(), value)],
        Distribution::new([("Thing", 1.0)]).unwrap(),
    )
    .unwrap()
}

#[test]
fn test_first_step_insufficient_when_balance_below_cost() {
    let config = ConsumptionConfig::new(presets::trade_up_table().unwrap(), SamplingStrategy::Direct)
        .starting_balance(3.00)
        .cost(4.33)
        .attempts(52)
        .fee_rate(0.85)
        .seed(42);
    let mut sim = ConsumptionSimulator::new(&config).unwrap();

    let record = sim.step().unwrap().clone();
    assert_eq!(record.step, 1);
    assert_eq!(record.balance, 3.00);
    assert!(!record.is_purchase());
    assert_eq!(record.event, StepEvent::InsufficientFunds { cost: 4.33 });
    assert_eq!(sim.status(), SimulationStatus::InsufficientFunds);
    assert_eq!(sim.insufficient_funds_at(), Some(1));
}

#[test]
fn test_starved_run_still_advances_to_completion() {
    let config = ConsumptionConfig::new(presets::trade_up_table().unwrap(), SamplingStrategy::Direct)
        .starting_balance(3.00)
        .cost(4.33)
        .attempts(10)
        .seed(42);
    let mut sim = ConsumptionSimulator::new(&config).unwrap();
    let summary = sim.run();

    assert_eq!(summary.steps, 10);
    assert_eq!(summary.status, SimulationStatus::Completed);
    assert_eq!(summary.purchases, 0);
    assert_eq!(summary.final_balance, 3.00);
    assert_eq!(summary.net_result, 0.0);
    assert_eq!(summary.insufficient_funds_at, Some(1));
    assert!(sim.history()[1..].iter().all(|r| r.balance == 3.00));
}

#[test]
fn test_balance_law_holds_for_every_step() {
    let config = presets::trade_up().unwrap();
    let mut sim = ConsumptionSimulator::new(&config).unwrap();
    sim.run();

    for pair in sim.history().windows(2) {
        let (before, after) = (&pair[0], &pair[1]);
        assert_eq!(after.step, before.step + 1);
        match &after.event {
            StepEvent::Purchase {
                value,
                value_after_fees,
                fee,
                cost,
                profit,
                ..
            } => {
                assert_eq!(after.balance, before.balance - cost + value_after_fees);
                assert_eq!(*value_after_fees, value * 0.85);
                assert_eq!(*fee, value - value_after_fees);
                assert_eq!(*profit, value_after_fees - cost);
            }
            StepEvent::InsufficientFunds { .. } => assert_eq!(after.balance, before.balance),
            other => panic!("unexpected event {other:?}"),
        }
    }
}

#[test]
fn test_balance_runs_out_mid_run() {
    // Worthless outcome: 2.5 -> 1.5 -> 0.5, then starved
    let config = ConsumptionConfig::new(single_outcome_table(0.0), SamplingStrategy::Tiered)
        .starting_balance(2.5)
        .cost(1.0)
        .attempts(5)
        .seed(7);
    let mut sim = ConsumptionSimulator::new(&config).unwrap();

    sim.step();
    assert_eq!(sim.status(), SimulationStatus::Running);
    sim.step();
    assert_eq!(sim.state().balance, 0.5);

    let third = sim.step().unwrap();
    assert!(matches!(third.event, StepEvent::InsufficientFunds { .. }));
    assert_eq!(sim.status(), SimulationStatus::InsufficientFunds);

    let summary = sim.run();
    assert_eq!(summary.purchases, 2);
    assert_eq!(summary.steps, 5);
    assert_eq!(summary.final_balance, 0.5);
    assert_eq!(summary.insufficient_funds_at, Some(3));
}

#[test]
fn test_step_after_completion_is_none() {
    let config = ConsumptionConfig::new(single_outcome_table(2.0), SamplingStrategy::Direct)
        .starting_balance(10.0)
        .cost(1.0)
        .attempts(3)
        .seed(1);
    let mut sim = ConsumptionSimulator::new(&config).unwrap();

    let summary = sim.run();
    assert_eq!(summary.status, SimulationStatus::Completed);
    assert_eq!(summary.final_balance, 13.0);
    assert!(sim.step().is_none());
    // Start record plus one per attempt
    assert_eq!(sim.history().len(), 4);
    assert_eq!(sim.state().step, 3);
}

#[test]
fn test_total_fees_sum_purchase_fees() {
    let config = presets::trade_up().unwrap();
    let mut sim = ConsumptionSimulator::new(&config).unwrap();
    let summary = sim.run();

    let fees: f64 = sim.history().iter().filter_map(|r| r.fee()).sum();
    assert_eq!(summary.total_fees, fees);
    assert!(summary.total_fees > 0.0);
}

#[test]
fn test_no_fee_when_rate_is_one() {
    let config = presets::fever_case().unwrap();
    let mut sim = ConsumptionSimulator::new(&config).unwrap();
    let summary = sim.run();

    assert_eq!(summary.total_fees, 0.0);
    for record in sim.history().iter().filter(|r| r.is_purchase()) {
        assert_eq!(record.fee(), Some(0.0));
        assert_eq!(
            record.profit(),
            Some(record.outcome_value().unwrap() - 3.48)
        );
    }
}

#[test]
fn test_outcomes_come_from_the_table() {
    let config = presets::fever_case().unwrap();
    let table = config.table.clone();
    let mut sim = ConsumptionSimulator::new(&config).unwrap();
    sim.run();

    for record in sim.history().iter().filter(|r| r.is_purchase()) {
        let name = record.outcome_name().unwrap();
        assert_eq!(table.value_of(name), record.outcome_value());
    }
    assert_eq!(sim.sampler().strategy(), SamplingStrategy::Tiered);
}

#[test]
fn test_missing_seed_rejected() {
    let config = ConsumptionConfig::new(single_outcome_table(1.0), SamplingStrategy::Direct)
        .starting_balance(10.0)
        .cost(1.0)
        .attempts(3);
    let err = ConsumptionSimulator::new(&config).unwrap_err();
    assert_eq!(err, SimError::Configuration(ConfigError::MissingSeed));
}

#[test]
fn test_zero_attempts_rejected() {
    let config = ConsumptionConfig::new(single_outcome_table(1.0), SamplingStrategy::Direct)
        .starting_balance(10.0)
        .cost(1.0)
        .attempts(0)
        .seed(1);
    let err = ConsumptionSimulator::new(&config).unwrap_err();
    assert_eq!(
        err,
        SimError::Configuration(ConfigError::NonPositiveCount { field: "attempts" })
    );
}

#[test]
fn test_negative_cost_rejected() {
    let config = ConsumptionConfig::new(single_outcome_table(1.0), SamplingStrategy::Direct)
        .starting_balance(10.0)
        .cost(-1.0)
        .seed(1);
    assert!(matches!(
        ConsumptionSimulator::new(&config),
        Err(SimError::Configuration(ConfigError::NegativeAmount { .. }))
    ));
}

#[test]
fn test_unbounded_attempts_rejected() {
    let config = ConsumptionConfig::new(single_outcome_table(1.0), SamplingStrategy::Direct)
        .starting_balance(10.0)
        .cost(1.0)
        .attempts(u32::MAX)
        .seed(1);
    assert!(matches!(
        ConsumptionSimulator::new(&config),
        Err(SimError::Configuration(ConfigError::TooManySteps {
            field: "attempts",
            ..
        }))
    ));
}
