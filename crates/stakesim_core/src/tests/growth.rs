//! Tests for deterministic growth runs

use crate::config::{GrowthConfig, presets};
use crate::model::StepEvent;
use crate::simulation::{GrowthPoint, GrowthSimulator, Simulator};
use crate::simulation_state::SimulationStatus;

fn weekly_year() -> GrowthConfig {
    GrowthConfig::new(200.0)
        .deposit(0.50)
        .annual_rate(0.15)
        .periods(52, 52)
}

#[test]
fn test_one_year_of_weekly_deposits() {
    let mut sim = GrowthSimulator::new(weekly_year()).unwrap();
    let summary = sim.run();

    assert_eq!(summary.steps, 52);
    assert_eq!(summary.status, SimulationStatus::Completed);

    let last = sim.current();
    assert_eq!(last.total_deposits, 26.0);
    assert!(last.total_interest > 0.0);
    // Weekly compounding at 15% APY lands a little under 15% of the average balance
    assert!(last.total_interest > 30.0 && last.total_interest < 34.0);
    assert_eq!(summary.final_balance, 226.0 + last.total_interest);
}

#[test]
fn test_reruns_are_bit_identical() {
    let balances = |config: GrowthConfig| -> Vec<u64> {
        let mut sim = GrowthSimulator::new(config).unwrap();
        sim.run();
        sim.history().iter().map(|r| r.balance.to_bits()).collect()
    };
    assert_eq!(balances(weekly_year()), balances(weekly_year()));
    assert_eq!(
        balances(presets::smart_investor()),
        balances(presets::smart_investor())
    );
}

#[test]
fn test_step_from_stored_state_matches_sequential_run() {
    let config = presets::smart_investor();
    let mut sim = GrowthSimulator::new(config).unwrap();
    sim.run();

    let history = sim.history();
    for pair in history.windows(2) {
        let prev = GrowthPoint::from_record(&config, &pair[0]).unwrap();
        let next = GrowthSimulator::advance(&config, &prev);
        assert_eq!(next.period, pair[1].step);
        assert_eq!(next.total_value(&config).to_bits(), pair[1].balance.to_bits());
    }
}

#[test]
fn test_value_at_matches_history() {
    let config = presets::smart_investor();
    let mut sim = GrowthSimulator::new(config).unwrap();
    sim.run();

    for k in [0, 1, 52, 100, 156] {
        assert_eq!(
            GrowthSimulator::value_at(&config, k),
            sim.history()[k as usize].balance
        );
    }
}

#[test]
fn test_values_never_decrease() {
    let mut sim = GrowthSimulator::new(presets::smart_investor()).unwrap();
    sim.run();

    for pair in sim.history().windows(2) {
        assert!(pair[1].balance >= pair[0].balance);
    }
}

#[test]
fn test_appreciation_reaches_full_rate_at_final_period() {
    let config = presets::smart_investor();
    let start = GrowthSimulator::point_at(&config, 0);
    assert_eq!(start.asset_gains, 0.0);

    let end = GrowthSimulator::point_at(&config, config.total_periods);
    let base = end.with_interest(&config);
    assert!((end.asset_gains - base * 0.30).abs() < 1e-9);
    assert_eq!(end.total_deposits, 78.0);
}

#[test]
fn test_zero_rates_only_accumulate_deposits() {
    let config = GrowthConfig::new(100.0).deposit(0.5).periods(12, 24);
    for k in 0..=24 {
        assert_eq!(GrowthSimulator::value_at(&config, k), 100.0 + 0.5 * f64::from(k));
    }
}

#[test]
fn test_growth_events_carry_running_totals() {
    let config = weekly_year();
    let mut sim = GrowthSimulator::new(config).unwrap();
    sim.run();

    let mut interest_sum = 0.0;
    for record in &sim.history()[1..] {
        match record.event {
            StepEvent::Growth {
                deposit,
                interest,
                total_interest,
                ..
            } => {
                assert_eq!(deposit, 0.5);
                interest_sum += interest;
                assert_eq!(total_interest, interest_sum);
            }
            ref other => panic!("unexpected event {other:?}"),
        }
    }
}

#[test]
fn test_yearly_gains_for_three_year_run() {
    let config = presets::smart_investor();
    let mut sim = GrowthSimulator::new(config).unwrap();
    let summary = sim.run();

    let gains = sim.period_gains(52);
    assert_eq!(gains.len(), 3);
    assert!(gains.iter().all(|g| *g > 0.0));

    let history = sim.history();
    assert_eq!(gains[0], history[52].balance - history[0].balance);
    let total: f64 = gains.iter().sum();
    assert!((total - summary.net_result).abs() < 1e-9);
}

#[test]
fn test_partial_block_is_included() {
    let mut sim = GrowthSimulator::new(GrowthConfig::new(10.0).deposit(1.0).periods(52, 10)).unwrap();
    sim.run();
    assert_eq!(sim.period_gains(4), vec![4.0, 4.0, 2.0]);
    assert!(sim.period_gains(0).is_empty());
}

#[test]
fn test_points_rebuild_every_period() {
    let config = weekly_year();
    let mut sim = GrowthSimulator::new(config).unwrap();
    sim.run();

    let points = sim.points();
    assert_eq!(points.len(), 53);
    assert_eq!(points[0], GrowthPoint::initial(&config));
    assert_eq!(points[52], *sim.current());
}

#[test]
fn test_negative_rate_rejected() {
    assert!(GrowthSimulator::new(GrowthConfig::new(100.0).annual_rate(-0.1)).is_err());
}
