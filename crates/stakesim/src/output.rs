//! Plain-text and JSON rendering of runs, batches and presets

use std::io::{self, Write};

use serde::Serialize;
use stakesim_core::config::{Preset, ScenarioConfig};
use stakesim_core::model::{BatchSummary, RunSummary, StepEvent, StepRecord, StepReport};
use stakesim_core::simulation::ScenarioRun;

use crate::format::{format_change, format_money, format_percentage};

/// A finished run together with the config it came from
pub struct RunView<'a> {
    pub title: &'a str,
    pub config: &'a ScenarioConfig,
    pub run: &'a ScenarioRun,
    /// Growth per year, growth scenarios only
    pub period_gains: &'a [f64],
}

#[derive(Serialize)]
struct RunJson<'a> {
    scenario: &'a str,
    summary: &'a RunSummary,
    steps: Vec<StepReport>,
    #[serde(skip_serializing_if = "<[f64]>::is_empty")]
    period_gains: &'a [f64],
}

#[derive(Serialize)]
struct PresetJson {
    name: &'static str,
    kind: &'static str,
    default_seed: Option<u64>,
    description: &'static str,
}

pub fn scenario_kind(config: &ScenarioConfig) -> &'static str {
    match config {
        ScenarioConfig::Consumption(_) => "consumption",
        ScenarioConfig::Growth(_) => "growth",
        ScenarioConfig::RandomWalk(_) => "random_walk",
    }
}

/// Short label and detail column for a step
fn describe(record: &StepRecord) -> (&'static str, String) {
    match &record.event {
        StepEvent::Start => ("start", String::new()),
        StepEvent::Purchase { tier, outcome, .. } => ("purchase", format!("{outcome} [{tier}]")),
        StepEvent::InsufficientFunds { cost } => {
            ("no funds", format!("needs {}", format_money(*cost)))
        }
        StepEvent::Growth {
            interest,
            asset_gains,
            ..
        } => (
            "growth",
            format!(
                "interest {} / assets {}",
                format_money(*interest),
                format_money(*asset_gains)
            ),
        ),
        StepEvent::PriceMove { delta, price } => (
            "price",
            format!("{:+.4} -> {}", delta, format_money(*price)),
        ),
        StepEvent::Sale { price, gross, .. } => (
            "sale",
            format!("at {} for {}", format_money(*price), format_money(*gross)),
        ),
    }
}

fn optional_money(value: Option<f64>) -> String {
    value.map(format_money).unwrap_or_default()
}

pub fn write_run_table<W: Write>(out: &mut W, view: &RunView<'_>) -> io::Result<()> {
    writeln!(out, "{} ({})", view.title, scenario_kind(view.config))?;
    writeln!(
        out,
        "{:>5}  {:<9} {:<44} {:>10} {:>9} {:>10} {:>12}",
        "step", "event", "detail", "value", "fee", "profit", "balance"
    )?;

    for record in view.run.history.history() {
        let (label, detail) = describe(record);
        let report = record.report();
        writeln!(
            out,
            "{:>5}  {:<9} {:<44} {:>10} {:>9} {:>10} {:>12}",
            report.step,
            label,
            detail,
            optional_money(report.outcome_value),
            optional_money(report.fee),
            report.profit.map(format_change).unwrap_or_default(),
            format_money(report.balance),
        )?;
    }

    writeln!(out)?;
    write_summary(out, view)
}

fn write_summary<W: Write>(out: &mut W, view: &RunView<'_>) -> io::Result<()> {
    let summary = &view.run.summary;
    writeln!(out, "{:<22}{}", "Starting balance", format_money(summary.starting_balance))?;
    writeln!(out, "{:<22}{}", "Final balance", format_money(summary.final_balance))?;
    writeln!(out, "{:<22}{}", "Net result", format_change(summary.net_result))?;
    writeln!(out, "{:<22}{}", "Fees paid", format_money(summary.total_fees))?;

    match view.config {
        ScenarioConfig::Consumption(config) => {
            writeln!(out, "{:<22}{}", "Purchases", summary.purchases)?;
            let expected = config.table.expected_value() * config.fee_rate;
            writeln!(
                out,
                "{:<22}{} per {} attempt",
                "Expected return",
                format_money(expected),
                format_money(config.cost)
            )?;
            if let Some(step) = summary.insufficient_funds_at {
                writeln!(out, "{:<22}step {}", "Ran out of funds", step)?;
            }
        }
        ScenarioConfig::RandomWalk(config) => {
            writeln!(
                out,
                "{:<22}{}",
                "Break-even price",
                format_money(config.break_even_price())
            )?;
            writeln!(
                out,
                "{:<22}{}",
                "Leftover cash",
                format_money(config.leftover_cash())
            )?;
        }
        ScenarioConfig::Growth(_) => {
            for (year, gain) in view.period_gains.iter().enumerate() {
                writeln!(out, "{:<22}{}", format!("Year {}", year + 1), format_change(*gain))?;
            }
        }
    }
    Ok(())
}

pub fn write_run_json<W: Write>(out: &mut W, view: &RunView<'_>) -> serde_json::Result<()> {
    let json = RunJson {
        scenario: view.title,
        summary: &view.run.summary,
        steps: view.run.history.reports().collect(),
        period_gains: view.period_gains,
    };
    serde_json::to_writer_pretty(&mut *out, &json)?;
    writeln!(out).map_err(serde_json::Error::io)
}

pub fn write_batch_table<W: Write>(
    out: &mut W,
    title: &str,
    batch: &BatchSummary,
) -> io::Result<()> {
    writeln!(out, "{title}: {} runs from seed {}", batch.runs, batch.base_seed)?;
    writeln!(out, "{:<22}{}", "Mean final balance", format_money(batch.mean_final_balance))?;
    writeln!(out, "{:<22}{}", "Min final balance", format_money(batch.min_final_balance))?;
    writeln!(out, "{:<22}{}", "P5", format_money(batch.percentiles.p5))?;
    writeln!(out, "{:<22}{}", "P50", format_money(batch.percentiles.p50))?;
    writeln!(out, "{:<22}{}", "P95", format_money(batch.percentiles.p95))?;
    writeln!(out, "{:<22}{}", "Max final balance", format_money(batch.max_final_balance))?;
    writeln!(out, "{:<22}{}", "Profitable runs", format_percentage(batch.profitable_share))?;
    writeln!(
        out,
        "{:<22}{}",
        "Ran out of funds",
        format_percentage(batch.insufficient_funds_share)
    )
}

pub fn write_batch_json<W: Write>(out: &mut W, batch: &BatchSummary) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(&mut *out, batch)?;
    writeln!(out).map_err(serde_json::Error::io)
}

pub fn write_presets_table<W: Write>(
    out: &mut W,
    presets: &[(Preset, &ScenarioConfig)],
) -> io::Result<()> {
    for (preset, config) in presets {
        let seed = preset
            .default_seed()
            .map(|s| format!("seed {s}"))
            .unwrap_or_else(|| "no seed".to_string());
        writeln!(
            out,
            "{:<12} {:<12} {:<8} {}",
            preset.name(),
            scenario_kind(config),
            seed,
            preset.description()
        )?;
    }
    Ok(())
}

pub fn write_presets_json<W: Write>(
    out: &mut W,
    presets: &[(Preset, &ScenarioConfig)],
) -> serde_json::Result<()> {
    let rows: Vec<PresetJson> = presets
        .iter()
        .map(|(preset, config)| PresetJson {
            name: preset.name(),
            kind: scenario_kind(config),
            default_seed: preset.default_seed(),
            description: preset.description(),
        })
        .collect();
    serde_json::to_writer_pretty(&mut *out, &rows)?;
    writeln!(out).map_err(serde_json::Error::io)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stakesim_core::simulation::run_scenario;

    fn render(preset: Preset) -> String {
        let config = preset.config().unwrap();
        let run = run_scenario(&config).unwrap();
        let view = RunView {
            title: preset.name(),
            config: &config,
            run: &run,
            period_gains: &[],
        };
        let mut out = Vec::new();
        write_run_table(&mut out, &view).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_run_table_has_a_row_per_step() {
        let text = render(Preset::TradeUp);
        assert!(text.starts_with("trade-up (consumption)"));
        let rows = text.lines().filter(|l| l.contains("purchase") || l.contains("no funds"));
        assert_eq!(rows.count(), 52);
        assert!(text.contains("Expected return"));
    }

    #[test]
    fn test_random_walk_summary_shows_break_even() {
        let text = render(Preset::Flipper);
        assert!(text.contains("Break-even price      $3.18"));
        assert!(text.contains("Leftover cash         $0.20"));
        assert_eq!(text.lines().filter(|l| l.contains(" sale ")).count(), 1);
    }

    #[test]
    fn test_run_json_shape() {
        let config = Preset::SmartInvestor.config().unwrap();
        let run = run_scenario(&config).unwrap();
        let gains = [1.0, 2.0, 3.0];
        let view = RunView {
            title: "investor",
            config: &config,
            run: &run,
            period_gains: &gains,
        };

        let mut out = Vec::new();
        write_run_json(&mut out, &view).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(json["scenario"], "investor");
        assert_eq!(json["steps"].as_array().unwrap().len(), 157);
        assert_eq!(json["period_gains"].as_array().unwrap().len(), 3);
        assert_eq!(json["summary"]["steps"], 156);
    }

    #[test]
    fn test_presets_table_lists_every_preset() {
        let configs: Vec<ScenarioConfig> =
            Preset::ALL.iter().map(|p| p.config().unwrap()).collect();
        let rows: Vec<(Preset, &ScenarioConfig)> =
            Preset::ALL.into_iter().zip(configs.iter()).collect();

        let mut out = Vec::new();
        write_presets_table(&mut out, &rows).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 4);
        assert!(text.contains("investor     growth       no seed"));
    }
}
