//! Subcommand handlers
//!
//! Handlers write to any `io::Write` so they can be driven from tests.

use std::io::Write;
use std::path::Path;

use color_eyre::eyre::eyre;
use stakesim_core::config::{Preset, ScenarioConfig};
use stakesim_core::monte_carlo::run_batch;
use stakesim_core::simulation::{GrowthSimulator, ScenarioRun, Simulator, run_scenario};

use crate::cli::{Command, OutputFormat, ScenarioArgs};
use crate::output::{self, RunView};
use crate::scenario_file;

/// Execute a parsed subcommand
pub fn execute<W: Write>(command: &Command, out: &mut W) -> color_eyre::Result<()> {
    match command {
        Command::Run {
            scenario,
            seed,
            format,
        } => run(out, scenario, *seed, *format),
        Command::Batch {
            scenario,
            runs,
            seed,
            format,
        } => batch(out, scenario, *runs, *seed, *format),
        Command::Presets { format } => list_presets(out, *format),
        Command::Export { preset } => export(out, *preset),
    }
}

/// Resolve the scenario and a display name for it
fn resolve(args: &ScenarioArgs) -> color_eyre::Result<(String, ScenarioConfig)> {
    match (&args.preset, &args.config) {
        (_, Some(path)) => Ok((scenario_title(path), scenario_file::load(path)?)),
        (Some(preset), None) => Ok((preset.name().to_string(), preset.config()?)),
        (None, None) => Err(eyre!("a preset or --config file is required")),
    }
}

fn scenario_title(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Run to completion; growth runs also report gains per year
fn run_to_completion(config: &ScenarioConfig) -> color_eyre::Result<(ScenarioRun, Vec<f64>)> {
    match config {
        ScenarioConfig::Growth(growth) => {
            let mut simulator = GrowthSimulator::new(*growth)?;
            let summary = simulator.run();
            let gains = simulator.period_gains(growth.periods_per_year);
            let run = ScenarioRun {
                summary,
                history: simulator.state().history.clone(),
            };
            Ok((run, gains))
        }
        _ => Ok((run_scenario(config)?, Vec::new())),
    }
}

fn run<W: Write>(
    out: &mut W,
    args: &ScenarioArgs,
    seed: Option<u64>,
    format: OutputFormat,
) -> color_eyre::Result<()> {
    let (title, mut config) = resolve(args)?;
    if let Some(seed) = seed {
        if !config.is_random() {
            tracing::warn!(scenario = %title, "scenario is deterministic, ignoring --seed");
        }
        config = config.with_seed(seed);
    }
    config.validate()?;

    let (run, period_gains) = run_to_completion(&config)?;
    tracing::info!(
        scenario = %title,
        steps = run.summary.steps,
        final_balance = run.summary.final_balance,
        net_result = run.summary.net_result,
        "run complete"
    );

    let view = RunView {
        title: &title,
        config: &config,
        run: &run,
        period_gains: &period_gains,
    };
    match format {
        OutputFormat::Table => output::write_run_table(out, &view)?,
        OutputFormat::Json => output::write_run_json(out, &view)?,
    }
    Ok(())
}

fn batch<W: Write>(
    out: &mut W,
    args: &ScenarioArgs,
    runs: usize,
    seed: Option<u64>,
    format: OutputFormat,
) -> color_eyre::Result<()> {
    let (title, config) = resolve(args)?;
    let base_seed = seed.or_else(|| config.seed()).unwrap_or_default();
    tracing::info!(scenario = %title, runs, base_seed, "starting batch");

    let summary = run_batch(&config, runs, base_seed)?;
    match format {
        OutputFormat::Table => output::write_batch_table(out, &title, &summary)?,
        OutputFormat::Json => output::write_batch_json(out, &summary)?,
    }
    Ok(())
}

fn list_presets<W: Write>(out: &mut W, format: OutputFormat) -> color_eyre::Result<()> {
    let configs = Preset::ALL
        .iter()
        .map(|p| p.config())
        .collect::<Result<Vec<_>, _>>()?;
    let rows: Vec<(Preset, &ScenarioConfig)> = Preset::ALL.into_iter().zip(&configs).collect();

    match format {
        OutputFormat::Table => output::write_presets_table(out, &rows)?,
        OutputFormat::Json => output::write_presets_json(out, &rows)?,
    }
    Ok(())
}

fn export<W: Write>(out: &mut W, preset: Preset) -> color_eyre::Result<()> {
    let yaml = scenario_file::to_yaml(&preset.config()?)?;
    out.write_all(yaml.as_bytes())?;
    Ok(())
}
