use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use stakesim_core::config::Preset;

#[derive(Parser, Debug)]
#[command(name = "stakesim", version)]
#[command(about = "Step-by-step simulations of case openings, trade-ups, flips and savings")]
pub struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,

    /// Write logs to stakesim.log in this directory instead of stderr
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one scenario and print every step
    Run {
        #[command(flatten)]
        scenario: ScenarioArgs,

        /// Override the scenario's seed
        #[arg(long)]
        seed: Option<u64>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Run a scenario many times and summarize the final balances
    Batch {
        #[command(flatten)]
        scenario: ScenarioArgs,

        #[arg(short, long, default_value_t = 1000)]
        runs: usize,

        /// Base seed; defaults to the scenario's own seed
        #[arg(long)]
        seed: Option<u64>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// List the built-in scenarios
    Presets {
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Print a built-in scenario as YAML, ready to edit and pass to --config
    Export {
        #[arg(value_parser = parse_preset)]
        preset: Preset,
    },
}

/// Either a built-in scenario or a YAML scenario file
#[derive(clap::Args, Debug, Clone)]
pub struct ScenarioArgs {
    /// Built-in scenario: fever-case, trade-up, flipper or investor
    #[arg(value_parser = parse_preset, required_unless_present = "config")]
    pub preset: Option<Preset>,

    /// YAML scenario file
    #[arg(short, long, conflicts_with = "preset")]
    pub config: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

pub fn parse_preset(name: &str) -> Result<Preset, String> {
    Preset::from_name(name).ok_or_else(|| {
        let names: Vec<&str> = Preset::ALL.iter().map(|p| p.name()).collect();
        format!("unknown preset '{name}', expected one of: {}", names.join(", "))
    })
}
