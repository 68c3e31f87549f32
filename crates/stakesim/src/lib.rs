//! Command-line front end for the stakesim simulations
//!
//! Runs the built-in scenarios or YAML scenario files step by step, prints
//! every step as a table or JSON, and summarizes seeded batches.

pub mod cli;
pub mod commands;
pub mod format;
pub mod logging;
pub mod output;
pub mod scenario_file;

pub use cli::{Args, Command, OutputFormat};
pub use commands::execute;
pub use logging::init_logging;
