use std::io::Write;

use clap::Parser;
use stakesim::{Args, execute, init_logging};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_logging(args.log_dir.as_deref(), &args.log_level)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execute(&args.command, &mut out)?;
    out.flush()?;

    Ok(())
}
