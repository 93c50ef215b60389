use anyhow::Result;
use clap::Parser;
use tracecluster_cli::{run, Cli};

fn main() -> Result<()> {
    tracecluster_core::tracing::init_tracing();
    let cli = Cli::parse();
    run(&cli)?;
    Ok(())
}
