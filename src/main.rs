//! Weather Report - command line entry point

use clap::Parser;
use tracing_subscriber::EnvFilter;
use weather_report::{Cli, PipelineConfig};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = PipelineConfig::from(&cli);
    let mut stdout = std::io::stdout().lock();
    weather_report::run(&config, &mut stdout)?;
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
