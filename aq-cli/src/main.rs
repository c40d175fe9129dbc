//! AQ CLI - Command line tool for hourly air-quality synthesis and forecasting.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "aq-cli",
    version,
    about = "Air quality hourly synthesis and forecast toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: aq_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    log::debug!("Starting aq-cli {}", env!("CARGO_PKG_VERSION"));
    aq_cmd::run(cli.command)
}
