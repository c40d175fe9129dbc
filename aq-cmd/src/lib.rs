//! Command implementations for the AQ CLI.
//!
//! Provides subcommands for turning daily baselines into an hourly dataset
//! and for projecting a 24-hour forecast for one city.

use clap::Subcommand;

pub mod forecast;
pub mod synthesize;

#[derive(Subcommand)]
pub enum Command {
    /// Synthesize hourly AQI/PM2.5 series from daily baselines
    Synthesize {
        /// Input CSV of daily baselines (city,date,province,aqi,pm25,main_pollutant)
        #[arg(short = 'i', long)]
        input: String,

        /// Output path for the hourly dataset CSV
        #[arg(short = 'o', long)]
        output: String,

        /// Drop rows with missing or invalid values instead of failing
        #[arg(long)]
        skip_invalid: bool,

        /// JSON file overriding synthesis parameters
        #[arg(short = 'c', long)]
        config: Option<String>,
    },

    /// Forecast the next 24 hours for one city
    Forecast(forecast::ForecastArgs),
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Synthesize {
            input,
            output,
            skip_invalid,
            config,
        } => synthesize::run_synthesize(&input, &output, skip_invalid, config.as_deref()),
        Command::Forecast(args) => forecast::run_forecast(&args),
    }
}
