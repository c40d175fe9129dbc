//! Forecast command - project the next 24 hours for one city.
//!
//! The current reading comes from explicit flags, a readings table, or,
//! when neither has the city, the deterministic per-city fallback.

use anyhow::Context;
use aq_core::reading::{CurrentReading, ForecastPoint};
use aq_synth::alert::{scan_forecast, AlertThresholds};
use aq_synth::forecast::ShortHorizonForecaster;
use aq_synth::source::{
    current_or_fallback, CurrentReadingSource, FixedReading, NoReadings, ReadingTable,
};
use aq_utils::dates;
use chrono::{Local, NaiveDateTime};
use clap::Args;
use log::{info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fs::File;
use std::io;

#[derive(Args, Debug, Clone)]
pub struct ForecastArgs {
    /// City to forecast
    #[arg(long)]
    pub city: String,

    /// Current AQI (requires --pm25)
    #[arg(long, requires = "pm25")]
    pub aqi: Option<u32>,

    /// Current PM2.5 (requires --aqi)
    #[arg(long, requires = "aqi")]
    pub pm25: Option<f64>,

    /// CSV of latest readings (city,timestamp,aqi,pm25)
    #[arg(short = 'r', long, conflicts_with = "aqi")]
    pub readings_csv: Option<String>,

    /// Reference time, "YYYY-MM-DD HH:MM[:SS]" (defaults to local now)
    #[arg(long)]
    pub now: Option<String>,

    /// Seed for the forecast's random factors, for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output path for the forecast CSV (defaults to stdout)
    #[arg(short = 'o', long)]
    pub output: Option<String>,

    /// Output path for alerts raised by the forecast
    #[arg(long)]
    pub alerts_csv: Option<String>,

    #[arg(long, default_value_t = AlertThresholds::default().blue)]
    pub blue_threshold: u32,

    #[arg(long, default_value_t = AlertThresholds::default().yellow)]
    pub yellow_threshold: u32,

    #[arg(long, default_value_t = AlertThresholds::default().orange)]
    pub orange_threshold: u32,

    #[arg(long, default_value_t = AlertThresholds::default().red)]
    pub red_threshold: u32,
}

impl ForecastArgs {
    fn thresholds(&self) -> AlertThresholds {
        AlertThresholds {
            blue: self.blue_threshold,
            yellow: self.yellow_threshold,
            orange: self.orange_threshold,
            red: self.red_threshold,
        }
    }

    fn reference_time(&self) -> anyhow::Result<NaiveDateTime> {
        match &self.now {
            Some(s) => Ok(dates::parse_timestamp(s)?),
            None => Ok(Local::now().naive_local()),
        }
    }

    fn reading_source(&self, now: NaiveDateTime) -> anyhow::Result<Box<dyn CurrentReadingSource>> {
        if let (Some(aqi), Some(pm25)) = (self.aqi, self.pm25) {
            if !pm25.is_finite() || pm25 < 0.0 {
                anyhow::bail!("--pm25 must be a non-negative number, got {}", pm25);
            }
            return Ok(Box::new(FixedReading {
                city: self.city.clone(),
                reading: CurrentReading::new(aqi, pm25, now),
            }));
        }
        if let Some(path) = &self.readings_csv {
            let file = File::open(path).with_context(|| format!("Failed to open {}", path))?;
            let table = ReadingTable::from_reader(file)
                .with_context(|| format!("Failed to read current readings from {}", path))?;
            return Ok(Box::new(table));
        }
        Ok(Box::new(NoReadings))
    }
}

/// Run the forecast and write it as `timestamp,aqi,pm25,quality_level`.
pub fn run_forecast(args: &ForecastArgs) -> anyhow::Result<()> {
    let points = forecast_points(args)?;

    let alerts = scan_forecast(&points, &args.thresholds());
    for alert in &alerts {
        warn!(
            "{} alert for {} at {}: AQI {}",
            alert.level,
            args.city,
            dates::format_timestamp(&alert.timestamp),
            alert.aqi
        );
    }

    match &args.output {
        Some(path) => {
            let mut wtr = csv::Writer::from_path(path)
                .with_context(|| format!("Failed to create {}", path))?;
            write_rows(&mut wtr, &points)?;
            info!("Forecast for {} written to {}", args.city, path);
        }
        None => {
            let mut wtr = csv::Writer::from_writer(io::stdout());
            write_rows(&mut wtr, &points)?;
        }
    }

    if let Some(path) = &args.alerts_csv {
        let mut wtr = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create {}", path))?;
        write_rows(&mut wtr, &alerts)?;
        info!("{} alerts written to {}", alerts.len(), path);
    }
    Ok(())
}

/// Resolve the current reading for the city and project it forward.
pub fn forecast_points(args: &ForecastArgs) -> anyhow::Result<Vec<ForecastPoint>> {
    let now = args.reference_time()?;
    let source = args.reading_source(now)?;
    let (reading, origin) = current_or_fallback(source.as_ref(), &args.city, now);
    info!(
        "{:?} reading for {}: AQI {} ({}), PM2.5 {}",
        origin,
        args.city,
        reading.aqi,
        reading.quality_level,
        reading.pm25
    );

    let mut rng = match args.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_rng(&mut rand::rng()),
    };
    // The forecast starts from the reference time even when the reading is older.
    Ok(ShortHorizonForecaster.forecast(reading.aqi, reading.pm25, now, &mut rng))
}

fn write_rows<W: io::Write, T: serde::Serialize>(
    wtr: &mut csv::Writer<W>,
    rows: &[T],
) -> anyhow::Result<()> {
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aq_core::quality::QualityLevel;
    use aq_synth::forecast::fallback_reading;
    use clap::Parser;
    use std::fs;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: ForecastArgs,
    }

    fn parse(argv: &[&str]) -> ForecastArgs {
        let mut full = vec!["test"];
        full.extend_from_slice(argv);
        TestCli::parse_from(full).args
    }

    #[test]
    fn test_explicit_reading_horizon() {
        let args = parse(&[
            "--city",
            "北京",
            "--aqi",
            "100",
            "--pm25",
            "60",
            "--now",
            "2024-01-15 10:00:00",
            "--seed",
            "42",
        ]);
        let points = forecast_points(&args).unwrap();
        assert_eq!(points.len(), 24);
        assert_eq!(dates::format_timestamp(&points[0].timestamp), "2024-01-15 10:00:00");
        assert_eq!(dates::format_timestamp(&points[23].timestamp), "2024-01-16 09:00:00");
        for point in &points {
            assert_eq!(point.quality_level, QualityLevel::classify(f64::from(point.aqi)));
        }
        assert_eq!(points, forecast_points(&args).unwrap());
    }

    #[test]
    fn test_fallback_reading_feeds_forecast() {
        let args = parse(&["--city", "上海", "--now", "2024-01-15 10:00", "--seed", "5"]);
        let points = forecast_points(&args).unwrap();

        let now = dates::parse_timestamp("2024-01-15 10:00").unwrap();
        let reading = fallback_reading("上海", now);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let expected =
            ShortHorizonForecaster.forecast(reading.aqi, reading.pm25, reading.timestamp, &mut rng);
        assert_eq!(points, expected);
    }

    #[test]
    fn test_readings_table_and_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let readings = dir.path().join("now.csv");
        let output = dir.path().join("forecast.csv");
        let alerts = dir.path().join("alerts.csv");
        let table = "city,timestamp,aqi,pm25\n北京,2024-01-15 09:00:00,400,300\n";
        fs::write(&readings, table).unwrap();

        let args = parse(&[
            "--city",
            "北京",
            "-r",
            readings.to_str().unwrap(),
            "--now",
            "2024-01-15 10:30:00",
            "--seed",
            "9",
            "-o",
            output.to_str().unwrap(),
            "--alerts-csv",
            alerts.to_str().unwrap(),
        ]);
        run_forecast(&args).unwrap();

        let forecast = fs::read_to_string(&output).unwrap();
        assert!(forecast.starts_with("timestamp,aqi,pm25,quality_level\n2024-01-15 10:00:00,"));
        assert_eq!(forecast.lines().count(), 25);

        // 400 * the smallest winter factor (0.85 * 1.1 * 0.85) is still above 301.
        let alert_rows = fs::read_to_string(&alerts).unwrap();
        assert_eq!(alert_rows.lines().count(), 25);
        assert!(alert_rows.lines().skip(1).all(|l| l.contains("红色")));
    }

    #[test]
    fn test_aqi_requires_pm25() {
        let result = TestCli::try_parse_from(["test", "--city", "北京", "--aqi", "100"]);
        assert!(result.is_err());
    }
}
