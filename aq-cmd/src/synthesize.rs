//! Batch synthesis: daily baselines CSV in, hourly dataset CSV out.

use anyhow::Context;
use aq_core::baseline::{read_baselines, InvalidRowPolicy};
use aq_synth::config::SynthesisConfig;
use aq_synth::curve::DailyCurveSynthesizer;
use aq_synth::features::engineer_features;
use aq_synth::summary::RunSummary;
use log::{debug, info};
use std::fs::File;
use std::path::Path;

/// Read daily baselines, synthesize every city's hourly series, derive the
/// feature columns and write the hourly dataset.
pub fn run_synthesize(
    input: &str,
    output: &str,
    skip_invalid: bool,
    config_path: Option<&str>,
) -> anyhow::Result<()> {
    let config = match config_path {
        Some(path) => SynthesisConfig::from_path(Path::new(path))
            .with_context(|| format!("Failed to load synthesis config {}", path))?,
        None => SynthesisConfig::default(),
    };
    let synthesizer = DailyCurveSynthesizer::new(config)?;
    debug!("Synthesis parameters: {:?}", synthesizer.config());

    let policy = if skip_invalid {
        InvalidRowPolicy::Skip
    } else {
        InvalidRowPolicy::Reject
    };
    let file = File::open(input).with_context(|| format!("Failed to open {}", input))?;
    let baselines = read_baselines(file, policy)
        .with_context(|| format!("Failed to read baselines from {}", input))?;
    if baselines.is_empty() {
        anyhow::bail!("{} contains no usable baselines", input);
    }

    info!("Synthesizing hourly series from {} daily baselines", baselines.len());
    let synthesis = synthesizer.synthesize_all(baselines);
    let records = engineer_features(&synthesis.points);

    let mut wtr = csv::Writer::from_path(output)
        .with_context(|| format!("Failed to create {}", output))?;
    for record in &records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;

    RunSummary::from_synthesis(&synthesis).log();
    info!("Synthesis complete. {} rows written to {}", records.len(), output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::run_synthesize;
    use std::fs;

    const BASELINES: &str = "\
rank,province,city,aqi,quality_level,pm25,main_pollutant,date
1,北京,北京,120,轻度污染,80,PM2.5,2024-01-15
2,上海,上海,65,良,40,PM10,2024-01-15
3,北京,北京,98,良,61,PM2.5,2024-01-17
4,上海,上海,70,良,45,PM10,2024-01-16
";

    #[test]
    fn test_run_synthesize_writes_hourly_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("air_quality_2024.csv");
        let output = dir.path().join("hourly.csv");
        fs::write(&input, BASELINES).unwrap();

        run_synthesize(input.to_str().unwrap(), output.to_str().unwrap(), false, None).unwrap();

        let mut rdr = csv::Reader::from_path(&output).unwrap();
        let headers = rdr.headers().unwrap().clone();
        assert_eq!(&headers[0], "date");
        assert_eq!(&headers[6], "quality_level");
        let aqi_idx = headers.iter().position(|h| h == "aqi").unwrap();
        let city_idx = headers.iter().position(|h| h == "city").unwrap();

        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        // 北京: 3 days (one carried forward), 上海: 2 days
        assert_eq!(rows.len(), 5 * 24);
        assert_eq!(rows.iter().filter(|r| &r[city_idx] == "北京").count(), 72);
        for row in &rows {
            let aqi: f64 = row[aqi_idx].parse().unwrap();
            assert!((0.0..=500.0).contains(&aqi));
        }
    }

    #[test]
    fn test_run_synthesize_is_reproducible() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("daily.csv");
        fs::write(&input, BASELINES).unwrap();
        let first = dir.path().join("first.csv");
        let second = dir.path().join("second.csv");
        run_synthesize(input.to_str().unwrap(), first.to_str().unwrap(), false, None).unwrap();
        run_synthesize(input.to_str().unwrap(), second.to_str().unwrap(), false, None).unwrap();
        assert_eq!(fs::read(first).unwrap(), fs::read(second).unwrap());
    }

    #[test]
    fn test_run_synthesize_rejects_invalid_unless_skipping() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("daily.csv");
        let output = dir.path().join("hourly.csv");
        fs::write(
            &input,
            "city,date,province,aqi,pm25,main_pollutant\n北京,2024-01-15,北京,120,80,PM2.5\n北京,2024-01-16,北京,,80,PM2.5\n",
        )
        .unwrap();

        let err = run_synthesize(input.to_str().unwrap(), output.to_str().unwrap(), false, None)
            .unwrap_err();
        assert!(format!("{err:#}").contains("line 3"), "{err:#}");

        run_synthesize(input.to_str().unwrap(), output.to_str().unwrap(), true, None).unwrap();
        let rows = csv::Reader::from_path(&output).unwrap().records().count();
        assert_eq!(rows, 24);
    }

    #[test]
    fn test_run_synthesize_uses_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("daily.csv");
        let config = dir.path().join("config.json");
        let output = dir.path().join("hourly.csv");
        fs::write(&input, BASELINES).unwrap();
        fs::write(&config, r#"{ "noise_std_dev": 0.0, "value_max": 100.0 }"#).unwrap();

        run_synthesize(
            input.to_str().unwrap(),
            output.to_str().unwrap(),
            false,
            Some(config.to_str().unwrap()),
        )
        .unwrap();

        let mut rdr = csv::Reader::from_path(&output).unwrap();
        let aqi_idx = rdr.headers().unwrap().iter().position(|h| h == "aqi").unwrap();
        for row in rdr.records() {
            let aqi: f64 = row.unwrap()[aqi_idx].parse().unwrap();
            assert!(aqi <= 100.0);
        }

        fs::write(&config, r#"{ "persistence": 2.0 }"#).unwrap();
        assert!(run_synthesize(
            input.to_str().unwrap(),
            output.to_str().unwrap(),
            false,
            Some(config.to_str().unwrap()),
        )
        .is_err());
    }
}
