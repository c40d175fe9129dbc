//! Daily baselines and the CSV ingestion boundary.
//!
//! Input rows come from the daily scraper. Columns are matched by header
//! name; the required ones are `city,date,province,aqi,pm25,main_pollutant`
//! and any extra columns (`rank`, `quality_level`, `timestamp`, ...) are
//! ignored.
//!
//! # Example CSV
//! ```text
//! rank,province,city,aqi,quality_level,pm25,main_pollutant,date
//! 1,北京,北京,120,轻度污染,80,PM2.5,2024-01-15
//! ```

use crate::error::{AqError, Result};
use aq_utils::dates;
use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use log::{info, warn};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::io;

/// One city's observed daily values. Immutable once read.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyBaseline {
    pub city: String,
    pub date: NaiveDate,
    pub province: String,
    pub aqi: f64,
    pub pm25: f64,
    pub main_pollutant: String,
}

/// What to do with a row that fails validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InvalidRowPolicy {
    /// Stop at the first invalid row with [`AqError::InvalidInput`].
    #[default]
    Reject,
    /// Log the row and leave it out.
    Skip,
}

#[derive(Debug, Deserialize)]
struct BaselineRow {
    city: String,
    date: String,
    #[serde(default)]
    province: String,
    #[serde(default)]
    aqi: String,
    #[serde(default)]
    pm25: String,
    #[serde(default)]
    main_pollutant: String,
}

impl BaselineRow {
    fn validate(self, line: u64) -> Result<DailyBaseline> {
        let city = self.city.trim().to_string();
        if city.is_empty() {
            return Err(AqError::invalid_input(line, "city is empty"));
        }
        let date = dates::parse_date(&self.date)
            .map_err(|e| AqError::invalid_input(line, e.to_string()))?;
        let aqi = parse_measure("aqi", &self.aqi, line)?;
        let pm25 = parse_measure("pm25", &self.pm25, line)?;
        Ok(DailyBaseline {
            city,
            date,
            province: self.province.trim().to_string(),
            aqi,
            pm25,
            main_pollutant: self.main_pollutant.trim().to_string(),
        })
    }
}

fn parse_measure(name: &str, raw: &str, line: u64) -> Result<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AqError::invalid_input(line, format!("{name} is missing")));
    }
    let value: f64 = raw
        .parse()
        .map_err(|_| AqError::invalid_input(line, format!("{name} is not numeric: {raw:?}")))?;
    if !value.is_finite() {
        return Err(AqError::invalid_input(line, format!("{name} is not finite: {raw}")));
    }
    if value < 0.0 {
        return Err(AqError::invalid_input(line, format!("{name} is negative: {raw}")));
    }
    Ok(value)
}

/// Parse daily baseline rows from a headed CSV.
///
/// Duplicate (city, date) rows keep the first occurrence. Malformed CSV
/// (broken quoting, invalid UTF-8) is always an error; `policy` governs
/// rows whose cells are missing or fail validation.
pub fn read_baselines<R: io::Read>(
    reader: R,
    policy: InvalidRowPolicy,
) -> Result<Vec<DailyBaseline>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();

    let mut baselines = Vec::new();
    let mut seen: HashSet<(String, NaiveDate)> = HashSet::new();
    let mut skipped = 0u32;
    let mut duplicates = 0u32;

    for result in rdr.records() {
        let mut record = result?;
        let line = record.position().map_or(0, |p| p.line());
        // Short rows read their missing trailing cells as empty.
        while record.len() < headers.len() {
            record.push_field("");
        }
        let parsed = record
            .deserialize::<BaselineRow>(Some(&headers))
            .map_err(|e| AqError::invalid_input(line, e.to_string()))
            .and_then(|row| row.validate(line));
        let baseline = match parsed {
            Ok(b) => b,
            Err(e) => match policy {
                InvalidRowPolicy::Reject => return Err(e),
                InvalidRowPolicy::Skip => {
                    warn!("Skipping row: {}", e);
                    skipped += 1;
                    continue;
                }
            },
        };
        if !seen.insert((baseline.city.clone(), baseline.date)) {
            warn!(
                "Duplicate baseline for {} on {} at line {}, keeping the first",
                baseline.city, baseline.date, line
            );
            duplicates += 1;
            continue;
        }
        baselines.push(baseline);
    }

    info!(
        "Read {} baselines ({} skipped, {} duplicates)",
        baselines.len(),
        skipped,
        duplicates
    );
    Ok(baselines)
}

/// Group baselines by city, each group sorted by date.
pub fn group_by_city(baselines: Vec<DailyBaseline>) -> BTreeMap<String, Vec<DailyBaseline>> {
    let mut result: BTreeMap<String, Vec<DailyBaseline>> = BTreeMap::new();
    for baseline in baselines {
        result
            .entry(baseline.city.clone())
            .or_default()
            .push(baseline);
    }
    for group in result.values_mut() {
        group.sort_by_key(|b| b.date);
    }
    result
}
