use crate::error::{AqError, Result};
use crate::quality::QualityLevel;
use aq_utils::{dates, range};
use chrono::NaiveDateTime;
use csv::{ReaderBuilder, Trim};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io;

/// The latest known conditions for one city.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentReading {
    pub aqi: u32,
    pub pm25: f64,
    pub quality_level: QualityLevel,
    pub timestamp: NaiveDateTime,
}

impl CurrentReading {
    pub fn new(aqi: u32, pm25: f64, timestamp: NaiveDateTime) -> Self {
        let aqi = aqi.min(range::VALUE_MAX as u32);
        CurrentReading {
            aqi,
            pm25: range::clip_value(pm25),
            quality_level: QualityLevel::classify(f64::from(aqi)),
            timestamp,
        }
    }
}

/// One step of a short-horizon forecast.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPoint {
    #[serde(serialize_with = "dates::serialize_timestamp")]
    pub timestamp: NaiveDateTime,
    pub aqi: u32,
    pub pm25: f64,
    pub quality_level: QualityLevel,
}

impl ForecastPoint {
    pub fn new(timestamp: NaiveDateTime, aqi: u32, pm25: f64) -> Self {
        ForecastPoint {
            timestamp,
            aqi,
            pm25,
            quality_level: QualityLevel::classify(f64::from(aqi)),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ReadingRow {
    city: String,
    timestamp: String,
    aqi: f64,
    pm25: f64,
}

/// Read a table of live readings (`city,timestamp,aqi,pm25`, headed).
///
/// When a city appears more than once the most recent timestamp wins.
/// Rows with negative or non-finite values are an
/// [`AqError::InvalidInput`].
pub fn read_current_readings<R: io::Read>(reader: R) -> Result<HashMap<String, CurrentReading>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    let mut readings: HashMap<String, CurrentReading> = HashMap::new();

    for result in rdr.records() {
        let record = result?;
        let line = record.position().map_or(0, |p| p.line());
        let row: ReadingRow = record.deserialize(Some(&headers))?;
        if !(row.aqi.is_finite() && row.pm25.is_finite()) || row.aqi < 0.0 || row.pm25 < 0.0 {
            return Err(AqError::invalid_input(
                line,
                format!("reading for {} out of range: aqi={} pm25={}", row.city, row.aqi, row.pm25),
            ));
        }
        let timestamp = dates::parse_timestamp(&row.timestamp)
            .map_err(|e| AqError::invalid_input(line, e.to_string()))?;
        let reading = CurrentReading::new(row.aqi.round() as u32, row.pm25, timestamp);

        match readings.get(&row.city) {
            Some(existing) if existing.timestamp >= reading.timestamp => {
                warn!("Ignoring older reading for {} at line {}", row.city, line);
            }
            _ => {
                readings.insert(row.city, reading);
            }
        }
    }

    info!("Loaded current readings for {} cities", readings.len());
    Ok(readings)
}
