//! Where the forecaster gets "now" from.

use crate::forecast::fallback_reading;
use aq_core::reading::{read_current_readings, CurrentReading};
use aq_core::Result;
use chrono::NaiveDateTime;
use log::{info, warn};
use std::collections::HashMap;
use std::io;

/// Supplies the latest reading for a city, if one is available.
pub trait CurrentReadingSource {
    fn current(&self, city: &str) -> Option<CurrentReading>;
}

/// Whether a reading came from the source or from the fallback generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingOrigin {
    Live,
    Fallback,
}

/// Readings loaded from a `city,timestamp,aqi,pm25` table.
#[derive(Debug, Clone, Default)]
pub struct ReadingTable {
    readings: HashMap<String, CurrentReading>,
}

impl ReadingTable {
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self> {
        Ok(ReadingTable {
            readings: read_current_readings(reader)?,
        })
    }
}

impl CurrentReadingSource for ReadingTable {
    fn current(&self, city: &str) -> Option<CurrentReading> {
        self.readings.get(city).cloned()
    }
}

/// A single reading supplied directly for one city.
#[derive(Debug, Clone)]
pub struct FixedReading {
    pub city: String,
    pub reading: CurrentReading,
}

impl CurrentReadingSource for FixedReading {
    fn current(&self, city: &str) -> Option<CurrentReading> {
        (self.city == city).then(|| self.reading.clone())
    }
}

/// No live data at all; every lookup falls back.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoReadings;

impl CurrentReadingSource for NoReadings {
    fn current(&self, _city: &str) -> Option<CurrentReading> {
        None
    }
}

/// The source's reading for `city`, or the deterministic fallback for
/// `city` on the date of `now`.
pub fn current_or_fallback(
    source: &dyn CurrentReadingSource,
    city: &str,
    now: NaiveDateTime,
) -> (CurrentReading, ReadingOrigin) {
    match source.current(city) {
        Some(reading) => {
            info!("Using live reading for {}: AQI {}", city, reading.aqi);
            (reading, ReadingOrigin::Live)
        }
        None => {
            warn!("No live reading for {}, using fallback values", city);
            (fallback_reading(city, now), ReadingOrigin::Fallback)
        }
    }
}
