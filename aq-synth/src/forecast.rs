//! Short-horizon forecasting from a single live reading.
//!
//! Each of the next 24 hours is the current value times an hour-of-day
//! factor, a randomized seasonal factor and a randomized weather factor.
//! There is no smoothing between steps.

use crate::random::{DeterministicRandomSource, Stream};
use aq_core::reading::{CurrentReading, ForecastPoint};
use aq_core::season::Season;
use aq_utils::{dates, range};
use chrono::{Datelike, NaiveDateTime, TimeDelta, Timelike};
use rand::Rng;

/// Number of hourly steps in a forecast.
pub const FORECAST_HORIZON_HOURS: usize = 24;

/// Multiplier range simulating unmodeled weather.
pub const WEATHER_FACTOR_RANGE: (f64, f64) = (0.85, 1.15);

/// Hour-of-day multiplier for forecasts.
pub fn hour_factor(hour: u32) -> f64 {
    match hour {
        7..=9 => 1.15,
        17..=19 => 1.20,
        2..=4 => 0.85,
        13 | 14 => 0.90,
        _ => 1.0,
    }
}

/// Range the seasonal multiplier is drawn from.
pub fn seasonal_factor_range(season: Season) -> (f64, f64) {
    match season {
        Season::Winter => (1.1, 1.3),
        Season::Spring => (0.9, 1.1),
        Season::Summer => (0.7, 0.9),
        Season::Autumn => (0.8, 1.0),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ShortHorizonForecaster;

impl ShortHorizonForecaster {
    /// 24 hourly points starting at the hour containing `now`.
    pub fn forecast<R: Rng + ?Sized>(
        &self,
        current_aqi: u32,
        current_pm25: f64,
        now: NaiveDateTime,
        rng: &mut R,
    ) -> Vec<ForecastPoint> {
        let start = dates::truncate_to_hour(&now);
        (0..FORECAST_HORIZON_HOURS)
            .map(|offset| {
                let timestamp = start + TimeDelta::hours(offset as i64);
                let season = Season::from_month(timestamp.month());
                let (season_lo, season_hi) = seasonal_factor_range(season);
                let seasonal = rng.random_range(season_lo..=season_hi);
                let (weather_lo, weather_hi) = WEATHER_FACTOR_RANGE;
                let weather = rng.random_range(weather_lo..=weather_hi);
                let factor = hour_factor(timestamp.hour()) * seasonal * weather;

                let aqi = range::clip_value((f64::from(current_aqi) * factor).trunc());
                let pm25 = range::clip_value(range::round1(current_pm25 * factor));
                ForecastPoint::new(timestamp, aqi as u32, pm25)
            })
            .collect()
    }
}

/// Stand-in reading for a city without live data.
///
/// Seeded from the city name and the calendar date of `now`, so every call
/// for the same city on the same day yields the same values.
pub fn fallback_reading(city: &str, now: NaiveDateTime) -> CurrentReading {
    let mut rng = DeterministicRandomSource::new(city, now.date()).rng(Stream::Fallback);
    let aqi: u32 = rng.random_range(30..250);
    let jitter: f64 = rng.random_range(-10.0..10.0);
    let pm25 = range::round1(f64::from(aqi) * 0.6 + jitter);
    CurrentReading::new(aqi, pm25, now)
}
