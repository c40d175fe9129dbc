use crate::quality::QualityLevel;
use crate::season::Season;
use aq_utils::{dates, range};
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::Serialize;

/// Offsets (in hours) of the lagged feature columns.
pub const LAG_HOURS: [usize; 5] = [1, 3, 6, 12, 24];

/// One synthesized hour for one city.
///
/// The pollutant fields are fixed at construction: values are clipped to
/// the valid range and `quality_level` always agrees with `aqi`. `hour`
/// must be below 24.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyPoint {
    city: String,
    province: String,
    date: NaiveDate,
    hour: u32,
    aqi: f64,
    pm25: f64,
    quality_level: QualityLevel,
    main_pollutant: String,
}

impl HourlyPoint {
    pub fn new(
        city: &str,
        province: &str,
        date: NaiveDate,
        hour: u32,
        aqi: f64,
        pm25: f64,
        main_pollutant: &str,
    ) -> Self {
        assert!(hour < 24, "hour {hour} out of range for {city} on {date}");
        let aqi = range::clip_value(aqi);
        HourlyPoint {
            city: city.to_string(),
            province: province.to_string(),
            date,
            hour,
            aqi,
            pm25: range::clip_value(pm25),
            quality_level: QualityLevel::classify(aqi),
            main_pollutant: main_pollutant.to_string(),
        }
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn province(&self) -> &str {
        &self.province
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn aqi(&self) -> f64 {
        self.aqi
    }

    pub fn pm25(&self) -> f64 {
        self.pm25
    }

    pub fn quality_level(&self) -> QualityLevel {
        self.quality_level
    }

    pub fn main_pollutant(&self) -> &str {
        &self.main_pollutant
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.date.and_time(NaiveTime::MIN) + TimeDelta::hours(i64::from(self.hour))
    }
}

/// Derived columns computed over a city's hourly series.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyFeatures {
    pub is_peak_hour: bool,
    pub aqi_ma24: f64,
    pub pm25_ma24: f64,
    /// Indexed like [`LAG_HOURS`].
    pub aqi_lags: [f64; 5],
    pub pm25_lags: [f64; 5],
    pub city_code: u32,
    pub province_code: u32,
}

/// Flat output row for the hourly dataset, in output column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyRecord {
    pub date: String,
    pub hour: u32,
    pub city: String,
    pub province: String,
    pub aqi: f64,
    pub pm25: f64,
    pub quality_level: QualityLevel,
    pub main_pollutant: String,
    pub timestamp: String,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub dayofweek: u32,
    pub season: u8,
    pub is_weekend: u8,
    pub is_peak_hour: u8,
    pub aqi_ma24: f64,
    pub pm25_ma24: f64,
    pub aqi_lag1: f64,
    pub aqi_lag3: f64,
    pub aqi_lag6: f64,
    pub aqi_lag12: f64,
    pub aqi_lag24: f64,
    pub pm25_lag1: f64,
    pub pm25_lag3: f64,
    pub pm25_lag6: f64,
    pub pm25_lag12: f64,
    pub pm25_lag24: f64,
    pub city_code: u32,
    pub province_code: u32,
    pub quality_level_code: u8,
}

impl HourlyRecord {
    pub fn new(point: &HourlyPoint, features: &HourlyFeatures) -> Self {
        let date = point.date();
        let [aqi_lag1, aqi_lag3, aqi_lag6, aqi_lag12, aqi_lag24] = features.aqi_lags;
        let [pm25_lag1, pm25_lag3, pm25_lag6, pm25_lag12, pm25_lag24] = features.pm25_lags;
        HourlyRecord {
            date: dates::format_date(&date),
            hour: point.hour(),
            city: point.city().to_string(),
            province: point.province().to_string(),
            aqi: point.aqi(),
            pm25: point.pm25(),
            quality_level: point.quality_level(),
            main_pollutant: point.main_pollutant().to_string(),
            timestamp: dates::format_timestamp(&point.timestamp()),
            year: date.year(),
            month: date.month(),
            day: date.day(),
            dayofweek: dates::day_of_week(&date),
            season: Season::from_date(&date).code(),
            is_weekend: u8::from(dates::is_weekend(&date)),
            is_peak_hour: u8::from(features.is_peak_hour),
            aqi_ma24: features.aqi_ma24,
            pm25_ma24: features.pm25_ma24,
            aqi_lag1,
            aqi_lag3,
            aqi_lag6,
            aqi_lag12,
            aqi_lag24,
            pm25_lag1,
            pm25_lag3,
            pm25_lag6,
            pm25_lag12,
            pm25_lag24,
            city_code: features.city_code,
            province_code: features.province_code,
            quality_level_code: point.quality_level().code(),
        }
    }
}
