//! Derived columns for the hourly dataset: trailing means, lags, calendar
//! flags and categorical codes.

use crate::pattern::DayTypePattern;
use aq_core::hourly::{HourlyFeatures, HourlyPoint, HourlyRecord, LAG_HOURS};
use aq_core::season::DayType;
use aq_utils::range;
use std::collections::BTreeMap;

/// Width of the trailing moving average, in hours.
pub const MOVING_AVERAGE_WINDOW: usize = 24;

/// Trailing mean over up to `window` values ending at each index. The
/// window is shorter at the start of the series.
pub fn trailing_mean(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    let mut result = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    for (i, value) in values.iter().enumerate() {
        sum += value;
        if i >= window {
            sum -= values[i - window];
        }
        let count = (i + 1).min(window);
        result.push(sum / count as f64);
    }
    result
}

/// The value `lag` steps earlier; indexes before the series start take the
/// first value.
pub fn lagged(values: &[f64], lag: usize) -> Vec<f64> {
    (0..values.len())
        .map(|i| values[i.saturating_sub(lag)])
        .collect()
}

/// Integer codes for categorical columns: the index of each distinct value
/// in sorted order.
#[derive(Debug, Clone, Default)]
pub struct CategoryCodes {
    codes: BTreeMap<String, u32>,
}

impl CategoryCodes {
    pub fn from_values<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        let mut codes: BTreeMap<String, u32> = values
            .into_iter()
            .map(|v| (v.to_string(), 0))
            .collect();
        for (i, code) in codes.values_mut().enumerate() {
            *code = i as u32;
        }
        CategoryCodes { codes }
    }

    pub fn code(&self, value: &str) -> u32 {
        self.codes.get(value).copied().unwrap_or(u32::MAX)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

fn lag_array(series: &[Vec<f64>; 5], i: usize) -> [f64; 5] {
    let mut out = [0.0; 5];
    for (slot, lags) in out.iter_mut().zip(series) {
        *slot = range::clip_value(lags[i]);
    }
    out
}

/// Compute features for hourly points ordered by city and then time.
/// Moving averages and lags never cross from one city into the next.
pub fn engineer_features(points: &[HourlyPoint]) -> Vec<HourlyRecord> {
    let city_codes = CategoryCodes::from_values(points.iter().map(|p| p.city()));
    let province_codes = CategoryCodes::from_values(points.iter().map(|p| p.province()));

    let mut records = Vec::with_capacity(points.len());
    for city_points in points.chunk_by(|a, b| a.city() == b.city()) {
        let aqi: Vec<f64> = city_points.iter().map(|p| p.aqi()).collect();
        let pm25: Vec<f64> = city_points.iter().map(|p| p.pm25()).collect();
        let aqi_ma = trailing_mean(&aqi, MOVING_AVERAGE_WINDOW);
        let pm25_ma = trailing_mean(&pm25, MOVING_AVERAGE_WINDOW);
        let aqi_lags: [Vec<f64>; 5] = LAG_HOURS.map(|lag| lagged(&aqi, lag));
        let pm25_lags: [Vec<f64>; 5] = LAG_HOURS.map(|lag| lagged(&pm25, lag));

        for (i, point) in city_points.iter().enumerate() {
            let pattern = DayTypePattern::for_day_type(DayType::from_date(&point.date()));
            let features = HourlyFeatures {
                is_peak_hour: pattern.is_peak_hour(point.hour()),
                aqi_ma24: range::clip_value(aqi_ma[i]),
                pm25_ma24: range::clip_value(pm25_ma[i]),
                aqi_lags: lag_array(&aqi_lags, i),
                pm25_lags: lag_array(&pm25_lags, i),
                city_code: city_codes.code(point.city()),
                province_code: province_codes.code(point.province()),
            };
            records.push(HourlyRecord::new(point, &features));
        }
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_trailing_mean_short_window_at_start() {
        let values = [10.0, 20.0, 30.0, 40.0];
        let means = trailing_mean(&values, 2);
        assert_eq!(means, vec![10.0, 15.0, 25.0, 35.0]);
    }

    #[test]
    fn test_trailing_mean_window_24() {
        let values: Vec<f64> = (0..48).map(|i| i as f64).collect();
        let means = trailing_mean(&values, MOVING_AVERAGE_WINDOW);
        assert_eq!(means[0], 0.0);
        assert!((means[23] - 11.5).abs() < 1e-9);
        // Mean of 24..=47
        assert!((means[47] - 35.5).abs() < 1e-9);
    }

    #[test]
    fn test_lagged_backfills_start() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(lagged(&values, 1), vec![1.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(lagged(&values, 3), vec![1.0, 1.0, 1.0, 1.0, 2.0]);
        assert_eq!(lagged(&values, 24), vec![1.0; 5]);
    }

    #[test]
    fn test_category_codes_sorted() {
        let codes = CategoryCodes::from_values(["广州", "北京", "上海", "北京"]);
        assert_eq!(codes.len(), 3);
        assert_eq!(codes.code("上海"), 0);
        assert_eq!(codes.code("北京"), 1);
        assert_eq!(codes.code("广州"), 2);
        assert_eq!(codes.code("天津"), u32::MAX);
    }

    fn series(city: &str, province: &str, start: u32, hours: usize) -> Vec<HourlyPoint> {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        (0..hours)
            .map(|i| {
                let day = date + chrono::Duration::days((i / 24) as i64);
                let value = f64::from(start) + i as f64;
                HourlyPoint::new(city, province, day, (i % 24) as u32, value, value / 2.0, "PM2.5")
            })
            .collect()
    }

    #[test]
    fn test_features_stay_within_city() {
        let mut points = series("上海", "上海", 100, 30);
        points.extend(series("北京", "北京", 300, 30));
        let records = engineer_features(&points);
        assert_eq!(records.len(), 60);

        let first_beijing = &records[30];
        assert_eq!(first_beijing.city, "北京");
        assert_eq!(first_beijing.aqi_lag1, 300.0);
        assert_eq!(first_beijing.aqi_ma24, 300.0);
        assert_eq!(first_beijing.city_code, 1);

        let shanghai_25 = &records[25];
        assert_eq!(shanghai_25.aqi_lag24, 101.0);
        assert_eq!(shanghai_25.aqi_lag1, 124.0);
        assert_eq!(shanghai_25.pm25_lag1, 62.0);
        assert_eq!(shanghai_25.city_code, 0);
        assert_eq!(shanghai_25.province_code, 0);
    }

    #[test]
    fn test_peak_flag_follows_day_type() {
        // 2024-01-15 is a Monday
        let points = series("上海", "上海", 50, 24);
        let records = engineer_features(&points);
        let peaks: Vec<u32> = records
            .iter()
            .filter(|r| r.is_peak_hour == 1)
            .map(|r| r.hour)
            .collect();
        assert_eq!(peaks, vec![7, 8, 9, 17, 18, 19]);
    }
}
