//! Drives the daily synthesizer over whole city series.
//!
//! Each city is a chain: every calendar date between its first and last
//! baseline is synthesized in ascending order, and each day's curves seed
//! the next day's continuity and persistence blends. A date without its own
//! baseline reuses the most recent earlier one, so the chain never breaks.

use crate::curve::{DailyCurveSynthesizer, DayContext};
use crate::random::Stream;
use crate::{DailyCurve, HOURS_PER_DAY};
use aq_core::baseline::{group_by_city, DailyBaseline};
use aq_core::date_range::DateRange;
use aq_core::hourly::HourlyPoint;
use chrono::NaiveDate;
use log::debug;
use rayon::prelude::*;

/// AQI and PM2.5 curves for one city-day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayCurves {
    pub aqi: DailyCurve,
    pub pm25: DailyCurve,
}

/// Hourly output of one or more city series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Synthesis {
    /// Ordered by city, then date, then hour.
    pub points: Vec<HourlyPoint>,
    pub days: usize,
    /// Days synthesized from a carried-forward baseline.
    pub carried_forward: usize,
}

/// Pair every date from the first to the last baseline with the most recent
/// baseline on or before it. Input must be one city's baselines sorted by date.
pub fn resolve_dates(sorted: &[DailyBaseline]) -> Vec<(NaiveDate, &DailyBaseline)> {
    let (Some(first), Some(last)) = (sorted.first(), sorted.last()) else {
        return Vec::new();
    };
    let mut idx = 0;
    DateRange::new(first.date, last.date)
        .iter()
        .map(|date| {
            while idx + 1 < sorted.len() && sorted[idx + 1].date <= date {
                idx += 1;
            }
            (date, &sorted[idx])
        })
        .collect()
}

impl DailyCurveSynthesizer {
    /// Both pollutant curves for one city-day, each from its own stream.
    pub fn synthesize_pair(
        &self,
        baseline: &DailyBaseline,
        day: &DayContext,
        previous: Option<&DayCurves>,
    ) -> DayCurves {
        DayCurves {
            aqi: self.synthesize_day_for(
                &baseline.city,
                Stream::Aqi,
                baseline.aqi,
                day,
                previous.map(|p| &p.aqi),
            ),
            pm25: self.synthesize_day_for(
                &baseline.city,
                Stream::Pm25,
                baseline.pm25,
                day,
                previous.map(|p| &p.pm25),
            ),
        }
    }

    /// Synthesize one city's series. `baselines` must all belong to the same
    /// city and be sorted by date.
    pub fn synthesize_city(&self, baselines: &[DailyBaseline]) -> Synthesis {
        let plan = resolve_dates(baselines);
        let carried_forward = plan.iter().filter(|(date, b)| b.date != *date).count();

        let points: Vec<HourlyPoint> = plan
            .iter()
            .scan(None::<DayCurves>, |previous, (date, baseline)| {
                let day = DayContext::for_date(*date);
                let curves = self.synthesize_pair(baseline, &day, previous.as_ref());
                *previous = Some(curves);
                Some((*date, *baseline, curves))
            })
            .flat_map(|(date, baseline, curves)| {
                (0..HOURS_PER_DAY).map(move |hour| {
                    HourlyPoint::new(
                        &baseline.city,
                        &baseline.province,
                        date,
                        hour as u32,
                        curves.aqi[hour],
                        curves.pm25[hour],
                        &baseline.main_pollutant,
                    )
                })
            })
            .collect();

        if let Some(first) = baselines.first() {
            debug!(
                "{}: {} days synthesized, {} carried forward",
                first.city,
                plan.len(),
                carried_forward
            );
        }
        Synthesis {
            points,
            days: plan.len(),
            carried_forward,
        }
    }

    /// Synthesize every city. Cities are independent and run in parallel.
    pub fn synthesize_all(&self, baselines: Vec<DailyBaseline>) -> Synthesis {
        let groups: Vec<Vec<DailyBaseline>> = group_by_city(baselines).into_values().collect();
        let per_city: Vec<Synthesis> = groups
            .par_iter()
            .map(|group| self.synthesize_city(group))
            .collect();

        per_city.into_iter().fold(Synthesis::default(), |mut acc, city| {
            acc.points.extend(city.points);
            acc.days += city.days;
            acc.carried_forward += city.carried_forward;
            acc
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SynthesisConfig;

    fn baseline(city: &str, d: u32, aqi: f64) -> DailyBaseline {
        DailyBaseline {
            city: city.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, d).unwrap(),
            province: format!("{city}省"),
            aqi,
            pm25: aqi * 0.6,
            main_pollutant: "PM2.5".to_string(),
        }
    }

    fn synthesizer() -> DailyCurveSynthesizer {
        DailyCurveSynthesizer::new(SynthesisConfig::default()).unwrap()
    }

    #[test]
    fn test_resolve_dates_carries_forward() {
        let sorted = vec![
            baseline("北京", 1, 50.0),
            baseline("北京", 4, 90.0),
            baseline("北京", 5, 70.0),
        ];
        let plan = resolve_dates(&sorted);
        let days: Vec<(u32, f64)> = plan
            .iter()
            .map(|(date, b)| (chrono::Datelike::day(date), b.aqi))
            .collect();
        assert_eq!(days, vec![(1, 50.0), (2, 50.0), (3, 50.0), (4, 90.0), (5, 70.0)]);
    }

    #[test]
    fn test_resolve_dates_empty() {
        assert!(resolve_dates(&[]).is_empty());
    }

    #[test]
    fn test_city_series_fills_gaps() {
        let baselines = vec![baseline("北京", 1, 80.0), baseline("北京", 4, 150.0)];
        let synthesis = synthesizer().synthesize_city(&baselines);
        assert_eq!(synthesis.days, 4);
        assert_eq!(synthesis.carried_forward, 2);
        assert_eq!(synthesis.points.len(), 4 * HOURS_PER_DAY);
        let hours: Vec<u32> = synthesis.points.iter().take(25).map(|p| p.hour()).collect();
        assert_eq!(hours[23], 23);
        assert_eq!(hours[24], 0);
        assert!(synthesis
            .points
            .windows(2)
            .all(|w| w[0].timestamp() < w[1].timestamp()));
    }

    #[test]
    fn test_city_series_matches_explicit_fold() {
        let s = synthesizer();
        let baselines = vec![baseline("上海", 1, 60.0), baseline("上海", 2, 180.0)];
        let synthesis = s.synthesize_city(&baselines);

        let day1 = DayContext::for_date(baselines[0].date);
        let day2 = DayContext::for_date(baselines[1].date);
        let first = s.synthesize_pair(&baselines[0], &day1, None);
        let second = s.synthesize_pair(&baselines[1], &day2, Some(&first));

        assert_eq!(synthesis.points[0].aqi(), first.aqi[0]);
        assert_eq!(synthesis.points[24].aqi(), second.aqi[0]);
        assert_eq!(synthesis.points[47].pm25(), second.pm25[23]);
    }

    #[test]
    fn test_all_cities_ordered_and_independent() {
        let s = synthesizer();
        let baselines = vec![
            baseline("上海", 2, 60.0),
            baseline("北京", 1, 120.0),
            baseline("上海", 1, 70.0),
            baseline("北京", 2, 110.0),
        ];
        let all = s.synthesize_all(baselines.clone());
        assert_eq!(all.points.len(), 4 * HOURS_PER_DAY);
        assert_eq!(all.days, 4);
        assert_eq!(all.carried_forward, 0);

        // BTreeMap order: 上 (U+4E0A) sorts before 北 (U+5317).
        assert_eq!(all.points[0].city(), "上海");
        assert_eq!(all.points[48].city(), "北京");

        // A city's curves do not depend on which other cities are present.
        let beijing_only = s.synthesize_all(vec![baselines[1].clone(), baselines[3].clone()]);
        assert_eq!(&all.points[48..], &beijing_only.points[..]);
    }

    #[test]
    fn test_consecutive_days_join_smoothly() {
        let s = synthesizer();
        let baselines: Vec<DailyBaseline> = (1..=7).map(|d| baseline("北京", d, 120.0)).collect();
        let synthesis = s.synthesize_city(&baselines);
        for day in 1..7 {
            let last = synthesis.points[day * HOURS_PER_DAY - 1].aqi();
            let next = synthesis.points[day * HOURS_PER_DAY].aqi();
            assert!((next - last).abs() < 0.2 * last, "day {day}: {last} -> {next}");
        }
    }
}
