//! Static hour-of-day and season multipliers used by the daily synthesizer.

use crate::{DailyCurve, HOURS_PER_DAY};
use aq_core::season::{DayType, Season};

/// Named slice of the day that carries its own multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    MorningPeak,
    AfternoonLow,
    AfternoonPeak,
    EveningPeak,
    NightLow,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodFactor {
    pub period: Period,
    pub hours: &'static [u32],
    pub factor: f64,
}

/// The hour-of-day profile for one kind of day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayTypePattern {
    pub day_type: DayType,
    pub periods: &'static [PeriodFactor],
}

pub const WORKDAY: DayTypePattern = DayTypePattern {
    day_type: DayType::Workday,
    periods: &[
        PeriodFactor {
            period: Period::MorningPeak,
            hours: &[7, 8, 9],
            factor: 1.15,
        },
        PeriodFactor {
            period: Period::AfternoonLow,
            hours: &[12, 13, 14],
            factor: 0.85,
        },
        PeriodFactor {
            period: Period::EveningPeak,
            hours: &[17, 18, 19],
            factor: 1.20,
        },
        PeriodFactor {
            period: Period::NightLow,
            hours: &[2, 3, 4],
            factor: 0.80,
        },
    ],
};

pub const WEEKEND: DayTypePattern = DayTypePattern {
    day_type: DayType::Weekend,
    periods: &[
        PeriodFactor {
            period: Period::MorningPeak,
            hours: &[9, 10, 11],
            factor: 1.05,
        },
        PeriodFactor {
            period: Period::AfternoonPeak,
            hours: &[14, 15, 16],
            factor: 1.10,
        },
        PeriodFactor {
            period: Period::EveningPeak,
            hours: &[19, 20, 21],
            factor: 1.12,
        },
        PeriodFactor {
            period: Period::NightLow,
            hours: &[2, 3, 4],
            factor: 0.85,
        },
    ],
};

impl DayTypePattern {
    pub fn for_day_type(day_type: DayType) -> &'static DayTypePattern {
        match day_type {
            DayType::Workday => &WORKDAY,
            DayType::Weekend => &WEEKEND,
        }
    }

    /// First period whose hour set contains `hour`.
    pub fn period_for(&self, hour: u32) -> Option<&PeriodFactor> {
        self.periods.iter().find(|p| p.hours.contains(&hour))
    }

    /// Period multiplier for `hour`, 1.0 outside every period.
    pub fn factor(&self, hour: u32) -> f64 {
        self.period_for(hour).map_or(1.0, |p| p.factor)
    }

    /// Morning and evening peaks count as peak hours.
    pub fn is_peak_hour(&self, hour: u32) -> bool {
        matches!(
            self.period_for(hour).map(|p| p.period),
            Some(Period::MorningPeak | Period::EveningPeak)
        )
    }
}

/// Seasonal multiplier applied on top of the day-type profile.
pub fn season_factor(season: Season) -> f64 {
    match season {
        Season::Winter => 1.15,
        Season::Spring => 1.05,
        Season::Summer => 0.90,
        Season::Autumn => 1.0,
    }
}

/// Combined period and season multiplier for every hour of a day.
pub fn hour_factors(day_type: DayType, season: Season) -> DailyCurve {
    let pattern = DayTypePattern::for_day_type(day_type);
    let seasonal = season_factor(season);
    let mut factors = [0.0; HOURS_PER_DAY];
    for (hour, factor) in factors.iter_mut().enumerate() {
        *factor = pattern.factor(hour as u32) * seasonal;
    }
    factors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_hours_do_not_overlap() {
        for pattern in [&WORKDAY, &WEEKEND] {
            let mut seen = Vec::new();
            for period in pattern.periods {
                for hour in period.hours {
                    let day_type = pattern.day_type;
                    assert!(!seen.contains(hour), "{day_type:?} hour {hour} listed twice");
                    seen.push(*hour);
                }
            }
        }
    }

    #[test]
    fn test_workday_factors() {
        let factors = hour_factors(DayType::Workday, Season::Autumn);
        assert_eq!(factors[8], 1.15);
        assert_eq!(factors[13], 0.85);
        assert_eq!(factors[18], 1.20);
        assert_eq!(factors[3], 0.80);
        assert_eq!(factors[0], 1.0);
        assert_eq!(factors[23], 1.0);
    }

    #[test]
    fn test_season_scales_factors() {
        let factors = hour_factors(DayType::Weekend, Season::Winter);
        assert!((factors[10] - 1.05 * 1.15).abs() < 1e-12);
        assert!((factors[0] - 1.15).abs() < 1e-12);
        let summer = hour_factors(DayType::Weekend, Season::Summer);
        assert!((summer[20] - 1.12 * 0.90).abs() < 1e-12);
    }

    #[test]
    fn test_peak_hours() {
        let peaks: Vec<u32> = (0..24).filter(|h| WORKDAY.is_peak_hour(*h)).collect();
        assert_eq!(peaks, vec![7, 8, 9, 17, 18, 19]);
        let peaks: Vec<u32> = (0..24).filter(|h| WEEKEND.is_peak_hour(*h)).collect();
        assert_eq!(peaks, vec![9, 10, 11, 19, 20, 21]);
    }
}
