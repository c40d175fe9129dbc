use aq_utils::dates;
use chrono::{Datelike, NaiveDate};

/// Meteorological season. The discriminant is the season code written to
/// hourly output: 1=winter, 2=spring, 3=summer, 4=autumn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    Winter = 1,
    Spring = 2,
    Summer = 3,
    Autumn = 4,
}

impl Season {
    /// Winter is December through February, spring March through May,
    /// summer June through August, autumn September through November.
    pub fn from_month(month: u32) -> Self {
        match dates::season_code(month) {
            1 => Season::Winter,
            2 => Season::Spring,
            3 => Season::Summer,
            _ => Season::Autumn,
        }
    }

    pub fn from_date(date: &NaiveDate) -> Self {
        Season::from_month(date.month())
    }

    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Which hour-of-day profile applies to a calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayType {
    Workday,
    Weekend,
}

impl DayType {
    pub fn from_date(date: &NaiveDate) -> Self {
        if dates::is_weekend(date) {
            DayType::Weekend
        } else {
            DayType::Workday
        }
    }

    pub fn is_weekend(self) -> bool {
        self == DayType::Weekend
    }
}
