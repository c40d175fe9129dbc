//! Alert levels raised by forecast points.

use aq_core::reading::ForecastPoint;
use aq_utils::dates;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum AlertLevel {
    #[serde(rename = "蓝色")]
    Blue,
    #[serde(rename = "黄色")]
    Yellow,
    #[serde(rename = "橙色")]
    Orange,
    #[serde(rename = "红色")]
    Red,
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AlertLevel::Blue => "blue",
            AlertLevel::Yellow => "yellow",
            AlertLevel::Orange => "orange",
            AlertLevel::Red => "red",
        };
        f.write_str(name)
    }
}

/// Minimum AQI for each alert level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertThresholds {
    pub blue: u32,
    pub yellow: u32,
    pub orange: u32,
    pub red: u32,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        AlertThresholds {
            blue: 101,
            yellow: 151,
            orange: 201,
            red: 301,
        }
    }
}

impl AlertThresholds {
    /// Most severe level whose threshold `aqi` reaches.
    pub fn level_for(&self, aqi: u32) -> Option<AlertLevel> {
        if aqi >= self.red {
            Some(AlertLevel::Red)
        } else if aqi >= self.orange {
            Some(AlertLevel::Orange)
        } else if aqi >= self.yellow {
            Some(AlertLevel::Yellow)
        } else if aqi >= self.blue {
            Some(AlertLevel::Blue)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    #[serde(serialize_with = "dates::serialize_timestamp")]
    pub timestamp: NaiveDateTime,
    pub level: AlertLevel,
    pub aqi: u32,
    pub pm25: f64,
}

/// One alert per forecast point that reaches a level, in forecast order.
pub fn scan_forecast(points: &[ForecastPoint], thresholds: &AlertThresholds) -> Vec<Alert> {
    points
        .iter()
        .filter_map(|point| {
            thresholds.level_for(point.aqi).map(|level| Alert {
                timestamp: point.timestamp,
                level,
                aqi: point.aqi,
                pm25: point.pm25,
            })
        })
        .collect()
}
