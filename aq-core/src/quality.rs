use serde::Serialize;
use std::fmt;

/// Discrete air quality category derived from AQI.
///
/// Variants are declared from least to most severe, so the derived `Ord`
/// is the severity order. On the wire the category is written with the
/// Chinese label used by the scraped source data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum QualityLevel {
    #[serde(rename = "优")]
    Good,
    #[serde(rename = "良")]
    Moderate,
    #[serde(rename = "轻度污染")]
    LightlyPolluted,
    #[serde(rename = "中度污染")]
    ModeratelyPolluted,
    #[serde(rename = "重度污染")]
    HeavilyPolluted,
    #[serde(rename = "严重污染")]
    SeverelyPolluted,
}

impl QualityLevel {
    pub const ALL: [QualityLevel; 6] = [
        QualityLevel::Good,
        QualityLevel::Moderate,
        QualityLevel::LightlyPolluted,
        QualityLevel::ModeratelyPolluted,
        QualityLevel::HeavilyPolluted,
        QualityLevel::SeverelyPolluted,
    ];

    /// Classify an AQI value. Upper bounds are inclusive:
    /// 50, 100, 150, 200, 300; anything above 300 is severe.
    pub fn classify(aqi: f64) -> Self {
        if aqi <= 50.0 {
            QualityLevel::Good
        } else if aqi <= 100.0 {
            QualityLevel::Moderate
        } else if aqi <= 150.0 {
            QualityLevel::LightlyPolluted
        } else if aqi <= 200.0 {
            QualityLevel::ModeratelyPolluted
        } else if aqi <= 300.0 {
            QualityLevel::HeavilyPolluted
        } else {
            QualityLevel::SeverelyPolluted
        }
    }

    /// Severity ordinal, 0 (good) through 5 (severely polluted).
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Label used in the source data.
    pub fn label(self) -> &'static str {
        match self {
            QualityLevel::Good => "优",
            QualityLevel::Moderate => "良",
            QualityLevel::LightlyPolluted => "轻度污染",
            QualityLevel::ModeratelyPolluted => "中度污染",
            QualityLevel::HeavilyPolluted => "重度污染",
            QualityLevel::SeverelyPolluted => "严重污染",
        }
    }
}

impl fmt::Display for QualityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QualityLevel::Good => "Good",
            QualityLevel::Moderate => "Moderate",
            QualityLevel::LightlyPolluted => "Lightly polluted",
            QualityLevel::ModeratelyPolluted => "Moderately polluted",
            QualityLevel::HeavilyPolluted => "Heavily polluted",
            QualityLevel::SeverelyPolluted => "Severely polluted",
        };
        f.write_str(name)
    }
}
