use aq_core::{AqError, Result};
use aq_utils::range;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Numeric knobs of the daily curve synthesizer.
///
/// Missing keys in a JSON file take their default, e.g.
/// ```text
/// { "persistence": 0.5, "noise_std_dev": 0.02 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SynthesisConfig {
    /// Weight of the previous day's curve in the final blend.
    pub persistence: f64,
    /// Standard deviation of the multiplicative per-hour noise (mean 1.0).
    pub noise_std_dev: f64,
    /// Weight of the previous day's hour 23 when forming hour 0.
    pub boundary_carry: f64,
    /// Weight of the preceding hour across the ramp after midnight.
    pub ramp_carry: f64,
    /// Number of hours after hour 0 that are ramped.
    pub ramp_hours: usize,
    pub value_min: f64,
    pub value_max: f64,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        SynthesisConfig {
            persistence: 0.7,
            noise_std_dev: 0.03,
            boundary_carry: 0.7,
            ramp_carry: 0.6,
            ramp_hours: 3,
            value_min: range::VALUE_MIN,
            value_max: range::VALUE_MAX,
        }
    }
}

impl SynthesisConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: SynthesisConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        SynthesisConfig::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        let weights = [
            ("persistence", self.persistence),
            ("boundary_carry", self.boundary_carry),
            ("ramp_carry", self.ramp_carry),
        ];
        for (name, weight) in weights {
            if !(0.0..=1.0).contains(&weight) {
                return Err(AqError::Config(format!("{name} must be within [0, 1], got {weight}")));
            }
        }
        if !self.noise_std_dev.is_finite() || self.noise_std_dev < 0.0 {
            return Err(AqError::Config(format!(
                "noise_std_dev must be a non-negative number, got {}",
                self.noise_std_dev
            )));
        }
        if self.ramp_hours >= crate::HOURS_PER_DAY {
            return Err(AqError::Config(format!(
                "ramp_hours must be below {}, got {}",
                crate::HOURS_PER_DAY,
                self.ramp_hours
            )));
        }
        let finite = self.value_min.is_finite() && self.value_max.is_finite();
        if !finite || self.value_min >= self.value_max {
            return Err(AqError::Config(format!(
                "value range [{}, {}] is empty",
                self.value_min, self.value_max
            )));
        }
        Ok(())
    }
}
