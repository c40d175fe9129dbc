//! Daily curve synthesis: one baseline value in, 24 hourly values out.

use crate::config::SynthesisConfig;
use crate::pattern::hour_factors;
use crate::random::{DeterministicRandomSource, Stream};
use crate::spline::CyclicSpline;
use crate::{DailyCurve, HOURS_PER_DAY};
use aq_core::season::{DayType, Season};
use aq_core::{AqError, Result};
use aq_utils::range;
use chrono::NaiveDate;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Calendar facts that select the hourly profile for a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayContext {
    pub date: NaiveDate,
    pub day_type: DayType,
    pub season: Season,
}

impl DayContext {
    pub fn for_date(date: NaiveDate) -> Self {
        DayContext {
            date,
            day_type: DayType::from_date(&date),
            season: Season::from_date(&date),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DailyCurveSynthesizer {
    config: SynthesisConfig,
    noise: Normal<f64>,
}

impl DailyCurveSynthesizer {
    pub fn new(config: SynthesisConfig) -> Result<Self> {
        config.validate()?;
        let noise = Normal::new(1.0, config.noise_std_dev)
            .map_err(|e| AqError::Config(format!("noise distribution: {e}")))?;
        Ok(DailyCurveSynthesizer { config, noise })
    }

    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    /// Synthesize one day from its baseline.
    ///
    /// Steps, in order: profile factors times baseline, cyclic spline
    /// sampled on the hour, blend of the first hours into the previous
    /// day's tail, multiplicative noise, persistence blend with the
    /// previous day, clip. Always returns 24 finite values for finite input.
    pub fn synthesize_day<R: Rng + ?Sized>(
        &self,
        base_value: f64,
        day: &DayContext,
        previous: Option<&DailyCurve>,
        rng: &mut R,
    ) -> DailyCurve {
        let factors = hour_factors(day.day_type, day.season);
        let mut coarse = [0.0; HOURS_PER_DAY];
        for (value, factor) in coarse.iter_mut().zip(factors) {
            *value = factor * base_value;
        }

        let mut curve = CyclicSpline::fit(&coarse).sample_hours();

        if let Some(prev) = previous {
            let carry = self.config.boundary_carry;
            curve[0] = prev[HOURS_PER_DAY - 1] * carry + curve[0] * (1.0 - carry);
            let ramp = self.config.ramp_carry;
            for hour in 1..=self.config.ramp_hours {
                curve[hour] = curve[hour - 1] * ramp + curve[hour] * (1.0 - ramp);
            }
        }

        for value in curve.iter_mut() {
            *value *= self.noise.sample(rng);
        }

        // Noise first, then persistence.
        if let Some(prev) = previous {
            let p = self.config.persistence;
            for (value, yesterday) in curve.iter_mut().zip(prev) {
                *value = yesterday * p + *value * (1.0 - p);
            }
        }

        for value in curve.iter_mut() {
            *value = range::clip(*value, self.config.value_min, self.config.value_max);
        }
        curve
    }

    /// [`Self::synthesize_day`] with the generator derived from
    /// (`entity`, `day.date`) and `stream`.
    pub fn synthesize_day_for(
        &self,
        entity: &str,
        stream: Stream,
        base_value: f64,
        day: &DayContext,
        previous: Option<&DailyCurve>,
    ) -> DailyCurve {
        let mut rng = DeterministicRandomSource::new(entity, day.date).rng(stream);
        self.synthesize_day(base_value, day, previous, &mut rng)
    }
}
