use crate::series::Synthesis;
use crate::HOURS_PER_DAY;
use aq_core::quality::QualityLevel;
use aq_core::season::DayType;
use log::info;
use std::collections::{BTreeMap, BTreeSet};

/// Aggregate view of a synthesis run, for logging.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub rows: usize,
    pub cities: usize,
    pub days: usize,
    pub carried_forward: usize,
    /// Mean AQI per hour over workdays; `None` when no workday was produced.
    pub workday_profile: Option<[f64; HOURS_PER_DAY]>,
    pub weekend_profile: Option<[f64; HOURS_PER_DAY]>,
    pub quality_counts: BTreeMap<QualityLevel, usize>,
}

impl RunSummary {
    pub fn from_synthesis(synthesis: &Synthesis) -> Self {
        let mut sums = [[0.0; HOURS_PER_DAY]; 2];
        let mut counts = [[0usize; HOURS_PER_DAY]; 2];
        let mut cities = BTreeSet::new();
        let mut quality_counts = BTreeMap::new();

        for point in &synthesis.points {
            let slot = usize::from(DayType::from_date(&point.date()).is_weekend());
            let hour = point.hour() as usize;
            sums[slot][hour] += point.aqi();
            counts[slot][hour] += 1;
            cities.insert(point.city());
            *quality_counts.entry(point.quality_level()).or_insert(0) += 1;
        }

        let profile = |slot: usize| -> Option<[f64; HOURS_PER_DAY]> {
            if counts[slot].iter().any(|c| *c == 0) {
                return None;
            }
            let mut means = [0.0; HOURS_PER_DAY];
            for (hour, mean) in means.iter_mut().enumerate() {
                *mean = sums[slot][hour] / counts[slot][hour] as f64;
            }
            Some(means)
        };

        RunSummary {
            rows: synthesis.points.len(),
            cities: cities.len(),
            days: synthesis.days,
            carried_forward: synthesis.carried_forward,
            workday_profile: profile(0),
            weekend_profile: profile(1),
            quality_counts,
        }
    }

    pub fn log(&self) {
        info!(
            "Synthesized {} hourly rows for {} cities over {} city-days ({} carried forward)",
            self.rows, self.cities, self.days, self.carried_forward
        );
        let profiles = [
            ("workday", &self.workday_profile),
            ("weekend", &self.weekend_profile),
        ];
        for (label, profile) in profiles {
            if let Some(means) = profile {
                let formatted: Vec<String> = means.iter().map(|m| format!("{m:.0}")).collect();
                info!("Mean AQI by hour ({}): {}", label, formatted.join(" "));
            }
        }
        for level in QualityLevel::ALL {
            let count = self.quality_counts.get(&level).copied().unwrap_or(0);
            info!("  {} ({}): {} rows", level, level.label(), count);
        }
    }
}
