//! Reproducible randomness keyed by entity name and calendar date.
//!
//! Every (entity, date) pair gets its own generator, so a city-day always
//! sees the same draws no matter which worker runs it or in what order.

use aq_utils::dates;
use chrono::NaiveDate;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Independent draw sequences derived from the same (entity, date) seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Aqi,
    Pm25,
    Fallback,
}

impl Stream {
    fn id(self) -> u64 {
        match self {
            Stream::Aqi => 0,
            Stream::Pm25 => 1,
            Stream::Fallback => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterministicRandomSource {
    entity: String,
    date: NaiveDate,
}

impl DeterministicRandomSource {
    pub fn new(entity: &str, date: NaiveDate) -> Self {
        DeterministicRandomSource {
            entity: entity.to_string(),
            date,
        }
    }

    /// Sum of the entity's character codes plus the date as YYYYMMDD.
    pub fn seed(&self) -> u64 {
        let char_sum: u64 = self.entity.chars().map(|c| u64::from(u32::from(c))).sum();
        char_sum.wrapping_add(dates::date_key(&self.date) as u64)
    }

    pub fn rng(&self, stream: Stream) -> ChaCha8Rng {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed());
        rng.set_stream(stream.id());
        rng
    }
}
