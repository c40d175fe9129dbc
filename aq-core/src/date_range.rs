use chrono::NaiveDate;

/// Every calendar date from the first through the last (inclusive).
///
/// An inverted range yields nothing.
#[derive(Clone, Eq, PartialEq, Copy, Debug)]
pub struct DateRange {
    pub first: NaiveDate,
    pub last: NaiveDate,
}

impl DateRange {
    pub fn new(first: NaiveDate, last: NaiveDate) -> Self {
        DateRange { first, last }
    }

    /// Number of dates the range yields.
    pub fn days(&self) -> usize {
        let span = (self.last - self.first).num_days();
        if span < 0 {
            0
        } else {
            span as usize + 1
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> {
        self.first.iter_days().take(self.days())
    }
}
