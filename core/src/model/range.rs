use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::SimulationError;

/// Closed calendar-day interval, both ends included.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl SimulationRange {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Result<Self, SimulationError> {
        let range = Self { start_date, end_date };
        range.validate()?;
        Ok(range)
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.start_date > self.end_date {
            return Err(SimulationError::invalid(format!(
                "start date {} is after end date {}",
                self.start_date, self.end_date
            )));
        }
        Ok(())
    }

    /// Number of calendar days, counting both endpoints.
    pub fn len(&self) -> usize {
        ((self.end_date - self.start_date).num_days() + 1).max(0) as usize
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end_date;
        self.start_date.iter_days().take_while(move |d| *d <= end)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_len_counts_both_endpoints() {
        let single = SimulationRange::new(day(2021, 1, 1), day(2021, 1, 1)).unwrap();
        assert_eq!(single.len(), 1);

        // 2020 is a leap year
        let year = SimulationRange::new(day(2020, 1, 1), day(2020, 12, 31)).unwrap();
        assert_eq!(year.len(), 366);
        assert_eq!(year.days().count(), 366);
    }

    #[test]
    fn test_days_are_ascending_and_cross_month_boundaries() {
        let range = SimulationRange::new(day(2021, 2, 27), day(2021, 3, 2)).unwrap();
        let days: Vec<_> = range.days().collect();
        assert_eq!(
            days,
            vec![day(2021, 2, 27), day(2021, 2, 28), day(2021, 3, 1), day(2021, 3, 2)]
        );
        assert!(range.contains(day(2021, 3, 1)));
        assert!(!range.contains(day(2021, 3, 3)));
    }

    #[test]
    fn test_inverted_range_is_invalid() {
        let err = SimulationRange::new(day(2021, 1, 2), day(2021, 1, 1)).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidParameter(_)));
    }
}
