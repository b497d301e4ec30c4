use std::collections::HashMap;
use std::fmt;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    Difficulty,
    Price,
}

impl SeriesKind {
    pub const ALL: [SeriesKind; 2] = [SeriesKind::Difficulty, SeriesKind::Price];

    /// File name of this series inside the data directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            SeriesKind::Difficulty => "difficulty.csv",
            SeriesKind::Price => "price.csv",
        }
    }
}

impl fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesKind::Difficulty => write!(f, "difficulty"),
            SeriesKind::Price => write!(f, "price"),
        }
    }
}

/// Date lookup the simulator depends on.
///
/// `value_on` returns `None` for a day without an observation. Values must
/// be finite and positive; the simulator rejects anything else with
/// `InvalidParameter`.
pub trait SeriesLookup {
    fn kind(&self) -> SeriesKind;
    fn value_on(&self, date: NaiveDate) -> Option<f64>;
}

/// Both series joined for one calendar day.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct DailyObservation {
    pub date: NaiveDate,
    pub difficulty: f64,
    pub price_usd: f64,
}

/// One date-indexed series. Every value is finite and positive.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySeries {
    kind: SeriesKind,
    values: HashMap<NaiveDate, f64>,
    earliest: Option<NaiveDate>,
    latest: Option<NaiveDate>,
}

impl DailySeries {
    pub fn new(kind: SeriesKind) -> Self {
        Self {
            kind,
            values: HashMap::new(),
            earliest: None,
            latest: None,
        }
    }

    pub fn from_points<I>(kind: SeriesKind, points: I) -> Result<Self>
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        let mut series = Self::new(kind);
        for (date, value) in points {
            series.insert(date, value)?;
        }
        Ok(series)
    }

    /// Adds one observation. Re-inserting the same value for a date is a
    /// no-op, a different value for an existing date is an error.
    pub fn insert(&mut self, date: NaiveDate, value: f64) -> Result<()> {
        if !value.is_finite() || value <= 0.0 {
            return Err(anyhow!(
                "{} on {} must be a positive number, got {}",
                self.kind,
                date,
                value
            ));
        }
        if let Some(existing) = self.values.get(&date) {
            if *existing != value {
                return Err(anyhow!(
                    "Conflicting {} values for {}: {} vs {}",
                    self.kind,
                    date,
                    existing,
                    value
                ));
            }
            return Ok(());
        }
        self.values.insert(date, value);
        self.earliest = Some(self.earliest.map_or(date, |d| d.min(date)));
        self.latest = Some(self.latest.map_or(date, |d| d.max(date)));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn earliest(&self) -> Option<NaiveDate> {
        self.earliest
    }

    pub fn latest(&self) -> Option<NaiveDate> {
        self.latest
    }

    /// Points sorted by date, oldest first.
    pub fn sorted_points(&self) -> Vec<(NaiveDate, f64)> {
        let mut points: Vec<_> = self.values.iter().map(|(d, v)| (*d, *v)).collect();
        points.sort_by_key(|(d, _)| *d);
        points
    }
}

impl SeriesLookup for DailySeries {
    fn kind(&self) -> SeriesKind {
        self.kind
    }

    fn value_on(&self, date: NaiveDate) -> Option<f64> {
        self.values.get(&date).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 1, d).unwrap()
    }

    #[test]
    fn test_coverage_tracks_extremes_regardless_of_order() {
        let series = DailySeries::from_points(
            SeriesKind::Price,
            vec![(day(5), 3.0), (day(2), 1.0), (day(9), 2.0)],
        )
        .unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.earliest(), Some(day(2)));
        assert_eq!(series.latest(), Some(day(9)));
        assert_eq!(series.value_on(day(5)), Some(3.0));
        assert_eq!(series.value_on(day(6)), None);
        assert_eq!(series.sorted_points()[0], (day(2), 1.0));
    }

    #[test]
    fn test_rejects_non_positive_and_conflicting_values() {
        let mut series = DailySeries::new(SeriesKind::Difficulty);
        assert!(series.insert(day(1), 0.0).is_err());
        assert!(series.insert(day(1), -4.0).is_err());
        assert!(series.insert(day(1), f64::NAN).is_err());

        series.insert(day(1), 10.0).unwrap();
        series.insert(day(1), 10.0).unwrap();
        assert!(series.insert(day(1), 11.0).is_err());
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn test_empty_series_has_no_coverage() {
        let series = DailySeries::new(SeriesKind::Price);
        assert!(series.is_empty());
        assert_eq!(series.earliest(), None);
        assert_eq!(series.latest(), None);
    }
}
