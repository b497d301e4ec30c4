use std::collections::HashMap;

use anyhow::{anyhow, Result};

use crate::model::series::{DailySeries, SeriesKind, SeriesLookup};
use crate::repository::traits::HistoricalSeriesProvider;

/// Serves series that were built in memory.
#[derive(Clone, Default)]
pub struct InMemorySeriesProvider {
    series: HashMap<SeriesKind, DailySeries>,
}

impl InMemorySeriesProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, series: DailySeries) -> Self {
        self.series.insert(series.kind(), series);
        self
    }
}

impl HistoricalSeriesProvider for InMemorySeriesProvider {
    fn get_series(&self, kind: SeriesKind) -> Result<DailySeries> {
        self.series
            .get(&kind)
            .cloned()
            .ok_or_else(|| anyhow!("No {} series loaded", kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_serves_series_by_kind() {
        let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let price = DailySeries::from_points(SeriesKind::Price, vec![(date, 7200.0)]).unwrap();
        let provider = InMemorySeriesProvider::new().with_series(price);

        let loaded = provider.get_series(SeriesKind::Price).unwrap();
        assert_eq!(loaded.value_on(date), Some(7200.0));
        assert!(provider.get_series(SeriesKind::Difficulty).is_err());
    }
}
