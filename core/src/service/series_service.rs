use crate::model::series::{DailySeries, SeriesKind, SeriesLookup};
use crate::repository::HistoricalSeriesProvider;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// What a provider can currently offer for one series.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SeriesCoverage {
    pub kind: SeriesKind,
    pub points: usize,
    pub earliest: Option<NaiveDate>,
    pub latest: Option<NaiveDate>,
}

impl SeriesCoverage {
    pub fn of(series: &DailySeries) -> Self {
        Self {
            kind: series.kind(),
            points: series.len(),
            earliest: series.earliest(),
            latest: series.latest(),
        }
    }

    /// Days between earliest and latest with no observation.
    pub fn missing_days(&self) -> usize {
        match (self.earliest, self.latest) {
            (Some(first), Some(last)) => {
                let span = (last - first).num_days() as usize + 1;
                span.saturating_sub(self.points)
            }
            _ => 0,
        }
    }
}

pub struct SeriesService<P: HistoricalSeriesProvider> {
    provider: P,
}

impl<P: HistoricalSeriesProvider> SeriesService<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn load(&self, kind: SeriesKind) -> Result<DailySeries> {
        let series = self
            .provider
            .get_series(kind)
            .with_context(|| format!("Could not load {} series", kind))?;
        if series.kind() != kind {
            anyhow::bail!("Provider returned a {} series when asked for {}", series.kind(), kind);
        }
        Ok(series)
    }

    /// Difficulty and price, in that order.
    pub fn load_pair(&self) -> Result<(DailySeries, DailySeries)> {
        Ok((self.load(SeriesKind::Difficulty)?, self.load(SeriesKind::Price)?))
    }

    pub fn coverage(&self) -> Result<Vec<SeriesCoverage>> {
        SeriesKind::ALL
            .iter()
            .map(|kind| self.load(*kind).map(|s| SeriesCoverage::of(&s)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemorySeriesProvider;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 8, d).unwrap()
    }

    #[test]
    fn test_coverage_counts_holes() {
        let difficulty = DailySeries::from_points(
            SeriesKind::Difficulty,
            vec![(day(1), 1.0), (day(2), 1.0), (day(5), 1.0)],
        )
        .unwrap();
        let price = DailySeries::from_points(SeriesKind::Price, vec![(day(3), 20_000.0)]).unwrap();
        let service = SeriesService::new(
            InMemorySeriesProvider::new().with_series(difficulty).with_series(price),
        );

        let coverage = service.coverage().unwrap();
        assert_eq!(coverage.len(), 2);
        assert_eq!(coverage[0].kind, SeriesKind::Difficulty);
        assert_eq!(coverage[0].earliest, Some(day(1)));
        assert_eq!(coverage[0].latest, Some(day(5)));
        assert_eq!(coverage[0].missing_days(), 2);
        assert_eq!(coverage[1].missing_days(), 0);
    }

    #[test]
    fn test_load_pair_fails_when_one_series_is_absent() {
        let price = DailySeries::from_points(SeriesKind::Price, vec![(day(3), 20_000.0)]).unwrap();
        let service = SeriesService::new(InMemorySeriesProvider::new().with_series(price));
        let err = service.load_pair().unwrap_err();
        assert!(err.to_string().contains("difficulty"));
    }
}
