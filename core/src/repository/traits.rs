use crate::model::series::{DailySeries, SeriesKind};
use anyhow::Result;

/// Source of historical daily series.
///
/// Implementations only hand out what they have. A gap inside a simulated
/// range is reported by the simulator, not here.
pub trait HistoricalSeriesProvider {
    fn get_series(&self, kind: SeriesKind) -> Result<DailySeries>;
}
