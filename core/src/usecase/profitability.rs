use crate::model::miner::MinerConfig;
use crate::model::range::SimulationRange;
use crate::repository::HistoricalSeriesProvider;
use crate::service::dto::SimulationReport;
use crate::service::series_service::SeriesService;
use crate::service::simulator::MiningSimulator;
use anyhow::Result;
use tracing::info;

/// Loads the historical series and runs one simulation over them.
pub struct ProfitabilityUseCase<'a, P: HistoricalSeriesProvider> {
    series_service: &'a SeriesService<P>,
    simulator: MiningSimulator,
}

impl<'a, P: HistoricalSeriesProvider> ProfitabilityUseCase<'a, P> {
    pub fn new(series_service: &'a SeriesService<P>) -> Self {
        Self {
            series_service,
            simulator: MiningSimulator::default(),
        }
    }

    pub fn with_simulator(series_service: &'a SeriesService<P>, simulator: MiningSimulator) -> Self {
        Self {
            series_service,
            simulator,
        }
    }

    /// Simulator failures come back as `SimulationError` inside the
    /// `anyhow::Error`, untouched.
    pub fn run(&self, range: &SimulationRange, miner: &MinerConfig) -> Result<SimulationReport> {
        // Fail on bad input before touching the data source.
        miner.validate()?;
        range.validate()?;

        let (difficulty, price) = self.series_service.load_pair()?;
        let results = self.simulator.simulate(range, miner, &difficulty, &price)?;
        let report = SimulationReport::new(*range, *miner, results);

        if let Some(summary) = &report.summary {
            info!(
                days = summary.days,
                cumulative_usd = summary.final_cumulative_profit_usd,
                hold_usd = summary.final_hold_value_usd,
                leader = ?summary.leader,
                "Simulation finished"
            );
        }
        Ok(report)
    }
}
