pub mod config;
pub mod error;
pub mod model;
pub mod repository;
pub mod input;
pub mod time;
pub mod service;
pub mod usecase;

pub use config::{AppConfig, MinerDefaults, VendorConfig};
pub use error::SimulationError;
pub use model::halving::{HalvingSchedule, RewardEpoch};
pub use model::miner::MinerConfig;
pub use model::range::SimulationRange;
pub use model::result::DailyResult;
pub use model::series::{DailyObservation, DailySeries, SeriesKind, SeriesLookup};
pub use repository::{HistoricalSeriesProvider, FileSeriesProvider, InMemorySeriesProvider, VendorDownloader};
pub use input::{parse_args, expand_key, normalize_params, ParsedInput};
pub use time::{parse_day, parse_day_from, last_complete_day};
pub use service::dto::{SimulationReport, SimulationSummary, Strategy};
pub use service::series_service::{SeriesCoverage, SeriesService};
pub use service::simulator::{simulate, MiningSimulator};
pub use usecase::profitability::ProfitabilityUseCase;
