mod params;
mod report;

use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use minesim_core::config::{default_data_dir, API_KEY_ENV, DATA_DIR_ENV};
use minesim_core::{
    parse_day, AppConfig, FileSeriesProvider, HalvingSchedule, ProfitabilityUseCase,
    SeriesService, VendorDownloader,
};
use tracing::debug;

use crate::params::CalcRequest;
use crate::report::{write_report, OutputFormat};

#[derive(Parser)]
#[command(name = "minesim")]
#[command(about = "Historical Bitcoin mining profitability calculator", long_about = None)]
struct Cli {
    /// Directory holding the cached series and config.json (default: ~/.minesim)
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Simulate a miner (usage: calc hash:110 power:3250 elec:0.05 equip:2500 fee:0 start:2020-02-15 end:yesterday)
    Calc {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Parameters as key:value, keys may be abbreviated
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Download difficulty and price history into the data directory
    Fetch {
        /// Data vendor API key
        #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
        api_key: String,
    },
    /// Show the date range covered by the cached series
    Coverage,
    /// Show the block reward in effect on a date
    Reward {
        /// YYYY-MM-DD, today, yesterday or -Nd/-Nw/-Nm/-Ny
        date: String,
    },
    /// Print the effective configuration
    Config {
        /// Also write it to config.json in the data directory
        #[arg(long)]
        write: bool,
    },
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => default_data_dir()?,
    };
    debug!(data_dir = %data_dir.display(), "Resolved data directory");
    let config = AppConfig::load(&data_dir)?;

    match cli.command {
        Commands::Calc { format, output, args } => {
            let today = Local::now().date_naive();
            let request = CalcRequest::from_args(&args, &config, today)?;

            let service = SeriesService::new(FileSeriesProvider::new(Some(data_dir))?);
            let usecase = ProfitabilityUseCase::new(&service);
            let report = usecase.run(&request.range, &request.miner)?;

            write_report(&report, format, output.as_deref())?;
            if let Some(path) = output {
                eprintln!("Wrote {} days to {}", report.results.len(), path.display());
            }
        }
        Commands::Fetch { api_key } => {
            let store = FileSeriesProvider::new(Some(data_dir))?;
            let downloader = VendorDownloader::new(config.vendor.clone(), api_key)?;
            for series in downloader.refresh(&store)? {
                let coverage = minesim_core::SeriesCoverage::of(&series);
                println!(
                    "{:<10} {:>6} days  {} .. {}",
                    coverage.kind.to_string(),
                    coverage.points,
                    fmt_day(coverage.earliest),
                    fmt_day(coverage.latest)
                );
            }
        }
        Commands::Coverage => {
            let service = SeriesService::new(FileSeriesProvider::new(Some(data_dir))?);
            println!("{:<10} {:>6}  {:<10}   {:<10}  {}", "Series", "Days", "Earliest", "Latest", "Missing");
            println!("{:-<10} {:->6}  {:-<10}   {:-<10}  {:-<7}", "", "", "", "", "");
            for coverage in service.coverage()? {
                println!(
                    "{:<10} {:>6}  {:<10}   {:<10}  {}",
                    coverage.kind.to_string(),
                    coverage.points,
                    fmt_day(coverage.earliest),
                    fmt_day(coverage.latest),
                    coverage.missing_days()
                );
            }
        }
        Commands::Reward { date } => {
            let day = parse_day(&date)?;
            let reward = HalvingSchedule::bitcoin().reward_for(day)?;
            println!("{}: {} BTC per block", day, reward);
        }
        Commands::Config { write } => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            if write {
                let path = config.save(&data_dir)?;
                eprintln!("Saved to {}", path.display());
            }
        }
    }
    Ok(())
}

fn fmt_day(day: Option<chrono::NaiveDate>) -> String {
    day.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}
