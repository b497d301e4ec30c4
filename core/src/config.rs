use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SimulationError;
use crate::model::miner::MinerConfig;

pub const DATA_DIR_ENV: &str = "MINESIM_HOME";
pub const API_KEY_ENV: &str = "QUANDL_API_KEY";
const CONFIG_FILE_NAME: &str = "config.json";

/// `$MINESIM_HOME`, or `~/.minesim` when unset.
pub fn default_data_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let home_dir = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(home_dir.join(".minesim"))
}

/// Parameters used for any key the user leaves out of `calc`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct MinerDefaults {
    pub hashrate_ths: f64,
    pub electricity_usd_per_kwh: f64,
    pub power_w: f64,
    pub equipment_cost_usd: f64,
    pub pool_fee_pct: f64,
}

impl Default for MinerDefaults {
    fn default() -> Self {
        Self {
            hashrate_ths: 110.0,
            electricity_usd_per_kwh: 0.05,
            power_w: 3250.0,
            equipment_cost_usd: 2500.0,
            pool_fee_pct: 0.0,
        }
    }
}

impl MinerDefaults {
    pub fn to_miner_config(&self) -> Result<MinerConfig, SimulationError> {
        MinerConfig::from_user_units(
            self.hashrate_ths,
            self.power_w,
            self.electricity_usd_per_kwh,
            self.equipment_cost_usd,
            self.pool_fee_pct,
        )
    }
}

/// Dataset endpoints. `{api_key}` is replaced at request time.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct VendorConfig {
    pub difficulty_url: String,
    pub price_url: String,
}

impl Default for VendorConfig {
    fn default() -> Self {
        Self {
            difficulty_url: "https://www.quandl.com/api/v3/datasets/BCHAIN/DIFF.csv?api_key={api_key}"
                .to_string(),
            price_url: "https://www.quandl.com/api/v3/datasets/BCHAIN/MKPRU.csv?api_key={api_key}"
                .to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub miner: MinerDefaults,
    pub default_start: NaiveDate,
    pub vendor: VendorConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            miner: MinerDefaults::default(),
            default_start: NaiveDate::from_ymd_opt(2020, 2, 15).unwrap_or_default(),
            vendor: VendorConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn path_in(data_dir: &Path) -> PathBuf {
        data_dir.join(CONFIG_FILE_NAME)
    }

    /// Reads `config.json` from `data_dir`. A missing file means defaults,
    /// missing fields inside the file fall back to defaults too.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = Self::path_in(data_dir);
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config in {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self, data_dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(data_dir)?;
        let path = Self::path_in(data_dir);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(path)
    }
}
