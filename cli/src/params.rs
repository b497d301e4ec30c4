use std::collections::HashMap;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use minesim_core::{
    last_complete_day, normalize_params, parse_args, parse_day_from, AppConfig, MinerConfig,
    SimulationError, SimulationRange,
};

pub const CALC_KEYS: [&str; 7] = [
    "hashrate",
    "electricity",
    "power",
    "equipment",
    "fee",
    "start",
    "end",
];

/// Everything `calc` needs, resolved against the configured defaults.
#[derive(Debug, PartialEq)]
pub struct CalcRequest {
    pub range: SimulationRange,
    pub miner: MinerConfig,
}

impl CalcRequest {
    pub fn from_args(args: &[String], config: &AppConfig, today: NaiveDate) -> Result<Self> {
        let parsed = parse_args(args);
        if !parsed.positional.is_empty() {
            return Err(anyhow!(
                "Unexpected argument(s): {} (expected key:value, keys: {})",
                parsed.positional.join(" "),
                CALC_KEYS.join(", ")
            ));
        }
        let params = normalize_params(parsed.params, &CALC_KEYS)?;
        let defaults = &config.miner;

        let miner = MinerConfig::from_user_units(
            number(&params, "hashrate", defaults.hashrate_ths)?,
            number(&params, "power", defaults.power_w)?,
            number(&params, "electricity", defaults.electricity_usd_per_kwh)?,
            number(&params, "equipment", defaults.equipment_cost_usd)?,
            number(&params, "fee", defaults.pool_fee_pct)?,
        )?;

        let start = date(&params, "start", today)?.unwrap_or(config.default_start);
        let end = date(&params, "end", today)?.unwrap_or_else(|| last_complete_day(today));
        let range = SimulationRange::new(start, end)?;

        Ok(Self { range, miner })
    }
}

fn number(params: &HashMap<String, String>, key: &str, default: f64) -> Result<f64> {
    match params.get(key) {
        Some(raw) => {
            // Allow "2.5%" for the fee
            let cleaned = raw.trim().trim_end_matches('%');
            cleaned.parse::<f64>().map_err(|_| {
                anyhow::Error::from(SimulationError::invalid(format!(
                    "{} must be a number, got '{}'",
                    key, raw
                )))
            })
        }
        None => Ok(default),
    }
}

fn date(params: &HashMap<String, String>, key: &str, today: NaiveDate) -> Result<Option<NaiveDate>> {
    params
        .get(key)
        .map(|raw| {
            parse_day_from(raw, today)
                .map_err(|e| anyhow::Error::from(SimulationError::invalid(format!("{}: {}", key, e))))
        })
        .transpose()
}
