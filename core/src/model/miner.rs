use serde::{Deserialize, Serialize};

use crate::error::SimulationError;

pub const HASHES_PER_TERAHASH: f64 = 1e12;

/// Miner and economic parameters for one simulation run.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct MinerConfig {
    pub hashrate_hs: f64,
    pub power_w: f64,
    pub electricity_usd_per_kwh: f64,
    pub equipment_cost_usd: f64,
    pub pool_fee_pct: f64,
}

impl MinerConfig {
    /// Builds a validated config from the units users type: hashrate in
    /// TH/s, everything else as-is.
    pub fn from_user_units(
        hashrate_ths: f64,
        power_w: f64,
        electricity_usd_per_kwh: f64,
        equipment_cost_usd: f64,
        pool_fee_pct: f64,
    ) -> Result<Self, SimulationError> {
        let config = Self {
            hashrate_hs: hashrate_ths * HASHES_PER_TERAHASH,
            power_w,
            electricity_usd_per_kwh,
            equipment_cost_usd,
            pool_fee_pct,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        let fields = [
            ("hashrate", self.hashrate_hs),
            ("power", self.power_w),
            ("electricity cost", self.electricity_usd_per_kwh),
            ("equipment cost", self.equipment_cost_usd),
            ("pool fee", self.pool_fee_pct),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(SimulationError::invalid(format!(
                "{} must be a finite number, got {}",
                name, value
            )));
        }

        let positive = [
            ("hashrate", self.hashrate_hs),
            ("power", self.power_w),
            ("equipment cost", self.equipment_cost_usd),
        ];
        if let Some((name, value)) = positive.iter().find(|(_, v)| *v <= 0.0) {
            return Err(SimulationError::invalid(format!(
                "{} must be positive, got {}",
                name, value
            )));
        }
        if self.electricity_usd_per_kwh < 0.0 {
            return Err(SimulationError::invalid(format!(
                "electricity cost must not be negative, got {}",
                self.electricity_usd_per_kwh
            )));
        }
        if !(0.0..100.0).contains(&self.pool_fee_pct) {
            return Err(SimulationError::invalid(format!(
                "pool fee must be in [0, 100), got {}",
                self.pool_fee_pct
            )));
        }
        Ok(())
    }

    pub fn hashrate_ths(&self) -> f64 {
        self.hashrate_hs / HASHES_PER_TERAHASH
    }

    /// Electricity bill for one full day of operation.
    pub fn daily_power_cost_usd(&self) -> f64 {
        (self.power_w / 1000.0) * self.electricity_usd_per_kwh * 24.0
    }
}
