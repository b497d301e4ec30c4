use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Outcome of one simulated day.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct DailyResult {
    pub date: NaiveDate,
    pub price_usd: f64,
    pub reward_btc: f64,
    /// Coin mined after the pool fee.
    pub mined_btc: f64,
    pub mined_usd_value: f64,
    /// Mined value minus the day's electricity bill.
    pub profit_usd: f64,
    pub cumulative_profit_usd: f64,
    pub hold_value_usd: f64,
}
