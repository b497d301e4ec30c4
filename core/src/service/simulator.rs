use chrono::NaiveDate;
use tracing::debug;

use crate::error::SimulationError;
use crate::model::halving::HalvingSchedule;
use crate::model::miner::MinerConfig;
use crate::model::range::SimulationRange;
use crate::model::result::DailyResult;
use crate::model::series::{DailyObservation, SeriesKind, SeriesLookup};

pub const SECONDS_PER_DAY: f64 = 86_400.0;
/// Expected hashes per share at difficulty 1 (2^32).
pub const DIFFICULTY_NORMALIZATION: f64 = 4_294_967_296.0;

/// Coin mined in one day after the pool takes its cut.
pub fn mined_btc(hashrate_hs: f64, reward_btc: f64, difficulty: f64, pool_fee_pct: f64) -> f64 {
    let gross = hashrate_hs * reward_btc * SECONDS_PER_DAY / (difficulty * DIFFICULTY_NORMALIZATION);
    gross * (1.0 - pool_fee_pct / 100.0)
}

/// Equipment budget converted to coin at the range start and never sold.
/// The pool fee does not touch it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoldBaseline {
    pub equipment_cost_usd: f64,
    pub start_price_usd: f64,
}

impl HoldBaseline {
    pub fn new(equipment_cost_usd: f64, start_price_usd: f64) -> Self {
        Self {
            equipment_cost_usd,
            start_price_usd,
        }
    }

    pub fn hold_btc(&self) -> f64 {
        self.equipment_cost_usd / self.start_price_usd
    }

    /// Scaled by the price ratio so the start day returns the equipment cost
    /// bit-for-bit.
    pub fn value_at(&self, price_usd: f64) -> f64 {
        self.equipment_cost_usd * (price_usd / self.start_price_usd)
    }
}

/// Looks up both series for `date`. A missing value is a gap, a value that
/// is not finite and positive is rejected.
pub fn observe<D, P>(date: NaiveDate, difficulty: &D, price: &P) -> Result<DailyObservation, SimulationError>
where
    D: SeriesLookup + ?Sized,
    P: SeriesLookup + ?Sized,
{
    let difficulty_value = lookup(difficulty, SeriesKind::Difficulty, date)?;
    let price_value = lookup(price, SeriesKind::Price, date)?;
    Ok(DailyObservation {
        date,
        difficulty: difficulty_value,
        price_usd: price_value,
    })
}

fn lookup<S>(series: &S, kind: SeriesKind, date: NaiveDate) -> Result<f64, SimulationError>
where
    S: SeriesLookup + ?Sized,
{
    let value = series
        .value_on(date)
        .ok_or(SimulationError::DataGap { kind, date })?;
    if !value.is_finite() || value <= 0.0 {
        return Err(SimulationError::invalid(format!(
            "{} on {} must be a positive number, got {}",
            kind, date, value
        )));
    }
    Ok(value)
}

/// One day of the run. Pure: everything it needs comes in as arguments.
pub fn step(
    miner: &MinerConfig,
    hold: &HoldBaseline,
    reward_btc: f64,
    observation: &DailyObservation,
    prior_cumulative_usd: f64,
) -> DailyResult {
    let mined = mined_btc(
        miner.hashrate_hs,
        reward_btc,
        observation.difficulty,
        miner.pool_fee_pct,
    );
    let mined_usd_value = mined * observation.price_usd;
    let profit_usd = mined_usd_value - miner.daily_power_cost_usd();

    DailyResult {
        date: observation.date,
        price_usd: observation.price_usd,
        reward_btc,
        mined_btc: mined,
        mined_usd_value,
        profit_usd,
        cumulative_profit_usd: prior_cumulative_usd + profit_usd,
        hold_value_usd: hold.value_at(observation.price_usd),
    }
}

#[derive(Debug, Clone, Default)]
pub struct MiningSimulator {
    schedule: HalvingSchedule,
}

impl MiningSimulator {
    pub fn new(schedule: HalvingSchedule) -> Self {
        Self { schedule }
    }

    pub fn schedule(&self) -> &HalvingSchedule {
        &self.schedule
    }

    /// Simulates every day of `range`, oldest first.
    ///
    /// Parameters and the reward window are checked before any series
    /// lookup. A missing observation on any day fails the whole run.
    pub fn simulate<D, P>(
        &self,
        range: &SimulationRange,
        miner: &MinerConfig,
        difficulty: &D,
        price: &P,
    ) -> Result<Vec<DailyResult>, SimulationError>
    where
        D: SeriesLookup + ?Sized,
        P: SeriesLookup + ?Sized,
    {
        miner.validate()?;
        range.validate()?;
        if range.start_date < self.schedule.earliest() {
            return Err(SimulationError::UnsupportedDate {
                date: range.start_date,
                earliest: self.schedule.earliest(),
            });
        }
        if difficulty.kind() != SeriesKind::Difficulty || price.kind() != SeriesKind::Price {
            return Err(SimulationError::invalid(format!(
                "expected difficulty and price series, got {} and {}",
                difficulty.kind(),
                price.kind()
            )));
        }

        debug!(
            start = %range.start_date,
            end = %range.end_date,
            days = range.len(),
            hashrate_ths = miner.hashrate_ths(),
            "Starting mining simulation"
        );

        let first = observe(range.start_date, difficulty, price)?;
        let hold = HoldBaseline::new(miner.equipment_cost_usd, first.price_usd);

        // Not pre-sized: the range length is user input
        let mut results = Vec::new();
        range.days().try_fold(0.0, |prior, date| {
            let reward = self.schedule.reward_for(date)?;
            let observation = observe(date, difficulty, price)?;
            let day = step(miner, &hold, reward, &observation, prior);
            results.push(day);
            Ok::<f64, SimulationError>(day.cumulative_profit_usd)
        })?;

        Ok(results)
    }
}

/// Runs the simulation with the Bitcoin halving schedule.
pub fn simulate<D, P>(
    range: &SimulationRange,
    miner: &MinerConfig,
    difficulty: &D,
    price: &P,
) -> Result<Vec<DailyResult>, SimulationError>
where
    D: SeriesLookup + ?Sized,
    P: SeriesLookup + ?Sized,
{
    MiningSimulator::default().simulate(range, miner, difficulty, price)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mined_btc_matches_reference_formula() {
        let d = 16_104_807_485_529.38;
        let expected = 110e12 * 6.25 * 86400.0 / (d * 2f64.powi(32));
        assert_eq!(mined_btc(110e12, 6.25, d, 0.0), expected);
    }

    #[test]
    fn test_mined_btc_is_linear_in_hashrate() {
        let single = mined_btc(50e12, 12.5, 7e12, 2.5);
        let double = mined_btc(100e12, 12.5, 7e12, 2.5);
        assert!((double - 2.0 * single).abs() <= 1e-15 * double);
    }

    #[test]
    fn test_pool_fee_boundaries() {
        let free = mined_btc(110e12, 6.25, 1e13, 0.0);
        let gross = 110e12 * 6.25 * SECONDS_PER_DAY / (1e13 * DIFFICULTY_NORMALIZATION);
        assert_eq!(free, gross);
        assert_eq!(mined_btc(110e12, 6.25, 1e13, 100.0), 0.0);

        let taxed = mined_btc(110e12, 6.25, 1e13, 4.0);
        assert!((taxed - gross * 0.96).abs() < 1e-15);
    }

    #[test]
    fn test_hold_baseline_starts_at_equipment_cost() {
        let hold = HoldBaseline::new(2500.0, 9_123.37);
        assert_eq!(hold.value_at(9_123.37), 2500.0);
        assert!((hold.value_at(2.0 * 9_123.37) - 5000.0).abs() < 1e-9);
        assert!((hold.hold_btc() - 2500.0 / 9_123.37).abs() < 1e-15);
    }

    #[test]
    fn test_step_carries_prior_cumulative() {
        let miner = MinerConfig::from_user_units(110.0, 3250.0, 0.05, 2500.0, 0.0).unwrap();
        let hold = HoldBaseline::new(2500.0, 10_000.0);
        let observation = DailyObservation {
            date: NaiveDate::from_ymd_opt(2020, 6, 1).unwrap(),
            difficulty: 15e12,
            price_usd: 10_000.0,
        };
        let day = step(&miner, &hold, 6.25, &observation, 100.0);
        assert_eq!(day.profit_usd, day.mined_usd_value - 3.25 * 0.05 * 24.0);
        assert_eq!(day.cumulative_profit_usd, 100.0 + day.profit_usd);
        assert_eq!(day.hold_value_usd, 2500.0);
    }
}
