use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::SimulationError;

/// A block reward that applies from `effective_from` (inclusive) until the
/// next epoch starts.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct RewardEpoch {
    pub effective_from: NaiveDate,
    pub reward_btc: f64,
}

const BITCOIN_EPOCHS: [(i32, u32, u32, f64); 4] = [
    (2012, 11, 28, 25.0),
    (2016, 7, 9, 12.5),
    (2020, 5, 11, 6.25),
    (2024, 4, 20, 3.125),
];

/// Ordered table of reward epochs. Adding a halving is a data change here,
/// lookups never need to be touched.
#[derive(Debug, Clone, PartialEq)]
pub struct HalvingSchedule {
    epochs: Vec<RewardEpoch>,
}

impl Default for HalvingSchedule {
    fn default() -> Self {
        Self::bitcoin()
    }
}

impl HalvingSchedule {
    pub fn bitcoin() -> Self {
        let epochs = BITCOIN_EPOCHS
            .iter()
            .filter_map(|&(y, m, d, reward_btc)| {
                NaiveDate::from_ymd_opt(y, m, d).map(|effective_from| RewardEpoch {
                    effective_from,
                    reward_btc,
                })
            })
            .collect();
        Self { epochs }
    }

    /// Builds a schedule from arbitrary epochs. Order of the input does not
    /// matter; two epochs starting on the same day are rejected.
    pub fn new(mut epochs: Vec<RewardEpoch>) -> Result<Self, SimulationError> {
        if epochs.is_empty() {
            return Err(SimulationError::invalid("halving schedule has no epochs"));
        }
        if let Some(bad) = epochs
            .iter()
            .find(|e| !e.reward_btc.is_finite() || e.reward_btc <= 0.0)
        {
            return Err(SimulationError::invalid(format!(
                "reward for epoch starting {} must be positive, got {}",
                bad.effective_from, bad.reward_btc
            )));
        }
        epochs.sort_by_key(|e| e.effective_from);
        if let Some(pair) = epochs
            .windows(2)
            .find(|w| w[0].effective_from == w[1].effective_from)
        {
            return Err(SimulationError::invalid(format!(
                "duplicate halving epoch on {}",
                pair[0].effective_from
            )));
        }
        Ok(Self { epochs })
    }

    pub fn epochs(&self) -> &[RewardEpoch] {
        &self.epochs
    }

    /// First day a reward is defined.
    pub fn earliest(&self) -> NaiveDate {
        self.epochs[0].effective_from
    }

    pub fn reward_for(&self, date: NaiveDate) -> Result<f64, SimulationError> {
        self.epochs
            .iter()
            .rev()
            .find(|e| e.effective_from <= date)
            .map(|e| e.reward_btc)
            .ok_or(SimulationError::UnsupportedDate {
                date,
                earliest: self.earliest(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_reward_is_step_function_with_inclusive_boundaries() {
        let schedule = HalvingSchedule::bitcoin();
        assert_eq!(schedule.reward_for(day(2012, 11, 28)).unwrap(), 25.0);
        assert_eq!(schedule.reward_for(day(2016, 7, 8)).unwrap(), 25.0);
        assert_eq!(schedule.reward_for(day(2016, 7, 9)).unwrap(), 12.5);
        assert_eq!(schedule.reward_for(day(2020, 5, 10)).unwrap(), 12.5);
        assert_eq!(schedule.reward_for(day(2020, 5, 11)).unwrap(), 6.25);
        assert_eq!(schedule.reward_for(day(2024, 4, 19)).unwrap(), 6.25);
        assert_eq!(schedule.reward_for(day(2024, 4, 20)).unwrap(), 3.125);
    }

    #[test]
    fn test_reward_before_first_epoch_is_unsupported() {
        let schedule = HalvingSchedule::bitcoin();
        let err = schedule.reward_for(day(2012, 11, 27)).unwrap_err();
        assert_eq!(
            err,
            SimulationError::UnsupportedDate {
                date: day(2012, 11, 27),
                earliest: day(2012, 11, 28),
            }
        );
    }

    #[test]
    fn test_custom_schedule_is_sorted() {
        let schedule = HalvingSchedule::new(vec![
            RewardEpoch { effective_from: day(2020, 1, 1), reward_btc: 1.0 },
            RewardEpoch { effective_from: day(2010, 1, 1), reward_btc: 2.0 },
        ])
        .unwrap();
        assert_eq!(schedule.earliest(), day(2010, 1, 1));
        assert_eq!(schedule.reward_for(day(2015, 6, 1)).unwrap(), 2.0);
        assert_eq!(schedule.reward_for(day(2021, 6, 1)).unwrap(), 1.0);
    }

    #[test]
    fn test_custom_schedule_rejects_bad_tables() {
        assert!(HalvingSchedule::new(vec![]).is_err());
        assert!(HalvingSchedule::new(vec![RewardEpoch {
            effective_from: day(2010, 1, 1),
            reward_btc: 0.0,
        }])
        .is_err());
        let dup = RewardEpoch { effective_from: day(2010, 1, 1), reward_btc: 1.0 };
        assert!(HalvingSchedule::new(vec![dup, dup]).is_err());
    }
}
