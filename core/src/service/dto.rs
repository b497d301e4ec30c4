use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::miner::MinerConfig;
use crate::model::range::SimulationRange;
use crate::model::result::DailyResult;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub enum Strategy {
    /// Keep mining and bank the cumulative profit.
    Mine,
    /// Spend the equipment budget on coin at the start and hold it.
    Hold,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    fn of(values: impl Iterator<Item = f64>) -> Option<Self> {
        values.fold(None, |acc: Option<Bounds>, v| {
            Some(match acc {
                Some(b) => Bounds { min: b.min.min(v), max: b.max.max(v) },
                None => Bounds { min: v, max: v },
            })
        })
    }

    fn padded(self, pad: f64) -> Self {
        Bounds { min: self.min, max: self.max + pad }
    }
}

/// Axis ranges for charting a run.
///
/// Cumulative profit and hold value share an axis. Price and daily profit
/// get their own, with one dollar of headroom on top.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ChartBounds {
    pub value_axis: Bounds,
    pub price_axis: Bounds,
    pub profit_axis: Bounds,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SimulationSummary {
    pub days: usize,
    pub total_mined_btc: f64,
    pub hold_btc: f64,
    pub final_cumulative_profit_usd: f64,
    pub final_hold_value_usd: f64,
    pub leader: Strategy,
    /// First day cumulative profit covered the equipment cost.
    pub break_even: Option<NaiveDate>,
    pub chart: ChartBounds,
}

impl SimulationSummary {
    /// Returns `None` for an empty run.
    pub fn from_results(results: &[DailyResult], equipment_cost_usd: f64) -> Option<Self> {
        let first = results.first()?;
        let last = results.last()?;

        let value_axis = Bounds::of(
            results
                .iter()
                .flat_map(|r| [r.cumulative_profit_usd, r.hold_value_usd]),
        )?;
        let price_axis = Bounds::of(results.iter().map(|r| r.price_usd))?.padded(1.0);
        let profit_axis = Bounds::of(results.iter().map(|r| r.profit_usd))?.padded(1.0);

        let break_even = results
            .iter()
            .find(|r| r.cumulative_profit_usd >= equipment_cost_usd)
            .map(|r| r.date);

        let leader = if last.cumulative_profit_usd >= last.hold_value_usd {
            Strategy::Mine
        } else {
            Strategy::Hold
        };

        Some(Self {
            days: results.len(),
            total_mined_btc: results.iter().map(|r| r.mined_btc).sum(),
            hold_btc: equipment_cost_usd / first.price_usd,
            final_cumulative_profit_usd: last.cumulative_profit_usd,
            final_hold_value_usd: last.hold_value_usd,
            leader,
            break_even,
            chart: ChartBounds {
                value_axis,
                price_axis,
                profit_axis,
            },
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SimulationReport {
    pub range: SimulationRange,
    pub miner: MinerConfig,
    pub summary: Option<SimulationSummary>,
    pub results: Vec<DailyResult>,
}

impl SimulationReport {
    pub fn new(range: SimulationRange, miner: MinerConfig, results: Vec<DailyResult>) -> Self {
        let summary = SimulationSummary::from_results(&results, miner.equipment_cost_usd);
        Self {
            range,
            miner,
            summary,
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(day: u32, price: f64, profit: f64, cumulative: f64, hold: f64) -> DailyResult {
        DailyResult {
            date: NaiveDate::from_ymd_opt(2021, 1, day).unwrap(),
            price_usd: price,
            reward_btc: 6.25,
            mined_btc: 0.001,
            mined_usd_value: profit + 5.0,
            profit_usd: profit,
            cumulative_profit_usd: cumulative,
            hold_value_usd: hold,
        }
    }

    #[test]
    fn test_summary_bounds_and_leader() {
        let results = vec![
            row(1, 100.0, -5.0, -5.0, 50.0),
            row(2, 120.0, 10.0, 5.0, 60.0),
            row(3, 80.0, 70.0, 75.0, 40.0),
        ];
        let summary = SimulationSummary::from_results(&results, 50.0).unwrap();

        assert_eq!(summary.days, 3);
        assert_eq!(summary.hold_btc, 0.5);
        assert_eq!(summary.leader, Strategy::Mine);
        assert_eq!(summary.final_hold_value_usd, 40.0);
        assert_eq!(summary.chart.value_axis, Bounds { min: -5.0, max: 75.0 });
        assert_eq!(summary.chart.price_axis, Bounds { min: 80.0, max: 121.0 });
        assert_eq!(summary.chart.profit_axis, Bounds { min: -5.0, max: 71.0 });
        assert_eq!(summary.break_even, NaiveDate::from_ymd_opt(2021, 1, 3));
    }

    #[test]
    fn test_break_even_counts_from_day_one() {
        let results = vec![
            row(1, 100.0, 20.0, 20.0, 50.0),
            row(2, 100.0, 20.0, 40.0, 50.0),
            row(3, 100.0, 20.0, 60.0, 50.0),
        ];
        let summary = SimulationSummary::from_results(&results, 50.0).unwrap();
        assert_eq!(summary.break_even, NaiveDate::from_ymd_opt(2021, 1, 3));

        let summary = SimulationSummary::from_results(&results, 60.0).unwrap();
        assert_eq!(summary.break_even, NaiveDate::from_ymd_opt(2021, 1, 3));

        let summary = SimulationSummary::from_results(&results, 61.0).unwrap();
        assert_eq!(summary.break_even, None);
    }

    #[test]
    fn test_hold_leads_when_price_outruns_mining() {
        let results = vec![row(1, 100.0, 1.0, 1.0, 50.0), row(2, 300.0, 2.0, 3.0, 150.0)];
        let summary = SimulationSummary::from_results(&results, 50.0).unwrap();
        assert_eq!(summary.leader, Strategy::Hold);
        assert_eq!(summary.break_even, None);
    }

    #[test]
    fn test_empty_run_has_no_summary() {
        assert!(SimulationSummary::from_results(&[], 100.0).is_none());
    }
}
