use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use minesim_core::{DailyResult, SimulationReport, SimulationSummary, Strategy};
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq)]
pub enum OutputFormat {
    Table,
    Csv,
    Json,
}

#[derive(Tabled)]
struct ResultRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "BTC price ($)")]
    price: String,
    #[tabled(rename = "Reward")]
    reward: String,
    #[tabled(rename = "Mined (BTC)")]
    mined_btc: String,
    #[tabled(rename = "Mined ($)")]
    mined_usd: String,
    #[tabled(rename = "Profit/day ($)")]
    profit: String,
    #[tabled(rename = "Cumulative ($)")]
    cumulative: String,
    #[tabled(rename = "Hold BTC ($)")]
    hold: String,
}

impl From<&DailyResult> for ResultRow {
    fn from(r: &DailyResult) -> Self {
        Self {
            date: r.date.format("%Y-%m-%d").to_string(),
            price: format!("{:.2}", r.price_usd),
            reward: format!("{}", r.reward_btc),
            mined_btc: format!("{:.8}", r.mined_btc),
            mined_usd: format!("{:.2}", r.mined_usd_value),
            profit: format!("{:.2}", r.profit_usd),
            cumulative: format!("{:.2}", r.cumulative_profit_usd),
            hold: format!("{:.2}", r.hold_value_usd),
        }
    }
}

/// Writes `report` to `output`, or stdout when no path is given.
pub fn write_report(report: &SimulationReport, format: OutputFormat, output: Option<&Path>) -> Result<()> {
    let colored = output.is_none();
    let mut writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Could not create {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    match format {
        OutputFormat::Table => write_table(report, colored, &mut writer)?,
        OutputFormat::Csv => write_csv(&report.results, &mut writer)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, report)?;
            writeln!(writer)?;
        }
    }
    writer.flush()?;
    Ok(())
}

fn write_table<W: Write>(report: &SimulationReport, colored: bool, writer: &mut W) -> Result<()> {
    let rows: Vec<ResultRow> = report.results.iter().map(ResultRow::from).collect();
    let mut table = Table::new(rows);
    table.with(Style::modern());
    if colored {
        table.with(Modify::new(Rows::first()).with(Color::FG_CYAN)); // Header color
    }
    writeln!(writer, "{}", table)?;

    if let Some(summary) = &report.summary {
        write_summary(summary, writer)?;
    }
    Ok(())
}

fn write_summary<W: Write>(summary: &SimulationSummary, writer: &mut W) -> Result<()> {
    writeln!(writer)?;
    writeln!(writer, "Days simulated:        {}", summary.days)?;
    writeln!(writer, "Total mined:           {:.8} BTC", summary.total_mined_btc)?;
    writeln!(writer, "Cumulative profit:     ${:.2}", summary.final_cumulative_profit_usd)?;
    writeln!(
        writer,
        "Hold instead:          ${:.2} ({:.8} BTC)",
        summary.final_hold_value_usd, summary.hold_btc
    )?;
    match summary.break_even {
        Some(date) => writeln!(writer, "Break-even:            {}", date)?,
        None => writeln!(writer, "Break-even:            -")?,
    }
    let leader = match summary.leader {
        Strategy::Mine => "mining",
        Strategy::Hold => "holding",
    };
    writeln!(writer, "Better strategy:       {}", leader)?;
    Ok(())
}

/// One header row, then one row per day with every `DailyResult` field.
pub fn write_csv<W: Write>(results: &[DailyResult], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for result in results {
        csv_writer.serialize(result)?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use minesim_core::{MinerConfig, SimulationRange};

    fn sample_report() -> SimulationReport {
        let date = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        let result = DailyResult {
            date,
            price_usd: 29_000.0,
            reward_btc: 6.25,
            mined_btc: 0.0005,
            mined_usd_value: 14.5,
            profit_usd: 10.6,
            cumulative_profit_usd: 10.6,
            hold_value_usd: 2500.0,
        };
        SimulationReport::new(
            SimulationRange::new(date, date).unwrap(),
            MinerConfig::from_user_units(110.0, 3250.0, 0.05, 2500.0, 0.0).unwrap(),
            vec![result],
        )
    }

    #[test]
    fn test_csv_has_header_and_one_row_per_day() {
        let report = sample_report();
        let mut buf = Vec::new();
        write_csv(&report.results, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "date,price_usd,reward_btc,mined_btc,mined_usd_value,profit_usd,cumulative_profit_usd,hold_value_usd"
        );
        assert!(lines[1].starts_with("2021-01-01,29000.0,6.25,"));
    }

    #[test]
    fn test_table_includes_summary() {
        let report = sample_report();
        let mut buf = Vec::new();
        write_table(&report, false, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("Cumulative ($)"));
        assert!(text.contains("2021-01-01"));
        assert!(text.contains("Days simulated:        1"));
        assert!(text.contains("Better strategy:       holding"));
    }
}
