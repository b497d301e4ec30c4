use chrono::{Duration, Local, Months, NaiveDate};
use anyhow::{anyhow, Result};

/// Latest day with complete data. Same-day vendor rows are usually missing
/// or partial.
pub fn last_complete_day(today: NaiveDate) -> NaiveDate {
    today - Duration::days(1)
}

/// Parses a calendar day relative to the local clock.
pub fn parse_day(input: &str) -> Result<NaiveDate> {
    parse_day_from(input, Local::now().date_naive())
}

/// Parses a calendar day, resolving relative forms against `today`.
///
/// Accepts `YYYY-MM-DD`, `today`/`tod`, `yesterday`/`yest` and offsets into
/// the past such as `-30d`, `-2w`, `-6m`, `-1y`.
pub fn parse_day_from(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return Err(anyhow!("Empty date string"));
    }

    // 1. Reserved keywords
    match input.to_lowercase().as_str() {
        "today" | "tod" => return Ok(today),
        "yesterday" | "yest" => return Ok(last_complete_day(today)),
        _ => {}
    }

    // 2. Relative format (-Nd, -Nw, -Nm, -Ny)
    if let Some(rest) = input.strip_prefix('-') {
        return parse_offset(rest, today);
    }

    // 3. Fallback to ISO dates
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| anyhow!("Could not parse date: {}", input))
}

fn parse_offset(rest: &str, today: NaiveDate) -> Result<NaiveDate> {
    if rest.len() < 2 || !rest.is_char_boundary(rest.len() - 1) {
        return Err(anyhow!("Invalid relative date: -{}", rest));
    }
    let (num_str, unit) = rest.split_at(rest.len() - 1);
    let count: u32 = num_str
        .parse()
        .map_err(|_| anyhow!("Invalid relative date: -{}", rest))?;

    let target = match unit.to_lowercase().as_str() {
        "d" => today.checked_sub_signed(Duration::days(count as i64)),
        "w" => today.checked_sub_signed(Duration::weeks(count as i64)),
        // Clamps to the end of shorter months (Mar 31 - 1m -> Feb 28/29)
        "m" => today.checked_sub_months(Months::new(count)),
        "y" => count
            .checked_mul(12)
            .and_then(|months| today.checked_sub_months(Months::new(months))),
        _ => return Err(anyhow!("Unknown unit in relative date: {}", unit)),
    };
    target.ok_or_else(|| anyhow!("Relative date -{} is out of range", rest))
}
