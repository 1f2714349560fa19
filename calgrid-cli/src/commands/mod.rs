pub mod config;
pub mod day;
pub mod month;
pub mod show;
pub mod week;

use anyhow::Result;
use calgrid_core::date_range::parse_date;
use chrono::NaiveDate;

/// Parse an optional YYYY-MM-DD argument, defaulting to `today`.
pub fn parse_day_arg(date: Option<&str>, today: NaiveDate) -> Result<NaiveDate> {
    match date {
        Some("today") | None => Ok(today),
        Some(s) => Ok(parse_date(s)?),
    }
}
