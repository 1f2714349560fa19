//! Inclusive ranges of local calendar dates.

use chrono::NaiveDate;

use crate::error::{CalGridError, CalGridResult};

/// Inclusive range of calendar dates, `from` through `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> CalGridResult<Self> {
        if from > to {
            return Err(CalGridError::InvalidRange {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        Ok(DateRange { from, to })
    }

    /// A range covering a single day.
    pub fn day(date: NaiveDate) -> Self {
        DateRange {
            from: date,
            to: date,
        }
    }

    /// Parse command-line style bounds.
    /// - `from`: YYYY-MM-DD, defaults to `today`
    /// - `to`: YYYY-MM-DD, defaults to `from`
    pub fn from_args(from: Option<&str>, to: Option<&str>, today: NaiveDate) -> CalGridResult<Self> {
        let from = match from {
            Some(s) => parse_date(s)?,
            None => today,
        };
        let to = match to {
            Some(s) => parse_date(s)?,
            None => from,
        };
        Self::new(from, to)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    /// Every date in the range, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.from.iter_days().take_while(|d| *d <= self.to)
    }

    pub fn num_days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }
}

/// Parse a YYYY-MM-DD date.
pub fn parse_date(s: &str) -> CalGridResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| CalGridError::InvalidDate(s.to_string()))
}
