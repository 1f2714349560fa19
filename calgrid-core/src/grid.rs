//! Month grid generation.
//!
//! The month view is a fixed 5x7 window of consecutive dates starting on the
//! Sunday on or before the first of the month. Months that would need a
//! sixth row lose their trailing days; the window never grows.

use chrono::{Datelike, Days, NaiveDate};

use crate::constants::{GRID_COLUMNS, GRID_ROWS};
use crate::date_range::DateRange;

/// A month laid out as 5 weeks of 7 days, Sunday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthGrid {
    first_of_month: NaiveDate,
    cells: [[NaiveDate; GRID_COLUMNS]; GRID_ROWS],
}

/// Build the grid for `month_index` (0 = January) of `year`.
///
/// Month indices outside 0..=11 roll over into neighbouring years, so
/// `(2024, 12)` is January 2025 and `(2024, -1)` is December 2023. Years
/// beyond what `NaiveDate` can represent are held at its limits.
pub fn generate_month_grid(year: i32, month_index: i32) -> MonthGrid {
    let first_of_month = first_of_month(year, month_index);
    let lead = u64::from(first_of_month.weekday().num_days_from_sunday());
    let grid_start = first_of_month
        .checked_sub_days(Days::new(lead))
        .unwrap_or(first_of_month);

    let mut cells = [[grid_start; GRID_COLUMNS]; GRID_ROWS];
    let mut day = grid_start;
    for row in cells.iter_mut() {
        for cell in row.iter_mut() {
            *cell = day;
            day = day.succ_opt().unwrap_or(day);
        }
    }

    MonthGrid {
        first_of_month,
        cells,
    }
}

/// First day of the month, with the month index folded into the year.
fn first_of_month(year: i32, month_index: i32) -> NaiveDate {
    let total = i64::from(year) * 12 + i64::from(month_index);
    let min_year = i64::from(NaiveDate::MIN.year()) + 1;
    let max_year = i64::from(NaiveDate::MAX.year()) - 1;

    let normalized_year = total.div_euclid(12).clamp(min_year, max_year);
    let month = total.rem_euclid(12) + 1;

    // Both components are in range after clamping
    NaiveDate::from_ymd_opt(normalized_year as i32, month as u32, 1).unwrap_or(NaiveDate::MIN)
}

/// The Sunday-first week containing `date`.
pub fn week_of(date: NaiveDate) -> [NaiveDate; GRID_COLUMNS] {
    let lead = u64::from(date.weekday().num_days_from_sunday());
    let sunday = date.checked_sub_days(Days::new(lead)).unwrap_or(date);

    let mut week = [sunday; GRID_COLUMNS];
    for (offset, day) in week.iter_mut().enumerate() {
        *day = sunday
            .checked_add_days(Days::new(offset as u64))
            .unwrap_or(sunday);
    }
    week
}

impl MonthGrid {
    pub fn first_of_month(&self) -> NaiveDate {
        self.first_of_month
    }

    /// Calendar year of the month (after rollover).
    pub fn year(&self) -> i32 {
        self.first_of_month.year()
    }

    /// Calendar month of the month, 1-based (after rollover).
    pub fn month(&self) -> u32 {
        self.first_of_month.month()
    }

    pub fn rows(&self) -> &[[NaiveDate; GRID_COLUMNS]; GRID_ROWS] {
        &self.cells
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<NaiveDate> {
        self.cells.get(row).and_then(|r| r.get(column)).copied()
    }

    /// All 35 dates in row-major order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.cells.iter().flatten().copied()
    }

    /// Whether `date` belongs to the grid's month (as opposed to padding).
    pub fn is_in_month(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// Whether `date` is one of the 35 cells.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.range().contains(date)
    }

    /// First through last cell, inclusive.
    pub fn range(&self) -> DateRange {
        DateRange {
            from: self.cells[0][0],
            to: self.cells[GRID_ROWS - 1][GRID_COLUMNS - 1],
        }
    }
}
