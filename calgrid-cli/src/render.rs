//! Terminal rendering for calgrid-core types.
//!
//! Colors come from owo_colors. Layout decisions (which day, which hour row,
//! how long a bar) are made by the core; this module only formats them.

use calgrid_core::constants::GRID_COLUMNS;
use calgrid_core::{Event, MonthGrid, Placement, Recurrence, TimeScale};
use chrono::{Datelike, Duration, NaiveDate};
use chrono_tz::Tz;
use owo_colors::OwoColorize;

pub const WEEKDAY_HEADERS: [&str; GRID_COLUMNS] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Width of one month cell, in columns
const CELL_WIDTH: usize = 7;

/// Timeline bar resolution: characters per hour
const BAR_CHARS_PER_HOUR: f64 = 4.0;

/// Extension trait for rendering in the viewer's timezone.
pub trait Render {
    fn render(&self, tz: &Tz) -> String;
}

impl Render for Event {
    fn render(&self, tz: &Tz) -> String {
        let start = self.start.with_timezone(tz).format("%H:%M");
        let end = self.end.with_timezone(tz).format("%H:%M");
        let mut line = format!("{}-{}  {}", start, end, self.title);

        if self.is_repeating() {
            line.push_str(&format!(" {}", "↻".cyan()));
        }
        if let Some(calendar) = &self.calendar_id {
            line.push_str(&format!(" {}", format!("[{}]", calendar).dimmed()));
        }
        line
    }
}

/// Plain-text summary of a recurrence rule.
pub fn describe_recurrence(recurrence: &Recurrence) -> String {
    match recurrence {
        Recurrence::None => "Does not repeat".to_string(),
        Recurrence::Weekly { days, .. } if days.is_empty() => {
            "Weekly, no days selected".to_string()
        }
        Recurrence::Weekly { days, until: None } => format!("Every {}", days),
        Recurrence::Weekly {
            days,
            until: Some(until),
        } => format!("Every {} until {}", days, until.format("%Y-%m-%d")),
    }
}

/// Human-readable duration ("1h 30m"), or a note for inverted records.
pub fn format_duration(duration: Duration) -> String {
    match duration.to_std() {
        Ok(std) => humantime::format_duration(std).to_string(),
        Err(_) => "ends before it starts".to_string(),
    }
}

/// "Today", "Tomorrow", "Yesterday" or e.g. "Wed Jan 3".
pub fn format_date_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        _ => date.format("%a %b %-d").to_string(),
    }
}

/// Uncolored text of a month cell: day number plus an event count marker.
fn cell_text(date: NaiveDate, count: usize) -> String {
    let marker = match count {
        0 => String::new(),
        1..=9 => format!("•{}", count),
        _ => "•+".to_string(),
    };
    format!("{:>3} {:<3}", date.day(), marker)
}

/// Render the 5x7 month grid. `cells` holds each grid day's events in
/// row-major order, as produced by `Resolver::events_for_grid`.
pub fn render_month(grid: &MonthGrid, cells: &[(NaiveDate, Vec<&Event>)], today: NaiveDate) -> String {
    let mut lines = Vec::new();

    let title = grid.first_of_month().format("%B %Y").to_string();
    let width = CELL_WIDTH * GRID_COLUMNS;
    lines.push(format!("{:^width$}", title).bold().to_string());

    let header: String = WEEKDAY_HEADERS
        .iter()
        .map(|d| format!("{:^w$}", d, w = CELL_WIDTH))
        .collect();
    lines.push(header.dimmed().to_string());

    for week in cells.chunks(GRID_COLUMNS) {
        let row: String = week
            .iter()
            .map(|(date, events)| {
                let text = cell_text(*date, events.len());
                if *date == today {
                    text.reversed().to_string()
                } else if !grid.is_in_month(*date) {
                    text.dimmed().to_string()
                } else if !events.is_empty() {
                    text.cyan().to_string()
                } else {
                    text
                }
            })
            .collect();
        lines.push(row);
    }

    lines.join("\n")
}

/// Number of bar characters for a placement.
fn bar_len(placement: &Placement, scale: &TimeScale) -> usize {
    if scale.hour_unit <= 0.0 {
        return 1;
    }
    ((placement.extent / scale.hour_unit) * BAR_CHARS_PER_HOUR).round().max(1.0) as usize
}

/// A timeline bar: indentation for the offset within its hour, then the extent.
pub fn render_bar(placement: &Placement, scale: &TimeScale) -> String {
    let indent = if scale.hour_unit > 0.0 {
        let within_hour = placement.offset.rem_euclid(scale.hour_unit);
        ((within_hour / scale.hour_unit) * BAR_CHARS_PER_HOUR).floor() as usize
    } else {
        0
    };
    format!("{}{}", " ".repeat(indent), "█".repeat(bar_len(placement, scale)))
}

/// Simple pluralization helper
pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}
