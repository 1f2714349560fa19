//! Placement of events on a vertical time grid.
//!
//! Maps a time of day and a duration to an offset and extent measured in
//! the renderer's own unit (pixels, terminal rows, ...), where one hour is
//! `hour_unit` long.

use chrono::{Duration, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_HOUR_UNIT, DEFAULT_MIN_EXTENT};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeScale {
    /// Length of one hour.
    pub hour_unit: f64,
    /// Shortest extent an event is drawn with.
    pub min_extent: f64,
}

impl Default for TimeScale {
    fn default() -> Self {
        TimeScale {
            hour_unit: DEFAULT_HOUR_UNIT,
            min_extent: DEFAULT_MIN_EXTENT,
        }
    }
}

/// Where an event sits in a day column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Distance from midnight to the event's start.
    pub offset: f64,
    /// Length of the event, never below the scale's `min_extent`.
    pub extent: f64,
}

impl TimeScale {
    pub fn new(hour_unit: f64, min_extent: f64) -> Self {
        TimeScale {
            hour_unit,
            min_extent,
        }
    }

    /// Place an event starting at `start` (local wall clock) lasting `duration`.
    pub fn place(&self, start: NaiveTime, duration: Duration) -> Placement {
        let offset = f64::from(start.hour()) * self.hour_unit
            + (f64::from(start.minute()) / 60.0) * self.hour_unit;
        let extent = (duration.num_minutes() as f64 / 60.0) * self.hour_unit;

        Placement {
            offset,
            extent: extent.max(self.min_extent),
        }
    }

    /// Total length of a 24 hour column.
    pub fn day_extent(&self) -> f64 {
        24.0 * self.hour_unit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_one_hour_on_the_hour() {
        let scale = TimeScale::new(64.0, 20.0);
        let placement = scale.place(time(9, 0), Duration::hours(1));

        assert_eq!(placement.offset, 9.0 * 64.0);
        assert_eq!(placement.extent, 64.0);
    }

    #[test]
    fn test_minutes_are_fractional_hours() {
        let scale = TimeScale::new(60.0, 0.0);
        let placement = scale.place(time(13, 30), Duration::minutes(45));

        assert_eq!(placement.offset, 13.0 * 60.0 + 30.0);
        assert_eq!(placement.extent, 45.0);
    }

    #[test]
    fn test_short_events_get_min_extent() {
        let scale = TimeScale::new(64.0, 20.0);
        assert_eq!(scale.place(time(8, 0), Duration::minutes(5)).extent, 20.0);
        // non-chronological records are floored, not corrected
        assert_eq!(scale.place(time(8, 0), Duration::minutes(-30)).extent, 20.0);
    }

    #[test]
    fn test_seconds_do_not_shift_offset() {
        let scale = TimeScale::default();
        let start = NaiveTime::from_hms_opt(10, 15, 59).unwrap();
        assert_eq!(scale.place(start, Duration::hours(2)).offset, 10.25 * DEFAULT_HOUR_UNIT);
    }

    #[test]
    fn test_day_extent() {
        assert_eq!(TimeScale::new(10.0, 1.0).day_extent(), 240.0);
    }
}
