//! Occurrence resolution.
//!
//! Decides which events are visible on a given local calendar day. Every
//! view (month cells, week columns, day lists, hour rows) goes through
//! `Resolver::classify`, so they always agree.

use std::array;

use chrono::{NaiveDate, Timelike};
use chrono_tz::Tz;
use tracing::instrument;

use crate::constants::{GRID_CELLS, HOURS_PER_DAY};
use crate::date_range::DateRange;
use crate::event::Event;
use crate::grid::MonthGrid;
use crate::layout::{Placement, TimeScale};
use crate::timezone::local_time;

/// Why an event shows up on a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occurrence {
    /// The day of the event's start time. Always counts, whatever the
    /// recurrence rule says.
    Origin,
    /// A later day produced by the weekly rule.
    Recurring,
}

/// Resolves occurrences in a fixed local timezone.
///
/// Holds no state besides the zone: each call is a pure function of its
/// arguments and safe to run from any number of threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolver {
    tz: Tz,
}

impl Default for Resolver {
    fn default() -> Self {
        Resolver::new(Tz::UTC)
    }
}

impl Resolver {
    pub fn new(tz: Tz) -> Self {
        Resolver { tz }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn classify(&self, event: &Event, day: NaiveDate) -> Option<Occurrence> {
        let origin = event.origin_date(&self.tz);

        if origin == day {
            Some(Occurrence::Origin)
        } else if event.recurrence.repeats_on(origin, day) {
            Some(Occurrence::Recurring)
        } else {
            None
        }
    }

    pub fn occurs_on_day(&self, event: &Event, day: NaiveDate) -> bool {
        self.classify(event, day).is_some()
    }

    /// Events occurring on `day`, in input order.
    #[instrument(level = "trace", skip(self, events), fields(events = events.len()))]
    pub fn events_for_day<'a>(&self, events: &'a [Event], day: NaiveDate) -> Vec<&'a Event> {
        events.iter().filter(|e| self.occurs_on_day(e, day)).collect()
    }

    /// `events_for_day` for every day of `range`, in date order.
    #[instrument(level = "trace", skip(self, events), fields(events = events.len()))]
    pub fn events_for_range<'a>(
        &self,
        events: &'a [Event],
        range: DateRange,
    ) -> Vec<(NaiveDate, Vec<&'a Event>)> {
        range
            .days()
            .map(|day| (day, self.events_for_day(events, day)))
            .collect()
    }

    /// `events_for_day` for each of the grid's 35 cells, row-major.
    pub fn events_for_grid<'a>(
        &self,
        events: &'a [Event],
        grid: &MonthGrid,
    ) -> Vec<(NaiveDate, Vec<&'a Event>)> {
        let mut cells = Vec::with_capacity(GRID_CELLS);
        for day in grid.days() {
            cells.push((day, self.events_for_day(events, day)));
        }
        cells
    }

    /// Local hour (0-23) of the event's start time; the hour row it renders in.
    pub fn start_hour(&self, event: &Event) -> u32 {
        local_time(event.start, &self.tz).hour()
    }

    /// Events occurring on `day` whose start falls in `hour`.
    pub fn events_in_hour<'a>(&self, events: &'a [Event], day: NaiveDate, hour: u32) -> Vec<&'a Event> {
        events
            .iter()
            .filter(|e| self.start_hour(e) == hour && self.occurs_on_day(e, day))
            .collect()
    }

    /// Events occurring on `day`, split into 24 hour slots by start hour.
    pub fn bucket_by_hour<'a>(
        &self,
        events: &'a [Event],
        day: NaiveDate,
    ) -> [Vec<&'a Event>; HOURS_PER_DAY] {
        let mut slots: [Vec<&'a Event>; HOURS_PER_DAY] = array::from_fn(|_| Vec::new());
        for event in self.events_for_day(events, day) {
            // hour() is always < 24
            slots[self.start_hour(event) as usize].push(event);
        }
        slots
    }

    /// Position of the event inside a day column, using its local start time.
    pub fn place(&self, event: &Event, scale: &TimeScale) -> Placement {
        scale.place(local_time(event.start, &self.tz), event.duration())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recurrence::Recurrence;
    use chrono::{DateTime, Duration, TimeZone, Utc, Weekday};
    use chrono_tz::America;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn one_off(id: &str, start: DateTime<Utc>) -> Event {
        Event::new(id, id, start, start + Duration::hours(1))
    }

    #[test]
    fn test_classify_origin_wins_over_recurrence() {
        // 2024-01-01 is a Monday and a repeat day
        let event = one_off("gym", at(2024, 1, 1, 18, 0))
            .with_recurrence(Recurrence::weekly([Weekday::Mon], None));
        let resolver = Resolver::default();

        assert_eq!(resolver.classify(&event, date(2024, 1, 1)), Some(Occurrence::Origin));
        assert_eq!(resolver.classify(&event, date(2024, 1, 8)), Some(Occurrence::Recurring));
        assert_eq!(resolver.classify(&event, date(2024, 1, 9)), None);
    }

    #[test]
    fn test_one_off_only_on_origin() {
        let event = one_off("dentist", at(2024, 3, 14, 10, 0));
        let resolver = Resolver::default();

        assert!(resolver.occurs_on_day(&event, date(2024, 3, 14)));
        assert!(!resolver.occurs_on_day(&event, date(2024, 3, 13)));
        assert!(!resolver.occurs_on_day(&event, date(2024, 3, 21)));
    }

    #[test]
    fn test_day_boundary_follows_timezone() {
        // 02:00 UTC on Jan 4 is still Jan 3 in New York
        let event = one_off("late call", at(2024, 1, 4, 2, 0));

        assert!(Resolver::default().occurs_on_day(&event, date(2024, 1, 4)));
        let ny = Resolver::new(America::New_York);
        assert!(ny.occurs_on_day(&event, date(2024, 1, 3)));
        assert!(!ny.occurs_on_day(&event, date(2024, 1, 4)));
        assert_eq!(ny.start_hour(&event), 21);
    }

    #[test]
    fn test_recurring_weekday_is_local() {
        // Mondays 21:00 in New York are Tuesdays in UTC
        let event = one_off("class", at(2024, 1, 2, 2, 0))
            .with_recurrence(Recurrence::weekly([Weekday::Mon], None));
        let ny = Resolver::new(America::New_York);

        assert_eq!(ny.classify(&event, date(2024, 1, 1)), Some(Occurrence::Origin));
        assert_eq!(ny.classify(&event, date(2024, 1, 8)), Some(Occurrence::Recurring));
        assert_eq!(ny.classify(&event, date(2024, 1, 9)), None);
    }

    #[test]
    fn test_events_for_day_preserves_order() {
        let day = date(2024, 1, 10);
        let events = vec![
            one_off("c", at(2024, 1, 10, 15, 0)),
            one_off("skip", at(2024, 1, 11, 9, 0)),
            one_off("a", at(2024, 1, 10, 8, 0)),
        ];

        let ids: Vec<&str> = Resolver::default()
            .events_for_day(&events, day)
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(ids, vec!["c", "a"]);
    }

    #[test]
    fn test_events_for_range_covers_each_day() {
        let events = vec![
            one_off("weekly", at(2024, 1, 1, 9, 0))
                .with_recurrence(Recurrence::weekly([Weekday::Mon, Weekday::Thu], None)),
        ];
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 7)).unwrap();

        let per_day = Resolver::default().events_for_range(&events, range);
        assert_eq!(per_day.len(), 7);

        let hits: Vec<NaiveDate> = per_day
            .iter()
            .filter(|(_, evs)| !evs.is_empty())
            .map(|(d, _)| *d)
            .collect();
        assert_eq!(hits, vec![date(2024, 1, 1), date(2024, 1, 4)]);
    }

    #[test]
    fn test_events_for_grid_includes_padding_days() {
        // Jan 2024 grid starts on Sunday 2023-12-31
        let events = vec![one_off("nye", at(2023, 12, 31, 20, 0))];
        let grid = crate::grid::generate_month_grid(2024, 0);

        let cells = Resolver::default().events_for_grid(&events, &grid);
        assert_eq!(cells.len(), GRID_CELLS);
        assert_eq!(cells[0].0, date(2023, 12, 31));
        assert_eq!(cells[0].1.len(), 1);
        assert!(cells[1..].iter().all(|(_, evs)| evs.is_empty()));
    }

    #[test]
    fn test_bucket_by_hour() {
        let day = date(2024, 1, 8);
        let events = vec![
            one_off("early", at(2024, 1, 8, 9, 45)),
            one_off("standup", at(2024, 1, 1, 9, 0))
                .with_recurrence(Recurrence::weekly([Weekday::Mon], None)),
            one_off("lunch", at(2024, 1, 8, 12, 30)),
            one_off("other day", at(2024, 1, 9, 9, 0)),
        ];
        let resolver = Resolver::default();

        let slots = resolver.bucket_by_hour(&events, day);
        assert_eq!(slots[9].len(), 2);
        assert_eq!(slots[12].len(), 1);
        assert_eq!(slots.iter().map(Vec::len).sum::<usize>(), 3);

        let nine = resolver.events_in_hour(&events, day, 9);
        assert_eq!(nine.iter().map(|e| e.id.as_str()).collect::<Vec<_>>(), vec!["early", "standup"]);
    }

    #[test]
    fn test_place_uses_local_start() {
        // 14:00 UTC is 09:00 in New York in January
        let event = one_off("review", at(2024, 1, 8, 14, 0));
        let placement = Resolver::new(America::New_York).place(&event, &TimeScale::new(64.0, 20.0));

        assert_eq!(placement.offset, 9.0 * 64.0);
        assert_eq!(placement.extent, 64.0);
    }
}
