//! Weekly recurrence rules.
//!
//! A recurring event is stored once. Its occurrences on later days are
//! derived from the rule here, never materialized as separate events.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use chrono_tz::Tz;

use crate::timezone::day_bounds;

/// Weekdays indexed the way event records index them: 0 = Sunday .. 6 = Saturday.
const SUNDAY_FIRST: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Map a record weekday index (0 = Sunday) to a `Weekday`.
pub fn weekday_from_index(index: u8) -> Option<Weekday> {
    SUNDAY_FIRST.get(usize::from(index)).copied()
}

/// Record weekday index (0 = Sunday) of a `Weekday`.
pub fn weekday_index(weekday: Weekday) -> u8 {
    weekday.num_days_from_sunday() as u8
}

/// A set of weekdays, stored as a bitmask keyed by Sunday-first index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub fn new() -> Self {
        WeekdaySet(0)
    }

    pub fn insert(&mut self, weekday: Weekday) {
        self.0 |= 1 << weekday_index(weekday);
    }

    pub fn contains(&self, weekday: Weekday) -> bool {
        self.0 & (1 << weekday_index(weekday)) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Members in Sunday-first order.
    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        SUNDAY_FIRST.iter().copied().filter(|d| self.contains(*d))
    }

    /// Members as record indices (0 = Sunday), ascending.
    pub fn indices(&self) -> Vec<u8> {
        self.iter().map(weekday_index).collect()
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut set = WeekdaySet::new();
        for day in iter {
            set.insert(day);
        }
        set
    }
}

impl fmt::Display for WeekdaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.iter().map(|d| d.to_string()).collect();
        write!(f, "{}", names.join(", "))
    }
}

/// How an event repeats.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Recurrence {
    /// Occurs once, on the day of its start time.
    #[default]
    None,
    /// Repeats on the given weekdays after the origin date, up to and
    /// including `until` when set.
    Weekly {
        days: WeekdaySet,
        until: Option<NaiveDate>,
    },
}

impl Recurrence {
    pub fn weekly(days: impl IntoIterator<Item = Weekday>, until: Option<NaiveDate>) -> Self {
        Recurrence::Weekly {
            days: days.into_iter().collect(),
            until,
        }
    }

    pub fn is_repeating(&self) -> bool {
        matches!(self, Recurrence::Weekly { .. })
    }

    /// Whether the rule produces an occurrence on `day` for a series
    /// anchored at `origin`. The origin day itself is never a repeat.
    pub fn repeats_on(&self, origin: NaiveDate, day: NaiveDate) -> bool {
        match self {
            Recurrence::None => false,
            Recurrence::Weekly { days, until } => {
                day > origin
                    && days.contains(day.weekday())
                    && until.is_none_or(|until| day <= until)
            }
        }
    }

    /// Render the rule as an RFC 5545 RRULE value.
    ///
    /// `UNTIL` is the last second of the end date in `tz`, expressed in UTC.
    /// Returns `None` for one-off events and for weekly rules with no days.
    pub fn to_rrule(&self, tz: &Tz) -> Option<String> {
        let Recurrence::Weekly { days, until } = self else {
            return None;
        };
        if days.is_empty() {
            return None;
        }

        let by_day: Vec<&str> = days.iter().map(rrule_day).collect();
        let mut rule = format!("FREQ=WEEKLY;BYDAY={}", by_day.join(","));

        if let Some(until) = until {
            let (_, next_midnight) = day_bounds(*until, tz);
            let last_second = next_midnight - Duration::seconds(1);
            rule.push_str(&format!(";UNTIL={}", last_second.format("%Y%m%dT%H%M%SZ")));
        }

        Some(rule)
    }
}

fn rrule_day(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_weekday_index_is_sunday_first() {
        assert_eq!(weekday_from_index(0), Some(Weekday::Sun));
        assert_eq!(weekday_from_index(6), Some(Weekday::Sat));
        assert_eq!(weekday_from_index(7), None);
        assert_eq!(weekday_index(Weekday::Sun), 0);
        assert_eq!(weekday_index(Weekday::Mon), 1);
    }

    #[test]
    fn test_weekday_set_membership_and_order() {
        let set: WeekdaySet = [Weekday::Fri, Weekday::Sun, Weekday::Mon].into_iter().collect();

        assert_eq!(set.len(), 3);
        assert!(set.contains(Weekday::Sun));
        assert!(!set.contains(Weekday::Tue));
        assert_eq!(set.indices(), vec![0, 1, 5]);
        assert_eq!(set.to_string(), "Sun, Mon, Fri");
    }

    #[test]
    fn test_repeats_on_skips_origin_day() {
        // 2024-01-01 is a Monday
        let rule = Recurrence::weekly([Weekday::Mon], None);
        assert!(!rule.repeats_on(date(2024, 1, 1), date(2024, 1, 1)));
        assert!(rule.repeats_on(date(2024, 1, 1), date(2024, 1, 8)));
    }

    #[test]
    fn test_repeats_on_never_before_origin() {
        let rule = Recurrence::weekly([Weekday::Mon], None);
        assert!(!rule.repeats_on(date(2024, 1, 8), date(2024, 1, 1)));
    }

    #[test]
    fn test_repeats_on_until_is_inclusive() {
        let rule = Recurrence::weekly([Weekday::Mon], Some(date(2024, 1, 15)));
        assert!(rule.repeats_on(date(2024, 1, 1), date(2024, 1, 15)));
        assert!(!rule.repeats_on(date(2024, 1, 1), date(2024, 1, 22)));
    }

    #[test]
    fn test_empty_days_never_repeat() {
        let rule = Recurrence::Weekly {
            days: WeekdaySet::new(),
            until: None,
        };
        assert!(rule.is_repeating());
        assert!(!rule.repeats_on(date(2024, 1, 1), date(2024, 1, 8)));
    }

    #[test]
    fn test_to_rrule_weekly_with_until() {
        let rule = Recurrence::weekly([Weekday::Wed, Weekday::Mon], Some(date(2024, 1, 15)));
        assert_eq!(
            rule.to_rrule(&Tz::UTC).as_deref(),
            Some("FREQ=WEEKLY;BYDAY=MO,WE;UNTIL=20240115T235959Z")
        );
    }

    #[test]
    fn test_to_rrule_until_respects_timezone() {
        // The Berlin day ends at 23:00 UTC in January (UTC+1)
        let rule = Recurrence::weekly([Weekday::Mon], Some(date(2024, 1, 15)));
        assert_eq!(
            rule.to_rrule(&chrono_tz::Europe::Berlin).as_deref(),
            Some("FREQ=WEEKLY;BYDAY=MO;UNTIL=20240115T225959Z")
        );
    }

    #[test]
    fn test_to_rrule_none_for_one_off_and_empty() {
        assert_eq!(Recurrence::None.to_rrule(&Tz::UTC), None);
        assert_eq!(Recurrence::weekly(Vec::<Weekday>::new(), None).to_rrule(&Tz::UTC), None);
    }
}
