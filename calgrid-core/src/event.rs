//! Event types.
//!
//! `Event` is the resolver's view of a persisted event record. It
//! (de)serializes in the record's wire shape (`startTime`, `isRepeating`,
//! `repeatDays`, ...) and normalizes the loose recurrence fields into a
//! single `Recurrence` value on the way in.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::error::{CalGridError, CalGridResult};
use crate::recurrence::{Recurrence, WeekdaySet, weekday_from_index};
use crate::timezone::local_date;

/// A calendar event. Exactly one per recurrence series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "EventRecord", into = "EventRecord")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    /// Start of the first occurrence. For repeating events the time of day
    /// is reused on every occurrence.
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub is_public: bool,
    pub recurrence: Recurrence,
    /// Display calendar (color/grouping); opaque here
    pub calendar_id: Option<String>,
    pub guests: Vec<Guest>,
}

/// An invited guest. Passed through untouched; every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    /// "accepted", "declined", "pending"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_status: Option<String>,
}

impl Event {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Event {
            id: id.into(),
            title: title.into(),
            description: None,
            start,
            end,
            is_public: false,
            recurrence: Recurrence::None,
            calendar_id: None,
            guests: Vec::new(),
        }
    }

    pub fn with_recurrence(mut self, recurrence: Recurrence) -> Self {
        self.recurrence = recurrence;
        self
    }

    pub fn is_repeating(&self) -> bool {
        self.recurrence.is_repeating()
    }

    /// The calendar date of the first occurrence, in `tz`.
    pub fn origin_date(&self, tz: &Tz) -> NaiveDate {
        local_date(self.start, tz)
    }

    /// Length of one occurrence. Negative for records whose end precedes
    /// their start; callers see that as-is.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Parse a JSON array of event records.
pub fn parse_events(json: &str) -> CalGridResult<Vec<Event>> {
    serde_json::from_str(json).map_err(|e| CalGridError::Serialization(e.to_string()))
}

/// Deserialize an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Event as stored by the persistence layer. Optional fields accept `null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventRecord {
    id: String,
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_default")]
    is_public: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    is_repeating: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    repeat_days: Option<Vec<i64>>,
    #[serde(default, alias = "repeatEndDate", skip_serializing_if = "Option::is_none")]
    repeat_until: Option<String>,
    #[serde(default, alias = "categoryId", skip_serializing_if = "Option::is_none")]
    calendar_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    guests: Vec<Guest>,
}

impl From<EventRecord> for Event {
    fn from(record: EventRecord) -> Self {
        let recurrence = recurrence_from_record(
            &record.id,
            record.is_repeating,
            record.repeat_days.as_deref(),
            record.repeat_until.as_deref(),
        );

        Event {
            id: record.id,
            title: record.title,
            description: record.description,
            start: record.start_time,
            end: record.end_time,
            is_public: record.is_public,
            recurrence,
            calendar_id: record.calendar_id,
            guests: record.guests,
        }
    }
}

impl From<Event> for EventRecord {
    fn from(event: Event) -> Self {
        let (is_repeating, repeat_days, repeat_until) = match &event.recurrence {
            Recurrence::None => (false, None, None),
            Recurrence::Weekly { days, until } => (
                true,
                Some(days.indices().into_iter().map(i64::from).collect()),
                until.map(|d| d.format("%Y-%m-%d").to_string()),
            ),
        };

        EventRecord {
            id: event.id,
            title: event.title,
            description: event.description,
            start_time: event.start,
            end_time: event.end,
            is_public: event.is_public,
            is_repeating,
            repeat_days,
            repeat_until,
            calendar_id: event.calendar_id,
            guests: event.guests,
        }
    }
}

/// Fold the record's loose recurrence fields into a `Recurrence`.
///
/// Never fails: a repeating flag without days degrades to a one-off event,
/// unknown weekday indices are dropped and an unreadable end date leaves
/// the series unbounded.
fn recurrence_from_record(
    id: &str,
    is_repeating: bool,
    repeat_days: Option<&[i64]>,
    repeat_until: Option<&str>,
) -> Recurrence {
    if !is_repeating {
        return Recurrence::None;
    }

    let Some(raw_days) = repeat_days else {
        warn!(event = id, "repeating event has no repeat days; treating as one-off");
        return Recurrence::None;
    };

    let mut days = WeekdaySet::new();
    for &index in raw_days {
        match u8::try_from(index).ok().and_then(weekday_from_index) {
            Some(day) => days.insert(day),
            None => warn!(event = id, index, "ignoring out-of-range repeat day"),
        }
    }

    let until = repeat_until.and_then(|raw| {
        let parsed = parse_repeat_until(raw);
        if parsed.is_none() && !raw.trim().is_empty() {
            warn!(event = id, value = raw, "unreadable repeat end date; recurrence is unbounded");
        }
        parsed
    });

    Recurrence::Weekly { days, until }
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp, whose date is taken in
/// the timestamp's own offset.
fn parse_repeat_until(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}
