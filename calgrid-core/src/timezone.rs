//! Local-time conversion.
//!
//! Events carry absolute instants. Day and hour decisions happen in the
//! viewer's zone, so every conversion goes through an IANA `Tz`.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::debug;

use crate::error::{CalGridError, CalGridResult};

/// Parse an IANA zone name such as `Europe/Berlin`.
pub fn parse_timezone(name: &str) -> CalGridResult<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| CalGridError::UnknownTimezone(name.to_string()))
}

/// Calendar date of `instant` in `tz`.
pub fn local_date(instant: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

/// Wall-clock time of `instant` in `tz`.
pub fn local_time(instant: DateTime<Utc>, tz: &Tz) -> NaiveTime {
    instant.with_timezone(tz).time()
}

/// UTC instants of the local midnight starting `date` and the one starting
/// the next day.
pub fn day_bounds(date: NaiveDate, tz: &Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    let next = date.succ_opt().unwrap_or(date);
    (local_midnight(date, tz), local_midnight(next, tz))
}

/// First instant of `date` in `tz`.
///
/// Ambiguous midnights resolve to the earliest candidate. Zones that skip
/// midnight for DST resolve to the first wall-clock time that exists.
fn local_midnight(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);

    let mut candidate = midnight;
    // DST gaps never exceed a day, and real ones are at most a couple of hours
    for _ in 0..(24 * 4) {
        if let Some(resolved) = resolve_local(candidate, tz) {
            return resolved;
        }
        candidate += Duration::minutes(15);
    }

    tz.from_utc_datetime(&midnight).with_timezone(&Utc)
}

fn resolve_local(naive: NaiveDateTime, tz: &Tz) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(first, second) => {
            debug!(
                local = %naive,
                first = %first,
                second = %second,
                "ambiguous local time; using earliest"
            );
            Some(first.min(second).with_timezone(&Utc))
        }
        LocalResult::None => {
            debug!(local = %naive, zone = tz.name(), "local time skipped by DST");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::{America, Europe};

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_parse_timezone() {
        assert_eq!(parse_timezone("Europe/Berlin").unwrap(), Europe::Berlin);
        assert_eq!(parse_timezone(" UTC ").unwrap(), Tz::UTC);
        assert!(matches!(
            parse_timezone("Mars/Olympus"),
            Err(CalGridError::UnknownTimezone(name)) if name == "Mars/Olympus"
        ));
    }

    #[test]
    fn test_local_date_crosses_midnight() {
        // 23:30 UTC on Jan 3 is already Jan 4 in Berlin
        let instant = utc(2024, 1, 3, 23, 30);
        assert_eq!(local_date(instant, &Tz::UTC), NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        assert_eq!(local_date(instant, &Europe::Berlin), NaiveDate::from_ymd_opt(2024, 1, 4).unwrap());
        // and still Jan 3 in New York
        assert_eq!(local_date(instant, &America::New_York), NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
    }

    #[test]
    fn test_local_time() {
        let instant = utc(2024, 7, 1, 7, 15);
        assert_eq!(local_time(instant, &Europe::Berlin), NaiveTime::from_hms_opt(9, 15, 0).unwrap());
    }

    #[test]
    fn test_day_bounds_plain_day() {
        let (start, end) = day_bounds(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(), &Europe::Berlin);
        assert_eq!(start, utc(2024, 1, 14, 23, 0));
        assert_eq!(end, utc(2024, 1, 15, 23, 0));
    }

    #[test]
    fn test_day_bounds_dst_day_is_short() {
        // Berlin springs forward on 2024-03-31
        let (start, end) = day_bounds(NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(), &Europe::Berlin);
        assert_eq!(end - start, Duration::hours(23));
    }

    #[test]
    fn test_day_bounds_skipped_midnight() {
        // Sao Paulo skipped 00:00-01:00 on 2018-11-04
        let (start, _) = day_bounds(NaiveDate::from_ymd_opt(2018, 11, 4).unwrap(), &America::Sao_Paulo);
        let local = start.with_timezone(&America::Sao_Paulo);
        assert_eq!(local.date_naive(), NaiveDate::from_ymd_opt(2018, 11, 4).unwrap());
        assert_eq!(local.time(), NaiveTime::from_hms_opt(1, 0, 0).unwrap());
    }
}
