//! Heuristic parser for contact event dates.
//!
//! Contact providers do not agree on a date format (vCard, CardDAV, Facebook
//! and phone vendors each do their own thing). The parser tries a fixed,
//! ordered list of formats and the first one that yields a valid calendar
//! day wins.

use crate::models::ParsedDate;
use chrono::{DateTime, Datelike, NaiveDate, TimeZone};
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

// Formats carrying a year may be followed by a time of day
// ("1990-05-20T00:00:00Z", "20.05.1990 12:00"), which is ignored.
lazy_static! {
    static ref ISO_DATE: Regex =
        Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})(?:[T ].*)?$").unwrap();
    static ref NO_YEAR_DATE: Regex = Regex::new(r"^--(\d{1,2})-(\d{1,2})$").unwrap();
    static ref COMPACT_DATE: Regex = Regex::new(r"^(\d{4})(\d{2})(\d{2})$").unwrap();
    static ref TIMESTAMP: Regex = Regex::new(r"^-?\d+$").unwrap();
    static ref DOTTED_DAY_FIRST: Regex =
        Regex::new(r"^(\d{1,2})\.(\d{1,2})\.(\d{4})(?:[T ].*)?$").unwrap();
    static ref DOTTED_YEAR_FIRST: Regex =
        Regex::new(r"^(\d{4})\.(\d{1,2})\.(\d{1,2})(?:[T ].*)?$").unwrap();
    static ref SLASHED_WITH_YEAR: Regex =
        Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})(?:[T ].*)?$").unwrap();
    static ref SLASHED_NO_YEAR: Regex = Regex::new(r"^(\d{1,2})/(\d{1,2})$").unwrap();
}

/// Leap year used to validate dates that carry no year, so "--02-29" is
/// accepted.
const VALIDATION_LEAP_YEAR: i32 = 2000;

type Strategy<Tz> = fn(&str, &Tz) -> Option<ParsedDate>;

/// Parse `raw` using the local time zone for timestamp interpretation.
///
/// `prefer_day_first` decides whether `a/b/yyyy` and `a/b` are read as
/// day/month or month/day.
pub fn parse_event_date(raw: &str, prefer_day_first: bool) -> Option<ParsedDate> {
    parse_event_date_in(raw, prefer_day_first, &chrono::Local)
}

/// Same as [`parse_event_date`] with an explicit zone for timestamps.
pub fn parse_event_date_in<Tz: TimeZone>(
    raw: &str,
    prefer_day_first: bool,
    tz: &Tz,
) -> Option<ParsedDate> {
    let raw = raw.trim();
    for (name, strategy) in strategies::<Tz>(prefer_day_first) {
        debug!("Trying to parse event date '{}' as {}", raw, name);
        if let Some(date) = strategy(raw, tz) {
            debug!("Event date '{}' parsed as {:?}", raw, date);
            return Some(date);
        }
    }
    None
}

/// Formats in priority order.
fn strategies<Tz: TimeZone>(prefer_day_first: bool) -> Vec<(&'static str, Strategy<Tz>)> {
    let mut list: Vec<(&'static str, Strategy<Tz>)> = Vec::with_capacity(8);
    list.push(("yyyy-MM-dd", parse_iso::<Tz>));
    list.push(("--MM-dd", parse_no_year::<Tz>));
    list.push(("yyyyMMdd", parse_compact::<Tz>));
    list.push(("unix timestamp", parse_timestamp::<Tz>));
    list.push(("dd.MM.yyyy", parse_dotted_day_first::<Tz>));
    list.push(("yyyy.MM.dd", parse_dotted_year_first::<Tz>));
    if prefer_day_first {
        list.push(("dd/MM/yyyy", parse_day_slash_month_year::<Tz>));
        list.push(("dd/MM", parse_day_slash_month::<Tz>));
    } else {
        list.push(("MM/dd/yyyy", parse_month_slash_day_year::<Tz>));
        list.push(("MM/dd", parse_month_slash_day::<Tz>));
    }
    list
}

fn number<T: std::str::FromStr>(captures: &regex::Captures<'_>, group: usize) -> Option<T> {
    captures.get(group)?.as_str().parse().ok()
}

fn dated(year: i32, month: u32, day: u32) -> Option<ParsedDate> {
    NaiveDate::from_ymd_opt(year, month, day).map(ParsedDate::from_naive)
}

fn undated(month: u32, day: u32) -> Option<ParsedDate> {
    NaiveDate::from_ymd_opt(VALIDATION_LEAP_YEAR, month, day)
        .map(|_| ParsedDate::without_year(month, day))
}

fn parse_iso<Tz: TimeZone>(raw: &str, _tz: &Tz) -> Option<ParsedDate> {
    let c = ISO_DATE.captures(raw)?;
    dated(number(&c, 1)?, number(&c, 2)?, number(&c, 3)?)
}

fn parse_no_year<Tz: TimeZone>(raw: &str, _tz: &Tz) -> Option<ParsedDate> {
    let c = NO_YEAR_DATE.captures(raw)?;
    undated(number(&c, 1)?, number(&c, 2)?)
}

fn parse_compact<Tz: TimeZone>(raw: &str, _tz: &Tz) -> Option<ParsedDate> {
    if raw.len() != 8 {
        debug!("'{}' is not 8 characters long, skipping yyyyMMdd", raw);
        return None;
    }
    let c = COMPACT_DATE.captures(raw)?;
    dated(number(&c, 1)?, number(&c, 2)?, number(&c, 3)?)
}

/// Milliseconds since the Unix epoch, read as a day in `tz`.
fn parse_timestamp<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<ParsedDate> {
    if !TIMESTAMP.is_match(raw) {
        return None;
    }
    let millis: i64 = raw.parse().ok()?;
    let utc = DateTime::from_timestamp_millis(millis)?;
    let local = utc.with_timezone(tz);
    dated(local.year(), local.month(), local.day())
}

fn parse_dotted_day_first<Tz: TimeZone>(raw: &str, _tz: &Tz) -> Option<ParsedDate> {
    let c = DOTTED_DAY_FIRST.captures(raw)?;
    dated(number(&c, 3)?, number(&c, 2)?, number(&c, 1)?)
}

fn parse_dotted_year_first<Tz: TimeZone>(raw: &str, _tz: &Tz) -> Option<ParsedDate> {
    let c = DOTTED_YEAR_FIRST.captures(raw)?;
    dated(number(&c, 1)?, number(&c, 2)?, number(&c, 3)?)
}

fn parse_day_slash_month_year<Tz: TimeZone>(raw: &str, _tz: &Tz) -> Option<ParsedDate> {
    let c = SLASHED_WITH_YEAR.captures(raw)?;
    dated(number(&c, 3)?, number(&c, 2)?, number(&c, 1)?)
}

fn parse_day_slash_month<Tz: TimeZone>(raw: &str, _tz: &Tz) -> Option<ParsedDate> {
    let c = SLASHED_NO_YEAR.captures(raw)?;
    undated(number(&c, 2)?, number(&c, 1)?)
}

// Facebook exports use month first.
fn parse_month_slash_day_year<Tz: TimeZone>(raw: &str, _tz: &Tz) -> Option<ParsedDate> {
    let c = SLASHED_WITH_YEAR.captures(raw)?;
    dated(number(&c, 3)?, number(&c, 1)?, number(&c, 2)?)
}

fn parse_month_slash_day<Tz: TimeZone>(raw: &str, _tz: &Tz) -> Option<ParsedDate> {
    let c = SLASHED_NO_YEAR.captures(raw)?;
    undated(number(&c, 1)?, number(&c, 2)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NO_YEAR_SENTINEL;
    use chrono::{FixedOffset, Utc};

    fn parse(raw: &str, prefer_day_first: bool) -> Option<ParsedDate> {
        parse_event_date_in(raw, prefer_day_first, &Utc)
    }

    #[test]
    fn test_iso_date() {
        let date = parse("1990-05-20", false).unwrap();
        assert_eq!(date, ParsedDate::with_year(1990, 5, 20));
        assert!(date.has_year);
    }

    #[test]
    fn test_no_year_marker() {
        let date = parse("--05-20", false).unwrap();
        assert_eq!(date.month, 5);
        assert_eq!(date.day, 20);
        assert_eq!(date.year, NO_YEAR_SENTINEL);
        assert!(!date.has_year);
    }

    #[test]
    fn test_no_year_leap_day_is_accepted() {
        let date = parse("--02-29", false).unwrap();
        assert_eq!((date.month, date.day), (2, 29));
    }

    #[test]
    fn test_compact_date() {
        assert_eq!(
            parse("19900520", false),
            Some(ParsedDate::with_year(1990, 5, 20))
        );
    }

    #[test]
    fn test_invalid_compact_falls_through_to_timestamp() {
        // Month 56 is not a date, so the 8 digits are read as milliseconds.
        assert_eq!(
            parse("12345678", false),
            Some(ParsedDate::with_year(1970, 1, 1))
        );
    }

    #[test]
    fn test_timestamp() {
        // 1990-05-20T12:00:00Z
        assert_eq!(
            parse("643204800000", false),
            Some(ParsedDate::with_year(1990, 5, 20))
        );
    }

    #[test]
    fn test_timestamp_uses_zone() {
        // 1990-05-20T23:00:00Z is already May 21st at UTC+2.
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(
            parse_event_date_in("643244400000", false, &tz),
            Some(ParsedDate::with_year(1990, 5, 21))
        );
    }

    #[test]
    fn test_dotted_formats() {
        assert_eq!(
            parse("20.05.1990", false),
            Some(ParsedDate::with_year(1990, 5, 20))
        );
        assert_eq!(
            parse("1990.05.20", false),
            Some(ParsedDate::with_year(1990, 5, 20))
        );
    }

    #[test]
    fn test_slashed_month_first() {
        assert_eq!(
            parse("05/20/1990", false),
            Some(ParsedDate::with_year(1990, 5, 20))
        );
        assert_eq!(parse("05/20", false), Some(ParsedDate::without_year(5, 20)));
        assert_eq!(parse("20/05/1990", false), None);
    }

    #[test]
    fn test_slashed_day_first() {
        assert_eq!(
            parse("20/05/1990", true),
            Some(ParsedDate::with_year(1990, 5, 20))
        );
        assert_eq!(parse("20/05", true), Some(ParsedDate::without_year(5, 20)));
        assert_eq!(parse("05/20/1990", true), None);
    }

    #[test]
    fn test_ambiguous_slash_follows_preference() {
        assert_eq!(
            parse("03/04/2001", false),
            Some(ParsedDate::with_year(2001, 3, 4))
        );
        assert_eq!(
            parse("03/04/2001", true),
            Some(ParsedDate::with_year(2001, 4, 3))
        );
    }

    #[test]
    fn test_unparseable() {
        for prefer_day_first in [false, true] {
            assert_eq!(parse("not-a-date", prefer_day_first), None);
            assert_eq!(parse("", prefer_day_first), None);
            assert_eq!(parse("1990-02-30", prefer_day_first), None);
            assert_eq!(parse("--13-01", prefer_day_first), None);
        }
    }

    #[test]
    fn test_trailing_time_is_ignored() {
        for raw in [
            "1990-05-20T00:00:00Z",
            "1990-05-20T00:00:00.000Z",
            "1990-05-20 00:00:00",
            "20.05.1990 08:30",
            "1990.05.20 08:30",
            "05/20/1990 08:30",
        ] {
            assert_eq!(
                parse(raw, false),
                Some(ParsedDate::with_year(1990, 5, 20)),
                "{}",
                raw
            );
        }
        assert_eq!(
            parse("20/05/1990T08:30", true),
            Some(ParsedDate::with_year(1990, 5, 20))
        );
    }

    #[test]
    fn test_trailing_garbage_without_separator_is_rejected() {
        assert_eq!(parse("1990-05-20x", false), None);
        assert_eq!(parse("1990-05-201", false), None);
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        assert_eq!(
            parse(" 1990-05-20\n", false),
            Some(ParsedDate::with_year(1990, 5, 20))
        );
    }

    #[test]
    fn test_deterministic() {
        for raw in ["1990-05-20", "--05-20", "05/06", "643204800000"] {
            assert_eq!(parse(raw, true), parse(raw, true));
            assert_eq!(parse(raw, false), parse(raw, false));
        }
    }
}
