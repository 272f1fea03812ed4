// Date normalization
//
// Turns raw ledger cells into canonical calendar dates. This is a total
// function over the RawDate cases: absent and unparseable values become
// None, never an error. All downstream comparisons use a single "today"
// captured once per report generation.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::types::RawDate;

/// Serial day counts beyond this magnitude are treated as unparseable
/// (~2700 years either side of the epoch).
const MAX_SERIAL_MAGNITUDE: f64 = 1_000_000.0;

/// Candidate formats for plain calendar strings, tried in order.
/// `%m/%d/%Y` comes before `%d/%m/%Y` so ambiguous slash dates resolve
/// US-style, matching the upstream ledger exports.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%Y/%m/%d",
    "%m-%d-%Y",
    "%d-%b-%Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%d %B %Y",
];

/// Candidate formats for strings carrying a time-of-day; the time part is
/// discarded after parsing.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
];

/// Day 0 of the spreadsheet 1900 date system. Serial 2 lands on 1900-01-01.
fn serial_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 30).expect("fixed epoch date is valid")
}

/// Normalize one raw cell to a calendar date.
pub fn normalize(raw: &RawDate) -> Option<NaiveDate> {
    match raw {
        RawDate::Absent => None,
        RawDate::Serial(value) => normalize_serial(*value),
        RawDate::Text(text) => parse_text_date(text),
        RawDate::AlreadyDate(date) => Some(*date),
    }
}

/// Interpret a numeric cell as a spreadsheet serial day count.
/// Fractional parts (time-of-day) are discarded.
pub fn normalize_serial(value: f64) -> Option<NaiveDate> {
    if !value.is_finite() {
        return None;
    }
    let days = value.floor();
    if days.abs() > MAX_SERIAL_MAGNITUDE {
        return None;
    }
    serial_epoch().checked_add_signed(Duration::days(days as i64))
}

/// Parse a calendar string against the candidate formats, first match wins.
pub fn parse_text_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }

    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(datetime.date());
        }
    }

    // Last resort: full RFC 3339 timestamps (offset dropped with the time)
    if let Ok(datetime) = chrono::DateTime::parse_from_rfc3339(trimmed) {
        return Some(datetime.date_naive());
    }

    None
}
