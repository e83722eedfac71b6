use hifitime::Epoch;
use regex::Regex;
use std::sync::LazyLock;

use crate::sunspot_errors::SunspotError;

/// Dates printed by Horizons observer tables: `2023-Jun-18 19:26:00`, `2023-06-18 19:26`,
/// `A.D. 2023-Jun-18 19:26:00.0000`. Seconds and their fraction are optional.
static HORIZONS_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:A\.D\.\s+)?(\d{4})-([A-Za-z]{3}|\d{2})-(\d{2})\s+(\d{2}):(\d{2})(?::(\d{2})(?:\.(\d{1,9}))?)?$",
    )
    .expect("valid date regex")
});

/// Strict request format `YYYY-MM-DD HH:MM:SS`
static REQUEST_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})-(\d{2})-(\d{2}) (\d{2}):(\d{2}):(\d{2})$").expect("valid date regex")
});

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Replace the english month abbreviation of a Horizons date by its two digit number
///
/// Argument
/// --------
/// * `date`: a date such as `2023-Jun-18 19:26:00`
///
/// Return
/// ------
/// * the same date with a numeric month, e.g. `2023-06-18 19:26:00`
pub fn convert_numeric_month(date: &str) -> String {
    MONTHS
        .iter()
        .enumerate()
        .fold(date.to_string(), |acc, (i, month)| {
            acc.replace(month, &format!("{:02}", i + 1))
        })
}

fn month_number(month: &str) -> Option<u8> {
    if let Ok(m) = month.parse::<u8>() {
        return Some(m);
    }
    MONTHS
        .iter()
        .position(|name| name.eq_ignore_ascii_case(month))
        .map(|i| i as u8 + 1)
}

fn nanos_from_fraction(fraction: &str) -> u32 {
    // right pad to nine digits: "5" is half a second
    let padded = format!("{:0<9}", fraction);
    padded.parse().unwrap_or(0)
}

/// Parse a date printed in a Horizons observer table into a UTC epoch
///
/// Argument
/// --------
/// * `date`: a table value of the date column
///
/// Return
/// ------
/// * the epoch, or `None` if the text is not a Horizons calendar date
pub fn parse_horizons_date(date: &str) -> Option<Epoch> {
    let caps = HORIZONS_DATE.captures(date.trim())?;
    let field = |i: usize| caps.get(i).map(|m| m.as_str());

    let year = field(1)?.parse().ok()?;
    let month = month_number(field(2)?)?;
    let day = field(3)?.parse().ok()?;
    let hour = field(4)?.parse().ok()?;
    let minute = field(5)?.parse().ok()?;
    let second = field(6).map_or(Some(0), |s| s.parse().ok())?;
    let nanos = field(7).map_or(0, nanos_from_fraction);

    Epoch::maybe_from_gregorian_utc(year, month, day, hour, minute, second, nanos).ok()
}

/// Parse a request time in the strict `YYYY-MM-DD HH:MM:SS` 24-hour format
///
/// Return
/// ------
/// * the epoch, or `None` when the format is wrong or the calendar instant does not exist
pub fn parse_request_date(date: &str) -> Option<Epoch> {
    let caps = REQUEST_DATE.captures(date)?;
    let field = |i: usize| caps.get(i).map(|m| m.as_str());

    Epoch::maybe_from_gregorian_utc(
        field(1)?.parse().ok()?,
        field(2)?.parse().ok()?,
        field(3)?.parse().ok()?,
        field(4)?.parse().ok()?,
        field(5)?.parse().ok()?,
        field(6)?.parse().ok()?,
        0,
    )
    .ok()
}

/// Format an epoch the way requests and numeric-month tables write it: `YYYY-MM-DD HH:MM:SS`
pub fn format_request_date(epoch: &Epoch) -> String {
    let (y, mo, d, h, mi, s, _) = epoch.to_gregorian_utc();
    format!("{y:04}-{mo:02}-{d:02} {h:02}:{mi:02}:{s:02}")
}

/// Current wall-clock time as a UTC epoch
pub fn now() -> Result<Epoch, SunspotError> {
    Ok(Epoch::now()?)
}

/// Non-negative wall-clock distance from `from` to `to`
pub(crate) fn duration_until(from: Epoch, to: Epoch) -> std::time::Duration {
    let seconds = (to - from).to_seconds();
    if seconds > 0.0 {
        std::time::Duration::from_secs_f64(seconds)
    } else {
        std::time::Duration::ZERO
    }
}
