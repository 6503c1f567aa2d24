//! Date Inference
//!
//! Best-effort parsing of a raw `date.issued` value of unknown granularity.
//! Rules are tried in order and the first match wins:
//!
//! 1. `YYYY`: year only
//! 2. `YY`: expanded with the century boundary (`> 24` is 19xx)
//! 3. `YYYY-MM` or `YYYY.MM`: year and month, day `01`
//! 4. a period such as `1990-1992`: year of the first component
//! 5. `YYYY-M-D` or `YYYY.M.D`: full date, checked against the calendar
//!
//! Anything else keeps the raw value with an empty normalized part. Inference
//! never fails the bundle; the validator decides what an empty date means.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use remig_domain::{NormalizedDate, PublicationDate};

/// Two-digit years above this are read as 19xx, the rest as 20xx
pub const CENTURY_BOUNDARY: u32 = 24;

/// Inputs longer than this are tried as timestamps first
const TIMESTAMP_MIN_LEN: usize = 12;

lazy_static! {
    static ref YEAR: Regex = Regex::new(r"^\d{4}$").unwrap();
    static ref SHORT_YEAR: Regex = Regex::new(r"^\d{2}$").unwrap();
    static ref YEAR_MONTH: Regex = Regex::new(r"^(\d{4})[-.](\d{2})$").unwrap();
    static ref PERIOD: Regex = Regex::new(r"^(\d{4})\s*[-–/]\s*(\d{2,4})$").unwrap();
    static ref FULL_DATE: Regex = Regex::new(r"^(\d{4})[-.](\d{1,2})[-.](\d{1,2})$").unwrap();
}

const TIMESTAMP_FORMATS: [&str; 5] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Infer a publication date from one raw value
pub fn infer_date(raw: &str) -> PublicationDate {
    let trimmed = raw.trim();
    let candidate = if trimmed.len() > TIMESTAMP_MIN_LEN {
        timestamp_to_date(trimmed).unwrap_or_else(|| trimmed.to_string())
    } else {
        trimmed.to_string()
    };

    match classify(&candidate) {
        Some(normalized) => PublicationDate::new(Some(raw.to_string()), normalized),
        None => {
            debug!("date '{}' not recognized", raw);
            PublicationDate::unparsed(raw)
        }
    }
}

/// Infer from the first of several raw values
pub fn infer_first<S: AsRef<str>>(values: &[S]) -> Option<PublicationDate> {
    values.first().map(|v| infer_date(v.as_ref()))
}

/// Expand a two-digit year
pub fn expand_short_year(year: u32) -> u32 {
    if year > CENTURY_BOUNDARY {
        1900 + year
    } else {
        2000 + year
    }
}

fn timestamp_to_date(value: &str) -> Option<String> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Some(instant.date_naive().format("%Y-%m-%d").to_string());
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|instant| instant.date().format("%Y-%m-%d").to_string())
}

fn classify(value: &str) -> Option<NormalizedDate> {
    if YEAR.is_match(value) {
        return Some(NormalizedDate::year_only(value));
    }

    if SHORT_YEAR.is_match(value) {
        let year: u32 = value.parse().ok()?;
        return Some(NormalizedDate::year_only(expand_short_year(year).to_string()));
    }

    if let Some(caps) = YEAR_MONTH.captures(value) {
        let month: u32 = caps[2].parse().ok()?;
        // "1990-92" is a period, not month 92
        if (1..=12).contains(&month) {
            return Some(NormalizedDate::full(&caps[1], &caps[2], "01"));
        }
    }

    if let Some(caps) = PERIOD.captures(value) {
        return Some(NormalizedDate::year_only(&caps[1]));
    }

    if let Some(caps) = FULL_DATE.captures(value) {
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let day: u32 = caps[3].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)?;
        return Some(NormalizedDate::full(
            &caps[1],
            format!("{:02}", month),
            format!("{:02}", day),
        ));
    }

    None
}
