//! Canonical forms for the free-text fields of event and booking records.
//!
//! Every function here is pure: it either returns the stored representation
//! of its input or the [`AppError`] that rejects the write.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::utils::error::AppError;

pub const INVALID_DATE: &str = "Invalid date format";
pub const INVALID_TIME: &str = "Invalid time format. Use HH:MM (24-hour format)";
pub const INVALID_EMAIL: &str = "Please provide a valid email address";

static NON_SLUG_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_\s-]").expect("NON_SLUG_CHARS should compile"));

static WHITESPACE_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("WHITESPACE_RUNS should compile"));

static HYPHEN_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-+").expect("HYPHEN_RUNS should compile"));

static STRICT_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").expect("STRICT_TIME should compile")
});

static TIME_PARTS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]{1,2}):([0-9]{2})").expect("TIME_PARTS should compile"));

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("EMAIL should compile"));

/// Date-only layouts, tried in order after the date-time layouts.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d %B, %Y",
    "%A, %B %d, %Y",
    "%A %B %d %Y",
];

/// ISO date-times carrying an offset that RFC 3339 parsing rejects, such as
/// ones without seconds. `%#z` also accepts `Z`.
const ZONED_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%MZ",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Derives the URL slug for an event title.
///
/// `"My  Cool, Event!!"` becomes `"my-cool-event"`. Characters outside ASCII
/// word characters, whitespace and `-` are dropped; the result may be empty.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let stripped = NON_SLUG_CHARS.replace_all(lowered.trim(), "");
    let hyphenated = WHITESPACE_RUNS.replace_all(&stripped, "-");
    let collapsed = HYPHEN_RUNS.replace_all(&hyphenated, "-");
    collapsed.trim_matches('-').to_string()
}

/// Parses a free-form calendar date and renders it as `YYYY-MM-DD`.
pub fn normalize_date(input: &str) -> Result<String, AppError> {
    parse_calendar_date(input.trim())
        .map(|date| date.format("%Y-%m-%d").to_string())
        .ok_or_else(|| AppError::invalid_format("date", INVALID_DATE))
}

fn parse_calendar_date(text: &str) -> Option<NaiveDate> {
    if text.is_empty() {
        return None;
    }

    // Zoned timestamps land on their UTC calendar day.
    if let Ok(stamp) = DateTime::parse_from_rfc3339(text) {
        return Some(stamp.with_timezone(&Utc).date_naive());
    }
    if let Ok(stamp) = DateTime::parse_from_rfc2822(text) {
        return Some(stamp.with_timezone(&Utc).date_naive());
    }
    if let Some(stamp) = ZONED_DATETIME_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(text, format).ok())
    {
        return Some(stamp.with_timezone(&Utc).date_naive());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|stamp| stamp.date())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        })
}

/// Canonicalizes a time of day to zero-padded 24-hour `HH:MM`.
///
/// Input already in `HH:MM` is kept. Otherwise the first `H:MM` or `HH:MM`
/// occurrence is extracted and range checked, so `"9:05"` becomes `"09:05"`
/// while `"9:5"` and `"25:00"` are rejected.
pub fn normalize_time(input: &str) -> Result<String, AppError> {
    let text = input.trim();
    if STRICT_TIME.is_match(text) {
        return Ok(text.to_string());
    }

    let invalid = || AppError::invalid_format("time", INVALID_TIME);
    let captures = TIME_PARTS.captures(text).ok_or_else(invalid)?;
    let hours: u32 = captures[1].parse().map_err(|_| invalid())?;
    let minutes: u32 = captures[2].parse().map_err(|_| invalid())?;

    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    Ok(format!("{hours:02}:{minutes:02}"))
}

/// Trims and lowercases an email address, then checks its shape.
pub fn normalize_email(input: &str) -> Result<String, AppError> {
    let email = input.trim().to_lowercase();
    if email.is_empty() {
        return Err(AppError::MissingRequiredField("email"));
    }
    if !EMAIL.is_match(&email) {
        return Err(AppError::invalid_format("email", INVALID_EMAIL));
    }
    Ok(email)
}
