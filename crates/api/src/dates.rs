//! Normalization of user supplied dates.
//!
//! Request paths carry dates in whatever shape the caller typed them
//! (`2017-08-23`, `08/23/2017`, `Aug 23, 2017`, ...). Everything is reduced to a
//! calendar [`Date`] here so the rest of the service only ever compares dates,
//! never strings.

use serde::Serializer;
use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    #[error("no date was provided")]
    Empty,
    #[error("unrecognized date format: {0}")]
    Unrecognized(String),
}

/// Parse a free-form date string into a calendar date.
///
/// Numeric dates are read month first (`08/09/2017` is August 9th); day first is
/// only used when the month-first reading is not a valid date (`23/08/2017`).
pub fn normalize_date(raw: &str) -> Result<Date, DateError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DateError::Empty);
    }

    if let Ok(datetime) = OffsetDateTime::parse(trimmed, &Rfc3339) {
        return Ok(datetime.date());
    }

    let cleaned = clean(trimmed);
    let date = drop_time_of_day(&cleaned);
    parse_known_formats(date)
        .or_else(|| expand_short_year(date).and_then(|expanded| parse_known_formats(&expanded)))
        .ok_or_else(|| DateError::Unrecognized(raw.to_owned()))
}

/// Canonical `YYYY-MM-DD` representation, the format the dataset stores dates in.
pub fn format_date(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| date.to_string())
}

pub fn serialize_date<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_date(*date))
}

/// Parse a date exactly as the dataset stores it (`YYYY-MM-DD`).
pub fn parse_stored_date(value: &str) -> Option<Date> {
    Date::parse(value.trim(), format_description!("[year]-[month]-[day]")).ok()
}

fn parse_known_formats(input: &str) -> Option<Date> {
    let formats = [
        format_description!("[year]-[month padding:none]-[day padding:none]"),
        format_description!("[year]/[month padding:none]/[day padding:none]"),
        format_description!("[year].[month padding:none].[day padding:none]"),
        format_description!("[year][month][day]"),
        format_description!("[month padding:none]/[day padding:none]/[year]"),
        format_description!("[month padding:none]-[day padding:none]-[year]"),
        format_description!("[day padding:none]/[month padding:none]/[year]"),
        format_description!("[day padding:none]-[month padding:none]-[year]"),
        format_description!("[month repr:short case_sensitive:false] [day padding:none] [year]"),
        format_description!("[month repr:long case_sensitive:false] [day padding:none] [year]"),
        format_description!("[day padding:none] [month repr:short case_sensitive:false] [year]"),
        format_description!("[day padding:none] [month repr:long case_sensitive:false] [year]"),
        format_description!("[year] [month repr:short case_sensitive:false] [day padding:none]"),
        format_description!("[year] [month repr:long case_sensitive:false] [day padding:none]"),
        format_description!("[day padding:none]-[month repr:short case_sensitive:false]-[year]"),
        format_description!("[day padding:none]-[month repr:long case_sensitive:false]-[year]"),
        format_description!("[month repr:short case_sensitive:false]-[day padding:none]-[year]"),
        format_description!("[month repr:long case_sensitive:false]-[day padding:none]-[year]"),
    ];

    formats
        .iter()
        .find_map(|format| Date::parse(input, format).ok())
}

const WEEKDAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Drops commas, abbreviation periods and a leading weekday, collapses
/// whitespace and strips ordinal suffixes, so `Wed, Aug. 23rd,  2017` becomes
/// `Aug 23 2017`.
fn clean(input: &str) -> String {
    let tokens: Vec<&str> = input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(|token| token.trim_end_matches('.'))
        .collect();
    let skip = match tokens.first() {
        Some(first) if tokens.len() > 1 && is_weekday(first) => 1,
        _ => 0,
    };

    tokens
        .into_iter()
        .skip(skip)
        .map(strip_ordinal)
        .map(|token| {
            if token.eq_ignore_ascii_case("sept") {
                "Sep"
            } else {
                token
            }
        })
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Full weekday names and their common abbreviations (`Wed`, `Tues`, `Thurs`).
fn is_weekday(token: &str) -> bool {
    let token = token.to_ascii_lowercase();
    token.len() >= 3 && WEEKDAYS.iter().any(|day| day.starts_with(&token))
}

/// Numeric dates with a two digit year (`8/23/17`) get a full year: 00-68 is
/// read as 2000-2068 and 69-99 as 1969-1999.
fn expand_short_year(input: &str) -> Option<String> {
    let separator = input.chars().find(|c| *c == '/' || *c == '-')?;
    let parts: Vec<&str> = input.split(separator).collect();
    let &[first, second, year] = parts.as_slice() else {
        return None;
    };
    let numeric = |part: &str| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit());
    if year.len() != 2 || !numeric(first) || !numeric(second) || !numeric(year) {
        return None;
    }

    let short: u16 = year.parse().ok()?;
    let century = if short < 69 { 2000 } else { 1900 };
    Some(format!(
        "{first}{separator}{second}{separator}{}",
        century + short
    ))
}

fn strip_ordinal(token: &str) -> &str {
    if token.len() < 3 || !token.is_char_boundary(token.len() - 2) {
        return token;
    }
    let (number, suffix) = token.split_at(token.len() - 2);
    let is_suffix = ["st", "nd", "rd", "th"]
        .iter()
        .any(|s| suffix.eq_ignore_ascii_case(s));
    if is_suffix && number.chars().all(|c| c.is_ascii_digit()) {
        number
    } else {
        token
    }
}

/// Removes a trailing time of day (`2017-08-23T10:00:00`, `08/23/2017 10:00`).
fn drop_time_of_day(input: &str) -> &str {
    if let Some((date, time)) = input.split_once('T') {
        if time.contains(':') && date.ends_with(|c: char| c.is_ascii_digit()) {
            return date;
        }
    }
    match input.rsplit_once(' ') {
        Some((date, time)) if time.contains(':') => date,
        _ => input,
    }
}
