//! Line-level validation and parsing of delimited trip records.

use thiserror::Error;

/// Validation level applied to each record line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strictness {
    /// Requires only the identifier, pickup zone, and pickup time fields.
    #[default]
    Minimal,
    /// Additionally requires non-negative distance and fare fields.
    Extended,
}

/// Reason a line was excluded from the aggregates.
///
/// Rejections are counted by the ingestion driver and never abort a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Reject {
    #[error("line has fewer fields than the record layout requires")]
    TooFewFields,
    #[error("pickup zone field is empty")]
    EmptyZone,
    #[error("pickup time does not match YYYY-MM-DD HH:MM")]
    MalformedTimestamp,
    #[error("pickup hour outside 00-23")]
    HourOutOfRange,
    #[error("pickup minute outside 00-59")]
    MinuteOutOfRange,
    #[error("distance is not a non-negative number")]
    InvalidDistance,
    #[error("fare is not a non-negative number")]
    InvalidFare,
}

const FIELD_TRIM: &[char] = &[' ', '\t', '\r', '\n', '\x0c', '\x0b'];

/// Extracts the pickup zone and hour from one raw record line.
///
/// Fields are split on commas, trimmed of surrounding whitespace, and
/// stripped of a single enclosing pair of double quotes (no embedded-quote
/// escaping). Zone identifiers are case-sensitive and pass through
/// untouched.
///
/// # Errors
///
/// Returns the specific [`Reject`] reason for any malformed line. Never
/// panics, whatever the input.
pub fn parse_line(line: &str, strictness: Strictness) -> Result<(String, u8), Reject> {
    let fields: Vec<&str> = line.split(',').map(clean_field).collect();

    let required = match strictness {
        Strictness::Minimal => 3,
        Strictness::Extended => 5,
    };
    if fields.len() < required {
        return Err(Reject::TooFewFields);
    }

    let zone = fields[1];
    if zone.is_empty() {
        return Err(Reject::EmptyZone);
    }

    let hour = extract_hour(fields[2])?;

    if strictness == Strictness::Extended {
        parse_non_negative(fields[3]).ok_or(Reject::InvalidDistance)?;
        parse_non_negative(fields[4]).ok_or(Reject::InvalidFare)?;
    }

    Ok((zone.to_string(), hour))
}

fn clean_field(raw: &str) -> &str {
    let trimmed = raw.trim_matches(FIELD_TRIM);
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    }
}

/// Pulls the hour out of a `YYYY-MM-DD HH:MM` timestamp.
///
/// Shape validation only: at least 16 bytes, a space before the time part,
/// and ASCII digits for `HH` and `MM`. The date digits and the `:` are not
/// checked. `23:59` maps to hour 23 like any other in-range value.
fn extract_hour(timestamp: &str) -> Result<u8, Reject> {
    let bytes = timestamp.as_bytes();
    if bytes.len() < 16 {
        return Err(Reject::MalformedTimestamp);
    }

    let space = bytes
        .iter()
        .position(|&b| b == b' ')
        .ok_or(Reject::MalformedTimestamp)?;

    let time = &bytes[space + 1..];
    if time.len() < 5 {
        return Err(Reject::MalformedTimestamp);
    }

    let hh = &time[0..2];
    let mm = &time[3..5];
    if !hh.iter().chain(mm).all(u8::is_ascii_digit) {
        return Err(Reject::MalformedTimestamp);
    }

    let hour = (hh[0] - b'0') * 10 + (hh[1] - b'0');
    if hour > 23 {
        return Err(Reject::HourOutOfRange);
    }

    let minute = (mm[0] - b'0') * 10 + (mm[1] - b'0');
    if minute > 59 {
        return Err(Reject::MinuteOutOfRange);
    }

    Ok(hour)
}

fn parse_non_negative(field: &str) -> Option<f64> {
    field.parse::<f64>().ok().filter(|v| *v >= 0.0)
}
