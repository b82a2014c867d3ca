//! Parsing of user-supplied date strings and calendar-day bucketing.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use time::{
    format_description::well_known::Rfc3339, Date, Month, OffsetDateTime, PrimitiveDateTime, Time,
    UtcOffset,
};

use crate::error::{AppError, AppResult};

lazy_static! {
    static ref DATE_TIME_RE: Regex = Regex::new(
        r"^(\d{4})-(\d{1,2})-(\d{1,2})(?:[ T](\d{1,2}):(\d{2})(?::(\d{2}))?)?$"
    )
    .unwrap();
    static ref DATE_PREFIX_RE: Regex = Regex::new(r"^\d{4}-\d{1,2}-\d{1,2}").unwrap();
}

/// True when a path key should be read as a date rather than an appointment id.
/// Ids are base-36 and never contain `-`.
pub fn looks_like_date(key: &str) -> bool {
    DATE_PREFIX_RE.is_match(key.trim())
}

/// Accepts RFC 3339 (offset honoured) or `YYYY-M-D[( |T)H:MM[:SS]]`
/// interpreted at `offset`.
pub fn parse_date(input: &str, offset: UtcOffset) -> AppResult<OffsetDateTime> {
    let input = input.trim();
    if let Ok(instant) = OffsetDateTime::parse(input, &Rfc3339) {
        return Ok(instant);
    }

    let caps = DATE_TIME_RE.captures(input).ok_or_else(|| incorrect_format(input))?;

    let month = Month::try_from(number::<u8>(&caps, 2)?).map_err(|_| incorrect_format(input))?;
    let date = Date::from_calendar_date(number(&caps, 1)?, month, number(&caps, 3)?)
        .map_err(|_| incorrect_format(input))?;
    let time = Time::from_hms(
        optional_number(&caps, 4)?,
        optional_number(&caps, 5)?,
        optional_number(&caps, 6)?,
    )
    .map_err(|_| incorrect_format(input))?;

    Ok(PrimitiveDateTime::new(date, time).assume_offset(offset))
}

/// Half-open `[local midnight, next local midnight)` around `instant`.
pub fn day_bounds(
    instant: OffsetDateTime,
    offset: UtcOffset,
) -> AppResult<(OffsetDateTime, OffsetDateTime)> {
    let out_of_range = || AppError::invalid_input("date is out of range");
    let day = instant.checked_to_offset(offset).ok_or_else(out_of_range)?.date();
    let next = day.next_day().ok_or_else(out_of_range)?;
    Ok((
        day.midnight().assume_offset(offset),
        next.midnight().assume_offset(offset),
    ))
}

fn number<T: std::str::FromStr>(caps: &Captures<'_>, idx: usize) -> AppResult<T> {
    caps.get(idx)
        .and_then(|m| m.as_str().parse::<T>().ok())
        .ok_or_else(|| AppError::invalid_input("date is the incorrect format"))
}

fn optional_number(caps: &Captures<'_>, idx: usize) -> AppResult<u8> {
    match caps.get(idx) {
        Some(_) => number(caps, idx),
        None => Ok(0),
    }
}

fn incorrect_format(input: &str) -> AppError {
    AppError::invalid_input(format!("date {input:?} is the incorrect format"))
}
