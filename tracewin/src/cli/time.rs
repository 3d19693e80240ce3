//! Parsing of `--begin`, `--end` and `--timerange`
//!
//! Accepted forms:
//! - `1425445567000000000`: nanoseconds since the epoch
//! - `05:06:07[.nnnnnnnnn]`: time of day on the date of the first event
//! - `2015-03-04 05:06:07[.nnnnnnnnn]`: absolute date and time
//!
//! Wall-clock forms are read in UTC with `--gmt` and in the local time zone
//! otherwise.

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

use crate::domain::{TimeParseError, Timestamp};
use crate::engine::TimeFilter;
use crate::report::time_format::to_datetime;

const TIME_OF_DAY: &str = "%H:%M:%S%.f";
const DATE_TIME: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Parse one time argument
///
/// `reference` is the first event's timestamp; it supplies the date for the
/// time-of-day form.
///
/// # Errors
/// Returns an error if `input` matches none of the accepted forms, if the
/// time-of-day form is used without a reference, or if the result does not
/// fit in a [`Timestamp`]
pub fn parse_time(
    input: &str,
    reference: Option<Timestamp>,
    utc: bool,
) -> Result<Timestamp, TimeParseError> {
    let s = input.trim();

    if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
        return s
            .parse::<u64>()
            .map(Timestamp)
            .map_err(|_| TimeParseError::OutOfRange(input.to_string()));
    }

    if let Ok(datetime) = NaiveDateTime::parse_from_str(s, DATE_TIME) {
        return to_timestamp(input, datetime, utc);
    }

    let time = NaiveTime::parse_from_str(s, TIME_OF_DAY)
        .map_err(|_| TimeParseError::Invalid(input.to_string()))?;
    let reference = reference.ok_or_else(|| TimeParseError::EmptyTrace(input.to_string()))?;
    let date = reference_date(input, reference, utc)?;
    to_timestamp(input, date.and_time(time), utc)
}

/// Parse `[begin,end]`
///
/// # Errors
/// Returns an error if the brackets or the comma are missing, or if either
/// side fails [`parse_time`]
pub fn parse_timerange(
    input: &str,
    reference: Option<Timestamp>,
    utc: bool,
) -> Result<(Timestamp, Timestamp), TimeParseError> {
    let invalid = || TimeParseError::InvalidRange(input.to_string());
    let inner = input
        .trim()
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(invalid)?;
    let (begin, end) = inner.split_once(',').ok_or_else(invalid)?;

    Ok((parse_time(begin, reference, utc)?, parse_time(end, reference, utc)?))
}

/// Build the run's [`TimeFilter`] from the raw arguments
///
/// # Errors
/// Returns an error if an argument does not parse or if begin is after end
pub fn resolve_filter(
    begin: Option<&str>,
    end: Option<&str>,
    timerange: Option<&str>,
    reference: Option<Timestamp>,
    utc: bool,
) -> Result<TimeFilter, TimeParseError> {
    let (begin, end) = if let Some(range) = timerange {
        let (b, e) = parse_timerange(range, reference, utc)?;
        (Some(b), Some(e))
    } else {
        (
            begin.map(|b| parse_time(b, reference, utc)).transpose()?,
            end.map(|e| parse_time(e, reference, utc)).transpose()?,
        )
    };

    if let (Some(b), Some(e)) = (begin, end) {
        if b > e {
            return Err(TimeParseError::BeginAfterEnd { begin: b.as_nanos(), end: e.as_nanos() });
        }
    }
    Ok(TimeFilter::new(begin, end))
}

fn reference_date(input: &str, ts: Timestamp, utc: bool) -> Result<NaiveDate, TimeParseError> {
    let at = to_datetime(ts).ok_or_else(|| TimeParseError::OutOfRange(input.to_string()))?;
    Ok(if utc { at.date_naive() } else { at.with_timezone(&Local).date_naive() })
}

fn to_timestamp(
    input: &str,
    datetime: NaiveDateTime,
    utc: bool,
) -> Result<Timestamp, TimeParseError> {
    let nanos = if utc {
        datetime.and_utc().timestamp_nanos_opt()
    } else {
        // Skipped local times (DST gaps) are invalid
        Local
            .from_local_datetime(&datetime)
            .earliest()
            .ok_or_else(|| TimeParseError::Invalid(input.to_string()))?
            .timestamp_nanos_opt()
    };

    nanos
        .and_then(|n| u64::try_from(n).ok())
        .map(Timestamp)
        .ok_or_else(|| TimeParseError::OutOfRange(input.to_string()))
}
