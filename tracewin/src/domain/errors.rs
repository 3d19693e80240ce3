//! Structured error types for tracewin
//!
//! Using thiserror for automatic Display implementation and error chaining.
//! The windowing engine itself has no error type: everything that can fail
//! (opening and decoding traces, resolving time arguments) happens in the
//! collaborators around it.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to open trace {}: {source}", path.display())]
    Open { path: PathBuf, source: std::io::Error },

    #[error("Cannot infer trace format of {}; use --format", .0.display())]
    UnknownFormat(PathBuf),

    #[error("Malformed event on line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("Truncated record at byte offset {offset}")]
    TruncatedRecord { offset: u64 },

    #[error("Not a tracewin binary trace (bad magic)")]
    BadMagic,

    #[error("Unknown event type {event_type} at byte offset {offset}")]
    UnknownEventType { event_type: u32, offset: u64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("Invalid time \"{0}\" (expected nanoseconds, hh:mm:ss[.nnnnnnnnn] or YYYY-MM-DD hh:mm:ss[.nnnnnnnnn])")]
    Invalid(String),

    #[error("Time \"{0}\" is outside the representable range")]
    OutOfRange(String),

    #[error("Invalid time range \"{0}\" (expected [begin,end])")]
    InvalidRange(String),

    #[error("Time-of-day \"{0}\" needs a reference date, but the trace has no events")]
    EmptyTrace(String),

    #[error("Begin time {begin} is after end time {end}")]
    BeginAfterEnd { begin: u64, end: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_error_display() {
        let err = SourceError::Malformed { line: 3, reason: "missing field `ts`".to_string() };
        assert_eq!(err.to_string(), "Malformed event on line 3: missing field `ts`");
    }

    #[test]
    fn test_open_error_mentions_path() {
        let err = SourceError::Open {
            path: PathBuf::from("/tmp/missing.jsonl"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(err.to_string().contains("/tmp/missing.jsonl"));
    }

    #[test]
    fn test_begin_after_end_display() {
        let err = TimeParseError::BeginAfterEnd { begin: 10, end: 5 };
        assert_eq!(err.to_string(), "Begin time 10 is after end time 5");
    }
}
