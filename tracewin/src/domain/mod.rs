//! Core types and errors shared across tracewin

pub mod errors;
pub mod types;

pub use types::{CpuId, Duration, Pid, Tid, Timestamp, NSEC_PER_SEC};

pub use errors::{SourceError, TimeParseError};
