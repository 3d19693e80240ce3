//! Command-line interface for tracewin
//!
//! Argument parsing and the time-argument grammar

pub mod args;
pub mod time;

pub use args::Args;
pub use time::{parse_time, parse_timerange, resolve_filter};
