//! Trace event sources
//!
//! Every source is a lazy, forward-only iterator of [`TraceEvent`]s in
//! non-decreasing timestamp order, read straight from the file without
//! buffering the whole trace.
//!
//! - [`jsonl`]: one JSON object per line
//! - [`binary`]: fixed-size records (layout in `tracewin-common`)
//!
//! Problems detectable up front (missing file, wrong magic) fail
//! [`open_trace`]. A decode error in the middle of a trace ends the iterator;
//! the caller collects it with [`TraceSource::take_error`] after the run.

pub mod binary;
pub mod jsonl;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use clap::ValueEnum;
use log::info;

pub use binary::{BinarySource, BinaryWriter};
pub use jsonl::JsonLinesSource;

use crate::domain::SourceError;
use crate::trace_data::TraceEvent;

/// On-disk trace format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TraceFormat {
    /// One JSON event per line
    Jsonl,
    /// tracewin fixed-size binary records
    Binary,
}

impl TraceFormat {
    /// Infer the format from a file extension
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "jsonl" | "ndjson" | "json" => Some(TraceFormat::Jsonl),
            "trace" | "bin" => Some(TraceFormat::Binary),
            _ => None,
        }
    }
}

/// An opened trace of either format
pub enum TraceSource {
    Jsonl(JsonLinesSource<BufReader<File>>),
    Binary(BinarySource<BufReader<File>>),
}

impl TraceSource {
    /// Error that ended the stream early, if any
    pub fn take_error(&mut self) -> Option<SourceError> {
        match self {
            TraceSource::Jsonl(source) => source.take_error(),
            TraceSource::Binary(source) => source.take_error(),
        }
    }
}

impl Iterator for TraceSource {
    type Item = TraceEvent;

    fn next(&mut self) -> Option<TraceEvent> {
        match self {
            TraceSource::Jsonl(source) => source.next(),
            TraceSource::Binary(source) => source.next(),
        }
    }
}

/// Open the trace at `path`
///
/// `format` overrides the extension-based guess.
///
/// # Errors
/// Returns an error if the format cannot be determined, the file cannot be
/// opened, or a binary trace has a bad header
pub fn open_trace(path: &Path, format: Option<TraceFormat>) -> Result<TraceSource, SourceError> {
    let format = format
        .or_else(|| TraceFormat::from_path(path))
        .ok_or_else(|| SourceError::UnknownFormat(path.to_path_buf()))?;

    let file = File::open(path)
        .map_err(|source| SourceError::Open { path: path.to_path_buf(), source })?;
    let reader = BufReader::new(file);
    info!("opened {} as {format:?}", path.display());

    Ok(match format {
        TraceFormat::Jsonl => TraceSource::Jsonl(JsonLinesSource::new(reader)),
        TraceFormat::Binary => TraceSource::Binary(BinarySource::new(reader)?),
    })
}
