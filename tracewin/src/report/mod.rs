//! Text output: per-window syscall reports, timestamps and bar graphs

pub mod ascii_graph;
pub mod syscall_report;
pub mod time_format;

pub use ascii_graph::{AsciiGraph, SortOrder};
pub use syscall_report::{write_syscall_report, ReportOptions};
pub use time_format::TimeFormat;
