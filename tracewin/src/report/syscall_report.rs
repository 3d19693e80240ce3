//! Text report of one window's syscall statistics
//!
//! ```text
//! Timerange: [2015-03-04 05:06:07.000000000, 2015-03-04 05:06:08.000000000]
//! Per-TID syscalls usage
//! nginx (4242), 3 syscalls:
//! - read : 2
//! - write : 1
//!
//! Total syscalls: 3
//! Events: 5 (syscall_entry: 3, sched_switch: 2)
//! ```

// Counts are converted to f64 only to size graph bars
#![allow(clippy::cast_precision_loss)]

use std::io::{self, Write};

use super::ascii_graph::{AsciiGraph, SortOrder};
use super::time_format::TimeFormat;
use crate::analysis::{EventCounter, ProcessFilter, ProcessTracker, SyscallStats};
use crate::engine::Window;

/// Report settings shared by every window of a run
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// Maximum TIDs listed per window (0 = unlimited)
    pub limit: usize,
    pub filter: ProcessFilter,
    pub time_format: TimeFormat,
    /// Also draw the per-syscall bar graph
    pub graph: Option<AsciiGraph>,
}

/// Write the report for `window`
///
/// # Errors
/// Returns an error if writing to `out` fails
pub fn write_syscall_report<W: Write>(
    out: &mut W,
    options: &ReportOptions,
    window: &Window,
    tracker: &ProcessTracker,
    stats: &SyscallStats,
    counter: &EventCounter,
) -> io::Result<()> {
    writeln!(
        out,
        "Timerange: [{}, {}]",
        options.time_format.date_time(window.start),
        options.time_format.date_time(window.end)
    )?;
    writeln!(out, "Per-TID syscalls usage")?;

    let mut listed = 0usize;
    for row in stats.per_tid() {
        let thread = tracker.lookup(row.tid);
        if !options.filter.matches(&thread) {
            continue;
        }
        if options.limit > 0 && listed >= options.limit {
            break;
        }
        if listed > 0 {
            writeln!(out)?;
        }

        writeln!(out, "{} ({}), {} syscalls:", thread.comm, row.tid, row.total)?;
        for syscall in &row.syscalls {
            writeln!(out, "- {} : {}", syscall.name, syscall.count)?;
        }

        listed += 1;
    }

    writeln!(out, "\nTotal syscalls: {}", stats.total())?;

    let kinds: Vec<String> =
        counter.counts().iter().map(|(kind, count)| format!("{kind}: {count}")).collect();
    if kinds.is_empty() {
        writeln!(out, "Events: 0")?;
    } else {
        writeln!(out, "Events: {} ({})", counter.total(), kinds.join(", "))?;
    }

    if let Some(ref graph) = options.graph {
        let mut by_name = stats.by_name();
        if options.limit > 0 {
            by_name.truncate(options.limit);
        }
        if !by_name.is_empty() {
            let data: Vec<(String, f64)> =
                by_name.into_iter().map(|s| (s.name, s.count as f64)).collect();
            writeln!(out)?;
            for line in graph.graph("Syscalls by name", &data, SortOrder::Decreasing, "") {
                writeln!(out, "{line}")?;
            }
        }
    }

    Ok(())
}
