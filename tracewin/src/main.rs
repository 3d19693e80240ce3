//! # tracewin - Main Entry Point
//!
//! Reads a recorded trace, restricts it to the requested time range and
//! prints per-thread syscall statistics, once per refresh window or once for
//! the whole range.

use std::io::{self, BufWriter, IsTerminal};

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};

use tracewin::analysis::ProcessFilter;
use tracewin::cli::{resolve_filter, Args};
use tracewin::domain::TimeParseError;
use tracewin::engine::{Dispatcher, RefreshPeriod};
use tracewin::progress::ProgressLine;
use tracewin::report::{AsciiGraph, ReportOptions, TimeFormat};
use tracewin::session::{syscall_consumers, SyscallSession};
use tracewin::source::open_trace;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_USAGE: i32 = 2;

fn main() {
    env_logger::init();
    std::process::exit(match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            let code = exit_code_for(&e);
            eprintln!("error: {e:#}");
            code
        }
    });
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    if err.chain().any(|cause| cause.is::<TimeParseError>()) {
        EXIT_USAGE
    } else {
        EXIT_ERROR
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    let quiet = args.quiet;

    let mut source = open_trace(&args.path, args.format)
        .with_context(|| format!("Failed to open trace {}", args.path.display()))?;

    // Time-of-day arguments are resolved against the first event's date
    let mut events = source.by_ref().peekable();
    let first_ts = events.peek().map(|event| event.timestamp);

    let filter = resolve_filter(
        args.begin.as_deref(),
        args.end.as_deref(),
        args.timerange.as_deref(),
        first_ts,
        args.gmt,
    )
    .context("Invalid time range")?;
    let dispatcher = Dispatcher::new(filter, RefreshPeriod(args.refresh));
    debug!("filter: {:?}, refresh: {}s", dispatcher.filter(), dispatcher.refresh().secs());

    let time_format = TimeFormat::new(args.gmt);
    let options = ReportOptions {
        limit: args.limit,
        filter: ProcessFilter::new(args.procname.clone(), args.pid.clone()),
        time_format,
        graph: args.graph.then(|| AsciiGraph::default().fit_terminal()),
    };

    if !quiet {
        eprintln!("tracewin v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("trace: {}", args.path.display());
    }

    let stdout = io::stdout();
    let mut session = SyscallSession::new(BufWriter::new(stdout.lock()), options);
    if !quiet && !args.no_progress && io::stderr().is_terminal() {
        session = session.with_progress(ProgressLine::stderr(time_format));
    }

    // Stop reading once stdout is gone (e.g. piped into `head`)
    let write_failed = session.write_failed();
    let mut consumers = syscall_consumers();
    let summary = dispatcher.run(
        events.by_ref().take_while(|_| !write_failed.is_set()),
        &mut consumers,
        &mut session,
    );
    drop(events);

    // A read error ends the stream early; nothing after it is trustworthy
    if let Some(err) = source.take_error() {
        return Err(err).context("Failed to read trace");
    }

    session.finish(&consumers, &summary).context("Failed to write report")?;

    info!(
        "{} events read, {} forwarded, {} windows flushed{}",
        summary.events_read,
        summary.events_forwarded,
        summary.windows_flushed,
        if summary.stopped_early { ", stopped at end bound" } else { "" }
    );

    Ok(())
}
