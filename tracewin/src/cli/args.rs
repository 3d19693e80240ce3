//! CLI argument definitions

use clap::Parser;
use std::path::PathBuf;

use crate::source::TraceFormat;

#[derive(Parser, Debug)]
#[command(
    name = "tracewin",
    version,
    about = "Per-thread syscall statistics over time windows of a recorded trace",
    after_help = "\
EXAMPLES:
    tracewin trace.jsonl                           One report for the whole trace
    tracewin trace.jsonl -r 1                      One report per second
    tracewin trace.bin --begin 10:00:00 --end 10:00:05 --gmt
    tracewin trace.jsonl --timerange '[10:00:00,10:00:05]' --procname nginx"
)]
pub struct Args {
    /// Trace file (.jsonl or binary .trace)
    #[arg(value_name = "TRACE")]
    pub path: PathBuf,

    /// Print a report every N seconds of trace time (0 = only at the end)
    #[arg(short, long, value_name = "SECS", default_value = "0")]
    pub refresh: u32,

    /// Maximum number of threads listed per report (0 = unlimited)
    #[arg(long, default_value = "10")]
    pub limit: usize,

    /// Do not show the progress line
    #[arg(long)]
    pub no_progress: bool,

    /// Print and parse times in UTC instead of local time
    #[arg(long)]
    pub gmt: bool,

    /// Start of the analysed range (ns, HH:MM:SS[.nnn] or "YYYY-MM-DD HH:MM:SS[.nnn]")
    #[arg(long, value_name = "TIME")]
    pub begin: Option<String>,

    /// End of the analysed range, same formats as --begin
    #[arg(long, value_name = "TIME")]
    pub end: Option<String>,

    /// Range as "[begin,end]"
    #[arg(long, value_name = "RANGE", conflicts_with_all = ["begin", "end"])]
    pub timerange: Option<String>,

    /// Only list threads with these command names (comma separated)
    #[arg(long, value_delimiter = ',', value_name = "NAMES")]
    pub procname: Option<Vec<String>>,

    /// Only list threads of these PIDs (comma separated)
    #[arg(long, value_delimiter = ',', value_name = "PIDS")]
    pub pid: Option<Vec<u32>>,

    /// Trace format (guessed from the extension if omitted)
    #[arg(long, value_enum)]
    pub format: Option<TraceFormat>,

    /// Add a bar graph of the busiest syscalls to each report
    #[arg(long)]
    pub graph: bool,

    /// Suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,
}
