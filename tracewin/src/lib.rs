//! # tracewin - Time-Windowed Trace Analysis
//!
//! tracewin replays a recorded kernel trace (syscalls, scheduler switches,
//! process lifecycle) and prints per-thread syscall statistics, either once
//! for a time range or once per refresh window of trace time.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                 Trace file (.jsonl / binary)                    │
//! └───────────────────────┬─────────────────────────────────────────┘
//!                         │ TraceEvent, in timestamp order
//!                         ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        Dispatcher                               │
//! │   TimeFilter (begin/end) ─► WindowState (wall-second buckets)   │
//! └──────────┬──────────────────────────────────────┬───────────────┘
//!            │ ingest_all                           │ on_begin / on_refresh
//!            ▼                                      ▼
//! ┌──────────────────────────┐        ┌──────────────────────────────┐
//! │ Consumers                │        │ SyscallSession (hooks)       │
//! │  ProcessTracker          │◄───────│  write_syscall_report        │
//! │  SyscallStats            │ reset  │  ProgressLine                │
//! │  EventCounter            │        │                              │
//! └──────────────────────────┘        └──────────────────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - [`engine`]: the dispatch loop, time filter and refresh windows. Knows
//!   nothing about syscalls; anything [`Timestamped`](engine::Timestamped)
//!   can be dispatched.
//! - [`source`]: trace readers (JSON lines, fixed-size binary records)
//! - [`trace_data`]: the [`TraceEvent`](trace_data::TraceEvent) model
//! - [`analysis`]: consumers (thread tracking, syscall counts, event counts)
//! - [`report`]: text report, timestamp formatting, ASCII bar graphs
//! - [`session`]: hooks tying the analyses to the report output
//! - [`progress`]: stderr progress line
//! - [`cli`]: argument parsing and time-argument grammar
//! - [`domain`]: core types (Timestamp, Pid, Tid) and errors
//!
//! ## Windows
//!
//! With `--refresh N`, a window closes on the first event whose wall-clock
//! second is at least N seconds past the second the window started in. That
//! event opens the next window. Windows with no events are never reported.
//!
//! ## Typical Usage
//!
//! ```bash
//! # One report for the whole trace
//! tracewin trace.jsonl
//!
//! # A report per second between two times of day, in UTC
//! tracewin trace.jsonl -r 1 --begin 10:00:00 --end 10:00:30 --gmt
//! ```

pub mod analysis;
pub mod cli;
pub mod domain;
pub mod engine;
pub mod progress;
pub mod report;
pub mod session;
pub mod source;
pub mod trace_data;
