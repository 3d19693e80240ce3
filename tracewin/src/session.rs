//! Syscall statistics session
//!
//! Wires the analysis consumers to the dispatch loop: each closed window is
//! printed with [`write_syscall_report`] and the window statistics are
//! cleared. Thread state in [`ProcessTracker`] survives across windows.
//!
//! Once a report fails to write (a closed pipe, a full disk) nothing more is
//! printed. The engine keeps pulling events until its source ends, so
//! callers stop the source themselves by checking [`WriteFailed`].

use std::cell::Cell;
use std::io::{self, Write};
use std::rc::Rc;

use log::warn;

use crate::analysis::{EventCounter, ProcessTracker, SyscallStats};
use crate::domain::Timestamp;
use crate::engine::{RunSummary, Window, WindowHooks};
use crate::progress::ProgressLine;
use crate::report::{write_syscall_report, ReportOptions};

/// Consumers of a syscall run, in registration order
pub type SyscallConsumers = (ProcessTracker, SyscallStats, EventCounter);

#[must_use]
pub fn syscall_consumers() -> SyscallConsumers {
    (ProcessTracker::new(), SyscallStats::new(), EventCounter::new())
}

fn reset_window(consumers: &mut SyscallConsumers) {
    consumers.1.reset();
    consumers.2.reset();
}

/// Shared flag set when the session's writer fails
#[derive(Debug, Clone, Default)]
pub struct WriteFailed(Rc<Cell<bool>>);

impl WriteFailed {
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.0.get()
    }
}

/// Hooks printing one report per window to `out`
pub struct SyscallSession<W: Write> {
    out: W,
    options: ReportOptions,
    progress: Option<ProgressLine<io::Stderr>>,
    error: Option<io::Error>,
    failed: WriteFailed,
}

impl<W: Write> SyscallSession<W> {
    pub fn new(out: W, options: ReportOptions) -> Self {
        Self { out, options, progress: None, error: None, failed: WriteFailed::default() }
    }

    /// Handle the caller checks to stop feeding events after a write error
    #[must_use]
    pub fn write_failed(&self) -> WriteFailed {
        self.failed.clone()
    }

    #[must_use]
    pub fn with_progress(mut self, progress: ProgressLine<io::Stderr>) -> Self {
        self.progress = Some(progress);
        self
    }

    fn report(&mut self, consumers: &SyscallConsumers, window: &Window) {
        if self.error.is_some() {
            return;
        }
        let (tracker, stats, counter) = consumers;
        if let Err(e) =
            write_syscall_report(&mut self.out, &self.options, window, tracker, stats, counter)
        {
            self.failed.0.set(true);
            self.error = Some(e);
        }
    }

    /// Print the last window and hand back the writer
    ///
    /// # Errors
    /// Returns the first write error hit during the run, or one from the
    /// final report
    pub fn finish(mut self, consumers: &SyscallConsumers, summary: &RunSummary) -> io::Result<W> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }

        match summary.final_window() {
            Some(window) => {
                self.report(consumers, &window);
                if let Some(e) = self.error.take() {
                    return Err(e);
                }
            }
            None => {
                warn!("no events in the selected time range ({} read)", summary.events_read);
                writeln!(self.out, "No events in the selected time range")?;
            }
        }

        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> WindowHooks<SyscallConsumers> for SyscallSession<W> {
    fn on_begin(&mut self, consumers: &mut SyscallConsumers, _timestamp: Timestamp) {
        reset_window(consumers);
    }

    fn on_refresh(&mut self, consumers: &mut SyscallConsumers, window: Window) {
        if let Some(ref mut progress) = self.progress {
            progress.finish();
        }
        self.report(consumers, &window);
        reset_window(consumers);
    }

    fn progress(&mut self, timestamp: Timestamp) {
        if let Some(ref mut progress) = self.progress {
            progress.update(timestamp);
        }
    }

    fn progress_done(&mut self) {
        if let Some(ref mut progress) = self.progress {
            progress.finish();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Pid, Tid};
    use crate::engine::{Dispatcher, RefreshPeriod, TimeFilter};
    use crate::report::TimeFormat;
    use crate::trace_data::{EventKind, TraceEvent};

    const SEC: u64 = 1_000_000_000;

    fn syscall(ts: u64, tid: u32, name: &str) -> TraceEvent {
        TraceEvent {
            tid: Tid(tid),
            pid: Pid(tid),
            comm: Some("worker".to_string()),
            ..TraceEvent::new(Timestamp(ts), EventKind::SyscallEntry { name: name.to_string() })
        }
    }

    fn run(events: Vec<TraceEvent>, filter: TimeFilter, refresh: u32) -> String {
        let options = ReportOptions { time_format: TimeFormat::new(true), ..ReportOptions::default() };
        let mut session = SyscallSession::new(Vec::new(), options);
        let mut consumers = syscall_consumers();

        let summary = Dispatcher::new(filter, RefreshPeriod(refresh)).run(
            events,
            &mut consumers,
            &mut session,
        );
        String::from_utf8(session.finish(&consumers, &summary).unwrap()).unwrap()
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_error_stops_the_source() {
        let mut session = SyscallSession::new(BrokenPipe, ReportOptions::default());
        let mut consumers = syscall_consumers();
        let failed = session.write_failed();
        let events = (1..=5).map(|s| syscall(s * SEC, 1, "read"));

        let summary = Dispatcher::new(TimeFilter::unbounded(), RefreshPeriod(1)).run(
            events.take_while(|_| !failed.is_set()),
            &mut consumers,
            &mut session,
        );

        // The flush at 2s fails; the event at 3s is never dispatched
        assert!(failed.is_set());
        assert_eq!(summary.events_read, 2);
        assert_eq!(summary.windows_flushed, 1);

        let err = session.finish(&consumers, &summary).err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_one_report_per_window() {
        let events = vec![
            syscall(SEC, 1, "read"),
            syscall(SEC + 5, 1, "read"),
            syscall(2 * SEC, 1, "write"),
        ];
        let text = run(events, TimeFilter::unbounded(), 1);

        let reports: Vec<&str> = text.split("Timerange:").skip(1).collect();
        assert_eq!(reports.len(), 2);
        assert!(reports[0].contains("Total syscalls: 2"));
        assert!(reports[0].contains("- read : 2"));
        assert!(reports[1].contains("Total syscalls: 1"));
        assert!(reports[1].contains("- write : 1"));
    }

    #[test]
    fn test_begin_discards_earlier_counts() {
        let events = vec![syscall(SEC, 1, "read"), syscall(3 * SEC, 1, "open")];
        let text = run(events, TimeFilter::new(Some(Timestamp(2 * SEC)), None), 0);

        assert!(!text.contains("read"));
        assert!(text.contains("Total syscalls: 1"));
    }

    #[test]
    fn test_empty_range_prints_notice() {
        let events = vec![syscall(SEC, 1, "read")];
        let text = run(events, TimeFilter::new(Some(Timestamp(10 * SEC)), None), 0);
        assert_eq!(text, "No events in the selected time range\n");
    }
}
