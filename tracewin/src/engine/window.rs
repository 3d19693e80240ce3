//! Window tracking
//!
//! A window is the span of forwarded events between two flushes. The tracker
//! fires a flush when an accepted event lands at least `refresh_period`
//! wall-clock seconds after the second bucket the current window was opened
//! in.
//!
//! ```text
//!  second bucket:   0    1    2    3    4    5    6
//!  events:          ••• •• ••  •• •  ••   •••  •
//!  period = 2:      └─ window ─┘└─ window ─┘└─ window ...
//!                             ▲            ▲
//!                        flush (bucket 2)  flush (bucket 4)
//! ```
//!
//! Comparing `bucket + period <= event_second` instead of testing for a
//! multiple of the period means a quiet gap of any length produces a single
//! flush when activity resumes (one enlarged window), never a burst of
//! catch-up flushes.

use crate::domain::{Duration, Timestamp};

/// Periodic flush interval in whole seconds; `0` disables periodic flushes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshPeriod(pub u32);

impl RefreshPeriod {
    /// No periodic flush, only the end-of-stream summary
    pub const DISABLED: RefreshPeriod = RefreshPeriod(0);

    #[must_use]
    pub fn is_disabled(self) -> bool {
        self == Self::DISABLED
    }

    #[must_use]
    pub fn secs(self) -> u64 {
        u64::from(self.0)
    }
}

/// Bounds of one flushed window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// Timestamp the window was opened at
    pub start: Timestamp,
    /// Timestamp the window was closed at: the event that triggered the
    /// flush, or the last event of the trace for the final window
    pub end: Timestamp,
    /// Last event actually delivered to consumers inside this window
    pub last_event: Option<Timestamp>,
}

impl Window {
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.end.saturating_since(self.start)
    }
}

/// Mutable per-run state of the dispatch loop
///
/// Created fresh by every [`Dispatcher::run`](super::Dispatcher::run) and
/// dropped when it returns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowState {
    trace_start: Option<Timestamp>,
    trace_end: Option<Timestamp>,
    window_start: Option<Timestamp>,
    current_second: Option<u64>,
    last_forwarded: Option<Timestamp>,
    started: bool,
}

impl WindowState {
    /// Fresh state; `started` is true up front when there is no begin bound
    #[must_use]
    pub fn new(started: bool) -> Self {
        Self { started, ..Self::default() }
    }

    #[must_use]
    pub fn started(&self) -> bool {
        self.started
    }

    #[must_use]
    pub fn trace_start(&self) -> Option<Timestamp> {
        self.trace_start
    }

    #[must_use]
    pub fn trace_end(&self) -> Option<Timestamp> {
        self.trace_end
    }

    #[must_use]
    pub fn window_start(&self) -> Option<Timestamp> {
        self.window_start
    }

    #[must_use]
    pub fn current_second(&self) -> Option<u64> {
        self.current_second
    }

    /// Latch the begin boundary at `ts`
    pub fn begin(&mut self, ts: Timestamp) {
        self.started = true;
        self.trace_start = Some(ts);
        self.window_start = Some(ts);
    }

    /// Record an accepted event before the boundary check
    pub fn accept(&mut self, ts: Timestamp) {
        self.window_start.get_or_insert(ts);
        self.trace_start.get_or_insert(ts);
        self.trace_end = Some(ts);
    }

    /// Record that the event at `ts` was delivered to consumers
    pub fn forwarded(&mut self, ts: Timestamp) {
        self.last_forwarded = Some(ts);
    }

    /// Decide whether the accepted event at `ts` closes the current window
    ///
    /// On a flush the returned window covers every event forwarded since the
    /// previous flush; the triggering event opens the next window.
    pub fn check_boundary(&mut self, ts: Timestamp, period: RefreshPeriod) -> Option<Window> {
        if period.is_disabled() {
            return None;
        }

        let event_second = ts.second_bucket();
        let Some(current) = self.current_second else {
            self.current_second = Some(event_second);
            return None;
        };

        if current == event_second || current.saturating_add(period.secs()) > event_second {
            return None;
        }

        let window =
            Window { start: self.window_start.unwrap_or(ts), end: ts, last_event: self.last_forwarded };
        self.current_second = Some(event_second);
        self.window_start = Some(ts);
        Some(window)
    }

    /// Window still open when the stream ended, if any event was accepted
    #[must_use]
    pub fn final_window(&self) -> Option<Window> {
        let end = self.trace_end?;
        let start = self.window_start.unwrap_or(end);
        Some(Window { start, end, last_event: self.last_forwarded })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NSEC_PER_SEC;

    fn accept(state: &mut WindowState, ts: u64, period: u32) -> Option<Window> {
        let ts = Timestamp(ts);
        state.accept(ts);
        let window = state.check_boundary(ts, RefreshPeriod(period));
        state.forwarded(ts);
        window
    }

    #[test]
    fn test_first_event_never_flushes() {
        let mut state = WindowState::new(true);
        assert_eq!(accept(&mut state, 5 * NSEC_PER_SEC, 1), None);
        assert_eq!(state.current_second(), Some(5));
        assert_eq!(state.window_start(), Some(Timestamp(5 * NSEC_PER_SEC)));
    }

    #[test]
    fn test_flush_requires_full_period() {
        let mut state = WindowState::new(true);
        accept(&mut state, 0, 3);
        assert_eq!(accept(&mut state, 2 * NSEC_PER_SEC, 3), None);

        let window = accept(&mut state, 3 * NSEC_PER_SEC, 3).expect("flush at bucket 3");
        assert_eq!(window.start, Timestamp(0));
        assert_eq!(window.end, Timestamp(3 * NSEC_PER_SEC));
        assert_eq!(window.last_event, Some(Timestamp(2 * NSEC_PER_SEC)));
        assert_eq!(state.window_start(), Some(Timestamp(3 * NSEC_PER_SEC)));
        assert_eq!(state.current_second(), Some(3));
    }

    #[test]
    fn test_disabled_period_never_tracks_buckets() {
        let mut state = WindowState::new(true);
        for sec in 0..10 {
            assert_eq!(accept(&mut state, sec * NSEC_PER_SEC, 0), None);
        }
        assert_eq!(state.current_second(), None);
    }

    #[test]
    fn test_gap_produces_single_enlarged_window() {
        let mut state = WindowState::new(true);
        accept(&mut state, 0, 1);
        let window = accept(&mut state, 50 * NSEC_PER_SEC, 1).expect("one flush");
        assert_eq!(window.duration(), Duration(50 * NSEC_PER_SEC));
        assert_eq!(accept(&mut state, 50 * NSEC_PER_SEC + 1, 1), None);
    }

    #[test]
    fn test_final_window_requires_an_event() {
        let state = WindowState::new(true);
        assert_eq!(state.final_window(), None);

        let mut state = WindowState::new(true);
        accept(&mut state, 10, 0);
        accept(&mut state, 20, 0);
        let window = state.final_window().unwrap();
        assert_eq!((window.start, window.end), (Timestamp(10), Timestamp(20)));
    }
}
