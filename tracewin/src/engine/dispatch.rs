//! # Dispatch Loop
//!
//! Pulls events from an ordered source, applies the time filter and window
//! tracker, and fans each accepted event out to the registered consumers.
//!
//! ## Per-Event Steps
//!
//! ```text
//! event ─► progress ─► begin crossed? ─► past end? ─► started? ─► accept
//!                        │ on_begin        │ should_break          │
//!                        ▼                 ▼ true: stop            ▼
//!                                                   boundary crossed? ─► on_refresh
//!                                                          │
//!                                                          ▼
//!                                                 consumers.ingest_all
//! ```
//!
//! The boundary check runs before the event is forwarded: the event that
//! triggers a flush is the first event of the next window.
//!
//! The loop never reports errors. It assumes timestamps are non-decreasing
//! and does not check it.

use log::debug;

use super::filter::TimeFilter;
use super::window::{RefreshPeriod, Window, WindowState};
use crate::domain::Timestamp;

/// Anything carrying a trace timestamp
pub trait Timestamped {
    fn timestamp(&self) -> Timestamp;
}

/// An analysis that ingests events one at a time
pub trait Consumer<E> {
    fn ingest(&mut self, event: &E);
}

impl<E, C: Consumer<E> + ?Sized> Consumer<E> for Box<C> {
    fn ingest(&mut self, event: &E) {
        (**self).ingest(event);
    }
}

impl<E, C: Consumer<E> + ?Sized> Consumer<E> for &mut C {
    fn ingest(&mut self, event: &E) {
        (**self).ingest(event);
    }
}

/// An ordered group of consumers receiving every forwarded event
///
/// Implemented for slices and vectors of consumers (registration order is
/// element order) and for tuples of up to five consumers (tuple order), so
/// callers keep typed access to each consumer from their hooks. A lone
/// consumer is passed as a 1-tuple, or implements this trait by forwarding
/// to [`Consumer::ingest`].
pub trait ConsumerSet<E> {
    fn ingest_all(&mut self, event: &E);
}

impl<E, C: Consumer<E>> ConsumerSet<E> for [C] {
    fn ingest_all(&mut self, event: &E) {
        for consumer in self.iter_mut() {
            consumer.ingest(event);
        }
    }
}

impl<E, C: Consumer<E>> ConsumerSet<E> for Vec<C> {
    fn ingest_all(&mut self, event: &E) {
        self.as_mut_slice().ingest_all(event);
    }
}

macro_rules! tuple_consumer_set {
    ($($name:ident : $idx:tt),+) => {
        impl<E, $($name: Consumer<E>),+> ConsumerSet<E> for ($($name,)+) {
            fn ingest_all(&mut self, event: &E) {
                $(self.$idx.ingest(event);)+
            }
        }
    };
}

tuple_consumer_set!(A: 0);
tuple_consumer_set!(A: 0, B: 1);
tuple_consumer_set!(A: 0, B: 1, C: 2);
tuple_consumer_set!(A: 0, B: 1, C: 2, D: 3);
tuple_consumer_set!(A: 0, B: 1, C: 2, D: 3, F: 4);

/// Caller-side callbacks of a run
///
/// Resetting consumers between windows is the caller's job: the hooks get
/// the consumer set and decide what to summarize and clear.
pub trait WindowHooks<C: ?Sized> {
    /// Called once, on the event that crosses the begin boundary
    ///
    /// Not called when the filter has no begin bound.
    fn on_begin(&mut self, _consumers: &mut C, _timestamp: Timestamp) {}

    /// Called when a window closes inside the loop
    ///
    /// The end-of-stream window is not reported here; see
    /// [`RunSummary::final_window`].
    fn on_refresh(&mut self, consumers: &mut C, window: Window);

    /// Break predicate, consulted for each event past the end boundary
    ///
    /// Returning `false` keeps processing (the event and those after it are
    /// forwarded normally). The default stops at the first such event.
    fn should_break(&mut self, _consumers: &C) -> bool {
        true
    }

    /// Progress hook, called for every event pulled from the source
    fn progress(&mut self, _timestamp: Timestamp) {}

    /// Progress completion hook, called once after the loop
    fn progress_done(&mut self) {}
}

impl<C: ?Sized, F: FnMut(&mut C, Window)> WindowHooks<C> for F {
    fn on_refresh(&mut self, consumers: &mut C, window: Window) {
        self(consumers, window);
    }
}

/// Outcome of one [`Dispatcher::run`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// First accepted timestamp (or the begin crossing), `None` if none
    pub trace_start: Option<Timestamp>,
    /// Last accepted timestamp, `None` if no event was accepted
    pub trace_end: Option<Timestamp>,
    /// Events pulled from the source
    pub events_read: u64,
    /// Events delivered to the consumers
    pub events_forwarded: u64,
    /// Windows reported through `on_refresh`
    pub windows_flushed: u64,
    /// True if the break predicate ended the run before the source did
    pub stopped_early: bool,
    final_window: Option<Window>,
}

impl RunSummary {
    /// The window still open at the end of the run
    ///
    /// `None` when no event was accepted (empty trace, or a begin bound past
    /// the trace), so callers can skip a degenerate final summary.
    #[must_use]
    pub fn final_window(&self) -> Option<Window> {
        self.final_window
    }
}

/// Time-windowed dispatch engine
///
/// Holds only configuration; each [`run`](Self::run) gets its own
/// [`WindowState`], so a dispatcher can be reused for consecutive runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dispatcher {
    filter: TimeFilter,
    refresh: RefreshPeriod,
}

impl Dispatcher {
    #[must_use]
    pub fn new(filter: TimeFilter, refresh: RefreshPeriod) -> Self {
        Self { filter, refresh }
    }

    #[must_use]
    pub fn filter(&self) -> TimeFilter {
        self.filter
    }

    #[must_use]
    pub fn refresh(&self) -> RefreshPeriod {
        self.refresh
    }

    /// Drive `events` through the filter and window tracker into `consumers`
    pub fn run<I, E, C, H>(&self, events: I, consumers: &mut C, hooks: &mut H) -> RunSummary
    where
        I: IntoIterator<Item = E>,
        E: Timestamped,
        C: ConsumerSet<E> + ?Sized,
        H: WindowHooks<C> + ?Sized,
    {
        let mut state = WindowState::new(self.filter.begin().is_none());
        let mut events_read = 0u64;
        let mut events_forwarded = 0u64;
        let mut windows_flushed = 0u64;
        let mut stopped_early = false;

        for event in events {
            let ts = event.timestamp();
            events_read += 1;
            hooks.progress(ts);

            if !state.started() && self.filter.has_started(ts) {
                state.begin(ts);
                debug!("begin boundary crossed at {ts}");
                hooks.on_begin(consumers, ts);
            }

            if self.filter.must_stop(ts) && hooks.should_break(consumers) {
                debug!("end boundary passed at {ts}, stopping");
                stopped_early = true;
                break;
            }

            if !state.started() {
                continue;
            }

            state.accept(ts);
            if let Some(window) = state.check_boundary(ts, self.refresh) {
                windows_flushed += 1;
                debug!("flushing window [{}, {}] ({})", window.start, window.end, window.duration());
                hooks.on_refresh(consumers, window);
            }

            consumers.ingest_all(&event);
            state.forwarded(ts);
            events_forwarded += 1;
        }

        hooks.progress_done();

        RunSummary {
            trace_start: state.trace_start(),
            trace_end: state.trace_end(),
            events_read,
            events_forwarded,
            windows_flushed,
            stopped_early,
            final_window: state.final_window(),
        }
    }
}
