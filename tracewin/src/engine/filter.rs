//! Begin/end time filtering
//!
//! The filter only answers questions about a single timestamp. Latching the
//! begin boundary (it never reverts once crossed) is the run state's job, see
//! [`WindowState`](super::WindowState).

use crate::domain::Timestamp;

/// Inclusive `[begin, end]` time range restricting which events are processed
///
/// Either bound may be unset, meaning unbounded on that side. `begin <= end`
/// is expected but not enforced: an inverted range simply lets no event
/// through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeFilter {
    begin: Option<Timestamp>,
    end: Option<Timestamp>,
}

impl TimeFilter {
    #[must_use]
    pub fn new(begin: Option<Timestamp>, end: Option<Timestamp>) -> Self {
        Self { begin, end }
    }

    /// Filter that accepts every event
    #[must_use]
    pub fn unbounded() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn begin(&self) -> Option<Timestamp> {
        self.begin
    }

    #[must_use]
    pub fn end(&self) -> Option<Timestamp> {
        self.end
    }

    /// True if an event at `ts` is at or past the begin boundary
    #[must_use]
    pub fn has_started(&self, ts: Timestamp) -> bool {
        self.begin.map_or(true, |begin| ts >= begin)
    }

    /// True if an event at `ts` is past the end boundary
    #[must_use]
    pub fn must_stop(&self, ts: Timestamp) -> bool {
        self.end.is_some_and(|end| ts > end)
    }

    /// True if `ts` lies inside `[begin, end]`
    #[must_use]
    pub fn contains(&self, ts: Timestamp) -> bool {
        self.has_started(ts) && !self.must_stop(ts)
    }
}
