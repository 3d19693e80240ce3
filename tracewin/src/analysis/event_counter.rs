use std::collections::HashMap;

use crate::engine::Consumer;
use crate::trace_data::TraceEvent;

/// Events per kind in the current window
#[derive(Debug, Default)]
pub struct EventCounter {
    counts: HashMap<&'static str, u64>,
    total: u64,
}

impl EventCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    #[must_use]
    pub fn count(&self, label: &str) -> u64 {
        self.counts.get(label).copied().unwrap_or(0)
    }

    /// `(kind, count)` pairs, most frequent first
    #[must_use]
    pub fn counts(&self) -> Vec<(&'static str, u64)> {
        let mut out: Vec<_> = self.counts.iter().map(|(&k, &v)| (k, v)).collect();
        out.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        out
    }

    pub fn reset(&mut self) {
        self.counts.clear();
        self.total = 0;
    }
}

impl Consumer<TraceEvent> for EventCounter {
    fn ingest(&mut self, event: &TraceEvent) {
        *self.counts.entry(event.kind.label()).or_insert(0) += 1;
        self.total += 1;
    }
}
