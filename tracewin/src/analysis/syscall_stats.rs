//! Per-thread syscall statistics.
//!
//! Counts syscall entries per thread and per syscall name for the current
//! window. The caller reads the rows when a window closes and then calls
//! [`SyscallStats::reset`].
//!
//! # Performance
//!
//! - `ingest()`: O(1) amortized (two HashMap updates)
//! - `per_tid()`: O(t log t + s log s) where t = threads, s = syscalls per thread

use std::collections::HashMap;

use crate::domain::Tid;
use crate::engine::Consumer;
use crate::trace_data::{EventKind, TraceEvent};

// =============================================================================
// OUTPUT TYPES
// =============================================================================

/// Count of one syscall name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyscallCount {
    pub name: String,
    pub count: u64,
}

/// All syscalls made by one thread in the window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TidSyscalls {
    pub tid: Tid,
    pub total: u64,
    /// Sorted by count (descending), then name
    pub syscalls: Vec<SyscallCount>,
}

// =============================================================================
// AGGREGATOR
// =============================================================================

/// Syscall counters for the current window
#[derive(Debug, Default)]
pub struct SyscallStats {
    per_tid: HashMap<Tid, HashMap<String, u64>>,
    total: u64,
}

impl SyscallStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total syscall entries in the window
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Drop all counts (start of a new window)
    pub fn reset(&mut self) {
        self.per_tid.clear();
        self.total = 0;
    }

    /// Per-thread rows, busiest thread first (ties broken by TID)
    #[must_use]
    pub fn per_tid(&self) -> Vec<TidSyscalls> {
        let mut rows: Vec<TidSyscalls> = self
            .per_tid
            .iter()
            .map(|(&tid, counts)| TidSyscalls {
                tid,
                total: counts.values().sum(),
                syscalls: sorted_counts(counts.iter().map(|(name, &count)| (name.as_str(), count))),
            })
            .collect();

        rows.sort_unstable_by_key(|row| (std::cmp::Reverse(row.total), row.tid));
        rows
    }

    /// Counts per syscall name across all threads, most frequent first
    #[must_use]
    pub fn by_name(&self) -> Vec<SyscallCount> {
        let mut totals: HashMap<&str, u64> = HashMap::new();
        for counts in self.per_tid.values() {
            for (name, &count) in counts {
                *totals.entry(name.as_str()).or_insert(0) += count;
            }
        }
        sorted_counts(totals.into_iter())
    }
}

impl Consumer<TraceEvent> for SyscallStats {
    fn ingest(&mut self, event: &TraceEvent) {
        let EventKind::SyscallEntry { ref name } = event.kind else {
            return;
        };

        self.total += 1;
        let counts = self.per_tid.entry(event.tid).or_default();
        if let Some(count) = counts.get_mut(name) {
            *count += 1;
        } else {
            counts.insert(name.clone(), 1);
        }
    }
}

fn sorted_counts<'a>(counts: impl Iterator<Item = (&'a str, u64)>) -> Vec<SyscallCount> {
    let mut out: Vec<SyscallCount> =
        counts.map(|(name, count)| SyscallCount { name: name.to_string(), count }).collect();
    out.sort_unstable_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    out
}
