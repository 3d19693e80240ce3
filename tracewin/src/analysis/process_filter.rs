//! Report-time filtering by process name and PID

use super::process_tracker::ThreadInfo;

/// Which threads a report includes
///
/// A thread passes when it matches every list that is set; no lists means
/// everything passes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessFilter {
    names: Option<Vec<String>>,
    pids: Option<Vec<u32>>,
}

impl ProcessFilter {
    #[must_use]
    pub fn new(names: Option<Vec<String>>, pids: Option<Vec<u32>>) -> Self {
        Self { names, pids }
    }

    #[must_use]
    pub fn matches(&self, thread: &ThreadInfo) -> bool {
        if let Some(ref names) = self.names {
            if !names.iter().any(|n| *n == thread.comm) {
                return false;
            }
        }
        if let Some(ref pids) = self.pids {
            if !pids.contains(&thread.pid.0) {
                return false;
            }
        }
        true
    }
}
