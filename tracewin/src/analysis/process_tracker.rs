//! Thread/process state tracking
//!
//! Keeps `tid -> (pid, comm)` up to date from the events themselves. This is
//! state, not a statistic: it survives window flushes so that a thread seen
//! in an early window still has a name when it shows up later.

use std::collections::HashMap;

use crate::domain::{Pid, Tid};
use crate::engine::Consumer;
use crate::trace_data::{EventKind, TraceEvent};

/// Kernel `TASK_COMM_LEN - 1`
const MAX_COMM_LEN: usize = 15;

/// What we know about one thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadInfo {
    pub tid: Tid,
    pub pid: Pid,
    pub comm: String,
}

impl ThreadInfo {
    fn unknown(tid: Tid) -> Self {
        Self { tid, pid: Pid(tid.0), comm: "unknown".to_string() }
    }
}

/// Persistent `tid -> ThreadInfo` map
#[derive(Debug, Default)]
pub struct ProcessTracker {
    threads: HashMap<Tid, ThreadInfo>,
}

impl ProcessTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, tid: Tid) -> Option<&ThreadInfo> {
        self.threads.get(&tid)
    }

    /// Known info for `tid`, or a placeholder named "unknown"
    #[must_use]
    pub fn lookup(&self, tid: Tid) -> ThreadInfo {
        self.get(tid).cloned().unwrap_or_else(|| ThreadInfo::unknown(tid))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.threads.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    fn thread_mut(&mut self, tid: Tid) -> &mut ThreadInfo {
        self.threads.entry(tid).or_insert_with(|| ThreadInfo::unknown(tid))
    }
}

impl Consumer<TraceEvent> for ProcessTracker {
    fn ingest(&mut self, event: &TraceEvent) {
        let current = self.thread_mut(event.tid);
        if event.pid.0 != 0 {
            current.pid = event.pid;
        }
        if let Some(ref comm) = event.comm {
            current.comm.clone_from(comm);
        }

        match &event.kind {
            EventKind::SchedSwitch { next_tid, next_comm } => {
                let next = self.thread_mut(*next_tid);
                if let Some(comm) = next_comm {
                    next.comm.clone_from(comm);
                }
            }
            EventKind::ProcessExec { filename } => {
                let base = filename.rsplit('/').next().unwrap_or(filename);
                current.comm = base.chars().take(MAX_COMM_LEN).collect();
            }
            EventKind::ProcessFork { child_tid, child_comm } => {
                let comm = child_comm.clone().unwrap_or_else(|| current.comm.clone());
                let child = self.thread_mut(*child_tid);
                child.pid = Pid(child_tid.0);
                child.comm = comm;
            }
            EventKind::SyscallEntry { .. }
            | EventKind::SyscallExit { .. }
            | EventKind::Other { .. } => {}
        }
    }
}
