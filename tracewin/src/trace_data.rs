//! Trace event model
//!
//! The decoded form of one tracer event, shared by every source and consumer.
//! The same type is the serde schema of the JSON Lines format:
//!
//! ```json
//! {"ts": 1000, "cpu": 0, "pid": 42, "tid": 43, "comm": "bash", "event": "syscall_entry", "name": "read"}
//! ```

use serde::{Deserialize, Serialize};
use tracewin_common::{
    TraceRecord, EVENT_OTHER, EVENT_PROCESS_EXEC, EVENT_PROCESS_FORK, EVENT_SCHED_SWITCH,
    EVENT_SYSCALL_ENTRY, EVENT_SYSCALL_EXIT,
};

use crate::domain::{CpuId, Pid, Tid, Timestamp};
use crate::engine::Timestamped;

/// Represents a single trace event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEvent {
    #[serde(rename = "ts")]
    pub timestamp: Timestamp,
    #[serde(default)]
    pub cpu: CpuId,
    #[serde(default)]
    pub pid: Pid,
    #[serde(default)]
    pub tid: Tid,
    /// Command name of `tid`, when the tracer recorded it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comm: Option<String>,
    #[serde(flatten)]
    pub kind: EventKind,
}

/// What happened, with the fields specific to each event type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EventKind {
    SyscallEntry {
        name: String,
    },
    SyscallExit {
        name: String,
        #[serde(default)]
        ret: i64,
    },
    /// `tid` is switched out, `next_tid` switched in
    SchedSwitch {
        next_tid: Tid,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        next_comm: Option<String>,
    },
    ProcessExec {
        filename: String,
    },
    ProcessFork {
        child_tid: Tid,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        child_comm: Option<String>,
    },
    Other {
        name: String,
    },
}

impl EventKind {
    /// Short label used for per-kind counters
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::SyscallEntry { .. } => "syscall_entry",
            EventKind::SyscallExit { .. } => "syscall_exit",
            EventKind::SchedSwitch { .. } => "sched_switch",
            EventKind::ProcessExec { .. } => "process_exec",
            EventKind::ProcessFork { .. } => "process_fork",
            EventKind::Other { .. } => "other",
        }
    }
}

impl TraceEvent {
    /// Event of `kind` at `ts` with no task context
    #[must_use]
    pub fn new(timestamp: Timestamp, kind: EventKind) -> Self {
        Self { timestamp, cpu: CpuId(0), pid: Pid(0), tid: Tid(0), comm: None, kind }
    }

    /// Decode a binary record
    ///
    /// Returns `None` for an unknown `event_type`.
    #[must_use]
    pub fn from_record(record: &TraceRecord) -> Option<Self> {
        let name = lossy(record.name_bytes());
        let non_empty = |s: String| if s.is_empty() { None } else { Some(s) };

        let kind = match record.event_type {
            EVENT_SYSCALL_ENTRY => EventKind::SyscallEntry { name },
            EVENT_SYSCALL_EXIT => EventKind::SyscallExit { name, ret: record.ret },
            EVENT_SCHED_SWITCH => {
                EventKind::SchedSwitch { next_tid: Tid(record.aux), next_comm: non_empty(name) }
            }
            EVENT_PROCESS_EXEC => EventKind::ProcessExec { filename: name },
            EVENT_PROCESS_FORK => {
                EventKind::ProcessFork { child_tid: Tid(record.aux), child_comm: non_empty(name) }
            }
            EVENT_OTHER => EventKind::Other { name },
            _ => return None,
        };

        Some(Self {
            timestamp: Timestamp(record.timestamp_ns),
            cpu: CpuId(record.cpu_id),
            pid: Pid(record.pid),
            tid: Tid(record.tid),
            comm: non_empty(lossy(record.comm_bytes())),
            kind,
        })
    }

    /// Encode as a binary record (names longer than the record fields are
    /// truncated)
    #[must_use]
    pub fn to_record(&self) -> TraceRecord {
        let (event_type, aux, ret, name) = match &self.kind {
            EventKind::SyscallEntry { name } => (EVENT_SYSCALL_ENTRY, 0, 0, name.as_str()),
            EventKind::SyscallExit { name, ret } => (EVENT_SYSCALL_EXIT, 0, *ret, name.as_str()),
            EventKind::SchedSwitch { next_tid, next_comm } => {
                (EVENT_SCHED_SWITCH, next_tid.0, 0, next_comm.as_deref().unwrap_or(""))
            }
            EventKind::ProcessExec { filename } => (EVENT_PROCESS_EXEC, 0, 0, filename.as_str()),
            EventKind::ProcessFork { child_tid, child_comm } => {
                (EVENT_PROCESS_FORK, child_tid.0, 0, child_comm.as_deref().unwrap_or(""))
            }
            EventKind::Other { name } => (EVENT_OTHER, 0, 0, name.as_str()),
        };

        let mut record = TraceRecord::new(self.timestamp.0, event_type);
        record.cpu_id = self.cpu.0;
        record.pid = self.pid.0;
        record.tid = self.tid.0;
        record.aux = aux;
        record.ret = ret;
        record.set_comm(self.comm.as_deref().unwrap_or(""));
        record.set_name(name);
        record
    }
}

impl Timestamped for TraceEvent {
    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
