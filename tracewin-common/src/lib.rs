//! # Shared Binary Trace Layout
//!
//! Defines the on-disk record layout of tracewin's binary trace format. The
//! layout is shared between whatever produces traces (a recorder, a converter,
//! test fixtures) and the `tracewin` analyzer that reads them back. All types
//! use `#[repr(C)]` and the codec is explicit little-endian, so a file written
//! on one host decodes the same way on any other.
//!
//! ## File Layout
//!
//! ```text
//! ┌──────────────┬──────────────┬──────────────┬─────┐
//! │ TRACE_MAGIC  │ TraceRecord  │ TraceRecord  │ ... │
//! │  (8 bytes)   │ (88 bytes)   │ (88 bytes)   │     │
//! └──────────────┴──────────────┴──────────────┴─────┘
//! ```
//!
//! Records are stored in non-decreasing `timestamp_ns` order.
//!
//! ## Key Types
//!
//! - [`TraceRecord`] - One fixed-size event record
//! - `EVENT_*` constants - Values of [`TraceRecord::event_type`]

#![cfg_attr(not(test), no_std)]

// ============================================================================
// File Header
// ============================================================================

/// Magic bytes at the start of every binary trace file
pub const TRACE_MAGIC: [u8; 8] = *b"TWTRACE1";

// ============================================================================
// Event Type Constants
// ============================================================================

/// **Syscall Entry**: a thread entered a system call
///
/// `name` holds the syscall name (e.g. `read`, `openat`).
pub const EVENT_SYSCALL_ENTRY: u32 = 1;

/// **Syscall Exit**: a thread returned from a system call
///
/// `name` holds the syscall name, `ret` its return value.
pub const EVENT_SYSCALL_EXIT: u32 = 2;

/// **Scheduler Switch**: `sched_switch` on the record's CPU
///
/// `tid` is the thread switched out, `aux` the thread switched in and
/// `name` the incoming thread's command name.
pub const EVENT_SCHED_SWITCH: u32 = 3;

/// **Process Exec**: the thread replaced its image
///
/// `name` holds the new executable's filename.
pub const EVENT_PROCESS_EXEC: u32 = 4;

/// **Process Fork**: the thread created a child
///
/// `aux` is the child TID, `name` its command name.
pub const EVENT_PROCESS_FORK: u32 = 5;

/// **Other**: any event the analyzer has no dedicated handling for
///
/// `name` holds the tracer's event name.
pub const EVENT_OTHER: u32 = 6;

/// Length of the `comm` field (kernel `TASK_COMM_LEN`)
pub const COMM_LEN: usize = 16;

/// Length of the `name` field
pub const NAME_LEN: usize = 32;

/// Encoded size of one [`TraceRecord`] in bytes
pub const RECORD_SIZE: usize = 88;

// ============================================================================
// Shared Data Structures
// ============================================================================

/// One event of a binary trace
///
/// **Memory Layout**: `#[repr(C)]` with no implicit padding; the encoded form
/// is the same field order, little-endian.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceRecord {
    /// Timestamp in nanoseconds
    pub timestamp_ns: u64,

    /// CPU the event was recorded on
    pub cpu_id: u32,

    /// Process ID (TGID in Linux terms)
    pub pid: u32,

    /// Thread ID
    pub tid: u32,

    /// Event type (see `EVENT_*` constants)
    pub event_type: u32,

    /// Event-specific auxiliary value (next TID, child TID)
    pub aux: u32,

    /// Padding for 8-byte alignment
    #[allow(clippy::pub_underscore_fields)]
    pub _padding: u32,

    /// Return value for `EVENT_SYSCALL_EXIT`, 0 otherwise
    pub ret: i64,

    /// Command name of `tid` (NUL-padded)
    pub comm: [u8; COMM_LEN],

    /// Event-specific name (NUL-padded), see the `EVENT_*` constants
    pub name: [u8; NAME_LEN],
}

const _: () = assert!(core::mem::size_of::<TraceRecord>() == RECORD_SIZE);

impl TraceRecord {
    /// Create a record with empty `comm`/`name` fields
    #[must_use]
    pub const fn new(timestamp_ns: u64, event_type: u32) -> Self {
        Self {
            timestamp_ns,
            cpu_id: 0,
            pid: 0,
            tid: 0,
            event_type,
            aux: 0,
            _padding: 0,
            ret: 0,
            comm: [0; COMM_LEN],
            name: [0; NAME_LEN],
        }
    }

    /// Decode a record from its little-endian encoding
    ///
    /// Returns `None` if `bytes` is shorter than [`RECORD_SIZE`].
    #[must_use]
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < RECORD_SIZE {
            return None;
        }

        let mut comm = [0u8; COMM_LEN];
        comm.copy_from_slice(&bytes[40..40 + COMM_LEN]);
        let mut name = [0u8; NAME_LEN];
        name.copy_from_slice(&bytes[56..56 + NAME_LEN]);

        Some(Self {
            timestamp_ns: u64::from_le_bytes(array(&bytes[0..8])),
            cpu_id: u32::from_le_bytes(array(&bytes[8..12])),
            pid: u32::from_le_bytes(array(&bytes[12..16])),
            tid: u32::from_le_bytes(array(&bytes[16..20])),
            event_type: u32::from_le_bytes(array(&bytes[20..24])),
            aux: u32::from_le_bytes(array(&bytes[24..28])),
            _padding: 0,
            ret: i64::from_le_bytes(array(&bytes[32..40])),
            comm,
            name,
        })
    }

    /// Encode the record into its little-endian form
    #[must_use]
    pub fn encode(&self) -> [u8; RECORD_SIZE] {
        let mut out = [0u8; RECORD_SIZE];
        out[0..8].copy_from_slice(&self.timestamp_ns.to_le_bytes());
        out[8..12].copy_from_slice(&self.cpu_id.to_le_bytes());
        out[12..16].copy_from_slice(&self.pid.to_le_bytes());
        out[16..20].copy_from_slice(&self.tid.to_le_bytes());
        out[20..24].copy_from_slice(&self.event_type.to_le_bytes());
        out[24..28].copy_from_slice(&self.aux.to_le_bytes());
        out[32..40].copy_from_slice(&self.ret.to_le_bytes());
        out[40..40 + COMM_LEN].copy_from_slice(&self.comm);
        out[56..56 + NAME_LEN].copy_from_slice(&self.name);
        out
    }

    /// `comm` up to the first NUL
    #[must_use]
    pub fn comm_bytes(&self) -> &[u8] {
        until_nul(&self.comm)
    }

    /// `name` up to the first NUL
    #[must_use]
    pub fn name_bytes(&self) -> &[u8] {
        until_nul(&self.name)
    }

    /// Set `comm`, truncating to at most `COMM_LEN - 1` bytes
    pub fn set_comm(&mut self, comm: &str) {
        fill_nul_padded(&mut self.comm, comm);
    }

    /// Set `name`, truncating to at most `NAME_LEN - 1` bytes
    pub fn set_name(&mut self, name: &str) {
        fill_nul_padded(&mut self.name, name);
    }
}

fn array<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    out
}

fn until_nul(bytes: &[u8]) -> &[u8] {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    &bytes[..end]
}

// Always leaves at least one trailing NUL; never splits a UTF-8 character.
fn fill_nul_padded(dst: &mut [u8], src: &str) {
    dst.fill(0);
    let mut len = src.len().min(dst.len() - 1);
    while !src.is_char_boundary(len) {
        len -= 1;
    }
    dst[..len].copy_from_slice(&src.as_bytes()[..len]);
}
