//! Analysis consumers
//!
//! Each consumer implements [`Consumer`](crate::engine::Consumer) and is fed
//! by the dispatch loop. Statistics (`SyscallStats`, `EventCounter`) are
//! reset by the caller at every window flush; `ProcessTracker` is state and
//! is never reset.

pub mod event_counter;
pub mod process_filter;
pub mod process_tracker;
pub mod syscall_stats;

pub use event_counter::EventCounter;
pub use process_filter::ProcessFilter;
pub use process_tracker::{ProcessTracker, ThreadInfo};
pub use syscall_stats::{SyscallCount, SyscallStats, TidSyscalls};
