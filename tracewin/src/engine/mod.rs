//! Time-windowed event processing engine
//!
//! - `filter`: begin/end boundaries
//! - `window`: window bounds, wall-second flush detection, per-run state
//! - `dispatch`: the main loop, consumer fan-out and caller hooks
//!
//! The engine computes no statistic. It decides when events reach the
//! consumers and when the caller is asked for a summary.

pub mod dispatch;
pub mod filter;
pub mod window;

pub use dispatch::{Consumer, ConsumerSet, Dispatcher, RunSummary, Timestamped, WindowHooks};
pub use filter::TimeFilter;
pub use window::{RefreshPeriod, Window, WindowState};
