//! Identifier and time newtypes
//!
//! Thread, process and CPU ids are plain `u32`s on the wire; keeping them in
//! distinct types stops a TID from being counted under a PID.

// Seconds as f64 are only used for display
#![allow(clippy::cast_precision_loss)]

use serde::{Deserialize, Serialize};
use std::fmt;

/// Nanoseconds per second
pub const NSEC_PER_SEC: u64 = 1_000_000_000;

/// Process ID (TGID) in the traced system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pid(pub u32);

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Thread ID
///
/// A thread has a TID assigned by the kernel; the main thread's TID equals
/// its process's PID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tid(pub u32);

impl fmt::Display for Tid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// CPU the event was recorded on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CpuId(pub u32);

impl fmt::Display for CpuId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Timestamp in nanoseconds
///
/// Absolute point in time as recorded by the tracer (nanoseconds since the
/// Unix epoch for traces with a real-time clock).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// Raw nanosecond value
    #[must_use]
    pub fn as_nanos(self) -> u64 {
        self.0
    }

    /// Whole-second bucket this timestamp falls in (truncating)
    #[must_use]
    pub fn second_bucket(self) -> u64 {
        self.0 / NSEC_PER_SEC
    }

    /// Nanoseconds elapsed since `earlier` (0 if `earlier` is later)
    #[must_use]
    pub fn saturating_since(self, earlier: Timestamp) -> Duration {
        Duration(self.0.saturating_sub(earlier.0))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.0 / NSEC_PER_SEC, self.0 % NSEC_PER_SEC)
    }
}

/// Duration in nanoseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Duration(pub u64);

impl Duration {
    /// Convert to milliseconds (f64)
    #[must_use]
    pub fn as_millis(self) -> f64 {
        self.0 as f64 / 1_000_000.0
    }

    /// Convert to seconds (f64)
    #[must_use]
    pub fn as_seconds(self) -> f64 {
        self.0 as f64 / NSEC_PER_SEC as f64
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ms = self.as_millis();
        if ms >= 1000.0 {
            write!(f, "{:.2}s", self.as_seconds())
        } else {
            write!(f, "{ms:.2}ms")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_bucket_truncates() {
        assert_eq!(Timestamp(0).second_bucket(), 0);
        assert_eq!(Timestamp(999_999_999).second_bucket(), 0);
        assert_eq!(Timestamp(2_000_000_001).second_bucket(), 2);
    }

    #[test]
    fn test_timestamp_display() {
        assert_eq!(Timestamp(1_500_000_000).to_string(), "1.500000000");
        assert_eq!(Timestamp(42).to_string(), "0.000000042");
    }

    #[test]
    fn test_saturating_since() {
        assert_eq!(Timestamp(10).saturating_since(Timestamp(4)), Duration(6));
        assert_eq!(Timestamp(4).saturating_since(Timestamp(10)), Duration(0));
    }

    #[test]
    fn test_duration_display() {
        assert_eq!(Duration(5_000_000).to_string(), "5.00ms");
        assert_eq!(Duration(1_500_000_000).to_string(), "1.50s");
    }

    #[test]
    fn test_id_display() {
        assert_eq!(Pid(1234).to_string(), "1234");
        assert_eq!(Tid(7).to_string(), "7");
        assert_eq!(CpuId(3).to_string(), "3");
    }
}
