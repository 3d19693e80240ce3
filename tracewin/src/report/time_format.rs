//! Wall-clock rendering of trace timestamps

use chrono::{DateTime, Local, Utc};

use crate::domain::Timestamp;

/// How timestamps are printed: UTC (`--gmt`) or the local time zone
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeFormat {
    pub utc: bool,
}

impl TimeFormat {
    #[must_use]
    pub fn new(utc: bool) -> Self {
        Self { utc }
    }

    /// `YYYY-MM-DD HH:MM:SS.nnnnnnnnn`
    #[must_use]
    pub fn date_time(&self, ts: Timestamp) -> String {
        self.render(ts, "%Y-%m-%d %H:%M:%S%.9f")
    }

    /// `HH:MM:SS.nnnnnnnnn`
    #[must_use]
    pub fn time_of_day(&self, ts: Timestamp) -> String {
        self.render(ts, "%H:%M:%S%.9f")
    }

    fn render(&self, ts: Timestamp, pattern: &str) -> String {
        let Some(utc) = to_datetime(ts) else {
            // Past chrono's range; fall back to raw seconds
            return ts.to_string();
        };
        if self.utc {
            utc.format(pattern).to_string()
        } else {
            utc.with_timezone(&Local).format(pattern).to_string()
        }
    }
}

/// `None` past chrono's representable range
#[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
pub(crate) fn to_datetime(ts: Timestamp) -> Option<DateTime<Utc>> {
    let secs = ts.second_bucket() as i64;
    let nanos = (ts.as_nanos() % crate::domain::NSEC_PER_SEC) as u32;
    DateTime::from_timestamp(secs, nanos)
}
