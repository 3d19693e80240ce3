//! Single-line progress indicator on stderr

use std::io::{self, Write};
use std::time::{Duration, Instant};

use crate::domain::Timestamp;
use crate::report::TimeFormat;

/// Events between two looks at the clock
const CHECK_EVERY: u64 = 4096;
const REDRAW_INTERVAL: Duration = Duration::from_millis(200);

/// Throttled `\r` progress line
///
/// Redraws at most every 200ms; [`finish`](Self::finish) clears the line so
/// the next report starts on a clean row.
pub struct ProgressLine<W: Write> {
    out: W,
    time_format: TimeFormat,
    events: u64,
    last_draw: Option<Instant>,
    drawn: bool,
}

impl ProgressLine<io::Stderr> {
    #[must_use]
    pub fn stderr(time_format: TimeFormat) -> Self {
        Self::new(io::stderr(), time_format)
    }
}

impl<W: Write> ProgressLine<W> {
    pub fn new(out: W, time_format: TimeFormat) -> Self {
        Self { out, time_format, events: 0, last_draw: None, drawn: false }
    }

    #[must_use]
    pub fn events(&self) -> u64 {
        self.events
    }

    /// Count one event; redraw if the interval elapsed
    pub fn update(&mut self, ts: Timestamp) {
        self.events += 1;
        if self.events % CHECK_EVERY != 1 {
            return;
        }

        let now = Instant::now();
        if self.last_draw.is_some_and(|t| now.duration_since(t) < REDRAW_INTERVAL) {
            return;
        }
        self.last_draw = Some(now);
        self.draw(ts);
    }

    fn draw(&mut self, ts: Timestamp) {
        // Progress output is best effort
        let _ = write!(
            self.out,
            "\r   Progress: {} events, at {}   ",
            self.events,
            self.time_format.time_of_day(ts)
        );
        let _ = self.out.flush();
        self.drawn = true;
    }

    /// Erase the progress line if anything was drawn
    pub fn finish(&mut self) {
        if self.drawn {
            let _ = write!(self.out, "\r{:width$}\r", "", width = 79);
            let _ = self.out.flush();
            self.drawn = false;
        }
    }
}
