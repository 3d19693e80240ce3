//! JSON Lines trace source
//!
//! One [`TraceEvent`] per line. Blank lines are skipped. The first line that
//! fails to read or parse ends the stream; the error is kept for the caller.

use std::io::BufRead;

use crate::domain::SourceError;
use crate::trace_data::TraceEvent;

/// Lazy JSON Lines event reader
pub struct JsonLinesSource<R> {
    lines: std::io::Lines<R>,
    line_no: usize,
    error: Option<SourceError>,
    done: bool,
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        Self { lines: reader.lines(), line_no: 0, error: None, done: false }
    }

    /// Error that ended the stream early, if any
    pub fn take_error(&mut self) -> Option<SourceError> {
        self.error.take()
    }

    fn fail(&mut self, error: SourceError) -> Option<TraceEvent> {
        self.done = true;
        self.error = Some(error);
        None
    }
}

impl<R: BufRead> Iterator for JsonLinesSource<R> {
    type Item = TraceEvent;

    fn next(&mut self) -> Option<TraceEvent> {
        if self.done {
            return None;
        }

        loop {
            let Some(line) = self.lines.next() else {
                self.done = true;
                return None;
            };
            self.line_no += 1;

            let line = match line {
                Ok(line) => line,
                Err(e) => return self.fail(SourceError::Io(e)),
            };
            if line.trim().is_empty() {
                continue;
            }

            return match serde_json::from_str::<TraceEvent>(&line) {
                Ok(event) => Some(event),
                Err(e) => {
                    let line = self.line_no;
                    self.fail(SourceError::Malformed { line, reason: e.to_string() })
                }
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Timestamp;
    use std::io::Cursor;

    #[test]
    fn test_reads_events_and_skips_blank_lines() {
        let input = "{\"ts\": 1, \"event\": \"other\", \"name\": \"a\"}\n\n\
                     {\"ts\": 2, \"event\": \"other\", \"name\": \"b\"}\n";
        let mut source = JsonLinesSource::new(Cursor::new(input));

        let stamps: Vec<Timestamp> = source.by_ref().map(|e| e.timestamp).collect();
        assert_eq!(stamps, vec![Timestamp(1), Timestamp(2)]);
        assert!(source.take_error().is_none());
    }

    #[test]
    fn test_malformed_line_ends_stream() {
        let input = "{\"ts\": 1, \"event\": \"other\", \"name\": \"a\"}\n\
                     not json\n\
                     {\"ts\": 3, \"event\": \"other\", \"name\": \"c\"}\n";
        let mut source = JsonLinesSource::new(Cursor::new(input));

        assert_eq!(source.by_ref().count(), 1);
        match source.take_error() {
            Some(SourceError::Malformed { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected malformed error, got {other:?}"),
        }
        assert!(source.next().is_none());
    }
}
