//! Binary trace source
//!
//! Reads the fixed-size record format defined in `tracewin-common`. The magic
//! header is checked when the source is created so a wrong file fails before
//! any analysis starts.

use std::io::{ErrorKind, Read, Write};

use log::warn;
use tracewin_common::{TraceRecord, RECORD_SIZE, TRACE_MAGIC};

use crate::domain::SourceError;
use crate::trace_data::TraceEvent;

/// Lazy binary record reader
pub struct BinarySource<R> {
    reader: R,
    offset: u64,
    error: Option<SourceError>,
    done: bool,
}

impl<R: Read> BinarySource<R> {
    /// Check the header and position the reader on the first record
    ///
    /// # Errors
    /// Returns `BadMagic` if the header is missing or wrong
    pub fn new(mut reader: R) -> Result<Self, SourceError> {
        let mut magic = [0u8; TRACE_MAGIC.len()];
        match reader.read_exact(&mut magic) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Err(SourceError::BadMagic),
            Err(e) => return Err(SourceError::Io(e)),
        }
        if magic != TRACE_MAGIC {
            return Err(SourceError::BadMagic);
        }

        Ok(Self { reader, offset: TRACE_MAGIC.len() as u64, error: None, done: false })
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

    /// Fill `buf`, returning how many bytes were read before EOF
    fn read_full(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }
}

impl<R: Read> Iterator for BinarySource<R> {
    type Item = TraceEvent;

    fn next(&mut self) -> Option<TraceEvent> {
        if self.done {
            return None;
        }

        let mut buf = [0u8; RECORD_SIZE];
        let record_offset = self.offset;
        match self.read_full(&mut buf) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(n) if n < RECORD_SIZE => {
                self.fail(SourceError::TruncatedRecord { offset: record_offset })
            }
            Ok(_) => {
                self.offset += RECORD_SIZE as u64;
                let Some(record) = TraceRecord::decode(&buf) else {
                    return self.fail(SourceError::TruncatedRecord { offset: record_offset });
                };
                if let Some(event) = TraceEvent::from_record(&record) {
                    Some(event)
                } else {
                    warn!("unknown event type {} at offset {record_offset}", record.event_type);
                    self.fail(SourceError::UnknownEventType {
                        event_type: record.event_type,
                        offset: record_offset,
                    })
                }
            }
            Err(e) => self.fail(SourceError::Io(e)),
        }
    }
}

/// Writes events in the binary trace format
pub struct BinaryWriter<W: Write> {
    writer: W,
}

impl<W: Write> BinaryWriter<W> {
    /// Write the header
    ///
    /// # Errors
    /// Returns an error if the header cannot be written
    pub fn new(mut writer: W) -> std::io::Result<Self> {
        writer.write_all(&TRACE_MAGIC)?;
        Ok(Self { writer })
    }

    /// Append one event
    ///
    /// # Errors
    /// Returns an error if the record cannot be written
    pub fn write_event(&mut self, event: &TraceEvent) -> std::io::Result<()> {
        self.writer.write_all(&event.to_record().encode())
    }

    /// Flush and return the underlying writer
    ///
    /// # Errors
    /// Returns an error if flushing fails
    pub fn finish(mut self) -> std::io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}
