//! Sequential, offset-resumable frame reader

use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use super::{FOOTER_LEN, HEADER_LEN, MAX_RECORD_LEN};
use crate::checksum;
use crate::diagnostics::DiagnosticSink;
use crate::error::{FrameSection, ReadError};
use crate::event::Event;

/// Reads frames one at a time from a seekable byte source
pub struct RecordReader<R> {
    inner: BufReader<R>,
    /// Origin used in I/O diagnostics
    path: PathBuf,
    /// Byte position of the next unread byte
    position: u64,
    /// Absolute position reading must not pass
    limit: Option<u64>,
}

impl<R: Read + Seek> RecordReader<R> {
    /// Create a reader positioned at `start_offset`
    pub fn new(inner: R, start_offset: u64) -> io::Result<Self> {
        let mut inner = BufReader::new(inner);
        inner.seek(SeekFrom::Start(start_offset))?;

        Ok(Self {
            inner,
            path: PathBuf::from("<stream>"),
            position: start_offset,
            limit: None,
        })
    }
}

impl<R: Read> RecordReader<R> {
    /// Never read past absolute byte position `limit`
    ///
    /// Bytes appended after the limit was taken are left for a later pass.
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Name the source for diagnostics
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    /// Position immediately after the last byte consumed
    ///
    /// After a successful [`read_record`](Self::read_record) this is the end
    /// offset of that record.
    pub fn position(&self) -> u64 {
        self.position
    }

    fn available(&self) -> u64 {
        match self.limit {
            Some(limit) => limit.saturating_sub(self.position),
            None => u64::MAX,
        }
    }

    /// Read until `buf` is full or the source is exhausted
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize, ReadError> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(ReadError::io(self.path.clone(), e)),
            }
        }
        self.position += filled as u64;
        Ok(filled)
    }

    /// Read the next frame
    ///
    /// Returns `Ok(None)` at a clean end of input (no bytes left at a frame
    /// boundary, or the limit reached).
    pub fn read_record(&mut self) -> Result<Option<Event>, ReadError> {
        let offset = self.position;

        let want = (HEADER_LEN as u64).min(self.available()) as usize;
        if want == 0 {
            return Ok(None);
        }

        let mut header = [0u8; HEADER_LEN];
        let got = self.fill(&mut header[..want])?;
        if got == 0 {
            return Ok(None);
        }
        if got < HEADER_LEN {
            return Err(ReadError::Truncated {
                section: FrameSection::Header,
                offset,
                expected: HEADER_LEN as u64,
                available: got as u64,
            });
        }

        let (len_bytes, len_crc) = header.split_at(8);
        if !checksum::verify(len_bytes, len_crc) {
            return Err(ReadError::ChecksumMismatch {
                section: FrameSection::Header,
                offset,
            });
        }

        let mut raw_len = [0u8; 8];
        raw_len.copy_from_slice(len_bytes);
        let length = u64::from_le_bytes(raw_len);
        if length == 0 || length > MAX_RECORD_LEN {
            return Err(ReadError::UnreasonableLength { offset, length });
        }

        let needed = length + FOOTER_LEN as u64;
        let available = self.available();
        if needed > available {
            return Err(ReadError::Truncated {
                section: FrameSection::Payload,
                offset,
                expected: needed,
                available,
            });
        }

        let mut body = vec![0u8; needed as usize];
        let got = self.fill(&mut body)?;
        if (got as u64) < needed {
            return Err(ReadError::Truncated {
                section: FrameSection::Payload,
                offset,
                expected: needed,
                available: got as u64,
            });
        }

        let (payload, payload_crc) = body.split_at(length as usize);
        if !checksum::verify(payload, payload_crc) {
            return Err(ReadError::ChecksumMismatch {
                section: FrameSection::Payload,
                offset,
            });
        }

        let event = Event::decode(payload).map_err(|source| ReadError::Decode { offset, source })?;
        trace!(offset, length, step = event.step, "read record");
        Ok(Some(event))
    }

    /// Iterate records, reporting the terminal condition to `sink`
    pub fn records<'s>(self, sink: &'s mut dyn DiagnosticSink) -> Records<'s, R> {
        Records {
            reader: Some(self),
            sink,
            yielded: 0,
        }
    }
}

/// Pull iterator over `(event, end_offset)` pairs
///
/// Fused: once a terminal condition has been reported, it keeps returning
/// `None`.
pub struct Records<'s, R> {
    reader: Option<RecordReader<R>>,
    sink: &'s mut dyn DiagnosticSink,
    yielded: u64,
}

impl<'s, R> Records<'s, R> {
    /// An iterator that yields nothing
    fn empty(sink: &'s mut dyn DiagnosticSink) -> Self {
        Self {
            reader: None,
            sink,
            yielded: 0,
        }
    }

    /// Number of records produced so far
    pub fn yielded(&self) -> u64 {
        self.yielded
    }
}

impl<R: Read> Iterator for Records<'_, R> {
    type Item = (Event, u64);

    fn next(&mut self) -> Option<Self::Item> {
        let reader = self.reader.as_mut()?;
        match reader.read_record() {
            Ok(Some(event)) => {
                self.yielded += 1;
                Some((event, reader.position()))
            }
            Ok(None) => {
                debug!(records = self.yielded, end = reader.position(), "end of records");
                self.reader = None;
                None
            }
            Err(err) => {
                self.sink.report(err.severity(), err.to_string());
                self.reader = None;
                None
            }
        }
    }
}

/// Read records from `path` starting at byte `start_offset`
///
/// Each item carries the offset just past the record, suitable as the next
/// call's `start_offset`.
pub fn read_from<'s>(
    path: &Path,
    start_offset: u64,
    sink: &'s mut dyn DiagnosticSink,
) -> Records<'s, File> {
    read_from_bounded(path, start_offset, None, sink)
}

/// Like [`read_from`], never reading past absolute position `limit`
pub fn read_from_bounded<'s>(
    path: &Path,
    start_offset: u64,
    limit: Option<u64>,
    sink: &'s mut dyn DiagnosticSink,
) -> Records<'s, File> {
    let opened = File::open(path).and_then(|file| RecordReader::new(file, start_offset));
    match opened {
        Ok(reader) => {
            let reader = reader.with_path(path);
            let reader = match limit {
                Some(limit) => reader.with_limit(limit),
                None => reader,
            };
            reader.records(sink)
        }
        Err(e) => {
            let err = ReadError::io(path, e);
            sink.report(err.severity(), err.to_string());
            Records::empty(sink)
        }
    }
}

/// Read every record in `path` from the beginning
pub fn read_all<'s>(
    path: &Path,
    sink: &'s mut dyn DiagnosticSink,
) -> impl Iterator<Item = Event> + use<'s> {
    read_from(path, 0, sink).map(|(event, _)| event)
}
