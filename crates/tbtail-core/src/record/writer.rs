//! Frame writer
//!
//! Produces byte-exact TFRecord frames. The viewer never writes event files;
//! this exists for tests and benchmarks.

use std::io::{self, Write};

use super::{FOOTER_LEN, HEADER_LEN};
use crate::checksum::masked_checksum;
use crate::event::Event;

/// Frame a payload
pub fn encode_frame(payload: &[u8]) -> Vec<u8> {
    let len_bytes = (payload.len() as u64).to_le_bytes();

    let mut frame = Vec::with_capacity(HEADER_LEN + payload.len() + FOOTER_LEN);
    frame.extend_from_slice(&len_bytes);
    frame.extend_from_slice(&masked_checksum(&len_bytes).to_le_bytes());
    frame.extend_from_slice(payload);
    frame.extend_from_slice(&masked_checksum(payload).to_le_bytes());
    frame
}

/// Appends frames to any writer
pub struct RecordWriter<W: Write> {
    inner: W,
    records: u64,
    bytes: u64,
}

impl<W: Write> RecordWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            records: 0,
            bytes: 0,
        }
    }

    /// Write one framed payload, returning the frame size in bytes
    pub fn write_payload(&mut self, payload: &[u8]) -> io::Result<u64> {
        let frame = encode_frame(payload);
        self.inner.write_all(&frame)?;
        self.records += 1;
        self.bytes += frame.len() as u64;
        Ok(frame.len() as u64)
    }

    /// Encode and write an event
    pub fn write_event(&mut self, event: &Event) -> io::Result<u64> {
        self.write_payload(&event.encode_to_vec())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    /// Records written through this writer
    pub fn records_written(&self) -> u64 {
        self.records
    }

    /// Bytes written through this writer
    pub fn bytes_written(&self) -> u64 {
        self.bytes
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}
