//! TFRecord framing
//!
//! An event file is a sequence of frames, each protected by two masked
//! CRC-32C checksums:
//!
//! ```text
//! [8 bytes: len LE][4 bytes: masked crc(len)][len bytes: payload][4 bytes: masked crc(payload)]
//! ```
//!
//! The reader stops at the first frame that is truncated, fails a checksum,
//! has an unreasonable length or does not decode. Everything yielded before
//! that point stays valid, and callers resume from the last end offset.

pub mod reader;
pub mod writer;

pub use reader::{RecordReader, Records, read_all, read_from, read_from_bounded};
pub use writer::{RecordWriter, encode_frame};

/// Length field plus its checksum
pub const HEADER_LEN: usize = 12;

/// Trailing payload checksum
pub const FOOTER_LEN: usize = 4;

/// Largest payload accepted before a frame is considered corrupt
pub const MAX_RECORD_LEN: u64 = 64 * 1024 * 1024;
