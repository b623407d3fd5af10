//! Error types for tbtail-core
//!
//! Read errors never escape the tailer. They end the current scan of one run
//! and are handed to a [`DiagnosticSink`](crate::DiagnosticSink).

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::diagnostics::Severity;

/// Which part of a frame an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSection {
    /// The 8-byte length plus its checksum
    Header,
    /// The payload plus its checksum
    Payload,
}

impl fmt::Display for FrameSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameSection::Header => write!(f, "header"),
            FrameSection::Payload => write!(f, "payload"),
        }
    }
}

/// Conditions that end reading of a record stream
#[derive(Debug, Error)]
pub enum ReadError {
    /// Stored masked checksum does not match the bytes
    #[error("{section} checksum mismatch in record at offset {offset}")]
    ChecksumMismatch { section: FrameSection, offset: u64 },

    /// Fewer bytes available than the frame requires
    #[error("truncated {section} in record at offset {offset}: expected {expected} bytes, {available} available")]
    Truncated {
        section: FrameSection,
        offset: u64,
        expected: u64,
        available: u64,
    },

    /// Length header is zero or above the per-record cap
    #[error("unreasonable record length {length} at offset {offset}")]
    UnreasonableLength { offset: u64, length: u64 },

    /// Payload is not a valid event message
    #[error("failed to decode event at offset {offset}: {source}")]
    Decode {
        offset: u64,
        #[source]
        source: prost::DecodeError,
    },

    /// File could not be opened, stat'ed or read
    #[error("I/O unavailable for {}: {source}", path.display())]
    IoUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ReadError {
    /// Severity used when reporting this error
    ///
    /// A truncated tail is normal while a writer is mid-record.
    pub fn severity(&self) -> Severity {
        match self {
            ReadError::Truncated { .. } => Severity::Info,
            _ => Severity::Warning,
        }
    }

    /// Create an I/O error for a path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoUnavailable {
            path: path.into(),
            source,
        }
    }
}

/// Errors produced by the one-shot export
#[derive(Debug, Error)]
pub enum ExportError {
    /// I/O error writing the export file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Requested run is not tracked
    #[error("Unknown run: {0}")]
    UnknownRun(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncation_is_informational() {
        let err = ReadError::Truncated {
            section: FrameSection::Payload,
            offset: 12,
            expected: 40,
            available: 3,
        };
        assert_eq!(err.severity(), Severity::Info);
        assert!(err.to_string().contains("truncated payload"));
    }

    #[test]
    fn test_checksum_mismatch_is_warning() {
        let err = ReadError::ChecksumMismatch {
            section: FrameSection::Header,
            offset: 0,
        };
        assert_eq!(err.severity(), Severity::Warning);
        assert!(err.to_string().contains("header checksum mismatch"));
    }

    #[test]
    fn test_io_error_mentions_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = ReadError::io("/tmp/missing.tfevents", io_err);
        assert!(matches!(err, ReadError::IoUnavailable { .. }));
        assert!(err.to_string().contains("/tmp/missing.tfevents"));
    }

    #[test]
    fn test_unknown_run_export_error() {
        let err = ExportError::UnknownRun("baseline".into());
        assert!(err.to_string().contains("baseline"));
    }
}
