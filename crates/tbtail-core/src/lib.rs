//! # tbtail core
//!
//! Ingestion and analytics engine for TensorBoard event files.
//!
//! Event files are append-only sequences of TFRecord frames, each carrying a
//! protobuf `Event`. This crate reads those frames robustly while a trainer
//! is still writing them, folds scalar summaries into per-run time series
//! and computes everything a chart needs for one frame.
//!
//! ## Features
//!
//! - **Checksum**: table-driven CRC-32C with the TFRecord mask
//! - **Record reader**: offset-resumable pull iterator that reports, never
//!   raises, on a malformed tail
//! - **Tailer**: incremental rescans over many runs with a cheap no-change path
//! - **Analytics**: smoothing, x-axis projection, limit clamping, ETA
//! - **Export**: plain `{tag: {steps, values}}` JSON for a scanned run
//!
//! ## Example
//!
//! ```rust,ignore
//! use tbtail_core::{RunSpec, Tailer, TracingSink};
//!
//! let mut tailer = Tailer::new([RunSpec::new("baseline", "runs/baseline/events.out.tfevents.1")]);
//! tailer.rescan(true, &mut TracingSink);
//!
//! for tag in tailer.tags() {
//!     println!("{tag}");
//! }
//! ```

pub mod analytics;
pub mod checksum;
pub mod diagnostics;
pub mod error;
pub mod event;
pub mod export;
pub mod record;
pub mod tailer;

// Re-exports
pub use analytics::{ChartModel, ChartRequest, XAxisMode};
pub use diagnostics::{Diagnostic, DiagnosticSink, NullSink, Severity, TracingSink};
pub use error::{ExportError, FrameSection, ReadError};
pub use event::{Event, Scalar};
pub use record::{RecordReader, RecordWriter, read_all, read_from};
pub use tailer::{Run, RunSpec, Sample, ScanReport, Tailer, TimeSeries};
