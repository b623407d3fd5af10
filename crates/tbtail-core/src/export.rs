//! One-shot export of a fully scanned run
//!
//! Produces `{ tag: { "steps": [...], "values": [...] } }` with both arrays
//! sorted by step, ready for conversion into a columnar format.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ExportError;
use crate::tailer::{Run, Tailer};

/// Sorted steps and values of one tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedSeries {
    pub steps: Vec<i64>,
    pub values: Vec<f64>,
}

/// Every scalar tag of a run, keyed by tag name
pub type RunExport = BTreeMap<String, ExportedSeries>;

/// Collect a run's series into plain arrays
pub fn export_run(run: &Run) -> RunExport {
    run.all_series()
        .map(|(tag, series)| {
            (
                tag.to_string(),
                ExportedSeries {
                    steps: series.steps(),
                    values: series.values(),
                },
            )
        })
        .collect()
}

/// Serialize an export as pretty-printed JSON
pub fn write_json<W: Write>(export: &RunExport, writer: W) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(writer, export)?;
    Ok(())
}

/// Export the named run to a JSON file
pub fn export_to_path(tailer: &Tailer, run_name: &str, path: &Path) -> Result<usize, ExportError> {
    let run = tailer
        .run(run_name)
        .ok_or_else(|| ExportError::UnknownRun(run_name.to_string()))?;

    let export = export_run(run);
    let mut writer = BufWriter::new(File::create(path)?);
    write_json(&export, &mut writer)?;
    writer.flush()?;

    info!(run = run_name, path = %path.display(), tags = export.len(), "exported run");
    Ok(export.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::NullSink;
    use crate::event::Event;
    use crate::record::RecordWriter;
    use crate::tailer::RunSpec;

    fn scanned(dir: &tempfile::TempDir) -> Tailer {
        let path = dir.path().join("events.out.tfevents.test");
        let mut writer = RecordWriter::new(File::create(&path).unwrap());
        writer.write_event(&Event::new(2, Some(2.0)).with_scalar("loss", 0.5)).unwrap();
        writer.write_event(&Event::new(1, Some(1.0)).with_scalar("loss", 1.0).with_scalar("lr", 0.25)).unwrap();
        writer.flush().unwrap();

        let mut tailer = Tailer::new([RunSpec::new("run", &path)]);
        tailer.rescan(true, &mut NullSink);
        tailer
    }

    #[test]
    fn test_export_sorted_by_step() {
        let dir = tempfile::TempDir::new().unwrap();
        let tailer = scanned(&dir);
        let export = export_run(tailer.run("run").unwrap());

        assert_eq!(export.len(), 2);
        assert_eq!(export["loss"].steps, vec![1, 2]);
        assert_eq!(export["loss"].values, vec![1.0, 0.5]);
        assert_eq!(export["lr"].steps, vec![1]);
    }

    #[test]
    fn test_export_to_path_round_trips() {
        let dir = tempfile::TempDir::new().unwrap();
        let tailer = scanned(&dir);
        let out = dir.path().join("out.json");

        let tags = export_to_path(&tailer, "run", &out).unwrap();
        assert_eq!(tags, 2);

        let parsed: RunExport = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(parsed, export_run(tailer.run("run").unwrap()));
    }

    #[test]
    fn test_unknown_run() {
        let dir = tempfile::TempDir::new().unwrap();
        let tailer = scanned(&dir);
        let err = export_to_path(&tailer, "nope", &dir.path().join("x.json")).unwrap_err();
        assert!(matches!(err, ExportError::UnknownRun(name) if name == "nope"));
    }
}
