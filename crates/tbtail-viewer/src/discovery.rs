//! Locating event files and naming runs
//!
//! A file argument is a single run. A directory is walked for
//! `events.out.tfevents*` files; each one is named after the directory that
//! holds it, relative to the root.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use glob::{Pattern, glob};
use tbtail_core::RunSpec;
use thiserror::Error;
use tracing::{debug, warn};

const EVENT_FILE_PREFIX: &str = "events.out.tfevents";

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("{} is not a valid file or directory: {source}", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("glob pattern error: {pattern}: {source}")]
    Glob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("no event file found in directory {}", .0.display())]
    NoEventFiles(PathBuf),
}

/// What the command-line path points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    File(RunSpec),
    Directory(PathBuf),
}

impl Target {
    pub fn resolve(path: &Path) -> Result<Self, DiscoveryError> {
        let path = fs::canonicalize(path).map_err(|source| DiscoveryError::NotFound {
            path: path.to_path_buf(),
            source,
        })?;

        if path.is_dir() {
            return Ok(Target::Directory(path));
        }

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = if is_event_file(&file_name) {
            local_event_name(&file_name)
        } else {
            warn!(path = %path.display(), "invalid event filename");
            file_name
        };
        Ok(Target::File(RunSpec::new(name, path)))
    }
}

/// One event file found under the root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    pub path: PathBuf,
    /// Holding directory relative to the root, `/`-separated; empty at the root
    pub relative_dir: String,
    pub file_name: String,
    pub size: u64,
    /// Unique among the files of one discovery pass
    pub run_name: String,
}

impl DiscoveredFile {
    /// Picker line: `[index] dir/events.out.tfevents.<first field>`
    pub fn label(&self, index: usize) -> String {
        format!("[{}] {}/{}", index, self.relative_dir, local_event_name(&self.file_name))
    }

    pub fn run_spec(&self) -> RunSpec {
        RunSpec::new(self.run_name.clone(), self.path.clone())
    }
}

pub fn is_event_file(file_name: &str) -> bool {
    file_name.starts_with(EVENT_FILE_PREFIX)
}

/// Shorten a file name to the prefix plus its first dotted field
///
/// `events.out.tfevents.1700000000.host.42.0` becomes
/// `events.out.tfevents.1700000000`.
pub fn local_event_name(file_name: &str) -> String {
    let rest = file_name
        .strip_prefix(EVENT_FILE_PREFIX)
        .map(|rest| rest.trim_start_matches('.'))
        .unwrap_or(file_name);
    let first = rest.split('.').next().unwrap_or(rest);
    format!("{}.{}", EVENT_FILE_PREFIX, first)
}

/// Find every event file under `root`, sorted by file name descending
pub fn discover(root: &Path) -> Result<Vec<DiscoveredFile>, DiscoveryError> {
    let root = fs::canonicalize(root).map_err(|source| DiscoveryError::NotFound {
        path: root.to_path_buf(),
        source,
    })?;

    let pattern = format!(
        "{}/**/{}*",
        Pattern::escape(&root.to_string_lossy()),
        EVENT_FILE_PREFIX
    );
    let paths = glob(&pattern).map_err(|source| DiscoveryError::Glob {
        pattern: pattern.clone(),
        source,
    })?;

    let mut files: Vec<DiscoveredFile> = paths
        .filter_map(Result::ok)
        .filter_map(|path| {
            let metadata = fs::metadata(&path).ok().filter(|m| m.is_file())?;
            let file_name = path.file_name()?.to_string_lossy().into_owned();
            let relative_dir = path
                .parent()
                .and_then(|parent| parent.strip_prefix(&root).ok())
                .map(|dir| {
                    dir.components()
                        .map(|c| c.as_os_str().to_string_lossy().into_owned())
                        .collect::<Vec<_>>()
                        .join("/")
                })
                .unwrap_or_default();

            Some(DiscoveredFile {
                path,
                relative_dir,
                file_name,
                size: metadata.len(),
                run_name: String::new(),
            })
        })
        .collect();

    if files.is_empty() {
        return Err(DiscoveryError::NoEventFiles(root));
    }

    files.sort_by(|a, b| b.file_name.cmp(&a.file_name).then_with(|| a.path.cmp(&b.path)));
    assign_run_names(&mut files);

    debug!(root = %root.display(), files = files.len(), "discovered event files");
    Ok(files)
}

/// Name runs after their directory, suffixing `#n` on collisions
fn assign_run_names(files: &mut [DiscoveredFile]) {
    let mut seen: HashMap<String, usize> = HashMap::new();
    for file in files {
        let base = if file.relative_dir.is_empty() {
            local_event_name(&file.file_name)
        } else {
            file.relative_dir.clone()
        };

        let count = seen.entry(base.clone()).or_insert(0);
        *count += 1;
        file.run_name = if *count == 1 {
            base
        } else {
            format!("{}#{}", base, count)
        };
    }
}
