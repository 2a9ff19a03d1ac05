use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::model::forest::Forest;
use crate::model::group::Group;
use crate::model::task::Task;
use crate::store::Persist;

/// Error type for snapshot I/O
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not serialize snapshot: {0}")]
    SerializeError(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

// ---------------------------------------------------------------------------
// Stored shape
// ---------------------------------------------------------------------------

// Older snapshots may lack any of the optional fields; the earliest ones only
// carry `id`, `name` and `tasks`.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredGroup {
    id: String,
    name: String,
    order: Option<usize>,
    is_open: Option<bool>,
    #[serde(default)]
    tasks: Vec<StoredTask>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredTask {
    id: String,
    name: String,
    order: Option<usize>,
    hidden_until: Option<NaiveDate>,
    completed_date: Option<NaiveDate>,
    is_open: Option<bool>,
    #[serde(default)]
    tasks: Vec<StoredTask>,
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Fills defaults and makes every sibling list dense, counting the nodes it
/// had to touch.
#[derive(Debug, Default)]
struct Normalizer {
    repaired: usize,
}

impl Normalizer {
    /// Stable sort by stored order (absent = position), then rank `0..n`.
    fn rank<T>(&mut self, items: Vec<T>, stored_order: impl Fn(&T) -> Option<usize>) -> Vec<(usize, T)> {
        let mut keyed: Vec<(usize, Option<usize>, T)> = items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                let stored = stored_order(&item);
                (stored.unwrap_or(i), stored, item)
            })
            .collect();
        keyed.sort_by_key(|(key, _, _)| *key);
        keyed
            .into_iter()
            .enumerate()
            .map(|(i, (_, stored, item))| {
                if stored != Some(i) {
                    self.repaired += 1;
                }
                (i, item)
            })
            .collect()
    }

    fn groups(&mut self, stored: Vec<StoredGroup>) -> Vec<Group> {
        self.rank(stored, |g| g.order)
            .into_iter()
            .map(|(order, g)| {
                let is_open = self.flag(g.is_open);
                Group {
                    id: g.id,
                    name: g.name,
                    order,
                    is_open,
                    tasks: self.tasks(g.tasks),
                }
            })
            .collect()
    }

    fn tasks(&mut self, stored: Vec<StoredTask>) -> Vec<Task> {
        self.rank(stored, |t| t.order)
            .into_iter()
            .map(|(order, t)| {
                let is_open = self.flag(t.is_open);
                Task {
                    id: t.id,
                    name: t.name,
                    order,
                    hidden_until: t.hidden_until,
                    completed_date: t.completed_date,
                    is_open,
                    tasks: self.tasks(t.tasks),
                }
            })
            .collect()
    }

    fn flag(&mut self, is_open: Option<bool>) -> bool {
        is_open.unwrap_or_else(|| {
            self.repaired += 1;
            true
        })
    }
}

/// Parse snapshot JSON and normalize it into a fully populated forest.
pub fn parse_snapshot(text: &str) -> Result<Forest, serde_json::Error> {
    let stored: Vec<StoredGroup> = serde_json::from_str(text)?;
    let mut normalizer = Normalizer::default();
    let forest = Forest::new(normalizer.groups(stored));
    if normalizer.repaired > 0 {
        debug!(repaired = normalizer.repaired, "normalized snapshot fields");
    }
    Ok(forest)
}

/// Pretty JSON with a trailing newline.
pub fn serialize_snapshot(forest: &Forest) -> Result<String, serde_json::Error> {
    let mut text = serde_json::to_string_pretty(forest)?;
    text.push('\n');
    Ok(text)
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

/// Load the snapshot at `path`. A missing file means first run.
pub fn load_snapshot(path: &Path) -> Result<Option<Forest>, SnapshotError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(SnapshotError::ReadError {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    let forest = parse_snapshot(&text).map_err(|e| SnapshotError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    info!(
        path = %path.display(),
        groups = forest.groups.len(),
        tasks = forest.task_count(),
        "loaded snapshot"
    );
    Ok(Some(forest))
}

/// Write the whole forest to `path`, creating the parent directory if needed.
pub fn save_snapshot(path: &Path, forest: &Forest) -> Result<(), SnapshotError> {
    let content = serialize_snapshot(forest)?;
    let write_error = |e| SnapshotError::WriteError {
        path: path.to_path_buf(),
        source: e,
    };
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir).map_err(write_error)?;
    }
    atomic_write(path, content.as_bytes()).map_err(write_error)?;
    debug!(path = %path.display(), "saved snapshot");
    Ok(())
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Persistence port backed by one JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<Forest>, SnapshotError> {
        load_snapshot(&self.path)
    }
}

impl Persist for JsonFileStore {
    fn persist(&mut self, forest: &Forest) -> Result<(), SnapshotError> {
        save_snapshot(&self.path, forest)
    }
}
