//! Whole-collection JSON snapshot backing a file-backed `TodoStore`.
//!
//! # Design
//! The file holds `{"version": 1, "todos": [...]}` in insertion order. It is
//! read once when the store opens and rewritten after every successful
//! mutation. Writes go to a sibling `*.tmp` file that is renamed over the
//! target, so a crash mid-write leaves the previous snapshot intact.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SnapshotError;
use crate::types::Todo;

/// Current on-disk format version.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize)]
struct SnapshotOut<'a> {
    version: u32,
    todos: &'a [Todo],
}

#[derive(Deserialize)]
struct SnapshotIn {
    version: u32,
    #[serde(default)]
    todos: Vec<Todo>,
}

/// Location of a snapshot file.
#[derive(Debug, Clone)]
pub struct Snapshot {
    path: PathBuf,
}

impl Snapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all todos from disk. A missing file is an empty collection.
    pub fn load(&self) -> Result<Vec<Todo>, SnapshotError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no snapshot yet, starting empty");
                return Ok(Vec::new());
            }
            Err(source) => return Err(self.io_error(source)),
        };

        let snapshot: SnapshotIn = serde_json::from_str(&raw)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(snapshot.version));
        }

        let mut seen = HashSet::with_capacity(snapshot.todos.len());
        for todo in &snapshot.todos {
            todo.validate()
                .map_err(|source| SnapshotError::InvalidRecord { id: todo.id(), source })?;
            if !seen.insert(todo.id()) {
                return Err(SnapshotError::DuplicateId(todo.id()));
            }
        }

        debug!(path = %self.path.display(), count = snapshot.todos.len(), "snapshot loaded");
        Ok(snapshot.todos)
    }

    /// Replace the snapshot on disk with `todos`.
    pub fn save(&self, todos: &[Todo]) -> Result<(), SnapshotError> {
        let body = serde_json::to_vec_pretty(&SnapshotOut {
            version: SNAPSHOT_VERSION,
            todos,
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let tmp = self.tmp_path();
        let write = || -> std::io::Result<()> {
            let mut file = File::create(&tmp)?;
            file.write_all(&body)?;
            file.sync_all()?;
            fs::rename(&tmp, &self.path)
        };
        if let Err(source) = write() {
            let _ = fs::remove_file(&tmp);
            return Err(self.io_error(source));
        }

        debug!(path = %self.path.display(), count = todos.len(), "snapshot written");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> SnapshotError {
        SnapshotError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
