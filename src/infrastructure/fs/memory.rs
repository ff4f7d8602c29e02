//! In-memory File System
//!
//! Implements the FileSystem port without touching the disk. Modification
//! times come from a logical clock that advances one second per write, and
//! can be set explicitly, which makes staleness checks deterministic.
//!
//! Uses `Arc<Mutex<>>` internally so it can be cloned and shared.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, SystemTime};

use crate::domain::ports::file_system::{FileSystem, FsError, FsResult};

#[derive(Debug, Clone)]
struct MemoryFile {
    content: String,
    modified: SystemTime,
}

#[derive(Debug)]
struct MemoryFsState {
    files: HashMap<PathBuf, MemoryFile>,
    read_only: HashSet<PathBuf>,
    clock: SystemTime,
    writes: usize,
}

/// In-memory file system for tests and dry runs
#[derive(Debug, Clone)]
pub struct MemoryFs {
    state: Arc<Mutex<MemoryFsState>>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryFsState {
                files: HashMap::new(),
                read_only: HashSet::new(),
                clock: SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000),
                writes: 0,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MemoryFsState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Place a file with an explicit modification time (not counted as a write)
    pub fn insert(&self, path: impl Into<PathBuf>, content: &str, modified: SystemTime) {
        self.lock().files.insert(
            path.into(),
            MemoryFile {
                content: content.to_string(),
                modified,
            },
        );
    }

    /// Override the modification time of an existing file
    pub fn set_modified(&self, path: &Path, modified: SystemTime) {
        if let Some(file) = self.lock().files.get_mut(path) {
            file.modified = modified;
        }
    }

    /// Current logical time; the next write is stamped one second later
    pub fn now(&self) -> SystemTime {
        self.lock().clock
    }

    /// Refuse writes below `dir`
    pub fn mark_read_only(&self, dir: impl Into<PathBuf>) {
        self.lock().read_only.insert(dir.into());
    }

    /// Number of `write_atomic` calls so far
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    pub fn content(&self, path: &Path) -> Option<String> {
        self.lock().files.get(path).map(|file| file.content.clone())
    }
}

impl Default for MemoryFs {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MemoryFs {
    /// Files, plus directories implied by a file below them or marked read-only
    fn exists(&self, path: &Path) -> bool {
        let state = self.lock();
        state.files.contains_key(path)
            || state.read_only.contains(path)
            || state.files.keys().any(|file| file != path && file.starts_with(path))
    }

    fn modified(&self, path: &Path) -> FsResult<SystemTime> {
        self.lock()
            .files
            .get(path)
            .map(|file| file.modified)
            .ok_or_else(|| FsError::NotFound(path.to_path_buf()))
    }

    fn read(&self, path: &Path) -> FsResult<String> {
        self.content(path)
            .ok_or_else(|| FsError::NotFound(path.to_path_buf()))
    }

    fn is_writable_dir(&self, path: &Path) -> bool {
        let state = self.lock();
        !state.read_only.iter().any(|dir| path.starts_with(dir))
    }

    fn ensure_writable_dir(&self, path: &Path) -> FsResult<()> {
        if self.is_writable_dir(path) {
            Ok(())
        } else {
            Err(FsError::NotWritable(path.to_path_buf()))
        }
    }

    fn write_atomic(&self, path: &Path, content: &str) -> FsResult<()> {
        let mut state = self.lock();
        if state.read_only.iter().any(|dir| path.starts_with(dir)) {
            return Err(FsError::NotWritable(path.to_path_buf()));
        }
        state.clock += Duration::from_secs(1);
        let modified = state.clock;
        state.writes += 1;
        state.files.insert(
            path.to_path_buf(),
            MemoryFile {
                content: content.to_string(),
                modified,
            },
        );
        Ok(())
    }
}
