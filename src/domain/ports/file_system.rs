//! FileSystem port - abstraction over the file I/O stand-in generation needs
//!
//! The factory only ever checks existence and modification times, reads a
//! generated file back, prepares the target directory and publishes content
//! atomically. Keeping that behind a trait lets staleness decisions be tested
//! without touching the disk.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Result type for file system operations
pub type FsResult<T> = Result<T, FsError>;

/// File system operation errors
#[derive(Debug)]
pub enum FsError {
    /// File not found
    NotFound(PathBuf),
    /// Directory exists (or was created) but cannot be written to
    NotWritable(PathBuf),
    /// I/O error on a path
    Io(PathBuf, std::io::Error),
}

impl FsError {
    /// Wrap an I/O error, keeping the path it happened on
    pub fn io(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => FsError::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => FsError::NotWritable(path.to_path_buf()),
            _ => FsError::Io(path.to_path_buf(), err),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            FsError::NotFound(path) | FsError::NotWritable(path) | FsError::Io(path, _) => path,
        }
    }
}

impl std::fmt::Display for FsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FsError::NotFound(path) => write!(f, "File not found: {}", path.display()),
            FsError::NotWritable(path) => write!(f, "Not writable: {}", path.display()),
            FsError::Io(path, err) => write!(f, "I/O error on {}: {}", path.display(), err),
        }
    }
}

impl std::error::Error for FsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FsError::Io(_, err) => Some(err),
            _ => None,
        }
    }
}

/// Abstract file system interface
///
/// Implementations:
/// - `LocalFs` - standard file I/O, tempfile + rename publishing
/// - `MemoryFs` - in-memory with settable modification times, for tests
pub trait FileSystem: Send + Sync {
    /// Check if a file exists
    fn exists(&self, path: &Path) -> bool;

    /// Last modification time
    fn modified(&self, path: &Path) -> FsResult<SystemTime>;

    /// Read file content as string
    fn read(&self, path: &Path) -> FsResult<String>;

    /// Whether `path` is an existing directory that can be written to
    fn is_writable_dir(&self, path: &Path) -> bool;

    /// Create the directory (and parents) if absent, then require it writable
    fn ensure_writable_dir(&self, path: &Path) -> FsResult<()>;

    /// Publish content at `path` so readers never see a partial file
    fn write_atomic(&self, path: &Path, content: &str) -> FsResult<()>;
}
