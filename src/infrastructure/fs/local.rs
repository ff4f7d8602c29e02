//! Local File System Implementation
//!
//! Implements the FileSystem port for local disk operations.

use std::io::Write;
use std::path::Path;
use std::time::SystemTime;

use crate::domain::ports::file_system::{FileSystem, FsError, FsResult};

/// Permissions generated stand-ins are published with
#[cfg(unix)]
const STAND_IN_MODE: u32 = 0o664;

/// Local file system implementation
///
/// Writes go to a uniquely named temporary file next to the target, which is
/// then renamed over it. Concurrent generators never observe a partial file;
/// the last rename wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    /// Create a new LocalFs instance
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn modified(&self, path: &Path) -> FsResult<SystemTime> {
        std::fs::metadata(path)
            .and_then(|meta| meta.modified())
            .map_err(|e| FsError::io(path, e))
    }

    fn read(&self, path: &Path) -> FsResult<String> {
        std::fs::read_to_string(path).map_err(|e| FsError::io(path, e))
    }

    /// Whether this process can create files in `path`, checked by creating
    /// an anonymous temporary file there
    fn is_writable_dir(&self, path: &Path) -> bool {
        path.is_dir() && tempfile::tempfile_in(path).is_ok()
    }

    fn ensure_writable_dir(&self, path: &Path) -> FsResult<()> {
        if !path.is_dir() {
            std::fs::create_dir_all(path).map_err(|e| FsError::io(path, e))?;
        }
        if !self.is_writable_dir(path) {
            return Err(FsError::NotWritable(path.to_path_buf()));
        }
        Ok(())
    }

    fn write_atomic(&self, path: &Path, content: &str) -> FsResult<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let prefix = format!(
            "{}.",
            path.file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default()
        );

        let mut tmp = tempfile::Builder::new()
            .prefix(&prefix)
            .tempfile_in(dir)
            .map_err(|e| FsError::io(dir, e))?;

        tmp.write_all(content.as_bytes())
            .map_err(|e| FsError::io(tmp.path(), e))?;

        // Permission errors are ignored
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = std::fs::set_permissions(
                tmp.path(),
                std::fs::Permissions::from_mode(STAND_IN_MODE),
            );
        }

        tmp.persist(path)
            .map_err(|e| FsError::io(path, e.error))?;
        Ok(())
    }
}
