use crate::backend::KvBackend;
use pocketlink_core::repository::Result;
use pocketlink_core::StorageError;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::trace;

/// File-system implementation of [`KvBackend`].
///
/// Each key is stored as `<dir>/<key>.json`. Writes go to a temporary file
/// in the same directory which is then renamed over the target, so a
/// crash never leaves a half-written document behind.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Opens a backend rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| map_io_error(&dir, e))?;
        Ok(Self { dir })
    }

    /// Returns the directory holding the stored files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file a key is stored in.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty()
            || key.starts_with('.')
            || key.contains(|c: char| c == '/' || c == '\\' || c.is_control())
        {
            return Err(StorageError::InvalidData(format!(
                "key cannot be used as a file name: '{}'",
                key
            )));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

fn map_io_error(path: &Path, err: io::Error) -> StorageError {
    let message = format!("{}: {err}", path.display());
    match err.kind() {
        io::ErrorKind::InvalidData => StorageError::InvalidData(message),
        io::ErrorKind::PermissionDenied | io::ErrorKind::NotFound => {
            StorageError::Unavailable(message)
        }
        _ => StorageError::Operation(message),
    }
}

impl KvBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;

        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(map_io_error(&path, err)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        trace!(path = %path.display(), bytes = value.len(), "writing document");

        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(|e| map_io_error(&self.dir, e))?;
        tmp.write_all(value.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| map_io_error(tmp.path(), e))?;
        tmp.persist(&path)
            .map_err(|e| map_io_error(&path, e.error))?;

        Ok(())
    }
}
