//! Locked, atomic persistence of the changelog document.
use fs2::FileExt;
use log::*;
use std::{
    collections::hash_map::DefaultHasher,
    env,
    fs::{self, File, OpenOptions},
    hash::{Hash, Hasher},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;

use crate::{Result, error::ScribeError};

/// Exclusive advisory lock held for the lifetime of the guard.
pub struct ChangelogLock {
    file: File,
    path: PathBuf,
}

impl Drop for ChangelogLock {
    fn drop(&mut self) {
        if let Err(err) = FileExt::unlock(&self.file) {
            warn!("failed to release lock {}: {err}", self.path.display());
        }
    }
}

/// The changelog file on disk.
pub struct ChangelogStore {
    path: PathBuf,
}

impl ChangelogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lock file shared by every invocation targeting the same changelog.
    ///
    /// Lives in the system temp directory so nothing is left behind in the
    /// repository.
    fn lock_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "changelog".to_string());

        // the file may not exist yet, so resolve through its directory
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let target = dir
            .canonicalize()
            .unwrap_or_else(|_| dir.to_path_buf())
            .join(&name);

        let mut hasher = DefaultHasher::new();
        target.hash(&mut hasher);

        env::temp_dir().join(format!(
            "release-scribe-{name}-{:016x}.lock",
            hasher.finish()
        ))
    }

    /// Block until the exclusive lock for this changelog is held.
    pub fn lock(&self) -> Result<ChangelogLock> {
        let path = self.lock_path();

        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(|err| ScribeError::changelog(&path, err))?;

        debug!("waiting for lock {}", path.display());

        file.lock_exclusive()
            .map_err(|err| ScribeError::changelog(&path, err))?;

        Ok(ChangelogLock { file, path })
    }

    /// Current document; a missing file reads as empty.
    pub fn read(&self) -> Result<String> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(content),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    "{} does not exist yet, starting a new changelog",
                    self.path.display()
                );
                Ok(String::new())
            }
            Err(err) => Err(ScribeError::changelog(&self.path, err)),
        }
    }

    /// Replace the document atomically via a temp file in the same directory.
    pub fn write(&self, content: &str) -> Result<()> {
        let parent = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };

        let mut temp_file = NamedTempFile::new_in(parent)
            .map_err(|err| ScribeError::changelog(&self.path, err))?;

        temp_file
            .write_all(content.as_bytes())
            .and_then(|_| temp_file.as_file().sync_all())
            .map_err(|err| ScribeError::changelog(&self.path, err))?;

        temp_file
            .persist(&self.path)
            .map_err(|err| ScribeError::changelog(&self.path, err.error))?;

        info!("wrote {}", self.path.display());

        Ok(())
    }
}
