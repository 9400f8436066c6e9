//! File-backed storage: one JSON file per key under a directory.
//!
//! Writes go to a temp file and are renamed into place while holding an
//! exclusive lock on `<dir>/.lock`, so concurrent `cbt` processes never
//! observe a half-written draft.

use super::DraftStorage;
use anyhow::{bail, Context, Result};
use fs2::FileExt;
use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const LOCK_FILE: &str = ".lock";

#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    ///
    /// # Errors
    /// Keys are limited to ASCII alphanumerics, `-` and `_` so they can never
    /// escape the storage directory.
    pub fn key_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            bail!("Invalid storage key: '{}'", key);
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }

    fn with_lock<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        fs::create_dir_all(&self.dir).with_context(|| {
            format!("Failed to create storage directory: {}", self.dir.display())
        })?;
        let lock_path = self.dir.join(LOCK_FILE);
        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .with_context(|| format!("Failed to open lock file: {}", lock_path.display()))?;
        lock_file
            .lock_exclusive()
            .with_context(|| format!("Failed to lock storage: {}", lock_path.display()))?;

        let result = f();

        FileExt::unlock(&lock_file)?;
        result
    }
}

impl DraftStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to read storage file: {}", path.display()))
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key)?;
        self.with_lock(|| {
            let temp_path = path.with_extension("json.tmp");
            fs::write(&temp_path, value).with_context(|| {
                format!("Failed to write temp storage file: {}", temp_path.display())
            })?;
            fs::rename(&temp_path, &path)
                .with_context(|| format!("Failed to rename temp file to: {}", path.display()))?;
            Ok(())
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_path(key)?;
        self.with_lock(|| match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to delete storage file: {}", path.display()))
            }
        })
    }
}
