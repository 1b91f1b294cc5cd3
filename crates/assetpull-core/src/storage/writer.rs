//! Sequential writer for temp download files.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writer for a temp download file. Bytes are appended in arrival order;
/// the file only appears under its final name after `finalize`.
pub struct StorageWriter {
    file: File,
    temp_path: PathBuf,
    written: u64,
}

impl StorageWriter {
    /// Create (or truncate) the temp file at `temp_path`, creating parent directories.
    pub fn create(temp_path: &Path) -> Result<Self> {
        if let Some(parent) = temp_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory: {}", parent.display()))?;
        }
        let file = File::create(temp_path)
            .with_context(|| format!("failed to create temp file: {}", temp_path.display()))?;
        Ok(StorageWriter {
            file,
            temp_path: temp_path.to_path_buf(),
            written: 0,
        })
    }

    /// Append `data` to the temp file.
    pub fn append(&mut self, data: &[u8]) -> std::io::Result<()> {
        self.file.write_all(data)?;
        self.written += data.len() as u64;
        Ok(())
    }

    /// Bytes appended so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Path to the current temp file.
    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Flush, sync and atomically rename the temp file to the final path.
    /// Fails if `final_path` is on a different filesystem.
    pub fn finalize(mut self, final_path: &Path) -> Result<()> {
        self.file.flush().context("storage flush failed")?;
        self.file.sync_all().context("storage sync failed")?;
        let temp_path = self.temp_path.clone();
        drop(self.file);

        std::fs::rename(&temp_path, final_path).with_context(|| {
            format!(
                "failed to rename {} to {}",
                temp_path.display(),
                final_path.display()
            )
        })?;
        Ok(())
    }

    /// Close and remove the temp file. Missing files are not an error.
    pub fn discard(self) {
        let temp_path = self.temp_path.clone();
        drop(self.file);
        remove_if_exists(&temp_path);
    }
}

/// Best-effort removal of a leftover file.
pub(crate) fn remove_if_exists(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => tracing::debug!(path = %path.display(), "removed partial file"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %path.display(), "could not remove partial file: {}", e),
    }
}
