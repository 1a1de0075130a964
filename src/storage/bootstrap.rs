//! Store bootstrap
//!
//! Ensures the storage directory and data file exist.

use std::fs::{self, DirBuilder};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::codec::{self, Dataset};
use crate::error::{IoOp, KvError, Result};

use super::{temp_path_for, temp_prefix, write_synced};

/// Age after which an orphaned temp file is swept at open
pub const STALE_TEMP_AGE: Duration = Duration::from_secs(10 * 60);

/// Creates the storage directory and an empty document on first use
///
/// Idempotent: when both already exist nothing is touched, so an existing
/// document is never truncated.
#[derive(Debug, Clone)]
pub struct Bootstrap {
    storage_dir: PathBuf,
    data_path: PathBuf,
}

impl Bootstrap {
    pub fn new(storage_dir: impl Into<PathBuf>, data_path: impl Into<PathBuf>) -> Self {
        Self {
            storage_dir: storage_dir.into(),
            data_path: data_path.into(),
        }
    }

    /// Run both steps: directory, then file
    pub fn run(&self) -> Result<()> {
        self.ensure_dir()?;
        self.ensure_file()
    }

    /// Create the storage directory (and parents) if it is missing
    pub fn ensure_dir(&self) -> Result<()> {
        if self.storage_dir.is_dir() {
            return Ok(());
        }

        let mut builder = DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(0o755);
        }

        builder
            .create(&self.storage_dir)
            .map_err(|e| KvError::io(IoOp::CreateDir, &self.storage_dir, e))?;

        tracing::info!("Created storage directory {}", self.storage_dir.display());
        Ok(())
    }

    /// Write the encoded empty dataset if the data file is missing
    ///
    /// The document is written to a temp file first and published with a
    /// hard link, so `data.json` never exists half-written. If another
    /// writer published a document first, the link fails and theirs wins.
    pub fn ensure_file(&self) -> Result<()> {
        if self.data_path.exists() {
            return Ok(());
        }

        let empty = codec::encode(&Dataset::new())?;
        let temp_path = temp_path_for(&self.data_path);

        let published = write_synced(&temp_path, &empty).and_then(|_| {
            match fs::hard_link(&temp_path, &self.data_path) {
                Ok(()) => Ok(true),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
                Err(e) => Err(KvError::io(IoOp::CreateFile, &self.data_path, e)),
            }
        });
        // Only the temp name is ever removed, never the data file
        let _ = fs::remove_file(&temp_path);

        if published? {
            tracing::info!("Created empty data file {}", self.data_path.display());
        }
        Ok(())
    }

    /// Remove temp files left behind by saves that never reached the rename
    ///
    /// Only files older than `max_age` go, so a save in flight in another
    /// process keeps its temp file. Returns how many files were removed.
    pub fn sweep_stale_temp_files(&self, max_age: Duration) -> Result<usize> {
        if !self.storage_dir.is_dir() {
            return Ok(0);
        }

        let prefix = temp_prefix(&self.data_path);
        let entries = fs::read_dir(&self.storage_dir)
            .map_err(|e| KvError::io(IoOp::Read, &self.storage_dir, e))?;
        let now = SystemTime::now();
        let mut removed = 0;

        for entry in entries {
            let entry = entry.map_err(|e| KvError::io(IoOp::Read, &self.storage_dir, e))?;
            if !entry.file_name().to_string_lossy().starts_with(&prefix) {
                continue;
            }

            let path = entry.path();
            let modified = match entry.metadata().and_then(|m| m.modified()) {
                Ok(modified) => modified,
                // Gone already, or unreadable: not ours to judge
                Err(_) => continue,
            };
            let age = now.duration_since(modified).unwrap_or_default();
            if age < max_age {
                continue;
            }

            match fs::remove_file(&path) {
                Ok(()) => {
                    tracing::info!("Removed stale temp file {}", path.display());
                    removed += 1;
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(KvError::io(IoOp::Remove, &path, e)),
            }
        }

        Ok(removed)
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }
}
