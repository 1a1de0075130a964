//! Persistence gateway
//!
//! Whole-document load and save of the data file.

use std::fs;
use std::path::{Path, PathBuf};

use crate::codec::{self, Dataset};
use crate::config::Config;
use crate::error::{IoOp, KvError, Result};

use super::{temp_path_for, write_synced, Bootstrap};

/// Reads and writes the whole document
///
/// Holds no dataset between calls: every `load` reads the file again.
#[derive(Debug, Clone)]
pub struct FileStore {
    bootstrap: Bootstrap,
    data_path: PathBuf,
}

impl FileStore {
    /// Create a gateway for the storage directory in `config`
    ///
    /// Nothing is touched on disk until the first `load` or `save`.
    pub fn new(config: &Config) -> Self {
        let data_path = config.data_path();
        Self {
            bootstrap: Bootstrap::new(config.storage_dir(), &data_path),
            data_path,
        }
    }

    /// Load the full dataset
    ///
    /// Bootstraps first, so a missing file loads as an empty dataset. A
    /// corrupt file is an error, never an empty dataset.
    pub fn load(&self) -> Result<Dataset> {
        self.bootstrap.run()?;

        let bytes = fs::read(&self.data_path)
            .map_err(|e| KvError::io(IoOp::Read, &self.data_path, e))?;
        let dataset = codec::decode(&bytes)?;

        tracing::debug!(
            "Loaded {} entries ({} bytes) from {}",
            dataset.len(),
            bytes.len(),
            self.data_path.display()
        );
        Ok(dataset)
    }

    /// Replace the document with the encoding of `dataset`
    pub fn save(&self, dataset: &Dataset) -> Result<()> {
        self.bootstrap.ensure_dir()?;

        let bytes = codec::encode(dataset)?;
        let temp_path = temp_path_for(&self.data_path);

        if let Err(e) = write_synced(&temp_path, &bytes) {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }

        if let Err(e) = fs::rename(&temp_path, &self.data_path) {
            let _ = fs::remove_file(&temp_path);
            return Err(KvError::io(IoOp::Rename, &self.data_path, e));
        }

        tracing::debug!(
            "Saved {} entries ({} bytes) to {}",
            dataset.len(),
            bytes.len(),
            self.data_path.display()
        );
        Ok(())
    }

    /// Get the data file path
    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    pub fn bootstrap(&self) -> &Bootstrap {
        &self.bootstrap
    }
}
