//! Configuration for DocuKV
//!
//! Centralized configuration with sensible defaults. A `Config` is built once
//! and threaded into the store; nothing reads the storage location from a
//! global.

use std::path::{Path, PathBuf};

use crate::error::{KvError, Result};

/// File name of the document inside the storage directory
pub const DATA_FILENAME: &str = "data.json";

/// Main configuration for a DocuKV instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Directory holding the data file
    /// Internal structure:
    ///   {storage_dir}/
    ///     └── data.json        (the encoded document)
    pub storage_dir: PathBuf,

    /// What `delete` does with its mutation
    pub delete_mode: DeleteMode,

    /// Whether writers are serialized inside this process
    pub write_mode: WriteMode,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// HTTP listen address
    pub listen_addr: String,
}

/// Delete behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteMode {
    /// Remove the key from the loaded dataset only; nothing is saved.
    /// Matches the historical behaviour of the service.
    #[default]
    InMemoryOnly,

    /// Remove the key and save the document
    Persist,
}

/// Write coordination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Load and save are independent file operations (lost updates possible)
    #[default]
    Unguarded,

    /// Load + mutate + save runs under one in-process mutex
    Serialized,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from("/tmp"),
            delete_mode: DeleteMode::default(),
            write_mode: WriteMode::default(),
            listen_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Path of the data file
    pub fn data_path(&self) -> PathBuf {
        self.storage_dir.join(DATA_FILENAME)
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    /// Reject configurations the store cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.storage_dir.as_os_str().is_empty() {
            return Err(KvError::Config("storage directory must not be empty".into()));
        }
        if self.listen_addr.is_empty() {
            return Err(KvError::Config("listen address must not be empty".into()));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the storage directory
    pub fn storage_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.storage_dir = path.into();
        self
    }

    pub fn delete_mode(mut self, mode: DeleteMode) -> Self {
        self.config.delete_mode = mode;
        self
    }

    pub fn write_mode(mut self, mode: WriteMode) -> Self {
        self.config.write_mode = mode;
        self
    }

    /// Set the HTTP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
