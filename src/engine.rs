//! Engine Module
//!
//! The key-value operations, composed from bootstrap, load and save.
//!
//! ## Responsibilities
//! - Run every operation as load → mutate in memory → (maybe) save
//! - Keep no dataset between operations; the file is the only state
//! - Optionally serialize writers inside this process

use parking_lot::{Mutex, MutexGuard};

use crate::codec::Dataset;
use crate::command::Command;
use crate::config::{Config, DeleteMode, WriteMode};
use crate::error::Result;
use crate::storage::{FileStore, STALE_TEMP_AGE};

/// The key-value store
///
/// ## Concurrency Model
///
/// - **Unguarded** (default): `set` loads, mutates and saves with nothing in
///   between holding other writers off. Two concurrent `set`s can both load
///   the same document, and the later save drops the earlier writer's key
///   (lost update). Saves themselves are atomic, so the file is never torn.
///
/// - **Serialized**: `write_lock` is held from load to save for every
///   write, which removes lost updates between writers in this process.
///   Other processes sharing the directory are still unguarded.
///
/// - **Reads** never take the lock; they see the last completed save.
pub struct KvStore {
    /// Store configuration
    config: Config,

    /// Gateway to the data file
    store: FileStore,

    /// Serializes load+save when `WriteMode::Serialized`
    write_lock: Mutex<()>,
}

impl KvStore {
    /// Open a store with the given config
    ///
    /// Creates the directory and an empty document right away so a bad
    /// storage path fails at startup rather than on the first request.
    /// Temp files older than [`STALE_TEMP_AGE`] are swept; a failed sweep is
    /// only logged.
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;

        let store = FileStore::new(&config);
        let bootstrap = store.bootstrap();
        bootstrap.run()?;

        match bootstrap.sweep_stale_temp_files(STALE_TEMP_AGE) {
            Ok(0) => {}
            Ok(n) => tracing::info!(
                "Swept {} stale temp file(s) from {}",
                n,
                bootstrap.storage_dir().display()
            ),
            Err(e) => tracing::warn!("Temp file sweep failed: {}", e),
        }

        tracing::debug!(
            "Opened store at {} (delete={:?}, writes={:?})",
            store.data_path().display(),
            config.delete_mode,
            config.write_mode
        );

        Ok(Self {
            config,
            store,
            write_lock: Mutex::new(()),
        })
    }

    /// Execute a command
    ///
    /// Returns the value for `Get`, `"PONG"` for `Ping`, nothing otherwise.
    pub fn execute(&self, command: Command) -> Result<Option<String>> {
        tracing::trace!("Executing {} (write={})", command.name(), command.is_write());
        match command {
            Command::Get { key } => self.get(&key).map(Some),
            Command::Set { key, value } => {
                self.set(&key, &value)?;
                Ok(None)
            }
            Command::Delete { key } => {
                self.delete(&key)?;
                Ok(None)
            }
            Command::Ping => Ok(Some("PONG".to_string())),
        }
    }

    /// Get a value by key
    ///
    /// A missing key yields an empty string, not an error, so a missing key
    /// and a key holding `""` look the same here.
    pub fn get(&self, key: &str) -> Result<String> {
        let dataset = self.store.load()?;
        Ok(dataset.get(key).cloned().unwrap_or_default())
    }

    /// Set a key-value pair
    ///
    /// Steps:
    /// 1. Load the document
    /// 2. Insert/overwrite the key
    /// 3. Save the whole document
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.write_guard();

        let mut dataset = self.store.load()?;
        dataset.insert(key.to_string(), value.to_string());
        self.store.save(&dataset)
    }

    /// Delete a key
    ///
    /// With `DeleteMode::InMemoryOnly` the key is removed from the loaded
    /// dataset and nothing is saved, so the key survives on disk. With
    /// `DeleteMode::Persist` the document is saved without the key.
    pub fn delete(&self, key: &str) -> Result<()> {
        let _guard = self.write_guard();

        let mut dataset = self.store.load()?;
        let existed = dataset.remove(key).is_some();

        match self.config.delete_mode {
            DeleteMode::InMemoryOnly => {
                tracing::debug!("Delete of {:?} not persisted (existed={})", key, existed);
                Ok(())
            }
            DeleteMode::Persist => self.store.save(&dataset),
        }
    }

    /// Load the whole dataset
    pub fn snapshot(&self) -> Result<Dataset> {
        self.store.load()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the persistence gateway
    pub fn file_store(&self) -> &FileStore {
        &self.store
    }

    fn write_guard(&self) -> Option<MutexGuard<'_, ()>> {
        match self.config.write_mode {
            WriteMode::Unguarded => None,
            WriteMode::Serialized => Some(self.write_lock.lock()),
        }
    }
}
