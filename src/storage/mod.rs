//! Storage Module
//!
//! The only code that touches the data file.
//!
//! ## Responsibilities
//! - Make sure the storage directory and data file exist before any access
//! - Whole-document load (read + decode)
//! - Whole-document save (encode + atomic replace)
//! - Sweep temp files left behind by a crashed save
//!
//! ## Save Protocol
//! ```text
//! encode(dataset) ──► data.json.tmp.<pid>.<n> ──fsync──► rename ──► data.json
//! ```
//! Readers see either the previous document or the new one, never a mix.
//! There is no append or patch path.
//!
//! The empty document written by bootstrap goes through the same temp file
//! and is published with a hard link, which fails instead of replacing a
//! document that appeared in the meantime.

mod bootstrap;
mod file_store;

pub use bootstrap::{Bootstrap, STALE_TEMP_AGE};
pub use file_store::FileStore;

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{IoOp, KvError, Result};

/// Infix between the data file name and the temp suffix
const TEMP_INFIX: &str = ".tmp.";

/// Counter for temp file names, so concurrent writers never share a temp file
static NEXT_TEMP_ID: AtomicU64 = AtomicU64::new(0);

/// "data.json" → "data.json.tmp.<pid>.<n>"
fn temp_path_for(data_path: &Path) -> PathBuf {
    let id = NEXT_TEMP_ID.fetch_add(1, Ordering::Relaxed);
    let mut name = temp_prefix(data_path);
    name.push_str(&format!("{}.{}", std::process::id(), id));
    data_path.with_file_name(name)
}

/// "data.json" → "data.json.tmp."
fn temp_prefix(data_path: &Path) -> String {
    let mut name = data_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    name.push_str(TEMP_INFIX);
    name
}

/// Write `bytes` to a fresh file and fsync it
fn write_synced(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }

    let mut file = options
        .open(path)
        .map_err(|e| KvError::io(IoOp::CreateFile, path, e))?;
    file.write_all(bytes)
        .and_then(|_| file.sync_all())
        .map_err(|e| KvError::io(IoOp::Write, path, e))
}
