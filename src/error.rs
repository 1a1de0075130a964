//! Error types for DocuKV
//!
//! Provides a unified error type for all operations.
//!
//! Every failure keeps its kind ([`ErrorKind`]) even though the HTTP layer
//! flattens them all to a single status code.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using KvError
pub type Result<T> = std::result::Result<T, KvError>;

/// Unified error type for DocuKV operations
#[derive(Debug, Error)]
pub enum KvError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error ({op} {}): {source}", .path.display())]
    Io {
        op: IoOp,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Document Errors
    // -------------------------------------------------------------------------
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Failures while turning the persisted document back into a dataset
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Not JSON, not an object, or a field that is not a string
    #[error("invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid base64 in {field}: {source}")]
    Base64 {
        field: String,
        #[source]
        source: base64::DecodeError,
    },

    #[error("base64 payload of {field} is not UTF-8: {source}")]
    Utf8 {
        field: String,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

/// The file system step that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOp {
    CreateDir,
    CreateFile,
    Read,
    Write,
    Rename,
    Remove,
}

impl fmt::Display for IoOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IoOp::CreateDir => "create dir",
            IoOp::CreateFile => "create file",
            IoOp::Read => "read",
            IoOp::Write => "write",
            IoOp::Rename => "rename",
            IoOp::Remove => "remove",
        };
        f.write_str(s)
    }
}

/// Coarse error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Decode,
    Serialization,
    Config,
}

impl KvError {
    /// Build an I/O error tagged with the step and path that failed
    pub fn io(op: IoOp, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        KvError::Io {
            op,
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            KvError::Io { .. } => ErrorKind::Io,
            KvError::Decode(_) => ErrorKind::Decode,
            KvError::Serialization(_) => ErrorKind::Serialization,
            KvError::Config(_) => ErrorKind::Config,
        }
    }
}
