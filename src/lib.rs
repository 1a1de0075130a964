//! # DocuKV
//!
//! A small key-value store served over HTTP that keeps its entire dataset
//! in one JSON document on local disk:
//! - Keys and values are UTF-8 strings
//! - Every key and value is stored url-safe base64 encoded
//! - Every operation re-reads the file; nothing is cached between requests
//! - Saves replace the whole document atomically
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      HTTP Adapter                            │
//! │               (axum router, /key/{key})                      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ Command
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                    KvStore                                   │
//! │            get / set / delete (load → mutate → save)         │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  Bootstrap  │          │  FileStore  │
//!   │ (dir, file) │          │ (load/save) │
//!   └─────────────┘          └──────┬──────┘
//!                                   │
//!                                   ▼
//!                           ┌─────────────┐
//!                           │    Codec    │
//!                           │(JSON+base64)│
//!                           └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;

pub mod codec;
pub mod command;
pub mod engine;
pub mod network;
pub mod storage;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use codec::Dataset;
pub use command::Command;
pub use config::{Config, DeleteMode, WriteMode};
pub use engine::KvStore;
pub use error::{DecodeError, ErrorKind, KvError, Result};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of DocuKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
