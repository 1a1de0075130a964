//! DocuKV Server Binary
//!
//! Starts the HTTP server for DocuKV.

use std::sync::Arc;

use clap::Parser;
use docukv::network::Server;
use docukv::{Config, DeleteMode, KvStore, WriteMode};
use tracing_subscriber::{fmt, EnvFilter};

/// DocuKV Server
#[derive(Parser, Debug)]
#[command(name = "docukv-server")]
#[command(about = "HTTP key-value store backed by a single JSON document")]
#[command(version)]
struct Args {
    /// Directory holding data.json
    #[arg(short, long, env = "STORAGE_PATH", default_value = "/tmp")]
    storage_path: String,

    /// Interface to listen on
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "8080")]
    port: u16,

    /// Save the document after DELETE (by default deletes are not persisted)
    #[arg(long)]
    persist_deletes: bool,

    /// Serialize writers with an in-process lock
    #[arg(long)]
    serialize_writes: bool,
}

#[tokio::main]
async fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,docukv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    let listen_addr = format!("{}:{}", args.host, args.port);
    tracing::info!("DocuKV Server v{}", docukv::VERSION);
    tracing::info!("Storage path: {}", args.storage_path);
    tracing::info!("Listen address: {}", listen_addr);

    // Build config from args
    let config = Config::builder()
        .storage_dir(&args.storage_path)
        .listen_addr(&listen_addr)
        .delete_mode(if args.persist_deletes {
            DeleteMode::Persist
        } else {
            DeleteMode::InMemoryOnly
        })
        .write_mode(if args.serialize_writes {
            WriteMode::Serialized
        } else {
            WriteMode::Unguarded
        })
        .build();

    // Open store
    let store = match KvStore::open(config.clone()) {
        Ok(s) => Arc::new(s),
        Err(e) => {
            tracing::error!("Failed to open store: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Store initialized at {}", config.data_path().display());

    let server = match Server::bind(&config.listen_addr, store).await {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", config.listen_addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
