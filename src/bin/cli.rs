//! DocuKV CLI
//!
//! Runs store operations directly against a storage directory, without a
//! server.

use clap::{Parser, Subcommand};
use docukv::{Command, Config, DeleteMode, KvStore};
use tracing_subscriber::{fmt, EnvFilter};

/// DocuKV CLI
#[derive(Parser, Debug)]
#[command(name = "docukv-cli")]
#[command(about = "CLI for the DocuKV data file")]
#[command(version)]
struct Args {
    /// Directory holding data.json
    #[arg(short, long, env = "STORAGE_PATH", default_value = "/tmp")]
    storage_path: String,

    /// Save the document after `del`
    #[arg(long)]
    persist_deletes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },

    /// Print every entry as a JSON object
    Dump,

    /// Check that the data file can be opened
    Ping,
}

fn main() {
    // Logs go to stderr so stdout stays clean for values
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::builder()
        .storage_dir(&args.storage_path)
        .delete_mode(if args.persist_deletes {
            DeleteMode::Persist
        } else {
            DeleteMode::InMemoryOnly
        })
        .build();

    if let Err(e) = run(config, args.command) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(config: Config, command: Commands) -> docukv::Result<()> {
    let store = KvStore::open(config)?;

    let command = match command {
        Commands::Dump => {
            let dataset = store.snapshot()?;
            let sorted: std::collections::BTreeMap<_, _> = dataset.into_iter().collect();
            let json = serde_json::to_string_pretty(&sorted).map_err(docukv::KvError::Serialization)?;
            println!("{}", json);
            return Ok(());
        }
        Commands::Get { key } => Command::Get { key },
        Commands::Set { key, value } => Command::Set { key, value },
        Commands::Del { key } => Command::Delete { key },
        Commands::Ping => Command::Ping,
    };

    if let Some(output) = store.execute(command)? {
        println!("{}", output);
    }
    Ok(())
}
