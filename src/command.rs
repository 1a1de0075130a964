//! Command definitions
//!
//! The operations a client can ask the store to run.

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Get a value by key
    Get { key: String },

    /// Set a key-value pair
    Set { key: String, value: String },

    /// Delete a key
    Delete { key: String },

    /// Ping (health check)
    Ping,
}

impl Command {
    /// Short upper-case name, used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::Get { .. } => "GET",
            Command::Set { .. } => "SET",
            Command::Delete { .. } => "DELETE",
            Command::Ping => "PING",
        }
    }

    /// Whether running this command may rewrite the document
    pub fn is_write(&self) -> bool {
        matches!(self, Command::Set { .. } | Command::Delete { .. })
    }
}
