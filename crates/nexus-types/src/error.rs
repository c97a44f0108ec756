//! Error types for the NexusAI terminal.

use std::io;

/// Errors produced by the terminal crates.
#[derive(Debug, thiserror::Error)]
pub enum NexusError {
    /// A command rejected its arguments. The message is shown to the user.
    #[error("command error: {0}")]
    Command(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, NexusError>;
