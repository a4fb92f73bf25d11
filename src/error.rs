//! Crate error type
//!
//! Discovery and resolution degrade instead of failing (see `discovery` and
//! `resolver`); the variants here are the failures that cross a boundary.

/// Command runner errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Missing run method: {0}")]
    MissingRun(String),

    #[error("Cannot construct {type_ref}: {reason}")]
    Construction { type_ref: String, reason: String },

    #[error("Invalid definition for {type_ref}: {reason}")]
    InvalidDefinition { type_ref: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Command {alias} failed: {source}")]
    Command {
        alias: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}

/// Result type for runner operations
pub type Result<T> = std::result::Result<T, Error>;
