use cartkit_lib::{CartridgeError, SessionError, SettingsError};
use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Cartridge(#[from] CartridgeError),

    #[error(transparent)]
    Session(#[from] SessionError),

    /// Settings file could not be read or written
    #[error("Config error: {0}")]
    Settings(#[from] SettingsError),

    /// Invalid configuration value from the command line
    #[error("Config error: {0}")]
    Config(String),

    /// Logger setup failed
    #[error("Logging error: {0}")]
    Logging(String),

    /// Catch-all for other errors
    #[error("{0}")]
    Other(String),
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn logging(msg: impl Into<String>) -> Self {
        Self::Logging(msg.into())
    }

    pub(crate) fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
