use gbc_reader_lib::{DecodeError, ReaderError};
use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Talking to the reader failed
    #[error("{0}")]
    Reader(#[from] ReaderError),

    /// A ROM image could not be decoded
    #[error("Invalid ROM image: {0}")]
    Decode(#[from] DecodeError),

    /// No port on the command line or in the settings file
    #[error("No serial port given. Pass --port, or run `gbc-reader ports` and save one with `gbc-reader config set-port`")]
    NoPort,

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// A dumped image failed verification
    #[error("Checksum mismatch in {0}")]
    ChecksumMismatch(String),

    /// Catch-all for other errors
    #[error("{0}")]
    Other(String),
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn checksum_mismatch(msg: impl Into<String>) -> Self {
        Self::ChecksumMismatch(msg.into())
    }

    pub(crate) fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
