use std::io;

use gbc_reader_core::DecodeError;
use thiserror::Error;

use crate::protocol::Opcode;
use crate::session::SessionState;

/// Errors that can occur while talking to the cartridge reader.
#[derive(Debug, Error)]
pub enum ReaderError {
    /// The port could not be opened or the device did not answer the handshake
    #[error("No GBC reader connected at {port}: {reason}")]
    NoDevice { port: String, reason: String },

    /// A response byte did not arrive within the read timeout
    #[error("Timed out waiting for {opcode}: received {received} of {expected} bytes")]
    Timeout {
        opcode: Opcode,
        expected: usize,
        received: usize,
    },

    /// The link failed mid-exchange
    #[error("Link error during {opcode} after {received} of {expected} bytes: {source}")]
    Link {
        opcode: Opcode,
        expected: usize,
        received: usize,
        #[source]
        source: io::Error,
    },

    /// The reader returned a code with no known meaning
    #[error("Undefined data read for {opcode}: {source}")]
    UnknownData {
        opcode: Opcode,
        #[source]
        source: DecodeError,
    },

    /// The cartridge in the slot is not the one whose header was read
    #[error(
        "Cartridge has changed since reading header information (checksum {expected:04x}, now {actual:04x})"
    )]
    CartridgeChanged { expected: u16, actual: u16 },

    /// The operation is not valid in the session's current state
    #[error("Cannot {operation} while {state}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },

    /// No connection is open
    #[error("Not connected to a GBC reader")]
    NotConnected,

    /// The transfer was abandoned by the caller
    #[error("Transfer cancelled after {bytes_read} of {total} bytes")]
    Cancelled { bytes_read: u64, total: u64 },

    /// The background transfer thread panicked
    #[error("Transfer worker panicked")]
    WorkerPanicked,

    /// I/O error while writing an export
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ReaderError {
    pub fn no_device(port: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::NoDevice {
            port: port.into(),
            reason: reason.into(),
        }
    }

    /// Wrap a decode failure with the opcode whose response produced it.
    pub fn unknown_data(source: DecodeError) -> Self {
        Self::UnknownData {
            opcode: Opcode::for_decode_error(&source),
            source,
        }
    }

    /// Classify a transport failure during an opcode exchange.
    pub(crate) fn link(opcode: Opcode, expected: usize, received: usize, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::TimedOut => Self::Timeout {
                opcode,
                expected,
                received,
            },
            io::ErrorKind::NotConnected => Self::NotConnected,
            _ => Self::Link {
                opcode,
                expected,
                received,
                source: err,
            },
        }
    }

    /// Whether the link can no longer be trusted to be in step with the device.
    pub fn is_transport_fault(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::Link { .. } | Self::NotConnected
        )
    }
}
