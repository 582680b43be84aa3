use thiserror::Error;

use crate::header::HeaderField;

/// Errors that can occur while decoding cartridge header data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Cartridge type byte has no entry in the type table
    #[error("Unknown cartridge type: 0x{0:02X}")]
    UnknownCartridgeType(u8),

    /// ROM size byte is not one of the known size classes
    #[error("Unknown ROM size code: 0x{0:02X}")]
    UnknownRomSize(u8),

    /// A fixed-size header field was supplied with the wrong number of bytes
    #[error("Invalid {field} length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        field: HeaderField,
        expected: usize,
        actual: usize,
    },

    /// A ROM image ends before the given header field
    #[error("ROM image too small: {actual} bytes ends before the {field} field")]
    TruncatedImage { field: HeaderField, actual: usize },

    /// ROM data does not match the size class it was read for
    #[error("ROM data length mismatch: expected {expected} bytes, got {actual}")]
    DataLengthMismatch { expected: usize, actual: usize },
}

impl DecodeError {
    /// The header field this error was raised for, if any.
    pub fn field(&self) -> Option<HeaderField> {
        match self {
            Self::UnknownCartridgeType(_) => Some(HeaderField::CartridgeType),
            Self::UnknownRomSize(_) => Some(HeaderField::RomSize),
            Self::InvalidLength { field, .. } | Self::TruncatedImage { field, .. } => Some(*field),
            Self::DataLengthMismatch { .. } => None,
        }
    }
}
