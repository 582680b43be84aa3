//! Global checksum verification.
//!
//! The stored checksum (0x014E-0x014F) is the 16-bit sum of every ROM byte
//! except the two checksum bytes themselves. Real hardware never checks it,
//! so a mismatch is only ever reported, never enforced.

use std::fmt;

use serde::Serialize;

use crate::DecodeError;
use crate::header::{HeaderField, RawHeader, decode_global_checksum};

/// Sum every byte of `data` except the checksum bytes, masked to 16 bits.
pub fn compute_global_checksum(data: &[u8]) -> u16 {
    let skip = HeaderField::GlobalChecksum.range();
    data.iter()
        .enumerate()
        .filter(|(i, _)| !skip.contains(i))
        .fold(0u16, |sum, (_, &b)| sum.wrapping_add(u16::from(b)))
}

/// Outcome of comparing a computed checksum against the stored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChecksumReport {
    /// Checksum reported by the cartridge header
    pub expected: u16,
    /// Checksum computed over the ROM data
    pub computed: u16,
}

impl ChecksumReport {
    /// Verify `data` against an expected checksum.
    pub fn verify(data: &[u8], expected: u16) -> Self {
        Self {
            expected,
            computed: compute_global_checksum(data),
        }
    }

    pub fn is_match(&self) -> bool {
        self.expected == self.computed
    }

    /// Returns the expected value as a hex string.
    pub fn expected_hex(&self) -> String {
        format!("{:04x}", self.expected)
    }

    /// Returns the computed value as a hex string.
    pub fn computed_hex(&self) -> String {
        format!("{:04x}", self.computed)
    }
}

impl fmt::Display for ChecksumReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_match() {
            write!(f, "checksum OK ({})", self.expected_hex())
        } else {
            write!(
                f,
                "checksum mismatch: expected {}, computed {}",
                self.expected_hex(),
                self.computed_hex()
            )
        }
    }
}

/// Verify a dumped ROM image against the checksum stored in its own header.
pub fn verify_rom_image(image: &[u8]) -> Result<ChecksumReport, DecodeError> {
    let header = RawHeader::from_rom_image(image)?;
    let expected = decode_global_checksum(&header.global_checksum)?;
    Ok(ChecksumReport::verify(image, expected))
}
