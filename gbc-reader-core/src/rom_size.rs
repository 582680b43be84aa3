//! ROM size byte (header offset 0x0148).
//!
//! Codes 0-7 are power-of-two size classes (`32 KB << code`). Codes
//! 0x52-0x54 are the irregular 72/80/96 bank cartridges, whose sizes are
//! catalogued as 1.1 / 1.2 / 1.5 MB. Sizes are kept in tenths of a
//! kilobyte so the fractional classes stay exact.

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::DecodeError;

/// A decoded ROM size class: size and bank count always come from the same code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RomSize {
    code: u8,
    tenths_kb: u32,
    bank_count: u16,
}

impl RomSize {
    /// Decode a ROM size code.
    pub fn from_code(code: u8) -> Result<Self, DecodeError> {
        let (tenths_kb, bank_count) = match code {
            0..=7 => (320u32 << code, 2u16 << code),
            0x52 => (11_264, 72),
            0x53 => (12_288, 80),
            0x54 => (15_360, 96),
            _ => return Err(DecodeError::UnknownRomSize(code)),
        };
        Ok(Self {
            code,
            tenths_kb,
            bank_count,
        })
    }

    /// The raw size code this class was decoded from.
    pub fn code(&self) -> u8 {
        self.code
    }

    /// Size in kilobytes (fractional for the irregular classes).
    pub fn size_kb(&self) -> f64 {
        f64::from(self.tenths_kb) / 10.0
    }

    /// Number of 16 KB ROM banks.
    pub fn bank_count(&self) -> u16 {
        self.bank_count
    }

    /// Number of bytes the reader streams for this size class.
    ///
    /// `floor(size_kb * 1024)`; exact for codes 0-7.
    pub fn byte_len(&self) -> usize {
        (u64::from(self.tenths_kb) * 1024 / 10) as usize
    }
}

impl Serialize for RomSize {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("RomSize", 4)?;
        s.serialize_field("code", &self.code)?;
        s.serialize_field("size_kb", &self.size_kb())?;
        s.serialize_field("bank_count", &self.bank_count)?;
        s.serialize_field("byte_len", &self.byte_len())?;
        s.end()
    }
}

#[cfg(test)]
#[path = "tests/rom_size_tests.rs"]
mod tests;
