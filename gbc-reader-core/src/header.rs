//! Cartridge header fields and their raw encodings.

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::DecodeError;

/// Length of the raw title field (0x0134-0x0143).
pub const TITLE_LEN: usize = 16;

/// Title length when the last title byte is used as the CGB flag.
pub const CGB_TITLE_LEN: usize = 11;

/// Length of the boot logo bitmap (0x0104-0x0133).
pub const LOGO_LEN: usize = 48;

/// The boot logo bitmap every licensed cartridge carries.
pub const NINTENDO_LOGO: [u8; LOGO_LEN] = [
    0xCE, 0xED, 0x66, 0x66, 0xCC, 0x0D, 0x00, 0x0B, 0x03, 0x73, 0x00, 0x83, 0x00, 0x0C, 0x00, 0x0D,
    0x00, 0x08, 0x11, 0x1F, 0x88, 0x89, 0x00, 0x0E, 0xDC, 0xCC, 0x6E, 0xE6, 0xDD, 0xDD, 0xD9, 0x99,
    0xBB, 0xBB, 0x67, 0x63, 0x6E, 0x0E, 0xEC, 0xCC, 0xDD, 0xDC, 0x99, 0x9F, 0xBB, 0xB9, 0x33, 0x3E,
];

/// Header fields the reader can fetch, with their fixed cartridge addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderField {
    Logo,
    Title,
    CgbFlag,
    CartridgeType,
    RomSize,
    GlobalChecksum,
}

impl HeaderField {
    /// Address of the first byte of the field.
    pub fn offset(self) -> usize {
        match self {
            Self::Logo => 0x0104,
            Self::Title => 0x0134,
            Self::CgbFlag => 0x0143,
            Self::CartridgeType => 0x0147,
            Self::RomSize => 0x0148,
            Self::GlobalChecksum => 0x014E,
        }
    }

    /// Number of bytes in the field.
    pub fn size(self) -> usize {
        match self {
            Self::Logo => LOGO_LEN,
            Self::Title => TITLE_LEN,
            Self::CgbFlag | Self::CartridgeType | Self::RomSize => 1,
            Self::GlobalChecksum => 2,
        }
    }

    /// Address range covered by the field.
    pub fn range(self) -> Range<usize> {
        self.offset()..self.offset() + self.size()
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Logo => "logo",
            Self::Title => "title",
            Self::CgbFlag => "CGB flag",
            Self::CartridgeType => "cartridge type",
            Self::RomSize => "ROM size",
            Self::GlobalChecksum => "global checksum",
        }
    }
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Game Boy Color support tier (header offset 0x0143).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CgbFlag {
    /// Runs on both DMG and CGB, with CGB enhancements (0x80)
    CgbSupport,
    /// CGB only (0xC0)
    CgbOnly,
    /// No CGB flag; the byte is part of the title
    Undefined,
}

impl CgbFlag {
    /// Decode the flag byte. Every byte value is valid.
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0x80 => Self::CgbSupport,
            0xC0 => Self::CgbOnly,
            _ => Self::Undefined,
        }
    }

    pub fn is_cgb(self) -> bool {
        !matches!(self, Self::Undefined)
    }

    /// Maximum title length for this tier.
    pub fn title_len(self) -> usize {
        if self.is_cgb() { CGB_TITLE_LEN } else { TITLE_LEN }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::CgbSupport => "CGB support",
            Self::CgbOnly => "CGB only",
            Self::Undefined => "Undefined",
        }
    }
}

impl fmt::Display for CgbFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Decode the title field.
///
/// Bytes outside printable ASCII (including 0x00 padding) are skipped, not
/// replaced. The remaining characters are cut to the tier's title length,
/// then trailing space padding is dropped.
pub fn decode_title(raw: &[u8], cgb_flag: CgbFlag) -> String {
    let mut title: String = raw
        .iter()
        .filter(|&&b| (0x20..0x7F).contains(&b))
        .take(cgb_flag.title_len())
        .map(|&b| b as char)
        .collect();
    title.truncate(title.trim_end().len());
    title
}

/// Count the title bytes that [`decode_title`] would skip.
pub fn skipped_title_bytes(raw: &[u8]) -> usize {
    raw.iter().filter(|&&b| !(0x20..0x7F).contains(&b)).count()
}

/// Combine the two checksum bytes big-endian.
pub fn decode_global_checksum(raw: &[u8]) -> Result<u16, DecodeError> {
    match raw {
        [hi, lo] => Ok(u16::from_be_bytes([*hi, *lo])),
        _ => Err(DecodeError::InvalidLength {
            field: HeaderField::GlobalChecksum,
            expected: 2,
            actual: raw.len(),
        }),
    }
}

/// Whether a logo bitmap matches the licensed boot logo.
pub fn logo_matches(logo: &[u8]) -> bool {
    logo == NINTENDO_LOGO.as_slice()
}

/// Header bytes exactly as the reader returns them, before any decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawHeader {
    pub cartridge_type: u8,
    pub rom_size: u8,
    pub cgb_flag: u8,
    pub title: [u8; TITLE_LEN],
    pub logo: [u8; LOGO_LEN],
    pub global_checksum: [u8; 2],
}

impl RawHeader {
    /// Extract the header fields from a dumped ROM image.
    pub fn from_rom_image(image: &[u8]) -> Result<Self, DecodeError> {
        let field = |f: HeaderField| field_bytes(image, f);

        let mut title = [0u8; TITLE_LEN];
        title.copy_from_slice(field(HeaderField::Title)?);
        let mut logo = [0u8; LOGO_LEN];
        logo.copy_from_slice(field(HeaderField::Logo)?);
        let mut global_checksum = [0u8; 2];
        global_checksum.copy_from_slice(field(HeaderField::GlobalChecksum)?);

        Ok(Self {
            cartridge_type: field(HeaderField::CartridgeType)?[0],
            rom_size: field(HeaderField::RomSize)?[0],
            cgb_flag: field(HeaderField::CgbFlag)?[0],
            title,
            logo,
            global_checksum,
        })
    }
}

fn field_bytes(image: &[u8], field: HeaderField) -> Result<&[u8], DecodeError> {
    image
        .get(field.range())
        .ok_or(DecodeError::TruncatedImage {
            field,
            actual: image.len(),
        })
}

#[cfg(test)]
#[path = "tests/header_tests.rs"]
mod tests;
