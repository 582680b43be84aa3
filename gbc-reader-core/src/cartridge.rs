//! The cartridge being read: decoded header plus, once dumped, its ROM data.

use serde::{Serialize, Serializer};

use crate::checksum::ChecksumReport;
use crate::header::{
    CgbFlag, LOGO_LEN, RawHeader, decode_global_checksum, decode_title, logo_matches,
};
use crate::util::{rom_file_name, to_hex};
use crate::{DecodeError, RomSize, decode_cartridge_type};

/// One physical cartridge read session.
///
/// Header fields are fixed once decoded. The ROM size may be replaced, but
/// only together with the game data it was read for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cartridge {
    cartridge_type: &'static str,
    cartridge_type_code: u8,
    rom_size: RomSize,
    cgb_flag: CgbFlag,
    title: String,
    #[serde(serialize_with = "serialize_hex")]
    logo: [u8; LOGO_LEN],
    global_checksum: u16,
    #[serde(skip)]
    game_data: Option<Vec<u8>>,
}

fn serialize_hex<S: Serializer>(bytes: &[u8; LOGO_LEN], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&to_hex(bytes))
}

impl Cartridge {
    /// Decode raw header bytes into a cartridge. No game data is attached.
    pub fn decode(raw: &RawHeader) -> Result<Self, DecodeError> {
        let cartridge_type = decode_cartridge_type(raw.cartridge_type)?;
        let rom_size = RomSize::from_code(raw.rom_size)?;
        let cgb_flag = CgbFlag::from_byte(raw.cgb_flag);
        Ok(Self {
            cartridge_type,
            cartridge_type_code: raw.cartridge_type,
            rom_size,
            cgb_flag,
            title: decode_title(&raw.title, cgb_flag),
            logo: raw.logo,
            global_checksum: decode_global_checksum(&raw.global_checksum)?,
            game_data: None,
        })
    }

    /// Human-readable cartridge type (e.g. "MBC5+RAM+BATTERY").
    pub fn cartridge_type(&self) -> &'static str {
        self.cartridge_type
    }

    pub fn cartridge_type_code(&self) -> u8 {
        self.cartridge_type_code
    }

    pub fn rom_size(&self) -> RomSize {
        self.rom_size
    }

    pub fn size_kb(&self) -> f64 {
        self.rom_size.size_kb()
    }

    pub fn bank_count(&self) -> u16 {
        self.rom_size.bank_count()
    }

    pub fn cgb_flag(&self) -> CgbFlag {
        self.cgb_flag
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Raw, undecoded boot logo bitmap.
    pub fn logo(&self) -> &[u8; LOGO_LEN] {
        &self.logo
    }

    pub fn logo_matches(&self) -> bool {
        logo_matches(&self.logo)
    }

    pub fn global_checksum(&self) -> u16 {
        self.global_checksum
    }

    /// Whether a checksum re-read from the slot identifies this cartridge.
    pub fn is_same_cartridge(&self, global_checksum: u16) -> bool {
        self.global_checksum == global_checksum
    }

    pub fn game_data(&self) -> Option<&[u8]> {
        self.game_data.as_deref()
    }

    pub fn has_game_data(&self) -> bool {
        self.game_data.is_some()
    }

    /// Attach a full ROM dump together with the size class it was read for.
    ///
    /// The data must be exactly `rom_size.byte_len()` bytes.
    pub fn attach_game_data(&mut self, rom_size: RomSize, data: Vec<u8>) -> Result<(), DecodeError> {
        if data.len() != rom_size.byte_len() {
            return Err(DecodeError::DataLengthMismatch {
                expected: rom_size.byte_len(),
                actual: data.len(),
            });
        }
        self.rom_size = rom_size;
        self.game_data = Some(data);
        Ok(())
    }

    pub fn clear_game_data(&mut self) {
        self.game_data = None;
    }

    /// Verify the attached game data against the header checksum.
    ///
    /// Returns `None` until game data has been attached.
    pub fn verify_checksum(&self) -> Option<ChecksumReport> {
        self.game_data
            .as_deref()
            .map(|data| ChecksumReport::verify(data, self.global_checksum))
    }

    /// Default export file name derived from the title.
    pub fn file_name(&self) -> String {
        rom_file_name(&self.title, self.cgb_flag)
    }
}

#[cfg(test)]
#[path = "tests/cartridge_tests.rs"]
mod tests;
