//! Cartridge type byte (header offset 0x0147).
//!
//! The byte identifies the memory bank controller and any extra hardware
//! on the cartridge (RAM, battery, timer, rumble). Only the IDs that the
//! reader catalog documents are accepted; anything else usually means a
//! loose connection or an empty slot rather than an exotic cartridge.

use crate::DecodeError;

/// Every cartridge type code with a known name, in code order.
pub const KNOWN_CODES: &[u8] = &[
    0x00, 0x01, 0x02, 0x03, 0x05, 0x06, 0x08, 0x09, 0x0B, 0x0C, 0x0D, 0x0F, 0x10, 0x11, 0x12,
    0x13, 0x15, 0x16, 0x17, 0x19, 0x1A, 0x1B, 0x1C, 0x1D, 0x1E, 0xFC, 0xFD, 0xFE, 0xFF,
];

/// Look up the name for a cartridge type code, or `None` if unmapped.
pub fn cartridge_type_name(code: u8) -> Option<&'static str> {
    let name = match code {
        0x00 => "ROM ONLY",
        0x01 => "MBC1",
        0x02 => "MBC1+RAM",
        0x03 => "MBC1+RAM+BATTERY",
        0x05 => "MBC2",
        0x06 => "MBC2+BATTERY",
        0x08 => "ROM+RAM",
        0x09 => "ROM+RAM+BATTERY",
        0x0B => "MMM01",
        0x0C => "MMM01+RAM",
        0x0D => "MMM01+RAM+BATTERY",
        0x0F => "MBC3+TIMER+BATTERY",
        0x10 => "MBC3+TIMER+RAM+BATTERY",
        0x11 => "MBC3",
        0x12 => "MBC3+RAM",
        0x13 => "MBC3+RAM+BATTERY",
        0x15 => "MBC4",
        0x16 => "MBC4+RAM",
        0x17 => "MBC4+RAM+BATTERY",
        0x19 => "MBC5",
        0x1A => "MBC5+RAM",
        0x1B => "MBC5+RAM+BATTERY",
        0x1C => "MBC5+RUMBLE",
        0x1D => "MBC5+RUMBLE+RAM",
        0x1E => "MBC5+RUMBLE+RAM+BATTERY",
        0xFC => "POCKET CAMERA",
        0xFD => "BANDAI TAMA5",
        0xFE => "HUC3",
        0xFF => "HUC1+RAM+BATTERY",
        _ => return None,
    };
    Some(name)
}

/// Decode a cartridge type code into its human-readable name.
pub fn decode_cartridge_type(code: u8) -> Result<&'static str, DecodeError> {
    cartridge_type_name(code).ok_or(DecodeError::UnknownCartridgeType(code))
}
