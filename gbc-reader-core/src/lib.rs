//! Game Boy / Game Boy Color cartridge header decoding.
//!
//! Pure, I/O-free layer that turns raw header bytes (as streamed by the
//! cartridge reader, or as found in a dumped image) into typed values:
//!
//! - cartridge type names ([`cartridge_type`])
//! - ROM size classes and bank counts ([`RomSize`])
//! - CGB support tiers, titles and the boot logo ([`header`])
//! - the global checksum and its verification ([`checksum`])

pub mod cartridge;
pub mod cartridge_type;
pub mod checksum;
pub mod error;
pub mod header;
pub mod rom_size;
pub mod util;

pub use cartridge::Cartridge;
pub use cartridge_type::decode_cartridge_type;
pub use checksum::{ChecksumReport, compute_global_checksum, verify_rom_image};
pub use error::DecodeError;
pub use header::{CgbFlag, HeaderField, NINTENDO_LOGO, RawHeader};
pub use rom_size::RomSize;
