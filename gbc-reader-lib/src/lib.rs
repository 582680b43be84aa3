//! Host-side driver for the GBC cartridge reader.
//!
//! [`link`] owns the serial byte stream, [`protocol`] speaks the reader's
//! one-byte opcodes over it, and [`session`] sequences those exchanges into
//! a header read followed by a full ROM dump. [`worker`] runs the dump on a
//! background thread so a UI can stay responsive and cancel it.

pub mod error;
pub mod link;
pub mod progress;
pub mod protocol;
pub mod session;
pub mod settings;
pub mod worker;

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

pub use error::ReaderError;
pub use link::{
    Connection, LinkSettings, PortInfo, SerialConnection, available_ports, open_serial,
};
pub use progress::{ChannelProgress, LogProgress, SilentProgress, TransferEvent, TransferProgress};
pub use protocol::{HANDSHAKE_REPLY, Opcode};
pub use session::{SerialSession, SessionState, TransferSession};
pub use settings::{Settings, SettingsFile};
pub use worker::{TransferHandle, TransferOutcome, TransferSummary, spawn_rom_read};

pub use gbc_reader_core::{Cartridge, CgbFlag, ChecksumReport, DecodeError, RomSize};
