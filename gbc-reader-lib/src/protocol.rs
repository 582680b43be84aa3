//! Reader command protocol.
//!
//! Each exchange is one opcode byte out, then a fixed number of bytes back
//! in address order. There is no framing, no request ID and no error code
//! from the device, so the host must consume exactly the expected response
//! before sending the next opcode.

use std::fmt;
use std::io::{Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use gbc_reader_core::header::{
    HeaderField, LOGO_LEN, TITLE_LEN, decode_global_checksum, skipped_title_bytes,
};
use gbc_reader_core::{DecodeError, RawHeader};

use crate::progress::TransferProgress;
use crate::{Connection, ReaderError};

/// Reply the firmware sends to [`Opcode::Handshake`].
pub const HANDSHAKE_REPLY: u8 = 0xA0;

/// Commands understood by the reader firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    Handshake = 0x01,
    CartridgeType = 0x02,
    RomSize = 0x03,
    CgbFlag = 0x04,
    Title = 0x05,
    Logo = 0x06,
    RomData = 0x07,
    GlobalChecksum = 0x08,
}

impl Opcode {
    pub fn byte(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Handshake => "handshake",
            Self::CartridgeType => "cartridge type",
            Self::RomSize => "ROM size",
            Self::CgbFlag => "CGB flag",
            Self::Title => "game title",
            Self::Logo => "logo",
            Self::RomData => "ROM data",
            Self::GlobalChecksum => "global checksum",
        }
    }

    /// Fixed response size, or `None` for the size-dependent ROM stream.
    pub fn response_len(self) -> Option<usize> {
        match self {
            Self::Handshake => Some(1),
            Self::RomData => None,
            other => other.field().map(HeaderField::size),
        }
    }

    /// Header field this opcode fetches.
    pub fn field(self) -> Option<HeaderField> {
        match self {
            Self::CartridgeType => Some(HeaderField::CartridgeType),
            Self::RomSize => Some(HeaderField::RomSize),
            Self::CgbFlag => Some(HeaderField::CgbFlag),
            Self::Title => Some(HeaderField::Title),
            Self::Logo => Some(HeaderField::Logo),
            Self::GlobalChecksum => Some(HeaderField::GlobalChecksum),
            Self::Handshake | Self::RomData => None,
        }
    }

    pub fn for_field(field: HeaderField) -> Self {
        match field {
            HeaderField::CartridgeType => Self::CartridgeType,
            HeaderField::RomSize => Self::RomSize,
            HeaderField::CgbFlag => Self::CgbFlag,
            HeaderField::Title => Self::Title,
            HeaderField::Logo => Self::Logo,
            HeaderField::GlobalChecksum => Self::GlobalChecksum,
        }
    }

    /// The opcode whose response a decode error came from.
    pub fn for_decode_error(err: &DecodeError) -> Self {
        err.field().map_or(Self::RomData, Self::for_field)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X} ({})", self.byte(), self.name())
    }
}

/// Send `opcode` and fill `response` from the reply.
fn exchange<S: Read + Write>(
    conn: &mut Connection<S>,
    opcode: Opcode,
    response: &mut [u8],
) -> Result<(), ReaderError> {
    let expected = response.len();
    log::debug!("-> {} (expecting {} bytes)", opcode, expected);
    conn.write_byte(opcode.byte())
        .map_err(|e| ReaderError::link(opcode, expected, 0, e))?;
    for (received, slot) in response.iter_mut().enumerate() {
        *slot = conn
            .read_byte()
            .map_err(|e| ReaderError::link(opcode, expected, received, e))?;
    }
    Ok(())
}

fn read_u8<S: Read + Write>(conn: &mut Connection<S>, opcode: Opcode) -> Result<u8, ReaderError> {
    let mut buf = [0u8; 1];
    exchange(conn, opcode, &mut buf)?;
    Ok(buf[0])
}

pub(crate) fn read_cartridge_type<S: Read + Write>(
    conn: &mut Connection<S>,
) -> Result<u8, ReaderError> {
    read_u8(conn, Opcode::CartridgeType)
}

pub(crate) fn read_rom_size_code<S: Read + Write>(
    conn: &mut Connection<S>,
) -> Result<u8, ReaderError> {
    read_u8(conn, Opcode::RomSize)
}

pub(crate) fn read_cgb_flag<S: Read + Write>(conn: &mut Connection<S>) -> Result<u8, ReaderError> {
    read_u8(conn, Opcode::CgbFlag)
}

pub(crate) fn read_title<S: Read + Write>(
    conn: &mut Connection<S>,
) -> Result<[u8; TITLE_LEN], ReaderError> {
    let mut title = [0u8; TITLE_LEN];
    exchange(conn, Opcode::Title, &mut title)?;
    let skipped = skipped_title_bytes(&title);
    if skipped > 0 {
        log::debug!("Skipping {} non-ASCII title bytes", skipped);
    }
    Ok(title)
}

pub(crate) fn read_logo<S: Read + Write>(
    conn: &mut Connection<S>,
) -> Result<[u8; LOGO_LEN], ReaderError> {
    let mut logo = [0u8; LOGO_LEN];
    exchange(conn, Opcode::Logo, &mut logo)?;
    Ok(logo)
}

/// Read the two checksum bytes and combine them big-endian.
pub(crate) fn read_global_checksum<S: Read + Write>(
    conn: &mut Connection<S>,
) -> Result<u16, ReaderError> {
    let mut raw = [0u8; 2];
    exchange(conn, Opcode::GlobalChecksum, &mut raw)?;
    decode_global_checksum(&raw).map_err(ReaderError::unknown_data)
}

/// Read every header field in firmware order.
pub(crate) fn read_raw_header<S: Read + Write>(
    conn: &mut Connection<S>,
) -> Result<RawHeader, ReaderError> {
    let cartridge_type = read_cartridge_type(conn)?;
    let rom_size = read_rom_size_code(conn)?;
    let cgb_flag = read_cgb_flag(conn)?;
    let title = read_title(conn)?;
    let logo = read_logo(conn)?;
    let mut global_checksum = [0u8; 2];
    exchange(conn, Opcode::GlobalChecksum, &mut global_checksum)?;
    Ok(RawHeader {
        cartridge_type,
        rom_size,
        cgb_flag,
        title,
        logo,
        global_checksum,
    })
}

/// Stream `total` bytes of ROM data.
///
/// `progress.on_progress` runs after every byte. The cancel flag is checked
/// before each byte; the device keeps streaming regardless, so the caller
/// must close the link after a cancellation.
pub(crate) fn read_rom_data<S: Read + Write>(
    conn: &mut Connection<S>,
    total: usize,
    progress: &dyn TransferProgress,
    cancel: &AtomicBool,
) -> Result<Vec<u8>, ReaderError> {
    let opcode = Opcode::RomData;
    log::debug!("-> {} (expecting {} bytes)", opcode, total);
    conn.write_byte(opcode.byte())
        .map_err(|e| ReaderError::link(opcode, total, 0, e))?;

    let mut data = Vec::with_capacity(total);
    for received in 0..total {
        if cancel.load(Ordering::Relaxed) {
            return Err(ReaderError::Cancelled {
                bytes_read: received as u64,
                total: total as u64,
            });
        }
        let byte = conn
            .read_byte()
            .map_err(|e| ReaderError::link(opcode, total, received, e))?;
        data.push(byte);
        progress.on_progress(received as u64 + 1, total as u64);
    }
    Ok(data)
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
