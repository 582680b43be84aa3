//! Fake cartridge reader that answers opcodes the way the firmware does.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::sync::{Arc, Mutex, MutexGuard};

use gbc_reader_core::header::HeaderField;
use gbc_reader_core::{NINTENDO_LOGO, RomSize, compute_global_checksum};
use gbc_reader_lib::{Connection, HANDSHAKE_REPLY};

struct Device {
    rom: Vec<u8>,
    handshake_reply: u8,
    /// Stop streaming ROM data after this many bytes
    stall_after: Option<usize>,
    pending: VecDeque<u8>,
    opcodes: Vec<u8>,
}

/// Stream end of the fake reader. Clones share one device.
#[derive(Clone)]
pub struct FakeReader {
    device: Arc<Mutex<Device>>,
}

impl FakeReader {
    pub fn new(rom: Vec<u8>) -> Self {
        Self {
            device: Arc::new(Mutex::new(Device {
                rom,
                handshake_reply: HANDSHAKE_REPLY,
                stall_after: None,
                pending: VecDeque::new(),
                opcodes: Vec::new(),
            })),
        }
    }

    fn device(&self) -> MutexGuard<'_, Device> {
        self.device.lock().unwrap()
    }

    pub fn with_handshake_reply(self, reply: u8) -> Self {
        self.device().handshake_reply = reply;
        self
    }

    pub fn stall_after(&self, bytes: usize) {
        self.device().stall_after = Some(bytes);
    }

    /// Pull the cartridge and insert another one.
    pub fn swap_rom(&self, rom: Vec<u8>) {
        self.device().rom = rom;
    }

    /// Every opcode received, in order.
    pub fn opcodes(&self) -> Vec<u8> {
        self.device().opcodes.clone()
    }

    /// Handshake and wrap in a connection.
    pub fn connect(&self) -> Connection<FakeReader> {
        Connection::establish(self.clone(), "fake").unwrap()
    }
}

impl Device {
    fn field(&self, field: HeaderField) -> &[u8] {
        &self.rom[field.range()]
    }

    fn respond(&mut self, opcode: u8) {
        let reply: Vec<u8> = match opcode {
            0x01 => vec![self.handshake_reply],
            0x02 => self.field(HeaderField::CartridgeType).to_vec(),
            0x03 => self.field(HeaderField::RomSize).to_vec(),
            0x04 => self.field(HeaderField::CgbFlag).to_vec(),
            0x05 => self.field(HeaderField::Title).to_vec(),
            0x06 => self.field(HeaderField::Logo).to_vec(),
            0x08 => self.field(HeaderField::GlobalChecksum).to_vec(),
            0x07 => {
                let len = self.stall_after.unwrap_or(self.rom.len()).min(self.rom.len());
                self.rom[..len].to_vec()
            }
            _ => Vec::new(),
        };
        self.pending.extend(reply);
    }
}

impl Read for FakeReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut device = self.device();
        let mut n = 0;
        while n < buf.len() {
            match device.pending.pop_front() {
                Some(byte) => {
                    buf[n] = byte;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }
}

impl Write for FakeReader {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut device = self.device();
        for &opcode in buf {
            device.opcodes.push(opcode);
            device.respond(opcode);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl std::fmt::Debug for FakeReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FakeReader")
    }
}

/// Build a ROM image with a valid header and a correct global checksum.
///
/// Data bytes count up from zero so every position is distinguishable.
pub fn make_rom(cartridge_type: u8, size_code: u8, cgb: u8, title: &[u8]) -> Vec<u8> {
    let len = RomSize::from_code(size_code).unwrap().byte_len();
    let mut rom: Vec<u8> = (0..len).map(|i| (i & 0xFF) as u8).collect();
    rom[HeaderField::Logo.range()].copy_from_slice(&NINTENDO_LOGO);
    let title_range = HeaderField::Title.range();
    rom[title_range.clone()].fill(0);
    rom[title_range.start..title_range.start + title.len()].copy_from_slice(title);
    rom[HeaderField::CgbFlag.offset()] = cgb;
    rom[HeaderField::CartridgeType.offset()] = cartridge_type;
    rom[HeaderField::RomSize.offset()] = size_code;
    let checksum = compute_global_checksum(&rom);
    set_checksum(&mut rom, checksum);
    rom
}

/// Overwrite the stored global checksum.
pub fn set_checksum(rom: &mut [u8], checksum: u16) {
    rom[HeaderField::GlobalChecksum.range()].copy_from_slice(&checksum.to_be_bytes());
}
