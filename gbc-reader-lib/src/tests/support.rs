//! In-memory stand-ins for the serial port.

use std::collections::VecDeque;
use std::io::{self, Read, Write};

use gbc_reader_core::NINTENDO_LOGO;

use crate::HANDSHAKE_REPLY;
use crate::link::Connection;

/// Replays canned reply bytes and records everything written.
///
/// Once the script runs dry every read returns `Ok(0)`, the way a serial
/// port reports an expired timeout.
#[derive(Debug, Default)]
pub struct ScriptedStream {
    pub replies: VecDeque<u8>,
    pub written: Vec<u8>,
    pub read_error: Option<io::ErrorKind>,
}

impl ScriptedStream {
    pub fn new(replies: &[u8]) -> Self {
        Self {
            replies: replies.iter().copied().collect(),
            ..Default::default()
        }
    }

    pub fn failing(kind: io::ErrorKind) -> Self {
        Self {
            read_error: Some(kind),
            ..Default::default()
        }
    }
}

impl Read for ScriptedStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if let Some(kind) = self.read_error {
            return Err(io::Error::from(kind));
        }
        if buf.is_empty() {
            return Ok(0);
        }
        match self.replies.pop_front() {
            Some(byte) => {
                buf[0] = byte;
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

impl Write for ScriptedStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Replies for a full header read (0x02, 0x03, 0x04, 0x05, 0x06, 0x08).
pub fn header_replies(cartridge_type: u8, rom_size: u8, cgb: u8, title: &[u8], checksum: u16) -> Vec<u8> {
    let mut replies = vec![cartridge_type, rom_size, cgb];
    let mut padded = [0u8; 16];
    padded[..title.len()].copy_from_slice(title);
    replies.extend_from_slice(&padded);
    replies.extend_from_slice(&NINTENDO_LOGO);
    replies.extend_from_slice(&checksum.to_be_bytes());
    replies
}

/// A connection whose handshake has already been answered.
pub fn connected(replies: &[u8]) -> Connection<ScriptedStream> {
    let mut script = vec![HANDSHAKE_REPLY];
    script.extend_from_slice(replies);
    match Connection::establish(ScriptedStream::new(&script), "test") {
        Ok(conn) => conn,
        Err(e) => panic!("scripted handshake failed: {e}"),
    }
}

/// Bytes written to the stream so far, minus the handshake opcode.
pub fn sent_opcodes(conn: &Connection<ScriptedStream>) -> Vec<u8> {
    conn.get_ref()
        .map(|s| s.written[1..].to_vec())
        .unwrap_or_default()
}
