//! Byte-stream link to the cartridge reader.
//!
//! The reader is an AVR board behind a USB serial adapter. It needs a
//! couple of seconds after the port opens before it answers, and it speaks
//! in single bytes with no framing: every read either yields one byte or
//! times out.

use std::io::{self, Read, Write};
use std::time::Duration;

use serialport::{DataBits, FlowControl, Parity, SerialPort, SerialPortType, StopBits};

use crate::ReaderError;
use crate::protocol::{HANDSHAKE_REPLY, Opcode};

pub const DEFAULT_BAUD_RATE: u32 = 76_800;
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(2);
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(2);

/// Serial parameters for opening the reader.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkSettings {
    pub baud_rate: u32,
    /// Per-byte read timeout
    pub read_timeout: Duration,
    /// Wait between opening the port and the handshake
    pub settle_delay: Duration,
}

impl Default for LinkSettings {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout: DEFAULT_READ_TIMEOUT,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }
}

impl LinkSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }
}

/// An open, handshaken link to the reader.
///
/// Any `Read + Write` stream works; [`open_serial`] produces the real one.
#[derive(Debug)]
pub struct Connection<S> {
    port: String,
    stream: Option<S>,
}

/// Connection over a real serial port.
pub type SerialConnection = Connection<Box<dyn SerialPort>>;

impl<S: Read + Write> Connection<S> {
    /// Handshake over an already-open stream.
    ///
    /// The stream is dropped if the device does not answer `0xA0`.
    pub fn establish(stream: S, port: impl Into<String>) -> Result<Self, ReaderError> {
        let mut conn = Self {
            port: port.into(),
            stream: Some(stream),
        };
        match conn.handshake() {
            Ok(()) => {
                log::debug!("Handshake with {} succeeded", conn.port);
                Ok(conn)
            }
            Err(reason) => {
                conn.close();
                Err(ReaderError::no_device(conn.port, reason))
            }
        }
    }

    fn handshake(&mut self) -> Result<(), String> {
        self.write_byte(Opcode::Handshake.byte())
            .map_err(|e| format!("handshake write failed: {e}"))?;
        let reply = self
            .read_byte()
            .map_err(|e| format!("no handshake reply: {e}"))?;
        if reply == HANDSHAKE_REPLY {
            Ok(())
        } else {
            Err(format!(
                "handshake returned 0x{reply:02X}, expected 0x{HANDSHAKE_REPLY:02X}"
            ))
        }
    }

    /// Port identifier this connection was opened on.
    pub fn port(&self) -> &str {
        &self.port
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// The underlying stream, or `None` once closed.
    pub fn get_ref(&self) -> Option<&S> {
        self.stream.as_ref()
    }

    fn stream(&mut self) -> io::Result<&mut S> {
        self.stream
            .as_mut()
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotConnected))
    }

    pub fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        let stream = self.stream()?;
        stream.write_all(&[byte])?;
        stream.flush()
    }

    /// Read a single byte. An empty read surfaces as `ErrorKind::TimedOut`.
    pub fn read_byte(&mut self) -> io::Result<u8> {
        let stream = self.stream()?;
        let mut buf = [0u8; 1];
        loop {
            match stream.read(&mut buf) {
                Ok(1) => return Ok(buf[0]),
                Ok(_) => return Err(io::Error::new(io::ErrorKind::TimedOut, "empty read")),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::WouldBlock | io::ErrorKind::UnexpectedEof
                    ) =>
                {
                    return Err(io::Error::new(io::ErrorKind::TimedOut, e));
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Drop the underlying stream. Safe to call more than once.
    pub fn close(&mut self) {
        if self.stream.take().is_some() {
            log::debug!("Closed connection to {}", self.port);
        }
    }
}

/// Open the reader on a serial port, wait for it to settle, and handshake.
pub fn open_serial(port: &str, settings: &LinkSettings) -> Result<SerialConnection, ReaderError> {
    log::debug!(
        "Opening {} at {} baud (timeout {:?})",
        port,
        settings.baud_rate,
        settings.read_timeout
    );
    let stream = serialport::new(port, settings.baud_rate)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .flow_control(FlowControl::None)
        .timeout(settings.read_timeout)
        .open()
        .map_err(|e| ReaderError::no_device(port, e.to_string()))?;

    std::thread::sleep(settings.settle_delay);
    Connection::establish(stream, port)
}

/// A serial port that could host a reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortInfo {
    /// Identifier to pass to [`open_serial`]
    pub name: String,
    /// Human-readable description for selection menus
    pub description: String,
}

/// List the serial ports available on this machine.
pub fn available_ports() -> Result<Vec<PortInfo>, ReaderError> {
    let ports = serialport::available_ports()
        .map_err(|e| ReaderError::no_device("<enumeration>", e.to_string()))?;
    Ok(ports
        .into_iter()
        .map(|p| PortInfo {
            description: describe_port_type(&p.port_type),
            name: p.port_name,
        })
        .collect())
}

fn describe_port_type(port_type: &SerialPortType) -> String {
    match port_type {
        SerialPortType::UsbPort(usb) => {
            let name = usb
                .product
                .clone()
                .or_else(|| usb.manufacturer.clone())
                .unwrap_or_else(|| "USB serial".to_string());
            format!("{} ({:04x}:{:04x})", name, usb.vid, usb.pid)
        }
        SerialPortType::BluetoothPort => "Bluetooth".to_string(),
        SerialPortType::PciPort => "PCI".to_string(),
        SerialPortType::Unknown => "Unknown".to_string(),
    }
}

#[cfg(test)]
#[path = "tests/link_tests.rs"]
mod tests;
