//! Two-phase cartridge read session.
//!
//! ```text
//! Disconnected -> Connected -> HeaderRead -> DataRead
//! ```
//!
//! The session is the sole owner of the link, so only one opcode exchange
//! can ever be in flight. Callers never issue opcodes themselves; they ask
//! for a header read, then a data read, and the session runs the exchanges
//! in firmware order.

use std::fmt;
use std::io::{Read, Write};
use std::sync::atomic::AtomicBool;

use gbc_reader_core::{Cartridge, ChecksumReport, RomSize};
use serialport::SerialPort;

use crate::ReaderError;
use crate::link::{Connection, LinkSettings, open_serial};
use crate::progress::TransferProgress;
use crate::protocol;

/// Where a session is in the read sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Disconnected,
    Connected,
    HeaderRead,
    DataRead,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Disconnected => "disconnected",
            Self::Connected => "connected",
            Self::HeaderRead => "header read",
            Self::DataRead => "data read",
        })
    }
}

/// Drives the reader through header and data reads for one cartridge.
pub struct TransferSession<S> {
    connection: Option<Connection<S>>,
    cartridge: Option<Cartridge>,
    state: SessionState,
}

/// Session over a real serial port.
pub type SerialSession = TransferSession<Box<dyn SerialPort>>;

impl<S> Default for TransferSession<S> {
    fn default() -> Self {
        Self {
            connection: None,
            cartridge: None,
            state: SessionState::Disconnected,
        }
    }
}

impl SerialSession {
    /// Open `port`, replacing any existing connection.
    pub fn connect(&mut self, port: &str, settings: &LinkSettings) -> Result<(), ReaderError> {
        self.close();
        let connection = open_serial(port, settings)?;
        self.attach(connection);
        Ok(())
    }
}

impl<S: Read + Write> TransferSession<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of an established connection, closing any previous one.
    ///
    /// Any cartridge read over the previous connection is discarded.
    pub fn attach(&mut self, connection: Connection<S>) {
        self.close();
        self.cartridge = None;
        log::info!("Connected to GBC reader at {}", connection.port());
        self.connection = Some(connection);
        self.state = SessionState::Connected;
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Port of the current connection, if any.
    pub fn port(&self) -> Option<&str> {
        self.connection.as_ref().map(Connection::port)
    }

    pub fn connection(&self) -> Option<&Connection<S>> {
        self.connection.as_ref()
    }

    pub fn cartridge(&self) -> Option<&Cartridge> {
        self.cartridge.as_ref()
    }

    /// Take the cartridge out of the session, returning it to `Connected`.
    pub fn take_cartridge(&mut self) -> Option<Cartridge> {
        if self.connection.is_some() {
            self.state = SessionState::Connected;
        }
        self.cartridge.take()
    }

    fn require(&self, operation: &'static str, allowed: &[SessionState]) -> Result<(), ReaderError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(ReaderError::InvalidState {
                operation,
                state: self.state,
            })
        }
    }

    fn connection_mut(&mut self) -> Result<&mut Connection<S>, ReaderError> {
        self.connection.as_mut().ok_or(ReaderError::NotConnected)
    }

    /// Read and decode the cartridge header.
    ///
    /// Replaces any previously read cartridge. On failure no cartridge is
    /// kept and the session returns to `Connected`.
    pub fn read_header(&mut self) -> Result<&Cartridge, ReaderError> {
        use SessionState::*;
        self.require("read header", &[Connected, HeaderRead, DataRead])?;
        self.cartridge = None;
        self.state = Connected;

        let raw = protocol::read_raw_header(self.connection_mut()?)?;
        let cartridge = Cartridge::decode(&raw).map_err(ReaderError::unknown_data)?;

        log::info!(
            "Read header: \"{}\" ({}, {} banks, checksum {:04x})",
            cartridge.title(),
            cartridge.cartridge_type(),
            cartridge.bank_count(),
            cartridge.global_checksum()
        );
        if !cartridge.logo_matches() {
            log::warn!("Boot logo does not match; check that the cartridge is seated");
        }

        self.state = HeaderRead;
        Ok(self.cartridge.insert(cartridge))
    }

    /// Dump the full ROM of the cartridge whose header was read.
    ///
    /// The checksum is re-read first; if it differs from the header's the
    /// cartridge was swapped and the read fails with `CartridgeChanged`,
    /// leaving the session in `HeaderRead`. A cancellation closes the
    /// link, since the device keeps streaming.
    pub fn read_rom(
        &mut self,
        progress: &dyn TransferProgress,
        cancel: &AtomicBool,
    ) -> Result<&Cartridge, ReaderError> {
        use SessionState::*;
        self.require("read ROM data", &[HeaderRead, DataRead])?;

        match self.transfer(progress, cancel) {
            Ok(()) => {
                self.state = DataRead;
                let cartridge = self.cartridge.as_ref().ok_or(ReaderError::NotConnected)?;
                progress.on_complete(&format!(
                    "Read {} bytes of \"{}\"",
                    cartridge.rom_size().byte_len(),
                    cartridge.title()
                ));
                Ok(cartridge)
            }
            Err(e @ ReaderError::CartridgeChanged { .. }) => {
                log::warn!("{}", e);
                if let Some(cartridge) = self.cartridge.as_mut() {
                    cartridge.clear_game_data();
                }
                self.state = HeaderRead;
                Err(e)
            }
            Err(e @ ReaderError::Cancelled { .. }) => {
                log::info!("{}", e);
                self.close();
                Err(e)
            }
            Err(e) => {
                self.cartridge = None;
                self.state = if self.connection.is_some() {
                    Connected
                } else {
                    Disconnected
                };
                Err(e)
            }
        }
    }

    fn transfer(
        &mut self,
        progress: &dyn TransferProgress,
        cancel: &AtomicBool,
    ) -> Result<(), ReaderError> {
        let expected = self
            .cartridge
            .as_ref()
            .map(Cartridge::global_checksum)
            .ok_or(ReaderError::NotConnected)?;

        progress.on_phase("Checking cartridge identity");
        let conn = self.connection_mut()?;
        let checksum = protocol::read_global_checksum(conn)?;
        let size_code = protocol::read_rom_size_code(conn)?;
        if checksum != expected {
            return Err(ReaderError::CartridgeChanged {
                expected,
                actual: checksum,
            });
        }
        let rom_size = RomSize::from_code(size_code).map_err(ReaderError::unknown_data)?;

        progress.on_phase("Reading ROM data");
        let data = protocol::read_rom_data(conn, rom_size.byte_len(), progress, cancel)?;

        let cartridge = self.cartridge.as_mut().ok_or(ReaderError::NotConnected)?;
        cartridge
            .attach_game_data(rom_size, data)
            .map_err(ReaderError::unknown_data)?;

        if let Some(report) = cartridge.verify_checksum() {
            if report.is_match() {
                log::debug!("Checksum correct ({})", report.expected_hex());
            } else {
                progress.on_warning(&format!(
                    "Checksum incorrect (expected {}, computed {}). A real Game Boy would not care.",
                    report.expected_hex(),
                    report.computed_hex()
                ));
            }
        }
        Ok(())
    }

    fn dumped(&self, operation: &'static str) -> Result<&Cartridge, ReaderError> {
        self.require(operation, &[SessionState::DataRead])?;
        self.cartridge
            .as_ref()
            .filter(|c| c.has_game_data())
            .ok_or(ReaderError::InvalidState {
                operation,
                state: self.state,
            })
    }

    /// Write the dumped ROM to `sink` verbatim, in address order.
    pub fn export<W: Write>(&self, sink: &mut W) -> Result<usize, ReaderError> {
        let data = self.dumped("export ROM")?.game_data().unwrap_or_default();
        sink.write_all(data)?;
        Ok(data.len())
    }

    /// Recompute the global checksum over the dumped ROM.
    ///
    /// A mismatch is only reported; it never blocks an export.
    pub fn verify_checksum(&self) -> Result<ChecksumReport, ReaderError> {
        let cartridge = self.dumped("verify checksum")?;
        cartridge
            .verify_checksum()
            .ok_or(ReaderError::InvalidState {
                operation: "verify checksum",
                state: self.state,
            })
    }

    /// Close the link. Safe to call in any state, any number of times.
    pub fn close(&mut self) {
        if let Some(mut connection) = self.connection.take() {
            connection.close();
        }
        self.state = SessionState::Disconnected;
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
