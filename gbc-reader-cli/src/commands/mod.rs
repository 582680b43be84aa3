pub(crate) mod config;
pub(crate) mod dump;
pub(crate) mod header;
pub(crate) mod ports;
pub(crate) mod verify;

use gbc_reader_lib::{SerialSession, Settings};

use crate::CliError;

/// Load settings, resolve the port, and connect to the reader.
pub(crate) fn open_session(port: Option<String>) -> Result<(SerialSession, Settings), CliError> {
    let settings = Settings::load().map_err(|e| CliError::config(e.to_string()))?;
    let port = settings.resolve_port(port).ok_or(CliError::NoPort)?;

    log::info!("Connecting to reader on {}...", port);
    let mut session = SerialSession::new();
    session.connect(&port, &settings.link.to_link_settings())?;
    Ok((session, settings))
}
