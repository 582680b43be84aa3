use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;

/// List serial ports.
pub(crate) fn run_ports() -> Result<(), CliError> {
    let ports = gbc_reader_lib::available_ports()?;
    if ports.is_empty() {
        log::info!("No serial ports found. Is the reader plugged in?");
        return Ok(());
    }

    log::info!(
        "{}",
        "Available serial ports".if_supports_color(Stdout, |t| t.bold())
    );
    crate::log_blank();
    for port in &ports {
        log::info!(
            "  {} {}",
            format!("{:<20}", port.name).if_supports_color(Stdout, |t| t.cyan()),
            port.description.if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    Ok(())
}
