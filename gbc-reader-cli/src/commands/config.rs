use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use gbc_reader_lib::settings::{SettingsFile, save_port, settings_path};

use crate::CliError;

/// Show the settings file and its contents.
pub(crate) fn run_config_show() -> Result<(), CliError> {
    let path = settings_path();

    log::info!(
        "{}",
        "GBC Reader Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();

    if path.exists() {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found, using defaults)".if_supports_color(Stdout, |t| t.dimmed()),
        );
        return Ok(());
    }
    crate::log_blank();

    let file = SettingsFile::open(&path).map_err(|e| CliError::config(e.to_string()))?;
    let contents = file.to_pretty_string()?;
    for line in contents.lines() {
        log::info!("  {}", line);
    }
    Ok(())
}

/// Print the settings file path.
pub(crate) fn run_config_path() -> Result<(), CliError> {
    println!("{}", settings_path().display());
    Ok(())
}

/// Save the default serial port.
pub(crate) fn run_config_set_port(port: &str) -> Result<(), CliError> {
    save_port(Some(port))?;
    log::info!(
        "Default port set to {} in {}",
        port.if_supports_color(Stdout, |t| t.cyan()),
        settings_path().display()
    );
    Ok(())
}
