//! Shared settings file (default port, link timing, dump directory).
//!
//! The file lives at `~/.config/gbc-reader/settings.toml`. Every key is
//! optional; anything missing falls back to the reader's defaults.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::link::{DEFAULT_BAUD_RATE, DEFAULT_READ_TIMEOUT, DEFAULT_SETTLE_DELAY, LinkSettings};

/// Canonical path to the settings file: `~/.config/gbc-reader/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("gbc-reader").join("settings.toml")
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub link: LinkConfig,
    pub output: OutputConfig,
}

/// `[link]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Default serial port when none is given on the command line
    pub port: Option<String>,
    pub baud_rate: u32,
    pub read_timeout_secs: f64,
    pub settle_delay_secs: f64,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            port: None,
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout_secs: DEFAULT_READ_TIMEOUT.as_secs_f64(),
            settle_delay_secs: DEFAULT_SETTLE_DELAY.as_secs_f64(),
        }
    }
}

impl LinkConfig {
    /// Serial parameters, with negative or non-finite durations treated as zero.
    pub fn to_link_settings(&self) -> LinkSettings {
        LinkSettings::new()
            .baud_rate(self.baud_rate)
            .read_timeout(secs(self.read_timeout_secs))
            .settle_delay(secs(self.settle_delay_secs))
    }
}

fn secs(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(Duration::ZERO)
}

/// `[output]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory dumps are written to when no output path is given
    pub directory: Option<PathBuf>,
}

impl Settings {
    /// Load the shared settings file. A missing file yields the defaults.
    pub fn load() -> io::Result<Self> {
        Self::load_from(&settings_path())
    }

    pub fn load_from(path: &Path) -> io::Result<Self> {
        SettingsFile::open(path)?.settings()
    }

    /// Resolve the serial port: CLI override first, then `link.port`.
    pub fn resolve_port(&self, cli_override: Option<String>) -> Option<String> {
        cli_override.or_else(|| {
            self.link
                .port
                .as_ref()
                .filter(|p| !p.trim().is_empty())
                .cloned()
        })
    }
}

/// A settings file as written on disk.
///
/// Edits go through the raw TOML table so keys and sections this version
/// does not model survive a save. A file that does not parse, or does not
/// match [`Settings`], is reported as `InvalidData` and never overwritten.
#[derive(Debug, Clone)]
pub struct SettingsFile {
    path: PathBuf,
    table: toml::Table,
}

impl SettingsFile {
    /// Read `path`. A missing file opens as empty.
    pub fn open(path: &Path) -> io::Result<Self> {
        let table = match std::fs::read_to_string(path) {
            Ok(contents) => contents
                .parse::<toml::Table>()
                .map_err(|e| invalid_data(path, e))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => toml::Table::new(),
            Err(e) => return Err(e),
        };
        Ok(Self {
            path: path.to_path_buf(),
            table,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Typed view of the file, with defaults for anything missing.
    pub fn settings(&self) -> io::Result<Settings> {
        toml::Value::Table(self.table.clone())
            .try_into()
            .map_err(|e| invalid_data(&self.path, e))
    }

    /// Set or clear `link.port`.
    pub fn set_port(&mut self, port: Option<&str>) -> io::Result<()> {
        let link = match self
            .table
            .entry("link")
            .or_insert_with(|| toml::Value::Table(toml::Table::new()))
        {
            toml::Value::Table(link) => link,
            _ => return Err(invalid_data(&self.path, "[link] is not a table")),
        };
        match port {
            Some(p) => link.insert("port".to_string(), toml::Value::String(p.to_string())),
            None => link.remove("port"),
        };
        Ok(())
    }

    /// The file contents as pretty-printed TOML.
    pub fn to_pretty_string(&self) -> io::Result<String> {
        toml::to_string_pretty(&self.table).map_err(io::Error::other)
    }

    /// Write the file back via a temp file and rename.
    ///
    /// Refuses to write a table that would not load back as [`Settings`].
    pub fn save(&self) -> io::Result<()> {
        self.settings()?;
        let serialized = self.to_pretty_string()?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("toml.tmp");
        std::fs::write(&tmp, serialized)?;
        std::fs::rename(&tmp, &self.path)?;

        log::debug!("Saved settings to {}", self.path.display());
        Ok(())
    }
}

fn invalid_data(path: &Path, err: impl std::fmt::Display) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("{}: {}", path.display(), err),
    )
}

/// Save (or clear) the default port in the shared settings file.
pub fn save_port(port: Option<&str>) -> io::Result<()> {
    save_port_to(&settings_path(), port)
}

/// Save (or clear) `link.port` in the settings file at `path`.
pub fn save_port_to(path: &Path, port: Option<&str>) -> io::Result<()> {
    let mut file = SettingsFile::open(path)?;
    file.set_port(port)?;
    file.save()
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
