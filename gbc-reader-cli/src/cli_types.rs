//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "gbc-reader")]
#[command(about = "Read and dump Game Boy / Game Boy Color cartridges", long_about = None)]
pub(crate) struct Cli {
    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments for commands that talk to the reader.
#[derive(Args, Clone)]
pub(crate) struct PortArgs {
    /// Serial port of the reader (e.g., /dev/ttyUSB0, COM3); defaults to the saved port
    #[arg(short, long)]
    pub port: Option<String>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// List serial ports the reader could be attached to
    Ports,

    /// Read and print the cartridge header
    Header {
        #[command(flatten)]
        link: PortArgs,

        /// Print the header as JSON
        #[arg(long)]
        json: bool,
    },

    /// Dump the full ROM to a file
    Dump {
        #[command(flatten)]
        link: PortArgs,

        /// Output file (default: <title>.gb / <title>.gbc in the output directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check the global checksum of a dumped ROM file
    Verify {
        /// ROM image to check
        file: PathBuf,
    },

    /// Manage the settings file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show the current settings file
    Show,

    /// Print the settings file path
    Path,

    /// Save the default serial port
    SetPort {
        /// Port to use when --port is not given
        port: String,
    },
}
