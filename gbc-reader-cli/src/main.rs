//! gbc-reader CLI
//!
//! Command-line interface for reading Game Boy cartridges through the
//! USB cartridge reader.

mod cli_types;
mod commands;
mod error;
mod transfer_bar;

use std::io::Write;

use clap::Parser;
use log::{Level, LevelFilter};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use cli_types::{Cli, Commands, ConfigAction};
pub(crate) use error::CliError;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    let result = match cli.command {
        Commands::Ports => commands::ports::run_ports(),
        Commands::Header { link, json } => commands::header::run_header(link.port, json),
        Commands::Dump { link, output } => commands::dump::run_dump(link.port, output, cli.quiet),
        Commands::Verify { file } => commands::verify::run_verify(&file),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show(),
            ConfigAction::Path => commands::config::run_config_path(),
            ConfigAction::SetPort { port } => commands::config::run_config_set_port(&port),
        },
    };

    if let Err(e) = result {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

/// Print an empty line through the logger so `--quiet` suppresses it too.
pub(crate) fn log_blank() {
    log::info!("");
}

/// Install the logger.
///
/// Normal output is plain `info!` lines on stdout; `--quiet` keeps only
/// warnings and errors, `--verbose` adds debug messages with timestamps.
/// `RUST_LOG` overrides the level.
fn init_logging(quiet: bool, verbose: bool) {
    let level = if quiet {
        LevelFilter::Warn
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level)
        .target(env_logger::Target::Stdout);

    if verbose {
        builder.format_timestamp_millis();
    } else {
        builder.format(|buf, record| match record.level() {
            Level::Info => writeln!(buf, "{}", record.args()),
            Level::Warn => writeln!(
                buf,
                "{} {}",
                "warning:".if_supports_color(Stdout, |t| t.yellow()),
                record.args()
            ),
            Level::Error => writeln!(
                buf,
                "{} {}",
                "error:".if_supports_color(Stdout, |t| t.red()),
                record.args()
            ),
            _ => writeln!(
                buf,
                "{}",
                record.args().if_supports_color(Stdout, |t| t.dimmed())
            ),
        });
    }

    builder.parse_default_env();
    builder.init();
}
