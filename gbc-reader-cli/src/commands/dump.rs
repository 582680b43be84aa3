use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use gbc_reader_core::util::format_bytes;
use gbc_reader_lib::spawn_rom_read;

use crate::CliError;
use crate::transfer_bar::TransferBar;

/// Connect, read the header, dump the ROM on a worker thread, and write it out.
pub(crate) fn run_dump(
    port: Option<String>,
    output: Option<PathBuf>,
    quiet: bool,
) -> Result<(), CliError> {
    let (mut session, settings) = super::open_session(port)?;

    let cartridge = session.read_header()?;
    crate::log_blank();
    super::header::print_header(cartridge);
    crate::log_blank();

    let total = cartridge.rom_size().byte_len() as u64;
    let path = output.unwrap_or_else(|| {
        settings
            .output
            .directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(cartridge.file_name())
    });

    let bar = TransferBar::new(total, quiet);
    let handle = spawn_rom_read(session, Arc::new(AtomicBool::new(false)));
    for event in handle.events().iter() {
        bar.handle(event);
    }
    bar.finish();

    let outcome = handle.join()?;
    let summary = outcome.result?;

    if summary.checksum.is_match() {
        log::info!(
            "{} {}",
            "Checksum correct:".if_supports_color(Stdout, |t| t.green()),
            summary.checksum.expected_hex()
        );
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(&path)?);
    let written = outcome.session.export(&mut writer)?;
    writer.flush()?;

    log::info!(
        "Wrote {} to {}",
        format_bytes(written as u64),
        path.display().if_supports_color(Stdout, |t| t.cyan())
    );
    Ok(())
}
