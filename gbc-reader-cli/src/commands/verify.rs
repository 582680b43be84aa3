use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use gbc_reader_core::util::format_bytes;
use gbc_reader_core::{Cartridge, RawHeader, verify_rom_image};

use crate::CliError;

/// Check the global checksum of a dumped image without the reader.
pub(crate) fn run_verify(file: &Path) -> Result<(), CliError> {
    let image = std::fs::read(file)?;
    log::info!(
        "Verifying {} ({})",
        file.display().if_supports_color(Stdout, |t| t.cyan()),
        format_bytes(image.len() as u64)
    );

    let raw = RawHeader::from_rom_image(&image)?;
    match Cartridge::decode(&raw) {
        Ok(cartridge) => {
            crate::log_blank();
            super::header::print_header(&cartridge);
            crate::log_blank();
            let expected = cartridge.rom_size().byte_len();
            if image.len() != expected {
                log::warn!(
                    "Image is {} bytes but the header declares {} bytes",
                    image.len(),
                    expected
                );
            }
        }
        Err(e) => log::warn!("Header does not decode: {}", e),
    }

    let report = verify_rom_image(&image)?;
    if report.is_match() {
        log::info!("{}", report.if_supports_color(Stdout, |t| t.green()));
        Ok(())
    } else {
        log::warn!("{}", report);
        Err(CliError::checksum_mismatch(file.display().to_string()))
    }
}
