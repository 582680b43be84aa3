use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use gbc_reader_core::util::format_size_kb;
use gbc_reader_lib::Cartridge;

use crate::CliError;

/// Connect, read the cartridge header, and print it.
pub(crate) fn run_header(port: Option<String>, json: bool) -> Result<(), CliError> {
    let (mut session, _) = super::open_session(port)?;
    let cartridge = session.read_header()?;

    if json {
        let out = serde_json::to_string_pretty(cartridge)
            .map_err(|e| CliError::other(format!("JSON encoding failed: {e}")))?;
        println!("{out}");
    } else {
        crate::log_blank();
        print_header(cartridge);
    }

    session.close();
    Ok(())
}

/// Print the decoded header fields, one per line.
pub(crate) fn print_header(cartridge: &Cartridge) {
    log::info!(
        "  Title:           {}",
        cartridge.title().if_supports_color(Stdout, |t| t.bold())
    );
    log::info!(
        "  Cartridge type:  {} (0x{:02X})",
        cartridge.cartridge_type(),
        cartridge.cartridge_type_code()
    );
    log::info!(
        "  ROM size:        {} ({} banks)",
        format_size_kb(cartridge.size_kb()),
        cartridge.bank_count()
    );
    log::info!("  CGB:             {}", cartridge.cgb_flag());
    log::info!("  Global checksum: {:04x}", cartridge.global_checksum());
    if cartridge.logo_matches() {
        log::info!(
            "  Logo:            {}",
            "OK".if_supports_color(Stdout, |t| t.green())
        );
    } else {
        log::info!(
            "  Logo:            {}",
            "does not match".if_supports_color(Stdout, |t| t.yellow())
        );
    }
}
