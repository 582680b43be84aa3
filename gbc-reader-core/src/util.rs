use crate::header::CgbFlag;

/// Format a byte count as a human-readable size string (e.g., "4 KB", "2 MB").
///
/// Uses exact integer division; values that aren't clean multiples of KB/MB
/// are shown in bytes.
pub fn format_bytes(bytes: u64) -> String {
    if bytes >= 1024 * 1024 && bytes.is_multiple_of(1024 * 1024) {
        format!("{} MB", bytes / (1024 * 1024))
    } else if bytes >= 1024 && bytes.is_multiple_of(1024) {
        format!("{} KB", bytes / 1024)
    } else {
        format!("{} bytes", bytes)
    }
}

/// Format a ROM size class in kilobytes ("32 KB", "1126.4 KB").
pub fn format_size_kb(size_kb: f64) -> String {
    if size_kb.fract() == 0.0 {
        format!("{} KB", size_kb as u64)
    } else {
        format!("{:.1} KB", size_kb)
    }
}

/// Lowercase hex string for a byte slice.
pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Default file name for a dumped ROM: the title plus `.gbc` or `.gb`.
///
/// Characters that are not safe in file names are replaced with `_`; an
/// empty title becomes `UNTITLED`.
pub fn rom_file_name(title: &str, cgb_flag: CgbFlag) -> String {
    let stem: String = title
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect();
    let stem = if stem.is_empty() { "UNTITLED" } else { stem.as_str() };
    let ext = if cgb_flag.is_cgb() { "gbc" } else { "gb" };
    format!("{stem}.{ext}")
}
