use super::*;
use tempfile::TempDir;

#[test]
fn test_missing_file_is_default() {
    let dir = TempDir::new().unwrap();
    let settings = Settings::load_from(&dir.path().join("settings.toml")).unwrap();
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.link.to_link_settings(), LinkSettings::default());
}

#[test]
fn test_partial_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.toml");
    std::fs::write(
        &path,
        "[link]\nport = \"/dev/ttyUSB0\"\nread_timeout_secs = 0.5\n",
    )
    .unwrap();

    let settings = Settings::load_from(&path).unwrap();
    assert_eq!(settings.link.port.as_deref(), Some("/dev/ttyUSB0"));
    assert_eq!(settings.link.baud_rate, 76_800);
    let link = settings.link.to_link_settings();
    assert_eq!(link.read_timeout, Duration::from_millis(500));
    assert_eq!(link.settle_delay, Duration::from_secs(2));
    assert_eq!(settings.output.directory, None);
}

#[test]
fn test_malformed_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.toml");
    std::fs::write(&path, "[link\nport = ").unwrap();
    let err = Settings::load_from(&path).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);
}

#[test]
fn test_resolve_port_priority() {
    let mut settings = Settings::default();
    assert_eq!(settings.resolve_port(None), None);

    settings.link.port = Some("COM4".to_string());
    assert_eq!(settings.resolve_port(None).as_deref(), Some("COM4"));
    assert_eq!(
        settings.resolve_port(Some("COM7".to_string())).as_deref(),
        Some("COM7")
    );

    settings.link.port = Some("  ".to_string());
    assert_eq!(settings.resolve_port(None), None);
}

#[test]
fn test_negative_timeout_clamps() {
    let config = LinkConfig {
        read_timeout_secs: -1.0,
        ..Default::default()
    };
    assert_eq!(config.to_link_settings().read_timeout, Duration::ZERO);
}

#[test]
fn test_save_port_preserves_other_keys() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.toml");
    std::fs::write(
        &path,
        "[link]\nbaud_rate = 9600\n\n[output]\ndirectory = \"/roms\"\n\n[extra]\nkeep = true\n",
    )
    .unwrap();

    save_port_to(&path, Some("/dev/ttyACM0")).unwrap();
    let settings = Settings::load_from(&path).unwrap();
    assert_eq!(settings.link.port.as_deref(), Some("/dev/ttyACM0"));
    assert_eq!(settings.link.baud_rate, 9600);
    assert_eq!(settings.output.directory, Some(PathBuf::from("/roms")));
    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("keep = true"));
    assert!(!path.with_extension("toml.tmp").exists());

    save_port_to(&path, None).unwrap();
    let settings = Settings::load_from(&path).unwrap();
    assert_eq!(settings.link.port, None);
    assert_eq!(settings.link.baud_rate, 9600);
}

#[test]
fn test_save_port_creates_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("settings.toml");
    save_port_to(&path, Some("COM3")).unwrap();
    let settings = Settings::load_from(&path).unwrap();
    assert_eq!(settings.link.port.as_deref(), Some("COM3"));
}

#[test]
fn test_save_port_refuses_malformed_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.toml");
    let original = "[link]\nbaud_rate = 9600\n[output]\ndirectory = \"/roms\"\nbroken = \n";
    std::fs::write(&path, original).unwrap();

    let err = save_port_to(&path, Some("COM9")).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    assert!(!path.with_extension("toml.tmp").exists());
}

#[test]
fn test_save_port_refuses_mistyped_settings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.toml");
    let original = "[link]\nbaud_rate = \"fast\"\n";
    std::fs::write(&path, original).unwrap();

    let err = save_port_to(&path, Some("COM9")).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn test_link_must_be_a_table() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.toml");
    std::fs::write(&path, "link = 3\n").unwrap();

    let mut file = SettingsFile::open(&path).unwrap();
    assert_eq!(
        file.set_port(Some("COM9")).unwrap_err().kind(),
        io::ErrorKind::InvalidData
    );
}

#[test]
fn test_settings_file_round_trip_keeps_unknown_sections() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.toml");
    std::fs::write(&path, "[gui]\ntheme = \"dark\"\n").unwrap();

    let mut file = SettingsFile::open(&path).unwrap();
    assert_eq!(file.path(), path.as_path());
    assert_eq!(file.settings().unwrap(), Settings::default());
    file.set_port(Some("/dev/ttyUSB1")).unwrap();
    file.save().unwrap();

    let reopened = SettingsFile::open(&path).unwrap();
    let pretty = reopened.to_pretty_string().unwrap();
    assert!(pretty.contains("theme = \"dark\""), "{pretty}");
    assert_eq!(
        reopened.settings().unwrap().link.port.as_deref(),
        Some("/dev/ttyUSB1")
    );
}
