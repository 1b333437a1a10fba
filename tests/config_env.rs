//! Configuration layering: file, then process environment.

mod support;

use std::io::Write;

use lagna_core::{ConfigError, DashaMode, ServiceConfig};

use support::with_scoped_env;

#[test]
fn load_without_file_uses_defaults() {
    let config = with_scoped_env(&[("HOST", None), ("PORT", None), ("LAGNA_UTC_OFFSET", None)], || {
        ServiceConfig::load(None).unwrap()
    });
    assert_eq!(config, ServiceConfig::default());
}

#[test]
fn environment_wins_over_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "port = 9000\nutc_offset_hours = 0.0\ndasha_mode = \"vimshottari\"").unwrap();

    let config = with_scoped_env(&[("HOST", None), ("PORT", Some("9500")), ("LAGNA_UTC_OFFSET", Some("5.75"))], || {
        ServiceConfig::load(Some(file.path())).unwrap()
    });

    assert_eq!(config.port, 9500);
    assert_eq!(config.utc_offset_hours, 5.75);
    assert_eq!(config.dasha_mode, DashaMode::Vimshottari);
    config.validate().unwrap();
}

#[test]
fn unparseable_environment_value_fails_loading() {
    let result = with_scoped_env(&[("PORT", None), ("LAGNA_UTC_OFFSET", Some("IST"))], || ServiceConfig::load(None));
    assert!(matches!(result, Err(ConfigError::Env { key: "LAGNA_UTC_OFFSET", .. })));
}
