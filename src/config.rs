//! Service configuration.
//!
//! Values come from an optional TOML file, then from environment
//! variables (`HOST`, `PORT`, `LAGNA_UTC_OFFSET`), then from command-line
//! flags applied by the server binary. `validate` runs last.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dasha::DashaMode;
use crate::ephemeris::HouseSystem;
use crate::report::ReportSettings;
use crate::time::{UtcOffset, IST_OFFSET_HOURS};

pub const ENV_HOST: &str = "HOST";
pub const ENV_PORT: &str = "PORT";
pub const ENV_UTC_OFFSET: &str = "LAGNA_UTC_OFFSET";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("environment variable {key} has invalid value {value:?}")]
    Env { key: &'static str, value: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EphemerisConfig {
    /// Directory holding the ephemeris data files. Unset selects the
    /// built-in analytical theory.
    pub path: Option<PathBuf>,
    pub house_system: HouseSystem,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    /// Offset of birth times from UT, in hours.
    pub utc_offset_hours: f64,
    pub oracle_timeout_ms: u64,
    pub dasha_mode: DashaMode,
    /// Used when `RUST_LOG` is unset.
    pub log_filter: String,
    pub ephemeris: EphemerisConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            host: "0.0.0.0".to_string(),
            port: 8000,
            utc_offset_hours: IST_OFFSET_HOURS,
            oracle_timeout_ms: 5_000,
            dasha_mode: DashaMode::default(),
            log_filter: "info,tower_http=debug".to_string(),
            ephemeris: EphemerisConfig::default(),
        }
    }
}

impl ServiceConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// File (or defaults) with environment overrides applied.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(ENV_HOST) {
            self.host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.port = port.trim().parse().map_err(|_| ConfigError::Env {
                key: ENV_PORT,
                value: port.clone(),
            })?;
        }
        if let Some(offset) = lookup(ENV_UTC_OFFSET) {
            self.utc_offset_hours = offset.trim().parse().map_err(|_| ConfigError::Env {
                key: ENV_UTC_OFFSET,
                value: offset.clone(),
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Invalid("host must not be empty".to_string()));
        }
        if self.oracle_timeout_ms == 0 {
            return Err(ConfigError::Invalid("oracle_timeout_ms must be positive".to_string()));
        }
        self.utc_offset()?;
        Ok(())
    }

    pub fn utc_offset(&self) -> Result<UtcOffset, ConfigError> {
        UtcOffset::from_hours(self.utc_offset_hours).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn oracle_timeout(&self) -> Duration {
        Duration::from_millis(self.oracle_timeout_ms)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn report_settings(&self) -> Result<ReportSettings, ConfigError> {
        Ok(ReportSettings {
            utc_offset: self.utc_offset()?,
            dasha_mode: self.dasha_mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_valid() {
        let config = ServiceConfig::default();
        config.validate().unwrap();
        assert_eq!(config.utc_offset().unwrap(), UtcOffset::IST);
        assert_eq!(config.dasha_mode, DashaMode::Stub);
        assert_eq!(config.ephemeris.house_system, HouseSystem::Placidus);
        assert_eq!(config.bind_address(), "0.0.0.0:8000");
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
port = 9100
dasha_mode = "vimshottari"

[ephemeris]
path = "/usr/share/ephe"
house_system = "whole_sign"
"#
        )
        .unwrap();

        let config = ServiceConfig::from_file(file.path()).unwrap();
        assert_eq!(config.port, 9100);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.dasha_mode, DashaMode::Vimshottari);
        assert_eq!(config.ephemeris.path, Some(PathBuf::from("/usr/share/ephe")));
        assert_eq!(config.ephemeris.house_system, HouseSystem::WholeSign);
        assert_eq!(config.oracle_timeout_ms, 5_000);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = \"not a number\"").unwrap();
        assert!(matches!(ServiceConfig::from_file(file.path()), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(matches!(ServiceConfig::from_file(&missing), Err(ConfigError::Read { .. })));
    }

    #[test]
    fn environment_overrides_file_values() {
        let mut config = ServiceConfig::default();
        config
            .apply_env(env(&[("HOST", "127.0.0.1"), ("PORT", "8080"), ("LAGNA_UTC_OFFSET", "-4")]))
            .unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.utc_offset_hours, -4.0);
    }

    #[test]
    fn bad_environment_values_are_reported() {
        let mut config = ServiceConfig::default();
        let err = config.apply_env(env(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::Env { key: "PORT", .. }));
    }

    #[test]
    fn validation_rejects_out_of_range_values() {
        let config = ServiceConfig {
            utc_offset_hours: 20.0,
            ..ServiceConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = ServiceConfig {
            oracle_timeout_ms: 0,
            ..ServiceConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
