//! Shared state handed to every handler.

use std::sync::Arc;

use crate::config::{ConfigError, ServiceConfig};
use crate::ephemeris::Ephemeris;
use crate::report::ReportSettings;

#[derive(Clone)]
pub struct AppState {
    pub ephemeris: Arc<dyn Ephemeris>,
    pub config: Arc<ServiceConfig>,
    pub settings: ReportSettings,
}

impl AppState {
    pub fn new(ephemeris: Arc<dyn Ephemeris>, config: ServiceConfig) -> Result<Self, ConfigError> {
        let settings = config.report_settings()?;
        Ok(Self {
            ephemeris,
            config: Arc::new(config),
            settings,
        })
    }
}
