//! Parashari natal chart engine.
//!
//! Birth date, time and place go in; a sidereal (Lahiri) chart report
//! comes out: lagna, the nine grahas with rasi, nakshatra, pada, navamsa,
//! whole-sign house, aspects and a heuristic strength, plus panchangam,
//! dasha, narrative interpretation and remedies.
//!
//! Astronomy is delegated to an [`Ephemeris`] backend. `SwissEph` wraps
//! the Swiss Ephemeris behind the `swisseph` feature; [`FixedEphemeris`]
//! returns canned positions for tests and offline use.
//!
//! The `lagna-server` binary has no backend in a default build and exits at
//! startup. Build it with `--features swisseph` plus `SWISSEPH_SRC` or
//! `SWISSEPH_LIB_DIR` to serve real charts.
//!
//! ```
//! use chrono::Utc;
//! use lagna_core::{calculate_report, BirthDetails, FixedEphemeris, ReportSettings};
//!
//! let birth = BirthDetails::parse("2000-01-01", "12:00", 0.0, 0.0).unwrap();
//! let report = calculate_report(&FixedEphemeris::new(), &birth, &ReportSettings::default(), Utc::now()).unwrap();
//! assert_eq!(report.chart.planets.len(), 9);
//! ```

pub mod chart;
pub mod config;
pub mod dasha;
pub mod ephemeris;
pub mod error;
pub mod interpretation;
pub mod panchang;
pub mod report;
pub mod strength;
pub mod time;
pub mod zodiac;

#[cfg(feature = "swisseph")]
pub mod swisseph;

#[cfg(feature = "http-server")]
pub mod http;

pub use chart::ChartPoint;
pub use config::{ConfigError, EphemerisConfig, ServiceConfig};
pub use dasha::{DashaMode, DashaSummary};
pub use ephemeris::{Ephemeris, FixedEphemeris, HouseCusps, HouseSystem};
pub use error::{ChartError, ChartResult, EphemerisError};
pub use report::{calculate_lagna, calculate_report, BirthDetails, ChartReport, LagnaSummary, Location, ReportSettings};
pub use time::{BirthMoment, JulianDay, UtcOffset};
pub use zodiac::{CelestialBody, Nakshatra, ZodiacSign};

#[cfg(feature = "swisseph")]
pub use swisseph::SwissEph;
