#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use lagna_core::ephemeris::HouseCusps;
use lagna_core::{BirthDetails, CelestialBody, Ephemeris, EphemerisError, FixedEphemeris, JulianDay};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Reference birth used across the suites: 2000-01-01 12:00 at (0, 0).
pub fn reference_birth() -> BirthDetails {
    BirthDetails::parse("2000-01-01", "12:00", 0.0, 0.0).expect("reference birth parses")
}

pub fn reference_sky() -> FixedEphemeris {
    FixedEphemeris::new()
}

pub fn calculated_on() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap()
}

/// Backend whose every call fails.
pub struct BrokenEphemeris;

impl Ephemeris for BrokenEphemeris {
    fn name(&self) -> &str {
        "broken"
    }

    fn houses(&self, _jd: JulianDay, _lat: f64, _lon: f64) -> Result<HouseCusps, EphemerisError> {
        Err(EphemerisError::Calculation {
            operation: "houses",
            code: -1,
            message: "ephemeris file not found".to_string(),
        })
    }

    fn body_longitude(&self, _jd: JulianDay, body: CelestialBody) -> Result<f64, EphemerisError> {
        Err(EphemerisError::Unavailable(format!("{body} not tabulated")))
    }

    fn ayanamsa(&self, _jd: JulianDay) -> Result<f64, EphemerisError> {
        Ok(23.85)
    }
}

/// Backend that answers correctly after a delay.
pub struct SlowEphemeris {
    pub inner: FixedEphemeris,
    pub delay: Duration,
}

impl Ephemeris for SlowEphemeris {
    fn name(&self) -> &str {
        "slow"
    }

    fn version(&self) -> Option<&str> {
        Some("slow-1.0")
    }

    fn houses(&self, jd: JulianDay, lat: f64, lon: f64) -> Result<HouseCusps, EphemerisError> {
        std::thread::sleep(self.delay);
        self.inner.houses(jd, lat, lon)
    }

    fn body_longitude(&self, jd: JulianDay, body: CelestialBody) -> Result<f64, EphemerisError> {
        self.inner.body_longitude(jd, body)
    }

    fn ayanamsa(&self, jd: JulianDay) -> Result<f64, EphemerisError> {
        self.inner.ayanamsa(jd)
    }
}

/// Runs `f` with environment variables temporarily modified.
///
/// Restores the previous values on unwind and serializes access to the
/// process environment across parallel tests.
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}
