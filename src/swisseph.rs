//! Swiss Ephemeris backend.
//!
//! The C library keeps its configuration (ephemeris path, sidereal mode,
//! cached file handles) in process globals, so every call goes through
//! `SWE_LOCK`.

use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_double, c_int};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info};

use crate::config::EphemerisConfig;
use crate::ephemeris::{Ephemeris, HouseCusps, HouseSystem};
use crate::error::EphemerisError;
use crate::time::JulianDay;
use crate::zodiac::CelestialBody;

// ---------------------------
// ## FFI Bindings
// ---------------------------

mod bindings {
    use super::*;

    extern "C" {
        pub fn swe_set_ephe_path(path: *const c_char);
        pub fn swe_set_sid_mode(sid_mode: c_int, t0: c_double, ayan_t0: c_double);
        pub fn swe_close();
        pub fn swe_version(s: *mut c_char) -> *const c_char;

        pub fn swe_julday(year: c_int, month: c_int, day: c_int, hour: c_double, gregflag: c_int) -> c_double;

        pub fn swe_calc_ut(
            tjd_ut: c_double,
            ipl: c_int,
            iflag: c_int,
            xx: *mut c_double,
            serr: *mut c_char,
        ) -> c_int;

        pub fn swe_houses(
            tjd_ut: c_double,
            geolat: c_double,
            geolon: c_double,
            hsys: c_int,
            cusps: *mut c_double,
            ascmc: *mut c_double,
        ) -> c_int;

        pub fn swe_get_ayanamsa_ut(tjd_ut: c_double) -> c_double;
    }
}

use bindings::*;

const SE_GREG_CAL: c_int = 1;
const SE_SIDM_LAHIRI: c_int = 1;
const SEFLG_SWIEPH: c_int = 2;
const SE_MEAN_NODE: c_int = 10;
const SE_ERR: c_int = -1;
const MAXCH: usize = 256;

static SWE_LOCK: Mutex<()> = Mutex::new(());

fn lock() -> Result<MutexGuard<'static, ()>, EphemerisError> {
    SWE_LOCK
        .lock()
        .map_err(|_| EphemerisError::Unavailable("swiss ephemeris lock poisoned".to_string()))
}

fn planet_code(body: CelestialBody) -> Option<c_int> {
    match body {
        CelestialBody::Sun => Some(0),
        CelestialBody::Moon => Some(1),
        CelestialBody::Mercury => Some(2),
        CelestialBody::Venus => Some(3),
        CelestialBody::Mars => Some(4),
        CelestialBody::Jupiter => Some(5),
        CelestialBody::Saturn => Some(6),
        CelestialBody::Rahu => Some(SE_MEAN_NODE),
        CelestialBody::Ketu => None,
    }
}

fn house_code(system: HouseSystem) -> c_int {
    let code = match system {
        HouseSystem::Placidus => b'P',
        HouseSystem::Koch => b'K',
        HouseSystem::Porphyry => b'O',
        HouseSystem::Equal => b'E',
        HouseSystem::WholeSign => b'W',
    };
    code as c_int
}

fn error_text(buffer: &[c_char; MAXCH]) -> String {
    unsafe { CStr::from_ptr(buffer.as_ptr()) }
        .to_string_lossy()
        .trim()
        .to_string()
}

// ---------------------------
// ## SwissEph
// ---------------------------

pub struct SwissEph {
    house_system: HouseSystem,
    version: String,
}

impl SwissEph {
    /// Point the library at the configured data files (Moshier's analytical
    /// theory is used when none are given) and select Lahiri.
    pub fn new(config: &EphemerisConfig) -> Result<Self, EphemerisError> {
        let _guard = lock()?;

        let c_path = match &config.path {
            Some(path) => Some(CString::new(path.to_string_lossy().into_owned()).map_err(|_| {
                EphemerisError::Unavailable(format!("ephemeris path {} contains a NUL byte", path.display()))
            })?),
            None => None,
        };

        let mut version: [c_char; MAXCH] = [0; MAXCH];
        unsafe {
            swe_set_ephe_path(c_path.as_ref().map_or(std::ptr::null(), |p| p.as_ptr()));
            swe_set_sid_mode(SE_SIDM_LAHIRI, 0.0, 0.0);
            swe_version(version.as_mut_ptr());
        }
        let version = error_text(&version);

        info!(
            version = %version,
            path = ?config.path,
            house_system = config.house_system.name(),
            "swiss ephemeris initialised"
        );

        Ok(SwissEph {
            house_system: config.house_system,
            version,
        })
    }
}

impl Ephemeris for SwissEph {
    fn name(&self) -> &str {
        "swiss-ephemeris"
    }

    fn version(&self) -> Option<&str> {
        Some(&self.version)
    }

    fn house_system(&self) -> HouseSystem {
        self.house_system
    }

    fn julian_day(&self, year: i32, month: u32, day: u32, hour: f64) -> Result<JulianDay, EphemerisError> {
        let _guard = lock()?;
        Ok(unsafe { swe_julday(year, month as c_int, day as c_int, hour, SE_GREG_CAL) })
    }

    fn houses(&self, julian_day: JulianDay, latitude: f64, longitude: f64) -> Result<HouseCusps, EphemerisError> {
        let mut cusps: [c_double; 13] = [0.0; 13];
        let mut ascmc: [c_double; 10] = [0.0; 10];

        let code = {
            let _guard = lock()?;
            unsafe {
                swe_houses(
                    julian_day,
                    latitude,
                    longitude,
                    house_code(self.house_system),
                    cusps.as_mut_ptr(),
                    ascmc.as_mut_ptr(),
                )
            }
        };

        if code == SE_ERR {
            return Err(EphemerisError::Calculation {
                operation: "swe_houses",
                code,
                message: format!("no {} houses at latitude {latitude}", self.house_system.name()),
            });
        }

        let mut result = HouseCusps {
            ascendant: ascmc[0],
            cusps: [0.0; 12],
        };
        result.cusps.copy_from_slice(&cusps[1..13]);
        debug!(julian_day, ascendant = result.ascendant, "houses computed");
        Ok(result)
    }

    fn body_longitude(&self, julian_day: JulianDay, body: CelestialBody) -> Result<f64, EphemerisError> {
        let ipl = planet_code(body)
            .ok_or_else(|| EphemerisError::Unavailable(format!("{body} is derived from Rahu")))?;

        let mut results: [c_double; 6] = [0.0; 6];
        let mut serr: [c_char; MAXCH] = [0; MAXCH];

        let code = {
            let _guard = lock()?;
            unsafe { swe_calc_ut(julian_day, ipl, SEFLG_SWIEPH, results.as_mut_ptr(), serr.as_mut_ptr()) }
        };

        if code < 0 {
            return Err(EphemerisError::Calculation {
                operation: "swe_calc_ut",
                code,
                message: error_text(&serr),
            });
        }
        Ok(results[0])
    }

    fn ayanamsa(&self, julian_day: JulianDay) -> Result<f64, EphemerisError> {
        let _guard = lock()?;
        let value = unsafe {
            swe_set_sid_mode(SE_SIDM_LAHIRI, 0.0, 0.0);
            swe_get_ayanamsa_ut(julian_day)
        };
        Ok(value)
    }
}

impl Drop for SwissEph {
    fn drop(&mut self) {
        if let Ok(_guard) = lock() {
            unsafe {
                swe_close();
            }
        }
    }
}
