//! Ephemeris capability and the tropical → sidereal conversion.
//!
//! The pipeline never computes astronomy itself. It asks an [`Ephemeris`]
//! for tropical positions and the Lahiri ayanamsa and derives everything
//! else from those numbers.

use serde::{Deserialize, Serialize};

use crate::error::EphemerisError;
use crate::time::{self, JulianDay};
use crate::zodiac::CelestialBody;

/// House division requested from the backend.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HouseSystem {
    #[default]
    Placidus,
    Koch,
    Porphyry,
    Equal,
    WholeSign,
}

impl HouseSystem {
    pub fn name(self) -> &'static str {
        match self {
            HouseSystem::Placidus => "Placidus",
            HouseSystem::Koch => "Koch",
            HouseSystem::Porphyry => "Porphyry",
            HouseSystem::Equal => "Equal",
            HouseSystem::WholeSign => "Whole Sign",
        }
    }
}

/// Tropical ascendant and house cusps, cusp 1 first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HouseCusps {
    pub ascendant: f64,
    pub cusps: [f64; 12],
}

/// Source of astronomical positions.
///
/// Implementations must be safe to call from several request threads; a
/// backend wrapping a non-reentrant library serializes internally.
/// `body_longitude` is only asked for Sun through Rahu (mean node); Ketu is
/// derived by the caller.
pub trait Ephemeris: Send + Sync {
    fn name(&self) -> &str;

    /// Library version string, when the backend wraps one.
    fn version(&self) -> Option<&str> {
        None
    }

    fn house_system(&self) -> HouseSystem {
        HouseSystem::Placidus
    }

    fn julian_day(&self, year: i32, month: u32, day: u32, hour: f64) -> Result<JulianDay, EphemerisError> {
        Ok(time::julian_day(year, month, day, hour))
    }

    fn houses(&self, julian_day: JulianDay, latitude: f64, longitude: f64) -> Result<HouseCusps, EphemerisError>;

    /// Tropical ecliptic longitude in degrees.
    fn body_longitude(&self, julian_day: JulianDay, body: CelestialBody) -> Result<f64, EphemerisError>;

    /// Lahiri ayanamsa in degrees.
    fn ayanamsa(&self, julian_day: JulianDay) -> Result<f64, EphemerisError>;
}

/// Reduce any finite angle into `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let r = degrees.rem_euclid(360.0);
    // rem_euclid rounds tiny negatives up to exactly 360.0
    if r >= 360.0 {
        0.0
    } else {
        r
    }
}

pub fn ensure_finite(quantity: &'static str, value: f64) -> Result<f64, EphemerisError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EphemerisError::NonFinite { quantity, value })
    }
}

pub fn to_sidereal(tropical: f64, ayanamsa: f64) -> Result<f64, EphemerisError> {
    let tropical = ensure_finite("tropical longitude", tropical)?;
    let ayanamsa = ensure_finite("ayanamsa", ayanamsa)?;
    Ok(normalize_degrees(tropical - ayanamsa))
}

/// Tropical longitude of any of the nine bodies, deriving Ketu from Rahu.
pub fn tropical_longitude(
    ephemeris: &dyn Ephemeris,
    julian_day: JulianDay,
    body: CelestialBody,
) -> Result<f64, EphemerisError> {
    match body {
        CelestialBody::Ketu => {
            let rahu = ephemeris.body_longitude(julian_day, CelestialBody::Rahu)?;
            Ok(normalize_degrees(ensure_finite("Rahu longitude", rahu)? + 180.0))
        }
        _ => ensure_finite("body longitude", ephemeris.body_longitude(julian_day, body)?),
    }
}

// ---------------------------
// ## Fixed ephemeris
// ---------------------------

/// Deterministic in-memory ephemeris returning the same positions for any
/// instant. Used by tests and offline demos.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedEphemeris {
    pub ascendant: f64,
    pub cusps: [f64; 12],
    /// Sun through Rahu, in catalog order.
    pub longitudes: [f64; 8],
    pub ayanamsa: f64,
}

impl Default for FixedEphemeris {
    /// Positions close to the real sky at 2000-01-01 12:00 UT.
    fn default() -> Self {
        let ascendant = 204.0;
        FixedEphemeris {
            ascendant,
            cusps: equal_cusps(ascendant),
            longitudes: [280.37, 223.32, 271.89, 241.57, 327.96, 25.25, 40.40, 125.04],
            ayanamsa: 23.853,
        }
    }
}

impl FixedEphemeris {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ascendant(mut self, ascendant: f64) -> Self {
        self.ascendant = ascendant;
        self.cusps = equal_cusps(ascendant);
        self
    }

    pub fn with_ayanamsa(mut self, ayanamsa: f64) -> Self {
        self.ayanamsa = ayanamsa;
        self
    }

    /// Override a body's tropical longitude. Setting Ketu moves Rahu.
    pub fn with_body(mut self, body: CelestialBody, longitude: f64) -> Self {
        match body {
            CelestialBody::Ketu => self.longitudes[CelestialBody::Rahu.id() as usize] = normalize_degrees(longitude + 180.0),
            _ => self.longitudes[body.id() as usize] = longitude,
        }
        self
    }
}

fn equal_cusps(ascendant: f64) -> [f64; 12] {
    let mut cusps = [0.0; 12];
    for (i, cusp) in cusps.iter_mut().enumerate() {
        *cusp = normalize_degrees(ascendant + 30.0 * i as f64);
    }
    cusps
}

impl Ephemeris for FixedEphemeris {
    fn name(&self) -> &str {
        "fixed"
    }

    fn houses(&self, _julian_day: JulianDay, _latitude: f64, _longitude: f64) -> Result<HouseCusps, EphemerisError> {
        Ok(HouseCusps {
            ascendant: self.ascendant,
            cusps: self.cusps,
        })
    }

    fn body_longitude(&self, _julian_day: JulianDay, body: CelestialBody) -> Result<f64, EphemerisError> {
        self.longitudes
            .get(body.id() as usize)
            .copied()
            .ok_or_else(|| EphemerisError::Unavailable(format!("{body} is derived, not tabulated")))
    }

    fn ayanamsa(&self, _julian_day: JulianDay) -> Result<f64, EphemerisError> {
        Ok(self.ayanamsa)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn normalization_stays_in_range() {
        assert_relative_eq!(normalize_degrees(-30.0), 330.0);
        assert_relative_eq!(normalize_degrees(725.0), 5.0);
        assert_eq!(normalize_degrees(-1e-17), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
    }

    #[test]
    fn sidereal_subtracts_ayanamsa() {
        assert_relative_eq!(to_sidereal(280.37, 23.853).unwrap(), 256.517, epsilon = 1e-9);
        assert_relative_eq!(to_sidereal(10.0, 23.853).unwrap(), 346.147, epsilon = 1e-9);
    }

    #[test]
    fn sidereal_rejects_non_finite() {
        assert!(matches!(to_sidereal(f64::NAN, 23.0), Err(EphemerisError::NonFinite { .. })));
        assert!(matches!(to_sidereal(10.0, f64::INFINITY), Err(EphemerisError::NonFinite { .. })));
    }

    #[test]
    fn ketu_opposes_rahu() {
        let eph = FixedEphemeris::new().with_body(CelestialBody::Rahu, 300.0);
        assert_relative_eq!(tropical_longitude(&eph, 0.0, CelestialBody::Ketu).unwrap(), 120.0);

        let eph = FixedEphemeris::new().with_body(CelestialBody::Ketu, 10.0);
        assert_relative_eq!(tropical_longitude(&eph, 0.0, CelestialBody::Rahu).unwrap(), 190.0);
    }

    #[test]
    fn fixed_cusps_follow_ascendant() {
        let eph = FixedEphemeris::new().with_ascendant(350.0);
        let houses = eph.houses(0.0, 0.0, 0.0).unwrap();
        assert_relative_eq!(houses.cusps[0], 350.0);
        assert_relative_eq!(houses.cusps[1], 20.0);
        assert_relative_eq!(houses.cusps[11], 320.0);
    }

    #[test]
    fn default_julian_day_uses_gregorian_algorithm() {
        let eph = FixedEphemeris::new();
        assert_relative_eq!(eph.julian_day(2000, 1, 1, 12.0).unwrap(), 2_451_545.0);
    }
}
