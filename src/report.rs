//! Report assembly: birth details in, complete chart report out.
//!
//! Each step feeds the next; the first failure aborts the whole report.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use tracing::{debug, info, info_span};

use crate::chart::{aspects_of, house_of, round2, ChartPoint};
use crate::dasha::{dasha, DashaMode, DashaSummary};
use crate::ephemeris::{ensure_finite, to_sidereal, tropical_longitude, Ephemeris};
use crate::error::{ChartError, ChartResult};
use crate::interpretation::{interpretations, recommendations, summarize, Interpretation, Recommendation, StrengthEntry};
use crate::panchang::{panchang, Panchang};
use crate::strength::strength_of;
use crate::time::{ensure_supported_year, parse_birth_date, parse_birth_time, BirthMoment, UtcOffset};
use crate::zodiac::{CelestialBody, ZodiacSign};

pub const ENGINE_NAME: &str = "LagnaGuru Parāśari Engine";
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AYANAMSA_NAME: &str = "Lahiri";

// ---------------------------
// ## Inputs
// ---------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> ChartResult<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(ChartError::invalid(format!("latitude {latitude} outside [-90, 90]")));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(ChartError::invalid(format!("longitude {longitude} outside [-180, 180]")));
        }
        Ok(Location { latitude, longitude })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BirthDetails {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: Location,
}

impl BirthDetails {
    pub fn parse(dob: &str, tob: &str, latitude: f64, longitude: f64) -> ChartResult<Self> {
        Ok(BirthDetails {
            date: parse_birth_date(dob)?,
            time: parse_birth_time(tob)?,
            location: Location::new(latitude, longitude)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ReportSettings {
    pub utc_offset: UtcOffset,
    pub dasha_mode: DashaMode,
}

// ---------------------------
// ## Report shape
// ---------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportMeta {
    pub engine: &'static str,
    pub version: &'static str,
    pub dob: String,
    pub tob: String,
    pub latitude: f64,
    pub longitude: f64,
    pub utc_offset_hours: f64,
    pub julian_day: f64,
    pub ayanamsa: f64,
    pub ayanamsa_name: &'static str,
    pub house_system: &'static str,
    pub ephemeris: String,
    pub calculated_on: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LagnaPlacement {
    pub longitude: f64,
    pub rasi: ZodiacSign,
    pub rasi_local: &'static str,
    pub degree: f64,
    pub nakshatra: &'static str,
    pub pada: u8,
    pub navamsa: ZodiacSign,
    pub lord: CelestialBody,
}

impl From<ChartPoint> for LagnaPlacement {
    fn from(point: ChartPoint) -> Self {
        LagnaPlacement {
            longitude: point.longitude,
            rasi: point.sign,
            rasi_local: point.sign.local_name(),
            degree: point.degree,
            nakshatra: point.nakshatra.name(),
            pada: point.pada,
            navamsa: point.navamsa,
            lord: point.sign.lord(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanetPlacement {
    pub id: u8,
    #[serde(rename = "name")]
    pub body: CelestialBody,
    pub longitude: f64,
    pub rasi: ZodiacSign,
    pub rasi_local: &'static str,
    pub degree: f64,
    pub nakshatra: &'static str,
    pub pada: u8,
    pub navamsa: ZodiacSign,
    pub house: u8,
    /// Sign indices reached by the body's aspects.
    pub aspects: Vec<usize>,
    /// Absent for the lunar nodes.
    pub strength: Option<f64>,
}

/// Whole-sign house with the backend's cusp for reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HouseEntry {
    pub house: u8,
    pub rasi: ZodiacSign,
    pub rasi_local: &'static str,
    pub lord: CelestialBody,
    pub cusp: f64,
    pub occupants: Vec<CelestialBody>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub lagna: LagnaPlacement,
    pub planets: Vec<PlanetPlacement>,
    pub houses: Vec<HouseEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartReport {
    pub meta: ReportMeta,
    pub chart: Chart,
    pub interpretations: Vec<Interpretation>,
    pub summary_report: String,
    pub dasha: DashaSummary,
    pub panchang: Panchang,
    pub strengths: Vec<StrengthEntry>,
    pub recommendations: Vec<Recommendation>,
}

/// Body of the minimal `/calculate` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LagnaSummary {
    pub lagna: ZodiacSign,
    pub degree: f64,
    pub nakshatra: &'static str,
    pub pada: u8,
}

// ---------------------------
// ## Pipeline
// ---------------------------

pub fn calculate_report(
    ephemeris: &dyn Ephemeris,
    birth: &BirthDetails,
    settings: &ReportSettings,
    calculated_on: DateTime<Utc>,
) -> ChartResult<ChartReport> {
    let span = info_span!("calculate_report", dob = %birth.date, tob = %birth.time, ephemeris = ephemeris.name());
    let _enter = span.enter();

    let moment = BirthMoment::from_local(birth.date, birth.time, settings.utc_offset)?;
    let jd = moment.julian_day;
    let Location { latitude, longitude } = birth.location;

    let ayanamsa = ensure_finite("ayanamsa", ephemeris.ayanamsa(jd)?)?;
    let cusps = ephemeris.houses(jd, latitude, longitude)?;
    let ascendant = ChartPoint::from_longitude(to_sidereal(cusps.ascendant, ayanamsa)?)?;
    debug!(julian_day = jd, ayanamsa, ascendant = ascendant.longitude, "ascendant resolved");

    let mut tropical = [0.0; 9];
    let mut planets = Vec::with_capacity(CelestialBody::ALL.len());
    for body in CelestialBody::iter() {
        let longitude = tropical_longitude(ephemeris, jd, body)?;
        tropical[body.id() as usize] = longitude;
        planets.push(place(body, to_sidereal(longitude, ayanamsa)?, ascendant.sign)?);
    }

    let mut houses = Vec::with_capacity(12);
    for (i, &cusp) in cusps.cusps.iter().enumerate() {
        let rasi = ascendant.sign.offset(i);
        houses.push(HouseEntry {
            house: i as u8 + 1,
            rasi,
            rasi_local: rasi.local_name(),
            lord: rasi.lord(),
            cusp: round2(to_sidereal(cusp, ayanamsa)?),
            occupants: planets.iter().filter(|p| p.rasi == rasi).map(|p| p.body).collect(),
        });
    }

    let panchang = panchang(
        jd,
        tropical[CelestialBody::Sun.id() as usize],
        tropical[CelestialBody::Moon.id() as usize],
    )?;

    let strengths: Vec<StrengthEntry> = planets
        .iter()
        .filter_map(|p| p.strength.map(|score| StrengthEntry { planet: p.body, score }))
        .collect();

    let lagna = LagnaPlacement::from(ascendant);
    let readings = interpretations(&planets);
    let summary_report = summarize(&lagna, &planets, &readings, &strengths)?;
    let recommendations = recommendations(&strengths);

    let moon = planets
        .iter()
        .find(|p| p.body == CelestialBody::Moon)
        .ok_or_else(|| ChartError::invariant("Moon missing from chart"))?;
    let dasha = dasha(settings.dasha_mode, moon.longitude, moment.utc, calculated_on)?;

    info!(lagna = %lagna.rasi, tithi = panchang.tithi, dasha = dasha.method, "report assembled");

    Ok(ChartReport {
        meta: ReportMeta {
            engine: ENGINE_NAME,
            version: ENGINE_VERSION,
            dob: birth.date.format("%Y-%m-%d").to_string(),
            tob: birth.time.format("%H:%M:%S").to_string(),
            latitude,
            longitude,
            utc_offset_hours: settings.utc_offset.hours(),
            julian_day: jd,
            ayanamsa,
            ayanamsa_name: AYANAMSA_NAME,
            house_system: ephemeris.house_system().name(),
            ephemeris: ephemeris.name().to_string(),
            calculated_on,
        },
        chart: Chart {
            lagna,
            planets,
            houses,
        },
        interpretations: readings,
        summary_report,
        dasha,
        panchang,
        strengths,
        recommendations,
    })
}

fn place(body: CelestialBody, sidereal: f64, ascendant: ZodiacSign) -> ChartResult<PlanetPlacement> {
    let point = ChartPoint::from_longitude(sidereal)?;
    let house = house_of(ascendant, point.sign);
    if !(1..=12).contains(&house) {
        return Err(ChartError::invariant(format!("{body} placed in house {house}")));
    }

    Ok(PlanetPlacement {
        id: body.id(),
        body,
        longitude: point.longitude,
        rasi: point.sign,
        rasi_local: point.sign.local_name(),
        degree: point.degree,
        nakshatra: point.nakshatra.name(),
        pada: point.pada,
        navamsa: point.navamsa,
        house,
        aspects: aspects_of(point.sign, body).iter().map(|s| s.index()).collect(),
        strength: (!body.is_node()).then(|| strength_of(body, point.sign, point.degree)),
    })
}

/// Sidereal ascendant for a date and UT hour.
pub fn calculate_lagna(
    ephemeris: &dyn Ephemeris,
    year: i32,
    month: u32,
    day: u32,
    hour: f64,
    location: Location,
) -> ChartResult<LagnaSummary> {
    if NaiveDate::from_ymd_opt(year, month, day).is_none() {
        return Err(ChartError::invalid(format!("{year}-{month}-{day} is not a calendar date")));
    }
    ensure_supported_year(year)?;
    if !hour.is_finite() || !(0.0..24.0).contains(&hour) {
        return Err(ChartError::invalid(format!("hour {hour} outside [0, 24)")));
    }

    let jd = ephemeris.julian_day(year, month, day, hour)?;
    let cusps = ephemeris.houses(jd, location.latitude, location.longitude)?;
    let ayanamsa = ephemeris.ayanamsa(jd)?;
    let point = ChartPoint::from_longitude(to_sidereal(cusps.ascendant, ayanamsa)?)?;

    Ok(LagnaSummary {
        lagna: point.sign,
        degree: point.degree,
        nakshatra: point.nakshatra.name(),
        pada: point.pada,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::FixedEphemeris;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn location_bounds() {
        assert!(Location::new(90.0, -180.0).is_ok());
        assert!(matches!(Location::new(91.0, 0.0), Err(ChartError::InvalidInput(_))));
        assert!(matches!(Location::new(0.0, 180.5), Err(ChartError::InvalidInput(_))));
        assert!(matches!(Location::new(f64::NAN, 0.0), Err(ChartError::InvalidInput(_))));
    }

    #[test]
    fn lagna_from_fixed_sky() {
        // 204.0 - 23.853 = 180.147: Libra 0.15°, Chitra pada 3
        let eph = FixedEphemeris::new();
        let lagna = calculate_lagna(&eph, 2000, 1, 1, 12.0, Location::new(0.0, 0.0).unwrap()).unwrap();
        assert_eq!(lagna.lagna, ZodiacSign::Libra);
        assert_relative_eq!(lagna.degree, 0.15);
        assert_eq!(lagna.nakshatra, "Chitra");
        assert_eq!(lagna.pada, 3);
    }

    #[test]
    fn lagna_rejects_impossible_dates_and_hours() {
        let eph = FixedEphemeris::new();
        let here = Location::new(0.0, 0.0).unwrap();
        assert!(matches!(calculate_lagna(&eph, 2021, 2, 29, 1.0, here), Err(ChartError::InvalidInput(_))));
        assert!(matches!(calculate_lagna(&eph, 2021, 2, 1, 24.0, here), Err(ChartError::InvalidInput(_))));
        assert!(matches!(calculate_lagna(&eph, -9000, 1, 1, 0.0, here), Err(ChartError::InvalidInput(_))));
    }

    #[test]
    fn hand_built_birth_outside_supported_years_is_invalid_input() {
        let eph = FixedEphemeris::new();
        let birth = BirthDetails {
            date: NaiveDate::MIN,
            time: NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
            location: Location::new(0.0, 0.0).unwrap(),
        };
        let err = calculate_report(&eph, &birth, &ReportSettings::default(), now()).unwrap_err();
        assert!(matches!(err, ChartError::InvalidInput(_)));
    }

    #[test]
    fn houses_are_whole_sign_from_lagna() {
        let eph = FixedEphemeris::new();
        let birth = BirthDetails::parse("2000-01-01", "12:00", 0.0, 0.0).unwrap();
        let report = calculate_report(&eph, &birth, &ReportSettings::default(), now()).unwrap();

        assert_eq!(report.chart.houses.len(), 12);
        assert_eq!(report.chart.houses[0].rasi, ZodiacSign::Libra);
        assert_eq!(report.chart.houses[11].rasi, ZodiacSign::Virgo);
        let occupants: usize = report.chart.houses.iter().map(|h| h.occupants.len()).sum();
        assert_eq!(occupants, 9);
    }

    #[test]
    fn nodes_carry_no_strength() {
        let eph = FixedEphemeris::new();
        let birth = BirthDetails::parse("2000-01-01", "12:00", 0.0, 0.0).unwrap();
        let report = calculate_report(&eph, &birth, &ReportSettings::default(), now()).unwrap();

        assert_eq!(report.strengths.len(), 7);
        for planet in &report.chart.planets {
            assert_eq!(planet.strength.is_none(), planet.body.is_node(), "{}", planet.body);
        }
    }

    #[test]
    fn non_finite_oracle_output_aborts_the_report() {
        let eph = FixedEphemeris::new().with_body(CelestialBody::Mars, f64::NAN);
        let birth = BirthDetails::parse("2000-01-01", "12:00", 0.0, 0.0).unwrap();
        let err = calculate_report(&eph, &birth, &ReportSettings::default(), now()).unwrap_err();
        assert!(matches!(err, ChartError::Oracle(_)));
    }
}
