//! Planetary periods.
//!
//! Two modes are available. `Stub` reproduces the constant Venus/Sun
//! record earlier releases returned; `Vimshottari` runs the real 120-year
//! cycle from the Moon's sidereal nakshatra.

use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::chart::{nakshatra_of, round2};
use crate::error::{ChartError, ChartResult};
use crate::zodiac::{CelestialBody, NAKSHATRA_SPAN};

pub const CYCLE_YEARS: f64 = 120.0;
const DAYS_PER_YEAR: f64 = 365.25;

/// Cycle order starting from Ketu, with mahadasha lengths in years.
pub const VIMSHOTTARI: [(CelestialBody, f64); 9] = [
    (CelestialBody::Ketu, 7.0),
    (CelestialBody::Venus, 20.0),
    (CelestialBody::Sun, 6.0),
    (CelestialBody::Moon, 10.0),
    (CelestialBody::Mars, 7.0),
    (CelestialBody::Rahu, 18.0),
    (CelestialBody::Jupiter, 16.0),
    (CelestialBody::Saturn, 19.0),
    (CelestialBody::Mercury, 17.0),
];

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashaMode {
    #[default]
    Stub,
    Vimshottari,
}

impl DashaMode {
    pub fn method(self) -> &'static str {
        match self {
            DashaMode::Stub => "stub",
            DashaMode::Vimshottari => "vimshottari",
        }
    }
}

impl FromStr for DashaMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stub" => Ok(DashaMode::Stub),
            "vimshottari" => Ok(DashaMode::Vimshottari),
            other => Err(format!("unknown dasha mode {other:?} (expected stub or vimshottari)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashaPeriod {
    pub lord: CelestialBody,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub years: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashaSummary {
    pub method: &'static str,
    pub mahadasha: CelestialBody,
    pub antardasha: CelestialBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mahadasha_period: Option<DashaPeriod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub antardasha_period: Option<DashaPeriod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance_at_birth_years: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub timeline: Vec<DashaPeriod>,
}

pub fn years_of(lord: CelestialBody) -> f64 {
    VIMSHOTTARI
        .iter()
        .find(|(body, _)| *body == lord)
        .map_or(0.0, |&(_, years)| years)
}

fn position_of(lord: CelestialBody) -> usize {
    VIMSHOTTARI.iter().position(|(body, _)| *body == lord).unwrap_or(0)
}

fn years_to_duration(years: f64) -> Duration {
    Duration::seconds((years * DAYS_PER_YEAR * 86_400.0).round() as i64)
}

fn shift(at: DateTime<Utc>, years: f64) -> ChartResult<DateTime<Utc>> {
    at.checked_add_signed(years_to_duration(years))
        .ok_or_else(|| ChartError::invalid(format!("dasha period {years} years from {at} is not a representable date")))
}

pub fn dasha(
    mode: DashaMode,
    moon_sidereal: f64,
    birth: DateTime<Utc>,
    as_of: DateTime<Utc>,
) -> ChartResult<DashaSummary> {
    match mode {
        DashaMode::Stub => Ok(stub()),
        DashaMode::Vimshottari => vimshottari(moon_sidereal, birth, as_of),
    }
}

/// Constant record, independent of the chart.
pub fn stub() -> DashaSummary {
    DashaSummary {
        method: DashaMode::Stub.method(),
        mahadasha: CelestialBody::Venus,
        antardasha: CelestialBody::Sun,
        mahadasha_period: None,
        antardasha_period: None,
        balance_at_birth_years: None,
        timeline: Vec::new(),
    }
}

// ---------------------------
// ## Vimshottari
// ---------------------------

pub fn vimshottari(moon_sidereal: f64, birth: DateTime<Utc>, as_of: DateTime<Utc>) -> ChartResult<DashaSummary> {
    let nakshatra = nakshatra_of(moon_sidereal)?;
    let first_lord = nakshatra.lord();
    let first_years = years_of(first_lord);

    let elapsed_fraction = (moon_sidereal % NAKSHATRA_SPAN) / NAKSHATRA_SPAN;
    let balance = first_years * (1.0 - elapsed_fraction);

    // The running mahadasha began before birth; antardashas are laid out
    // over its full nominal span.
    let nominal_start = shift(birth, -first_years * elapsed_fraction)?;

    let mut timeline = Vec::with_capacity(VIMSHOTTARI.len());
    let mut nominal_starts = Vec::with_capacity(VIMSHOTTARI.len());
    let mut start = birth;
    let first = position_of(first_lord);
    for step in 0..VIMSHOTTARI.len() {
        let (lord, full_years) = VIMSHOTTARI[(first + step) % VIMSHOTTARI.len()];
        let (years, nominal) = if step == 0 {
            (balance, nominal_start)
        } else {
            (full_years, start)
        };
        let end = shift(start, years)?;
        timeline.push(DashaPeriod {
            lord,
            start,
            end,
            years: round2(years),
        });
        nominal_starts.push(nominal);
        start = end;
    }

    let (Some(head), Some(tail)) = (timeline.first(), timeline.last()) else {
        return Err(ChartError::invariant("empty vimshottari timeline"));
    };
    let last_instant = tail.end.checked_sub_signed(Duration::seconds(1)).unwrap_or(tail.end);
    let at = as_of.clamp(head.start, last_instant);

    let active = timeline
        .iter()
        .position(|p| at >= p.start && at < p.end)
        .unwrap_or(0);
    let maha = &timeline[active];
    let antar = antardasha_at(maha.lord, nominal_starts[active], at)?;

    Ok(DashaSummary {
        method: DashaMode::Vimshottari.method(),
        mahadasha: maha.lord,
        antardasha: antar.lord,
        mahadasha_period: Some(maha.clone()),
        antardasha_period: Some(antar),
        balance_at_birth_years: Some(round2(balance)),
        timeline,
    })
}

/// Sub-period of `maha_lord`'s mahadasha containing `at`. Each antardasha
/// lasts `maha_years * antar_years / 120`, starting with the maha lord.
fn antardasha_at(maha_lord: CelestialBody, nominal_start: DateTime<Utc>, at: DateTime<Utc>) -> ChartResult<DashaPeriod> {
    let maha_years = years_of(maha_lord);
    let first = position_of(maha_lord);

    let mut start = nominal_start;
    let mut last = None;
    for step in 0..VIMSHOTTARI.len() {
        let (lord, antar_years) = VIMSHOTTARI[(first + step) % VIMSHOTTARI.len()];
        let years = maha_years * antar_years / CYCLE_YEARS;
        let end = shift(start, years)?;
        let period = DashaPeriod {
            lord,
            start,
            end,
            years: round2(years),
        };
        if at >= start && at < end {
            return Ok(period);
        }
        last = Some(period);
        start = end;
    }

    // Rounding can leave `at` just past the final sub-period.
    Ok(last.unwrap_or(DashaPeriod {
        lord: maha_lord,
        start: nominal_start,
        end: nominal_start,
        years: 0.0,
    }))
}
