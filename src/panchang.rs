//! Panchangam elements for the birth instant.
//!
//! Tithi, yoga and the Moon's nakshatra are taken from *tropical* Sun and
//! Moon longitudes. Sunrise and sunset are placeholders.

use serde::Serialize;

use crate::chart::nakshatra_of;
use crate::ephemeris::normalize_degrees;
use crate::error::{ChartError, ChartResult};
use crate::time::JulianDay;
use crate::zodiac::NAKSHATRA_SPAN;

const TITHI_SPAN: f64 = 12.0;

pub const SUNRISE_PLACEHOLDER: &str = "06:00";
pub const SUNSET_PLACEHOLDER: &str = "18:00";

const TITHI_NAMES: [&str; 15] = [
    "Pratipada",
    "Dwitiya",
    "Tritiya",
    "Chaturthi",
    "Panchami",
    "Shashthi",
    "Saptami",
    "Ashtami",
    "Navami",
    "Dashami",
    "Ekadashi",
    "Dwadashi",
    "Trayodashi",
    "Chaturdashi",
    "Purnima",
];

const YOGA_NAMES: [&str; 27] = [
    "Vishkambha",
    "Priti",
    "Ayushman",
    "Saubhagya",
    "Shobhana",
    "Atiganda",
    "Sukarma",
    "Dhriti",
    "Shula",
    "Ganda",
    "Vriddhi",
    "Dhruva",
    "Vyaghata",
    "Harshana",
    "Vajra",
    "Siddhi",
    "Vyatipata",
    "Variyana",
    "Parigha",
    "Shiva",
    "Siddha",
    "Sadhya",
    "Shubha",
    "Shukla",
    "Brahma",
    "Indra",
    "Vaidhriti",
];

/// Indexed by `floor(JD + 1.5) mod 7`.
const WEEKDAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum Paksha {
    Shukla,
    Krishna,
}

impl Paksha {
    pub fn name(self) -> &'static str {
        match self {
            Paksha::Shukla => "Shukla",
            Paksha::Krishna => "Krishna",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panchang {
    pub tithi: u8,
    pub tithi_name: &'static str,
    pub paksha: Paksha,
    pub yoga: u8,
    pub yoga_name: &'static str,
    pub weekday: &'static str,
    pub moon_nakshatra: &'static str,
    pub sunrise: &'static str,
    pub sunset: &'static str,
}

/// 1..=30, counted from the new moon.
pub fn tithi_number(sun: f64, moon: f64) -> ChartResult<u8> {
    let tithi = (normalize_degrees(moon - sun) / TITHI_SPAN).floor() + 1.0;
    in_range("tithi", tithi, 30)
}

pub fn tithi_name(tithi: u8) -> &'static str {
    match tithi {
        30 => "Amavasya",
        1..=15 => TITHI_NAMES[tithi as usize - 1],
        _ => TITHI_NAMES[(tithi as usize - 16) % 14],
    }
}

pub fn paksha_of(tithi: u8) -> Paksha {
    if tithi <= 15 {
        Paksha::Shukla
    } else {
        Paksha::Krishna
    }
}

/// 1..=27, from the sum of the two longitudes.
pub fn yoga_number(sun: f64, moon: f64) -> ChartResult<u8> {
    let yoga = (normalize_degrees(moon + sun) / NAKSHATRA_SPAN).floor() + 1.0;
    in_range("yoga", yoga, 27)
}

pub fn weekday_of(julian_day: JulianDay) -> &'static str {
    let index = (julian_day + 1.5).floor().rem_euclid(7.0) as usize;
    WEEKDAYS[index % 7]
}

fn in_range(what: &str, value: f64, max: u8) -> ChartResult<u8> {
    if value >= 1.0 && value <= max as f64 {
        Ok(value as u8)
    } else {
        Err(ChartError::invariant(format!("{what} {value} outside 1..={max}")))
    }
}

pub fn panchang(julian_day: JulianDay, tropical_sun: f64, tropical_moon: f64) -> ChartResult<Panchang> {
    let tithi = tithi_number(tropical_sun, tropical_moon)?;
    let yoga = yoga_number(tropical_sun, tropical_moon)?;
    let yoga_name = YOGA_NAMES
        .get(yoga as usize - 1)
        .copied()
        .ok_or_else(|| ChartError::invariant(format!("yoga {yoga} has no name")))?;

    Ok(Panchang {
        tithi,
        tithi_name: tithi_name(tithi),
        paksha: paksha_of(tithi),
        yoga,
        yoga_name,
        weekday: weekday_of(julian_day),
        moon_nakshatra: nakshatra_of(normalize_degrees(tropical_moon))?.name(),
        sunrise: SUNRISE_PLACEHOLDER,
        sunset: SUNSET_PLACEHOLDER,
    })
}
