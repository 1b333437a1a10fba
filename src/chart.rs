//! Sidereal longitude → rasi, nakshatra, pada, navamsa, house and aspects.
//!
//! Every mapping is a pure function over `[0, 360)`. Indices that fall out
//! of their catalog range are reported as [`ChartError::Invariant`]
//! instead of being clamped.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::{ChartError, ChartResult};
use crate::zodiac::{CelestialBody, Nakshatra, ZodiacSign, NAKSHATRA_SPAN, PADA_SPAN, SIGN_SPAN};

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn sign_of(longitude: f64) -> ChartResult<ZodiacSign> {
    let index = (longitude / SIGN_SPAN).floor();
    usize_index(index)
        .and_then(ZodiacSign::from_index)
        .ok_or_else(|| ChartError::invariant(format!("sign index {index} from longitude {longitude}")))
}

pub fn degree_in_sign(longitude: f64) -> f64 {
    round2(longitude % SIGN_SPAN)
}

pub fn nakshatra_of(longitude: f64) -> ChartResult<Nakshatra> {
    let index = (longitude / NAKSHATRA_SPAN).floor();
    usize_index(index)
        .and_then(Nakshatra::from_index)
        .ok_or_else(|| ChartError::invariant(format!("nakshatra index {index} from longitude {longitude}")))
}

pub fn pada_of(longitude: f64) -> ChartResult<u8> {
    let pada = ((longitude % NAKSHATRA_SPAN) / PADA_SPAN).floor() + 1.0;
    if (1.0..=4.0).contains(&pada) {
        Ok(pada as u8)
    } else {
        Err(ChartError::invariant(format!("pada {pada} from longitude {longitude}")))
    }
}

/// D9 sign: each rasi split into nine 3°20' parts.
pub fn navamsa_sign_of(longitude: f64) -> ChartResult<ZodiacSign> {
    let index = ((longitude * 9.0) % 360.0 / SIGN_SPAN).floor();
    usize_index(index)
        .and_then(ZodiacSign::from_index)
        .ok_or_else(|| ChartError::invariant(format!("navamsa index {index} from longitude {longitude}")))
}

/// 1-based house counted from the ascendant sign (whole-sign houses).
pub fn house_of(ascendant: ZodiacSign, sign: ZodiacSign) -> u8 {
    ((sign.index() as i32 - ascendant.index() as i32).rem_euclid(12) + 1) as u8
}

/// Sign offsets reached by a body's special aspects.
pub fn aspect_offsets(body: CelestialBody) -> &'static [usize] {
    match body {
        CelestialBody::Saturn => &[3, 7, 10],
        CelestialBody::Mars => &[4, 7],
        CelestialBody::Jupiter => &[5, 7, 9],
        _ => &[7],
    }
}

pub fn aspects_of(sign: ZodiacSign, body: CelestialBody) -> BTreeSet<ZodiacSign> {
    aspect_offsets(body).iter().map(|&offset| sign.offset(offset)).collect()
}

fn usize_index(value: f64) -> Option<usize> {
    if value.is_finite() && value >= 0.0 {
        Some(value as usize)
    } else {
        None
    }
}

// ---------------------------
// ## Chart points
// ---------------------------

/// Everything derived from one sidereal longitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    pub longitude: f64,
    pub sign: ZodiacSign,
    pub degree: f64,
    pub nakshatra: Nakshatra,
    pub pada: u8,
    pub navamsa: ZodiacSign,
}

impl ChartPoint {
    pub fn from_longitude(longitude: f64) -> ChartResult<ChartPoint> {
        if !(0.0..360.0).contains(&longitude) {
            return Err(ChartError::invariant(format!(
                "sidereal longitude {longitude} outside [0, 360)"
            )));
        }
        Ok(ChartPoint {
            longitude,
            sign: sign_of(longitude)?,
            degree: degree_in_sign(longitude),
            nakshatra: nakshatra_of(longitude)?,
            pada: pada_of(longitude)?,
            navamsa: navamsa_sign_of(longitude)?,
        })
    }
}
