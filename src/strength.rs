//! Heuristic planetary strength in `[1.0, 10.0]`.
//!
//! Exaltation and debilitation points are absolute sidereal longitudes
//! and are compared with the body's absolute longitude
//! (`sign * 30 + degree`) using circular distance.

use crate::chart::round2;
use crate::zodiac::ZodiacSign::*;
use crate::zodiac::{CelestialBody, ZodiacSign};

pub const BASE_STRENGTH: f64 = 5.0;
pub const MIN_STRENGTH: f64 = 1.0;
pub const MAX_STRENGTH: f64 = 10.0;

const DIGNITY_ORB: f64 = 5.0;
const EXALTATION_BONUS: f64 = 2.0;
const DEBILITATION_PENALTY: f64 = 2.0;
const OWN_SIGN_BONUS: f64 = 1.5;
const FRIEND_ADJUSTMENT: f64 = 0.5;

/// Deep exaltation point; debilitation lies opposite.
pub fn exaltation_point(body: CelestialBody) -> Option<f64> {
    match body {
        CelestialBody::Sun => Some(10.0),      // Aries 10°
        CelestialBody::Moon => Some(33.0),     // Taurus 3°
        CelestialBody::Mercury => Some(165.0), // Virgo 15°
        CelestialBody::Venus => Some(357.0),   // Pisces 27°
        CelestialBody::Mars => Some(298.0),    // Capricorn 28°
        CelestialBody::Jupiter => Some(95.0),  // Cancer 5°
        CelestialBody::Saturn => Some(200.0),  // Libra 20°
        CelestialBody::Rahu | CelestialBody::Ketu => None,
    }
}

pub fn debilitation_point(body: CelestialBody) -> Option<f64> {
    exaltation_point(body).map(|point| (point + 180.0) % 360.0)
}

pub fn own_signs(body: CelestialBody) -> &'static [ZodiacSign] {
    match body {
        CelestialBody::Sun => &[Leo],
        CelestialBody::Moon => &[Cancer],
        CelestialBody::Mercury => &[Gemini, Virgo],
        CelestialBody::Venus => &[Taurus, Libra],
        CelestialBody::Mars => &[Aries, Scorpio],
        CelestialBody::Jupiter => &[Sagittarius, Pisces],
        CelestialBody::Saturn => &[Capricorn, Aquarius],
        CelestialBody::Rahu | CelestialBody::Ketu => &[],
    }
}

/// Signs ruled by the body's natural friends.
pub fn friend_signs(body: CelestialBody) -> Option<&'static [ZodiacSign]> {
    let signs: &'static [ZodiacSign] = match body {
        // Moon, Mars, Jupiter
        CelestialBody::Sun => &[Cancer, Aries, Scorpio, Sagittarius, Pisces],
        // Sun, Mercury
        CelestialBody::Moon => &[Leo, Gemini, Virgo],
        // Sun, Venus
        CelestialBody::Mercury => &[Leo, Taurus, Libra],
        // Mercury, Saturn
        CelestialBody::Venus => &[Gemini, Virgo, Capricorn, Aquarius],
        // Sun, Moon, Jupiter
        CelestialBody::Mars => &[Leo, Cancer, Sagittarius, Pisces],
        // Sun, Moon, Mars
        CelestialBody::Jupiter => &[Leo, Cancer, Aries, Scorpio],
        // Mercury, Venus
        CelestialBody::Saturn => &[Gemini, Virgo, Taurus, Libra],
        CelestialBody::Rahu | CelestialBody::Ketu => return None,
    };
    Some(signs)
}

fn circular_distance(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(360.0);
    d.min(360.0 - d)
}

pub fn strength_of(body: CelestialBody, sign: ZodiacSign, degree: f64) -> f64 {
    let longitude = sign.index() as f64 * 30.0 + degree;
    let mut score = BASE_STRENGTH;

    if let (Some(exalt), Some(debil)) = (exaltation_point(body), debilitation_point(body)) {
        if circular_distance(longitude, exalt) < DIGNITY_ORB {
            score += EXALTATION_BONUS;
        } else if circular_distance(longitude, debil) < DIGNITY_ORB {
            score -= DEBILITATION_PENALTY;
        }
    }

    if own_signs(body).contains(&sign) {
        score += OWN_SIGN_BONUS;
    }

    if let Some(friends) = friend_signs(body) {
        if friends.contains(&sign) {
            score += FRIEND_ADJUSTMENT;
        } else {
            score -= FRIEND_ADJUSTMENT;
        }
    }

    round2(score.clamp(MIN_STRENGTH, MAX_STRENGTH))
}
