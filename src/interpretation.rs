//! Narrative text: per-planet readings, the summary report and remedies.
//!
//! Everything here is template driven over the placements already
//! computed by the report assembler.

use std::cmp::Ordering;

use serde::Serialize;

use crate::error::{ChartError, ChartResult};
use crate::report::{LagnaPlacement, PlanetPlacement};
use crate::strength::BASE_STRENGTH;
use crate::zodiac::{CelestialBody, ZodiacSign};

/// Scores at or above this read as strong.
pub const STRONG_THRESHOLD: f64 = 7.0;
/// Scores at or below this read as weak and earn a remedy.
pub const WEAK_THRESHOLD: f64 = 4.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interpretation {
    pub planet: CelestialBody,
    pub text: String,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct StrengthEntry {
    pub planet: CelestialBody,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub planet: Option<CelestialBody>,
    pub text: String,
    pub gemstone: Option<&'static str>,
}

// ---------------------------
// ## Lookup tables
// ---------------------------

/// Significations of a house, most prominent first.
pub fn house_meaning(house: u8) -> Option<[&'static str; 3]> {
    let meaning = match house {
        1 => ["self", "body", "temperament"],
        2 => ["wealth", "speech", "family"],
        3 => ["courage", "siblings", "communication"],
        4 => ["home", "mother", "inner peace"],
        5 => ["creativity", "children", "intellect"],
        6 => ["health", "service", "rivals"],
        7 => ["partnership", "marriage", "contracts"],
        8 => ["transformation", "longevity", "hidden matters"],
        9 => ["fortune", "dharma", "teachers"],
        10 => ["career", "status", "public life"],
        11 => ["gains", "friends", "aspirations"],
        12 => ["spirituality", "losses", "foreign lands"],
        _ => return None,
    };
    Some(meaning)
}

pub fn lagna_trait(sign: ZodiacSign) -> &'static str {
    match sign {
        ZodiacSign::Aries => "an energetic, pioneering temperament that likes to lead",
        ZodiacSign::Taurus => "a steady, patient nature that values comfort and security",
        ZodiacSign::Gemini => "a curious, communicative mind that thrives on variety",
        ZodiacSign::Cancer => "a nurturing, sensitive disposition rooted in home and family",
        ZodiacSign::Leo => "a warm, confident presence with a flair for leadership",
        ZodiacSign::Virgo => "an analytical, service-minded nature with an eye for detail",
        ZodiacSign::Libra => "a diplomatic temperament that seeks harmony and partnership",
        ZodiacSign::Scorpio => "an intense, perceptive nature with deep reserves of will",
        ZodiacSign::Sagittarius => "an optimistic, philosophical outlook that searches for meaning",
        ZodiacSign::Capricorn => "a disciplined, ambitious character built for the long haul",
        ZodiacSign::Aquarius => "an independent, humanitarian mind full of original ideas",
        ZodiacSign::Pisces => "an intuitive, compassionate nature with a rich inner life",
    }
}

fn body_clause(body: CelestialBody) -> Option<&'static str> {
    match body {
        CelestialBody::Sun => Some("The Sun here colours identity and vitality."),
        CelestialBody::Moon => Some("The Moon here shapes the mind and emotional needs."),
        CelestialBody::Mars => Some("Mars brings drive and courage to this area."),
        CelestialBody::Jupiter => Some("Jupiter expands wisdom and good fortune here."),
        CelestialBody::Rahu | CelestialBody::Ketu => Some("The lunar nodes mark this area as a karmic focus."),
        _ => None,
    }
}

fn remedy(body: CelestialBody) -> Option<(&'static str, &'static str)> {
    match body {
        CelestialBody::Sun => Some(("Offer water to the rising Sun every morning", "Ruby")),
        CelestialBody::Moon => Some(("Wear white and keep a calm routine on Mondays", "Pearl")),
        CelestialBody::Mars => Some(("Recite the Hanuman Chalisa on Tuesdays", "Red Coral")),
        CelestialBody::Mercury => Some(("Feed green vegetables to cows on Wednesdays", "Emerald")),
        CelestialBody::Jupiter => Some(("Donate yellow items and honour teachers on Thursdays", "Yellow Sapphire")),
        CelestialBody::Venus => Some(("Offer white flowers on Fridays", "Diamond")),
        CelestialBody::Saturn => Some(("Feed black sesame seeds to birds on Saturdays", "Blue Sapphire")),
        CelestialBody::Rahu | CelestialBody::Ketu => None,
    }
}

// ---------------------------
// ## Per-planet readings
// ---------------------------

pub fn interpret_planet(planet: &PlanetPlacement) -> String {
    let keyword = house_meaning(planet.house).map_or("life", |m| m[0]);
    let mut text = format!(
        "{} in {} ({}) in house {} ({}).",
        planet.body,
        planet.rasi.local_name(),
        planet.rasi.name(),
        planet.house,
        keyword
    );

    let score = planet.strength.unwrap_or(BASE_STRENGTH);
    if score >= STRONG_THRESHOLD {
        text.push_str(" It is strong in this placement.");
    } else if score <= WEAK_THRESHOLD {
        text.push_str(" This placement needs attention.");
    }

    if let Some(clause) = body_clause(planet.body) {
        text.push(' ');
        text.push_str(clause);
    }
    text
}

pub fn interpretations(planets: &[PlanetPlacement]) -> Vec<Interpretation> {
    planets
        .iter()
        .map(|p| Interpretation {
            planet: p.body,
            text: interpret_planet(p),
        })
        .collect()
}

/// Descending by score; equal scores keep their catalog order.
pub fn rank_strengths(strengths: &[StrengthEntry]) -> Vec<StrengthEntry> {
    let mut ranked = strengths.to_vec();
    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    ranked
}

fn list(entries: &[StrengthEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("{} ({})", e.planet, e.score))
        .collect::<Vec<_>>()
        .join(", ")
}

// ---------------------------
// ## Summary
// ---------------------------

pub fn summarize(
    lagna: &LagnaPlacement,
    planets: &[PlanetPlacement],
    readings: &[Interpretation],
    strengths: &[StrengthEntry],
) -> ChartResult<String> {
    let reading_of = |body: CelestialBody| {
        readings
            .iter()
            .find(|r| r.planet == body)
            .map(|r| r.text.as_str())
            .ok_or_else(|| ChartError::invariant(format!("no interpretation for {body}")))
    };
    let placement_of = |body: CelestialBody| {
        planets
            .iter()
            .find(|p| p.body == body)
            .ok_or_else(|| ChartError::invariant(format!("no placement for {body}")))
    };

    let mut paragraphs = Vec::with_capacity(7);

    paragraphs.push(format!(
        "Lagna: {} ({}). The ascendant gives {}.",
        lagna.rasi.local_name(),
        lagna.rasi.name(),
        lagna_trait(lagna.rasi)
    ));
    paragraphs.push(reading_of(CelestialBody::Sun)?.to_string());
    paragraphs.push(reading_of(CelestialBody::Moon)?.to_string());
    paragraphs.push(format!(
        "Navamsa lagna: {} ({}).",
        lagna.navamsa.local_name(),
        lagna.navamsa.name()
    ));

    let ranked = rank_strengths(strengths);
    if !ranked.is_empty() {
        let top = &ranked[..ranked.len().min(3)];
        let bottom = &ranked[ranked.len().saturating_sub(3)..];
        paragraphs.push(format!(
            "Strongest planets: {}. Planets needing support: {}.",
            list(top),
            list(bottom)
        ));
    }

    let tenth_lord = lagna.rasi.offset(9).lord();
    paragraphs.push(format!(
        "The 10th lord {} sits in house {}, colouring career and public life.",
        tenth_lord,
        placement_of(tenth_lord)?.house
    ));

    let seventh = lagna.rasi.offset(6);
    paragraphs.push(format!(
        "The 7th house falls in {} ({}), ruled by {}.",
        seventh.local_name(),
        seventh.name(),
        seventh.lord()
    ));

    Ok(paragraphs.join("\n\n"))
}

// ---------------------------
// ## Recommendations
// ---------------------------

/// A remedy for each weak classical planet, then general practices.
pub fn recommendations(strengths: &[StrengthEntry]) -> Vec<Recommendation> {
    let mut out: Vec<Recommendation> = strengths
        .iter()
        .filter(|e| e.score <= WEAK_THRESHOLD)
        .filter_map(|e| {
            remedy(e.planet).map(|(text, gem)| Recommendation {
                planet: Some(e.planet),
                text: format!("{} to support {}.", text, e.planet),
                gemstone: Some(gem),
            })
        })
        .collect();

    out.push(Recommendation {
        planet: None,
        text: "Practice meditation daily for steadiness of mind.".to_string(),
        gemstone: None,
    });
    out.push(Recommendation {
        planet: None,
        text: "Perform charity on Saturdays to ease difficult periods.".to_string(),
        gemstone: None,
    });
    out
}
