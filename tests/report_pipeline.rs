//! End-to-end report assembly against the fixed reference sky.

mod support;

use approx::assert_relative_eq;
use lagna_core::panchang::Paksha;
use lagna_core::{
    calculate_report, BirthDetails, CelestialBody, ChartError, DashaMode, FixedEphemeris, ReportSettings, UtcOffset,
    ZodiacSign,
};

use support::{calculated_on, reference_birth, reference_sky, BrokenEphemeris};

fn reference_report() -> lagna_core::ChartReport {
    calculate_report(&reference_sky(), &reference_birth(), &ReportSettings::default(), calculated_on()).unwrap()
}

fn planet(report: &lagna_core::ChartReport, body: CelestialBody) -> &lagna_core::report::PlanetPlacement {
    report.chart.planets.iter().find(|p| p.body == body).unwrap()
}

// =========================================================
// Chart
// =========================================================

#[test]
fn reference_chart_has_nine_planets_and_twelve_houses() {
    let report = reference_report();

    assert_eq!(report.chart.planets.len(), 9);
    assert_eq!(report.chart.houses.len(), 12);
    assert_eq!(report.chart.lagna.rasi, ZodiacSign::Libra);
    assert_eq!(report.chart.lagna.rasi_local, "Tula");
    assert_eq!(report.chart.lagna.nakshatra, "Chitra");

    for (i, p) in report.chart.planets.iter().enumerate() {
        assert_eq!(p.id as usize, i);
        assert!((1..=12).contains(&p.house), "{} in house {}", p.body, p.house);
        assert!((1..=4).contains(&p.pada));
        assert!((0.0..360.0).contains(&p.longitude));
    }
}

#[test]
fn reference_placements() {
    let report = reference_report();

    let sun = planet(&report, CelestialBody::Sun);
    assert_eq!(sun.rasi, ZodiacSign::Sagittarius);
    assert_eq!(sun.house, 3);
    assert_eq!(sun.nakshatra, "Purva Ashadha");
    assert_relative_eq!(sun.degree, 16.52);

    let moon = planet(&report, CelestialBody::Moon);
    assert_eq!(moon.rasi, ZodiacSign::Libra);
    assert_eq!(moon.house, 1);

    assert_eq!(planet(&report, CelestialBody::Rahu).rasi, ZodiacSign::Cancer);
    assert_eq!(planet(&report, CelestialBody::Ketu).rasi, ZodiacSign::Capricorn);

    let seventh = &report.chart.houses[6];
    assert_eq!(seventh.rasi, ZodiacSign::Aries);
    assert_eq!(seventh.occupants, vec![CelestialBody::Jupiter, CelestialBody::Saturn]);
}

#[test]
fn saturn_in_aries_aspects_cancer_scorpio_capricorn() {
    let report = reference_report();
    let saturn = planet(&report, CelestialBody::Saturn);
    assert_eq!(saturn.rasi, ZodiacSign::Aries);
    assert_eq!(saturn.aspects, vec![3, 7, 10]);
}

#[test]
fn strengths_cover_classical_planets_only() {
    let report = reference_report();
    let bodies: Vec<_> = report.strengths.iter().map(|s| s.planet).collect();
    assert_eq!(bodies, CelestialBody::CLASSICAL.to_vec());

    // Saturn sits 3.45° from its debilitation point
    let saturn = report.strengths.iter().find(|s| s.planet == CelestialBody::Saturn).unwrap();
    assert_relative_eq!(saturn.score, 2.5);
    for s in &report.strengths {
        assert!((1.0..=10.0).contains(&s.score));
    }
}

// =========================================================
// Narrative
// =========================================================

#[test]
fn summary_names_lagna_and_quotes_luminaries() {
    let report = reference_report();
    let summary = &report.summary_report;

    assert!(summary.contains("Tula"));
    assert!(summary.contains("Libra"));
    for body in [CelestialBody::Sun, CelestialBody::Moon] {
        let reading = report.interpretations.iter().find(|i| i.planet == body).unwrap();
        assert!(summary.contains(&reading.text), "summary lacks the {body} reading");
    }
    assert!(summary.contains("The 10th lord Moon sits in house 1"));
    assert!(summary.contains("ruled by Mars"));
    assert!(summary.contains("Strongest planets: Sun (5.5), Jupiter (5.5), Moon (4.5)"));
}

#[test]
fn weak_saturn_gets_a_remedy() {
    let report = reference_report();
    let targeted: Vec<_> = report.recommendations.iter().filter_map(|r| r.planet).collect();
    assert_eq!(targeted, vec![CelestialBody::Saturn]);
    assert_eq!(report.recommendations[0].gemstone, Some("Blue Sapphire"));
    assert_eq!(report.recommendations.len(), 3);
}

#[test]
fn interpretation_per_planet() {
    let report = reference_report();
    assert_eq!(report.interpretations.len(), 9);
    let moon = report.interpretations.iter().find(|i| i.planet == CelestialBody::Moon).unwrap();
    assert!(moon.text.starts_with("Moon in Tula (Libra) in house 1 (self)."));
}

// =========================================================
// Panchang, dasha, meta
// =========================================================

#[test]
fn panchang_uses_tropical_luminaries() {
    let report = reference_report();
    assert_eq!(report.panchang.tithi, 26);
    assert_eq!(report.panchang.paksha, Paksha::Krishna);
    assert_eq!(report.panchang.yoga_name, "Vriddhi");
    assert_eq!(report.panchang.weekday, "Saturday");
    assert_eq!(report.panchang.moon_nakshatra, "Anuradha");
}

#[test]
fn default_dasha_is_the_stub() {
    let report = reference_report();
    assert_eq!(report.dasha.method, "stub");
    assert_eq!(report.dasha.mahadasha, CelestialBody::Venus);
    assert_eq!(report.dasha.antardasha, CelestialBody::Sun);
}

#[test]
fn vimshottari_starts_from_the_moon_nakshatra_lord() {
    let settings = ReportSettings {
        dasha_mode: DashaMode::Vimshottari,
        ..ReportSettings::default()
    };
    let report = calculate_report(&reference_sky(), &reference_birth(), &settings, calculated_on()).unwrap();

    // sidereal Moon 199.47° is in Swati, ruled by Rahu
    assert_eq!(report.dasha.method, "vimshottari");
    assert_eq!(report.dasha.timeline[0].lord, CelestialBody::Rahu);
    assert_eq!(report.dasha.timeline[1].lord, CelestialBody::Jupiter);
    assert!(report.dasha.balance_at_birth_years.unwrap() < 1.0);
}

#[test]
fn meta_records_the_inputs() {
    let report = reference_report();
    assert_eq!(report.meta.engine, "LagnaGuru Parāśari Engine");
    assert_eq!(report.meta.ayanamsa_name, "Lahiri");
    assert_eq!(report.meta.dob, "2000-01-01");
    assert_eq!(report.meta.tob, "12:00:00");
    assert_relative_eq!(report.meta.utc_offset_hours, 5.5);
    assert_relative_eq!(report.meta.julian_day, 2_451_544.5 + 6.5 / 24.0, epsilon = 1e-9);
    assert_eq!(report.meta.ephemeris, "fixed");
}

#[test]
fn zero_offset_puts_birth_at_j2000() {
    let settings = ReportSettings {
        utc_offset: UtcOffset::from_hours(0.0).unwrap(),
        ..ReportSettings::default()
    };
    let report = calculate_report(&reference_sky(), &reference_birth(), &settings, calculated_on()).unwrap();
    assert_relative_eq!(report.meta.julian_day, 2_451_545.0);
}

// =========================================================
// Determinism and failures
// =========================================================

#[test]
fn reports_differ_only_in_calculation_time() {
    let first = reference_report();
    let mut second = calculate_report(&reference_sky(), &reference_birth(), &ReportSettings::default(), chrono::Utc::now()).unwrap();
    assert_ne!(first.meta.calculated_on, second.meta.calculated_on);
    second.meta.calculated_on = first.meta.calculated_on;
    assert_eq!(first, second);
}

#[test]
fn malformed_birth_date_is_invalid_input() {
    let err = BirthDetails::parse("2020/13/40", "12:00", 0.0, 0.0).unwrap_err();
    assert!(matches!(err, ChartError::InvalidInput(_)));
}

#[test]
fn oracle_failure_aborts_the_report() {
    let err = calculate_report(&BrokenEphemeris, &reference_birth(), &ReportSettings::default(), calculated_on())
        .unwrap_err();
    assert!(matches!(err, ChartError::Oracle(_)));
}

#[test]
fn lagna_tracks_the_backend_ascendant() {
    // tropical 30° less ayanamsa 23.853° is Aries 6.15°
    let sky = FixedEphemeris::new().with_ascendant(30.0);
    let report = calculate_report(&sky, &reference_birth(), &ReportSettings::default(), calculated_on()).unwrap();
    assert_eq!(report.chart.lagna.rasi, ZodiacSign::Aries);
    assert_relative_eq!(report.chart.lagna.degree, 6.15);
    assert_eq!(report.chart.houses[0].rasi, ZodiacSign::Aries);
    assert_eq!(planet(&report, CelestialBody::Saturn).house, 1);
}
