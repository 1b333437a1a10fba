//! Civil birth time to Julian Day (UT).
//!
//! The UTC offset is a fixed configuration value; no timezone or DST
//! database is consulted.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc};
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

pub type JulianDay = f64;

/// Indian Standard Time, the offset birth times are assumed to be in.
pub const IST_OFFSET_HOURS: f64 = 5.5;

const MAX_OFFSET_HOURS: f64 = 14.0;

/// Birth years accepted, matching the span of the long Swiss Ephemeris
/// files (5401 BC to 5399 AD). Keeps UT shifts and 120-year dasha
/// timelines well inside chrono's representable range.
pub const SUPPORTED_YEARS: RangeInclusive<i32> = -5400..=5399;

/// Fixed offset of local civil time from UT, in hours (east positive).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct UtcOffset(f64);

impl UtcOffset {
    pub const IST: UtcOffset = UtcOffset(IST_OFFSET_HOURS);

    pub fn from_hours(hours: f64) -> ChartResult<Self> {
        if !hours.is_finite() || hours.abs() > MAX_OFFSET_HOURS {
            return Err(ChartError::invalid(format!(
                "UTC offset {hours} h is outside ±{MAX_OFFSET_HOURS} h"
            )));
        }
        Ok(UtcOffset(hours))
    }

    pub fn hours(self) -> f64 {
        self.0
    }

    fn as_duration(self) -> Duration {
        Duration::seconds((self.0 * 3600.0).round() as i64)
    }
}

impl Default for UtcOffset {
    fn default() -> Self {
        UtcOffset::IST
    }
}

impl TryFrom<f64> for UtcOffset {
    type Error = ChartError;

    fn try_from(hours: f64) -> Result<Self, Self::Error> {
        UtcOffset::from_hours(hours)
    }
}

impl From<UtcOffset> for f64 {
    fn from(offset: UtcOffset) -> f64 {
        offset.0
    }
}

/// Julian Day for a proleptic Gregorian date and fractional UT hour.
pub fn julian_day(year: i32, month: u32, day: u32, hour: f64) -> JulianDay {
    let (y, m) = if month <= 2 {
        (year as f64 - 1.0, month as f64 + 12.0)
    } else {
        (year as f64, month as f64)
    };
    let a = (y / 100.0).floor();
    let b = 2.0 - a + (a / 4.0).floor();

    (365.25 * (y + 4716.0)).floor() + (30.6001 * (m + 1.0)).floor() + day as f64 + b - 1524.5
        + hour / 24.0
}

pub fn ensure_supported_year(year: i32) -> ChartResult<()> {
    if !SUPPORTED_YEARS.contains(&year) {
        return Err(ChartError::invalid(format!(
            "year {year} is outside the supported range {}..={}",
            SUPPORTED_YEARS.start(),
            SUPPORTED_YEARS.end()
        )));
    }
    Ok(())
}

pub fn parse_birth_date(dob: &str) -> ChartResult<NaiveDate> {
    let date = NaiveDate::parse_from_str(dob.trim(), "%Y-%m-%d")
        .map_err(|e| ChartError::invalid(format!("dob {dob:?} is not a YYYY-MM-DD date: {e}")))?;
    ensure_supported_year(date.year())?;
    Ok(date)
}

pub fn parse_birth_time(tob: &str) -> ChartResult<NaiveTime> {
    let tob = tob.trim();
    NaiveTime::parse_from_str(tob, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(tob, "%H:%M"))
        .map_err(|e| ChartError::invalid(format!("tob {tob:?} is not an HH:MM[:SS] time: {e}")))
}

/// The birth instant resolved to UT.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BirthMoment {
    pub local: NaiveDateTime,
    pub offset: UtcOffset,
    pub utc: DateTime<Utc>,
    pub julian_day: JulianDay,
}

impl BirthMoment {
    pub fn from_local(date: NaiveDate, time: NaiveTime, offset: UtcOffset) -> ChartResult<Self> {
        ensure_supported_year(date.year())?;
        let local = NaiveDateTime::new(date, time);
        let shifted = local
            .checked_sub_signed(offset.as_duration())
            .ok_or_else(|| ChartError::invalid(format!("{local} cannot be shifted to UT")))?;
        let utc = Utc.from_utc_datetime(&shifted);
        Ok(BirthMoment {
            local,
            offset,
            utc,
            julian_day: julian_day_from_utc(utc),
        })
    }
}

pub fn fractional_hour(time: NaiveTime) -> f64 {
    time.hour() as f64
        + time.minute() as f64 / 60.0
        + (time.second() as f64 + time.nanosecond() as f64 / 1_000_000_000.0) / 3600.0
}

pub fn julian_day_from_utc(utc: DateTime<Utc>) -> JulianDay {
    julian_day(utc.year(), utc.month(), utc.day(), fractional_hour(utc.time()))
}
