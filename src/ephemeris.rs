// src/ephemeris.rs
//
// Analytic ephemeris for natal chart computation. Earlier revisions wrapped
// two native Swiss Ephemeris engines behind FFI; every formula needed for
// Sun, Moon and ascendant longitudes is now spelled out here, so the results
// are auditable and the crate ships no binary ephemeris data.

use chrono::{DateTime, Datelike, LocalResult, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use crate::{JulianDay, NatalError};

// ---------------------------
// ## Constants
// ---------------------------

/// Julian Day of the J2000.0 epoch, 2000-01-01 12:00 UT.
pub const J2000_JD: JulianDay = 2_451_545.0;

const DAYS_PER_JULIAN_CENTURY: f64 = 36_525.0;

/// Latitudes at or beyond this magnitude have no stable ascendant: the
/// horizon-based formula divides through tan(latitude), which blows up
/// toward the poles.
pub const POLAR_LATITUDE_LIMIT: f64 = 89.9;

// ---------------------------
// ## Time Conversion
// ---------------------------

/// Resolve a local civil date and time under an IANA timezone name to UTC.
///
/// The offset is looked up for the specific date, so historical daylight
/// saving rules apply (Moscow in May 1990 is UTC+4, not the fixed +3).
/// A nonexistent wall-clock moment (spring-forward gap) is an invalid date;
/// an ambiguous one (fall-back fold) resolves to the earlier instant.
pub fn local_to_utc(
    date: NaiveDate,
    time: NaiveTime,
    timezone: &str,
) -> Result<DateTime<Utc>, NatalError> {
    let tz: Tz = timezone.parse().map_err(|_| NatalError::UnknownTimezone {
        name: timezone.to_string(),
    })?;

    let local = date.and_time(time);
    let resolved = match tz.from_local_datetime(&local) {
        LocalResult::Single(moment) => moment,
        LocalResult::Ambiguous(earlier, _) => earlier,
        LocalResult::None => {
            return Err(NatalError::InvalidDate {
                message: format!("{local} does not exist in {timezone}"),
            })
        }
    };

    Ok(resolved.with_timezone(&Utc))
}

/// Convert a UTC instant to a fractional Julian Day Number.
///
/// Standard civil-to-JD algorithm for the proleptic Gregorian calendar;
/// J2000 noon maps to exactly 2451545.0.
pub fn date_to_julian_day(date_time: DateTime<Utc>) -> JulianDay {
    let year = i64::from(date_time.year());
    let month = i64::from(date_time.month());
    let day = i64::from(date_time.day());

    let a = (14 - month) / 12;
    let y = year + 4800 - a;
    let m = month + 12 * a - 3;
    let jdn = day + (153 * m + 2) / 5 + 365 * y + y / 4 - y / 100 + y / 400 - 32_045;

    let day_seconds = f64::from(date_time.num_seconds_from_midnight());
    jdn as f64 + day_seconds / 86_400.0 - 0.5
}

/// Julian centuries elapsed since J2000.0.
pub fn julian_centuries(julian_day: JulianDay) -> f64 {
    (julian_day - J2000_JD) / DAYS_PER_JULIAN_CENTURY
}

/// Greenwich Mean Sidereal Time in degrees, [0, 360).
///
/// Meeus 12.4 polynomial:
/// GMST = 280.46061837 + 360.98564736629 d + 0.000387933 T^2 - T^3/38710000.
pub fn greenwich_sidereal_time(julian_day: JulianDay) -> f64 {
    let d = julian_day - J2000_JD;
    let t = d / DAYS_PER_JULIAN_CENTURY;

    (280.460_618_37 + 360.985_647_366_29 * d + 0.000_387_933 * t * t
        - t * t * t / 38_710_000.0)
        .rem_euclid(360.0)
}

/// Local Mean Sidereal Time in degrees, [0, 360), for an east-positive
/// longitude. This is also the right ascension of the midheaven (RAMC).
pub fn local_sidereal_time(julian_day: JulianDay, longitude: f64) -> f64 {
    (greenwich_sidereal_time(julian_day) + longitude).rem_euclid(360.0)
}

// ---------------------------
// ## Solar and Lunar Longitude
// ---------------------------

/// Geocentric apparent ecliptic longitude of the Sun in degrees, [0, 360).
///
/// USNO low-precision series: mean longitude plus the equation of center.
/// Good to ~0.01 degrees within a few decades of J2000.
pub fn sun_longitude(julian_day: JulianDay) -> f64 {
    let d = julian_day - J2000_JD;

    // Mean anomaly and mean longitude, degrees.
    let g = (357.529 + 0.985_600_28 * d).rem_euclid(360.0).to_radians();
    let l = (280.459 + 0.985_647_36 * d).rem_euclid(360.0);

    (l + 1.915 * g.sin() + 0.020 * (2.0 * g).sin()).rem_euclid(360.0)
}

/// Geocentric ecliptic longitude of the Moon in degrees, [0, 360).
///
/// Truncated Meeus ch. 47 series: the Moon's mean longitude corrected by the
/// ten largest periodic terms in the mean elongation D, the solar and lunar
/// mean anomalies M and M', and the argument of latitude F. Good to ~0.3
/// degrees, which is ample for sign-and-degree reporting.
pub fn moon_longitude(julian_day: JulianDay) -> f64 {
    let t = julian_centuries(julian_day);

    let lp = (218.316_447_7 + 481_267.881_234_21 * t).rem_euclid(360.0);
    let d = (297.850_192_1 + 445_267.111_403_4 * t)
        .rem_euclid(360.0)
        .to_radians();
    let m = (357.529_109_2 + 35_999.050_290_9 * t)
        .rem_euclid(360.0)
        .to_radians();
    let mp = (134.963_396_4 + 477_198.867_505_5 * t)
        .rem_euclid(360.0)
        .to_radians();
    let f = (93.272_095_0 + 483_202.017_523_3 * t)
        .rem_euclid(360.0)
        .to_radians();

    let correction = 6.288_774 * mp.sin()
        + 1.274_027 * (2.0 * d - mp).sin()
        + 0.658_314 * (2.0 * d).sin()
        + 0.213_618 * (2.0 * mp).sin()
        - 0.185_116 * m.sin()
        - 0.114_332 * (2.0 * f).sin()
        + 0.058_793 * (2.0 * d - 2.0 * mp).sin()
        + 0.057_066 * (2.0 * d - m - mp).sin()
        + 0.053_322 * (2.0 * d + mp).sin()
        + 0.045_758 * (2.0 * d - m).sin();

    (lp + correction).rem_euclid(360.0)
}

// ---------------------------
// ## Ascendant
// ---------------------------

/// Mean obliquity of the ecliptic in degrees.
///
/// Linear model, arc-minute accurate over several centuries around J2000.
pub fn mean_obliquity(julian_day: JulianDay) -> f64 {
    23.439_291_1 - 0.013_004_2 * julian_centuries(julian_day)
}

/// Ecliptic longitude of the ascendant in degrees, [0, 360).
///
/// Closed-form horizon relation between the right ascension of the
/// midheaven, the geographic latitude and the obliquity:
///
/// `asc = atan2(cos(RAMC), -(sin(RAMC) cos(eps) + tan(lat) sin(eps)))`
///
/// The first house cusp of every house system agrees on this point; no
/// house subdivision happens here. Latitudes within [`POLAR_LATITUDE_LIMIT`]
/// of the poles are rejected rather than returning an unstable value.
pub fn ascendant_longitude(
    julian_day: JulianDay,
    latitude: f64,
    longitude: f64,
) -> Result<f64, NatalError> {
    if latitude.abs() >= POLAR_LATITUDE_LIMIT {
        return Err(NatalError::AscendantUndefined { latitude });
    }

    let ramc = local_sidereal_time(julian_day, longitude).to_radians();
    let eps = mean_obliquity(julian_day).to_radians();
    let phi = latitude.to_radians();

    let asc = f64::atan2(ramc.cos(), -(ramc.sin() * eps.cos() + phi.tan() * eps.sin()));
    Ok(asc.to_degrees().rem_euclid(360.0))
}
