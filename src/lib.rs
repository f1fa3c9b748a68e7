// src/lib.rs

use chrono::{NaiveDate, NaiveTime};
use log::debug;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

pub mod ephemeris;

pub use ephemeris::{
    ascendant_longitude, date_to_julian_day, greenwich_sidereal_time, julian_centuries,
    local_sidereal_time, local_to_utc, mean_obliquity, moon_longitude, sun_longitude, J2000_JD,
    POLAR_LATITUDE_LIMIT,
};

pub type JulianDay = f64;

// ---------------------------
// ## Enumerations
// ---------------------------

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZodiacSign {
    Aries = 0,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl ZodiacSign {
    pub const ALL: [ZodiacSign; 12] = [
        ZodiacSign::Aries,
        ZodiacSign::Taurus,
        ZodiacSign::Gemini,
        ZodiacSign::Cancer,
        ZodiacSign::Leo,
        ZodiacSign::Virgo,
        ZodiacSign::Libra,
        ZodiacSign::Scorpio,
        ZodiacSign::Sagittarius,
        ZodiacSign::Capricorn,
        ZodiacSign::Aquarius,
        ZodiacSign::Pisces,
    ];

    /// Sign containing an ecliptic longitude. Total for any finite input;
    /// the longitude is normalized to [0, 360) first.
    pub fn from_longitude(longitude: f64) -> Self {
        let normalized = longitude.rem_euclid(360.0);
        let sign_index = (normalized / 30.0).floor() as usize % 12;
        ZodiacSign::ALL[sign_index]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ZodiacSign::Aries => "Aries",
            ZodiacSign::Taurus => "Taurus",
            ZodiacSign::Gemini => "Gemini",
            ZodiacSign::Cancer => "Cancer",
            ZodiacSign::Leo => "Leo",
            ZodiacSign::Virgo => "Virgo",
            ZodiacSign::Libra => "Libra",
            ZodiacSign::Scorpio => "Scorpio",
            ZodiacSign::Sagittarius => "Sagittarius",
            ZodiacSign::Capricorn => "Capricorn",
            ZodiacSign::Aquarius => "Aquarius",
            ZodiacSign::Pisces => "Pisces",
        }
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ---------------------------
// ## Structures
// ---------------------------

/// A zodiac sign together with the degree inside it, [0, 30).
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZodiacPosition {
    pub sign: ZodiacSign,
    pub degree: f64,
}

impl ZodiacPosition {
    pub fn from_longitude(longitude: f64) -> Self {
        let normalized = longitude.rem_euclid(360.0);
        ZodiacPosition {
            sign: ZodiacSign::from_longitude(normalized),
            degree: normalized % 30.0,
        }
    }
}

impl fmt::Display for ZodiacPosition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {:.1}°", self.sign, self.degree)
    }
}

/// Geographic coordinate, degrees, east and north positive. Supplied by an
/// external geocoder; the engine never recomputes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Location { latitude, longitude }
    }

    pub fn moscow() -> Self { Location { latitude: 55.7558, longitude: 37.6173 } }
    pub fn saint_petersburg() -> Self { Location { latitude: 59.9343, longitude: 30.3351 } }
    pub fn novosibirsk() -> Self { Location { latitude: 55.0084, longitude: 82.9357 } }
    pub fn yekaterinburg() -> Self { Location { latitude: 56.8389, longitude: 60.6057 } }
    pub fn kazan() -> Self { Location { latitude: 55.7887, longitude: 49.1221 } }
    pub fn sochi() -> Self { Location { latitude: 43.6028, longitude: 39.7342 } }
    pub fn london() -> Self { Location { latitude: 51.5074, longitude: -0.1278 } }
    pub fn berlin() -> Self { Location { latitude: 52.5200, longitude: 13.4050 } }
    pub fn new_york() -> Self { Location { latitude: 40.7128, longitude: -74.0060 } }
    pub fn tokyo() -> Self { Location { latitude: 35.6762, longitude: 139.6503 } }
}

/// Birth moment as the user states it: local calendar date, local wall-clock
/// time, and the IANA timezone the clock belonged to.
///
/// The date and time fields are valid by construction; the timezone string
/// is resolved during computation so an unknown name surfaces as
/// [`NatalError::UnknownTimezone`] from the engine, not at parse time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirthInfo {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub timezone: String,
}

impl BirthInfo {
    pub fn new(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        timezone: &str,
    ) -> Result<Self, NatalError> {
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            NatalError::InvalidDate {
                message: format!("{day:02}.{month:02}.{year} is not a calendar date"),
            }
        })?;
        let time = NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| {
            NatalError::InvalidDate {
                message: format!("{hour:02}:{minute:02} is not a clock time"),
            }
        })?;

        Ok(BirthInfo {
            date,
            time,
            timezone: timezone.to_string(),
        })
    }

    /// Parse the wire format the conversational layer collects:
    /// `DD.MM.YYYY` and `HH:MM`.
    pub fn parse(date_str: &str, time_str: &str, timezone: &str) -> Result<Self, NatalError> {
        let date = NaiveDate::parse_from_str(date_str, "%d.%m.%Y").map_err(|_| {
            NatalError::InvalidDate {
                message: format!("expected DD.MM.YYYY, got {date_str:?}"),
            }
        })?;
        let time = NaiveTime::parse_from_str(time_str, "%H:%M").map_err(|_| {
            NatalError::InvalidDate {
                message: format!("expected HH:MM, got {time_str:?}"),
            }
        })?;

        Ok(BirthInfo {
            date,
            time,
            timezone: timezone.to_string(),
        })
    }
}

/// The computed chart: Sun, Moon and ascendant positions plus the resolved
/// Julian Day and the coordinate they were computed for. Fresh per request,
/// never partially filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NatalChart {
    pub sun: ZodiacPosition,
    pub moon: ZodiacPosition,
    pub ascendant: ZodiacPosition,
    pub julian_day: JulianDay,
    pub location: Location,
}

impl NatalChart {
    /// Compute the chart for a birth moment at a location.
    ///
    /// Fails fast on the first component error; no partial chart is ever
    /// returned. Pure function of its inputs, safe to call from any number
    /// of threads at once.
    pub fn calculate(birth: &BirthInfo, location: &Location) -> Result<Self, NatalError> {
        let utc = ephemeris::local_to_utc(birth.date, birth.time, &birth.timezone)?;
        let julian_day = ephemeris::date_to_julian_day(utc);
        debug!(
            "{} {} {} resolved to {utc} (JD {julian_day})",
            birth.date, birth.time, birth.timezone
        );

        let sun = ephemeris::sun_longitude(julian_day);
        let moon = ephemeris::moon_longitude(julian_day);
        let ascendant =
            ephemeris::ascendant_longitude(julian_day, location.latitude, location.longitude)?;
        debug!("sun {sun:.4}°, moon {moon:.4}°, ascendant {ascendant:.4}°");

        Ok(NatalChart {
            sun: ZodiacPosition::from_longitude(sun),
            moon: ZodiacPosition::from_longitude(moon),
            ascendant: ZodiacPosition::from_longitude(ascendant),
            julian_day,
            location: location.clone(),
        })
    }
}

pub fn compute_natal_chart(birth: &BirthInfo, location: &Location) -> Result<NatalChart, NatalError> {
    NatalChart::calculate(birth, location)
}

// ---------------------------
// ## Error Handling
// ---------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum NatalError {
    InvalidDate { message: String },
    UnknownTimezone { name: String },
    AscendantUndefined { latitude: f64 },
}

impl fmt::Display for NatalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NatalError::InvalidDate { message } => write!(f, "Invalid Date: {}", message),
            NatalError::UnknownTimezone { name } => write!(f, "Unknown Timezone: {}", name),
            NatalError::AscendantUndefined { latitude } => write!(
                f,
                "Ascendant Undefined: latitude {:.4}° is too close to the pole",
                latitude
            ),
        }
    }
}

impl Error for NatalError {}
