// src/lib.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

pub mod chart;
pub mod ephemeris;
pub mod reference;
pub mod report;
pub mod zodiac;

pub use chart::{NatalChart, PointPosition};
pub use ephemeris::{
    julian_day_ut, EphemerisConfig, EphemerisSource, FixedChartEphemeris, LongitudeProvider,
};
pub use reference::{
    compare, AccuracyTier, ComparisonResult, ComparisonSummary, PointComparison, ReferenceAngle,
    ReferenceChart, ReferenceEntry, ASTRO_COM_1987, DEFAULT_TOLERANCE,
};
pub use report::format_comparison_report;
pub use zodiac::{classify, deg_to_dms, opposite_point, Dms, EclipticPosition};

pub type JulianDay = f64;

// ---------------------------
// ## Enumerations
// ---------------------------

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
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
    /// Sign containing the given ecliptic longitude. Each sign spans exactly
    /// 30 degrees, Aries = [0, 30), half-open at the upper bound.
    pub fn from_longitude(longitude: f64) -> Self {
        let normalized_longitude = longitude.rem_euclid(360.0);
        let sign_index = (normalized_longitude / 30.0).floor() as usize;
        match sign_index {
            0 => ZodiacSign::Aries,
            1 => ZodiacSign::Taurus,
            2 => ZodiacSign::Gemini,
            3 => ZodiacSign::Cancer,
            4 => ZodiacSign::Leo,
            5 => ZodiacSign::Virgo,
            6 => ZodiacSign::Libra,
            7 => ZodiacSign::Scorpio,
            8 => ZodiacSign::Sagittarius,
            9 => ZodiacSign::Capricorn,
            10 => ZodiacSign::Aquarius,
            11 => ZodiacSign::Pisces,
            // rem_euclid can land on 360.0 exactly for tiny negative input
            _ => ZodiacSign::Aries,
        }
    }

    /// 0-based index, Aries = 0 .. Pisces = 11.
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Longitude of the sign's lower band boundary.
    pub const fn start_degree(self) -> f64 {
        (self as u8 as f64) * 30.0
    }

    pub fn iter() -> impl Iterator<Item = ZodiacSign> {
        [
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
        ]
        .iter()
        .copied()
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let sign_str = match self {
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
        };
        write!(f, "{}", sign_str)
    }
}

/// Bodies and computed points placed on the ecliptic. Selena is never
/// measured: it is always the point opposite Lilith.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CelestialPoint {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    Chiron,
    Lilith,
    Node,
    Selena,
}

impl CelestialPoint {
    pub fn iter() -> impl Iterator<Item = CelestialPoint> {
        [
            CelestialPoint::Sun,
            CelestialPoint::Moon,
            CelestialPoint::Mercury,
            CelestialPoint::Venus,
            CelestialPoint::Mars,
            CelestialPoint::Jupiter,
            CelestialPoint::Saturn,
            CelestialPoint::Uranus,
            CelestialPoint::Neptune,
            CelestialPoint::Pluto,
            CelestialPoint::Chiron,
            CelestialPoint::Lilith,
            CelestialPoint::Node,
            CelestialPoint::Selena,
        ]
        .iter()
        .copied()
    }

    pub const fn name(self) -> &'static str {
        match self {
            CelestialPoint::Sun => "Sun",
            CelestialPoint::Moon => "Moon",
            CelestialPoint::Mercury => "Mercury",
            CelestialPoint::Venus => "Venus",
            CelestialPoint::Mars => "Mars",
            CelestialPoint::Jupiter => "Jupiter",
            CelestialPoint::Saturn => "Saturn",
            CelestialPoint::Uranus => "Uranus",
            CelestialPoint::Neptune => "Neptune",
            CelestialPoint::Pluto => "Pluto",
            CelestialPoint::Chiron => "Chiron",
            CelestialPoint::Lilith => "Lilith",
            CelestialPoint::Node => "Node",
            CelestialPoint::Selena => "Selena",
        }
    }
}

impl fmt::Display for CelestialPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Chart angles derived from birth time and location rather than measured
/// body positions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartAngle {
    Ascendant,
    Midheaven,
}

impl ChartAngle {
    pub const fn name(self) -> &'static str {
        match self {
            ChartAngle::Ascendant => "Ascendant",
            ChartAngle::Midheaven => "Midheaven",
        }
    }
}

impl fmt::Display for ChartAngle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum House {
    First = 1,
    Second,
    Third,
    Fourth,
    Fifth,
    Sixth,
    Seventh,
    Eighth,
    Ninth,
    Tenth,
    Eleventh,
    Twelfth,
}

impl House {
    pub fn from_index(index: usize) -> Option<House> {
        match index {
            1 => Some(House::First),
            2 => Some(House::Second),
            3 => Some(House::Third),
            4 => Some(House::Fourth),
            5 => Some(House::Fifth),
            6 => Some(House::Sixth),
            7 => Some(House::Seventh),
            8 => Some(House::Eighth),
            9 => Some(House::Ninth),
            10 => Some(House::Tenth),
            11 => Some(House::Eleventh),
            12 => Some(House::Twelfth),
            _ => None,
        }
    }

    pub fn all() -> impl Iterator<Item = House> {
        (1..=12).filter_map(House::from_index)
    }
}

// ---------------------------
// ## Structures
// ---------------------------

/// A house cusp placed on the ecliptic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HousePosition {
    pub house: House,
    pub sign: ZodiacSign,
    /// Cusp offset within the sign, [0, 30).
    pub degree: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Location {
            latitude,
            longitude,
        }
    }

    pub fn moscow() -> Self { Location { latitude: 55.7558, longitude: 37.6173 } }
    pub fn saint_petersburg() -> Self { Location { latitude: 59.9343, longitude: 30.3351 } }
    pub fn izhevsk() -> Self { Location { latitude: 56.85, longitude: 53.2333 } }
    pub fn yekaterinburg() -> Self { Location { latitude: 56.8389, longitude: 60.6057 } }
    pub fn novosibirsk() -> Self { Location { latitude: 55.0084, longitude: 82.9357 } }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BirthInfo {
    pub date_time: DateTime<Utc>,
    pub location: Location,
}

impl BirthInfo {
    pub fn new(date_time: DateTime<Utc>, location: Location) -> Self {
        BirthInfo {
            date_time,
            location,
        }
    }

    pub fn julian_day(&self) -> JulianDay {
        julian_day_ut(self.date_time)
    }
}

// ---------------------------
// ## Error Handling
// ---------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum AstrologyError {
    /// Malformed caller input, e.g. a non-finite longitude.
    InvalidInput(String),
    /// The provider has no data for the requested point.
    PointUnavailable(String),
    /// Provider-level failure.
    Ephemeris(String),
}

impl fmt::Display for AstrologyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AstrologyError::InvalidInput(msg) => write!(f, "Invalid Input: {}", msg),
            AstrologyError::PointUnavailable(msg) => write!(f, "Point Unavailable: {}", msg),
            AstrologyError::Ephemeris(msg) => write!(f, "Ephemeris Error: {}", msg),
        }
    }
}

impl Error for AstrologyError {}
