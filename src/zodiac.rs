// src/zodiac.rs
//
// Position classifier: raw ecliptic longitudes into zodiac sign bands.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{AstrologyError, ZodiacSign};

/// A longitude resolved into its sign band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EclipticPosition {
    /// Normalized longitude, [0, 360).
    pub longitude: f64,
    pub sign: ZodiacSign,
    /// Offset within the sign, [0, 30).
    pub degree_in_sign: f64,
}

impl EclipticPosition {
    /// Short label, whole degrees truncated: "Leo 1°".
    pub fn label(&self) -> String {
        format!("{} {}°", self.sign, self.degree_in_sign.floor() as u32)
    }

    /// In-sign offset as degrees-minutes-seconds.
    pub fn dms(&self) -> Dms {
        deg_to_dms(self.degree_in_sign)
    }
}

impl fmt::Display for EclipticPosition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Resolve a raw longitude into its sign and in-sign offset.
///
/// Accepts any finite real; negative input wraps forward. Non-finite input
/// is rejected rather than mapped to a fabricated position.
pub fn classify(longitude: f64) -> Result<EclipticPosition, AstrologyError> {
    if !longitude.is_finite() {
        return Err(AstrologyError::InvalidInput(format!(
            "longitude must be finite, got {}",
            longitude
        )));
    }
    let normalized = longitude.rem_euclid(360.0);
    let sign = ZodiacSign::from_longitude(normalized);
    Ok(EclipticPosition {
        longitude: normalized,
        sign,
        degree_in_sign: normalized - sign.start_degree(),
    })
}

/// The point 180° across the ecliptic, wrapped into [0, 360).
///
/// Selena is defined as the opposite of Lilith through this function.
pub fn opposite_point(longitude: f64) -> f64 {
    (longitude + 180.0).rem_euclid(360.0)
}

/// Degrees-minutes-seconds representation of an angle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dms {
    pub degrees: u16,
    /// Arc-minutes, 0..59.
    pub minutes: u8,
    /// Arc-seconds, may carry a fractional part.
    pub seconds: f64,
}

impl fmt::Display for Dms {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}°{}'{}\"",
            self.degrees,
            self.minutes,
            self.seconds.floor() as u32
        )
    }
}

/// Split decimal degrees into degrees-minutes-seconds.
pub fn deg_to_dms(deg: f64) -> Dms {
    let d = deg.abs();
    let degrees = d.floor() as u16;
    let remainder = (d - degrees as f64) * 60.0;
    let minutes = remainder.floor() as u8;
    let seconds = (remainder - minutes as f64) * 60.0;
    Dms {
        degrees,
        minutes,
        seconds,
    }
}
