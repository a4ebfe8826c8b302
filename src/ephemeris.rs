// src/ephemeris.rs
//
// Longitude provider seam. The chart layer only ever sees this trait; which
// backend sits behind it is a configuration decision, never a load-time probe.

use chrono::{DateTime, Datelike, Timelike, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{AstrologyError, BirthInfo, CelestialPoint, ChartAngle, JulianDay};

/// Source of ecliptic longitudes for a birth instant and location.
///
/// Implementations return a single longitude in degrees per request, or an
/// explicit unavailable error. Selena is not a provider concern: the chart
/// layer derives it from Lilith.
pub trait LongitudeProvider {
    /// Tropical ecliptic longitude of a body or computed point, in degrees.
    fn point_longitude(
        &self,
        birth_info: &BirthInfo,
        point: CelestialPoint,
    ) -> Result<f64, AstrologyError>;

    /// Longitude of a chart angle (ascendant or midheaven), in degrees.
    fn angle_longitude(
        &self,
        birth_info: &BirthInfo,
        angle: ChartAngle,
    ) -> Result<f64, AstrologyError>;

    /// The twelve house cusp longitudes, first house onward, in degrees.
    fn house_cusps(&self, birth_info: &BirthInfo) -> Result<[f64; 12], AstrologyError>;
}

/// Julian day (universal time) for a Gregorian calendar instant.
pub fn julian_day_ut(date_time: DateTime<Utc>) -> JulianDay {
    let year = date_time.year() as i64;
    let month = date_time.month() as i64;
    let day = date_time.day() as i64;
    let a = (14 - month) / 12;
    let y = year + 4800 - a;
    let m = month + 12 * a - 3;
    let jdn =
        day + (153 * m + 2) / 5 + 365 * y + y / 4 - y / 100 + y / 400 - 32045;
    let hour = date_time.hour() as f64
        + date_time.minute() as f64 / 60.0
        + date_time.second() as f64 / 3600.0;
    jdn as f64 + (hour - 12.0) / 24.0
}

// ---------------------------
// ## Provider selection
// ---------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EphemerisSource {
    /// Deterministic built-in chart table (see [`FixedChartEphemeris`]).
    FixedChart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EphemerisConfig {
    pub source: EphemerisSource,
}

impl Default for EphemerisConfig {
    fn default() -> Self {
        EphemerisConfig {
            source: EphemerisSource::FixedChart,
        }
    }
}

impl EphemerisConfig {
    pub fn build(&self) -> Box<dyn LongitudeProvider> {
        match self.source {
            EphemerisSource::FixedChart => {
                info!("ephemeris source: built-in fixed chart table");
                Box::new(FixedChartEphemeris::new())
            }
        }
    }
}

// ---------------------------
// ## Fixed chart table
// ---------------------------

/// Julian day of the epoch the built-in table is keyed to
/// (1987-07-25 12:00 UT).
pub const FIXED_CHART_JD: JulianDay = 2_447_002.0;

/// Requests further than this from the table epoch are refused.
const EPOCH_TOLERANCE_DAYS: f64 = 1e-6;

const FIXED_POINTS: &[(CelestialPoint, f64)] = &[
    (CelestialPoint::Sun, 121.826),
    (CelestialPoint::Moon, 115.641),
    (CelestialPoint::Mercury, 101.974),
    (CelestialPoint::Venus, 113.859),
    (CelestialPoint::Mars, 121.852),
    (CelestialPoint::Jupiter, 28.676),
    (CelestialPoint::Saturn, 255.028),
    (CelestialPoint::Uranus, 263.303),
    (CelestialPoint::Neptune, 275.940),
    (CelestialPoint::Pluto, 217.163),
    (CelestialPoint::Chiron, 85.647),
    (CelestialPoint::Lilith, 95.0),
    (CelestialPoint::Node, 4.360),
];

const FIXED_ASCENDANT: f64 = 187.002;
const FIXED_MIDHEAVEN: f64 = 99.828;

const FIXED_CUSPS: [f64; 12] = [
    187.002, 214.0, 247.0, 279.828, 309.0, 337.0, 7.002, 34.0, 67.0, 99.828, 129.0, 157.0,
];

/// Longitude table for one known chart, used when no ephemeris engine is
/// wired in and as the deterministic backend for tests. Any instant other
/// than the table epoch is refused rather than answered approximately.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedChartEphemeris;

impl FixedChartEphemeris {
    pub fn new() -> Self {
        FixedChartEphemeris
    }

    fn check_epoch(&self, birth_info: &BirthInfo) -> Result<(), AstrologyError> {
        let jd = birth_info.julian_day();
        if (jd - FIXED_CHART_JD).abs() > EPOCH_TOLERANCE_DAYS {
            return Err(AstrologyError::Ephemeris(format!(
                "fixed chart table covers JD {} only, requested JD {:.6}",
                FIXED_CHART_JD, jd
            )));
        }
        Ok(())
    }
}

impl LongitudeProvider for FixedChartEphemeris {
    fn point_longitude(
        &self,
        birth_info: &BirthInfo,
        point: CelestialPoint,
    ) -> Result<f64, AstrologyError> {
        self.check_epoch(birth_info)?;
        let longitude = FIXED_POINTS
            .iter()
            .find(|(p, _)| *p == point)
            .map(|(_, lon)| *lon)
            .ok_or_else(|| {
                AstrologyError::PointUnavailable(format!("{} is not in the fixed table", point))
            })?;
        debug!("{}: {:.3}°", point, longitude);
        Ok(longitude)
    }

    fn angle_longitude(
        &self,
        birth_info: &BirthInfo,
        angle: ChartAngle,
    ) -> Result<f64, AstrologyError> {
        self.check_epoch(birth_info)?;
        Ok(match angle {
            ChartAngle::Ascendant => FIXED_ASCENDANT,
            ChartAngle::Midheaven => FIXED_MIDHEAVEN,
        })
    }

    fn house_cusps(&self, birth_info: &BirthInfo) -> Result<[f64; 12], AstrologyError> {
        self.check_epoch(birth_info)?;
        Ok(FIXED_CUSPS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Location;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    fn table_birth_info() -> BirthInfo {
        BirthInfo::new(
            Utc.with_ymd_and_hms(1987, 7, 25, 12, 0, 0).unwrap(),
            Location::izhevsk(),
        )
    }

    #[test]
    fn julian_day_table_epoch() {
        let jd = julian_day_ut(Utc.with_ymd_and_hms(1987, 7, 25, 12, 0, 0).unwrap());
        assert_relative_eq!(jd, FIXED_CHART_JD);
    }

    #[test]
    fn julian_day_j2000() {
        let jd = julian_day_ut(Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap());
        assert_relative_eq!(jd, 2_451_545.0);
    }

    #[test]
    fn julian_day_fractional_hours() {
        let noon = julian_day_ut(Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap());
        let evening = julian_day_ut(Utc.with_ymd_and_hms(2025, 1, 1, 18, 0, 0).unwrap());
        assert_relative_eq!(evening - noon, 0.25);
    }

    #[test]
    fn fixed_table_serves_epoch_points() {
        let eph = FixedChartEphemeris::new();
        let birth_info = table_birth_info();
        assert_relative_eq!(
            eph.point_longitude(&birth_info, CelestialPoint::Sun).unwrap(),
            121.826
        );
        assert_relative_eq!(
            eph.point_longitude(&birth_info, CelestialPoint::Node).unwrap(),
            4.360
        );
        assert_relative_eq!(
            eph.angle_longitude(&birth_info, ChartAngle::Ascendant).unwrap(),
            187.002
        );
        assert_relative_eq!(
            eph.angle_longitude(&birth_info, ChartAngle::Midheaven).unwrap(),
            99.828
        );
    }

    #[test]
    fn fixed_table_has_no_selena() {
        let eph = FixedChartEphemeris::new();
        match eph.point_longitude(&table_birth_info(), CelestialPoint::Selena) {
            Err(AstrologyError::PointUnavailable(_)) => {}
            other => panic!("expected PointUnavailable, got {:?}", other),
        }
    }

    #[test]
    fn fixed_table_refuses_other_instants() {
        let eph = FixedChartEphemeris::new();
        let birth_info = BirthInfo::new(
            Utc.with_ymd_and_hms(1991, 6, 18, 7, 10, 0).unwrap(),
            Location::new(10.522, 76.172),
        );
        match eph.point_longitude(&birth_info, CelestialPoint::Sun) {
            Err(AstrologyError::Ephemeris(_)) => {}
            other => panic!("expected Ephemeris error, got {:?}", other),
        }
    }

    #[test]
    fn config_builds_fixed_chart_provider() {
        let provider = EphemerisConfig::default().build();
        let lon = provider
            .point_longitude(&table_birth_info(), CelestialPoint::Moon)
            .unwrap();
        assert_relative_eq!(lon, 115.641);
    }

    #[test]
    fn config_round_trips_through_serde() {
        let config = EphemerisConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: EphemerisConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
