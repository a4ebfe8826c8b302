// src/chart.rs
//
// Natal chart assembly: one provider pass per subject, classified positions,
// Selena derived from Lilith. Charts are immutable once calculated.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::zodiac::{classify, opposite_point, EclipticPosition};
use crate::{
    AstrologyError, BirthInfo, CelestialPoint, ChartAngle, House, HousePosition,
    LongitudeProvider, ZodiacSign,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointPosition {
    pub point: CelestialPoint,
    pub position: EclipticPosition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NatalChart {
    pub name: String,
    pub birth_info: BirthInfo,
    pub points: Vec<PointPosition>,
    pub ascendant: Option<EclipticPosition>,
    pub midheaven: Option<EclipticPosition>,
    pub houses: Vec<HousePosition>,
}

impl NatalChart {
    /// Calculate a chart for one subject.
    ///
    /// Points the provider cannot supply are skipped, so a partial chart is
    /// a valid result. A non-finite longitude coming out of the provider is
    /// malformed input and aborts the calculation.
    pub fn calculate(
        name: &str,
        birth_info: BirthInfo,
        provider: &dyn LongitudeProvider,
    ) -> Result<Self, AstrologyError> {
        info!("calculating chart for {}", name);

        let mut points = Vec::new();
        for point in CelestialPoint::iter() {
            // Derived below, never queried.
            if point == CelestialPoint::Selena {
                continue;
            }
            match provider.point_longitude(&birth_info, point) {
                Ok(longitude) => {
                    let position = classify(longitude)?;
                    debug!("{}: {:.3}° = {}", point, position.longitude, position);
                    points.push(PointPosition { point, position });
                }
                Err(AstrologyError::InvalidInput(msg)) => {
                    return Err(AstrologyError::InvalidInput(msg));
                }
                Err(err) => {
                    warn!("{} skipped: {}", point, err);
                }
            }
        }

        // Selena is the opposition of Lilith; absent Lilith, absent Selena.
        let lilith = points
            .iter()
            .find(|p| p.point == CelestialPoint::Lilith)
            .map(|p| p.position.longitude);
        if let Some(lilith_longitude) = lilith {
            let position = classify(opposite_point(lilith_longitude))?;
            points.push(PointPosition {
                point: CelestialPoint::Selena,
                position,
            });
        } else {
            warn!("Selena skipped: Lilith not available");
        }

        let ascendant = Self::calculate_angle(&birth_info, provider, ChartAngle::Ascendant)?;
        let midheaven = Self::calculate_angle(&birth_info, provider, ChartAngle::Midheaven)?;

        let houses = match provider.house_cusps(&birth_info) {
            Ok(cusps) => cusps
                .iter()
                .enumerate()
                .map(|(i, cusp)| {
                    let longitude = cusp.rem_euclid(360.0);
                    let sign = ZodiacSign::from_longitude(longitude);
                    HousePosition {
                        house: House::from_index(i + 1).expect("cusp index in 1..=12"),
                        sign,
                        degree: longitude - sign.start_degree(),
                    }
                })
                .collect(),
            Err(err) => {
                warn!("house cusps skipped: {}", err);
                Vec::new()
            }
        };

        Ok(NatalChart {
            name: name.to_string(),
            birth_info,
            points,
            ascendant,
            midheaven,
            houses,
        })
    }

    fn calculate_angle(
        birth_info: &BirthInfo,
        provider: &dyn LongitudeProvider,
        angle: ChartAngle,
    ) -> Result<Option<EclipticPosition>, AstrologyError> {
        match provider.angle_longitude(birth_info, angle) {
            Ok(longitude) => Ok(Some(classify(longitude)?)),
            Err(AstrologyError::InvalidInput(msg)) => Err(AstrologyError::InvalidInput(msg)),
            Err(err) => {
                warn!("{} skipped: {}", angle, err);
                Ok(None)
            }
        }
    }

    /// Position of one point, if it was computed.
    pub fn point(&self, point: CelestialPoint) -> Option<&EclipticPosition> {
        self.points
            .iter()
            .find(|p| p.point == point)
            .map(|p| &p.position)
    }

    pub fn angle(&self, angle: ChartAngle) -> Option<&EclipticPosition> {
        match angle {
            ChartAngle::Ascendant => self.ascendant.as_ref(),
            ChartAngle::Midheaven => self.midheaven.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::FixedChartEphemeris;
    use crate::Location;
    use approx::assert_relative_eq;
    use chrono::{TimeZone, Utc};

    fn table_birth_info() -> BirthInfo {
        BirthInfo::new(
            Utc.with_ymd_and_hms(1987, 7, 25, 12, 0, 0).unwrap(),
            Location::izhevsk(),
        )
    }

    fn table_chart() -> NatalChart {
        NatalChart::calculate("Andrey", table_birth_info(), &FixedChartEphemeris::new()).unwrap()
    }

    #[test]
    fn chart_contains_all_fourteen_points() {
        let chart = table_chart();
        assert_eq!(chart.points.len(), 14);
        for point in CelestialPoint::iter() {
            assert!(chart.point(point).is_some(), "{} missing", point);
        }
    }

    #[test]
    fn sun_lands_in_leo() {
        let chart = table_chart();
        let sun = chart.point(CelestialPoint::Sun).unwrap();
        assert_eq!(sun.sign, ZodiacSign::Leo);
        assert_relative_eq!(sun.degree_in_sign, 1.826, epsilon = 1e-9);
        assert_eq!(sun.label(), "Leo 1°");
    }

    #[test]
    fn selena_opposes_lilith() {
        let chart = table_chart();
        let lilith = chart.point(CelestialPoint::Lilith).unwrap();
        let selena = chart.point(CelestialPoint::Selena).unwrap();
        assert_relative_eq!(
            selena.longitude,
            (lilith.longitude + 180.0).rem_euclid(360.0),
            epsilon = 1e-9
        );
        assert_eq!(lilith.sign, ZodiacSign::Cancer);
        assert_eq!(selena.sign, ZodiacSign::Capricorn);
    }

    #[test]
    fn angles_are_classified() {
        let chart = table_chart();
        let asc = chart.angle(ChartAngle::Ascendant).unwrap();
        assert_eq!(asc.sign, ZodiacSign::Libra);
        assert_relative_eq!(asc.degree_in_sign, 7.002, epsilon = 1e-9);
        let mc = chart.angle(ChartAngle::Midheaven).unwrap();
        assert_eq!(mc.sign, ZodiacSign::Cancer);
        assert_relative_eq!(mc.degree_in_sign, 9.828, epsilon = 1e-9);
    }

    #[test]
    fn houses_follow_the_cusp_table() {
        let chart = table_chart();
        assert_eq!(chart.houses.len(), 12);
        assert_eq!(chart.houses[0].house, House::First);
        assert_eq!(chart.houses[0].sign, ZodiacSign::Libra);
        assert_relative_eq!(chart.houses[0].degree, 7.002, epsilon = 1e-9);
        assert_eq!(chart.houses[6].sign, ZodiacSign::Aries);
    }

    #[test]
    fn chart_round_trips_through_serde() {
        let chart = table_chart();
        let json = serde_json::to_string(&chart).unwrap();
        let back: NatalChart = serde_json::from_str(&json).unwrap();
        assert_eq!(chart, back);
    }

    struct SparseEphemeris;

    impl LongitudeProvider for SparseEphemeris {
        fn point_longitude(
            &self,
            _birth_info: &BirthInfo,
            point: CelestialPoint,
        ) -> Result<f64, AstrologyError> {
            match point {
                CelestialPoint::Sun => Ok(121.8),
                CelestialPoint::Moon => Ok(115.6),
                _ => Err(AstrologyError::PointUnavailable(point.name().to_string())),
            }
        }

        fn angle_longitude(
            &self,
            _birth_info: &BirthInfo,
            _angle: ChartAngle,
        ) -> Result<f64, AstrologyError> {
            Err(AstrologyError::PointUnavailable("no angles".to_string()))
        }

        fn house_cusps(&self, _birth_info: &BirthInfo) -> Result<[f64; 12], AstrologyError> {
            Err(AstrologyError::PointUnavailable("no cusps".to_string()))
        }
    }

    #[test]
    fn partial_provider_yields_partial_chart() {
        let chart = NatalChart::calculate("partial", table_birth_info(), &SparseEphemeris).unwrap();
        assert_eq!(chart.points.len(), 2);
        assert!(chart.point(CelestialPoint::Selena).is_none());
        assert!(chart.ascendant.is_none());
        assert!(chart.midheaven.is_none());
        assert!(chart.houses.is_empty());
    }

    struct BrokenEphemeris;

    impl LongitudeProvider for BrokenEphemeris {
        fn point_longitude(
            &self,
            _birth_info: &BirthInfo,
            _point: CelestialPoint,
        ) -> Result<f64, AstrologyError> {
            Ok(f64::NAN)
        }

        fn angle_longitude(
            &self,
            _birth_info: &BirthInfo,
            _angle: ChartAngle,
        ) -> Result<f64, AstrologyError> {
            Ok(f64::NAN)
        }

        fn house_cusps(&self, _birth_info: &BirthInfo) -> Result<[f64; 12], AstrologyError> {
            Ok([0.0; 12])
        }
    }

    #[test]
    fn non_finite_longitudes_abort_calculation() {
        match NatalChart::calculate("broken", table_birth_info(), &BrokenEphemeris) {
            Err(AstrologyError::InvalidInput(_)) => {}
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }
}
