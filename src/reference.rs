// src/reference.rs
//
// Hand-curated reference chart and the accuracy comparator. The table is
// transcribed from a published chart for one birth record and is never
// mutated at run time.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{CelestialPoint, ChartAngle, NatalChart, ZodiacSign};

/// Default tolerance, in degrees, for counting a point as matched.
pub const DEFAULT_TOLERANCE: f64 = 1.0;

/// Threshold for the pass/attention flag on critical points, independent of
/// the tolerance used for aggregate statistics.
pub const CRITICAL_LIMIT_DEG: f64 = 1.0;

// ---------------------------
// ## Reference data
// ---------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceEntry {
    pub point: CelestialPoint,
    pub longitude: f64,
    pub sign: ZodiacSign,
    /// Position as printed in the source chart, e.g. `1°49'37"`.
    pub printed: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceAngle {
    pub angle: ChartAngle,
    pub longitude: f64,
    pub sign: ZodiacSign,
    pub printed: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceChart {
    pub subject: &'static str,
    pub date: &'static str,
    pub time: &'static str,
    pub city: &'static str,
    /// Latitude, longitude.
    pub coords: (f64, f64),
    pub points: &'static [ReferenceEntry],
    pub ascendant: ReferenceAngle,
    pub midheaven: ReferenceAngle,
    pub house_system: &'static str,
    pub source: &'static str,
}

impl ReferenceChart {
    pub fn entry(&self, point: CelestialPoint) -> Option<&ReferenceEntry> {
        self.points.iter().find(|e| e.point == point)
    }

    pub fn angle(&self, angle: ChartAngle) -> &ReferenceAngle {
        match angle {
            ChartAngle::Ascendant => &self.ascendant,
            ChartAngle::Midheaven => &self.midheaven,
        }
    }
}

/// Reference chart for the 1987-07-25 12:00 Izhevsk record.
pub const ASTRO_COM_1987: ReferenceChart = ReferenceChart {
    subject: "Andrey",
    date: "1987-07-25",
    time: "12:00",
    city: "Izhevsk, RU",
    coords: (56.85, 53.2333),
    points: &[
        ReferenceEntry {
            point: CelestialPoint::Sun,
            longitude: 121.826,
            sign: ZodiacSign::Leo,
            printed: "1°49'37\"",
        },
        ReferenceEntry {
            point: CelestialPoint::Moon,
            longitude: 115.641,
            sign: ZodiacSign::Cancer,
            printed: "25°38'26\"",
        },
        ReferenceEntry {
            point: CelestialPoint::Mercury,
            longitude: 101.974,
            sign: ZodiacSign::Cancer,
            printed: "11°58'27\"",
        },
        ReferenceEntry {
            point: CelestialPoint::Venus,
            longitude: 113.859,
            sign: ZodiacSign::Cancer,
            printed: "23°51'33\"",
        },
        ReferenceEntry {
            point: CelestialPoint::Mars,
            longitude: 121.852,
            sign: ZodiacSign::Leo,
            printed: "1°51'6\"",
        },
        ReferenceEntry {
            point: CelestialPoint::Jupiter,
            longitude: 28.676,
            sign: ZodiacSign::Aries,
            printed: "28°40'35\"",
        },
        ReferenceEntry {
            point: CelestialPoint::Saturn,
            longitude: 255.028,
            sign: ZodiacSign::Sagittarius,
            printed: "15°1'42\"",
        },
        ReferenceEntry {
            point: CelestialPoint::Uranus,
            longitude: 263.303,
            sign: ZodiacSign::Sagittarius,
            printed: "23°18'13\"",
        },
        ReferenceEntry {
            point: CelestialPoint::Neptune,
            longitude: 275.940,
            sign: ZodiacSign::Capricorn,
            printed: "5°56'24\"",
        },
        ReferenceEntry {
            point: CelestialPoint::Pluto,
            longitude: 217.163,
            sign: ZodiacSign::Scorpio,
            printed: "7°9'47\"",
        },
        ReferenceEntry {
            point: CelestialPoint::Node,
            longitude: 4.360,
            sign: ZodiacSign::Aries,
            printed: "4°21'37\"",
        },
        ReferenceEntry {
            point: CelestialPoint::Chiron,
            longitude: 85.647,
            sign: ZodiacSign::Gemini,
            printed: "25°38'51\"",
        },
        ReferenceEntry {
            point: CelestialPoint::Lilith,
            longitude: 95.0,
            sign: ZodiacSign::Cancer,
            printed: "5°0'0\"",
        },
        ReferenceEntry {
            point: CelestialPoint::Selena,
            longitude: 275.0,
            sign: ZodiacSign::Capricorn,
            printed: "5°0'0\"",
        },
    ],
    ascendant: ReferenceAngle {
        angle: ChartAngle::Ascendant,
        longitude: 187.002,
        sign: ZodiacSign::Libra,
        printed: "7°0'7\"",
    },
    midheaven: ReferenceAngle {
        angle: ChartAngle::Midheaven,
        longitude: 99.828,
        sign: ZodiacSign::Cancer,
        printed: "9°49'40\"",
    },
    house_system: "Placidus",
    source: "astro.com PDF 2026-01-06",
};

// ---------------------------
// ## Comparator
// ---------------------------

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccuracyTier {
    Perfect,
    Excellent,
    Good,
    Acceptable,
    Divergent,
}

impl AccuracyTier {
    /// Tier for an absolute degree difference, tightest band first.
    pub fn from_difference(difference: f64) -> Self {
        if difference <= 0.1 {
            AccuracyTier::Perfect
        } else if difference <= 0.5 {
            AccuracyTier::Excellent
        } else if difference <= 1.0 {
            AccuracyTier::Good
        } else if difference <= 2.0 {
            AccuracyTier::Acceptable
        } else {
            AccuracyTier::Divergent
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            AccuracyTier::Perfect => "PERFECT",
            AccuracyTier::Excellent => "EXCELLENT",
            AccuracyTier::Good => "GOOD",
            AccuracyTier::Acceptable => "ACCEPTABLE",
            AccuracyTier::Divergent => "DIVERGENT",
        }
    }

    /// Fixed display order for grouped report output.
    pub fn display_order() -> impl Iterator<Item = AccuracyTier> {
        [
            AccuracyTier::Perfect,
            AccuracyTier::Excellent,
            AccuracyTier::Good,
            AccuracyTier::Acceptable,
            AccuracyTier::Divergent,
        ]
        .iter()
        .copied()
    }
}

impl fmt::Display for AccuracyTier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointComparison {
    pub name: &'static str,
    pub computed_longitude: f64,
    pub reference_longitude: f64,
    /// Absolute degree difference between the two longitudes.
    pub difference: f64,
    pub computed_sign: ZodiacSign,
    pub reference_sign: ZodiacSign,
    pub sign_match: bool,
    pub tier: AccuracyTier,
    pub reference_printed: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComparisonSummary {
    pub total_checked: usize,
    pub matched: usize,
    pub sign_matches: usize,
    pub perfect_matches: usize,
    /// Percentages over the compared bodies, rounded to one decimal.
    pub match_percent: f64,
    pub sign_match_percent: f64,
    pub perfect_match_percent: f64,
    pub tolerance_used: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    /// Per-body comparisons, in reference-table order.
    pub entries: Vec<PointComparison>,
    /// Chart angles, compared outside the body loop and the aggregates.
    pub ascendant: Option<PointComparison>,
    pub midheaven: Option<PointComparison>,
    pub summary: ComparisonSummary,
}

impl ComparisonResult {
    /// False when nothing overlapped between the computed chart and the
    /// reference table — the formatter renders a dedicated message then.
    pub fn has_data(&self) -> bool {
        self.summary.total_checked > 0 || self.ascendant.is_some() || self.midheaven.is_some()
    }

    /// Comparison for a point or angle by display name.
    pub fn lookup(&self, name: &str) -> Option<&PointComparison> {
        self.entries
            .iter()
            .chain(self.ascendant.iter())
            .chain(self.midheaven.iter())
            .find(|c| c.name == name)
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn compare_pair(
    name: &'static str,
    printed: &'static str,
    computed_longitude: f64,
    computed_sign: ZodiacSign,
    reference_longitude: f64,
    reference_sign: ZodiacSign,
) -> PointComparison {
    // Plain absolute difference on the 0..360 scale; both sides of every
    // reference pair sit well away from the wrap seam.
    let difference = (computed_longitude - reference_longitude).abs();
    PointComparison {
        name,
        computed_longitude,
        reference_longitude,
        difference,
        computed_sign,
        reference_sign,
        sign_match: computed_sign == reference_sign,
        tier: AccuracyTier::from_difference(difference),
        reference_printed: printed,
    }
}

/// Compare a computed chart against a reference table.
///
/// Bodies present in only one of the two sides are skipped; the aggregates
/// run over the overlap. A body counts as matched only when its sign matches
/// and its difference is within `tolerance`. The chart angles are compared
/// under their own identities and stay out of the aggregate counts.
pub fn compare(chart: &NatalChart, reference: &ReferenceChart, tolerance: f64) -> ComparisonResult {
    let mut entries = Vec::new();
    let mut matched = 0;
    let mut sign_matches = 0;
    let mut perfect_matches = 0;

    for reference_entry in reference.points {
        let computed = match chart.point(reference_entry.point) {
            Some(position) => position,
            None => continue,
        };
        let comparison = compare_pair(
            reference_entry.point.name(),
            reference_entry.printed,
            computed.longitude,
            computed.sign,
            reference_entry.longitude,
            reference_entry.sign,
        );
        if comparison.sign_match && comparison.difference <= tolerance {
            matched += 1;
        }
        if comparison.sign_match {
            sign_matches += 1;
        }
        if comparison.tier == AccuracyTier::Perfect {
            perfect_matches += 1;
        }
        entries.push(comparison);
    }

    let angle_comparison = |angle: ChartAngle| {
        chart.angle(angle).map(|computed| {
            let reference_angle = reference.angle(angle);
            compare_pair(
                angle.name(),
                reference_angle.printed,
                computed.longitude,
                computed.sign,
                reference_angle.longitude,
                reference_angle.sign,
            )
        })
    };
    let ascendant = angle_comparison(ChartAngle::Ascendant);
    let midheaven = angle_comparison(ChartAngle::Midheaven);

    let total_checked = entries.len();
    let (match_percent, sign_match_percent, perfect_match_percent) = if total_checked > 0 {
        let total = total_checked as f64;
        (
            round1(matched as f64 / total * 100.0),
            round1(sign_matches as f64 / total * 100.0),
            round1(perfect_matches as f64 / total * 100.0),
        )
    } else {
        (0.0, 0.0, 0.0)
    };

    ComparisonResult {
        entries,
        ascendant,
        midheaven,
        summary: ComparisonSummary {
            total_checked,
            matched,
            sign_matches,
            perfect_matches,
            match_percent,
            sign_match_percent,
            perfect_match_percent,
            tolerance_used: tolerance,
        },
    }
}
