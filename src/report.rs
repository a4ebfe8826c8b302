// src/report.rs
//
// Text rendering of a comparison result. Presentation only; every number
// shown here is already computed by the comparator.

use crate::reference::{AccuracyTier, ComparisonResult, CRITICAL_LIMIT_DEG};

const RULE: &str = "========================================";

/// Points that decide whether a chart is usable at all, flagged at a fixed
/// 1° limit regardless of the tolerance the aggregates used.
const CRITICAL_POINTS: [&str; 4] = ["Sun", "Moon", "Ascendant", "Midheaven"];

/// Render a comparison result as a plain-text accuracy report.
pub fn format_comparison_report(result: &ComparisonResult) -> String {
    if !result.has_data() {
        return format!(
            "{}\nACCURACY CHECK\n{}\nNo comparable data: the computed chart and the \
             reference table have no points in common.\n",
            RULE, RULE
        );
    }

    let summary = &result.summary;
    let mut report = String::new();
    report.push_str(&format!("{}\n", RULE));
    report.push_str("ACCURACY CHECK vs reference chart\n");
    report.push_str(&format!("{}\n", RULE));
    report.push_str(&format!("Points checked: {}\n", summary.total_checked));
    report.push_str(&format!("Sign match: {}%\n", summary.sign_match_percent));
    report.push_str(&format!(
        "Within {}°: {}%\n",
        summary.tolerance_used, summary.match_percent
    ));
    report.push_str(&format!(
        "Perfect matches: {}%\n",
        summary.perfect_match_percent
    ));

    let all: Vec<_> = result
        .entries
        .iter()
        .chain(result.ascendant.iter())
        .chain(result.midheaven.iter())
        .collect();

    report.push_str("\nDETAILED COMPARISON:\n");
    for tier in AccuracyTier::display_order() {
        let group: Vec<_> = all.iter().filter(|c| c.tier == tier).collect();
        if group.is_empty() {
            continue;
        }
        report.push_str(&format!("\n{}:\n", tier));
        for comparison in group {
            let sign_marker = if comparison.sign_match { "+" } else { "x" };
            report.push_str(&format!(
                "  [{}] {}: {:.3}° vs {:.3}° (Δ={:.3}°)\n",
                sign_marker,
                comparison.name,
                comparison.computed_longitude,
                comparison.reference_longitude,
                comparison.difference
            ));
        }
    }

    report.push_str("\nCRITICAL POINTS:\n");
    for name in CRITICAL_POINTS {
        if let Some(comparison) = result.lookup(name) {
            let status = if comparison.difference <= CRITICAL_LIMIT_DEG {
                "PASS"
            } else {
                "ATTENTION"
            };
            report.push_str(&format!(
                "  {} {}: Δ={:.3}° ({} {})\n",
                status,
                comparison.name,
                comparison.difference,
                comparison.reference_sign,
                comparison.reference_printed
            ));
        }
    }

    report.push_str(&format!("\n{}\n", RULE));
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::PointPosition;
    use crate::reference::{compare, ASTRO_COM_1987, DEFAULT_TOLERANCE};
    use crate::zodiac::classify;
    use crate::{BirthInfo, CelestialPoint, Location, NatalChart};
    use chrono::{TimeZone, Utc};

    fn chart_from_pairs(pairs: &[(CelestialPoint, f64)]) -> NatalChart {
        NatalChart {
            name: "test".to_string(),
            birth_info: BirthInfo::new(
                Utc.with_ymd_and_hms(1987, 7, 25, 12, 0, 0).unwrap(),
                Location::izhevsk(),
            ),
            points: pairs
                .iter()
                .map(|(point, lon)| PointPosition {
                    point: *point,
                    position: classify(*lon).unwrap(),
                })
                .collect(),
            ascendant: Some(classify(187.0).unwrap()),
            midheaven: Some(classify(99.8).unwrap()),
            houses: Vec::new(),
        }
    }

    #[test]
    fn report_groups_by_tier_in_fixed_order() {
        let chart = chart_from_pairs(&[
            (CelestialPoint::Sun, 121.8),    // Δ 0.026, perfect
            (CelestialPoint::Moon, 115.9),   // Δ 0.259, excellent
            (CelestialPoint::Saturn, 252.0), // Δ 3.028, divergent
        ]);
        let report = format_comparison_report(&compare(&chart, &ASTRO_COM_1987, DEFAULT_TOLERANCE));

        let perfect = report.find("PERFECT:").unwrap();
        let excellent = report.find("EXCELLENT:").unwrap();
        let divergent = report.find("DIVERGENT:").unwrap();
        assert!(perfect < excellent && excellent < divergent);
        assert!(!report.contains("GOOD:"));
        assert!(report.contains("[+] Sun: 121.800° vs 121.826° (Δ=0.026°)"));
        assert!(report.contains("[+] Saturn: 252.000° vs 255.028° (Δ=3.028°)"));
    }

    #[test]
    fn report_carries_summary_percentages() {
        let chart = chart_from_pairs(&[(CelestialPoint::Sun, 121.8)]);
        let report = format_comparison_report(&compare(&chart, &ASTRO_COM_1987, DEFAULT_TOLERANCE));
        assert!(report.contains("Points checked: 1"));
        assert!(report.contains("Sign match: 100%"));
        assert!(report.contains("Within 1°: 100%"));
    }

    #[test]
    fn critical_section_flags_large_differences() {
        let chart = chart_from_pairs(&[
            (CelestialPoint::Sun, 121.8),
            (CelestialPoint::Moon, 113.0), // Δ 2.641
        ]);
        let report = format_comparison_report(&compare(&chart, &ASTRO_COM_1987, DEFAULT_TOLERANCE));
        assert!(report.contains("PASS Sun"));
        assert!(report.contains("ATTENTION Moon"));
        assert!(report.contains("PASS Ascendant"));
        assert!(report.contains("PASS Midheaven"));
    }

    #[test]
    fn sign_mismatch_marker() {
        let chart = chart_from_pairs(&[(CelestialPoint::Moon, 121.0)]); // Leo vs Cancer
        let report = format_comparison_report(&compare(&chart, &ASTRO_COM_1987, DEFAULT_TOLERANCE));
        assert!(report.contains("[x] Moon"));
    }

    #[test]
    fn empty_result_renders_no_data_message() {
        let mut chart = chart_from_pairs(&[]);
        chart.ascendant = None;
        chart.midheaven = None;
        let report = format_comparison_report(&compare(&chart, &ASTRO_COM_1987, DEFAULT_TOLERANCE));
        assert!(report.contains("No comparable data"));
        assert!(!report.contains("CRITICAL"));
    }
}
