// src/main.rs

use chrono::{TimeZone, Utc};
use natal_core::{
    compare, format_comparison_report, BirthInfo, EphemerisConfig, Location, NatalChart,
    ASTRO_COM_1987, DEFAULT_TOLERANCE,
};

fn main() {
    env_logger::init();

    // andrey, 25th july 1987 12:00, izhevsk russia
    let birth_info = BirthInfo::new(
        Utc.with_ymd_and_hms(1987, 7, 25, 12, 0, 0).unwrap(),
        Location::izhevsk(),
    );

    let provider = EphemerisConfig::default().build();
    match NatalChart::calculate("Andrey", birth_info, provider.as_ref()) {
        Ok(chart) => {
            println!("Natal chart for {}", chart.name);
            for point in &chart.points {
                println!(
                    "{}: {:.3}° = {} ({})",
                    point.point,
                    point.position.longitude,
                    point.position,
                    point.position.dms()
                );
            }
            if let Some(ascendant) = &chart.ascendant {
                println!("Ascendant: {:.3}° = {}", ascendant.longitude, ascendant);
            }
            if let Some(midheaven) = &chart.midheaven {
                println!("Midheaven: {:.3}° = {}", midheaven.longitude, midheaven);
            }

            let result = compare(&chart, &ASTRO_COM_1987, DEFAULT_TOLERANCE);
            println!("\n{}", format_comparison_report(&result));
        }
        Err(e) => eprintln!("Error: {}", e),
    }
}
