use chrono::TimeZone;
use chrono_tz::Africa::Johannesburg;

use heliostat::{
    lookup_mirror_angles, solar_position, solve_sample, track_day, HeliostatConfig,
    JulianDayEphemeris, Strategy, TrackingOptions,
};

fn main() {
    let config = HeliostatConfig::default();
    let heliostat = config.heliostat();

    let dt = Johannesburg.with_ymd_and_hms(2023, 8, 1, 14, 0, 0).unwrap();
    let pos = solar_position(&JulianDayEphemeris, &dt, &heliostat.location);

    println!("=== Heliostat Calculation Example ===");
    println!(
        "Location: Durbanville ({:.4}°S, {:.4}°E)",
        -heliostat.location.latitude, heliostat.location.longitude
    );
    println!("Date/Time: {} ({} UTC)", dt, pos.timestamp);
    println!();
    println!("--- Solar Position ---");
    println!("Azimuth: {:.2}° (0°=N, 90°=E, 180°=S)", pos.azimuth);
    println!("Elevation: {:.2}°", pos.elevation);
    println!();

    println!("--- Mirror Orientation ---");
    println!(
        "Mirror midpoint: {:?}  Target: {:?}",
        heliostat.mirror_midpoint.to_array(),
        heliostat.target_point.to_array()
    );
    for strategy in [Strategy::ClosedForm, Strategy::Iterative] {
        match solve_sample(&heliostat, &pos, strategy, &config.solver) {
            Ok(sample) => println!(
                "{:?}: azimuth {:.4}°, elevation {:.4}°, residual {:.2e}, miss {:.2e} m",
                strategy,
                sample.mirror.azimuth_from_north,
                sample.mirror.elevation,
                sample.residual,
                sample.miss_distance
            ),
            Err(e) => println!("{:?}: {}", strategy, e),
        }
    }
    println!();

    let start = Johannesburg.with_ymd_and_hms(2023, 8, 1, 0, 0, 0).unwrap();
    let track = match track_day(&heliostat, &start, &TrackingOptions::default()) {
        Ok(track) => track,
        Err(e) => {
            println!("Tracking failed: {}", e);
            return;
        }
    };
    println!("--- Day Track ---");
    println!(
        "{} samples, {} failures",
        track.samples.len(),
        track.failures.len()
    );
    if let (Some(first), Some(last)) = (track.samples.first(), track.samples.last()) {
        println!("First sample: {}", first.timestamp.with_timezone(&Johannesburg));
        println!("Last sample:  {}", last.timestamp.with_timezone(&Johannesburg));
    }
    let at = Johannesburg
        .with_ymd_and_hms(2023, 8, 1, 14, 2, 30)
        .unwrap()
        .with_timezone(&chrono::Utc);
    if let Some(angles) = lookup_mirror_angles(&track, at) {
        println!(
            "Interpolated at 14:02:30: azimuth {:.4}°, elevation {:.4}°",
            angles.azimuth_from_north, angles.elevation
        );
    }
}
