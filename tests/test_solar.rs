use chrono::{Duration, TimeZone, Utc};
use chrono_tz::Africa::Johannesburg;

use heliostat::angles::shortest_angle_delta;
use heliostat::solar::*;
use heliostat::types::{EphemerisKind, Location};

macro_rules! assert_approx {
    ($left:expr, $right:expr, $tol:expr) => {
        let (l, r) = ($left as f64, $right as f64);
        assert!(
            (l - r).abs() <= $tol,
            "assert_approx failed: left={}, right={}, diff={}, tol={}",
            l, r, (l - r).abs(), $tol
        );
    };
}

const DURBANVILLE: Location = Location::new(-33.8352, 18.6510);

// ── Julian Day ──

#[test]
fn test_julian_day_j2000() {
    assert_approx!(julian_day(2000, 1, 1, 12, 0, 0.0), 2451545.0, 1e-9);
}

#[test]
fn test_julian_day_known_dates() {
    assert_approx!(julian_day(2023, 8, 1, 12, 0, 0.0), 2460158.0, 1e-9);
    assert_approx!(julian_day(1999, 12, 31, 0, 0, 0.0), 2451543.5, 1e-9);
}

#[test]
fn test_julian_day_january_february_branch() {
    assert_approx!(julian_day(2024, 2, 29, 0, 0, 0.0), 2460369.5, 1e-9);
    let next = julian_day(2024, 3, 1, 0, 0, 0.0);
    assert_approx!(next - julian_day(2024, 2, 29, 0, 0, 0.0), 1.0, 1e-9);
}

#[test]
fn test_julian_day_fraction_of_day() {
    let base = julian_day(2023, 1, 15, 0, 0, 0.0);
    assert_approx!(julian_day(2023, 1, 15, 6, 30, 0.0) - base, 6.5 / 24.0, 1e-8);
    assert_approx!(julian_day(2023, 1, 15, 0, 0, 36.0) - base, 36.0 / 86400.0, 1e-8);
}

// ── Julian Day model ──

#[test]
fn test_durbanville_afternoon_is_daytime() {
    let (az, el) = solar_az_el(2023, 8, 1, 12, 0, 0.0, -33.8352, 18.6510, 0.0);
    assert!(el > 0.0, "elevation {}", el);
    assert!((0.0..360.0).contains(&az), "azimuth {}", az);
    // Southern winter afternoon: low sun, north-north-west.
    assert_approx!(az, 339.92, 0.05);
    assert_approx!(el, 35.67, 0.05);
}

#[test]
fn test_durbanville_midnight_is_below_horizon() {
    let (_, el) = solar_az_el(2023, 8, 1, 0, 0, 0.0, -33.8352, 18.6510, 0.0);
    assert!(el < 0.0, "elevation {}", el);
}

#[test]
fn test_london_solstice_noon() {
    let (az, el) = solar_az_el(2023, 6, 21, 12, 0, 0.0, 51.5, 0.0, 0.0);
    assert_approx!(el, 90.0 - 51.5 + 23.44, 0.2);
    assert_approx!(az, 180.0, 2.0);
}

#[test]
fn test_london_winter_solstice_noon() {
    let (az, el) = solar_az_el(2023, 12, 21, 12, 0, 0.0, 51.5, 0.0, 0.0);
    assert_approx!(el, 90.0 - 51.5 - 23.44, 0.2);
    assert_approx!(az, 180.0, 2.0);
}

#[test]
fn test_altitude_has_negligible_effect() {
    let (az0, el0) = solar_az_el(2023, 8, 1, 12, 0, 0.0, -33.8352, 18.6510, 0.0);
    let (az1, el1) = solar_az_el(2023, 8, 1, 12, 0, 0.0, -33.8352, 18.6510, 1000.0);
    assert_approx!(az0, az1, 1e-5);
    assert_approx!(el0, el1, 1e-5);
}

#[test]
fn test_azimuth_always_in_compass_range() {
    for (lat, lon) in [(-33.8352, 18.6510), (39.8, -89.6), (64.1, -21.9), (0.0, 0.0)] {
        for hour in 0..24 {
            let (az, el) = solar_az_el(2023, 3, 21, hour, 17, 0.0, lat, lon, 0.0);
            assert!((0.0..360.0).contains(&az), "azimuth {}", az);
            assert!((-90.0..=90.0).contains(&el), "elevation {}", el);
        }
    }
}

// ── Declination model ──

#[test]
fn test_day_of_year_leap_rules() {
    assert_eq!(day_of_year(2026, 1, 1), 1);
    assert_eq!(day_of_year(2026, 3, 21), 80);
    assert_eq!(day_of_year(2026, 12, 31), 365);
    assert_eq!(day_of_year(2024, 2, 29), 60);
    assert_eq!(day_of_year(2024, 12, 31), 366);
    assert_eq!(day_of_year(2000, 2, 29), 60);
    assert_eq!(day_of_year(1900, 3, 1), 60);
}

#[test]
fn test_solar_declination_bounded_all_days() {
    assert_approx!(solar_declination(172), 23.45, 0.5);
    assert_approx!(solar_declination(355), -23.45, 0.5);
    for n in 1..=365 {
        let decl = solar_declination(n);
        assert!((-23.45..=23.45).contains(&decl), "Day {}: {}", n, decl);
    }
}

#[test]
fn test_equation_of_time_bounded() {
    for n in 1..=365 {
        let eot = equation_of_time(n);
        assert!(eot > -15.0 && eot < 17.5, "Day {}: {}", n, eot);
    }
}

#[test]
fn test_models_agree_within_two_degrees() {
    let julian = JulianDayEphemeris;
    let declination = DeclinationEphemeris;
    for (lat, lon) in [(-33.8352, 18.6510), (39.8, -89.6), (51.5, 0.0)] {
        let location = Location::new(lat, lon);
        for (month, day) in [(1, 15), (3, 21), (6, 21), (8, 1), (10, 10), (12, 21)] {
            for hour in 0..24 {
                let at = Utc.with_ymd_and_hms(2023, month, day, hour, 0, 0).unwrap();
                let (az1, el1) = julian.azimuth_elevation(&at, &location);
                let (az2, el2) = declination.azimuth_elevation(&at, &location);
                if !(10.0..75.0).contains(&el1) {
                    continue;
                }
                assert!(
                    shortest_angle_delta(az1, az2).abs() < 2.0,
                    "{} {}-{} {}h: azimuth {} vs {}",
                    lat, month, day, hour, az1, az2
                );
                assert_approx!(el1, el2, 2.0);
            }
        }
    }
}

#[test]
fn test_ephemeris_for_kind() {
    assert_eq!(ephemeris_for(EphemerisKind::JulianDay).name(), "julian_day");
    assert_eq!(ephemeris_for(EphemerisKind::Declination).name(), "declination");
}

// ── Sampling ──

#[test]
fn test_solar_position_local_time_matches_utc() {
    let local = Johannesburg.with_ymd_and_hms(2023, 8, 1, 14, 0, 0).unwrap();
    let utc = Utc.with_ymd_and_hms(2023, 8, 1, 12, 0, 0).unwrap();
    let a = solar_position(&JulianDayEphemeris, &local, &DURBANVILLE);
    let b = solar_position(&JulianDayEphemeris, &utc, &DURBANVILLE);
    assert_eq!(a.timestamp, utc);
    assert_eq!(a, b);
}

#[test]
fn test_get_solar_position_keeps_daylight_only() {
    let start = Utc.with_ymd_and_hms(2023, 8, 1, 0, 0, 0).unwrap();
    let positions = get_solar_position(&JulianDayEphemeris, &start, &DURBANVILLE, 5);

    assert!((110..=140).contains(&positions.len()), "{} samples", positions.len());
    assert!(positions.iter().all(|p| p.elevation >= 0.0));
    assert!(positions.iter().all(|p| (0.0..360.0).contains(&p.azimuth)));
    for pair in positions.windows(2) {
        let gap = pair[1].timestamp - pair[0].timestamp;
        assert!(gap >= Duration::minutes(5));
        assert_eq!(gap.num_minutes() % 5, 0);
    }
    let first = positions.first().unwrap().timestamp;
    let last = positions.last().unwrap().timestamp;
    assert!(first > start && last < start + Duration::hours(24));
}

#[test]
fn test_get_solar_position_local_day_start() {
    let start = Johannesburg.with_ymd_and_hms(2023, 8, 1, 0, 0, 0).unwrap();
    let positions = get_solar_position(&JulianDayEphemeris, &start, &DURBANVILLE, 5);
    assert!((110..=140).contains(&positions.len()), "{} samples", positions.len());
    assert_eq!(
        positions[0].timestamp.date_naive(),
        Utc.with_ymd_and_hms(2023, 8, 1, 0, 0, 0).unwrap().date_naive()
    );
}

#[test]
fn test_polar_night_has_no_samples() {
    let start = Utc.with_ymd_and_hms(2023, 12, 21, 0, 0, 0).unwrap();
    let svalbard = Location::new(78.2, 15.6);
    assert!(get_solar_position(&JulianDayEphemeris, &start, &svalbard, 10).is_empty());
}
