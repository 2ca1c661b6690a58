//! Sun position for a UTC instant and a site.
//!
//! Two low-precision models are provided behind [`SolarEphemeris`]:
//! a Keplerian orbit model driven by the Julian Day (arcminute level), and a
//! day-of-year declination model with an equation-of-time correction
//! (degree level).

use chrono::{DateTime, Datelike, Duration, TimeZone, Timelike, Utc};
use tracing::debug;

use crate::angles::{normalize_angle, to_degrees, to_radians};
use crate::types::{EphemerisKind, Location, SolarPosition};

pub const EARTH_AXIAL_TILT: f64 = 23.45;
pub const DEGREES_PER_HOUR: f64 = 15.0;
/// Julian Day of 1999-12-31 00:00 UTC, the epoch of the orbital elements.
const ORBIT_EPOCH_JD: f64 = 2451543.5;
const METRES_PER_AU: f64 = 1.495_978_707e11;

pub trait SolarEphemeris: Sync {
    /// Compass azimuth in [0, 360) and elevation in degrees.
    fn azimuth_elevation(&self, at: &DateTime<Utc>, location: &Location) -> (f64, f64);

    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JulianDayEphemeris;

#[derive(Debug, Clone, Copy, Default)]
pub struct DeclinationEphemeris;

impl SolarEphemeris for JulianDayEphemeris {
    fn azimuth_elevation(&self, at: &DateTime<Utc>, location: &Location) -> (f64, f64) {
        solar_az_el(
            at.year(),
            at.month(),
            at.day(),
            at.hour(),
            at.minute(),
            seconds_of(at),
            location.latitude,
            location.longitude,
            location.altitude_m,
        )
    }

    fn name(&self) -> &'static str {
        "julian_day"
    }
}

impl SolarEphemeris for DeclinationEphemeris {
    fn azimuth_elevation(&self, at: &DateTime<Utc>, location: &Location) -> (f64, f64) {
        let n = day_of_year(at.year(), at.month(), at.day());
        let utc_hours = fractional_hours(at.hour(), at.minute(), seconds_of(at));
        let eot = equation_of_time(n);
        let decl = solar_declination(n);
        let lst = (utc_hours + utc_lst_correction(location.longitude, eot)).rem_euclid(24.0);
        let ha = hour_angle(lst);
        let zenith = solar_zenith_angle(location.latitude, decl, ha);
        (solar_azimuth(location.latitude, decl, ha), 90.0 - zenith)
    }

    fn name(&self) -> &'static str {
        "declination"
    }
}

pub fn ephemeris_for(kind: EphemerisKind) -> &'static dyn SolarEphemeris {
    match kind {
        EphemerisKind::JulianDay => &JulianDayEphemeris,
        EphemerisKind::Declination => &DeclinationEphemeris,
    }
}

pub fn solar_position<Tz: TimeZone>(
    ephemeris: &dyn SolarEphemeris,
    at: &DateTime<Tz>,
    location: &Location,
) -> SolarPosition {
    let utc = at.with_timezone(&Utc);
    let (azimuth, elevation) = ephemeris.azimuth_elevation(&utc, location);
    SolarPosition {
        timestamp: utc,
        azimuth,
        elevation,
    }
}

/// Samples the 24 hours from `day_start` every `interval_minutes` and keeps
/// the samples with the sun on or above the horizon.
pub fn get_solar_position<Tz: TimeZone>(
    ephemeris: &dyn SolarEphemeris,
    day_start: &DateTime<Tz>,
    location: &Location,
    interval_minutes: u32,
) -> Vec<SolarPosition> {
    let start = day_start.with_timezone(&Utc);
    let step = interval_minutes.max(1);
    let positions: Vec<SolarPosition> = (0..1440u32)
        .step_by(step as usize)
        .map(|minute| start + Duration::minutes(i64::from(minute)))
        .map(|at| solar_position(ephemeris, &at, location))
        .filter(|pos| pos.elevation >= 0.0)
        .collect();

    debug!(
        ephemeris = ephemeris.name(),
        %start,
        samples = positions.len(),
        "sampled solar day"
    );
    positions
}

// ── Julian Day orbit model ──

pub fn julian_day(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: f64) -> f64 {
    let (y, m) = if month <= 2 {
        (year - 1, month + 12)
    } else {
        (year, month)
    };
    let y = f64::from(y);
    let m = f64::from(m);
    let century = (y / 100.0).floor();
    (365.25 * (y + 4716.0)).floor() + (30.6001 * (m + 1.0)).floor() + 2.0 - century
        + (century / 4.0).floor()
        + f64::from(day)
        - 1524.5
        + fractional_hours(hour, minute, second) / 24.0
}

#[allow(clippy::too_many_arguments)]
pub fn solar_az_el(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: f64,
    latitude: f64,
    longitude: f64,
    altitude_m: f64,
) -> (f64, f64) {
    let d = julian_day(year, month, day, hour, minute, second) - ORBIT_EPOCH_JD;

    // Orbital elements: perihelion longitude, eccentricity, mean anomaly.
    let w = 282.9404 + 4.70935e-5 * d;
    let e = 0.016709 - 1.151e-9 * d;
    let mean_anomaly = (356.0470 + 0.9856002585 * d) % 360.0;
    let mean_longitude = w + mean_anomaly;
    let obliquity = to_radians(23.4393 - 3.563e-7 * d);

    let m_rad = to_radians(mean_anomaly);
    let eccentric_anomaly = mean_anomaly + to_degrees(e * m_rad.sin() * (1.0 + e * m_rad.cos()));
    let ea_rad = to_radians(eccentric_anomaly);

    let x = ea_rad.cos() - e;
    let y = ea_rad.sin() * (1.0 - e * e).sqrt();
    let r = x.hypot(y);
    let true_longitude = to_radians(to_degrees(y.atan2(x)) + w);

    let x_ecl = r * true_longitude.cos();
    let y_ecl = r * true_longitude.sin();

    let x_eq = x_ecl;
    let y_eq = y_ecl * obliquity.cos();
    let z_eq = y_ecl * obliquity.sin();

    let r = (x_eq * x_eq + y_eq * y_eq + z_eq * z_eq).sqrt() - altitude_m / METRES_PER_AU;
    let right_ascension = to_degrees(y_eq.atan2(x_eq));
    let delta = (z_eq / r).clamp(-1.0, 1.0).asin();

    let gmst0 = ((mean_longitude + 180.0) % 360.0) / DEGREES_PER_HOUR;
    let sidereal_time = gmst0 + fractional_hours(hour, minute, second) + longitude / DEGREES_PER_HOUR;
    let ha = to_radians(sidereal_time * DEGREES_PER_HOUR - right_ascension);

    let x = ha.cos() * delta.cos();
    let y = ha.sin() * delta.cos();
    let z = delta.sin();

    let colatitude = to_radians(90.0 - latitude);
    let x_hor = x * colatitude.cos() - z * colatitude.sin();
    let y_hor = y;
    let z_hor = x * colatitude.sin() + z * colatitude.cos();

    let azimuth = normalize_angle(to_degrees(y_hor.atan2(x_hor)) + 180.0);
    let elevation = to_degrees(z_hor.clamp(-1.0, 1.0).asin());
    (azimuth, elevation)
}

// ── Declination model ──

pub fn leap_year(year: i32) -> bool {
    (year % 400 == 0) || (year % 4 == 0 && year % 100 != 0)
}

pub fn day_of_year(year: i32, month: u32, day: u32) -> i32 {
    let days_in_months = [
        31,
        if leap_year(year) { 29 } else { 28 },
        31, 30, 31, 30, 31, 31, 30, 31, 30, 31,
    ];
    let before: u32 = days_in_months[..(month.clamp(1, 12) - 1) as usize].iter().sum();
    (before + day) as i32
}

pub fn equation_of_time(n: i32) -> f64 {
    let b = to_radians((n - 1) as f64 * (360.0 / 365.0));
    229.18
        * (0.000075 + 0.001868 * b.cos()
            - 0.032077 * b.sin()
            - 0.014615 * (2.0 * b).cos()
            - 0.040849 * (2.0 * b).sin())
}

pub fn solar_declination(n: i32) -> f64 {
    EARTH_AXIAL_TILT * to_radians(360.0 * ((284 + n) as f64 / 365.0)).sin()
}

/// Hours to add to UTC to get local solar time.
pub fn utc_lst_correction(longitude: f64, eot: f64) -> f64 {
    (4.0 * longitude + eot) / 60.0
}

pub fn hour_angle(local_solar_time: f64) -> f64 {
    DEGREES_PER_HOUR * (local_solar_time - 12.0)
}

pub fn solar_zenith_angle(latitude: f64, declination: f64, hour_angle: f64) -> f64 {
    let lat_rad = to_radians(latitude);
    let dec_rad = to_radians(declination);
    let ha_rad = to_radians(hour_angle);
    let cos_zenith = lat_rad.sin() * dec_rad.sin() + lat_rad.cos() * dec_rad.cos() * ha_rad.cos();
    to_degrees(cos_zenith.clamp(-1.0, 1.0).acos())
}

pub fn solar_azimuth(latitude: f64, declination: f64, hour_angle: f64) -> f64 {
    let lat_rad = to_radians(latitude);
    let dec_rad = to_radians(declination);
    let ha_rad = to_radians(hour_angle);
    let sin_az = -dec_rad.cos() * ha_rad.sin();
    let cos_az = dec_rad.sin() * lat_rad.cos() - dec_rad.cos() * lat_rad.sin() * ha_rad.cos();
    normalize_angle(to_degrees(sin_az.atan2(cos_az)))
}

fn fractional_hours(hour: u32, minute: u32, second: f64) -> f64 {
    f64::from(hour) + f64::from(minute) / 60.0 + second / 3600.0
}

fn seconds_of(at: &DateTime<Utc>) -> f64 {
    f64::from(at.second()) + f64::from(at.nanosecond()) / 1e9
}
