use chrono::{DateTime, TimeZone, Utc};
use glam::DVec3;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::angles::{shortest_angle_delta, to_180_form};
use crate::error::HeliostatError;
use crate::solar::{ephemeris_for, get_solar_position};
use crate::solver::{solve, sun_ray, target_direction};
use crate::types::{
    AnglePair, DayTrack, EphemerisKind, Location, SampleFailure, SolarPosition, SolverOptions,
    Strategy, TrackingSample,
};
use crate::vector::{closest_point_distance, euclidean_vector_distance};

/// A single mirror aimed at a fixed target point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Heliostat {
    pub location: Location,
    /// Added to the sun azimuth to express it in the site frame.
    pub azimuth_offset_deg: f64,
    pub mirror_midpoint: DVec3,
    pub target_point: DVec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackingOptions {
    pub interval_minutes: u32,
    pub strategy: Strategy,
    pub ephemeris: EphemerisKind,
    /// Start each iterative solve from the previous sample's angles.
    pub warm_start: bool,
    pub solver: SolverOptions,
}

impl Default for TrackingOptions {
    fn default() -> Self {
        Self {
            interval_minutes: 5,
            strategy: Strategy::ClosedForm,
            ephemeris: EphemerisKind::JulianDay,
            warm_start: false,
            solver: SolverOptions::default(),
        }
    }
}

pub fn site_sun_angles(position: &SolarPosition, azimuth_offset_deg: f64) -> AnglePair {
    AnglePair::new(
        to_180_form(position.azimuth + azimuth_offset_deg),
        position.elevation,
    )
}

pub fn solve_sample(
    heliostat: &Heliostat,
    position: &SolarPosition,
    strategy: Strategy,
    solver: &SolverOptions,
) -> Result<TrackingSample, HeliostatError> {
    let target = target_direction(heliostat.mirror_midpoint, heliostat.target_point)?;
    let sun = site_sun_angles(position, heliostat.azimuth_offset_deg);
    let solution = solve(strategy, sun_ray(sun), target, solver)?;
    let miss_distance = closest_point_distance(
        heliostat.target_point,
        heliostat.mirror_midpoint,
        solution.reflected,
    )?;

    Ok(TrackingSample {
        timestamp: position.timestamp,
        sun,
        mirror: solution.angles,
        normal: solution.normal,
        reflected: solution.reflected,
        residual: euclidean_vector_distance(solution.reflected, target),
        miss_distance,
    })
}

/// Solves every above-horizon sample of the day starting at `day_start`.
///
/// A sample that fails is logged and recorded in `DayTrack::failures`; the
/// rest of the day is still solved. Only a target that coincides with the
/// mirror fails the whole call.
pub fn track_day<Tz: TimeZone>(
    heliostat: &Heliostat,
    day_start: &DateTime<Tz>,
    options: &TrackingOptions,
) -> Result<DayTrack, HeliostatError> {
    target_direction(heliostat.mirror_midpoint, heliostat.target_point)?;

    let ephemeris = ephemeris_for(options.ephemeris);
    let positions = get_solar_position(
        ephemeris,
        day_start,
        &heliostat.location,
        options.interval_minutes,
    );

    let results: Vec<(SolarPosition, Result<TrackingSample, HeliostatError>)> =
        if options.warm_start && options.strategy == Strategy::Iterative {
            solve_sequential(heliostat, &positions, options)
        } else {
            positions
                .par_iter()
                .map(|pos| {
                    (
                        *pos,
                        solve_sample(heliostat, pos, options.strategy, &options.solver),
                    )
                })
                .collect()
        };

    let mut samples = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for (pos, result) in results {
        match result {
            Ok(sample) => samples.push(sample),
            Err(error) => {
                warn!(timestamp = %pos.timestamp, %error, "skipping sample");
                failures.push(SampleFailure {
                    timestamp: pos.timestamp,
                    sun: site_sun_angles(&pos, heliostat.azimuth_offset_deg),
                    error,
                });
            }
        }
    }

    info!(
        samples = samples.len(),
        failures = failures.len(),
        strategy = ?options.strategy,
        "tracked day"
    );

    Ok(DayTrack {
        day_start: day_start.with_timezone(&Utc),
        interval_minutes: options.interval_minutes,
        strategy: options.strategy,
        samples,
        failures,
        generated_at: Utc::now(),
    })
}

fn solve_sequential(
    heliostat: &Heliostat,
    positions: &[SolarPosition],
    options: &TrackingOptions,
) -> Vec<(SolarPosition, Result<TrackingSample, HeliostatError>)> {
    let mut previous: Option<AnglePair> = options.solver.initial_guess;
    positions
        .iter()
        .map(|pos| {
            let solver = SolverOptions {
                initial_guess: previous,
                ..options.solver
            };
            let result = solve_sample(heliostat, pos, options.strategy, &solver);
            if let Ok(sample) = &result {
                debug!(timestamp = %pos.timestamp, "warm start for next sample");
                previous = Some(sample.mirror);
            }
            (*pos, result)
        })
        .collect()
}

/// Interpolates between two angles along the shorter arc; result in (-180, 180].
pub fn interpolate_angle(a1: f64, a2: f64, fraction: f64) -> f64 {
    to_180_form(a1 + shortest_angle_delta(a1, a2) * fraction)
}

/// Mirror angles at `at`, interpolated between the bracketing samples.
/// `None` outside the tracked interval.
pub fn lookup_mirror_angles(track: &DayTrack, at: DateTime<Utc>) -> Option<AnglePair> {
    let samples = &track.samples;
    let first = samples.first()?;
    let last = samples.last()?;
    if at < first.timestamp || at > last.timestamp {
        return None;
    }

    let idx_after = samples.partition_point(|s| s.timestamp < at);
    let after = &samples[idx_after];
    if after.timestamp == at || idx_after == 0 {
        return Some(after.mirror);
    }
    let before = &samples[idx_after - 1];

    let span = (after.timestamp - before.timestamp).num_milliseconds() as f64;
    let fraction = (at - before.timestamp).num_milliseconds() as f64 / span;
    Some(AnglePair::new(
        interpolate_angle(
            before.mirror.azimuth_from_north,
            after.mirror.azimuth_from_north,
            fraction,
        ),
        before.mirror.elevation + fraction * (after.mirror.elevation - before.mirror.elevation),
    ))
}
