use chrono::{DateTime, Utc};
use glam::DVec3;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::HeliostatError;

/// Compass azimuth (0° = north, clockwise) and elevation above the horizon,
/// both in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AnglePair {
    pub azimuth_from_north: f64,
    pub elevation: f64,
}

impl AnglePair {
    pub const fn new(azimuth_from_north: f64, elevation: f64) -> Self {
        Self {
            azimuth_from_north,
            elevation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub altitude_m: f64,
}

impl Location {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude_m: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolarPosition {
    pub timestamp: DateTime<Utc>,
    /// Degrees clockwise from north in [0, 360).
    pub azimuth: f64,
    /// Degrees above the horizon, negative at night.
    pub elevation: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    #[default]
    ClosedForm,
    Iterative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EphemerisKind {
    #[default]
    JulianDay,
    Declination,
}

/// Bounds and tolerances for the Nelder-Mead search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverOptions {
    pub max_iterations: usize,
    /// Simplex diameter, in degrees.
    pub x_tolerance: f64,
    /// Spread of objective values across the simplex.
    pub f_tolerance: f64,
    pub initial_step_deg: f64,
    /// Starting angles; the sun-facing orientation when absent.
    #[serde(skip)]
    pub initial_guess: Option<AnglePair>,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            x_tolerance: 1e-9,
            f_tolerance: 1e-12,
            initial_step_deg: 5.0,
            initial_guess: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MirrorSolution {
    pub angles: AnglePair,
    pub normal: DVec3,
    pub reflected: DVec3,
    /// Distance between the reflected ray and the target direction.
    pub residual: f64,
    /// Optimizer iterations; zero for the closed form.
    pub iterations: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrackingSample {
    pub timestamp: DateTime<Utc>,
    /// Sun angles in the site frame (azimuth offset applied).
    pub sun: AnglePair,
    pub mirror: AnglePair,
    pub normal: DVec3,
    pub reflected: DVec3,
    pub residual: f64,
    /// Perpendicular distance from the target point to the reflected ray.
    pub miss_distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleFailure {
    pub timestamp: DateTime<Utc>,
    pub sun: AnglePair,
    #[serde(serialize_with = "serialize_display")]
    pub error: HeliostatError,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayTrack {
    pub day_start: DateTime<Utc>,
    pub interval_minutes: u32,
    pub strategy: Strategy,
    pub samples: Vec<TrackingSample>,
    pub failures: Vec<SampleFailure>,
    pub generated_at: DateTime<Utc>,
}

fn serialize_display<S: Serializer>(err: &HeliostatError, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(err)
}
