pub mod angles;
pub mod config;
pub mod error;
pub mod orientation;
pub mod reflection;
pub mod solar;
pub mod solver;
pub mod tracking;
pub mod types;
pub mod vector;

pub use angles::{normalize_angle, shortest_angle_delta, to_180_form, to_degrees, to_radians};

pub use config::HeliostatConfig;

pub use error::{ConfigError, HeliostatError};

pub use orientation::{
    angles_to_ray_direction, angles_to_surface_normal, normal_to_angles, rotation_matrix_3d,
};

pub use reflection::reflect;

pub use solar::{
    ephemeris_for, get_solar_position, julian_day, solar_az_el, solar_position,
    DeclinationEphemeris, JulianDayEphemeris, SolarEphemeris,
};

pub use solver::{
    minimize_nelder_mead, solve, solve_closed_form, solve_iterative, sun_ray, target_direction,
    Minimum,
};

pub use tracking::{
    interpolate_angle, lookup_mirror_angles, site_sun_angles, solve_sample, track_day, Heliostat,
    TrackingOptions,
};

pub use types::{
    AnglePair, DayTrack, EphemerisKind, Location, MirrorSolution, SampleFailure, SolarPosition,
    SolverOptions, Strategy, TrackingSample,
};

pub use vector::{
    closest_point_distance, dot, euclidean_distance, euclidean_vector_distance, normalize,
};
