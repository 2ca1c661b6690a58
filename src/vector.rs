//! Small vector helpers over `glam::DVec3`.
//!
//! Directions and positions share the same type; the function names say
//! which interpretation applies.

use glam::DVec3;

use crate::error::HeliostatError;

/// Vectors shorter than this are treated as zero.
pub const DEGENERATE_EPSILON: f64 = 1e-12;

pub fn normalize(v: DVec3) -> Result<DVec3, HeliostatError> {
    normalize_named(v, "vector")
}

/// `normalize` with a label for the error message.
pub(crate) fn normalize_named(v: DVec3, context: &'static str) -> Result<DVec3, HeliostatError> {
    let length = v.length();
    if !length.is_finite() || length <= DEGENERATE_EPSILON {
        return Err(HeliostatError::DegenerateVector { context });
    }
    Ok(v / length)
}

pub fn dot(v1: DVec3, v2: DVec3) -> f64 {
    v1.dot(v2)
}

/// Distance between two positions.
pub fn euclidean_distance(p1: DVec3, p2: DVec3) -> f64 {
    p1.distance(p2)
}

/// `|v1 - v2|` for two directions. This is the solver's objective.
pub fn euclidean_vector_distance(v1: DVec3, v2: DVec3) -> f64 {
    (v1 - v2).length()
}

/// Perpendicular distance from `point` to the infinite line through
/// `line_origin` along `line_direction`.
pub fn closest_point_distance(
    point: DVec3,
    line_origin: DVec3,
    line_direction: DVec3,
) -> Result<f64, HeliostatError> {
    let direction = normalize_named(line_direction, "line direction")?;
    let offset = point - line_origin;
    let perpendicular = offset - direction * offset.dot(direction);
    Ok(perpendicular.length())
}
