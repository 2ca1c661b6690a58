use std::f64::consts::PI;

pub fn to_radians(deg: f64) -> f64 {
    deg * (PI / 180.0)
}

pub fn to_degrees(rad: f64) -> f64 {
    rad * (180.0 / PI)
}

/// Wraps an angle into [0, 360).
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360.0
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Wraps an angle into (-180, 180]. Both -180 and 180 map to 180.
pub fn to_180_form(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Signed shortest rotation from `from` to `to`, in (-180, 180].
pub fn shortest_angle_delta(from: f64, to: f64) -> f64 {
    to_180_form(to - from)
}
