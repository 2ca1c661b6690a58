//! Mapping between compass angle pairs and unit vectors.
//!
//! Frame: right-handed, `z` up. An angle pair `(A, E)` builds
//! `R = Rz(-A) * Rx(-E)`, a pitch about the lateral `x` axis followed by a
//! yaw about the vertical axis. The mirror normal for `(0, 0)` is
//! `(0, -1, 0)`; a ray arriving from a source at `(A, E)` travels along the
//! opposite base vector `(0, 1, 0)`.

use glam::{DMat3, DVec3};

use crate::angles::{to_180_form, to_degrees, to_radians};
use crate::error::HeliostatError;
use crate::types::AnglePair;
use crate::vector::normalize_named;

const NORMAL_BASE: DVec3 = DVec3::new(0.0, -1.0, 0.0);
const RAY_BASE: DVec3 = DVec3::new(0.0, 1.0, 0.0);

pub fn rotation_matrix_3d(theta_rad: f64, phi_rad: f64) -> DMat3 {
    DMat3::from_rotation_z(theta_rad) * DMat3::from_rotation_x(phi_rad)
}

fn rotation_for(angles: AnglePair) -> DMat3 {
    let theta = to_radians(-angles.azimuth_from_north);
    let phi = to_radians(-angles.elevation);
    rotation_matrix_3d(theta, phi)
}

/// Unit normal of a mirror facing `(azimuth, elevation)`.
pub fn angles_to_surface_normal(angles: AnglePair) -> DVec3 {
    rotation_for(angles) * NORMAL_BASE
}

/// Travel direction of a ray arriving from a source at `(azimuth, elevation)`.
pub fn angles_to_ray_direction(angles: AnglePair) -> DVec3 {
    rotation_for(angles) * RAY_BASE
}

/// Inverse of [`angles_to_surface_normal`]. The input need not be unit length.
///
/// Near elevation ±90° the azimuth is ill-conditioned; at exactly ±90° it
/// comes back as whatever `atan2` yields for the residual horizontal part.
pub fn normal_to_angles(normal: DVec3) -> Result<AnglePair, HeliostatError> {
    let n = normalize_named(normal, "normal")?;
    let elevation = to_degrees(n.z.clamp(-1.0, 1.0).asin());
    let azimuth = to_degrees((-n.x).atan2(-n.y));
    Ok(AnglePair::new(to_180_form(azimuth), to_180_form(elevation)))
}
