use glam::DVec3;

use crate::error::HeliostatError;
use crate::vector::normalize_named;

/// Mirror reflection `r = d - 2 (d . n) n` of a ray direction `d` off a
/// surface with normal `n`. Both inputs are normalized first, so the result
/// is a unit vector. Either sign of `n` gives the same reflection.
pub fn reflect(incident_direction: DVec3, surface_normal: DVec3) -> Result<DVec3, HeliostatError> {
    let d = normalize_named(incident_direction, "incident direction")?;
    let n = normalize_named(surface_normal, "surface normal")?;
    Ok(d - 2.0 * d.dot(n) * n)
}
