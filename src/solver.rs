//! Mirror orientation solvers.
//!
//! Given the travel direction of the incoming sun ray and the direction from
//! the mirror to its target, find the mirror angles whose reflection of the
//! sun ray points at the target. The closed form bisects the reversed
//! incident ray and the target; the iterative form minimizes the distance
//! between reflected ray and target over the two angles and serves as a
//! cross-check.

use glam::{DVec2, DVec3};
use tracing::debug;

use crate::error::HeliostatError;
use crate::orientation::{angles_to_ray_direction, angles_to_surface_normal, normal_to_angles};
use crate::reflection::reflect;
use crate::types::{AnglePair, MirrorSolution, SolverOptions, Strategy};
use crate::vector::{euclidean_vector_distance, normalize_named};

/// Below this length the bisector of reversed incident and target is zero.
const ANTIPARALLEL_EPSILON: f64 = 1e-9;

/// Travel direction of sunlight for a sun at `sun` angles.
pub fn sun_ray(sun: AnglePair) -> DVec3 {
    angles_to_ray_direction(sun)
}

/// Unit direction from the mirror midpoint to the target point.
pub fn target_direction(mirror_midpoint: DVec3, target_point: DVec3) -> Result<DVec3, HeliostatError> {
    normalize_named(target_point - mirror_midpoint, "mirror-to-target offset")
}

pub fn solve(
    strategy: Strategy,
    incident: DVec3,
    target: DVec3,
    options: &SolverOptions,
) -> Result<MirrorSolution, HeliostatError> {
    match strategy {
        Strategy::ClosedForm => solve_closed_form(incident, target),
        Strategy::Iterative => solve_iterative(incident, target, options),
    }
}

pub fn solve_closed_form(incident: DVec3, target: DVec3) -> Result<MirrorSolution, HeliostatError> {
    let d = normalize_named(incident, "incident direction")?;
    let t = normalize_named(target, "target direction")?;

    let bisector = -d + t;
    if bisector.length() < ANTIPARALLEL_EPSILON {
        return Err(HeliostatError::NoSolution);
    }
    let normal = normalize_named(bisector, "bisector")?;
    let angles = normal_to_angles(normal)?;
    let reflected = reflect(d, normal)?;

    Ok(MirrorSolution {
        angles,
        normal,
        reflected,
        residual: euclidean_vector_distance(reflected, t),
        iterations: 0,
    })
}

pub fn solve_iterative(
    incident: DVec3,
    target: DVec3,
    options: &SolverOptions,
) -> Result<MirrorSolution, HeliostatError> {
    let d = normalize_named(incident, "incident direction")?;
    let t = normalize_named(target, "target direction")?;

    let start = match options.initial_guess {
        Some(guess) => guess,
        None => normal_to_angles(-d)?,
    };

    let objective = |p: DVec2| -> f64 {
        let normal = angles_to_surface_normal(AnglePair::new(p.x, p.y));
        match reflect(d, normal) {
            Ok(r) => euclidean_vector_distance(r, t),
            Err(_) => f64::INFINITY,
        }
    };

    let minimum = minimize_nelder_mead(
        objective,
        DVec2::new(start.azimuth_from_north, start.elevation),
        options,
    )?;

    // n and -n reflect identically; keep the face that looks at the sun.
    let mut normal = angles_to_surface_normal(AnglePair::new(minimum.point.x, minimum.point.y));
    if normal.dot(-d) < 0.0 {
        normal = -normal;
    }
    let angles = normal_to_angles(normal)?;
    let reflected = reflect(d, normal)?;
    let residual = euclidean_vector_distance(reflected, t);

    debug!(
        azimuth = angles.azimuth_from_north,
        elevation = angles.elevation,
        residual,
        iterations = minimum.iterations,
        "iterative solve converged"
    );

    Ok(MirrorSolution {
        angles,
        normal,
        reflected,
        residual,
        iterations: minimum.iterations,
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Minimum {
    pub point: DVec2,
    pub value: f64,
    pub iterations: usize,
}

/// Derivative-free Nelder-Mead search in two dimensions.
///
/// Stops once the simplex diameter is within `x_tolerance` and the spread of
/// objective values within `f_tolerance`. Hitting `max_iterations` first is a
/// `NonConvergence` error carrying the best value seen.
pub fn minimize_nelder_mead<F>(
    f: F,
    start: DVec2,
    options: &SolverOptions,
) -> Result<Minimum, HeliostatError>
where
    F: Fn(DVec2) -> f64,
{
    const REFLECTION: f64 = 1.0;
    const EXPANSION: f64 = 2.0;
    const CONTRACTION: f64 = 0.5;
    const SHRINK: f64 = 0.5;

    let step = options.initial_step_deg;
    let mut simplex = [start, start + DVec2::new(step, 0.0), start + DVec2::new(0.0, step)];
    let mut values = simplex.map(&f);

    for iteration in 0..options.max_iterations {
        sort_simplex(&mut simplex, &mut values);

        let diameter = simplex[0]
            .distance(simplex[1])
            .max(simplex[0].distance(simplex[2]));
        if diameter <= options.x_tolerance && values[2] - values[0] <= options.f_tolerance {
            return Ok(Minimum {
                point: simplex[0],
                value: values[0],
                iterations: iteration,
            });
        }

        let centroid = (simplex[0] + simplex[1]) * 0.5;
        let worst = simplex[2];

        let reflected = centroid + REFLECTION * (centroid - worst);
        let f_reflected = f(reflected);

        if f_reflected < values[0] {
            let expanded = centroid + EXPANSION * (centroid - worst);
            let f_expanded = f(expanded);
            if f_expanded < f_reflected {
                simplex[2] = expanded;
                values[2] = f_expanded;
            } else {
                simplex[2] = reflected;
                values[2] = f_reflected;
            }
            continue;
        }

        if f_reflected < values[1] {
            simplex[2] = reflected;
            values[2] = f_reflected;
            continue;
        }

        // Contract toward whichever of the reflected or worst point is better.
        let outside = f_reflected < values[2];
        let contracted = if outside {
            centroid + CONTRACTION * (reflected - centroid)
        } else {
            centroid + CONTRACTION * (worst - centroid)
        };
        let f_contracted = f(contracted);
        let accepted = if outside {
            f_contracted <= f_reflected
        } else {
            f_contracted < values[2]
        };
        if accepted {
            simplex[2] = contracted;
            values[2] = f_contracted;
            continue;
        }

        for i in 1..3 {
            simplex[i] = simplex[0] + SHRINK * (simplex[i] - simplex[0]);
            values[i] = f(simplex[i]);
        }
    }

    sort_simplex(&mut simplex, &mut values);
    Err(HeliostatError::NonConvergence {
        iterations: options.max_iterations,
        residual: values[0],
    })
}

fn sort_simplex(simplex: &mut [DVec2; 3], values: &mut [f64; 3]) {
    let mut order = [0usize, 1, 2];
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    let sorted_points = order.map(|i| simplex[i]);
    let sorted_values = order.map(|i| values[i]);
    *simplex = sorted_points;
    *values = sorted_values;
}
