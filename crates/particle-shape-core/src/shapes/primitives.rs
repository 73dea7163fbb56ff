//! Shape generators producing point sets in a roughly `[-1, 1]³` local space.
//!
//! Lattice shapes are deterministic in `n`; the galaxy variants draw from the
//! supplied random source. Grid-based shapes may return fewer than `n` points
//! but never more.

use std::f32::consts::{PI, TAU};

use glam::Vec3;
use rand::Rng;

use crate::math::{centered, golden_angle};

/// `i / (steps - 1)` remapped to `[-1, 1]`; a single step sits at the centre.
fn grid_coord(i: usize, steps: usize) -> f32 {
    if steps > 1 {
        (i as f32 / (steps - 1) as f32) * 2.0 - 1.0
    } else {
        0.0
    }
}

fn ceil_div(a: usize, b: usize) -> usize {
    if b == 0 {
        0
    } else {
        a.div_ceil(b)
    }
}

/// Fibonacci lattice on the unit sphere.
pub fn sphere(n: usize) -> Vec<Vec3> {
    if n == 1 {
        return vec![Vec3::Y];
    }
    let golden = golden_angle();
    (0..n)
        .map(|i| {
            let y = 1.0 - (i as f32 / (n - 1) as f32) * 2.0;
            let radius_at_y = (1.0 - y * y).max(0.0).sqrt();
            let theta = golden * i as f32;
            Vec3::new(theta.cos() * radius_at_y, y, theta.sin() * radius_at_y)
        })
        .collect()
}

/// Six face grids of the `[-1, 1]³` cube, truncated to exactly `n`.
pub fn cube(n: usize) -> Vec<Vec3> {
    let per_face = ceil_div(n, 6);
    let grid = (per_face as f64).sqrt().ceil() as usize;
    let mut points = Vec::with_capacity(grid * grid * 6);

    for (axis, value) in [(0, 1.0), (0, -1.0), (1, 1.0), (1, -1.0), (2, 1.0), (2, -1.0)] {
        for i in 0..grid {
            for j in 0..grid {
                let u = grid_coord(i, grid);
                let v = grid_coord(j, grid);
                points.push(match axis {
                    0 => Vec3::new(value, u, v),
                    1 => Vec3::new(u, value, v),
                    _ => Vec3::new(u, v, value),
                });
            }
        }
    }
    points.truncate(n);
    points
}

/// Three-arm spiral whose disk thickens towards the core.
pub fn galaxy<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<Vec3> {
    let arms = 3;
    let turns = 2.5_f32;
    let arm_spread = 0.3_f32;

    (0..n)
        .map(|i| {
            let t = i as f32 / n as f32;
            let arm_offset = ((i % arms) as f32 / arms as f32) * TAU;
            let angle = arm_offset + t * turns * TAU;
            let angle_noise = centered(rng) * arm_spread * (1.0 - t * 0.5);
            let r = t + centered(rng) * 0.1;
            let theta = angle + angle_noise;
            let y = centered(rng) * 0.08 * (1.0 + (1.0 - t) * 2.0);
            Vec3::new(r * theta.cos(), y, r * theta.sin())
        })
        .collect()
}

/// Bulge, logarithmic arms and a thin disk, concatenated in that order.
///
/// Proportions are 15% bulge, 65% arms and the remainder disk.
pub fn spiral_galaxy<R: Rng + ?Sized>(n: usize, arms: u32, rng: &mut R) -> Vec<Vec3> {
    let arms = arms.max(1) as usize;
    let bulge_count = (n as f64 * 0.15).floor() as usize;
    let arm_count = (n as f64 * 0.65).floor() as usize;
    let disk_count = n - bulge_count - arm_count;
    let mut points = Vec::with_capacity(n);

    for _ in 0..bulge_count {
        let r = 0.12 * rng.gen::<f32>().cbrt();
        let theta = rng.gen::<f32>() * TAU;
        let phi = (2.0 * rng.gen::<f32>() - 1.0).acos();
        points.push(Vec3::new(
            r * phi.sin() * theta.cos(),
            r * 0.4 * phi.cos(),
            r * phi.sin() * theta.sin(),
        ));
    }

    for i in 0..arm_count {
        let arm_offset = ((i % arms) as f32 / arms as f32) * TAU;
        let t = rng.gen::<f32>();
        let log_r = 0.08 + t * 0.92;
        let wind = arm_offset + (1.0 + log_r * 10.0).ln() * 1.8;
        let spread = 0.06 + t * 0.15;
        let angle = wind + centered(rng) * spread;
        let r = log_r + centered(rng) * 0.06;
        let y_spread = 0.03 * (1.0 - t * 0.7);
        points.push(Vec3::new(r * angle.cos(), centered(rng) * y_spread, r * angle.sin()));
    }

    for _ in 0..disk_count {
        let r = rng.gen::<f32>().sqrt();
        let angle = rng.gen::<f32>() * TAU;
        let y_spread = 0.04 * (1.0 - r * 0.5);
        points.push(Vec3::new(r * angle.cos(), centered(rng) * y_spread, r * angle.sin()));
    }

    points
}

/// Torus with major radius 0.7 and minor radius 0.3 lying in the XZ plane.
pub fn torus(n: usize) -> Vec<Vec3> {
    let big_r = 0.7_f32;
    let small_r = 0.3_f32;
    let cols = (n as f32 * big_r / small_r).sqrt().ceil() as usize;
    let rows = ceil_div(n, cols);
    let mut points = Vec::with_capacity(n);

    for i in 0..cols {
        let theta = (i as f32 / cols as f32) * TAU;
        for j in 0..rows {
            let phi = (j as f32 / rows as f32) * TAU;
            let ring = big_r + small_r * theta.cos();
            points.push(Vec3::new(ring * phi.cos(), small_r * theta.sin(), ring * phi.sin()));
            if points.len() >= n {
                return points;
            }
        }
    }
    points
}

/// Unit cylinder along Y: 70% lateral grid, the rest split over two spiral caps.
pub fn cylinder(n: usize) -> Vec<Vec3> {
    let lateral = (n as f64 * 0.7).ceil() as usize;
    let per_cap = ceil_div(n - lateral, 2);
    let cols = ((lateral * 2) as f64).sqrt().ceil() as usize;
    let rows = ceil_div(lateral, cols);
    let mut points = Vec::with_capacity(n);

    'lateral: for i in 0..cols {
        let theta = (i as f32 / cols as f32) * TAU;
        for j in 0..rows {
            if points.len() >= lateral {
                break 'lateral;
            }
            points.push(Vec3::new(theta.cos(), grid_coord(j, rows), theta.sin()));
        }
    }

    for cap in [-1.0_f32, 1.0] {
        for i in 0..per_cap {
            let f = i as f32 / per_cap as f32;
            let r = f.sqrt();
            let theta = f * TAU * 10.0;
            points.push(Vec3::new(r * theta.cos(), cap, r * theta.sin()));
        }
    }

    points.truncate(n);
    points
}

/// Double helix: two strands offset by π, four turns, radius 0.4.
pub fn helix(n: usize) -> Vec<Vec3> {
    let per_strand = ceil_div(n, 2);
    let turns = 4.0_f32;
    let mut points = Vec::with_capacity(per_strand * 2);

    for strand in 0..2 {
        let offset = strand as f32 * PI;
        for i in 0..per_strand {
            let t = i as f32 / per_strand as f32;
            let theta = t * turns * TAU + offset;
            points.push(Vec3::new(0.4 * theta.cos(), t * 2.0 - 1.0, 0.4 * theta.sin()));
        }
    }
    points.truncate(n);
    points
}
