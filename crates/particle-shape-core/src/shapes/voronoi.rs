//! Moving Voronoi membranes.
//!
//! A jittered sample grid is built once per regeneration; every frame the
//! seeds are moved along their orbits and only samples close to a boundary
//! between two cells are kept.

use glam::{Vec2, Vec3};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::ParticleConfig;
use crate::math::{centered, fract};

/// Angle between consecutive seeds on the base spiral.
const SEED_SPIRAL_ANGLE: f32 = 2.399963;

/// Minimum size of the candidate pool.
pub const MIN_SAMPLES: usize = 8000;

/// Build a shuffled jittered grid in `[-1, 1]²` with at least
/// `max(density * 6, 8000)` samples.
///
/// The shuffle matters: evaluation stops after `density` hits, so an ordered
/// grid would fill one corner first.
pub fn init_samples<R: Rng + ?Sized>(density: usize, rng: &mut R) -> Vec<Vec2> {
    let needed = density.saturating_mul(6).max(MIN_SAMPLES);
    let res = (needed as f64).sqrt().ceil() as usize;
    let mut samples = Vec::with_capacity(res * res);

    for xi in 0..res {
        for yi in 0..res {
            let x = ((xi as f32 + 0.5 + centered(rng) * 0.85) / res as f32) * 2.0 - 1.0;
            let y = ((yi as f32 + 0.5 + centered(rng) * 0.85) / res as f32) * 2.0 - 1.0;
            samples.push(Vec2::new(x, y));
        }
    }
    samples.shuffle(rng);
    samples
}

/// Seed positions at time `t`. A pure function of its arguments.
pub fn seed_positions(cells: usize, speed: f32, variability: f32, t: f32) -> Vec<Vec2> {
    let count = cells.max(3);
    (0..count)
        .map(|i| {
            let fi = i as f32;
            let theta = fi * SEED_SPIRAL_ANGLE;
            let r0 = ((fi + 0.5) / count as f32).sqrt() * 0.75;
            let base = Vec2::new(r0 * theta.cos(), r0 * theta.sin());
            let orbit = 0.08 + fract(fi * 0.137) * 0.12;
            let freq = speed * (0.4 + fract(fi * 0.31) * variability * 0.8);
            let phase = fi * 1.618;
            base + Vec2::new(
                orbit * (t * freq + phase).cos(),
                orbit * (t * freq * 0.71 + phase + 1.2).sin(),
            )
        })
        .collect()
}

/// Distances to the nearest and second-nearest seed.
fn two_nearest(p: Vec2, seeds: &[Vec2]) -> (f32, f32) {
    let mut d1 = f32::INFINITY;
    let mut d2 = f32::INFINITY;
    for seed in seeds {
        let d = p.distance(*seed);
        if d < d1 {
            d2 = d1;
            d1 = d;
        } else if d < d2 {
            d2 = d;
        }
    }
    (d1, d2)
}

/// Keep samples whose nearest two seeds are within the membrane width of
/// each other, stopping after `config.density` hits.
pub fn evaluate(samples: &[Vec2], config: &ParticleConfig, t: f32) -> Vec<Vec3> {
    let seeds = seed_positions(
        config.voronoi_cells,
        config.voronoi_speed,
        config.voronoi_variability,
        t,
    );
    let membrane = config.voronoi_membrane_width;

    samples
        .iter()
        .filter(|s| {
            let (d1, d2) = two_nearest(**s, &seeds);
            d2 - d1 < membrane
        })
        .take(config.density)
        .map(|s| Vec3::new(s.x, s.y, 0.0))
        .collect()
}
