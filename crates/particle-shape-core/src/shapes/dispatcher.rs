//! Shape dispatcher.
//!
//! Maps the configured [`ShapeKind`] to its generator. Voronoi is sampled
//! separately (see [`crate::shapes::voronoi`]), as is an unknown shape: both
//! produce no static points here.

use glam::Vec3;
use rand::Rng;

use crate::config::{ParticleConfig, ShapeKind};
use crate::motion::apply_randomness;
use crate::shapes::primitives;

/// Raw generator output for `shape` with `count` requested points.
pub fn generate<R: Rng + ?Sized>(
    shape: ShapeKind,
    count: usize,
    config: &ParticleConfig,
    rng: &mut R,
) -> Vec<Vec3> {
    match shape {
        ShapeKind::Sphere => primitives::sphere(count),
        ShapeKind::Cube => primitives::cube(count),
        ShapeKind::Galaxy => primitives::galaxy(count, rng),
        ShapeKind::SpiralGalaxy => primitives::spiral_galaxy(count, config.spiral_arms, rng),
        ShapeKind::Torus => primitives::torus(count),
        ShapeKind::Cylinder => primitives::cylinder(count),
        ShapeKind::Helix => primitives::helix(count),
        ShapeKind::Voronoi => Vec::new(),
    }
}

/// Static point set for the configuration, with randomness jitter applied.
pub fn generate_points<R: Rng + ?Sized>(config: &ParticleConfig, rng: &mut R) -> Vec<Vec3> {
    let Some(shape) = config.shape else {
        return Vec::new();
    };
    let points = generate(shape, config.density, config, rng);
    if config.randomness > 0.0 {
        apply_randomness(&points, config.randomness, rng)
    } else {
        points
    }
}
