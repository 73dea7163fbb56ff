//! Post-generation displacement: static jitter and per-frame floating.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use crate::config::ParticleConfig;
use crate::math::centered;

/// Persistent per-particle float state.
///
/// `px/py/pz` are phase offsets in `[0, 2π)`, `sx/sy/sz` speed-variance
/// multipliers in `[-1, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ParticlePhase {
    pub px: f32,
    pub py: f32,
    pub pz: f32,
    pub sx: f32,
    pub sy: f32,
    pub sz: f32,
}

/// Uniform jitter with half-width `0.1 * amount` on every axis.
pub fn apply_randomness<R: Rng + ?Sized>(points: &[Vec3], amount: f32, rng: &mut R) -> Vec<Vec3> {
    let scale = amount * 0.2;
    points
        .iter()
        .map(|p| *p + Vec3::new(centered(rng), centered(rng), centered(rng)) * scale)
        .collect()
}

pub fn init_float_phases<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<ParticlePhase> {
    (0..count)
        .map(|_| ParticlePhase {
            px: rng.gen::<f32>() * TAU,
            py: rng.gen::<f32>() * TAU,
            pz: rng.gen::<f32>() * TAU,
            sx: rng.gen::<f32>() * 2.0 - 1.0,
            sy: rng.gen::<f32>() * 2.0 - 1.0,
            sz: rng.gen::<f32>() * 2.0 - 1.0,
        })
        .collect()
}

/// Float offset of one particle at time `t`.
pub fn float_offset(phase: &ParticlePhase, speed: f32, variability: f32, radius: f32, t: f32) -> Vec3 {
    let fx = speed * (1.0 + phase.sx * variability);
    let fy = speed * (1.0 + phase.sy * variability);
    let fz = speed * (1.0 + phase.sz * variability);
    Vec3::new(
        (t * fx + phase.px).sin(),
        (t * fy + phase.py).cos(),
        (t * fz + phase.pz).sin(),
    ) * radius
}

/// Displace `points` by their float offsets at time `t`.
///
/// Always computed from the undisplaced set, so motion never accumulates
/// across frames. Particles without a phase use the zero phase.
pub fn apply_float(points: &[Vec3], phases: &[ParticlePhase], config: &ParticleConfig, t: f32) -> Vec<Vec3> {
    let zero = ParticlePhase::default();
    points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let phase = phases.get(i).unwrap_or(&zero);
            *p + float_offset(
                phase,
                config.float_speed,
                config.float_variability,
                config.float_radius,
                t,
            )
        })
        .collect()
}
