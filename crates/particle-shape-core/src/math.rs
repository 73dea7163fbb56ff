use std::f32::consts::PI;

/// Golden angle in radians, `π(3 - √5)`.
pub fn golden_angle() -> f32 {
    PI * (3.0 - 5.0_f32.sqrt())
}

/// Fractional part that always lands in `[0, 1)`, also for negative input.
pub fn fract(x: f32) -> f32 {
    x - x.floor()
}

/// Linear interpolation between `a` and `b`.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Uniform value in `[-0.5, 0.5)`.
#[inline]
pub fn centered<R: rand::Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.gen::<f32>() - 0.5
}
