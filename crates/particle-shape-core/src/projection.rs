//! Rotation and perspective projection into screen space.

use glam::{Vec2, Vec3};

use crate::config::{LensKind, ParticleConfig};
use crate::math::lerp;

const FOCAL_MIN_MM: f32 = 24.0;
const FOCAL_MAX_MM: f32 = 200.0;
const PERSPECTIVE_MIN: f32 = 12.0;
const PERSPECTIVE_MAX: f32 = 500.0;

/// Map a focal length in millimetres onto a perspective distance.
///
/// Clamped to 24..200 mm and remapped linearly onto 12..500; wide lenses give
/// short distances and therefore strong distortion.
pub fn focal_length_to_perspective(focal_mm: f32) -> f32 {
    let t = (focal_mm.clamp(FOCAL_MIN_MM, FOCAL_MAX_MM) - FOCAL_MIN_MM) / (FOCAL_MAX_MM - FOCAL_MIN_MM);
    lerp(PERSPECTIVE_MIN, PERSPECTIVE_MAX, t)
}

/// One projected point. `index` refers back into the unsorted input slice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectedPoint {
    pub screen: Vec2,
    /// Perspective foreshortening factor. Zero when behind the camera.
    pub scale: f32,
    /// Camera-space z, used for paint order only.
    pub depth: f32,
    pub index: usize,
}

/// Camera state for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    /// Euler angles, applied about Y, then X, then Z.
    pub rotation: Vec3,
    /// `f32::INFINITY` selects orthographic projection.
    pub perspective: f32,
    pub center: Vec2,
    pub spacing: f32,
    pub world_scale: f32,
}

impl Projection {
    /// Camera for a `width` x `height` viewport.
    pub fn for_viewport(config: &ParticleConfig, width: f32, height: f32) -> Self {
        let perspective = match config.lens {
            LensKind::Orthographic => f32::INFINITY,
            LensKind::Perspective => focal_length_to_perspective(config.focal_length),
        };
        Self {
            rotation: Vec3::new(config.rot_x, config.rot_y, config.rot_z),
            perspective,
            center: Vec2::new(width / 2.0, height / 2.0),
            spacing: config.spacing,
            world_scale: width.min(height) * 0.35 * config.zoom,
        }
    }

    /// Rotated camera-space position of `p`.
    pub fn rotate(&self, p: Vec3) -> Vec3 {
        let (sin_a, cos_a) = self.rotation.x.sin_cos();
        let (sin_b, cos_b) = self.rotation.y.sin_cos();
        let (sin_c, cos_c) = self.rotation.z.sin_cos();
        let p = p * self.spacing;

        let x1 = p.x * cos_b + p.z * sin_b;
        let z1 = -p.x * sin_b + p.z * cos_b;
        let y1 = p.y * cos_a - z1 * sin_a;
        let z2 = p.y * sin_a + z1 * cos_a;
        let x2 = x1 * cos_c - y1 * sin_c;
        let y2 = x1 * sin_c + y1 * cos_c;
        Vec3::new(x2, y2, z2)
    }

    pub fn scale_at(&self, depth: f32) -> f32 {
        if !self.perspective.is_finite() {
            return 1.0;
        }
        let denom = self.perspective + depth;
        if denom > 0.0 {
            self.perspective / denom
        } else {
            0.0
        }
    }

    pub fn project(&self, p: Vec3, index: usize) -> ProjectedPoint {
        let r = self.rotate(p);
        let scale = self.scale_at(r.z);
        ProjectedPoint {
            screen: self.center + Vec2::new(r.x, r.y) * scale * self.world_scale,
            scale,
            depth: r.z,
            index,
        }
    }
}

/// Project every point, preserving input order.
#[cfg(not(feature = "parallel"))]
pub fn project_points(points: &[Vec3], projection: &Projection) -> Vec<ProjectedPoint> {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| projection.project(*p, i))
        .collect()
}

/// Project every point, preserving input order.
#[cfg(feature = "parallel")]
pub fn project_points(points: &[Vec3], projection: &Projection) -> Vec<ProjectedPoint> {
    use rayon::prelude::*;
    points
        .par_iter()
        .enumerate()
        .map(|(i, p)| projection.project(*p, i))
        .collect()
}

/// Reorder for painting: farthest (largest depth) first.
pub fn sort_back_to_front(points: &mut [ProjectedPoint]) {
    points.sort_by(|a, b| b.depth.total_cmp(&a.depth));
}
