use std::borrow::Cow;

use glam::{Vec2, Vec3};
use rand::Rng;
use tracing::debug;

use crate::config::{ParticleConfig, ShapeKind};
use crate::connections::{generate_connections, ConnectionData};
use crate::motion::{apply_float, init_float_phases, ParticlePhase};
use crate::shapes::dispatcher::generate_points;
use crate::shapes::voronoi;

/// Everything derived from the configuration at regeneration time.
///
/// Always rebuilt as a whole so the render loop never sees phases or
/// connections that belong to a different point set.
#[derive(Clone, Debug, Default)]
pub struct ParticleSet {
    /// Undisplaced particle positions. For Voronoi this is the `t = 0` field.
    pub position: Vec<Vec3>,
    /// Float phase per particle, same length as `position`.
    pub phase: Vec<ParticlePhase>,
    /// Candidate pool for the Voronoi field; empty for other shapes.
    pub voronoi_samples: Vec<Vec2>,
    pub connections: ConnectionData,
}

impl ParticleSet {
    pub fn generate<R: Rng + ?Sized>(config: &ParticleConfig, rng: &mut R) -> Self {
        let (position, voronoi_samples) = if config.shape == Some(ShapeKind::Voronoi) {
            let samples = voronoi::init_samples(config.density, rng);
            (voronoi::evaluate(&samples, config, 0.0), samples)
        } else {
            (generate_points(config, rng), Vec::new())
        };
        let connections = generate_connections(&position, config, rng);
        let phase = init_float_phases(position.len(), rng);

        debug!(
            shape = config.shape.map_or("unknown", ShapeKind::name),
            requested = config.density,
            produced = position.len(),
            connections = connections.connections.len(),
            "regenerated particle set"
        );

        Self {
            position,
            phase,
            voronoi_samples,
            connections,
        }
    }

    pub fn count(&self) -> usize {
        self.position.len()
    }

    /// Points to draw at time `t`: the re-evaluated Voronoi field, the
    /// floated set, or the static positions.
    pub fn frame_points(&self, config: &ParticleConfig, t: f32) -> Cow<'_, [Vec3]> {
        if config.shape == Some(ShapeKind::Voronoi) {
            Cow::Owned(voronoi::evaluate(&self.voronoi_samples, config, t))
        } else if config.float_enabled && !self.phase.is_empty() {
            Cow::Owned(apply_float(&self.position, &self.phase, config, t))
        } else {
            Cow::Borrowed(&self.position)
        }
    }
}
