//! Connection hubs and per-hub particle selection.

use std::collections::HashSet;
use std::f32::consts::TAU;

use glam::Vec3;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::config::{Distribution, HubPlacement, ParticleConfig};
use crate::math::centered;

/// Anchor point for connection lines. Not a particle.
pub type Hub = Vec3;

/// Directed link from one particle to one hub.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Connection {
    pub particle: usize,
    pub hub: usize,
}

/// Hubs plus every connection referencing them, replaced as a whole.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConnectionData {
    pub hubs: Vec<Hub>,
    pub connections: Vec<Connection>,
}

impl ConnectionData {
    pub fn is_empty(&self) -> bool {
        self.hubs.is_empty() || self.connections.is_empty()
    }

    /// Particle indices that participate in at least one connection.
    pub fn connected_particles(&self) -> HashSet<usize> {
        self.connections.iter().map(|c| c.particle).collect()
    }
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    index: usize,
    dist: f32,
}

/// Position of hub `index`. `points` must not be empty for inside placement.
pub fn hub_position<R: Rng + ?Sized>(
    points: &[Vec3],
    placement: HubPlacement,
    index: usize,
    rng: &mut R,
) -> Hub {
    let inside = match placement {
        HubPlacement::Inside => true,
        HubPlacement::Mixed => index % 2 == 0,
        HubPlacement::Outside => false,
    };

    if inside && !points.is_empty() {
        let base = points[rng.gen_range(0..points.len())];
        let jitter = Vec3::new(centered(rng), centered(rng), centered(rng)) * 0.3;
        return base * 0.5 + jitter;
    }

    let theta = rng.gen::<f32>() * TAU;
    let phi = (2.0 * rng.gen::<f32>() - 1.0).acos();
    let r = 1.5 + rng.gen::<f32>();
    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.cos(),
        r * phi.sin() * theta.sin(),
    )
}

/// Particles within `reach` of the hub, nearest first, and the reach used.
fn candidates_for(hub: Hub, points: &[Vec3], spread: f32) -> (Vec<Candidate>, Vec<Candidate>, f32) {
    let mut sorted: Vec<Candidate> = points
        .iter()
        .enumerate()
        .map(|(index, p)| Candidate { index, dist: p.distance(hub) })
        .collect();
    sorted.sort_by(|a, b| a.dist.total_cmp(&b.dist));

    let max_dist = sorted.last().map_or(1.0, |c| c.dist);
    let reach = max_dist * (0.1 + spread * 0.9);
    let within = sorted.iter().copied().filter(|c| c.dist <= reach).collect();
    (sorted, within, reach)
}

/// Choose up to `count` particle indices to connect to `hub`.
///
/// Every returned index is unique. With [`Distribution::Nearest`] the
/// result is ordered by distance.
pub fn select_particles_for_hub<R: Rng + ?Sized>(
    hub: Hub,
    points: &[Vec3],
    count: usize,
    distribution: Distribution,
    spread: f32,
    focus: f32,
    rng: &mut R,
) -> Vec<usize> {
    if count == 0 {
        return Vec::new();
    }
    let (sorted, candidates, reach) = candidates_for(hub, points, spread);
    if candidates.is_empty() {
        return sorted.iter().take(count).map(|c| c.index).collect();
    }

    let n = count.min(candidates.len());
    match distribution {
        Distribution::Nearest => candidates.iter().take(n).map(|c| c.index).collect(),
        Distribution::Random => {
            let mut shuffled = candidates;
            shuffled.shuffle(rng);
            shuffled.iter().take(n).map(|c| c.index).collect()
        }
        Distribution::Weighted => select_weighted(&candidates, n, reach, focus, rng),
        Distribution::Stratified => select_stratified(&candidates, n, reach, rng),
    }
}

/// Roulette-wheel sampling without replacement, biased towards the hub.
fn select_weighted<R: Rng + ?Sized>(
    candidates: &[Candidate],
    n: usize,
    reach: f32,
    focus: f32,
    rng: &mut R,
) -> Vec<usize> {
    let exponent = 0.5 + focus * 4.5;
    let norm = if reach > 0.0 { reach } else { 1.0 };
    let weights: Vec<f32> = candidates
        .iter()
        .map(|c| (1.0 - c.dist / norm + 0.01).max(0.0).powf(exponent))
        .collect();
    let total: f32 = weights.iter().sum();

    let mut selected = Vec::with_capacity(n);
    let mut seen = HashSet::with_capacity(n);
    let mut attempts = 0;
    while selected.len() < n && attempts < n * 20 {
        let mut r = rng.gen::<f32>() * total;
        for (c, w) in candidates.iter().zip(&weights) {
            r -= w;
            if r <= 0.0 {
                if seen.insert(c.index) {
                    selected.push(c.index);
                }
                break;
            }
        }
        attempts += 1;
    }

    for c in candidates {
        if selected.len() >= n {
            break;
        }
        if seen.insert(c.index) {
            selected.push(c.index);
        }
    }
    selected
}

/// Equal-width distance bands, a shuffled handful from each.
fn select_stratified<R: Rng + ?Sized>(
    candidates: &[Candidate],
    n: usize,
    reach: f32,
    rng: &mut R,
) -> Vec<usize> {
    let bands = n.min(5);
    if bands == 0 {
        return Vec::new();
    }
    let per_band = n.div_ceil(bands);
    let band_width = reach / bands as f32;
    let mut selected = Vec::with_capacity(n);

    for b in 0..bands {
        let lo = b as f32 * band_width;
        let hi = (b + 1) as f32 * band_width;
        let mut in_band: Vec<usize> = candidates
            .iter()
            .filter(|c| c.dist >= lo && c.dist < hi)
            .map(|c| c.index)
            .collect();
        in_band.shuffle(rng);
        selected.extend(in_band.into_iter().take(per_band));
    }

    if selected.len() < n {
        let mut seen: HashSet<usize> = selected.iter().copied().collect();
        for c in candidates {
            if selected.len() >= n {
                break;
            }
            if seen.insert(c.index) {
                selected.push(c.index);
            }
        }
    }
    selected.truncate(n);
    selected
}

/// Hubs and connections for the current point set.
///
/// Empty when connections are disabled or there are no points. A particle
/// may be linked to several hubs.
pub fn generate_connections<R: Rng + ?Sized>(
    points: &[Vec3],
    config: &ParticleConfig,
    rng: &mut R,
) -> ConnectionData {
    if !config.connections_enabled || points.is_empty() {
        return ConnectionData::default();
    }

    let hubs: Vec<Hub> = (0..config.hub_count)
        .map(|i| hub_position(points, config.hub_placement, i, rng))
        .collect();

    let mut connections = Vec::new();
    for (h, hub) in hubs.iter().enumerate() {
        let selected = select_particles_for_hub(
            *hub,
            points,
            config.connections_per_hub,
            config.connection_distribution,
            config.connection_spread,
            config.connection_focus,
            rng,
        );
        connections.extend(selected.into_iter().map(|particle| Connection { particle, hub: h }));
    }

    debug!(hubs = hubs.len(), connections = connections.len(), "generated connections");
    ConnectionData { hubs, connections }
}
