//! Host-facing element state machine.
//!
//! The embedding layer (browser binding or a test) owns the frame scheduler
//! and forwards attribute changes, pointer drags, resizes and frame times.

use std::collections::HashMap;

use glam::Vec2;
use rand::rngs::ThreadRng;
use rand::Rng;
use tracing::{debug, info};

use crate::attributes::{self, ATTRIBUTES};
use crate::config::ParticleConfig;
use crate::particle::ParticleSet;
use crate::render::{render_frame, render_pixelated};
use crate::surface::{PixelBuffer, Surface};

/// Radians of rotation per pixel of pointer drag.
const DRAG_SENSITIVITY: f32 = 0.005;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Active,
    Stopped,
}

pub struct ParticleShape<R = ThreadRng> {
    config: ParticleConfig,
    /// Raw attribute values keyed by schema name.
    attributes: HashMap<&'static str, String>,
    state: Lifecycle,
    particles: ParticleSet,
    width: f32,
    height: f32,
    /// Last pointer position while a drag is in progress.
    drag: Option<Vec2>,
    pixel_scratch: Option<PixelBuffer>,
    rng: R,
}

impl ParticleShape<ThreadRng> {
    pub fn new() -> Self {
        Self::with_rng(rand::thread_rng())
    }
}

impl Default for ParticleShape<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> ParticleShape<R> {
    /// Element drawing all randomness from `rng`.
    pub fn with_rng(rng: R) -> Self {
        Self {
            config: ParticleConfig::default(),
            attributes: HashMap::new(),
            state: Lifecycle::Uninitialized,
            particles: ParticleSet::default(),
            width: 0.0,
            height: 0.0,
            drag: None,
            pixel_scratch: None,
            rng,
        }
    }

    pub fn state(&self) -> Lifecycle {
        self.state
    }

    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    pub fn particles(&self) -> &ParticleSet {
        &self.particles
    }

    pub fn viewport(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Enter `Active`: apply stored attributes and build the particle set.
    pub fn attach(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        for spec in ATTRIBUTES {
            if let Some(raw) = self.attributes.get(spec.name) {
                attributes::apply_attribute(&mut self.config, spec.name, Some(raw.as_str()));
            }
        }
        self.state = Lifecycle::Active;
        self.regenerate();
        info!(width, height, particles = self.particles.count(), "particle-shape attached");
    }

    /// Leave `Active`. Returns `false` when there was nothing to stop.
    pub fn detach(&mut self) -> bool {
        if self.state != Lifecycle::Active {
            return false;
        }
        self.state = Lifecycle::Stopped;
        self.drag = None;
        self.pixel_scratch = None;
        info!("particle-shape detached");
        true
    }

    /// Record an attribute change; `None` removes the attribute.
    ///
    /// Unknown names and unchanged values are ignored. While active the
    /// change is applied immediately and triggers regeneration when needed.
    pub fn set_attribute(&mut self, name: &str, value: Option<&str>) {
        let Some(spec) = attributes::find(name) else {
            debug!(name, "ignoring unknown attribute");
            return;
        };
        if self.attributes.get(spec.name).map(String::as_str) == value {
            return;
        }
        match value {
            Some(v) => self.attributes.insert(spec.name, v.to_owned()),
            None => self.attributes.remove(spec.name),
        };

        attributes::apply_attribute(&mut self.config, spec.name, value);
        if self.state == Lifecycle::Active && spec.regenerates {
            self.regenerate();
        }
    }

    /// Replace points, phases and connections in one step.
    pub fn regenerate(&mut self) {
        self.particles = ParticleSet::generate(&self.config, &mut self.rng);
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.drag = Some(Vec2::new(x, y));
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        let Some(last) = self.drag else {
            return;
        };
        let pos = Vec2::new(x, y);
        let delta = pos - last;
        self.config.rot_y += delta.x * DRAG_SENSITIVITY;
        self.config.rot_x += delta.y * DRAG_SENSITIVITY;
        self.drag = Some(pos);
    }

    pub fn pointer_up(&mut self) {
        self.drag = None;
    }

    /// Advance rotation and draw the frame for time `t` (seconds).
    ///
    /// Returns whether anything was drawn.
    pub fn frame<S: Surface + ?Sized>(&mut self, surface: &mut S, t: f32) -> bool {
        if self.state != Lifecycle::Active {
            return false;
        }
        if self.config.auto_rotate && self.drag.is_none() {
            self.config.rot_y += self.config.rot_speed;
        }
        if !(self.width > 0.0 && self.height > 0.0) {
            return false;
        }

        let points = self.particles.frame_points(&self.config, t);
        if self.config.pixelate > 1 {
            render_pixelated(
                surface,
                &mut self.pixel_scratch,
                self.width,
                self.height,
                &points,
                &self.particles.connections,
                &self.config,
            );
        } else {
            render_frame(
                surface,
                self.width,
                self.height,
                &points,
                &self.particles.connections,
                &self.config,
            );
        }
        true
    }
}
