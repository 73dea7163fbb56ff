//! Particle formation engine for the `<particle-shape>` element.
//!
//! Generates normalised 3D point sets, links them to connection hubs,
//! animates them, and rasterises the projected result onto any [`Surface`].

pub mod attributes;
pub mod color;
pub mod config;
pub mod connections;
pub mod element;
pub mod error;
pub mod math;
pub mod motion;
pub mod particle;
pub mod projection;
pub mod render;
pub mod shapes;
pub mod surface;

pub use config::ParticleConfig;
pub use element::{Lifecycle, ParticleShape};
pub use surface::{PixelBuffer, Surface};
