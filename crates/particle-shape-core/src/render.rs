//! Frame rendering: background, connection lines, hub markers, particles.

use glam::Vec3;

use crate::config::ParticleConfig;
use crate::connections::ConnectionData;
use crate::projection::{project_points, sort_back_to_front, ProjectedPoint, Projection};
use crate::surface::{PixelBuffer, Surface};

/// Alpha of a particle or hub square at perspective scale `scale`.
fn depth_alpha(scale: f32, floor: f32) -> f32 {
    (0.3 + scale * 0.7).clamp(floor, 1.0)
}

/// Render one frame of `points` onto a `width` x `height` surface.
///
/// Lines and hubs are drawn before depth-sorting so that connection indices
/// still address the unsorted projection, and so that they sit behind the
/// particle squares.
pub fn render_frame<S: Surface + ?Sized>(
    surface: &mut S,
    width: f32,
    height: f32,
    points: &[Vec3],
    connections: &ConnectionData,
    config: &ParticleConfig,
) {
    surface.fill_rect(0.0, 0.0, width, height, config.bg_color.with_alpha(1.0));

    let projection = Projection::for_viewport(config, width, height);
    let mut projected = project_points(points, &projection);

    let connected = if config.highlight_connected && !connections.connections.is_empty() {
        Some(connections.connected_particles())
    } else {
        None
    };

    if !connections.is_empty() {
        draw_connections(surface, &projected, &projection, connections, config);
    }

    sort_back_to_front(&mut projected);

    for p in projected.iter().filter(|p| p.scale > 0.0) {
        let size = if config.depth_sizing {
            config.square_size * p.scale
        } else {
            config.square_size
        };
        let alpha = if config.depth_opacity {
            depth_alpha(p.scale, 0.05)
        } else {
            0.85
        };
        let color = match &connected {
            Some(set) if !set.contains(&p.index) => {
                config.non_connected_color.with_alpha(alpha * config.non_connected_opacity)
            }
            _ => config.color.with_alpha(alpha),
        };
        surface.fill_rect(p.screen.x - size / 2.0, p.screen.y - size / 2.0, size, size, color);
    }
}

fn draw_connections<S: Surface + ?Sized>(
    surface: &mut S,
    projected: &[ProjectedPoint],
    projection: &Projection,
    data: &ConnectionData,
    config: &ParticleConfig,
) {
    let hubs = project_points(&data.hubs, projection);
    let base = config.connection_opacity;

    for conn in &data.connections {
        let (Some(from), Some(to)) = (projected.get(conn.particle), hubs.get(conn.hub)) else {
            continue;
        };
        if from.scale <= 0.0 || to.scale <= 0.0 {
            continue;
        }
        let avg_scale = (from.scale + to.scale) / 2.0;
        let alpha = if config.connection_depth_opacity {
            (base * (0.3 + avg_scale * 0.7)).clamp(0.02, 1.0)
        } else {
            base
        };
        let thickness = if config.depth_sizing {
            config.connection_thickness * avg_scale
        } else {
            config.connection_thickness
        };
        surface.stroke_line(from.screen, to.screen, thickness, config.color.with_alpha(alpha));
    }

    if !config.hub_visible {
        return;
    }
    for hub in hubs.iter().filter(|h| h.scale > 0.0) {
        let size = if config.depth_sizing {
            config.hub_size * hub.scale
        } else {
            config.hub_size
        };
        let alpha = if config.depth_opacity {
            depth_alpha(hub.scale, 0.1)
        } else {
            0.85
        };
        surface.fill_rect(
            hub.screen.x - size / 2.0,
            hub.screen.y - size / 2.0,
            size,
            size,
            config.color.with_alpha(alpha),
        );
    }
}

/// Low-resolution size for a pixelation block size, at least 1x1.
pub fn pixelated_size(width: f32, height: f32, block: u32) -> (u32, u32) {
    let block = block.max(1) as f32;
    (
        ((width / block).round() as u32).max(1),
        ((height / block).round() as u32).max(1),
    )
}

/// Render into a downscaled intermediate and blit it back without smoothing.
///
/// The intermediate buffer is reused across frames when the size matches.
pub fn render_pixelated<S: Surface + ?Sized>(
    surface: &mut S,
    scratch: &mut Option<PixelBuffer>,
    width: f32,
    height: f32,
    points: &[Vec3],
    connections: &ConnectionData,
    config: &ParticleConfig,
) {
    let (pw, ph) = pixelated_size(width, height, config.pixelate);
    if scratch.as_ref().is_some_and(|b| b.width() != pw || b.height() != ph) {
        *scratch = None;
    }
    let buffer = scratch.get_or_insert_with(|| PixelBuffer::new(pw, ph));
    render_frame(buffer, pw as f32, ph as f32, points, connections, config);
    surface.blit_nearest(buffer, width, height);
}
