use glam::{Vec2, Vec3};
use particle_shape_core::color::{Rgb, Rgba};
use particle_shape_core::config::ParticleConfig;
use particle_shape_core::connections::{Connection, ConnectionData};
use particle_shape_core::render::*;
use particle_shape_core::surface::{PixelBuffer, Surface};

#[derive(Debug, PartialEq)]
enum Op {
    Rect { x: f32, y: f32, size: f32, color: Rgba },
    Line { width: f32, color: Rgba },
    Blit { src: (u32, u32) },
}

#[derive(Default)]
struct Recorder {
    ops: Vec<Op>,
}

impl Surface for Recorder {
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, _h: f32, color: Rgba) {
        self.ops.push(Op::Rect { x, y, size: w, color });
    }

    fn stroke_line(&mut self, _from: Vec2, _to: Vec2, width: f32, color: Rgba) {
        self.ops.push(Op::Line { width, color });
    }

    fn blit_nearest(&mut self, src: &PixelBuffer, _dest_width: f32, _dest_height: f32) {
        self.ops.push(Op::Blit { src: (src.width(), src.height()) });
    }
}

fn flat_config() -> ParticleConfig {
    ParticleConfig { depth_opacity: false, depth_sizing: false, ..Default::default() }
}

fn linked(points: usize) -> ConnectionData {
    ConnectionData {
        hubs: vec![Vec3::new(0.0, 0.0, 0.5)],
        connections: (0..points).map(|particle| Connection { particle, hub: 0 }).collect(),
    }
}

#[test]
fn test_empty_frame_is_background_only() {
    let config = ParticleConfig::default();
    let mut buffer = PixelBuffer::new(32, 16);
    render_frame(&mut buffer, 32.0, 16.0, &[], &ConnectionData::default(), &config);
    assert!(buffer.is_uniform(config.bg_color), "empty set should leave only the background");
}

#[test]
fn test_background_then_particles() {
    let config = flat_config();
    let mut rec = Recorder::default();
    let points = [Vec3::ZERO, Vec3::new(0.5, 0.0, 0.0)];
    render_frame(&mut rec, 100.0, 100.0, &points, &ConnectionData::default(), &config);

    assert_eq!(rec.ops.len(), 3);
    assert_eq!(
        rec.ops[0],
        Op::Rect { x: 0.0, y: 0.0, size: 100.0, color: config.bg_color.with_alpha(1.0) }
    );
    for op in &rec.ops[1..] {
        match op {
            Op::Rect { size, color, .. } => {
                assert_eq!(*size, 3.0);
                assert!((color.a - 0.85).abs() < 1e-6);
            }
            other => panic!("expected a particle square, got {:?}", other),
        }
    }
    // Particle at the origin is centred on the viewport.
    assert!(rec.ops.iter().any(|op| matches!(op, Op::Rect { x, y, .. } if *x == 48.5 && *y == 48.5)));
}

#[test]
fn test_lines_and_hubs_before_particles() {
    let config = ParticleConfig { connections_enabled: true, ..flat_config() };
    let points = [Vec3::new(-0.5, 0.0, 0.0), Vec3::new(0.5, 0.0, 0.0), Vec3::new(0.0, 0.5, 0.0)];
    let mut rec = Recorder::default();
    render_frame(&mut rec, 200.0, 200.0, &points, &linked(3), &config);

    let kinds: Vec<&str> = rec
        .ops
        .iter()
        .map(|op| match op {
            Op::Rect { size, .. } if *size == config.hub_size => "hub",
            Op::Rect { size, .. } if *size == 200.0 => "bg",
            Op::Rect { .. } => "particle",
            Op::Line { .. } => "line",
            Op::Blit { .. } => "blit",
        })
        .collect();
    assert_eq!(kinds, vec!["bg", "line", "line", "line", "hub", "particle", "particle", "particle"]);
}

#[test]
fn test_hidden_hubs_are_not_drawn() {
    let config = ParticleConfig { connections_enabled: true, hub_visible: false, ..flat_config() };
    let mut rec = Recorder::default();
    render_frame(&mut rec, 200.0, 200.0, &[Vec3::X], &linked(1), &config);
    let rects = rec.ops.iter().filter(|op| matches!(op, Op::Rect { .. })).count();
    assert_eq!(rects, 2, "background and one particle only: {:?}", rec.ops);
}

#[test]
fn test_connection_opacity_and_thickness() {
    let config = ParticleConfig {
        connections_enabled: true,
        connection_opacity: 0.6,
        connection_thickness: 2.0,
        connection_depth_opacity: false,
        ..flat_config()
    };
    let mut rec = Recorder::default();
    render_frame(&mut rec, 200.0, 200.0, &[Vec3::X], &linked(1), &config);
    let line = rec.ops.iter().find(|op| matches!(op, Op::Line { .. }));
    assert_eq!(line, Some(&Op::Line { width: 2.0, color: config.color.with_alpha(0.6) }));
}

#[test]
fn test_dangling_connection_skipped() {
    let config = ParticleConfig { connections_enabled: true, ..flat_config() };
    let data = ConnectionData {
        hubs: vec![Vec3::ZERO],
        connections: vec![Connection { particle: 99, hub: 0 }, Connection { particle: 0, hub: 7 }],
    };
    let mut rec = Recorder::default();
    render_frame(&mut rec, 100.0, 100.0, &[Vec3::X], &data, &config);
    assert!(!rec.ops.iter().any(|op| matches!(op, Op::Line { .. })));
}

#[test]
fn test_highlight_connected() {
    let config = ParticleConfig {
        connections_enabled: true,
        highlight_connected: true,
        hub_visible: false,
        ..flat_config()
    };
    let points = [Vec3::new(0.0, 0.0, 0.1), Vec3::new(0.0, 0.0, -0.1)];
    let data = ConnectionData {
        hubs: vec![Vec3::ZERO],
        connections: vec![Connection { particle: 0, hub: 0 }],
    };
    let mut rec = Recorder::default();
    render_frame(&mut rec, 100.0, 100.0, &points, &data, &config);

    let colors: Vec<Rgba> = rec
        .ops
        .iter()
        .skip(1)
        .filter_map(|op| match op {
            Op::Rect { color, .. } => Some(*color),
            _ => None,
        })
        .collect();
    // Back to front: particle 0 (depth 0.1) first, then particle 1.
    assert_eq!(colors[0], config.color.with_alpha(0.85));
    assert_eq!(colors[1], config.non_connected_color.with_alpha(0.85 * config.non_connected_opacity));
}

#[test]
fn test_depth_cues() {
    let config = ParticleConfig { focal_length: 24.0, ..Default::default() };
    let mut rec = Recorder::default();
    let points = [Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 0.0, 1.0)];
    render_frame(&mut rec, 100.0, 100.0, &points, &ConnectionData::default(), &config);
    let squares: Vec<(f32, f32)> = rec
        .ops
        .iter()
        .skip(1)
        .filter_map(|op| match op {
            Op::Rect { size, color, .. } => Some((*size, color.a)),
            _ => None,
        })
        .collect();
    let (far, near) = (squares[0], squares[1]);
    assert!(near.0 > far.0, "near square should be larger: {:?} vs {:?}", near, far);
    assert!(near.1 >= far.1, "near square should be at least as opaque");
    assert_eq!(near.1, 1.0);
}

#[test]
fn test_pixelated_size() {
    assert_eq!(pixelated_size(800.0, 600.0, 4), (200, 150));
    assert_eq!(pixelated_size(10.0, 10.0, 100), (1, 1));
    assert_eq!(pixelated_size(9.0, 7.0, 2), (5, 4));
}

#[test]
fn test_render_pixelated_reuses_scratch() {
    let config = ParticleConfig { pixelate: 4, ..Default::default() };
    let mut rec = Recorder::default();
    let mut scratch = None;
    let points = [Vec3::ZERO];
    render_pixelated(&mut rec, &mut scratch, 80.0, 40.0, &points, &ConnectionData::default(), &config);
    assert_eq!(rec.ops, vec![Op::Blit { src: (20, 10) }]);
    assert_eq!(scratch.as_ref().map(|b| (b.width(), b.height())), Some((20, 10)));

    render_pixelated(&mut rec, &mut scratch, 120.0, 40.0, &points, &ConnectionData::default(), &config);
    assert_eq!(scratch.as_ref().map(|b| (b.width(), b.height())), Some((30, 10)));
}

#[test]
fn test_pixelated_output_is_blocky() {
    let config = ParticleConfig {
        pixelate: 4,
        bg_color: Rgb::new(0, 0, 0),
        color: Rgb::WHITE,
        square_size: 1.0,
        depth_opacity: false,
        depth_sizing: false,
        ..Default::default()
    };
    let mut target = PixelBuffer::new(16, 16);
    let mut scratch = None;
    render_pixelated(&mut target, &mut scratch, 16.0, 16.0, &[Vec3::ZERO], &ConnectionData::default(), &config);

    // Every 4x4 block maps to one low-resolution pixel.
    for by in 0..4 {
        for bx in 0..4 {
            let first = target.pixel(bx * 4, by * 4);
            for dy in 0..4 {
                for dx in 0..4 {
                    assert_eq!(target.pixel(bx * 4 + dx, by * 4 + dy), first, "block ({}, {}) not uniform", bx, by);
                }
            }
        }
    }
    assert!(!target.is_uniform(Rgb::new(0, 0, 0)), "particle should survive downscaling");
}
