use glam::Vec3;
use particle_shape_core::config::{ParticleConfig, ShapeKind};
use particle_shape_core::shapes::dispatcher::{generate, generate_points};
use particle_shape_core::shapes::primitives::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

const ALL_SHAPES: [ShapeKind; 7] = [
    ShapeKind::Sphere,
    ShapeKind::Cube,
    ShapeKind::Galaxy,
    ShapeKind::SpiralGalaxy,
    ShapeKind::Torus,
    ShapeKind::Cylinder,
    ShapeKind::Helix,
];

#[test]
fn test_all_shapes_bounded_count_and_finite() {
    let config = ParticleConfig::default();
    let mut rng = StdRng::seed_from_u64(42);
    for shape in ALL_SHAPES {
        for n in [1, 2, 3, 5, 6, 7, 13, 100, 599, 1500] {
            let points = generate(shape, n, &config, &mut rng);
            assert!(
                points.len() <= n,
                "shape {:?} produced {} points for n={}", shape, points.len(), n
            );
            for p in &points {
                assert!(p.is_finite(), "shape {:?} n={} produced non-finite {:?}", shape, n, p);
                assert!(p.abs().max_element() <= 2.0, "shape {:?} out of bounds: {:?}", shape, p);
            }
        }
    }
}

#[test]
fn test_zero_points_for_zero_count() {
    let config = ParticleConfig::default();
    let mut rng = StdRng::seed_from_u64(0);
    for shape in ALL_SHAPES {
        assert!(generate(shape, 0, &config, &mut rng).is_empty(), "shape {:?} with n=0", shape);
    }
}

#[test]
fn test_exact_count_shapes() {
    // These generators either loop exactly n times or truncate to n.
    let config = ParticleConfig::default();
    let mut rng = StdRng::seed_from_u64(1);
    for shape in [ShapeKind::Sphere, ShapeKind::Cube, ShapeKind::Galaxy, ShapeKind::SpiralGalaxy, ShapeKind::Torus, ShapeKind::Helix] {
        assert_eq!(generate(shape, 1500, &config, &mut rng).len(), 1500, "shape {:?}", shape);
    }
}

#[test]
fn test_sphere_single_point() {
    assert_eq!(sphere(1), vec![Vec3::Y]);
}

#[test]
fn test_sphere_spans_poles_on_unit_surface() {
    let points = sphere(100);
    assert_eq!(points.len(), 100);
    assert_eq!(points[0].y, 1.0);
    assert_eq!(points[99].y, -1.0);
    for p in &points {
        assert!((p.length() - 1.0).abs() < 1e-4, "sphere point off surface: {:?}", p);
    }
}

#[test]
fn test_sphere_no_pole_clustering() {
    // Every point's nearest neighbour sits at a similar angular distance,
    // including the points at the poles.
    let points = sphere(100);
    for (i, p) in points.iter().enumerate() {
        let nearest = points
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, q)| p.angle_between(*q))
            .fold(f32::MAX, f32::min);
        assert!(
            nearest > 0.1 && nearest < 0.5,
            "point {} nearest-neighbour angle {} out of range", i, nearest
        );
    }
}

#[test]
fn test_cube_points_on_faces() {
    let points = cube(600);
    assert_eq!(points.len(), 600);
    for p in &points {
        assert_eq!(p.abs().max_element(), 1.0, "cube point off face: {:?}", p);
    }
}

#[test]
fn test_cube_tiny_counts_stay_finite() {
    // One point per face means a 1x1 face grid.
    let points = cube(6);
    assert_eq!(points.len(), 6);
    assert_eq!(points[0], Vec3::new(1.0, 0.0, 0.0));
    assert_eq!(points[5], Vec3::new(0.0, 0.0, -1.0));
}

#[test]
fn test_torus_radii() {
    for p in torus(500) {
        let ring = (p.x * p.x + p.z * p.z).sqrt();
        let tube = ((ring - 0.7).powi(2) + p.y * p.y).sqrt();
        assert!((tube - 0.3).abs() < 1e-4, "torus point off tube: {:?}", p);
    }
}

#[test]
fn test_cylinder_lateral_and_caps() {
    let points = cylinder(1000);
    assert_eq!(points.len(), 1000);
    let lateral = 700;
    for p in &points[..lateral] {
        let r = (p.x * p.x + p.z * p.z).sqrt();
        assert!((r - 1.0).abs() < 1e-4, "lateral point off surface: {:?}", p);
    }
    for p in &points[lateral..] {
        assert!(p.y.abs() == 1.0, "cap point not on a cap: {:?}", p);
        assert!((p.x * p.x + p.z * p.z).sqrt() <= 1.0 + 1e-5);
    }
}

#[test]
fn test_cylinder_single_row_is_finite() {
    for p in cylinder(1) {
        assert!(p.is_finite(), "cylinder(1) produced {:?}", p);
    }
}

#[test]
fn test_helix_two_strands() {
    let points = helix(200);
    assert_eq!(points.len(), 200);
    // Strand starts are opposite each other.
    assert!((points[0] - Vec3::new(0.4, -1.0, 0.0)).length() < 1e-5);
    assert!((points[100] - Vec3::new(-0.4, -1.0, 0.0)).length() < 1e-4);
    for p in &points {
        assert!(((p.x * p.x + p.z * p.z).sqrt() - 0.4).abs() < 1e-4);
    }
}

#[test]
fn test_spiral_galaxy_populations() {
    let mut rng = StdRng::seed_from_u64(9);
    let points = spiral_galaxy(1000, 4, &mut rng);
    assert_eq!(points.len(), 1000);
    // The first 15% form the bulge.
    for p in &points[..150] {
        assert!(p.length() <= 0.12 + 1e-5, "bulge point too far out: {:?}", p);
    }
    for p in &points[150..] {
        assert!(p.y.abs() < 0.03, "arm/disk point too thick: {:?}", p);
    }
}

#[test]
fn test_spiral_galaxy_zero_arms_does_not_panic() {
    let mut rng = StdRng::seed_from_u64(2);
    assert_eq!(spiral_galaxy(50, 0, &mut rng).len(), 50);
}

#[test]
fn test_galaxy_disk_thickens_towards_core() {
    let mut rng = StdRng::seed_from_u64(5);
    let points = galaxy(3000, &mut rng);
    let core: f32 = points[..300].iter().map(|p| p.y.abs()).sum::<f32>() / 300.0;
    let rim: f32 = points[2700..].iter().map(|p| p.y.abs()).sum::<f32>() / 300.0;
    assert!(core > rim, "core thickness {} should exceed rim {}", core, rim);
}

#[test]
fn test_seeded_generation_is_reproducible() {
    let config = ParticleConfig { shape: Some(ShapeKind::Galaxy), randomness: 0.5, ..Default::default() };
    let a = generate_points(&config, &mut StdRng::seed_from_u64(11));
    let b = generate_points(&config, &mut StdRng::seed_from_u64(11));
    assert_eq!(a, b);
}

#[test]
fn test_unknown_and_voronoi_shapes_yield_no_static_points() {
    let mut rng = StdRng::seed_from_u64(0);
    let unknown = ParticleConfig { shape: None, ..Default::default() };
    assert!(generate_points(&unknown, &mut rng).is_empty());
    let voronoi = ParticleConfig { shape: Some(ShapeKind::Voronoi), ..Default::default() };
    assert!(generate_points(&voronoi, &mut rng).is_empty());
}

#[test]
fn test_randomness_jitter_half_width() {
    let mut rng = StdRng::seed_from_u64(4);
    let config = ParticleConfig { shape: Some(ShapeKind::Sphere), randomness: 1.0, density: 400, ..Default::default() };
    let jittered = generate_points(&config, &mut rng);
    let clean = sphere(400);
    for (a, b) in jittered.iter().zip(&clean) {
        let d = (*a - *b).abs();
        assert!(d.max_element() <= 0.1 + 1e-6, "jitter exceeded 0.1: {:?}", d);
    }
    assert_ne!(jittered, clean);
}
