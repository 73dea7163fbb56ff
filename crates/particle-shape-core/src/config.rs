use crate::color::Rgb;

/// Point-set topology.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeKind {
    Sphere,
    Cube,
    Galaxy,
    SpiralGalaxy,
    Torus,
    Cylinder,
    Helix,
    /// Time-varying cell membranes; re-evaluated every frame.
    Voronoi,
}

impl ShapeKind {
    /// Attribute name lookup. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sphere" => Some(Self::Sphere),
            "cube" => Some(Self::Cube),
            "galaxy" => Some(Self::Galaxy),
            "spiralGalaxy" => Some(Self::SpiralGalaxy),
            "torus" => Some(Self::Torus),
            "cylinder" => Some(Self::Cylinder),
            "helix" => Some(Self::Helix),
            "voronoi" => Some(Self::Voronoi),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Sphere => "sphere",
            Self::Cube => "cube",
            Self::Galaxy => "galaxy",
            Self::SpiralGalaxy => "spiralGalaxy",
            Self::Torus => "torus",
            Self::Cylinder => "cylinder",
            Self::Helix => "helix",
            Self::Voronoi => "voronoi",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LensKind {
    Perspective,
    Orthographic,
}

/// Where connection hubs are spawned relative to the formation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HubPlacement {
    /// Near the body interior, derived from a random particle.
    Inside,
    /// On a shell of radius 1.5..2.5 around the origin.
    Outside,
    /// Even hub indices inside, odd indices outside.
    Mixed,
}

/// Per-hub particle selection strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Distribution {
    Nearest,
    Random,
    Weighted,
    Stratified,
}

/// Every generation and rendering parameter of one element.
///
/// Written only by attribute application, pointer drags and the
/// auto-rotate tick; generation and rendering only read it.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleConfig {
    /// `None` when the configured shape name is not recognised.
    pub shape: Option<ShapeKind>,
    pub density: usize,
    pub spacing: f32,
    pub randomness: f32,
    pub square_size: f32,
    pub color: Rgb,
    pub bg_color: Rgb,
    pub zoom: f32,
    pub depth_opacity: bool,
    pub depth_sizing: bool,
    pub spiral_arms: u32,

    // Camera
    pub focal_length: f32,
    pub lens: LensKind,
    pub rot_x: f32,
    pub rot_y: f32,
    pub rot_z: f32,
    pub auto_rotate: bool,
    pub rot_speed: f32,

    // Connections
    pub connections_enabled: bool,
    pub hub_count: usize,
    pub connections_per_hub: usize,
    pub connection_opacity: f32,
    pub connection_thickness: f32,
    pub hub_placement: HubPlacement,
    pub hub_visible: bool,
    pub hub_size: f32,
    pub connection_depth_opacity: bool,
    pub connection_distribution: Distribution,
    pub connection_spread: f32,
    pub connection_focus: f32,
    pub highlight_connected: bool,
    pub non_connected_color: Rgb,
    pub non_connected_opacity: f32,

    /// Block size of the pixelation effect; values <= 1 disable it.
    pub pixelate: u32,

    // Floating motion
    pub float_enabled: bool,
    pub float_radius: f32,
    pub float_speed: f32,
    pub float_variability: f32,

    // Voronoi
    pub voronoi_cells: usize,
    pub voronoi_membrane_width: f32,
    pub voronoi_speed: f32,
    pub voronoi_variability: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            shape: Some(ShapeKind::Sphere),
            density: 1500,
            spacing: 1.0,
            randomness: 0.0,
            square_size: 3.0,
            color: Rgb::WHITE,
            bg_color: Rgb::new(0x0a, 0x0a, 0x0a),
            zoom: 1.0,
            depth_opacity: true,
            depth_sizing: true,
            spiral_arms: 4,
            focal_length: 50.0,
            lens: LensKind::Perspective,
            rot_x: 0.0,
            rot_y: 0.0,
            rot_z: 0.0,
            auto_rotate: true,
            rot_speed: 0.003,
            connections_enabled: false,
            hub_count: 3,
            connections_per_hub: 15,
            connection_opacity: 0.3,
            connection_thickness: 1.0,
            hub_placement: HubPlacement::Mixed,
            hub_visible: true,
            hub_size: 6.0,
            connection_depth_opacity: true,
            connection_distribution: Distribution::Weighted,
            connection_spread: 0.5,
            connection_focus: 0.5,
            highlight_connected: false,
            non_connected_color: Rgb::new(0x40, 0x40, 0x40),
            non_connected_opacity: 0.4,
            pixelate: 0,
            float_enabled: false,
            float_radius: 0.1,
            float_speed: 1.0,
            float_variability: 0.5,
            voronoi_cells: 12,
            voronoi_membrane_width: 0.05,
            voronoi_speed: 0.5,
            voronoi_variability: 0.5,
        }
    }
}
