//! String attribute schema.
//!
//! Every external attribute is one [`AttributeSpec`] row: its name, whether
//! changing it rebuilds the particle set, and a plain function that parses
//! the raw value into the matching [`ParticleConfig`] field. Unparsable
//! input falls back to the field default.

use tracing::debug;

use crate::color::Rgb;
use crate::config::{Distribution, HubPlacement, LensKind, ParticleConfig, ShapeKind};
use crate::error::AttributeError;

/// Raw value of one attribute, `None` when the attribute is absent.
#[derive(Clone, Copy, Debug)]
pub struct AttributeValue<'a> {
    pub name: &'static str,
    pub raw: Option<&'a str>,
}

pub struct AttributeSpec {
    pub name: &'static str,
    pub regenerates: bool,
    pub apply: fn(&mut ParticleConfig, AttributeValue<'_>),
}

/// Parse the leading integer of `raw`, ignoring whatever follows it.
///
/// `"12px"` is 12 and `"250.9"` is 250; input without leading digits is an
/// error.
pub fn parse_int(name: &'static str, raw: &str) -> Result<i64, AttributeError> {
    let s = raw.trim_start();
    let digits_start = usize::from(s.starts_with(['+', '-']));
    let digits_len = s[digits_start..].bytes().take_while(u8::is_ascii_digit).count();
    s[..digits_start + digits_len]
        .parse::<i64>()
        .map_err(|_| AttributeError::InvalidNumber { name, value: raw.to_owned() })
}

pub fn parse_float(name: &'static str, raw: &str) -> Result<f32, AttributeError> {
    raw.trim()
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| AttributeError::InvalidNumber { name, value: raw.to_owned() })
}

pub fn parse_color(name: &'static str, raw: &str) -> Result<Rgb, AttributeError> {
    Rgb::from_hex(raw).ok_or_else(|| AttributeError::InvalidColor { name, value: raw.to_owned() })
}

impl AttributeValue<'_> {
    fn present(&self) -> Option<&str> {
        self.raw.filter(|s| !s.trim().is_empty())
    }

    fn fallback<T: std::fmt::Debug>(&self, err: AttributeError, default: T) -> T {
        debug!(%err, ?default, "attribute fallback");
        default
    }

    /// Non-negative integer; zero and bad input mean `default`.
    fn count_or(&self, default: usize) -> usize {
        match self.present().map(|s| parse_int(self.name, s)) {
            Some(Ok(v)) if v > 0 => v as usize,
            Some(Ok(_)) | None => default,
            Some(Err(e)) => self.fallback(e, default),
        }
    }

    /// Float where zero also means `default`.
    fn float_or(&self, default: f32) -> f32 {
        match self.present().map(|s| parse_float(self.name, s)) {
            Some(Ok(v)) if v != 0.0 => v,
            Some(Ok(_)) | None => default,
            Some(Err(e)) => self.fallback(e, default),
        }
    }

    /// Float where zero is a legitimate value.
    fn float_keep_zero(&self, default: f32) -> f32 {
        match self.present().map(|s| parse_float(self.name, s)) {
            Some(Ok(v)) => v,
            None => default,
            Some(Err(e)) => self.fallback(e, default),
        }
    }

    /// Absent or `"false"` is false, anything else is true.
    fn flag(&self) -> bool {
        matches!(self.raw, Some(v) if v != "false")
    }

    fn color_or(&self, default: Rgb) -> Rgb {
        match self.present().map(|s| parse_color(self.name, s)) {
            Some(Ok(c)) => c,
            None => default,
            Some(Err(e)) => self.fallback(e, default),
        }
    }
}

macro_rules! attr {
    ($name:literal, regen, $apply:expr) => {
        AttributeSpec { name: $name, regenerates: true, apply: $apply }
    };
    ($name:literal, $apply:expr) => {
        AttributeSpec { name: $name, regenerates: false, apply: $apply }
    };
}

pub static ATTRIBUTES: &[AttributeSpec] = &[
    attr!("shape", regen, |c, v| {
        // Removing the attribute leaves no shape, as does an unknown name.
        c.shape = v.raw.and_then(|name| ShapeKind::from_name(name.trim()))
    }),
    attr!("density", regen, |c, v| c.density = v.count_or(1500)),
    attr!("spacing", |c, v| c.spacing = v.float_or(1.0)),
    attr!("randomness", regen, |c, v| c.randomness = v.float_keep_zero(0.0)),
    attr!("size", |c, v| c.square_size = v.float_or(3.0)),
    attr!("color", |c, v| c.color = v.color_or(Rgb::WHITE)),
    attr!("bg", |c, v| c.bg_color = v.color_or(Rgb::new(0x0a, 0x0a, 0x0a))),
    attr!("perspective", |c, v| c.focal_length = v.count_or(50) as f32),
    attr!("speed", |c, v| c.rot_speed = v.float_or(0.003)),
    attr!("depth-opacity", |c, v| c.depth_opacity = v.flag()),
    attr!("depth-sizing", |c, v| c.depth_sizing = v.flag()),
    attr!("auto-rotate", |c, v| c.auto_rotate = v.flag()),
    attr!("spiral-arms", regen, |c, v| c.spiral_arms = v.count_or(4) as u32),
    attr!("rotate-x", |c, v| c.rot_x = v.float_keep_zero(0.0)),
    attr!("rotate-y", |c, v| c.rot_y = v.float_keep_zero(0.0)),
    attr!("rotate-z", |c, v| c.rot_z = v.float_keep_zero(0.0)),
    attr!("focal-length", |c, v| c.focal_length = v.float_or(50.0)),
    attr!("lens", |c, v| {
        c.lens = match v.present() {
            Some("orthographic") => LensKind::Orthographic,
            _ => LensKind::Perspective,
        }
    }),
    attr!("connections", regen, |c, v| c.connections_enabled = v.flag()),
    attr!("hubs", regen, |c, v| c.hub_count = v.count_or(3)),
    attr!("connections-per-hub", regen, |c, v| c.connections_per_hub = v.count_or(15)),
    attr!("connection-opacity", |c, v| c.connection_opacity = v.float_or(0.3)),
    attr!("connection-thickness", |c, v| c.connection_thickness = v.float_or(1.0)),
    attr!("hub-placement", regen, |c, v| {
        c.hub_placement = match v.present() {
            None => HubPlacement::Mixed,
            Some("mixed") => HubPlacement::Mixed,
            Some("inside") => HubPlacement::Inside,
            Some(_) => HubPlacement::Outside,
        }
    }),
    attr!("hub-visible", |c, v| c.hub_visible = v.flag()),
    attr!("hub-size", |c, v| c.hub_size = v.float_or(6.0)),
    attr!("connection-depth-opacity", |c, v| c.connection_depth_opacity = v.flag()),
    attr!("connection-distribution", regen, |c, v| {
        c.connection_distribution = match v.present() {
            None | Some("weighted") => Distribution::Weighted,
            Some("random") => Distribution::Random,
            Some("stratified") => Distribution::Stratified,
            Some(_) => Distribution::Nearest,
        }
    }),
    attr!("connection-spread", regen, |c, v| c.connection_spread = v.float_keep_zero(0.5)),
    attr!("connection-focus", regen, |c, v| c.connection_focus = v.float_keep_zero(0.5)),
    attr!("highlight-connected", |c, v| c.highlight_connected = v.flag()),
    attr!("non-connected-color", |c, v| {
        c.non_connected_color = v.color_or(Rgb::new(0x40, 0x40, 0x40))
    }),
    attr!("non-connected-opacity", |c, v| c.non_connected_opacity = v.float_keep_zero(0.4)),
    attr!("zoom", |c, v| c.zoom = v.float_or(1.0)),
    attr!("pixelate", |c, v| c.pixelate = v.count_or(0) as u32),
    attr!("float", regen, |c, v| c.float_enabled = v.flag()),
    attr!("float-radius", |c, v| c.float_radius = v.float_or(0.1)),
    attr!("float-speed", |c, v| c.float_speed = v.float_or(1.0)),
    attr!("float-variability", |c, v| c.float_variability = v.float_keep_zero(0.5)),
    attr!("voronoi-cells", regen, |c, v| c.voronoi_cells = v.count_or(12)),
    attr!("voronoi-membrane-width", |c, v| c.voronoi_membrane_width = v.float_or(0.05)),
    attr!("voronoi-speed", |c, v| c.voronoi_speed = v.float_keep_zero(0.5)),
    attr!("voronoi-variability", |c, v| c.voronoi_variability = v.float_keep_zero(0.5)),
];

pub fn find(name: &str) -> Option<&'static AttributeSpec> {
    ATTRIBUTES.iter().find(|spec| spec.name == name)
}

/// Whether a change to `name` invalidates points, phases and connections.
pub fn is_regeneration_trigger(name: &str) -> bool {
    find(name).is_some_and(|spec| spec.regenerates)
}

/// Apply one attribute. Returns `None` for unknown names, otherwise whether
/// the particle set must be regenerated.
pub fn apply_attribute(config: &mut ParticleConfig, name: &str, raw: Option<&str>) -> Option<bool> {
    let spec = find(name)?;
    (spec.apply)(config, AttributeValue { name: spec.name, raw });
    Some(spec.regenerates)
}
