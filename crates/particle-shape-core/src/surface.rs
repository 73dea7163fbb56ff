//! Immediate-mode raster target.

use glam::Vec2;

use crate::color::{Rgb, Rgba};

/// The drawing operations the renderer needs.
pub trait Surface {
    /// Fill an axis-aligned rectangle with source-over blending.
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba);
    /// Stroke a round-capped line segment.
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba);
    /// Draw `src` scaled to `dest_width` x `dest_height` at the origin
    /// without smoothing.
    fn blit_nearest(&mut self, src: &PixelBuffer, dest_width: f32, dest_height: f32);
}

/// RGBA8 software surface.
///
/// Used as the low-resolution intermediate for pixelation and as an
/// inspectable target in tests.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

#[inline]
fn blend_channel(src: u8, dst: u8, alpha: f32) -> u8 {
    (src as f32 * alpha + dst as f32 * (1.0 - alpha)).round() as u8
}

/// Squared distance from `p` to the segment `a..b`.
fn segment_distance_sq(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    let t = if len_sq > 0.0 {
        ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    (a + ab * t).distance_squared(p)
}

impl PixelBuffer {
    /// Transparent buffer of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0; 4]; width as usize * height as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `[r, g, b, a]` at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x < self.width && y < self.height {
            Some(self.pixels[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Row-major RGBA bytes, suitable for `ImageData`.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn clear(&mut self, color: Rgb) {
        self.pixels.fill([color.r, color.g, color.b, 255]);
    }

    /// Every pixel equals `color` (fully opaque).
    pub fn is_uniform(&self, color: Rgb) -> bool {
        self.pixels.iter().all(|p| *p == [color.r, color.g, color.b, 255])
    }

    fn blend(&mut self, x: u32, y: u32, src: [u8; 3], alpha: f32) {
        if alpha <= 0.0 {
            return;
        }
        let alpha = alpha.min(1.0);
        let dst = &mut self.pixels[(y * self.width + x) as usize];
        dst[0] = blend_channel(src[0], dst[0], alpha);
        dst[1] = blend_channel(src[1], dst[1], alpha);
        dst[2] = blend_channel(src[2], dst[2], alpha);
        dst[3] = blend_channel(255, dst[3], alpha);
    }

    /// Clip a half-open span `[lo, hi)` in pixel units to `0..limit`.
    fn span(lo: f32, hi: f32, limit: u32) -> (u32, u32) {
        let lo = lo.max(0.0).min(limit as f32) as u32;
        let hi = hi.max(0.0).min(limit as f32) as u32;
        (lo, hi)
    }
}

impl Surface for PixelBuffer {
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
        if !(w > 0.0 && h > 0.0) || !x.is_finite() || !y.is_finite() {
            return;
        }
        // Cover pixels whose centre lies inside; sub-pixel rects still hit one.
        let x0 = x.round();
        let y0 = y.round();
        let x1 = (x + w).round().max(x0 + 1.0);
        let y1 = (y + h).round().max(y0 + 1.0);
        let (x0, x1) = Self::span(x0, x1, self.width);
        let (y0, y1) = Self::span(y0, y1, self.height);
        let rgb = [color.rgb.r, color.rgb.g, color.rgb.b];
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend(px, py, rgb, color.a);
            }
        }
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        if !(width > 0.0) || !from.is_finite() || !to.is_finite() {
            return;
        }
        let half = (width / 2.0).max(0.5);
        // Hairlines are drawn one pixel wide at reduced coverage.
        let alpha = color.a * width.min(1.0);
        let min = from.min(to) - Vec2::splat(half);
        let max = from.max(to) + Vec2::splat(half);
        let (x0, x1) = Self::span(min.x.floor(), max.x.ceil(), self.width);
        let (y0, y1) = Self::span(min.y.floor(), max.y.ceil(), self.height);
        let rgb = [color.rgb.r, color.rgb.g, color.rgb.b];
        let half_sq = half * half;
        for py in y0..y1 {
            for px in x0..x1 {
                let centre = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
                if segment_distance_sq(centre, from, to) <= half_sq {
                    self.blend(px, py, rgb, alpha);
                }
            }
        }
    }

    fn blit_nearest(&mut self, src: &PixelBuffer, dest_width: f32, dest_height: f32) {
        if src.width == 0 || src.height == 0 || !(dest_width > 0.0 && dest_height > 0.0) {
            return;
        }
        let (_, x1) = Self::span(0.0, dest_width.ceil(), self.width);
        let (_, y1) = Self::span(0.0, dest_height.ceil(), self.height);
        let sx_scale = src.width as f32 / dest_width;
        let sy_scale = src.height as f32 / dest_height;
        for py in 0..y1 {
            let sy = (((py as f32 + 0.5) * sy_scale) as u32).min(src.height - 1);
            for px in 0..x1 {
                let sx = (((px as f32 + 0.5) * sx_scale) as u32).min(src.width - 1);
                let [r, g, b, a] = src.pixels[(sy * src.width + sx) as usize];
                self.blend(px, py, [r, g, b], a as f32 / 255.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_rect_clips_and_blends() {
        let mut buf = PixelBuffer::new(4, 4);
        buf.clear(Rgb::new(0, 0, 0));
        buf.fill_rect(-2.0, -2.0, 4.0, 4.0, Rgb::WHITE.with_alpha(1.0));
        assert_eq!(buf.pixel(0, 0), Some([255, 255, 255, 255]));
        assert_eq!(buf.pixel(1, 1), Some([255, 255, 255, 255]));
        assert_eq!(buf.pixel(2, 2), Some([0, 0, 0, 255]));

        buf.fill_rect(2.0, 2.0, 1.0, 1.0, Rgb::WHITE.with_alpha(0.5));
        let [r, _, _, a] = buf.pixel(2, 2).unwrap();
        assert!((127..=128).contains(&r), "half-alpha blend gave {}", r);
        assert_eq!(a, 255);
    }

    #[test]
    fn test_sub_pixel_rect_covers_one_pixel() {
        let mut buf = PixelBuffer::new(3, 3);
        buf.fill_rect(1.2, 1.2, 0.3, 0.3, Rgb::WHITE.with_alpha(1.0));
        assert_eq!(buf.pixel(1, 1), Some([255, 255, 255, 255]));
        assert_eq!(buf.pixel(0, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_stroke_line_hits_endpoints_only_along_path() {
        let mut buf = PixelBuffer::new(10, 10);
        buf.clear(Rgb::new(0, 0, 0));
        buf.stroke_line(Vec2::new(0.5, 0.5), Vec2::new(9.5, 0.5), 1.0, Rgb::WHITE.with_alpha(1.0));
        assert_eq!(buf.pixel(0, 0), Some([255, 255, 255, 255]));
        assert_eq!(buf.pixel(9, 0), Some([255, 255, 255, 255]));
        assert_eq!(buf.pixel(5, 5), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_blit_nearest_upscales_blocks() {
        let mut small = PixelBuffer::new(2, 1);
        small.clear(Rgb::new(0, 0, 0));
        small.fill_rect(1.0, 0.0, 1.0, 1.0, Rgb::WHITE.with_alpha(1.0));

        let mut big = PixelBuffer::new(8, 4);
        big.blit_nearest(&small, 8.0, 4.0);
        for y in 0..4 {
            assert_eq!(big.pixel(3, y), Some([0, 0, 0, 255]));
            assert_eq!(big.pixel(4, y), Some([255, 255, 255, 255]));
        }
    }

    #[test]
    fn test_as_bytes_layout() {
        let mut buf = PixelBuffer::new(2, 1);
        buf.clear(Rgb::new(1, 2, 3));
        assert_eq!(buf.as_bytes(), &[1, 2, 3, 255, 1, 2, 3, 255]);
    }
}
