use crate::foundation::error::{TextcompError, TextcompResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Raster surface dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Largest edge accepted by the CPU rasterizer.
    pub const MAX_DIM: u32 = u16::MAX as u32;

    /// Create a validated canvas size.
    pub fn new(width: u32, height: u32) -> TextcompResult<Self> {
        let canvas = Self { width, height };
        canvas.validate()?;
        Ok(canvas)
    }

    /// Reject zero-sized or oversized canvases.
    pub fn validate(self) -> TextcompResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(TextcompError::validation("canvas width/height must be > 0"));
        }
        if self.width > Self::MAX_DIM || self.height > Self::MAX_DIM {
            return Err(TextcompError::validation(format!(
                "canvas {}x{} exceeds {}x{}",
                self.width,
                self.height,
                Self::MAX_DIM,
                Self::MAX_DIM
            )));
        }
        Ok(())
    }

    /// Number of bytes in a RGBA8 buffer of this size.
    pub fn byte_len(self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }

    /// Convert a percentage position (0..=100 on both axes) into canvas pixels.
    pub fn percent_to_px(self, x_pct: f64, y_pct: f64) -> Point {
        Point::new(
            x_pct / 100.0 * f64::from(self.width),
            y_pct / 100.0 * f64::from(self.height),
        )
    }

    /// Convert a canvas pixel position back into percentages, clamped to `[0, 100]`.
    pub fn px_to_percent(self, p: Point) -> (f64, f64) {
        (
            clamp_percent(p.x / f64::from(self.width) * 100.0),
            clamp_percent(p.y / f64::from(self.height) * 100.0),
        )
    }

    /// Whole-canvas rectangle in pixel space.
    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    /// Channel array in `[r, g, b, a]` order.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Clamp a value into the percentage range `[0, 100]`; NaN maps to 0.
pub fn clamp_percent(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 100.0) }
}

/// Clamp a rotation into `[-180, 180]` degrees; NaN maps to 0.
pub fn clamp_rotation(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(-180.0, 180.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
