use crate::assets::color::Color;
use crate::foundation::core::Rgba8Premul;

/// Direction a linear gradient runs across its box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GradientAxis {
    /// Left to right.
    Horizontal,
    /// Top to bottom.
    Vertical,
    /// Top-left to bottom-right corner.
    Diagonal,
}

/// Color at a position along the gradient (`0..=1`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    /// Position along the axis.
    pub offset: f32,
    /// Color at that position.
    pub color: Color,
}

const fn stop(offset: f32, color: Color) -> GradientStop {
    GradientStop { offset, color }
}

/// A linear gradient over an axis-aligned box.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearGradient {
    /// Direction.
    pub axis: GradientAxis,
    /// Stops sorted by offset.
    pub stops: Vec<GradientStop>,
}

impl LinearGradient {
    /// Gradient through `stops`, which are sorted by offset.
    pub fn new(axis: GradientAxis, stops: &[GradientStop]) -> Self {
        let mut stops = stops.to_vec();
        stops.sort_by(|a, b| a.offset.total_cmp(&b.offset));
        Self { axis, stops }
    }

    /// Premultiplied color at `t`, clamped to the end stops.
    pub fn sample(&self, t: f32) -> Rgba8Premul {
        let (Some(first), Some(last)) = (self.stops.first(), self.stops.last()) else {
            return Rgba8Premul::transparent();
        };
        if t <= first.offset {
            return first.color.to_premul();
        }
        if t >= last.offset {
            return last.color.to_premul();
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.offset {
                let span = b.offset - a.offset;
                let local = if span <= 0.0 { 1.0 } else { (t - a.offset) / span };
                return lerp_premul(a.color.to_premul(), b.color.to_premul(), local);
            }
        }
        last.color.to_premul()
    }

    /// Premultiplied RGBA8 image of the gradient filling a `w`x`h` box.
    pub fn rasterize(&self, w: u32, h: u32) -> Vec<u8> {
        let mut bytes = vec![0u8; (w as usize).saturating_mul(h as usize).saturating_mul(4)];
        let (wf, hf) = (w.max(1) as f32, h.max(1) as f32);
        let diag_len2 = wf * wf + hf * hf;
        for y in 0..h {
            let py = y as f32 + 0.5;
            for x in 0..w {
                let px = x as f32 + 0.5;
                let t = match self.axis {
                    GradientAxis::Horizontal => px / wf,
                    GradientAxis::Vertical => py / hf,
                    GradientAxis::Diagonal => (px * wf + py * hf) / diag_len2,
                };
                let idx = ((y as usize) * (w as usize) + (x as usize)) * 4;
                bytes[idx..idx + 4].copy_from_slice(&self.sample(t).to_array());
            }
        }
        bytes
    }
}

fn lerp_premul(a: Rgba8Premul, b: Rgba8Premul, t: f32) -> Rgba8Premul {
    let t = t.clamp(0.0, 1.0);
    let lerp = |a: u8, b: u8| -> u8 {
        let af = f32::from(a);
        let bf = f32::from(b);
        (af + (bf - af) * t).round().clamp(0.0, 255.0) as u8
    };
    Rgba8Premul {
        r: lerp(a.r, b.r),
        g: lerp(a.g, b.g),
        b: lerp(a.b, b.b),
        a: lerp(a.a, b.a),
    }
}

/// Named color-stop list selectable for the gradient effect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientPreset {
    /// Stable id stored on layers.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Stops, left to right.
    pub stops: &'static [GradientStop],
}

impl GradientPreset {
    /// Horizontal gradient through this preset's stops.
    pub fn horizontal(&self) -> LinearGradient {
        LinearGradient::new(GradientAxis::Horizontal, self.stops)
    }
}

static PRESETS: [GradientPreset; 8] = [
    GradientPreset {
        id: "sunset",
        name: "Sunset",
        stops: &[
            stop(0.0, Color::rgb(0xFF, 0x6B, 0x6B)),
            stop(0.5, Color::rgb(0xFF, 0xA5, 0x00)),
            stop(1.0, Color::rgb(0xFF, 0xD7, 0x00)),
        ],
    },
    GradientPreset {
        id: "ocean",
        name: "Ocean",
        stops: &[
            stop(0.0, Color::rgb(0x00, 0xC6, 0xFF)),
            stop(1.0, Color::rgb(0x00, 0x72, 0xFF)),
        ],
    },
    GradientPreset {
        id: "purple-haze",
        name: "Purple Haze",
        stops: &[
            stop(0.0, Color::rgb(0x7F, 0x00, 0xFF)),
            stop(1.0, Color::rgb(0xE1, 0x00, 0xFF)),
        ],
    },
    GradientPreset {
        id: "rainbow",
        name: "Rainbow",
        stops: &[
            stop(0.0, Color::rgb(0xFF, 0x00, 0x00)),
            stop(0.2, Color::rgb(0xFF, 0x7F, 0x00)),
            stop(0.4, Color::rgb(0xFF, 0xFF, 0x00)),
            stop(0.6, Color::rgb(0x00, 0xFF, 0x00)),
            stop(0.8, Color::rgb(0x00, 0x00, 0xFF)),
            stop(1.0, Color::rgb(0x8B, 0x00, 0xFF)),
        ],
    },
    GradientPreset {
        id: "gold",
        name: "Gold",
        stops: &[
            stop(0.0, Color::rgb(0xBF, 0x95, 0x3F)),
            stop(0.25, Color::rgb(0xFC, 0xF6, 0xBA)),
            stop(0.5, Color::rgb(0xB3, 0x87, 0x28)),
            stop(0.75, Color::rgb(0xFB, 0xF5, 0xB7)),
            stop(1.0, Color::rgb(0xAA, 0x77, 0x1C)),
        ],
    },
    GradientPreset {
        id: "fire",
        name: "Fire",
        stops: &[
            stop(0.0, Color::rgb(0xFF, 0x00, 0x00)),
            stop(0.5, Color::rgb(0xFF, 0x45, 0x00)),
            stop(1.0, Color::rgb(0xFF, 0xD7, 0x00)),
        ],
    },
    GradientPreset {
        id: "mint",
        name: "Mint",
        stops: &[
            stop(0.0, Color::rgb(0x00, 0xB0, 0x9B)),
            stop(1.0, Color::rgb(0x96, 0xC9, 0x3D)),
        ],
    },
    GradientPreset {
        id: "candy",
        name: "Candy",
        stops: &[
            stop(0.0, Color::rgb(0xFF, 0x9A, 0x9E)),
            stop(0.5, Color::rgb(0xFA, 0xD0, 0xC4)),
            stop(1.0, Color::rgb(0xFB, 0xC2, 0xEB)),
        ],
    },
];

/// All presets.
pub fn presets() -> &'static [GradientPreset] {
    &PRESETS
}

/// Preset by id.
pub fn preset(id: &str) -> Option<&'static GradientPreset> {
    PRESETS.iter().find(|p| p.id == id)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/gradients.rs"]
mod tests;
