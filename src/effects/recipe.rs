//! Effect recipes: each [`Effect`] expands to an ordered list of glyph passes.
//!
//! Passes are painted in order, each over the previous ones. A pass shadow is painted
//! under that pass only. When a recipe sets a shadow on one pass, later passes of the same
//! recipe keep it until another shadow replaces it, so the final fill of `neon` still
//! glows and the hairline stroke of `cinematic` casts the same soft shadow as its fill.

use crate::assets::color::Color;
use crate::effects::gradients::{self, GradientAxis, GradientStop, LinearGradient};
use crate::foundation::core::Vec2;
use crate::scene::model::Effect;

/// Largest number of extrusion copies drawn by the 3D effect.
pub const MAX_EXTRUSION: u32 = 40;

/// What a pass paints with.
#[derive(Clone, Debug, PartialEq)]
pub enum PassPaint {
    /// One color.
    Solid(Color),
    /// Gradient stretched over the text block bounds.
    Gradient(LinearGradient),
}

/// Corner style of stroked outlines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrokeJoin {
    /// Sharp corners up to the miter limit.
    Miter,
    /// Rounded corners.
    Round,
}

/// Fill or stroke the glyph outlines.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PassMode {
    /// Fill.
    Fill,
    /// Stroke centered on the outline.
    Stroke {
        /// Line width in pixels.
        width: f64,
        /// Corner style.
        join: StrokeJoin,
        /// Miter limit.
        miter_limit: f64,
    },
}

/// Blurred copy painted under a pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PassShadow {
    /// Shadow color.
    pub color: Color,
    /// Blur extent; the Gaussian sigma is half of it.
    pub blur: f64,
    /// Displacement from the pass in canvas pixels; it ignores the layer's rotation.
    pub offset: Vec2,
}

impl PassShadow {
    /// A shadow needs some color and either a blur or a displacement to show.
    pub fn is_visible(&self) -> bool {
        self.color.a > 0 && (self.blur > 0.0 || self.offset != Vec2::ZERO)
    }

    /// Gaussian standard deviation in pixels.
    pub fn sigma(&self) -> f64 {
        self.blur / 2.0
    }
}

/// One fill or stroke of the layer's glyphs.
#[derive(Clone, Debug, PartialEq)]
pub struct TextPass {
    /// Paint.
    pub paint: PassPaint,
    /// Fill or stroke.
    pub mode: PassMode,
    /// Displacement of the glyphs in layer-local pixels.
    pub offset: Vec2,
    /// Optional shadow.
    pub shadow: Option<PassShadow>,
}

impl TextPass {
    fn fill(paint: PassPaint) -> Self {
        Self {
            paint,
            mode: PassMode::Fill,
            offset: Vec2::ZERO,
            shadow: None,
        }
    }

    fn solid(color: Color) -> Self {
        Self::fill(PassPaint::Solid(color))
    }

    fn stroke(color: Color, width: f64, join: StrokeJoin) -> Self {
        Self {
            paint: PassPaint::Solid(color),
            mode: PassMode::Stroke {
                width,
                join,
                miter_limit: 2.0,
            },
            offset: Vec2::ZERO,
            shadow: None,
        }
    }

    fn at(mut self, dx: f64, dy: f64) -> Self {
        self.offset = Vec2::new(dx, dy);
        self
    }

    fn shadowed(mut self, color: Color, blur: f64, dx: f64, dy: f64) -> Self {
        self.shadow = Some(PassShadow {
            color,
            blur,
            offset: Vec2::new(dx, dy),
        });
        self
    }
}

fn vertical(stops: &[GradientStop]) -> PassPaint {
    PassPaint::Gradient(LinearGradient::new(GradientAxis::Vertical, stops))
}

fn horizontal(stops: &[GradientStop]) -> PassPaint {
    PassPaint::Gradient(LinearGradient::new(GradientAxis::Horizontal, stops))
}

fn stops(colors: &[(f32, Color)]) -> Vec<GradientStop> {
    colors
        .iter()
        .map(|&(offset, color)| GradientStop { offset, color })
        .collect()
}

/// Ordered passes for `effect`, ending with the pass that paints the text itself.
pub fn effect_passes(effect: &Effect, fill: Color) -> Vec<TextPass> {
    let passes = match effect {
        Effect::None => vec![TextPass::solid(fill)],

        Effect::Shadow { color, size } => {
            vec![TextPass::solid(fill).shadowed(*color, size * 2.0, *size, *size)]
        }

        Effect::Glow { color, size } => {
            vec![TextPass::solid(fill).shadowed(*color, size * 4.0, 0.0, 0.0)]
        }

        Effect::Neon { color, size } => vec![
            TextPass::solid(*color).shadowed(*color, size * 9.0, 0.0, 0.0),
            TextPass::solid(*color).shadowed(*color, size * 6.0, 0.0, 0.0),
            TextPass::solid(*color).shadowed(*color, size * 3.0, 0.0, 0.0),
            TextPass::solid(fill),
        ],

        Effect::Emboss => vec![
            TextPass::solid(Color::rgb_alpha(255, 255, 255, 0.5)).at(-2.0, -2.0),
            TextPass::solid(Color::rgb_alpha(0, 0, 0, 0.5)).at(2.0, 2.0),
            TextPass::solid(fill),
        ],

        Effect::Retro => vec![
            TextPass::solid(Color::rgb(0x45, 0xB7, 0xD1)).at(9.0, 9.0),
            TextPass::solid(Color::rgb(0x4E, 0xCD, 0xC4)).at(6.0, 6.0),
            TextPass::solid(Color::rgb(0xFF, 0x6B, 0x6B)).at(3.0, 3.0),
            TextPass::solid(fill),
        ],

        Effect::Outline { color, size } => vec![
            TextPass::stroke(*color, *size, StrokeJoin::Round),
            TextPass::solid(fill),
        ],

        Effect::Gradient { preset } => match preset.as_deref().and_then(gradients::preset) {
            Some(p) => vec![TextPass::fill(PassPaint::Gradient(p.horizontal()))],
            None => {
                if let Some(id) = preset {
                    tracing::debug!(preset = %id, "unknown gradient preset, using fill color");
                }
                vec![TextPass::solid(fill)]
            }
        },

        Effect::ThreeD { size } => {
            let depth = (size.round().max(0.0) as u32).min(MAX_EXTRUSION);
            let mut out = Vec::with_capacity(depth as usize + 2);
            for i in (1..=depth).rev() {
                let t = f64::from(i) / f64::from(depth);
                let shade = Color::gray_lightness(60.0 + 40.0 * (1.0 - t));
                out.push(TextPass::solid(shade).at(f64::from(i), f64::from(i)));
            }
            out.push(TextPass::solid(Color::WHITE).at(-1.0, -1.0));
            out.push(TextPass::solid(fill));
            out
        }

        Effect::Metallic => vec![
            TextPass::stroke(Color::rgb(0xB8, 0x86, 0x0B), 2.0, StrokeJoin::Miter),
            TextPass::fill(vertical(&stops(&[
                (0.0, Color::rgb(0xFF, 0xD7, 0x00)),
                (0.25, Color::rgb(0xFF, 0xF8, 0xDC)),
                (0.5, Color::WHITE),
                (0.75, Color::rgb(0xFF, 0xF8, 0xDC)),
                (1.0, Color::rgb(0xB8, 0x86, 0x0B)),
            ]))),
        ],

        Effect::Glass => vec![
            TextPass::fill(vertical(&stops(&[
                (0.0, Color::rgb_alpha(255, 255, 255, 0.9)),
                (0.5, Color::rgb_alpha(255, 255, 255, 0.5)),
                (1.0, Color::rgb_alpha(255, 255, 255, 0.8)),
            ])))
            .shadowed(Color::rgb_alpha(255, 255, 255, 0.5), 10.0, -2.0, -2.0),
        ],

        Effect::Fire => {
            let heat = Color::rgb(0xFF, 0x45, 0x00);
            let spark = Color::rgb(0xFF, 0xD7, 0x00);
            let mut out = Vec::with_capacity(5);
            for i in 0..4u32 {
                let c = if i % 2 == 0 { heat } else { spark };
                let fi = f64::from(i);
                out.push(
                    TextPass::solid(c)
                        .at(0.0, -2.0 * fi)
                        .shadowed(c, 20.0 - 5.0 * fi, 0.0, 0.0),
                );
            }
            out.push(TextPass::fill(vertical(&stops(&[
                (0.0, Color::rgb(0xFF, 0x00, 0x00)),
                (0.5, heat),
                (1.0, spark),
            ]))));
            out
        }

        Effect::Frost { size } => vec![
            TextPass::stroke(Color::rgb_alpha(255, 255, 255, 0.5), *size, StrokeJoin::Round)
                .shadowed(Color::rgb(0x87, 0xCE, 0xEB), 10.0, 0.0, 0.0),
            TextPass::fill(vertical(&stops(&[
                (0.0, Color::rgb(0xE0, 0xFF, 0xFF)),
                (0.5, Color::rgb(0xB0, 0xE0, 0xE6)),
                (1.0, Color::rgb(0x87, 0xCE, 0xEB)),
            ]))),
        ],

        Effect::Comic { color, size } => vec![
            TextPass::stroke(Color::BLACK, size + 4.0, StrokeJoin::Round),
            TextPass::stroke(Color::WHITE, size + 2.0, StrokeJoin::Round),
            TextPass::stroke(*color, *size, StrokeJoin::Round),
            TextPass::solid(fill),
        ],

        Effect::Vintage => vec![
            TextPass::fill(horizontal(&stops(&[
                (0.0, Color::rgb(0xD2, 0xB4, 0x8C)),
                (0.5, Color::rgb(0xF5, 0xDE, 0xB3)),
                (1.0, Color::rgb(0xD2, 0xB4, 0x8C)),
            ])))
            .shadowed(Color::rgb_alpha(139, 69, 19, 0.5), 2.0, 3.0, 3.0),
        ],

        Effect::Cinematic { size } => vec![
            TextPass::stroke(Color::rgb_alpha(0, 0, 0, 0.5), 1.0, StrokeJoin::Miter)
                .shadowed(Color::rgb_alpha(0, 0, 0, 0.8), size * 3.0, 0.0, 4.0),
            TextPass::fill(vertical(&stops(&[
                (0.0, Color::rgb(0xFF, 0xD7, 0x00)),
                (0.5, Color::WHITE),
                (1.0, Color::rgb(0xFF, 0xD7, 0x00)),
            ]))),
        ],
    };
    carry_shadows(passes)
}

fn carry_shadows(mut passes: Vec<TextPass>) -> Vec<TextPass> {
    let mut current: Option<PassShadow> = None;
    for pass in &mut passes {
        match pass.shadow {
            Some(s) => current = Some(s),
            None => pass.shadow = current,
        }
    }
    passes
}

#[cfg(test)]
#[path = "../../tests/unit/effects/recipe.rs"]
mod tests;
