use crate::foundation::core::{Affine, Canvas, Point, Rect};
use crate::scene::model::{Align, TextLayer};
use crate::text::library::{ESTIMATED_ADVANCE_EM, FontLibrary};

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT_EM: f64 = 1.3;

/// Resolved typography of a layer.
#[derive(Clone, Debug, PartialEq)]
pub struct FontSpec {
    /// Requested family name.
    pub family: String,
    /// Size in pixels.
    pub size: f64,
    /// Bold weight.
    pub bold: bool,
    /// Italic style.
    pub italic: bool,
}

impl FontSpec {
    /// Typography of `layer`.
    pub fn of(layer: &TextLayer) -> Self {
        Self {
            family: layer.font.clone(),
            size: layer.font_size,
            bold: layer.bold,
            italic: layer.italic,
        }
    }

    /// CSS font shorthand, e.g. `italic bold 48px Montserrat`.
    pub fn css(&self) -> String {
        let mut out = String::new();
        if self.italic {
            out.push_str("italic ");
        }
        if self.bold {
            out.push_str("bold ");
        }
        out.push_str(&format!("{}px {}", self.size, self.family));
        out
    }

    /// Height of one line in pixels.
    pub fn line_height(&self) -> f64 {
        self.size * LINE_HEIGHT_EM
    }
}

/// Glyphs of one shaped run, positioned relative to their line origin.
#[derive(Clone, Debug)]
pub struct GlyphRunData {
    /// Face to rasterize with.
    pub font: vello_cpu::peniko::FontData,
    /// Size in pixels.
    pub font_size: f32,
    /// Positioned glyphs.
    pub glyphs: Vec<vello_cpu::Glyph>,
}

/// Output of [`FontLibrary::shape_line`].
#[derive(Clone, Debug)]
pub(crate) struct ShapedLine {
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) runs: Vec<GlyphRunData>,
}

/// One laid-out line of a text block.
#[derive(Clone, Debug)]
pub struct PlacedLine {
    /// Line text.
    pub text: String,
    /// Top-left of the line's glyph box in layer-local space.
    pub origin: Point,
    /// Advance width in pixels.
    pub width: f64,
    /// Shaped glyphs; empty when metrics are estimated.
    pub runs: Vec<GlyphRunData>,
}

/// Measured multi-line text block in layer-local space (origin at the layer anchor, before
/// rotation).
#[derive(Clone, Debug)]
pub struct TextBlock {
    /// Lines, top to bottom.
    pub lines: Vec<PlacedLine>,
    /// Widest line.
    pub width: f64,
    /// `lines * line_height`.
    pub height: f64,
    /// Pixel height of one line slot.
    pub line_height: f64,
    /// Block bounds.
    pub bounds: Rect,
    /// `true` when no face was available and widths are estimated.
    pub estimated: bool,
}

impl TextBlock {
    /// `true` when there is nothing to rasterize.
    pub fn has_glyphs(&self) -> bool {
        self.lines
            .iter()
            .any(|l| l.runs.iter().any(|r| !r.glyphs.is_empty()))
    }
}

/// A layer's measured block plus its placement on the canvas.
#[derive(Clone, Debug)]
pub struct LayerGeometry {
    /// Local-to-canvas transform: translate to the anchor, then rotate.
    pub transform: Affine,
    /// Measured block.
    pub block: TextBlock,
}

impl LayerGeometry {
    /// Whether canvas point `p` is within the block bounds expanded by `margin` pixels.
    pub fn contains(&self, p: Point, margin: f64) -> bool {
        let local = self.transform.inverse() * p;
        self.block.bounds.inflate(margin, margin).contains(local)
    }

    /// Axis-aligned canvas-space box of the block expanded by `margin`.
    pub fn canvas_bbox(&self, margin: f64) -> Rect {
        self.transform
            .transform_rect_bbox(self.block.bounds.inflate(margin, margin))
    }
}

/// Anchor translation and rotation of `layer` on `canvas`.
pub fn layer_transform(layer: &TextLayer, canvas: Canvas) -> Affine {
    let anchor = canvas.percent_to_px(layer.x, layer.y);
    Affine::translate(anchor.to_vec2()) * Affine::rotate(layer.rotation.to_radians())
}

/// Measure `layer` the one way both the renderer and the hit-tester use.
pub fn measure_text_block(fonts: &mut FontLibrary, layer: &TextLayer) -> TextBlock {
    let spec = FontSpec::of(layer);
    let line_height = spec.line_height();
    let texts: Vec<&str> = layer.lines().collect();
    let height = texts.len() as f64 * line_height;
    let top = -height / 2.0;

    let mut estimated = false;
    let mut shaped: Vec<(String, f64, f64, Vec<GlyphRunData>)> = Vec::with_capacity(texts.len());
    for text in &texts {
        match fonts.shape_line(text, &spec) {
            Some(line) => shaped.push((text.to_string(), line.width, line.height, line.runs)),
            None => {
                estimated = true;
                let w = ESTIMATED_ADVANCE_EM * spec.size * text.chars().count() as f64;
                shaped.push((text.to_string(), w, line_height, Vec::new()));
            }
        }
    }

    let width = shaped.iter().map(|(_, w, _, _)| *w).fold(0.0, f64::max);
    let lines = shaped
        .into_iter()
        .enumerate()
        .map(|(i, (text, w, h, runs))| {
            let slot_top = top + i as f64 * line_height;
            PlacedLine {
                text,
                origin: Point::new(align_offset(layer.align, w), slot_top + (line_height - h) / 2.0),
                width: w,
                runs,
            }
        })
        .collect();

    let x0 = align_offset(layer.align, width);
    TextBlock {
        lines,
        width,
        height,
        line_height,
        bounds: Rect::new(x0, top, x0 + width, top + height),
        estimated,
    }
}

/// Measure and place `layer` on `canvas`.
pub fn measure_layer_bounds(
    fonts: &mut FontLibrary,
    layer: &TextLayer,
    canvas: Canvas,
) -> LayerGeometry {
    LayerGeometry {
        transform: layer_transform(layer, canvas),
        block: measure_text_block(fonts, layer),
    }
}

fn align_offset(align: Align, width: f64) -> f64 {
    match align {
        Align::Left => 0.0,
        Align::Center => -width / 2.0,
        Align::Right => -width,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/layout.rs"]
mod tests;
