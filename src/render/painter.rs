//! Paints one text layer into the per-layer buffer.
//!
//! Passes without a shadow share one rasterization. A shadowed pass closes the batch in
//! progress, rasterizes its shadow alone, blurs it, and composites it before the pass
//! itself joins the next batch.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::assets::color::Color;
use crate::effects::blur::{PixelRect, blur_region_in_place, radius_for_sigma};
use crate::effects::composite::over_in_place;
use crate::effects::gradients::LinearGradient;
use crate::effects::recipe::{PassMode, PassPaint, PassShadow, StrokeJoin, TextPass};
use crate::foundation::core::{Affine, Canvas, Rect, Vec2};
use crate::foundation::error::{TextcompError, TextcompResult};
use crate::render::surface::Rasterizer;
use crate::text::layout::LayerGeometry;

/// Dashed outline drawn around the active layer in editor previews.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectionStyle {
    /// Stroke color.
    pub color: Color,
    /// Stroke width in pixels.
    pub width: f64,
    /// Gap between the text bounds and the outline.
    pub padding: f64,
    /// Dash and gap lengths.
    pub dash: [f64; 2],
}

impl Default for SelectionStyle {
    fn default() -> Self {
        Self {
            color: Color::rgb(0x00, 0xA3, 0xFF),
            width: 2.0,
            padding: 10.0,
            dash: [5.0, 5.0],
        }
    }
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

pub(crate) fn pixmap_from_premul_bytes(
    width: u32,
    height: u32,
    rgba8_premul: &[u8],
) -> TextcompResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| TextcompError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| TextcompError::render("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(TextcompError::render("image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

pub(crate) fn image_paint(
    width: u32,
    height: u32,
    rgba8_premul: &[u8],
) -> TextcompResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(width, height, rgba8_premul)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

/// Gradient pre-rasterized over a text block, plus where its top-left sits in local space.
struct GradientImage {
    paint: vello_cpu::Image,
    origin: Vec2,
}

fn gradient_image(gradient: &LinearGradient, bounds: Rect) -> TextcompResult<GradientImage> {
    let w = bounds.width().ceil().max(1.0) as u32;
    let h = bounds.height().ceil().max(1.0) as u32;
    let bytes = gradient.rasterize(w, h);
    Ok(GradientImage {
        paint: image_paint(w, h, &bytes)?,
        origin: Vec2::new(bounds.x0, bounds.y0),
    })
}

enum ResolvedPaint {
    Solid(vello_cpu::peniko::Color),
    Image(GradientImage),
}

fn resolve_paint(paint: &PassPaint, bounds: Rect) -> TextcompResult<ResolvedPaint> {
    Ok(match paint {
        PassPaint::Solid(c) => ResolvedPaint::Solid(c.to_cpu()),
        PassPaint::Gradient(g) => ResolvedPaint::Image(gradient_image(g, bounds)?),
    })
}

fn cpu_stroke(width: f64, join: StrokeJoin, miter_limit: f64) -> vello_cpu::kurbo::Stroke {
    let join = match join {
        StrokeJoin::Miter => vello_cpu::kurbo::Join::Miter,
        StrokeJoin::Round => vello_cpu::kurbo::Join::Round,
    };
    vello_cpu::kurbo::Stroke::new(width)
        .with_join(join)
        .with_miter_limit(miter_limit)
}

/// Local-to-canvas transform of a pass displaced by `offset` in the layer's frame.
fn pass_transform(geometry: &LayerGeometry, offset: Vec2) -> Affine {
    geometry.transform * Affine::translate(offset)
}

/// Transform of a pass's shadow. The shadow offset is in canvas space, so it does not turn
/// with the layer's rotation.
fn shadow_transform(geometry: &LayerGeometry, pass: &TextPass, shadow: &PassShadow) -> Affine {
    Affine::translate(shadow.offset) * pass_transform(geometry, pass.offset)
}

/// Record the layer's glyphs once under `transform`, with `paint` and `mode`.
fn record_glyphs(
    ctx: &mut vello_cpu::RenderContext,
    geometry: &LayerGeometry,
    paint: &ResolvedPaint,
    mode: PassMode,
    transform: Affine,
) {
    ctx.set_transform(affine_to_cpu(transform));
    match paint {
        ResolvedPaint::Solid(c) => {
            ctx.set_paint(*c);
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        }
        ResolvedPaint::Image(img) => {
            ctx.set_paint(img.paint.clone());
            ctx.set_paint_transform(affine_to_cpu(Affine::translate(img.origin)));
        }
    }
    if let PassMode::Stroke {
        width,
        join,
        miter_limit,
    } = mode
    {
        ctx.set_stroke(cpu_stroke(width, join, miter_limit));
    }

    for line in &geometry.block.lines {
        let (ox, oy) = (line.origin.x as f32, line.origin.y as f32);
        for run in &line.runs {
            let glyphs = run.glyphs.iter().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x + ox,
                y: g.y + oy,
            });
            let builder = ctx.glyph_run(&run.font).font_size(run.font_size);
            match mode {
                PassMode::Fill => builder.fill_glyphs(glyphs),
                PassMode::Stroke { .. } => builder.stroke_glyphs(glyphs),
            }
        }
    }
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
}

fn record_selection(
    ctx: &mut vello_cpu::RenderContext,
    geometry: &LayerGeometry,
    style: &SelectionStyle,
) {
    let outline = geometry.block.bounds.inflate(style.padding, style.padding);
    ctx.set_transform(affine_to_cpu(geometry.transform));
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(style.color.to_cpu());
    ctx.set_stroke(vello_cpu::kurbo::Stroke::new(style.width).with_dashes(0.0, style.dash));
    ctx.stroke_rect(&rect_to_cpu(outline));
}

fn stroke_reach(mode: PassMode) -> f64 {
    match mode {
        PassMode::Fill => 0.0,
        PassMode::Stroke {
            width, miter_limit, ..
        } => width / 2.0 * miter_limit.max(1.0),
    }
}

/// Canvas pixels a blurred shadow of `pass` can touch.
fn shadow_region(
    geometry: &LayerGeometry,
    pass: &TextPass,
    shadow: &PassShadow,
    canvas: Canvas,
) -> Option<PixelRect> {
    // Glyph ink may overhang the advance box (italics, swashes).
    let overhang = geometry.block.line_height * 0.25;
    let reach = overhang
        + stroke_reach(pass.mode)
        + f64::from(radius_for_sigma(shadow.sigma() as f32))
        + 2.0;
    let bbox = shadow_transform(geometry, pass, shadow)
        .transform_rect_bbox(geometry.block.bounds.inflate(reach, reach));
    PixelRect::covering(bbox, canvas.width, canvas.height)
}

struct Batch {
    passes: Vec<(ResolvedPaint, PassMode, Affine)>,
}

impl Batch {
    fn new() -> Self {
        Self { passes: Vec::new() }
    }

    fn flush(
        &mut self,
        raster: &mut Rasterizer,
        dst: &mut [u8],
        geometry: &LayerGeometry,
        selection: Option<&SelectionStyle>,
    ) -> TextcompResult<()> {
        if self.passes.is_empty() && selection.is_none() {
            return Ok(());
        }
        let passes = std::mem::take(&mut self.passes);
        raster.draw_over(dst, |ctx| {
            for (paint, mode, transform) in &passes {
                record_glyphs(ctx, geometry, paint, *mode, *transform);
            }
            if let Some(style) = selection {
                record_selection(ctx, geometry, style);
            }
            Ok(())
        })
    }
}

/// Paint `passes` of one layer into `dst`, a transparent canvas-sized premultiplied buffer.
pub(crate) fn paint_layer(
    raster: &mut Rasterizer,
    dst: &mut [u8],
    canvas: Canvas,
    geometry: &LayerGeometry,
    passes: &[TextPass],
    selection: Option<&SelectionStyle>,
) -> TextcompResult<()> {
    let bounds = geometry.block.bounds;
    let mut batch = Batch::new();

    if geometry.block.has_glyphs() {
        for pass in passes {
            if let Some(shadow) = pass.shadow.as_ref().filter(|s| s.is_visible()) {
                batch.flush(raster, dst, geometry, None)?;
                paint_shadow(raster, dst, canvas, geometry, pass, shadow)?;
            }
            batch.passes.push((
                resolve_paint(&pass.paint, bounds)?,
                pass.mode,
                pass_transform(geometry, pass.offset),
            ));
        }
    }

    batch.flush(raster, dst, geometry, selection)
}

fn paint_shadow(
    raster: &mut Rasterizer,
    dst: &mut [u8],
    canvas: Canvas,
    geometry: &LayerGeometry,
    pass: &TextPass,
    shadow: &PassShadow,
) -> TextcompResult<()> {
    let Some(region) = shadow_region(geometry, pass, shadow, canvas) else {
        return Ok(());
    };
    let paint = ResolvedPaint::Solid(shadow.color.to_cpu());
    let pixels = raster.rasterize(|ctx| {
        record_glyphs(
            ctx,
            geometry,
            &paint,
            pass.mode,
            shadow_transform(geometry, pass, shadow),
        );
        Ok(())
    })?;
    blur_region_in_place(
        pixels,
        canvas.width,
        canvas.height,
        region,
        shadow.sigma() as f32,
    )?;
    over_in_place(dst, pixels)
}

#[cfg(test)]
#[path = "../../tests/unit/render/painter.rs"]
mod tests;
