use crate::assets::decode::DecodedImage;
use crate::foundation::core::Canvas;
use crate::foundation::error::{TextcompError, TextcompResult};

/// Largest raster edge produced for an SVG background.
const MAX_DIM: u32 = 16_384;

/// Raster size for an SVG that will be contain-fitted into `canvas`.
///
/// Rasterizing at the fitted size instead of the document's intrinsic size keeps small
/// vector backgrounds sharp when they are scaled up.
pub fn svg_raster_size(tree: &usvg::Tree, canvas: Canvas) -> TextcompResult<(u32, u32)> {
    let size = tree.size();
    let (w, h) = (f64::from(size.width()), f64::from(size.height()));
    if !w.is_finite() || !h.is_finite() || w <= 0.0 || h <= 0.0 {
        return Err(TextcompError::asset("svg has invalid width/height"));
    }

    let scale = (f64::from(canvas.width) / w).min(f64::from(canvas.height) / h);
    let out_w = (w * scale).round().max(1.0) as u32;
    let out_h = (h * scale).round().max(1.0) as u32;
    if out_w > MAX_DIM || out_h > MAX_DIM {
        return Err(TextcompError::asset(format!(
            "svg raster size too large: {out_w}x{out_h} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }
    Ok((out_w, out_h))
}

/// Rasterize the whole SVG into a `width`x`height` premultiplied image.
pub fn rasterize_svg(tree: &usvg::Tree, width: u32, height: u32) -> TextcompResult<DecodedImage> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| TextcompError::asset("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    // tiny-skia pixmaps are already premultiplied RGBA8.
    DecodedImage::from_premul(width, height, pixmap.take())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/svg_raster.rs"]
mod tests;
