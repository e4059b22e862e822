use serde::{Deserialize, Serialize};

use crate::assets::color::Color;
use crate::assets::decode::DecodedImage;
use crate::effects::composite::composite_over_rgba8_premul;
use crate::effects::recipe::effect_passes;
use crate::foundation::error::TextcompResult;
use crate::render::background::{PlaceholderStyle, paint_background};
use crate::render::painter::{SelectionStyle, paint_layer};
use crate::render::surface::RenderSurface;
use crate::scene::model::{LayerId, TextLayer};
use crate::text::layout::measure_layer_bounds;
use crate::text::library::FontLibrary;

/// Frame-independent render options.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderOpts {
    /// Color the surface is cleared to before the background.
    pub clear_color: Color,
    /// Placeholder drawn when there is no background image.
    pub placeholder: PlaceholderStyle,
    /// Outline drawn around the active layer.
    pub selection: SelectionStyle,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            clear_color: Color::TRANSPARENT,
            placeholder: PlaceholderStyle::default(),
            selection: SelectionStyle::default(),
        }
    }
}

/// Everything one repaint reads.
#[derive(Clone, Copy, Debug)]
pub struct FrameInput<'a> {
    /// Layers bottom to top.
    pub layers: &'a [TextLayer],
    /// Layer that gets the selection outline; `None` for exports.
    pub active: Option<LayerId>,
    /// Background image; `None` draws the placeholder.
    pub background: Option<&'a DecodedImage>,
}

/// Bookkeeping of one repaint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Layers composited.
    pub layers: usize,
    /// Layers measured without a usable face.
    pub estimated_layers: usize,
    /// Whether a selection outline was drawn.
    pub selection_drawn: bool,
}

/// Repaint `surface` from scratch.
///
/// The output depends only on `input`, `opts` and the faces registered in `fonts`; nothing
/// from earlier repaints survives.
#[tracing::instrument(skip_all, fields(layers = input.layers.len(), active = ?input.active))]
pub fn render_frame(
    fonts: &mut FontLibrary,
    input: &FrameInput<'_>,
    opts: &RenderOpts,
    surface: &mut RenderSurface,
) -> TextcompResult<FrameStats> {
    let canvas = surface.canvas();
    let clear = opts.clear_color.to_premul().to_array();
    for px in surface.frame.chunks_exact_mut(4) {
        px.copy_from_slice(&clear);
    }

    paint_background(surface, input.background, &opts.placeholder)?;

    let mut stats = FrameStats::default();
    for layer in input.layers {
        let geometry = measure_layer_bounds(fonts, layer, canvas);
        if geometry.block.estimated {
            stats.estimated_layers += 1;
        }
        let selected = input.active == Some(layer.id);
        let passes = effect_passes(&layer.effect, layer.color);

        let RenderSurface {
            frame,
            layer: layer_buf,
            raster,
            ..
        } = &mut *surface;
        layer_buf.fill(0);
        paint_layer(
            raster,
            layer_buf,
            canvas,
            &geometry,
            &passes,
            selected.then_some(&opts.selection),
        )?;
        composite_over_rgba8_premul(
            frame,
            layer_buf,
            (layer.opacity / 100.0) as f32,
            layer.blend_mode,
        )?;

        stats.layers += 1;
        stats.selection_drawn |= selected;
    }

    surface.mark_rendered();
    tracing::debug!(
        layers = stats.layers,
        estimated = stats.estimated_layers,
        "frame rendered"
    );
    Ok(stats)
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
