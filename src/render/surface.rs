use std::sync::Arc;

use crate::effects::composite::over_in_place;
use crate::foundation::core::Canvas;
use crate::foundation::error::{TextcompError, TextcompResult};
use crate::foundation::math::Fnv1a64;
use crate::render::background::PlaceholderStyle;

/// A rendered frame as RGBA8 pixels.
///
/// Frames are **premultiplied alpha**; the flag keeps that explicit at API boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        Some([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }

    /// Stable hash of size and pixels; equal frames hash equal.
    pub fn fingerprint(&self) -> u64 {
        let mut h = Fnv1a64::new_default();
        h.write_u32(self.width);
        h.write_u32(self.height);
        h.write_u8(u8::from(self.premultiplied));
        h.write_bytes(&self.data);
        h.finish()
    }

    /// Lossless PNG encoding (straight alpha).
    pub fn to_png(&self) -> TextcompResult<Vec<u8>> {
        if self.premultiplied {
            crate::assets::decode::encode_png(self.width, self.height, &self.data)
        } else {
            let mut premul = self.data.clone();
            crate::foundation::math::premultiply_rgba8_in_place(&mut premul);
            crate::assets::decode::encode_png(self.width, self.height, &premul)
        }
    }
}

/// Reusable `vello_cpu` context plus the scratch pixmap it renders into.
///
/// `vello_cpu` renders a fresh buffer per flush, so every draw goes to the scratch pixmap
/// and is then composited onto its destination.
pub(crate) struct Rasterizer {
    ctx: vello_cpu::RenderContext,
    scratch: vello_cpu::Pixmap,
}

impl Rasterizer {
    fn new(canvas: Canvas) -> TextcompResult<Self> {
        let (w, h) = dims_u16(canvas)?;
        Ok(Self {
            ctx: vello_cpu::RenderContext::new(w, h),
            scratch: vello_cpu::Pixmap::new(w, h),
        })
    }

    /// Record with `f`, rasterize, and hand back the scratch pixels for post-processing.
    pub(crate) fn rasterize(
        &mut self,
        f: impl FnOnce(&mut vello_cpu::RenderContext) -> TextcompResult<()>,
    ) -> TextcompResult<&mut [u8]> {
        self.ctx.reset();
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx
            .set_blend_mode(vello_cpu::peniko::BlendMode::default());
        f(&mut self.ctx)?;
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.scratch);
        Ok(self.scratch.data_as_u8_slice_mut())
    }

    /// Record with `f`, rasterize, and source-over the result onto `dst`.
    pub(crate) fn draw_over(
        &mut self,
        dst: &mut [u8],
        f: impl FnOnce(&mut vello_cpu::RenderContext) -> TextcompResult<()>,
    ) -> TextcompResult<()> {
        let pixels = self.rasterize(f)?;
        over_in_place(dst, pixels)
    }
}

/// Raster target of the compositor: the composited frame plus per-layer scratch space.
pub struct RenderSurface {
    canvas: Canvas,
    pub(crate) frame: Vec<u8>,
    pub(crate) layer: Vec<u8>,
    pub(crate) raster: Rasterizer,
    pub(crate) placeholder: Option<(PlaceholderStyle, Vec<u8>)>,
    pub(crate) background_image: Option<(Arc<Vec<u8>>, vello_cpu::Image)>,
    frames_rendered: u64,
}

impl std::fmt::Debug for RenderSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderSurface")
            .field("canvas", &self.canvas)
            .field("frames_rendered", &self.frames_rendered)
            .finish_non_exhaustive()
    }
}

impl RenderSurface {
    /// Allocate a transparent surface.
    pub fn new(canvas: Canvas) -> TextcompResult<Self> {
        canvas.validate()?;
        Ok(Self {
            canvas,
            frame: vec![0; canvas.byte_len()],
            layer: vec![0; canvas.byte_len()],
            raster: Rasterizer::new(canvas)?,
            placeholder: None,
            background_image: None,
            frames_rendered: 0,
        })
    }

    /// Surface size.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Reallocate for a new size; contents are cleared.
    pub fn resize(&mut self, canvas: Canvas) -> TextcompResult<()> {
        if canvas != self.canvas {
            *self = Self::new(canvas)?;
        }
        Ok(())
    }

    /// Number of completed renders.
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub(crate) fn mark_rendered(&mut self) {
        self.frames_rendered += 1;
    }

    /// Premultiplied pixels of the last render.
    pub fn pixels(&self) -> &[u8] {
        &self.frame
    }

    /// Copy of the last render.
    pub fn frame(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: self.frame.clone(),
            premultiplied: true,
        }
    }
}

fn dims_u16(canvas: Canvas) -> TextcompResult<(u16, u16)> {
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| TextcompError::render("surface width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| TextcompError::render("surface height exceeds u16"))?;
    Ok((w, h))
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
