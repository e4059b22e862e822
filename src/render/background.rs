use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::assets::color::Color;
use crate::assets::decode::DecodedImage;
use crate::effects::composite::over_in_place;
use crate::effects::gradients::{GradientAxis, GradientStop, LinearGradient};
use crate::foundation::core::{Affine, Canvas, Rect};
use crate::foundation::error::TextcompResult;
use crate::render::painter::{affine_to_cpu, image_paint};
use crate::render::surface::RenderSurface;

/// Look of the background drawn when no image is loaded.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlaceholderStyle {
    /// Top-left gradient color.
    pub from: Color,
    /// Bottom-right gradient color.
    pub to: Color,
    /// Grid line color.
    pub grid_color: Color,
    /// Grid spacing in pixels; `0` disables the grid.
    pub grid_step: u32,
    /// Grid line width in pixels.
    pub grid_width: f64,
}

impl Default for PlaceholderStyle {
    fn default() -> Self {
        Self {
            from: Color::rgb(0x66, 0x7E, 0xEA),
            to: Color::rgb(0x76, 0x4B, 0xA2),
            grid_color: Color::rgb_alpha(255, 255, 255, 0.1),
            grid_step: 40,
            grid_width: 1.0,
        }
    }
}

impl PlaceholderStyle {
    fn gradient(&self) -> LinearGradient {
        LinearGradient::new(
            GradientAxis::Diagonal,
            &[
                GradientStop {
                    offset: 0.0,
                    color: self.from,
                },
                GradientStop {
                    offset: 1.0,
                    color: self.to,
                },
            ],
        )
    }
}

/// Largest centered rect with the image's aspect ratio that fits inside `canvas`.
pub fn contain_fit(image_width: u32, image_height: u32, canvas: Canvas) -> Rect {
    if image_width == 0 || image_height == 0 {
        return Rect::ZERO;
    }
    let (iw, ih) = (f64::from(image_width), f64::from(image_height));
    let (cw, ch) = (f64::from(canvas.width), f64::from(canvas.height));
    let scale = (cw / iw).min(ch / ih);
    let (w, h) = (iw * scale, ih * scale);
    let x0 = (cw - w) / 2.0;
    let y0 = (ch - h) / 2.0;
    Rect::new(x0, y0, x0 + w, y0 + h)
}

pub(crate) fn paint_background(
    surface: &mut RenderSurface,
    image: Option<&DecodedImage>,
    placeholder: &PlaceholderStyle,
) -> TextcompResult<()> {
    match image {
        Some(img) => paint_image(surface, img),
        None => paint_placeholder(surface, placeholder),
    }
}

fn paint_image(surface: &mut RenderSurface, img: &DecodedImage) -> TextcompResult<()> {
    let canvas = surface.canvas();
    let fit = contain_fit(img.width, img.height, canvas);
    if fit.is_zero_area() {
        return Ok(());
    }

    let paint = match &surface.background_image {
        Some((pixels, paint)) if Arc::ptr_eq(pixels, &img.rgba8_premul) => paint.clone(),
        _ => {
            let paint = image_paint(img.width, img.height, &img.rgba8_premul)?;
            surface.background_image = Some((Arc::clone(&img.rgba8_premul), paint.clone()));
            paint
        }
    };

    let scale = fit.width() / f64::from(img.width);
    let transform = Affine::translate((fit.x0, fit.y0)) * Affine::scale(scale);
    let (w, h) = (f64::from(img.width), f64::from(img.height));
    let RenderSurface { frame, raster, .. } = surface;
    raster.draw_over(frame, |ctx| {
        ctx.set_transform(affine_to_cpu(transform));
        ctx.set_paint(paint);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
        Ok(())
    })
}

fn paint_placeholder(surface: &mut RenderSurface, style: &PlaceholderStyle) -> TextcompResult<()> {
    let canvas = surface.canvas();
    if surface.placeholder.as_ref().is_none_or(|(cached, _)| cached != style) {
        let pixels = style.gradient().rasterize(canvas.width, canvas.height);
        surface.placeholder = Some((*style, pixels));
    }
    let RenderSurface {
        frame,
        raster,
        placeholder,
        ..
    } = surface;
    if let Some((_, gradient)) = placeholder.as_ref() {
        over_in_place(frame, gradient)?;
    }

    if style.grid_step == 0 || style.grid_color.a == 0 {
        return Ok(());
    }
    let step = f64::from(style.grid_step);
    let (cw, ch) = (f64::from(canvas.width), f64::from(canvas.height));
    let half = style.grid_width / 2.0;
    raster.draw_over(frame, |ctx| {
        ctx.set_paint(style.grid_color.to_cpu());
        let mut x = 0.0;
        while x <= cw {
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(x - half, 0.0, x + half, ch));
            x += step;
        }
        let mut y = 0.0;
        while y <= ch {
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, y - half, cw, y + half));
            y += step;
        }
        Ok(())
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/background.rs"]
mod tests;
