use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{TextcompError, TextcompResult};
use crate::foundation::math::premultiply_rgba8_in_place;

/// Decoded raster image in premultiplied RGBA8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8 rows, top to bottom.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl DecodedImage {
    /// Wrap an already-premultiplied buffer, checking its length.
    pub fn from_premul(width: u32, height: u32, rgba8_premul: Vec<u8>) -> TextcompResult<Self> {
        if width == 0 || height == 0 {
            return Err(TextcompError::asset("image has zero width or height"));
        }
        let expected = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        if rgba8_premul.len() != expected {
            return Err(TextcompError::asset(format!(
                "image buffer is {} bytes, expected {expected}",
                rgba8_premul.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }
}

/// Decode PNG/JPEG/GIF/WebP/BMP bytes (whatever `image` was built with).
pub fn decode_image(bytes: &[u8]) -> TextcompResult<DecodedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);
    DecodedImage::from_premul(width, height, rgba8_premul)
}

/// Parse an SVG document; text nodes resolve against the system font database.
pub fn parse_svg(bytes: &[u8]) -> TextcompResult<usvg::Tree> {
    let mut opts = usvg::Options::default();
    opts.fontdb_mut().load_system_fonts();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;
    Ok(tree)
}

/// Cheap sniff used when no MIME type is known.
pub fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let Ok(text) = std::str::from_utf8(head) else {
        return false;
    };
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg"))
}

/// Encode premultiplied RGBA8 as a lossless PNG.
pub fn encode_png(width: u32, height: u32, rgba8_premul: &[u8]) -> TextcompResult<Vec<u8>> {
    let mut straight = rgba8_premul.to_vec();
    crate::foundation::math::unpremultiply_rgba8_in_place(&mut straight);
    let img = image::RgbaImage::from_raw(width, height, straight)
        .ok_or_else(|| TextcompError::render("frame buffer does not match its dimensions"))?;

    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
