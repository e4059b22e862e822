use std::path::PathBuf;

use anyhow::Context;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::assets::decode::{DecodedImage, decode_image, looks_like_svg, parse_svg};
use crate::assets::svg_raster::{rasterize_svg, svg_raster_size};
use crate::foundation::core::Canvas;
use crate::foundation::error::{TextcompError, TextcompResult};

/// Default ceiling for uploaded background files.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// A background image reference as the host hands it over.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BackgroundSource {
    /// Inline `data:` URL payload.
    Data {
        /// Declared MIME type, lowercased.
        mime: String,
        /// Decoded payload.
        bytes: Vec<u8>,
    },
    /// Local file.
    File(PathBuf),
}

impl BackgroundSource {
    /// Parse a `data:` URL, `file://` URL or plain path.
    pub fn parse(src: &str) -> TextcompResult<Self> {
        let src = src.trim();
        if src.is_empty() {
            return Err(TextcompError::validation("background source is empty"));
        }
        if let Some(rest) = strip_prefix_ci(src, "data:") {
            return parse_data_url(rest);
        }
        if strip_prefix_ci(src, "http://").is_some() || strip_prefix_ci(src, "https://").is_some()
        {
            return Err(TextcompError::validation(
                "remote background URLs are not supported; download the image first",
            ));
        }
        if let Some(path) = strip_prefix_ci(src, "file://") {
            return Ok(Self::File(PathBuf::from(path)));
        }
        Ok(Self::File(PathBuf::from(src)))
    }

    /// Build an inline source from uploaded bytes after checking type and size.
    pub fn from_upload(bytes: Vec<u8>, mime: &str, max_bytes: usize) -> TextcompResult<Self> {
        let mime = mime.trim().to_ascii_lowercase();
        if !mime.starts_with("image/") {
            return Err(TextcompError::rejected("please upload an image file"));
        }
        if bytes.len() > max_bytes {
            return Err(TextcompError::rejected(format!(
                "image must be smaller than {} MB",
                max_bytes / (1024 * 1024)
            )));
        }
        Ok(Self::Data { mime, bytes })
    }

    /// `data:` URL form, as stored in design documents.
    pub fn to_data_url(&self) -> TextcompResult<String> {
        match self {
            Self::Data { mime, bytes } => {
                Ok(format!("data:{mime};base64,{}", BASE64.encode(bytes)))
            }
            Self::File(path) => {
                let bytes =
                    std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
                let mime = mime_from_extension(path).unwrap_or("application/octet-stream");
                Ok(format!("data:{mime};base64,{}", BASE64.encode(bytes)))
            }
        }
    }

    /// Read the raw bytes and the best-known MIME type.
    fn bytes(&self) -> TextcompResult<(Vec<u8>, Option<String>)> {
        match self {
            Self::Data { mime, bytes } => Ok((bytes.clone(), Some(mime.clone()))),
            Self::File(path) => {
                let bytes = std::fs::read(path)
                    .with_context(|| format!("read background {}", path.display()))?;
                Ok((bytes, mime_from_extension(path).map(str::to_owned)))
            }
        }
    }

    /// Decode into a premultiplied image; SVG documents are rasterized to fit `canvas`.
    #[tracing::instrument(skip(self))]
    pub fn load(&self, canvas: Canvas) -> TextcompResult<DecodedImage> {
        let (bytes, mime) = self.bytes()?;
        let is_svg = mime.as_deref() == Some("image/svg+xml") || looks_like_svg(&bytes);
        let decoded = if is_svg {
            let tree = parse_svg(&bytes)?;
            let (w, h) = svg_raster_size(&tree, canvas)?;
            rasterize_svg(&tree, w, h)?
        } else {
            decode_image(&bytes)?
        };
        tracing::debug!(
            width = decoded.width,
            height = decoded.height,
            svg = is_svg,
            "background decoded"
        );
        Ok(decoded)
    }
}

fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}

fn parse_data_url(rest: &str) -> TextcompResult<BackgroundSource> {
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| TextcompError::validation("data URL has no payload"))?;
    let mut parts = meta.split(';');
    let mime = parts.next().unwrap_or("").trim().to_ascii_lowercase();
    let is_base64 = parts.any(|p| p.trim().eq_ignore_ascii_case("base64"));
    if !is_base64 {
        return Err(TextcompError::validation("only base64 data URLs are supported"));
    }
    let bytes = BASE64
        .decode(payload.trim())
        .map_err(|e| TextcompError::validation(format!("invalid base64 in data URL: {e}")))?;
    let mime = if mime.is_empty() {
        "application/octet-stream".to_owned()
    } else {
        mime
    };
    Ok(BackgroundSource::Data { mime, bytes })
}

fn mime_from_extension(path: &std::path::Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    Some(match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        _ => return None,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/background.rs"]
mod tests;
