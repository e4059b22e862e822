//! External resources: colors, images, backgrounds and fonts.

/// Background sources (paths, `file://` and `data:` URLs, uploads).
pub mod background;
/// CSS color values.
pub mod color;
/// Raster decode and PNG encode.
pub mod decode;
/// Font requests and the background font loader.
pub mod fonts;
/// SVG rasterization.
pub mod svg_raster;
