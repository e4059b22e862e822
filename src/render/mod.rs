//! CPU rendering of a layer stack onto a raster surface.

/// Background image and placeholder painting.
pub mod background;
/// Per-layer glyph pass painting.
pub mod painter;
/// One full repaint.
pub mod pipeline;
/// Raster surface and frame type.
pub mod surface;
