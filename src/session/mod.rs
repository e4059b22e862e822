//! Editor session: explicit owner of the store, fonts, background and raster surface.

/// Session state container and its operations.
pub mod editor;
/// User-facing notices.
pub mod notice;
/// Session configuration.
pub mod opts;
