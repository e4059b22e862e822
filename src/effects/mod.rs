//! Visual effects: pass recipes and the pixel kernels they need.

/// Separable Gaussian blur for shadows.
pub mod blur;
/// Source-over and blend-mode compositing of premultiplied buffers.
pub mod composite;
/// Linear gradients and the named preset table.
pub mod gradients;
/// Effect to pass-list expansion.
pub mod recipe;
