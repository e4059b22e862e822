//! Pointer input: client-to-canvas mapping, hit-testing and dragging.

/// Layer hit-testing and the drag state machine.
pub mod drag;
/// Client-space to canvas-space mapping.
pub mod viewport;
