//! Layer data: records, the ordered store, templates and saved documents.

/// JSON design documents.
pub mod document;
/// Layer records, effects and blend modes.
pub mod model;
/// Ordered layer collection with an active-layer pointer.
pub mod store;
/// Style template catalog.
pub mod templates;
