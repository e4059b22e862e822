//! Text shaping and multi-line layout.

/// Multi-line block measurement shared by rendering and hit-testing.
pub mod layout;
/// Registered faces and Parley shaping.
pub mod library;
