//! textcomp is a layered text compositor for a content-design editor.
//!
//! An [`EditorSession`] owns an ordered stack of text layers, each with its own font,
//! transform, opacity, blend mode and visual effect, and repaints a CPU raster surface after
//! every change:
//!
//! - Edit layers through the session (or a bare [`LayerStore`])
//! - Apply style templates from the built-in catalog
//! - Hit-test and drag layers with pointer input
//! - Export the surface as PNG, without the selection outline
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Colors, images, background sources and font loading.
pub mod assets;
/// Effect recipes and pixel kernels.
pub mod effects;
/// Pointer mapping, hit-testing and dragging.
pub mod interact;
/// Raster rendering.
pub mod render;
/// Layer records, the layer store, templates and documents.
pub mod scene;
/// Editor session.
pub mod session;
/// Text shaping and layout.
pub mod text;

pub use crate::foundation::core::{Affine, Canvas, Point, Rect, Rgba8Premul, Vec2};
pub use crate::foundation::error::{TextcompError, TextcompResult};

pub use crate::assets::color::Color;
pub use crate::render::pipeline::{FrameInput, FrameStats, RenderOpts, render_frame};
pub use crate::render::surface::{FrameRGBA, RenderSurface};
pub use crate::scene::document::DesignDocument;
pub use crate::scene::model::{
    Align, BlendMode, Effect, EffectKind, LayerId, LayerLimits, LayerPatch, TextLayer,
    TextLayerDef,
};
pub use crate::scene::store::{LayerStore, SplitOutcome};
pub use crate::session::editor::EditorSession;
pub use crate::session::notice::{Notice, NoticeLevel};
pub use crate::session::opts::EditorOpts;
pub use crate::text::library::FontLibrary;
