use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::foundation::core::Canvas;
use crate::foundation::error::{TextcompError, TextcompResult};
use crate::scene::model::{LayerLimits, TextLayerDef};
use crate::scene::store::LayerStore;

/// Saved design: canvas size, layers in paint order, selection and background source.
///
/// This is the JSON-facing form; [`DesignDocument::to_store`] turns it into a live
/// [`LayerStore`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DesignDocument {
    /// Raster size.
    pub canvas: Canvas,
    /// Layers bottom to top.
    pub layers: Vec<TextLayerDef>,
    /// Index into `layers` of the selected layer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_layer: Option<usize>,
    /// Background source: path, `file://` URL or `data:` URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

impl DesignDocument {
    /// Parse a document from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> TextcompResult<Self> {
        let doc: Self = serde_json::from_reader(r)
            .map_err(|e| TextcompError::serde(format!("parse design JSON: {e}")))?;
        doc.canvas.validate()?;
        Ok(doc)
    }

    /// Parse a document from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> TextcompResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            TextcompError::validation(format!("open design JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> TextcompResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| TextcompError::serde(format!("serialize design JSON: {e}")))
    }

    /// Build a store; an empty layer list yields the single default layer.
    pub fn to_store(&self, limits: LayerLimits) -> TextcompResult<LayerStore> {
        LayerStore::from_defs(self.layers.clone(), self.active_layer, limits)
    }

    /// Capture a store.
    pub fn from_store(canvas: Canvas, store: &LayerStore, background: Option<String>) -> Self {
        Self {
            canvas,
            layers: store.to_defs(),
            active_layer: store.active_id().and_then(|id| store.index_of(id)),
            background,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/document.rs"]
mod tests;
