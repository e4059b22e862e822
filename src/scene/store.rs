use crate::foundation::error::{TextcompError, TextcompResult};
use crate::scene::model::{LayerId, LayerLimits, LayerPatch, TextLayer, TextLayerDef};
use crate::text::layout::LINE_HEIGHT_EM;

/// Result of [`LayerStore::split_lines_to_layers`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SplitOutcome {
    /// The source layer was replaced by these layers, top line first.
    Split(Vec<LayerId>),
    /// The text has fewer than two non-empty lines; nothing changed.
    SingleLine,
}

/// Ordered text layers (later entries paint on top) plus the active-layer pointer.
///
/// Every mutation keeps at least one layer, unique ids and clamped numeric fields.
#[derive(Clone, Debug)]
pub struct LayerStore {
    layers: Vec<TextLayer>,
    active: Option<LayerId>,
    next_id: u64,
    limits: LayerLimits,
}

impl Default for LayerStore {
    fn default() -> Self {
        Self::new(LayerLimits::default())
    }
}

impl LayerStore {
    /// Store holding one default layer, which is active.
    pub fn new(limits: LayerLimits) -> Self {
        let mut store = Self {
            layers: Vec::new(),
            active: None,
            next_id: 1,
            limits,
        };
        let id = store.alloc_id();
        store.layers.push(TextLayer::with_defaults(id));
        store.active = Some(id);
        store
    }

    /// Store built from flat layer definitions; no definitions yields the default layer.
    pub fn from_defs(
        defs: Vec<TextLayerDef>,
        active_index: Option<usize>,
        limits: LayerLimits,
    ) -> TextcompResult<Self> {
        limits.validate()?;
        if defs.is_empty() {
            return Ok(Self::new(limits));
        }
        let mut store = Self {
            layers: Vec::with_capacity(defs.len()),
            active: None,
            next_id: 1,
            limits,
        };
        for def in defs {
            let id = store.alloc_id();
            store.layers.push(def.into_layer(id, &limits)?);
        }
        store.active = match active_index {
            Some(i) => Some(
                store
                    .layers
                    .get(i)
                    .ok_or_else(|| {
                        TextcompError::validation(format!(
                            "active layer index {i} out of range (0..{})",
                            store.layers.len()
                        ))
                    })?
                    .id,
            ),
            None => None,
        };
        Ok(store)
    }

    fn alloc_id(&mut self) -> LayerId {
        let id = LayerId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Layers bottom to top.
    pub fn layers(&self) -> &[TextLayer] {
        &self.layers
    }

    /// Number of layers; never zero.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Always `false`; a store keeps at least one layer.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Font size bounds applied to every mutation.
    pub fn limits(&self) -> &LayerLimits {
        &self.limits
    }

    /// Layer by id.
    pub fn get(&self, id: LayerId) -> Option<&TextLayer> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// Position of a layer in paint order.
    pub fn index_of(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|l| l.id == id)
    }

    /// Active layer id, if any.
    pub fn active_id(&self) -> Option<LayerId> {
        self.active
    }

    /// Active layer, if any.
    pub fn active(&self) -> Option<&TextLayer> {
        self.active.and_then(|id| self.get(id))
    }

    /// Select a layer, or clear the selection with `None`. Unknown ids are refused.
    pub fn set_active(&mut self, id: Option<LayerId>) -> bool {
        match id {
            Some(id) if self.get(id).is_none() => false,
            other => {
                self.active = other;
                true
            }
        }
    }

    /// Append a default layer below the previous ones on screen and make it active.
    pub fn add_layer(&mut self) -> LayerId {
        let id = self.alloc_id();
        let mut layer = TextLayer::with_defaults(id);
        layer.y = (50.0 + 10.0 * self.layers.len() as f64).min(90.0);
        self.layers.push(layer);
        self.active = Some(id);
        tracing::debug!(%id, count = self.layers.len(), "layer added");
        id
    }

    /// Merge `patch` into the layer. Returns `false` when the id is unknown.
    pub fn update_layer(&mut self, id: LayerId, patch: LayerPatch) -> bool {
        let limits = self.limits;
        match self.layers.iter_mut().find(|l| l.id == id) {
            Some(layer) => {
                layer.apply_patch(patch, &limits);
                true
            }
            None => false,
        }
    }

    /// Remove a layer; the last remaining layer cannot be removed.
    pub fn delete_layer(&mut self, id: LayerId) -> TextcompResult<()> {
        let idx = self
            .index_of(id)
            .ok_or_else(|| TextcompError::not_found(format!("no layer with id {id}")))?;
        if self.layers.len() <= 1 {
            return Err(TextcompError::rejected("at least one text layer must remain"));
        }
        self.layers.remove(idx);
        if self.active == Some(id) {
            self.active = self.layers.first().map(|l| l.id);
        }
        tracing::debug!(%id, count = self.layers.len(), "layer deleted");
        Ok(())
    }

    /// Copy a layer on top of the stack, nudged down, and make the copy active.
    pub fn duplicate_layer(&mut self, id: LayerId) -> TextcompResult<LayerId> {
        let src = self
            .get(id)
            .ok_or_else(|| TextcompError::not_found(format!("no layer with id {id}")))?
            .clone();
        let new_id = self.alloc_id();
        let copy = TextLayer {
            id: new_id,
            y: (src.y + 5.0).min(95.0),
            ..src
        };
        self.layers.push(copy);
        self.active = Some(new_id);
        Ok(new_id)
    }

    /// Swap with the layer above. Returns `false` at the top or for unknown ids.
    pub fn move_layer_up(&mut self, id: LayerId) -> bool {
        match self.index_of(id) {
            Some(i) if i + 1 < self.layers.len() => {
                self.layers.swap(i, i + 1);
                true
            }
            _ => false,
        }
    }

    /// Swap with the layer below. Returns `false` at the bottom or for unknown ids.
    pub fn move_layer_down(&mut self, id: LayerId) -> bool {
        match self.index_of(id) {
            Some(i) if i > 0 => {
                self.layers.swap(i, i - 1);
                true
            }
            _ => false,
        }
    }

    /// Replace a multi-line layer with one layer per non-empty line.
    ///
    /// New layers keep every style field and are spaced one line height apart, symmetric
    /// around the source `y`, so the stack reproduces the original block. The first new
    /// layer becomes active.
    pub fn split_lines_to_layers(
        &mut self,
        id: LayerId,
        canvas_height: u32,
    ) -> TextcompResult<SplitOutcome> {
        let idx = self
            .index_of(id)
            .ok_or_else(|| TextcompError::not_found(format!("no layer with id {id}")))?;
        if canvas_height == 0 {
            return Err(TextcompError::validation("canvas height must be > 0"));
        }

        let src = self.layers[idx].clone();
        let lines: Vec<String> = src
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_owned)
            .collect();
        if lines.len() < 2 {
            return Ok(SplitOutcome::SingleLine);
        }

        let line_height_pct = src.font_size * LINE_HEIGHT_EM / f64::from(canvas_height) * 100.0;
        let center = (lines.len() - 1) as f64 / 2.0;
        let mut new_layers = Vec::with_capacity(lines.len());
        for (i, text) in lines.into_iter().enumerate() {
            let mut layer = TextLayer {
                id: self.alloc_id(),
                text,
                y: src.y + (i as f64 - center) * line_height_pct,
                ..src.clone()
            };
            layer.clamp_in_place(&self.limits);
            new_layers.push(layer);
        }

        let ids: Vec<LayerId> = new_layers.iter().map(|l| l.id).collect();
        self.layers.splice(idx..=idx, new_layers);
        self.active = ids.first().copied();
        tracing::debug!(%id, parts = ids.len(), "layer split into lines");
        Ok(SplitOutcome::Split(ids))
    }

    /// Flat definitions in paint order, for saving.
    pub fn to_defs(&self) -> Vec<TextLayerDef> {
        self.layers.iter().map(TextLayerDef::from).collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/store.rs"]
mod tests;
