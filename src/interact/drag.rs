//! Pointer hit-testing and drag repositioning.

use crate::foundation::core::{Canvas, Point, Vec2};
use crate::scene::model::{LayerId, LayerPatch};
use crate::scene::store::LayerStore;
use crate::text::layout::measure_layer_bounds;
use crate::text::library::FontLibrary;

/// Slack around a layer's text bounds that still counts as a hit.
pub const HIT_MARGIN: f64 = 10.0;

/// Topmost layer whose bounds, grown by `margin`, contain canvas point `p`.
///
/// Bounds come from the same measuring function the renderer uses, so what is hit is what
/// was drawn.
pub fn hit_test(
    store: &LayerStore,
    fonts: &mut FontLibrary,
    canvas: Canvas,
    p: Point,
    margin: f64,
) -> Option<LayerId> {
    store
        .layers()
        .iter()
        .rev()
        .find(|layer| measure_layer_bounds(fonts, layer, canvas).contains(p, margin))
        .map(|layer| layer.id)
}

/// Drag state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragState {
    /// No drag in progress.
    #[default]
    Idle,
    /// A layer follows the pointer.
    Dragging {
        /// Dragged layer.
        id: LayerId,
        /// Pointer position minus the layer anchor at pointer-down.
        offset: Vec2,
    },
}

/// `Idle -> Dragging -> Idle` state machine driving layer repositioning.
#[derive(Clone, Debug)]
pub struct DragController {
    state: DragState,
    margin: f64,
}

impl Default for DragController {
    fn default() -> Self {
        Self::new(HIT_MARGIN)
    }
}

impl DragController {
    /// Controller with a custom hit margin.
    pub fn new(margin: f64) -> Self {
        Self {
            state: DragState::Idle,
            margin,
        }
    }

    /// Current state.
    pub fn state(&self) -> DragState {
        self.state
    }

    /// Layer being dragged, if any.
    pub fn dragging(&self) -> Option<LayerId> {
        match self.state {
            DragState::Dragging { id, .. } => Some(id),
            DragState::Idle => None,
        }
    }

    /// Start dragging the topmost layer under `p` and make it active.
    ///
    /// A miss changes nothing and returns `None`.
    pub fn pointer_down(
        &mut self,
        store: &mut LayerStore,
        fonts: &mut FontLibrary,
        canvas: Canvas,
        p: Point,
    ) -> Option<LayerId> {
        let id = hit_test(store, fonts, canvas, p, self.margin)?;
        let layer = store.get(id)?;
        let anchor = canvas.percent_to_px(layer.x, layer.y);
        store.set_active(Some(id));
        self.state = DragState::Dragging {
            id,
            offset: p - anchor,
        };
        tracing::debug!(layer = %id, "drag started");
        Some(id)
    }

    /// Move the dragged layer so its anchor keeps the recorded offset to `p`.
    ///
    /// Returns `true` when a layer moved.
    pub fn pointer_move(&mut self, store: &mut LayerStore, canvas: Canvas, p: Point) -> bool {
        let DragState::Dragging { id, offset } = self.state else {
            return false;
        };
        let (x, y) = canvas.px_to_percent(p - offset);
        if store.update_layer(id, LayerPatch::position(x, y)) {
            true
        } else {
            // Layer vanished mid-drag.
            self.state = DragState::Idle;
            false
        }
    }

    /// End the drag.
    pub fn pointer_up(&mut self) {
        self.state = DragState::Idle;
    }

    /// Pointer left the canvas; same as releasing.
    pub fn pointer_leave(&mut self) {
        self.pointer_up();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interact/drag.rs"]
mod tests;
