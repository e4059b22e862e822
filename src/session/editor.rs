//! The editor session: the one owner of all mutable compositor state.
//!
//! Every state-changing call re-renders before it returns, so [`EditorSession::frame`] always
//! reflects the latest store, background and font state.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::assets::background::BackgroundSource;
use crate::assets::decode::DecodedImage;
use crate::assets::fonts::{FontLoader, FontOutcome, FontRequest, PendingFonts};
use crate::foundation::core::{Canvas, Point};
use crate::foundation::error::{TextcompError, TextcompResult};
use crate::interact::drag::DragController;
use crate::interact::viewport::Viewport;
use crate::render::pipeline::{FrameInput, FrameStats, render_frame};
use crate::render::surface::{FrameRGBA, RenderSurface};
use crate::scene::document::DesignDocument;
use crate::scene::model::{LayerId, LayerPatch};
use crate::scene::store::{LayerStore, SplitOutcome};
use crate::scene::templates;
use crate::session::notice::Notice;
use crate::session::opts::EditorOpts;
use crate::text::library::FontLibrary;

/// Interactive editing state plus the raster surface it paints.
#[derive(Debug)]
pub struct EditorSession {
    opts: EditorOpts,
    store: LayerStore,
    fonts: FontLibrary,
    pending_fonts: Option<PendingFonts>,
    fonts_ready: bool,
    background: Option<DecodedImage>,
    background_source: Option<String>,
    surface: Option<RenderSurface>,
    viewport: Viewport,
    drag: DragController,
    notices: Vec<Notice>,
    last_stats: FrameStats,
}

impl EditorSession {
    /// Session with a default store and an attached surface, rendered once.
    pub fn new(opts: EditorOpts) -> TextcompResult<Self> {
        let mut session = Self::without_surface(opts)?;
        session.attach_surface()?;
        Ok(session)
    }

    /// Session with no raster surface yet; renders and exports are no-ops until
    /// [`EditorSession::attach_surface`].
    pub fn without_surface(opts: EditorOpts) -> TextcompResult<Self> {
        opts.validate()?;
        let store = LayerStore::new(opts.limits);
        Ok(Self::from_parts(opts, store))
    }

    /// Session restoring a saved document. A background that fails to load leaves the
    /// placeholder in place and queues an error notice.
    pub fn from_document(doc: &DesignDocument, opts: EditorOpts) -> TextcompResult<Self> {
        let opts = opts.with_canvas(doc.canvas);
        opts.validate()?;
        let store = doc.to_store(opts.limits)?;
        let mut session = Self::from_parts(opts, store);
        session.attach_surface()?;
        if let Some(src) = &doc.background {
            session.set_background(src)?;
        }
        Ok(session)
    }

    fn from_parts(opts: EditorOpts, store: LayerStore) -> Self {
        let drag = DragController::new(opts.hit_margin);
        // Text draws with a system face until the editor families settle.
        let mut fonts = FontLibrary::new(opts.fallback_family.clone());
        fonts.install_system_substitute();
        Self {
            fonts,
            viewport: Viewport::identity(opts.canvas),
            store,
            pending_fonts: None,
            fonts_ready: false,
            background: None,
            background_source: None,
            surface: None,
            drag,
            notices: Vec::new(),
            last_stats: FrameStats::default(),
            opts,
        }
    }

    /// Allocate the raster surface and paint it.
    pub fn attach_surface(&mut self) -> TextcompResult<()> {
        if self.surface.is_none() {
            self.surface = Some(RenderSurface::new(self.opts.canvas)?);
        }
        self.render().map(|_| ())
    }

    /// Options the session runs with.
    pub fn opts(&self) -> &EditorOpts {
        &self.opts
    }

    /// Raster size.
    pub fn canvas(&self) -> Canvas {
        self.opts.canvas
    }

    /// Layer store (read-only; mutate through the session so it re-renders).
    pub fn store(&self) -> &LayerStore {
        &self.store
    }

    /// Registered fonts.
    pub fn fonts(&self) -> &FontLibrary {
        &self.fonts
    }

    /// `true` once fonts loaded or the loader gave up and substitutes are in use.
    pub fn fonts_ready(&self) -> bool {
        self.fonts_ready
    }

    /// Whether a background image is loaded.
    pub fn has_background(&self) -> bool {
        self.background.is_some()
    }

    /// Drag state machine.
    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    /// Last rendered frame, if a surface is attached.
    pub fn frame(&self) -> Option<FrameRGBA> {
        self.surface.as_ref().map(RenderSurface::frame)
    }

    /// Statistics of the last render.
    pub fn last_stats(&self) -> FrameStats {
        self.last_stats
    }

    /// Queued notices, oldest first.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Take the queued notices.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Current state as a saveable document.
    pub fn to_document(&self) -> DesignDocument {
        DesignDocument::from_store(self.opts.canvas, &self.store, self.background_source.clone())
    }

    fn notify(&mut self, notice: Notice) {
        notice.trace();
        self.notices.push(notice);
    }

    /// Turn a refused request into a warning notice, passing the error on.
    fn refuse<T>(&mut self, err: TextcompError) -> TextcompResult<T> {
        self.notify(Notice::warning(err.user_message()));
        Err(err)
    }

    /// Repaint the surface from the current state. Without a surface this does nothing.
    pub fn render(&mut self) -> TextcompResult<FrameStats> {
        let active = self.store.active_id();
        self.render_with_active(active)
    }

    fn render_with_active(&mut self, active: Option<LayerId>) -> TextcompResult<FrameStats> {
        let Some(surface) = self.surface.as_mut() else {
            return Ok(FrameStats::default());
        };
        let input = FrameInput {
            layers: self.store.layers(),
            active,
            background: self.background.as_ref(),
        };
        self.last_stats = render_frame(&mut self.fonts, &input, &self.opts.render, surface)?;
        Ok(self.last_stats)
    }

    /// Start loading the editor's families from the configured provider.
    pub fn start_font_load(&mut self) {
        let request = self.opts.font_request();
        self.start_font_load_with(request);
    }

    /// Start loading an explicit font request.
    pub fn start_font_load_with(&mut self, request: FontRequest) {
        self.pending_fonts = Some(FontLoader::spawn(request, self.opts.font_timings()));
    }

    /// Check on a pending font load; re-renders and returns `true` when it settled now.
    pub fn poll_fonts(&mut self) -> TextcompResult<bool> {
        let Some(outcome) = self.pending_fonts.as_mut().and_then(PendingFonts::poll) else {
            return Ok(false);
        };
        self.pending_fonts = None;
        self.settle_fonts(outcome)?;
        Ok(true)
    }

    /// Block until a pending font load settles. Returns `false` when nothing was pending.
    pub fn wait_for_fonts(&mut self) -> TextcompResult<bool> {
        let Some(pending) = self.pending_fonts.take() else {
            return Ok(false);
        };
        self.settle_fonts(pending.wait())?;
        Ok(true)
    }

    fn settle_fonts(&mut self, outcome: FontOutcome) -> TextcompResult<()> {
        match outcome {
            FontOutcome::Ready(loaded) => {
                let added = self.fonts.register(&loaded);
                tracing::info!(families = added, "fonts registered");
            }
            FontOutcome::Fallback { reason } => {
                tracing::debug!(%reason, "font fallback");
                self.fonts.install_system_substitute();
                self.notify(Notice::error("fonts could not be loaded; using substitute fonts"));
            }
        }
        self.fonts_ready = true;
        self.render().map(|_| ())
    }

    /// Register one font file directly and re-render.
    pub fn register_font_bytes(&mut self, bytes: Vec<u8>) -> TextcompResult<Vec<String>> {
        let added = self.fonts.register_font_bytes(bytes)?;
        self.render()?;
        Ok(added)
    }

    /// Append a default layer and select it.
    pub fn add_layer(&mut self) -> TextcompResult<LayerId> {
        let id = self.store.add_layer();
        self.render()?;
        Ok(id)
    }

    /// Merge `patch` into layer `id`. Unknown ids change nothing and return `false`.
    pub fn update_layer(&mut self, id: LayerId, patch: LayerPatch) -> TextcompResult<bool> {
        let changed = self.store.update_layer(id, patch);
        if changed {
            self.render()?;
        }
        Ok(changed)
    }

    /// Merge `patch` into the active layer.
    pub fn update_active(&mut self, patch: LayerPatch) -> TextcompResult<bool> {
        match self.store.active_id() {
            Some(id) => self.update_layer(id, patch),
            None => Ok(false),
        }
    }

    /// Select a layer, or clear the selection with `None`.
    pub fn select_layer(&mut self, id: Option<LayerId>) -> TextcompResult<bool> {
        let changed = self.store.set_active(id);
        if changed {
            self.render()?;
        }
        Ok(changed)
    }

    /// Delete a layer; the last remaining layer is refused with a warning notice.
    pub fn delete_layer(&mut self, id: LayerId) -> TextcompResult<()> {
        if let Err(e) = self.store.delete_layer(id) {
            return self.refuse(e);
        }
        self.render().map(|_| ())
    }

    /// Clone a layer above the original.
    pub fn duplicate_layer(&mut self, id: LayerId) -> TextcompResult<LayerId> {
        match self.store.duplicate_layer(id) {
            Ok(new_id) => {
                self.render()?;
                Ok(new_id)
            }
            Err(e) => self.refuse(e),
        }
    }

    /// Move a layer one step toward the top.
    pub fn move_layer_up(&mut self, id: LayerId) -> TextcompResult<bool> {
        let moved = self.store.move_layer_up(id);
        if moved {
            self.render()?;
        }
        Ok(moved)
    }

    /// Move a layer one step toward the bottom.
    pub fn move_layer_down(&mut self, id: LayerId) -> TextcompResult<bool> {
        let moved = self.store.move_layer_down(id);
        if moved {
            self.render()?;
        }
        Ok(moved)
    }

    /// Split a multi-line layer into one layer per line.
    pub fn split_lines_to_layers(&mut self, id: LayerId) -> TextcompResult<SplitOutcome> {
        let outcome = match self.store.split_lines_to_layers(id, self.opts.canvas.height) {
            Ok(o) => o,
            Err(e) => return self.refuse(e),
        };
        match &outcome {
            SplitOutcome::Split(ids) => {
                self.notify(Notice::success(format!("split into {} layers", ids.len())));
                self.render()?;
            }
            SplitOutcome::SingleLine => self.notify(Notice::info("text has only one line")),
        }
        Ok(outcome)
    }

    /// Apply a style template to the active layer.
    pub fn apply_template(&mut self, template_id: &str) -> TextcompResult<LayerId> {
        let target = match templates::apply_template(&mut self.store, template_id) {
            Ok(id) => id,
            Err(e) => return self.refuse(e),
        };
        let name = templates::get(template_id).map_or(template_id, |t| t.name);
        self.notify(Notice::success(format!("template \"{name}\" applied")));
        self.render()?;
        Ok(target)
    }

    /// Load a background from a path, `file://` URL or `data:` URL.
    ///
    /// Failures keep the placeholder, queue an error notice and return `false`.
    #[tracing::instrument(skip(self, src), fields(len = src.len()))]
    pub fn set_background(&mut self, src: &str) -> TextcompResult<bool> {
        let loaded = BackgroundSource::parse(src).and_then(|s| s.load(self.opts.canvas));
        self.finish_background(loaded, src.to_owned())
    }

    /// Validate and load an uploaded image file.
    ///
    /// Non-image MIME types and oversized files are refused with a warning notice; decode
    /// failures behave like [`EditorSession::set_background`].
    pub fn upload_background(&mut self, bytes: Vec<u8>, mime: &str) -> TextcompResult<bool> {
        let source = match BackgroundSource::from_upload(bytes, mime, self.opts.max_upload_bytes)
        {
            Ok(s) => s,
            Err(e) => {
                self.notify(Notice::warning(e.user_message()));
                return Ok(false);
            }
        };
        let url = source.to_data_url()?;
        let loaded = source.load(self.opts.canvas);
        self.finish_background(loaded, url)
    }

    /// Drop the background image and show the placeholder.
    pub fn clear_background(&mut self) -> TextcompResult<()> {
        self.background = None;
        self.background_source = None;
        self.render().map(|_| ())
    }

    fn finish_background(
        &mut self,
        loaded: TextcompResult<DecodedImage>,
        source: String,
    ) -> TextcompResult<bool> {
        let ok = match loaded {
            Ok(img) => {
                self.background = Some(img);
                self.background_source = Some(source);
                self.notify(Notice::success("background image loaded"));
                true
            }
            Err(e) => {
                tracing::debug!(error = %e, "background load failed");
                self.background = None;
                self.background_source = None;
                self.notify(Notice::error(format!(
                    "failed to load background image: {}",
                    e.user_message()
                )));
                false
            }
        };
        self.render()?;
        Ok(ok)
    }

    /// Where the canvas is displayed; pointer events are in this viewport's client space.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Pointer pressed at client position `client`. Returns the layer picked up, if any.
    pub fn pointer_down(&mut self, client: Point) -> TextcompResult<Option<LayerId>> {
        let p = self.viewport.to_canvas(client);
        let hit = self
            .drag
            .pointer_down(&mut self.store, &mut self.fonts, self.opts.canvas, p);
        if hit.is_some() {
            self.render()?;
        }
        Ok(hit)
    }

    /// Pointer moved; drags the picked-up layer.
    pub fn pointer_move(&mut self, client: Point) -> TextcompResult<bool> {
        let p = self.viewport.to_canvas(client);
        let moved = self.drag.pointer_move(&mut self.store, self.opts.canvas, p);
        if moved {
            self.render()?;
        }
        Ok(moved)
    }

    /// Pointer released.
    pub fn pointer_up(&mut self) {
        self.drag.pointer_up();
    }

    /// Pointer left the canvas.
    pub fn pointer_leave(&mut self) {
        self.drag.pointer_leave();
    }

    /// Render without the selection outline and encode a PNG.
    ///
    /// Returns `Ok(None)` when no surface is attached. The selection is drawn again
    /// afterwards.
    #[tracing::instrument(skip(self))]
    pub fn export_png(&mut self) -> TextcompResult<Option<Vec<u8>>> {
        if self.surface.is_none() {
            tracing::debug!("export skipped: no surface");
            return Ok(None);
        }
        self.render_with_active(None)?;
        let png = self
            .surface
            .as_ref()
            .map(|s| s.frame().to_png())
            .transpose();
        // Restore the selection even when encoding failed.
        self.render()?;
        let png = png?;
        if png.is_some() {
            self.notify(Notice::success("image exported"));
        }
        Ok(png)
    }

    /// Export into `dir` as `text-design-<unix millis>.png`; returns the written path.
    pub fn export_to_dir(&mut self, dir: impl AsRef<Path>) -> TextcompResult<Option<PathBuf>> {
        let Some(png) = self.export_png()? else {
            return Ok(None);
        };
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        let path = dir.as_ref().join(format!("text-design-{millis}.png"));
        std::fs::write(&path, &png).map_err(|e| {
            TextcompError::asset(format!("write '{}': {e}", path.display()))
        })?;
        tracing::info!(path = %path.display(), bytes = png.len(), "export written");
        Ok(Some(path))
    }

    /// Export and hand the PNG bytes to `sink`.
    pub fn export_with<R>(&mut self, sink: impl FnOnce(&[u8]) -> R) -> TextcompResult<Option<R>> {
        Ok(self.export_png()?.map(|png| sink(&png)))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/editor.rs"]
mod tests;
