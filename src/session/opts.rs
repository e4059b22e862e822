use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::assets::background::DEFAULT_MAX_UPLOAD_BYTES;
use crate::assets::color::Color;
use crate::assets::fonts::{FontRequest, FontSource, FontTimings};
use crate::foundation::core::Canvas;
use crate::foundation::error::{TextcompError, TextcompResult};
use crate::interact::drag::HIT_MARGIN;
use crate::render::pipeline::RenderOpts;
use crate::scene::model::{LayerLimits, TextLayer};

/// Overrides the font directory; empty means system fonts.
pub const ENV_FONT_DIR: &str = "TEXTCOMP_FONT_DIR";
/// Overrides [`EditorOpts::font_error_fallback_ms`].
pub const ENV_FONT_FALLBACK_MS: &str = "TEXTCOMP_FONT_FALLBACK_MS";

/// Editor session configuration.
///
/// Every field has a default, so a JSON file only needs the keys it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorOpts {
    /// Raster size.
    pub canvas: Canvas,
    /// Clear color, placeholder and selection look.
    pub render: RenderOpts,
    /// Font size bounds enforced by the layer store.
    pub limits: LayerLimits,
    /// Hit-test slack around text bounds, in pixels.
    pub hit_margin: f64,
    /// Family used when a layer's family has no registered face.
    pub fallback_family: String,
    /// Font directory; `None` loads installed system fonts.
    pub font_dir: Option<PathBuf>,
    /// Delay between a font load error and the fallback, in milliseconds.
    pub font_error_fallback_ms: u64,
    /// Longest wait for fonts, in milliseconds.
    pub font_load_timeout_ms: u64,
    /// Largest accepted background upload.
    pub max_upload_bytes: usize,
}

impl Default for EditorOpts {
    fn default() -> Self {
        let timings = FontTimings::default();
        Self {
            canvas: Canvas::default(),
            render: RenderOpts::default(),
            limits: LayerLimits::default(),
            hit_margin: HIT_MARGIN,
            fallback_family: TextLayer::DEFAULT_FONT.to_owned(),
            font_dir: None,
            font_error_fallback_ms: timings.error_fallback.as_millis() as u64,
            font_load_timeout_ms: timings.load_timeout.as_millis() as u64,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl EditorOpts {
    /// Parse options from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> TextcompResult<Self> {
        let opts: Self = serde_json::from_reader(r)
            .map_err(|e| TextcompError::serde(format!("parse editor options JSON: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Parse options from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> TextcompResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            TextcompError::validation(format!("open editor options '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Apply `TEXTCOMP_*` environment overrides.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    pub(crate) fn with_overrides_from(mut self, get: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = get(ENV_FONT_DIR) {
            let dir = dir.trim();
            self.font_dir = (!dir.is_empty()).then(|| PathBuf::from(dir));
        }
        if let Some(ms) = get(ENV_FONT_FALLBACK_MS) {
            match ms.trim().parse::<u64>() {
                Ok(ms) => self.font_error_fallback_ms = ms,
                Err(_) => tracing::warn!(value = %ms, "ignoring invalid {ENV_FONT_FALLBACK_MS}"),
            }
        }
        self
    }

    /// Reject option combinations the session cannot run with.
    pub fn validate(&self) -> TextcompResult<()> {
        self.canvas.validate()?;
        self.limits.validate()?;
        if !self.hit_margin.is_finite() || self.hit_margin < 0.0 {
            return Err(TextcompError::validation("hit_margin must be finite and >= 0"));
        }
        if self.fallback_family.trim().is_empty() {
            return Err(TextcompError::validation("fallback_family must be non-empty"));
        }
        if self.max_upload_bytes == 0 {
            return Err(TextcompError::validation("max_upload_bytes must be > 0"));
        }
        Ok(())
    }

    /// Raster size.
    pub fn with_canvas(mut self, canvas: Canvas) -> Self {
        self.canvas = canvas;
        self
    }

    /// Clear color drawn under the background.
    pub fn with_clear_color(mut self, color: Color) -> Self {
        self.render.clear_color = color;
        self
    }

    /// Font size bounds.
    pub fn with_limits(mut self, limits: LayerLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Hit-test slack.
    pub fn with_hit_margin(mut self, margin: f64) -> Self {
        self.hit_margin = margin;
        self
    }

    /// Fallback family.
    pub fn with_fallback_family(mut self, family: impl Into<String>) -> Self {
        self.fallback_family = family.into();
        self
    }

    /// Load fonts from `dir` instead of the system.
    pub fn with_font_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.font_dir = Some(dir.into());
        self
    }

    /// Font load timings.
    pub fn with_font_timings(mut self, timings: FontTimings) -> Self {
        self.font_error_fallback_ms = timings.error_fallback.as_millis() as u64;
        self.font_load_timeout_ms = timings.load_timeout.as_millis() as u64;
        self
    }

    /// Upload size cap.
    pub fn with_max_upload_bytes(mut self, bytes: usize) -> Self {
        self.max_upload_bytes = bytes;
        self
    }

    /// Font load timings as durations.
    pub fn font_timings(&self) -> FontTimings {
        FontTimings {
            error_fallback: Duration::from_millis(self.font_error_fallback_ms),
            load_timeout: Duration::from_millis(self.font_load_timeout_ms),
        }
    }

    /// The editor's family list fetched from the configured provider.
    pub fn font_request(&self) -> FontRequest {
        let source = match &self.font_dir {
            Some(dir) => FontSource::Directory(dir.clone()),
            None => FontSource::System,
        };
        FontRequest::editor_default(source)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/opts.rs"]
mod tests;
