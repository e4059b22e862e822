use std::borrow::Cow;
use std::collections::HashMap;

use crate::assets::fonts::{LoadedFonts, system_substitute_font};
use crate::foundation::error::{TextcompError, TextcompResult};
use crate::text::layout::{FontSpec, GlyphRunData, ShapedLine};

/// Advance used for every character when no face is registered, as a fraction of the size.
pub const ESTIMATED_ADVANCE_EM: f64 = 0.6;

/// Registered font faces plus the Parley contexts used to shape text with them.
///
/// Faces arrive through [`FontLibrary::register`] once a
/// [`crate::assets::fonts::FontLoader`] settles, or through
/// [`FontLibrary::install_system_substitute`].
pub struct FontLibrary {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    families: Vec<String>,
    fallback_family: String,
    glyph_fonts: HashMap<(u64, u32), vello_cpu::peniko::FontData>,
    substitute: bool,
}

impl Default for FontLibrary {
    fn default() -> Self {
        Self::new("Montserrat")
    }
}

impl std::fmt::Debug for FontLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontLibrary")
            .field("families", &self.families)
            .field("fallback_family", &self.fallback_family)
            .finish_non_exhaustive()
    }
}

impl FontLibrary {
    /// Empty library; `fallback_family` is tried when a requested family is missing.
    pub fn new(fallback_family: impl Into<String>) -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: Vec::new(),
            fallback_family: fallback_family.into(),
            glyph_fonts: HashMap::new(),
            substitute: false,
        }
    }

    /// Register every file of a finished load. Returns the number of new families.
    pub fn register(&mut self, fonts: &LoadedFonts) -> usize {
        let before = self.families.len();
        for file in &fonts.files {
            if let Err(e) = self.register_font_bytes(file.as_ref().clone()) {
                tracing::debug!(error = %e, "font file skipped");
            }
        }
        self.families.len() - before
    }

    /// Register one font file (TTF/OTF/collection) and return the family names it adds.
    pub fn register_font_bytes(&mut self, bytes: Vec<u8>) -> TextcompResult<Vec<String>> {
        let registered = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes), None);
        if registered.is_empty() {
            return Err(TextcompError::asset("no font families registered from font bytes"));
        }

        let mut added = Vec::new();
        for (family_id, _) in registered {
            let Some(name) = self.font_ctx.collection.family_name(family_id) else {
                continue;
            };
            if !self.families.iter().any(|f| f == name) {
                self.families.push(name.to_owned());
                added.push(name.to_owned());
            }
        }
        Ok(added)
    }

    /// Register one installed system face so text draws without the editor families.
    ///
    /// Idempotent. Returns `false` when the host has no usable font; layout then falls back
    /// to estimated metrics.
    pub fn install_system_substitute(&mut self) -> bool {
        if self.substitute {
            return true;
        }
        let Some(bytes) = system_substitute_font() else {
            tracing::warn!("no system font found; text will not be drawn");
            return false;
        };
        match self.register_font_bytes(bytes.as_ref().clone()) {
            Ok(added) => {
                tracing::debug!(families = ?added, "system substitute font registered");
                self.substitute = true;
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "system substitute font rejected");
                false
            }
        }
    }

    /// Family names available for shaping, in registration order.
    pub fn families(&self) -> &[String] {
        &self.families
    }

    /// `true` once at least one face is registered.
    pub fn has_faces(&self) -> bool {
        !self.families.is_empty()
    }

    /// Family configured as the substitute for missing names.
    pub fn fallback_family(&self) -> &str {
        &self.fallback_family
    }

    /// Map a requested family onto a registered one.
    ///
    /// Order: the family itself (case-insensitive), then the fallback family, then the first
    /// registered family. `None` only when nothing is registered.
    pub fn resolve_family(&self, requested: &str) -> Option<&str> {
        let find = |name: &str| {
            self.families
                .iter()
                .find(|f| f.eq_ignore_ascii_case(name.trim()))
                .map(String::as_str)
        };
        find(requested)
            .or_else(|| find(&self.fallback_family))
            .or_else(|| self.families.first().map(String::as_str))
    }

    /// Shape a single line. Glyph positions are relative to the line's left edge and the
    /// top of its Parley line box; `None` when no face is registered.
    pub(crate) fn shape_line(&mut self, text: &str, spec: &FontSpec) -> Option<ShapedLine> {
        let family = self.resolve_family(&spec.family)?.to_owned();

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(format!("\"{family}\""))),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(spec.size as f32));
        if spec.bold {
            builder.push_default(parley::style::StyleProperty::FontWeight(
                parley::style::FontWeight::BOLD,
            ));
        }
        if spec.italic {
            builder.push_default(parley::style::StyleProperty::FontStyle(
                parley::style::FontStyle::Italic,
            ));
        }

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);

        let mut runs = Vec::new();
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let mut run_x = glyph_run.offset();
                let baseline = glyph_run.baseline();
                let glyphs: Vec<vello_cpu::Glyph> = glyph_run
                    .glyphs()
                    .map(|g| {
                        let glyph = vello_cpu::Glyph {
                            id: g.id,
                            x: run_x + g.x,
                            y: baseline - g.y,
                        };
                        run_x += g.advance;
                        glyph
                    })
                    .collect();

                let run = glyph_run.run();
                let face = run.font();
                let font = self
                    .glyph_fonts
                    .entry((face.data.id(), face.index))
                    .or_insert_with(|| {
                        vello_cpu::peniko::FontData::new(
                            vello_cpu::peniko::Blob::from(face.data.data().to_vec()),
                            face.index,
                        )
                    })
                    .clone();
                runs.push(GlyphRunData {
                    font,
                    font_size: run.font_size(),
                    glyphs,
                });
            }
        }

        Some(ShapedLine {
            width: f64::from(layout.full_width()),
            height: f64::from(layout.height()),
            runs,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/library.rs"]
mod tests;
