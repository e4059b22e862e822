use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::assets::color::Color;
use crate::foundation::core::{clamp_percent, clamp_rotation};
use crate::foundation::error::{TextcompError, TextcompResult};

/// Stable identifier of a text layer, unique for the lifetime of its store.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct LayerId(pub u64);

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer-{}", self.0)
    }
}

/// Horizontal anchor of a text block relative to the layer's `x`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    /// Block starts at `x`.
    Left,
    /// Block is centered on `x`.
    #[default]
    Center,
    /// Block ends at `x`.
    Right,
}

/// Compositing operator used when a layer is painted over what lies beneath it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    /// Source-over.
    #[default]
    Normal,
    /// Multiply.
    Multiply,
    /// Screen.
    Screen,
    /// Overlay.
    Overlay,
    /// Darken.
    Darken,
    /// Lighten.
    Lighten,
    /// Color dodge.
    ColorDodge,
    /// Color burn.
    ColorBurn,
    /// Hard light.
    HardLight,
    /// Soft light.
    SoftLight,
    /// Difference.
    Difference,
    /// Exclusion.
    Exclusion,
}

/// Field-less effect discriminant, used for ids, templates and the flat JSON form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    /// No effect.
    #[default]
    None,
    /// Drop shadow.
    Shadow,
    /// Stroked outline under the fill.
    Outline,
    /// Soft glow.
    Glow,
    /// Multi-pass bloom.
    Neon,
    /// Light/dark offset copies.
    Emboss,
    /// Fixed-palette diagonal copies.
    Retro,
    /// Gradient fill from a preset.
    Gradient,
    /// Stacked extrusion.
    #[serde(rename = "3d")]
    ThreeD,
    /// Gold gradient with outline.
    Metallic,
    /// Translucent white gradient.
    Glass,
    /// Flickering heat shadows with a hot gradient.
    Fire,
    /// Icy stroke and gradient.
    Frost,
    /// Stacked comic-book outlines.
    Comic,
    /// Sepia gradient with brown shadow.
    Vintage,
    /// Gold gradient with a soft downward shadow.
    Cinematic,
}

impl EffectKind {
    /// Every effect kind, in catalog order.
    pub const ALL: [EffectKind; 16] = [
        EffectKind::None,
        EffectKind::Shadow,
        EffectKind::Outline,
        EffectKind::Glow,
        EffectKind::Neon,
        EffectKind::Emboss,
        EffectKind::Retro,
        EffectKind::Gradient,
        EffectKind::ThreeD,
        EffectKind::Metallic,
        EffectKind::Glass,
        EffectKind::Fire,
        EffectKind::Frost,
        EffectKind::Comic,
        EffectKind::Vintage,
        EffectKind::Cinematic,
    ];

    /// Stable string id.
    pub fn id(self) -> &'static str {
        match self {
            EffectKind::None => "none",
            EffectKind::Shadow => "shadow",
            EffectKind::Outline => "outline",
            EffectKind::Glow => "glow",
            EffectKind::Neon => "neon",
            EffectKind::Emboss => "emboss",
            EffectKind::Retro => "retro",
            EffectKind::Gradient => "gradient",
            EffectKind::ThreeD => "3d",
            EffectKind::Metallic => "metallic",
            EffectKind::Glass => "glass",
            EffectKind::Fire => "fire",
            EffectKind::Frost => "frost",
            EffectKind::Comic => "comic",
            EffectKind::Vintage => "vintage",
            EffectKind::Cinematic => "cinematic",
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for EffectKind {
    type Err = TextcompError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        EffectKind::ALL
            .into_iter()
            .find(|k| k.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| TextcompError::validation(format!("unknown effect \"{s}\"")))
    }
}

/// Largest accepted effect size.
pub const MAX_EFFECT_SIZE: f64 = 100.0;

fn clamp_effect_size(size: f64) -> f64 {
    if size.is_nan() {
        0.0
    } else {
        size.clamp(0.0, MAX_EFFECT_SIZE)
    }
}

/// Visual treatment of a layer. Each variant carries exactly the parameters it reads.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Effect {
    /// Plain fill.
    #[default]
    None,
    /// Drop shadow: blur `2 * size`, offset `size` on both axes.
    Shadow {
        /// Shadow color.
        color: Color,
        /// Shadow distance.
        size: f64,
    },
    /// Stroke of width `size` drawn under the fill.
    Outline {
        /// Stroke color.
        color: Color,
        /// Stroke width.
        size: f64,
    },
    /// Centered shadow with blur `4 * size`.
    Glow {
        /// Glow color.
        color: Color,
        /// Glow radius factor.
        size: f64,
    },
    /// Three bloom passes before the fill.
    Neon {
        /// Bloom color.
        color: Color,
        /// Bloom radius factor.
        size: f64,
    },
    /// Light copy up-left and dark copy down-right.
    Emboss,
    /// Three fixed-palette copies at 3, 6 and 9 px.
    Retro,
    /// Linear gradient fill from a preset; missing preset falls back to the layer color.
    Gradient {
        /// Preset id from [`crate::effects::gradients`].
        preset: Option<String>,
    },
    /// `size` stacked gray copies.
    ThreeD {
        /// Extrusion depth in pixels.
        size: f64,
    },
    /// Gold gradient fill with dark-gold outline.
    Metallic,
    /// Translucent white gradient with a soft highlight shadow.
    Glass,
    /// Heat shadows and a red-to-yellow gradient.
    Fire,
    /// Icy stroke and gradient.
    Frost {
        /// Stroke width.
        size: f64,
    },
    /// Black, white and colored stacked outlines.
    Comic {
        /// Innermost outline color.
        color: Color,
        /// Innermost outline width.
        size: f64,
    },
    /// Tan gradient with brown offset shadow.
    Vintage,
    /// Gold/white gradient, soft downward shadow and hairline stroke.
    Cinematic {
        /// Shadow blur factor.
        size: f64,
    },
}

impl Effect {
    /// Build an effect from its flat parts; parameters the kind does not use are dropped.
    pub fn from_parts(kind: EffectKind, color: Color, size: f64, preset: Option<String>) -> Self {
        let size = clamp_effect_size(size);
        match kind {
            EffectKind::None => Effect::None,
            EffectKind::Shadow => Effect::Shadow { color, size },
            EffectKind::Outline => Effect::Outline { color, size },
            EffectKind::Glow => Effect::Glow { color, size },
            EffectKind::Neon => Effect::Neon { color, size },
            EffectKind::Emboss => Effect::Emboss,
            EffectKind::Retro => Effect::Retro,
            EffectKind::Gradient => Effect::Gradient { preset },
            EffectKind::ThreeD => Effect::ThreeD { size },
            EffectKind::Metallic => Effect::Metallic,
            EffectKind::Glass => Effect::Glass,
            EffectKind::Fire => Effect::Fire,
            EffectKind::Frost => Effect::Frost { size },
            EffectKind::Comic => Effect::Comic { color, size },
            EffectKind::Vintage => Effect::Vintage,
            EffectKind::Cinematic => Effect::Cinematic { size },
        }
    }

    /// Discriminant of this effect.
    pub fn kind(&self) -> EffectKind {
        match self {
            Effect::None => EffectKind::None,
            Effect::Shadow { .. } => EffectKind::Shadow,
            Effect::Outline { .. } => EffectKind::Outline,
            Effect::Glow { .. } => EffectKind::Glow,
            Effect::Neon { .. } => EffectKind::Neon,
            Effect::Emboss => EffectKind::Emboss,
            Effect::Retro => EffectKind::Retro,
            Effect::Gradient { .. } => EffectKind::Gradient,
            Effect::ThreeD { .. } => EffectKind::ThreeD,
            Effect::Metallic => EffectKind::Metallic,
            Effect::Glass => EffectKind::Glass,
            Effect::Fire => EffectKind::Fire,
            Effect::Frost { .. } => EffectKind::Frost,
            Effect::Comic { .. } => EffectKind::Comic,
            Effect::Vintage => EffectKind::Vintage,
            Effect::Cinematic { .. } => EffectKind::Cinematic,
        }
    }

    /// Effect color, for the variants that use one.
    pub fn color(&self) -> Option<Color> {
        match self {
            Effect::Shadow { color, .. }
            | Effect::Outline { color, .. }
            | Effect::Glow { color, .. }
            | Effect::Neon { color, .. }
            | Effect::Comic { color, .. } => Some(*color),
            _ => None,
        }
    }

    /// Effect size, for the variants that use one.
    pub fn size(&self) -> Option<f64> {
        match self {
            Effect::Shadow { size, .. }
            | Effect::Outline { size, .. }
            | Effect::Glow { size, .. }
            | Effect::Neon { size, .. }
            | Effect::Comic { size, .. }
            | Effect::ThreeD { size }
            | Effect::Frost { size }
            | Effect::Cinematic { size } => Some(*size),
            _ => None,
        }
    }

    /// Gradient preset id, for [`Effect::Gradient`].
    pub fn gradient_preset(&self) -> Option<&str> {
        match self {
            Effect::Gradient { preset } => preset.as_deref(),
            _ => None,
        }
    }

    fn set_color(&mut self, new: Color) {
        if let Effect::Shadow { color, .. }
        | Effect::Outline { color, .. }
        | Effect::Glow { color, .. }
        | Effect::Neon { color, .. }
        | Effect::Comic { color, .. } = self
        {
            *color = new;
        }
    }

    fn set_size(&mut self, new: f64) {
        let new = clamp_effect_size(new);
        if let Effect::Shadow { size, .. }
        | Effect::Outline { size, .. }
        | Effect::Glow { size, .. }
        | Effect::Neon { size, .. }
        | Effect::Comic { size, .. }
        | Effect::ThreeD { size }
        | Effect::Frost { size }
        | Effect::Cinematic { size } = self
        {
            *size = new;
        }
    }

    fn clamped(self) -> Self {
        let mut out = self;
        if let Some(size) = out.size() {
            out.set_size(size);
        }
        out
    }
}

/// Configured font size bounds applied by every store mutation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerLimits {
    /// Smallest accepted font size in pixels.
    pub font_size_min: f64,
    /// Largest accepted font size in pixels.
    pub font_size_max: f64,
}

impl Default for LayerLimits {
    fn default() -> Self {
        Self {
            font_size_min: 12.0,
            font_size_max: 200.0,
        }
    }
}

impl LayerLimits {
    /// Clamp a font size into the configured range; NaN maps to the minimum.
    pub fn clamp_font_size(&self, size: f64) -> f64 {
        if size.is_nan() {
            return self.font_size_min;
        }
        size.clamp(self.font_size_min, self.font_size_max)
    }

    pub(crate) fn validate(&self) -> TextcompResult<()> {
        let ok = self.font_size_min.is_finite()
            && self.font_size_max.is_finite()
            && self.font_size_min > 0.0
            && self.font_size_min <= self.font_size_max;
        if !ok {
            return Err(TextcompError::validation(
                "font size limits must be finite with 0 < min <= max",
            ));
        }
        Ok(())
    }
}

/// One independently positioned and styled text element.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLayer {
    /// Stable id assigned by the store.
    pub id: LayerId,
    /// Text content; `\n` separates lines.
    pub text: String,
    /// Font family name.
    pub font: String,
    /// Font size in pixels.
    pub font_size: f64,
    /// Bold weight (700) instead of regular (400).
    pub bold: bool,
    /// Italic style.
    pub italic: bool,
    /// Primary fill color.
    pub color: Color,
    /// Anchor x as a percentage of canvas width.
    pub x: f64,
    /// Anchor y as a percentage of canvas height.
    pub y: f64,
    /// Horizontal alignment around the anchor.
    pub align: Align,
    /// Rotation in degrees around the anchor.
    pub rotation: f64,
    /// Opacity percentage.
    pub opacity: f64,
    /// Compositing operator.
    pub blend_mode: BlendMode,
    /// Visual effect.
    pub effect: Effect,
}

impl TextLayer {
    /// Default text of a freshly added layer.
    pub const DEFAULT_TEXT: &'static str = "Your Text Here";
    /// Default font family.
    pub const DEFAULT_FONT: &'static str = "Montserrat";
    /// Default font size in pixels.
    pub const DEFAULT_FONT_SIZE: f64 = 48.0;

    /// Layer with default style at the canvas center.
    pub fn with_defaults(id: LayerId) -> Self {
        Self {
            id,
            text: Self::DEFAULT_TEXT.to_owned(),
            font: Self::DEFAULT_FONT.to_owned(),
            font_size: Self::DEFAULT_FONT_SIZE,
            bold: false,
            italic: false,
            color: Color::WHITE,
            x: 50.0,
            y: 50.0,
            align: Align::Center,
            rotation: 0.0,
            opacity: 100.0,
            blend_mode: BlendMode::Normal,
            effect: Effect::None,
        }
    }

    /// Text split into lines the way the renderer lays them out.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l))
    }

    /// Apply every clamp the store guarantees.
    pub(crate) fn clamp_in_place(&mut self, limits: &LayerLimits) {
        self.x = clamp_percent(self.x);
        self.y = clamp_percent(self.y);
        self.opacity = clamp_percent(self.opacity);
        self.rotation = clamp_rotation(self.rotation);
        self.font_size = limits.clamp_font_size(self.font_size);
        self.effect = std::mem::take(&mut self.effect).clamped();
    }

    /// Merge a partial update into this layer, then clamp.
    pub(crate) fn apply_patch(&mut self, patch: LayerPatch, limits: &LayerLimits) {
        let LayerPatch {
            text,
            font,
            font_size,
            bold,
            italic,
            color,
            x,
            y,
            align,
            rotation,
            opacity,
            blend_mode,
            effect,
            effect_color,
            effect_size,
        } = patch;

        if let Some(v) = text {
            self.text = v;
        }
        if let Some(v) = font {
            self.font = v;
        }
        if let Some(v) = font_size {
            self.font_size = v;
        }
        if let Some(v) = bold {
            self.bold = v;
        }
        if let Some(v) = italic {
            self.italic = v;
        }
        if let Some(v) = color {
            self.color = v;
        }
        if let Some(v) = x {
            self.x = v;
        }
        if let Some(v) = y {
            self.y = v;
        }
        if let Some(v) = align {
            self.align = v;
        }
        if let Some(v) = rotation {
            self.rotation = v;
        }
        if let Some(v) = opacity {
            self.opacity = v;
        }
        if let Some(v) = blend_mode {
            self.blend_mode = v;
        }
        if let Some(v) = effect {
            self.effect = v;
        }
        if let Some(v) = effect_color {
            self.effect.set_color(v);
        }
        if let Some(v) = effect_size {
            self.effect.set_size(v);
        }
        self.clamp_in_place(limits);
    }
}

/// Partial update merged by [`crate::LayerStore::update_layer`].
///
/// `effect` replaces the whole effect; `effect_color` / `effect_size` then adjust the
/// parameters of the resulting effect when it carries them.
#[derive(Clone, Debug, Default, PartialEq)]
#[allow(missing_docs)]
pub struct LayerPatch {
    pub text: Option<String>,
    pub font: Option<String>,
    pub font_size: Option<f64>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub color: Option<Color>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub align: Option<Align>,
    pub rotation: Option<f64>,
    pub opacity: Option<f64>,
    pub blend_mode: Option<BlendMode>,
    pub effect: Option<Effect>,
    pub effect_color: Option<Color>,
    pub effect_size: Option<f64>,
}

impl LayerPatch {
    /// Patch that only moves the anchor.
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    /// Patch that only replaces the text.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }
}

/// Flat JSON form of a text layer, matching the editor's wire field names.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextLayerDef {
    /// Text content.
    #[serde(default = "default_text")]
    pub text: String,
    /// Font family.
    #[serde(default = "default_font")]
    pub font: String,
    /// Font size in pixels.
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    /// Bold weight.
    #[serde(default)]
    pub bold: bool,
    /// Italic style.
    #[serde(default)]
    pub italic: bool,
    /// Fill color.
    #[serde(default)]
    pub color: Color,
    /// Anchor x percentage.
    #[serde(default = "default_center")]
    pub x: f64,
    /// Anchor y percentage.
    #[serde(default = "default_center")]
    pub y: f64,
    /// Horizontal alignment.
    #[serde(default)]
    pub align: Align,
    /// Rotation in degrees.
    #[serde(default)]
    pub rotation: f64,
    /// Opacity percentage.
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    /// Blend mode.
    #[serde(default)]
    pub blend_mode: BlendMode,
    /// Effect id.
    #[serde(default)]
    pub effect: EffectKind,
    /// Effect color.
    #[serde(default = "default_effect_color")]
    pub effect_color: Color,
    /// Effect size.
    #[serde(default = "default_effect_size")]
    pub effect_size: f64,
    /// Gradient preset id (gradient effect only).
    #[serde(default)]
    pub gradient_preset: Option<String>,
}

fn default_text() -> String {
    TextLayer::DEFAULT_TEXT.to_owned()
}

fn default_font() -> String {
    TextLayer::DEFAULT_FONT.to_owned()
}

fn default_font_size() -> f64 {
    TextLayer::DEFAULT_FONT_SIZE
}

fn default_center() -> f64 {
    50.0
}

fn default_opacity() -> f64 {
    100.0
}

fn default_effect_color() -> Color {
    Color::BLACK
}

fn default_effect_size() -> f64 {
    5.0
}

impl Default for TextLayerDef {
    fn default() -> Self {
        Self::from(&TextLayer::with_defaults(LayerId(0)))
    }
}

impl TextLayerDef {
    /// Build a layer with the given id, clamped to `limits`.
    pub fn into_layer(self, id: LayerId, limits: &LayerLimits) -> TextcompResult<TextLayer> {
        let numbers = [
            ("fontSize", self.font_size),
            ("x", self.x),
            ("y", self.y),
            ("rotation", self.rotation),
            ("opacity", self.opacity),
            ("effectSize", self.effect_size),
        ];
        for (name, v) in numbers {
            if !v.is_finite() {
                return Err(TextcompError::validation(format!(
                    "layer field {name} must be finite"
                )));
            }
        }

        let mut layer = TextLayer {
            id,
            text: self.text,
            font: self.font,
            font_size: self.font_size,
            bold: self.bold,
            italic: self.italic,
            color: self.color,
            x: self.x,
            y: self.y,
            align: self.align,
            rotation: self.rotation,
            opacity: self.opacity,
            blend_mode: self.blend_mode,
            effect: Effect::from_parts(
                self.effect,
                self.effect_color,
                self.effect_size,
                self.gradient_preset,
            ),
        };
        layer.clamp_in_place(limits);
        Ok(layer)
    }
}

impl From<&TextLayer> for TextLayerDef {
    fn from(l: &TextLayer) -> Self {
        Self {
            text: l.text.clone(),
            font: l.font.clone(),
            font_size: l.font_size,
            bold: l.bold,
            italic: l.italic,
            color: l.color,
            x: l.x,
            y: l.y,
            align: l.align,
            rotation: l.rotation,
            opacity: l.opacity,
            blend_mode: l.blend_mode,
            effect: l.effect.kind(),
            effect_color: l.effect.color().unwrap_or_else(default_effect_color),
            effect_size: l.effect.size().unwrap_or_else(default_effect_size),
            gradient_preset: l.effect.gradient_preset().map(str::to_owned),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
