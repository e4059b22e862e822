use std::fmt;

use serde::Serialize;

use crate::assets::color::Color;
use crate::foundation::error::{TextcompError, TextcompResult};
use crate::scene::model::{Effect, EffectKind, LayerId, LayerPatch};
use crate::scene::store::LayerStore;

/// Grouping shown in the template picker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateCategory {
    /// Glowing signage looks.
    Neon,
    /// Heavy headline treatments.
    Bold,
    /// Serif and script styles.
    Elegant,
    /// Throwback palettes.
    Retro,
    /// Playful styles.
    Fun,
    /// Gradient and material fills.
    Gradient,
}

impl TemplateCategory {
    /// Every category in picker order.
    pub const ALL: [TemplateCategory; 6] = [
        TemplateCategory::Neon,
        TemplateCategory::Bold,
        TemplateCategory::Elegant,
        TemplateCategory::Retro,
        TemplateCategory::Fun,
        TemplateCategory::Gradient,
    ];

    /// Stable lowercase id.
    pub fn id(self) -> &'static str {
        match self {
            TemplateCategory::Neon => "neon",
            TemplateCategory::Bold => "bold",
            TemplateCategory::Elegant => "elegant",
            TemplateCategory::Retro => "retro",
            TemplateCategory::Fun => "fun",
            TemplateCategory::Gradient => "gradient",
        }
    }
}

impl fmt::Display for TemplateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl std::str::FromStr for TemplateCategory {
    type Err = TextcompError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TemplateCategory::ALL
            .into_iter()
            .find(|c| c.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TextcompError::not_found(format!("unknown template category \"{s}\"")))
    }
}

/// Immutable style bundle applied to the active layer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleTemplate {
    /// Stable id.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Picker group.
    pub category: TemplateCategory,
    /// Font family.
    pub font: &'static str,
    /// Font size in pixels.
    pub font_size: f64,
    /// Fill color.
    pub color: Color,
    /// Bold weight.
    pub bold: bool,
    /// Italic style.
    pub italic: bool,
    /// Effect kind.
    pub effect: EffectKind,
    /// Effect color, for kinds that use one.
    pub effect_color: Color,
    /// Effect size, for kinds that use one.
    pub effect_size: f64,
    /// Gradient preset id, for the gradient effect.
    pub gradient_preset: Option<&'static str>,
}

impl StyleTemplate {
    /// The effect this template installs.
    pub fn effect(&self) -> Effect {
        Effect::from_parts(
            self.effect,
            self.effect_color,
            self.effect_size,
            self.gradient_preset.map(str::to_owned),
        )
    }

    /// Style-only patch: text, position, rotation, opacity and blend mode are untouched.
    pub fn to_patch(&self) -> LayerPatch {
        LayerPatch {
            font: Some(self.font.to_owned()),
            font_size: Some(self.font_size),
            color: Some(self.color),
            bold: Some(self.bold),
            italic: Some(self.italic),
            effect: Some(self.effect()),
            ..LayerPatch::default()
        }
    }
}

const fn template(
    id: &'static str,
    name: &'static str,
    category: TemplateCategory,
    font: &'static str,
    font_size: f64,
    color: Color,
    effect: EffectKind,
) -> StyleTemplate {
    StyleTemplate {
        id,
        name,
        category,
        font,
        font_size,
        color,
        bold: false,
        italic: false,
        effect,
        effect_color: Color::BLACK,
        effect_size: 5.0,
        gradient_preset: None,
    }
}

const fn bold(t: StyleTemplate) -> StyleTemplate {
    StyleTemplate { bold: true, ..t }
}

const fn italic(t: StyleTemplate) -> StyleTemplate {
    StyleTemplate { italic: true, ..t }
}

const fn fx(t: StyleTemplate, effect_color: Color, effect_size: f64) -> StyleTemplate {
    StyleTemplate {
        effect_color,
        effect_size,
        ..t
    }
}

const fn preset(t: StyleTemplate, gradient_preset: &'static str) -> StyleTemplate {
    StyleTemplate {
        gradient_preset: Some(gradient_preset),
        ..t
    }
}

use EffectKind as E;
use TemplateCategory as C;

static CATALOG: [StyleTemplate; 18] = [
    fx(
        template("neon-pink", "Neon Pink", C::Neon, "ZCOOL KuaiLe", 64.0, Color::rgb(0xFF, 0x14, 0x93), E::Neon),
        Color::rgb(0xFF, 0x14, 0x93),
        10.0,
    ),
    fx(
        template("neon-blue", "Neon Blue", C::Neon, "Righteous", 60.0, Color::rgb(0x00, 0xFF, 0xFF), E::Neon),
        Color::rgb(0x00, 0xBF, 0xFF),
        10.0,
    ),
    fx(
        template("neon-green", "Neon Green", C::Neon, "Bebas Neue", 72.0, Color::rgb(0x39, 0xFF, 0x14), E::Neon),
        Color::rgb(0x39, 0xFF, 0x14),
        8.0,
    ),
    bold(fx(
        template("bold-impact", "Bold Impact", C::Bold, "Anton", 80.0, Color::WHITE, E::Shadow),
        Color::BLACK,
        6.0,
    )),
    bold(fx(
        template("headline-outline", "Headline Outline", C::Bold, "Oswald", 72.0, Color::WHITE, E::Outline),
        Color::BLACK,
        4.0,
    )),
    bold(fx(
        template("block-3d", "Block 3D", C::Bold, "Anton", 80.0, Color::rgb(0xFF, 0x6B, 0x6B), E::ThreeD),
        Color::BLACK,
        8.0,
    )),
    italic(fx(
        template("elegant-serif", "Elegant Serif", C::Elegant, "Playfair Display", 56.0, Color::rgb(0xF5, 0xF5, 0xDC), E::Shadow),
        Color::rgba(0, 0, 0, 128),
        4.0,
    )),
    template("script-gold", "Script Gold", C::Elegant, "Dancing Script", 64.0, Color::rgb(0xFF, 0xD7, 0x00), E::Metallic),
    bold(fx(
        template("cinema-title", "Cinema Title", C::Elegant, "Playfair Display", 72.0, Color::rgb(0xFF, 0xD7, 0x00), E::Cinematic),
        Color::BLACK,
        4.0,
    )),
    template("retro-wave", "Retro Wave", C::Retro, "Pacifico", 64.0, Color::rgb(0xFF, 0x6B, 0x6B), E::Retro),
    template("vintage-label", "Vintage Label", C::Retro, "Lobster", 60.0, Color::rgb(0x8B, 0x45, 0x13), E::Vintage),
    bold(template("stone-emboss", "Stone Emboss", C::Retro, "Roboto", 64.0, Color::rgb(0x80, 0x80, 0x80), E::Emboss)),
    fx(
        template("comic-pop", "Comic Pop", C::Fun, "Permanent Marker", 64.0, Color::rgb(0xFF, 0xD7, 0x00), E::Comic),
        Color::rgb(0xFF, 0x45, 0x00),
        3.0,
    ),
    template("fire-title", "Fire Title", C::Fun, "Bebas Neue", 80.0, Color::rgb(0xFF, 0x45, 0x00), E::Fire),
    bold(fx(
        template("frost-bite", "Frost Bite", C::Fun, "Montserrat", 64.0, Color::rgb(0xE0, 0xFF, 0xFF), E::Frost),
        Color::BLACK,
        2.0,
    )),
    bold(preset(
        template("sunset-gradient", "Sunset Gradient", C::Gradient, "Montserrat", 72.0, Color::WHITE, E::Gradient),
        "sunset",
    )),
    bold(preset(
        template("ocean-gradient", "Ocean Gradient", C::Gradient, "Poppins", 64.0, Color::WHITE, E::Gradient),
        "ocean",
    )),
    template("glass-clean", "Clean Glass", C::Gradient, "Poppins", 60.0, Color::WHITE, E::Glass),
];

/// Every template, grouped by category in picker order.
pub fn catalog() -> &'static [StyleTemplate] {
    &CATALOG
}

/// Template by id.
pub fn get(id: &str) -> Option<&'static StyleTemplate> {
    CATALOG.iter().find(|t| t.id == id)
}

/// Templates of one category.
pub fn by_category(category: TemplateCategory) -> impl Iterator<Item = &'static StyleTemplate> {
    CATALOG.iter().filter(move |t| t.category == category)
}

/// Categories that have at least one template.
pub fn categories() -> Vec<TemplateCategory> {
    TemplateCategory::ALL
        .into_iter()
        .filter(|c| by_category(*c).next().is_some())
        .collect()
}

/// Copy a template's style onto the active layer. Returns the layer it was applied to.
pub fn apply_template(store: &mut LayerStore, id: &str) -> TextcompResult<LayerId> {
    let target = store
        .active_id()
        .ok_or_else(|| TextcompError::rejected("please select a layer first"))?;
    let tpl = get(id).ok_or_else(|| TextcompError::not_found(format!("unknown template \"{id}\"")))?;

    store.update_layer(target, tpl.to_patch());
    tracing::debug!(template = tpl.id, layer = %target, "template applied");
    Ok(target)
}

#[cfg(test)]
#[path = "../../tests/unit/scene/templates.rs"]
mod tests;
