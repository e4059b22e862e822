use std::fmt;
use std::str::FromStr;

use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::TextcompError;

/// Straight-alpha RGBA8 color parsed from a CSS color string.
///
/// Accepted forms: `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)`, `rgba(r, g, b, a)` with
/// `a` in `0..=1`, `hsl(h, s%, l%)`, `hsla(h, s%, l%, a)`, `transparent` and a small set of
/// named colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    /// Opaque color from RGB channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color from straight RGBA channels.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Color from RGB channels and a CSS-style alpha in `0..=1`.
    pub fn rgb_alpha(r: u8, g: u8, b: u8, alpha: f64) -> Self {
        Self::rgba(r, g, b, unit_to_u8(alpha))
    }

    /// Opaque gray from an HSL lightness percentage (`0..=100`).
    pub fn gray_lightness(lightness_pct: f64) -> Self {
        let v = unit_to_u8(lightness_pct / 100.0);
        Self::rgb(v, v, v)
    }

    /// Same color with alpha replaced.
    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Premultiplied form used by the raster surfaces.
    pub fn to_premul(self) -> Rgba8Premul {
        Rgba8Premul::from_straight_rgba(self.r, self.g, self.b, self.a)
    }

    /// Linear interpolation in straight-alpha sRGB space.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| -> u8 {
            let af = f32::from(a);
            let bf = f32::from(b);
            (af + (bf - af) * t).round().clamp(0.0, 255.0) as u8
        };
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    pub(crate) fn to_cpu(self) -> vello_cpu::peniko::Color {
        vello_cpu::peniko::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            let alpha = f64::from(self.a) / 255.0;
            write!(f, "rgba({}, {}, {}, {:.3})", self.r, self.g, self.b, alpha)
        }
    }
}

impl FromStr for Color {
    type Err = TextcompError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_css_color(s).map_err(TextcompError::validation)
    }
}

impl TryFrom<String> for Color {
    type Error = TextcompError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.to_string()
    }
}

fn unit_to_u8(x: f64) -> u8 {
    (x.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn parse_css_color(s: &str) -> Result<Color, String> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }

    let lower = s.to_ascii_lowercase();
    if let Some((func, args)) = split_function(&lower) {
        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        return match (func, parts.len()) {
            ("rgb", 3) | ("rgba", 3) => Ok(Color::rgb(
                channel(parts[0])?,
                channel(parts[1])?,
                channel(parts[2])?,
            )),
            ("rgba", 4) | ("rgb", 4) => Ok(Color::rgb_alpha(
                channel(parts[0])?,
                channel(parts[1])?,
                channel(parts[2])?,
                alpha(parts[3])?,
            )),
            ("hsl", 3) | ("hsla", 3) => {
                hsla_to_rgba(number(parts[0])?, percent(parts[1])?, percent(parts[2])?, 1.0)
            }
            ("hsla", 4) | ("hsl", 4) => hsla_to_rgba(
                number(parts[0])?,
                percent(parts[1])?,
                percent(parts[2])?,
                alpha(parts[3])?,
            ),
            _ => Err(format!("unsupported color function \"{s}\"")),
        };
    }

    named(&lower).ok_or_else(|| format!("unknown color \"{s}\""))
}

fn split_function(s: &str) -> Option<(&str, &str)> {
    let open = s.find('(')?;
    let inner = s[open + 1..].strip_suffix(')')?;
    Some((s[..open].trim(), inner))
}

fn parse_hex(s: &str) -> Result<Color, String> {
    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }
    fn hex_nibble(c: &str) -> Result<u8, String> {
        let v = u8::from_str_radix(c, 16).map_err(|_| format!("invalid hex digit \"{c}\""))?;
        Ok(v * 17)
    }

    if !s.is_ascii() {
        return Err("hex color must be ASCII".to_owned());
    }

    match s.len() {
        3 => Ok(Color::rgb(
            hex_nibble(&s[0..1])?,
            hex_nibble(&s[1..2])?,
            hex_nibble(&s[2..3])?,
        )),
        6 => Ok(Color::rgb(
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
        )),
        8 => Ok(Color::rgba(
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            hex_byte(&s[6..8])?,
        )),
        _ => Err("hex color must be #RGB, #RRGGBB or #RRGGBBAA".to_owned()),
    }
}

fn number(s: &str) -> Result<f64, String> {
    let v: f64 = s
        .trim_end_matches("deg")
        .parse()
        .map_err(|_| format!("invalid number \"{s}\""))?;
    if !v.is_finite() {
        return Err(format!("invalid number \"{s}\""));
    }
    Ok(v)
}

fn channel(s: &str) -> Result<u8, String> {
    if let Some(p) = s.strip_suffix('%') {
        return Ok(unit_to_u8(number(p)? / 100.0));
    }
    Ok(number(s)?.round().clamp(0.0, 255.0) as u8)
}

fn alpha(s: &str) -> Result<f64, String> {
    if let Some(p) = s.strip_suffix('%') {
        return Ok((number(p)? / 100.0).clamp(0.0, 1.0));
    }
    Ok(number(s)?.clamp(0.0, 1.0))
}

fn percent(s: &str) -> Result<f64, String> {
    let p = s.strip_suffix('%').unwrap_or(s);
    Ok((number(p)? / 100.0).clamp(0.0, 1.0))
}

fn named(s: &str) -> Option<Color> {
    let c = match s {
        "transparent" => Color::TRANSPARENT,
        "white" => Color::WHITE,
        "black" => Color::BLACK,
        "red" => Color::rgb(255, 0, 0),
        "green" => Color::rgb(0, 128, 0),
        "blue" => Color::rgb(0, 0, 255),
        "yellow" => Color::rgb(255, 255, 0),
        "orange" => Color::rgb(255, 165, 0),
        "gold" => Color::rgb(255, 215, 0),
        "gray" | "grey" => Color::rgb(128, 128, 128),
        "pink" => Color::rgb(255, 192, 203),
        "purple" => Color::rgb(128, 0, 128),
        "cyan" | "aqua" => Color::rgb(0, 255, 255),
        "magenta" | "fuchsia" => Color::rgb(255, 0, 255),
        _ => return None,
    };
    Some(c)
}

fn hsla_to_rgba(h: f64, s: f64, l: f64, a: f64) -> Result<Color, String> {
    // Standard HSL -> RGB conversion (sRGB space, normalized 0..1 inputs).
    let h = (h % 360.0 + 360.0) % 360.0 / 360.0;

    if s == 0.0 {
        let v = unit_to_u8(l);
        return Ok(Color::rgb_alpha(v, v, v, a));
    }

    fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            return p + (q - p) * 6.0 * t;
        }
        if t < 1.0 / 2.0 {
            return q;
        }
        if t < 2.0 / 3.0 {
            return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
        }
        p
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    Ok(Color::rgb_alpha(
        unit_to_u8(hue_to_rgb(p, q, h + 1.0 / 3.0)),
        unit_to_u8(hue_to_rgb(p, q, h)),
        unit_to_u8(hue_to_rgb(p, q, h - 1.0 / 3.0)),
        a,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/color.rs"]
mod tests;
