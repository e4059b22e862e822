use crate::foundation::error::{TextcompError, TextcompResult};
use crate::foundation::math::mul_div255_u8;
use crate::scene::model::BlendMode;

fn check_buffers(dst: &[u8], src: &[u8], what: &str) -> TextcompResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(TextcompError::render(format!(
            "{what} expects equal-length rgba8 buffers"
        )));
    }
    Ok(())
}

/// Porter-Duff source-over of premultiplied `src` onto `dst`.
pub fn over_in_place(dst: &mut [u8], src: &[u8]) -> TextcompResult<()> {
    check_buffers(dst, src, "over_in_place")?;
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = u16::from(s[3]);
        if sa == 0 {
            continue;
        }
        let inv = 255u16 - sa;
        d[3] = s[3].saturating_add(mul_div255_u8(u16::from(d[3]), inv));
        for c in 0..3 {
            let dc = mul_div255_u8(u16::from(d[c]), inv);
            d[c] = s[c].saturating_add(dc);
        }
    }
    Ok(())
}

/// Composite premultiplied `src` onto `dst` with global `opacity` and a blend operator.
pub fn composite_over_rgba8_premul(
    dst: &mut [u8],
    src: &[u8],
    opacity: f32,
    blend: BlendMode,
) -> TextcompResult<()> {
    check_buffers(dst, src, "composite_over_rgba8_premul")?;

    // Dispatch once per layer; each arm monomorphizes its own kernel.
    match blend {
        BlendMode::Normal => over_with_opacity(dst, src, opacity),
        BlendMode::Multiply => blend_kernel(dst, src, opacity, |s, d| s * d),
        BlendMode::Screen => blend_kernel(dst, src, opacity, |s, d| s + d - s * d),
        BlendMode::Overlay => blend_kernel(dst, src, opacity, |s, d| hard_light(d, s)),
        BlendMode::Darken => blend_kernel(dst, src, opacity, |s, d| s.min(d)),
        BlendMode::Lighten => blend_kernel(dst, src, opacity, |s, d| s.max(d)),
        BlendMode::ColorDodge => blend_kernel(dst, src, opacity, |s, d| {
            if d <= 0.0 {
                0.0
            } else if s >= 1.0 {
                1.0
            } else {
                (d / (1.0 - s)).min(1.0)
            }
        }),
        BlendMode::ColorBurn => blend_kernel(dst, src, opacity, |s, d| {
            if d >= 1.0 {
                1.0
            } else if s <= 0.0 {
                0.0
            } else {
                1.0 - ((1.0 - d) / s).min(1.0)
            }
        }),
        BlendMode::HardLight => blend_kernel(dst, src, opacity, hard_light),
        BlendMode::SoftLight => blend_kernel(dst, src, opacity, |s, d| {
            if s <= 0.5 {
                d - (1.0 - 2.0 * s) * d * (1.0 - d)
            } else {
                let g = if d <= 0.25 {
                    ((16.0 * d - 12.0) * d + 4.0) * d
                } else {
                    d.sqrt()
                };
                d + (2.0 * s - 1.0) * (g - d)
            }
        }),
        BlendMode::Difference => blend_kernel(dst, src, opacity, |s, d| (d - s).abs()),
        BlendMode::Exclusion => blend_kernel(dst, src, opacity, |s, d| d + s - 2.0 * d * s),
    }
    Ok(())
}

fn hard_light(s: f32, d: f32) -> f32 {
    if s <= 0.5 {
        2.0 * s * d
    } else {
        1.0 - 2.0 * (1.0 - s) * (1.0 - d)
    }
}

fn over_with_opacity(dst: &mut [u8], src: &[u8], opacity: f32) {
    let op = ((opacity.clamp(0.0, 1.0) * 255.0).round() as i32).clamp(0, 255) as u16;
    if op == 0 {
        return;
    }

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = mul_div255_u8(u16::from(s[3]), op);
        if sa == 0 {
            continue;
        }
        let inv = 255u16 - u16::from(sa);

        d[3] = sa.saturating_add(mul_div255_u8(u16::from(d[3]), inv));
        for c in 0..3 {
            let sc = mul_div255_u8(u16::from(s[c]), op);
            let dc = mul_div255_u8(u16::from(d[c]), inv);
            d[c] = sc.saturating_add(dc);
        }
    }
}

#[inline(always)]
fn blend_kernel<F>(dst: &mut [u8], src: &[u8], opacity: f32, blend_fn: F)
where
    F: Fn(f32, f32) -> f32,
{
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 {
        return;
    }

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        if s[3] == 0 {
            continue;
        }
        // out_a = sa + da * (1 - sa)
        // out_p = sp * (1 - da) + dp * (1 - sa) + B(sc, dc) * sa * da
        let sa = f32::from(s[3]) / 255.0 * opacity;
        let da = f32::from(d[3]) / 255.0;
        let out_a = (sa + da * (1.0 - sa)).clamp(0.0, 1.0);

        for c in 0..3 {
            let sp = f32::from(s[c]) / 255.0 * opacity;
            let dp = f32::from(d[c]) / 255.0;
            let sc = if sa > 0.0 { (sp / sa).clamp(0.0, 1.0) } else { 0.0 };
            let dc = if da > 0.0 { (dp / da).clamp(0.0, 1.0) } else { 0.0 };
            let b = blend_fn(sc, dc).clamp(0.0, 1.0);
            let out = (sp * (1.0 - da) + dp * (1.0 - sa) + b * sa * da).clamp(0.0, 1.0);
            d[c] = (out * 255.0).round() as u8;
        }
        d[3] = (out_a * 255.0).round() as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
