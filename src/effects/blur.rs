use crate::foundation::core::Rect;
use crate::foundation::error::{TextcompError, TextcompResult};

/// Integer pixel rectangle, half-open on the right and bottom.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    /// Left column.
    pub x0: u32,
    /// Top row.
    pub y0: u32,
    /// One past the right column.
    pub x1: u32,
    /// One past the bottom row.
    pub y1: u32,
}

impl PixelRect {
    /// Smallest pixel rect covering `rect`, clipped to a `width`x`height` surface.
    pub fn covering(rect: Rect, width: u32, height: u32) -> Option<Self> {
        if !(rect.x0.is_finite() && rect.y0.is_finite() && rect.x1.is_finite() && rect.y1.is_finite())
        {
            return None;
        }
        let clip = |v: f64, max: u32| v.clamp(0.0, f64::from(max)) as u32;
        let out = Self {
            x0: clip(rect.x0.floor(), width),
            y0: clip(rect.y0.floor(), height),
            x1: clip(rect.x1.ceil(), width),
            y1: clip(rect.y1.ceil(), height),
        };
        (out.x1 > out.x0 && out.y1 > out.y0).then_some(out)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.x1 - self.x0
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.y1 - self.y0
    }
}

/// Kernel radius that covers three standard deviations.
pub fn radius_for_sigma(sigma: f32) -> u32 {
    if !sigma.is_finite() || sigma <= 0.0 {
        return 0;
    }
    (sigma * 3.0).ceil() as u32
}

/// Normalized Gaussian weights in Q16 fixed point; they sum to exactly `1 << 16`.
pub fn gaussian_kernel_q16(radius: u32, sigma: f32) -> TextcompResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(TextcompError::validation("blur sigma must be finite and > 0"));
    }

    let r = radius as i32;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    for i in -r..=r {
        let x = f64::from(i);
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }
    if sum <= 0.0 {
        return Err(TextcompError::render("gaussian kernel sum is zero"));
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }

    Ok(weights)
}

/// Blur the pixels inside `region` of a premultiplied `width`x`height` buffer in place.
///
/// Pixels outside the region are neither read nor written; callers size the region to the
/// content bounds plus the kernel radius.
pub fn blur_region_in_place(
    buf: &mut [u8],
    width: u32,
    height: u32,
    region: PixelRect,
    sigma: f32,
) -> TextcompResult<()> {
    if buf.len() != (width as usize) * (height as usize) * 4 {
        return Err(TextcompError::render("blur buffer does not match its dimensions"));
    }
    if region.x1 > width || region.y1 > height || region.x0 >= region.x1 || region.y0 >= region.y1
    {
        return Err(TextcompError::render("blur region outside the surface"));
    }
    let kernel = gaussian_kernel_q16(radius_for_sigma(sigma), sigma)?;
    if kernel.len() == 1 {
        return Ok(());
    }

    let (rw, rh) = (region.width(), region.height());
    let row_bytes = rw as usize * 4;
    let mut src = vec![0u8; row_bytes * rh as usize];
    for y in 0..rh as usize {
        let from = ((region.y0 as usize + y) * width as usize + region.x0 as usize) * 4;
        src[y * row_bytes..(y + 1) * row_bytes].copy_from_slice(&buf[from..from + row_bytes]);
    }

    let mut tmp = vec![0u8; src.len()];
    horizontal_blur_q16(&src, &mut tmp, rw, rh, &kernel);
    vertical_blur_q16(&tmp, &mut src, rw, rh, &kernel);

    for y in 0..rh as usize {
        let to = ((region.y0 as usize + y) * width as usize + region.x0 as usize) * 4;
        buf[to..to + row_bytes].copy_from_slice(&src[y * row_bytes..(y + 1) * row_bytes]);
    }
    Ok(())
}

fn horizontal_blur_q16(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    for y in 0..height as i32 {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sx = x + ki as i32 - radius;
                if sx < 0 || sx >= w {
                    continue;
                }
                let idx = ((y * w + sx) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn vertical_blur_q16(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sy = y + ki as i32 - radius;
                if sy < 0 || sy >= h {
                    continue;
                }
                let idx = ((sy * w + x) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    v.min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
