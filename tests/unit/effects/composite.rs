use super::*;

fn repeat_px(px: [u8; 4], n: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(n * 4);
    for _ in 0..n {
        out.extend_from_slice(&px);
    }
    out
}

#[test]
fn over_opaque_src_replaces_dst() {
    let mut dst = repeat_px([10, 20, 30, 255], 2);
    over_in_place(&mut dst, &repeat_px([200, 100, 0, 255], 2)).unwrap();
    assert_eq!(dst, repeat_px([200, 100, 0, 255], 2));
}

#[test]
fn over_transparent_src_keeps_dst() {
    let mut dst = repeat_px([10, 20, 30, 255], 1);
    over_in_place(&mut dst, &repeat_px([0, 0, 0, 0], 1)).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255]);
}

#[test]
fn normal_half_opacity_mixes() {
    let mut dst = repeat_px([0, 0, 0, 255], 1);
    composite_over_rgba8_premul(&mut dst, &[255, 255, 255, 255], 0.5, BlendMode::Normal).unwrap();
    assert_eq!(dst, vec![128, 128, 128, 255]);
}

#[test]
fn zero_opacity_is_noop() {
    let mut dst = repeat_px([1, 2, 3, 4], 1);
    for mode in [BlendMode::Normal, BlendMode::Screen] {
        composite_over_rgba8_premul(&mut dst, &[255, 255, 255, 255], 0.0, mode).unwrap();
        assert_eq!(dst, vec![1, 2, 3, 4]);
    }
}

#[test]
fn multiply_opaque_is_multiply() {
    let mut dst = repeat_px([128, 255, 0, 255], 1);
    composite_over_rgba8_premul(&mut dst, &[128, 128, 255, 255], 1.0, BlendMode::Multiply)
        .unwrap();
    assert_eq!(dst, vec![64, 128, 0, 255]);
}

#[test]
fn screen_and_difference() {
    let mut dst = repeat_px([128, 0, 255, 255], 1);
    composite_over_rgba8_premul(&mut dst, &[128, 0, 0, 255], 1.0, BlendMode::Screen).unwrap();
    assert_eq!(dst[1], 0);
    assert_eq!(dst[2], 255);
    assert!(dst[0] > 128);

    let mut dst = repeat_px([200, 50, 0, 255], 1);
    composite_over_rgba8_premul(&mut dst, &[50, 50, 0, 255], 1.0, BlendMode::Difference)
        .unwrap();
    assert_eq!(&dst[..3], &[150, 0, 0]);
}

#[test]
fn blend_over_transparent_dst_is_plain_src() {
    let mut dst = repeat_px([0, 0, 0, 0], 1);
    composite_over_rgba8_premul(&mut dst, &[100, 50, 25, 255], 1.0, BlendMode::Multiply)
        .unwrap();
    assert_eq!(dst, vec![100, 50, 25, 255]);
}

#[test]
fn length_mismatch_is_an_error() {
    let mut dst = vec![0u8; 8];
    assert!(over_in_place(&mut dst, &[0u8; 4]).is_err());
    assert!(composite_over_rgba8_premul(&mut dst, &[0u8; 7], 1.0, BlendMode::Normal).is_err());
}
