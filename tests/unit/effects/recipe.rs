use super::*;
use crate::scene::model::EffectKind;

const FILL: Color = Color::rgb(10, 20, 30);
const FX: Color = Color::rgb(200, 0, 0);

fn last_is_text_pass(passes: &[TextPass]) -> bool {
    passes.last().is_some_and(|p| p.offset == Vec2::ZERO)
}

#[test]
fn every_effect_produces_passes() {
    for kind in EffectKind::ALL {
        let effect = Effect::from_parts(kind, FX, 5.0, Some("sunset".to_owned()));
        let passes = effect_passes(&effect, FILL);
        assert!(!passes.is_empty(), "{kind}");
        assert!(last_is_text_pass(&passes), "{kind}");
    }
}

#[test]
fn none_is_single_plain_fill() {
    assert_eq!(
        effect_passes(&Effect::None, FILL),
        vec![TextPass {
            paint: PassPaint::Solid(FILL),
            mode: PassMode::Fill,
            offset: Vec2::ZERO,
            shadow: None,
        }]
    );
}

#[test]
fn shadow_and_glow_parameters() {
    let p = effect_passes(&Effect::Shadow { color: FX, size: 4.0 }, FILL);
    let s = p[0].shadow.unwrap();
    assert_eq!((s.blur, s.offset), (8.0, Vec2::new(4.0, 4.0)));
    assert_eq!(s.sigma(), 4.0);

    let p = effect_passes(&Effect::Glow { color: FX, size: 4.0 }, FILL);
    let s = p[0].shadow.unwrap();
    assert_eq!((s.blur, s.offset), (16.0, Vec2::ZERO));
}

#[test]
fn neon_blooms_then_fills_keeping_last_blur() {
    let p = effect_passes(&Effect::Neon { color: FX, size: 6.0 }, FILL);
    assert_eq!(p.len(), 4);
    let blurs: Vec<f64> = p.iter().map(|x| x.shadow.unwrap().blur).collect();
    assert_eq!(blurs, vec![54.0, 36.0, 18.0, 18.0]);
    assert!(p[..3].iter().all(|x| x.paint == PassPaint::Solid(FX)));
    assert_eq!(p[3].paint, PassPaint::Solid(FILL));
}

#[test]
fn outline_strokes_under_fill() {
    let p = effect_passes(&Effect::Outline { color: FX, size: 3.0 }, FILL);
    assert_eq!(
        p[0].mode,
        PassMode::Stroke {
            width: 3.0,
            join: StrokeJoin::Round,
            miter_limit: 2.0
        }
    );
    assert_eq!(p[1].mode, PassMode::Fill);
}

#[test]
fn three_d_extrusion_is_capped_and_lightens_toward_front() {
    let p = effect_passes(&Effect::ThreeD { size: 100.0 }, FILL);
    assert_eq!(p.len(), MAX_EXTRUSION as usize + 2);
    assert_eq!(p[0].offset, Vec2::new(40.0, 40.0));
    assert_eq!(p[MAX_EXTRUSION as usize].offset, Vec2::new(-1.0, -1.0));

    let p = effect_passes(&Effect::ThreeD { size: 4.0 }, FILL);
    let shade = |i: usize| match p[i].paint {
        PassPaint::Solid(c) => c.r,
        _ => unreachable!(),
    };
    // Back copy is 60% lightness, front copy is 90%.
    assert_eq!(shade(0), Color::gray_lightness(60.0).r);
    assert!(shade(3) > shade(0));
}

#[test]
fn gradient_falls_back_to_fill_color() {
    let none = effect_passes(&Effect::Gradient { preset: None }, FILL);
    assert_eq!(none, effect_passes(&Effect::None, FILL));

    let unknown = effect_passes(
        &Effect::Gradient {
            preset: Some("plaid".to_owned()),
        },
        FILL,
    );
    assert_eq!(unknown[0].paint, PassPaint::Solid(FILL));

    let sunset = effect_passes(
        &Effect::Gradient {
            preset: Some("sunset".to_owned()),
        },
        FILL,
    );
    assert!(matches!(&sunset[0].paint, PassPaint::Gradient(g) if g.axis == GradientAxis::Horizontal));
}

#[test]
fn fire_final_fill_keeps_last_heat_shadow() {
    let p = effect_passes(&Effect::Fire, FILL);
    assert_eq!(p.len(), 5);
    assert_eq!(p[3].offset, Vec2::new(0.0, -6.0));
    assert_eq!(p[4].shadow, p[3].shadow);
    assert_eq!(p[4].shadow.unwrap().blur, 5.0);
}

#[test]
fn comic_stacks_three_outlines() {
    let p = effect_passes(&Effect::Comic { color: FX, size: 2.0 }, FILL);
    let widths: Vec<f64> = p
        .iter()
        .filter_map(|x| match x.mode {
            PassMode::Stroke { width, .. } => Some(width),
            PassMode::Fill => None,
        })
        .collect();
    assert_eq!(widths, vec![6.0, 4.0, 2.0]);
}

#[test]
fn metallic_strokes_under_a_gold_to_white_fill() {
    let p = effect_passes(&Effect::Metallic, FILL);
    assert_eq!(p.len(), 2);
    assert!(matches!(p[0].mode, PassMode::Stroke { width, .. } if width == 2.0));
    assert_eq!(p[0].paint, PassPaint::Solid(Color::rgb(0xB8, 0x86, 0x0B)));
    let PassPaint::Gradient(g) = &p[1].paint else {
        panic!("metallic fill is a gradient");
    };
    assert_eq!(p[1].mode, PassMode::Fill);
    assert_eq!(g.axis, GradientAxis::Vertical);
    assert_eq!(g.sample(0.5), Color::WHITE.to_premul());
}

#[test]
fn cinematic_stroke_sits_under_the_shadowed_fill() {
    let p = effect_passes(&Effect::Cinematic { size: 2.0 }, FILL);
    assert_eq!(p.len(), 2);
    assert!(matches!(p[0].mode, PassMode::Stroke { width, .. } if width == 1.0));
    assert_eq!(p[1].mode, PassMode::Fill);
    let s = p[1].shadow.unwrap();
    assert_eq!((s.blur, s.offset), (6.0, Vec2::new(0.0, 4.0)));
    assert_eq!(p[0].shadow, p[1].shadow);
}

#[test]
fn zero_sized_shadows_are_invisible() {
    let p = effect_passes(&Effect::Shadow { color: FX, size: 0.0 }, FILL);
    assert!(!p[0].shadow.unwrap().is_visible());
    let p = effect_passes(&Effect::Glow { color: FX, size: 0.0 }, FILL);
    assert!(!p[0].shadow.unwrap().is_visible());
    let p = effect_passes(&Effect::Shadow { color: FX, size: 1.0 }, FILL);
    assert!(p[0].shadow.unwrap().is_visible());
    let clear = effect_passes(
        &Effect::Shadow {
            color: Color::TRANSPARENT,
            size: 4.0,
        },
        FILL,
    );
    assert!(!clear[0].shadow.unwrap().is_visible());
}
