use super::*;

#[test]
fn effect_kind_ids_roundtrip() {
    for kind in EffectKind::ALL {
        assert_eq!(kind.id().parse::<EffectKind>().unwrap(), kind);
        let json = serde_json::to_string(&kind).unwrap();
        assert_eq!(json, format!("\"{}\"", kind.id()));
    }
    assert!("sparkle".parse::<EffectKind>().is_err());
}

#[test]
fn from_parts_keeps_only_used_params() {
    let red = Color::rgb(255, 0, 0);
    assert_eq!(
        Effect::from_parts(EffectKind::Shadow, red, 7.0, Some("gold".into())),
        Effect::Shadow {
            color: red,
            size: 7.0
        }
    );
    assert_eq!(
        Effect::from_parts(EffectKind::ThreeD, red, 250.0, None),
        Effect::ThreeD { size: 100.0 }
    );
    let g = Effect::from_parts(EffectKind::Gradient, red, 1.0, Some("ocean".into()));
    assert_eq!(g.gradient_preset(), Some("ocean"));
    assert_eq!(g.color(), None);
    assert_eq!(g.size(), None);
}

#[test]
fn flat_def_uses_wire_field_names_and_defaults() {
    let def: TextLayerDef = serde_json::from_str(
        r##"{"text":"Hi","fontSize":64,"blendMode":"color-dodge","effect":"3d","effectSize":4}"##,
    )
    .unwrap();
    assert_eq!(def.font, "Montserrat");
    assert_eq!(def.blend_mode, BlendMode::ColorDodge);
    assert_eq!(def.effect, EffectKind::ThreeD);
    assert_eq!(def.opacity, 100.0);

    let layer = def.into_layer(LayerId(3), &LayerLimits::default()).unwrap();
    assert_eq!(layer.id, LayerId(3));
    assert_eq!(layer.effect, Effect::ThreeD { size: 4.0 });
    assert_eq!(layer.font_size, 64.0);

    let back = TextLayerDef::from(&layer);
    let json = serde_json::to_value(&back).unwrap();
    assert_eq!(json["fontSize"], 64.0);
    assert_eq!(json["effect"], "3d");
    assert_eq!(json["color"], "#FFFFFF");
}

#[test]
fn def_conversion_clamps_and_rejects_non_finite() {
    let limits = LayerLimits::default();
    let def = TextLayerDef {
        x: 120.0,
        font_size: 2.0,
        rotation: -500.0,
        ..TextLayerDef::default()
    };
    let l = def.into_layer(LayerId(1), &limits).unwrap();
    assert_eq!((l.x, l.font_size, l.rotation), (100.0, 12.0, -180.0));

    let bad = TextLayerDef {
        y: f64::INFINITY,
        ..TextLayerDef::default()
    };
    assert!(bad.into_layer(LayerId(2), &limits).is_err());
}

#[test]
fn limits_validation() {
    assert!(LayerLimits::default().validate().is_ok());
    let bad = LayerLimits {
        font_size_min: 50.0,
        font_size_max: 10.0,
    };
    assert!(bad.validate().is_err());
    assert_eq!(LayerLimits::default().clamp_font_size(f64::NAN), 12.0);
}

#[test]
fn lines_strip_carriage_returns() {
    let mut l = TextLayer::with_defaults(LayerId(1));
    l.text = "a\r\nb".to_owned();
    assert_eq!(l.lines().collect::<Vec<_>>(), vec!["a", "b"]);
}
