use super::*;
use crate::effects::gradients;
use crate::scene::model::LayerPatch;

#[test]
fn ids_are_unique_and_presets_exist() {
    let mut seen = std::collections::HashSet::new();
    for t in catalog() {
        assert!(seen.insert(t.id), "duplicate template id {}", t.id);
        if let Some(p) = t.gradient_preset {
            assert!(gradients::preset(p).is_some(), "{} references {p}", t.id);
        }
    }
    assert_eq!(categories().len(), TemplateCategory::ALL.len());
}

#[test]
fn neon_pink_applies_style_only() {
    let mut store = LayerStore::default();
    let id = store.active_id().unwrap();
    store.update_layer(
        id,
        LayerPatch {
            text: Some("Sale".to_owned()),
            x: Some(30.0),
            y: Some(70.0),
            rotation: Some(-15.0),
            opacity: Some(60.0),
            ..LayerPatch::default()
        },
    );

    assert_eq!(apply_template(&mut store, "neon-pink").unwrap(), id);

    let l = store.get(id).unwrap();
    assert_eq!(l.effect.kind(), EffectKind::Neon);
    assert_eq!(l.color.to_string(), "#FF1493");
    assert_eq!(l.font, "ZCOOL KuaiLe");
    assert_eq!(l.font_size, 64.0);
    assert_eq!(l.text, "Sale");
    assert_eq!((l.x, l.y, l.rotation, l.opacity), (30.0, 70.0, -15.0, 60.0));
}

#[test]
fn apply_requires_active_layer_and_known_id() {
    let mut store = LayerStore::default();
    assert!(matches!(
        apply_template(&mut store, "nope"),
        Err(TextcompError::NotFound(_))
    ));

    store.set_active(None);
    let err = apply_template(&mut store, "neon-pink").unwrap_err();
    assert_eq!(err.user_message(), "please select a layer first");
}

#[test]
fn category_lookup() {
    assert_eq!("Neon".parse::<TemplateCategory>().unwrap(), TemplateCategory::Neon);
    assert!(by_category(TemplateCategory::Gradient).all(|t| t.category == TemplateCategory::Gradient));
    assert!(get("sunset-gradient").unwrap().effect().gradient_preset() == Some("sunset"));
}
