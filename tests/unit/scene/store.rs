use super::*;
use crate::assets::color::Color;
use crate::scene::model::{Align, BlendMode, Effect};

fn ids(store: &LayerStore) -> Vec<LayerId> {
    store.layers().iter().map(|l| l.id).collect()
}

/// Everything except id, text and y matches.
fn same_except_text_and_y(a: &TextLayer, b: &TextLayer) -> bool {
    a.font == b.font
        && a.font_size == b.font_size
        && a.bold == b.bold
        && a.italic == b.italic
        && a.color == b.color
        && a.x == b.x
        && a.align == b.align
        && a.rotation == b.rotation
        && a.opacity == b.opacity
        && a.blend_mode == b.blend_mode
        && a.effect == b.effect
}

#[test]
fn new_store_has_one_active_default_layer() {
    let store = LayerStore::default();
    assert_eq!(store.len(), 1);
    let l = store.active().unwrap();
    assert_eq!(l.text, "Your Text Here");
    assert_eq!((l.x, l.y), (50.0, 50.0));
}

#[test]
fn add_layer_staggers_y_and_activates() {
    let mut store = LayerStore::default();
    let a = store.add_layer();
    assert_eq!(store.get(a).unwrap().y, 60.0);
    assert_eq!(store.active_id(), Some(a));
    for _ in 0..10 {
        store.add_layer();
    }
    assert_eq!(store.layers().last().unwrap().y, 90.0);
}

#[test]
fn ids_stay_unique_across_mutations() {
    let mut store = LayerStore::default();
    let a = store.add_layer();
    let b = store.duplicate_layer(a).unwrap();
    store.delete_layer(a).unwrap();
    let c = store.add_layer();
    assert_ne!(a, c);
    assert_ne!(b, c);

    let mut all = ids(&store);
    all.sort();
    all.dedup();
    assert_eq!(all.len(), store.len());
}

#[test]
fn last_layer_cannot_be_deleted() {
    let mut store = LayerStore::default();
    let only = store.active_id().unwrap();
    let err = store.delete_layer(only).unwrap_err();
    assert_eq!(err.user_message(), "at least one text layer must remain");
    assert_eq!(store.len(), 1);

    assert!(matches!(
        store.delete_layer(LayerId(999)),
        Err(TextcompError::NotFound(_))
    ));
}

#[test]
fn deleting_active_selects_first_remaining() {
    let mut store = LayerStore::default();
    let first = store.active_id().unwrap();
    let second = store.add_layer();
    store.delete_layer(second).unwrap();
    assert_eq!(store.active_id(), Some(first));

    let third = store.add_layer();
    store.set_active(Some(first));
    store.delete_layer(third).unwrap();
    assert_eq!(store.active_id(), Some(first));
}

#[test]
fn update_clamps_and_ignores_unknown_ids() {
    let mut store = LayerStore::default();
    let id = store.active_id().unwrap();
    let patch = LayerPatch {
        x: Some(-10.0),
        y: Some(140.0),
        opacity: Some(250.0),
        rotation: Some(400.0),
        font_size: Some(1000.0),
        ..LayerPatch::default()
    };
    assert!(store.update_layer(id, patch));
    let l = store.get(id).unwrap();
    assert_eq!((l.x, l.y, l.opacity, l.rotation, l.font_size), (0.0, 100.0, 100.0, 180.0, 200.0));

    let before = store.layers().to_vec();
    assert!(!store.update_layer(LayerId(77), LayerPatch::position(1.0, 1.0)));
    assert_eq!(store.layers(), before.as_slice());
}

#[test]
fn effect_params_patch_only_touches_carrying_variants() {
    let mut store = LayerStore::default();
    let id = store.active_id().unwrap();
    store.update_layer(
        id,
        LayerPatch {
            effect: Some(Effect::Outline {
                color: Color::BLACK,
                size: 3.0,
            }),
            effect_size: Some(500.0),
            effect_color: Some(Color::WHITE),
            ..LayerPatch::default()
        },
    );
    assert_eq!(
        store.get(id).unwrap().effect,
        Effect::Outline {
            color: Color::WHITE,
            size: 100.0
        }
    );

    store.update_layer(
        id,
        LayerPatch {
            effect: Some(Effect::Emboss),
            effect_size: Some(4.0),
            ..LayerPatch::default()
        },
    );
    assert_eq!(store.get(id).unwrap().effect, Effect::Emboss);
}

#[test]
fn duplicate_nudges_and_caps_y() {
    let mut store = LayerStore::default();
    let id = store.active_id().unwrap();
    store.update_layer(id, LayerPatch::position(20.0, 93.0));
    let copy = store.duplicate_layer(id).unwrap();
    let c = store.get(copy).unwrap();
    assert_eq!(c.y, 95.0);
    assert_eq!(c.x, 20.0);
    assert_eq!(store.active_id(), Some(copy));
    assert_eq!(store.layers().last().unwrap().id, copy);
}

#[test]
fn move_up_and_down_swap_neighbors() {
    let mut store = LayerStore::default();
    let a = store.active_id().unwrap();
    let b = store.add_layer();
    let c = store.add_layer();

    assert!(!store.move_layer_up(c));
    assert!(!store.move_layer_down(a));
    assert!(store.move_layer_up(a));
    assert_eq!(ids(&store), vec![b, a, c]);
    assert!(store.move_layer_down(c));
    assert_eq!(ids(&store), vec![b, c, a]);
}

#[test]
fn split_preserves_style_and_spaces_lines_symmetrically() {
    let mut store = LayerStore::default();
    let id = store.active_id().unwrap();
    store.update_layer(
        id,
        LayerPatch {
            text: Some("  one \n\ntwo\nthree  ".to_owned()),
            font_size: Some(40.0),
            color: Some(Color::rgb(255, 20, 147)),
            align: Some(Align::Left),
            rotation: Some(12.0),
            opacity: Some(80.0),
            blend_mode: Some(BlendMode::Screen),
            effect: Some(Effect::Glow {
                color: Color::WHITE,
                size: 8.0,
            }),
            ..LayerPatch::default()
        },
    );
    let above = store.add_layer();
    let src = store.get(id).unwrap().clone();

    let SplitOutcome::Split(new_ids) = store.split_lines_to_layers(id, 520).unwrap() else {
        panic!("expected split");
    };
    assert_eq!(new_ids.len(), 3);
    assert!(store.get(id).is_none());
    assert_eq!(store.len(), 4);
    assert_eq!(store.active_id(), Some(new_ids[0]));
    // Replacement happens in place, under the layer that was above.
    assert_eq!(ids(&store)[3], above);

    let parts: Vec<&TextLayer> = new_ids.iter().map(|i| store.get(*i).unwrap()).collect();
    let texts: Vec<&str> = parts.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(texts, vec!["one", "two", "three"]);
    for p in &parts {
        assert!(same_except_text_and_y(p, &src));
    }

    // line height 52px on a 520px canvas is 10%.
    assert!((parts[0].y - 40.0).abs() < 1e-9);
    assert!((parts[1].y - 50.0).abs() < 1e-9);
    assert!((parts[2].y - 60.0).abs() < 1e-9);
}

#[test]
fn split_single_line_is_a_noop() {
    let mut store = LayerStore::default();
    let id = store.active_id().unwrap();
    store.update_layer(id, LayerPatch::text("only\n   \n"));
    let before = store.layers().to_vec();
    assert_eq!(
        store.split_lines_to_layers(id, 600).unwrap(),
        SplitOutcome::SingleLine
    );
    assert_eq!(store.layers(), before.as_slice());
}

#[test]
fn set_active_refuses_unknown_ids() {
    let mut store = LayerStore::default();
    let id = store.active_id().unwrap();
    assert!(!store.set_active(Some(LayerId(42))));
    assert_eq!(store.active_id(), Some(id));
    assert!(store.set_active(None));
    assert!(store.active().is_none());
}

#[test]
fn from_defs_assigns_ids_and_validates_active_index() {
    let defs = vec![TextLayerDef::default(), TextLayerDef::default()];
    let store = LayerStore::from_defs(defs.clone(), Some(1), LayerLimits::default()).unwrap();
    assert_eq!(store.len(), 2);
    assert_eq!(store.active_id(), Some(store.layers()[1].id));

    assert!(LayerStore::from_defs(defs, Some(5), LayerLimits::default()).is_err());
    let empty = LayerStore::from_defs(vec![], None, LayerLimits::default()).unwrap();
    assert_eq!(empty.len(), 1);
}
