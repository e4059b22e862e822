use super::*;

fn setup() -> (LayerStore, FontLibrary, Canvas, LayerId, LayerId) {
    let mut store = LayerStore::default();
    let a = store.active_id().unwrap();
    let b = store.add_layer();
    (store, FontLibrary::default(), Canvas::default(), a, b)
}

#[test]
fn topmost_layer_wins_in_overlap() {
    let (store, mut fonts, canvas, a, b) = setup();
    // A spans y 268.8..331.2, B spans 328.8..391.2 (estimated metrics).
    let overlap = Point::new(400.0, 330.0);
    assert_eq!(hit_test(&store, &mut fonts, canvas, overlap, HIT_MARGIN), Some(b));
    assert_eq!(
        hit_test(&store, &mut fonts, canvas, Point::new(400.0, 280.0), HIT_MARGIN),
        Some(a)
    );
}

#[test]
fn margin_extends_the_hit_box() {
    let (store, mut fonts, canvas, a, _) = setup();
    // Top edge of A is y = 268.8.
    let p = Point::new(400.0, 262.0);
    assert_eq!(hit_test(&store, &mut fonts, canvas, p, HIT_MARGIN), Some(a));
    assert_eq!(hit_test(&store, &mut fonts, canvas, p, 0.0), None);
}

#[test]
fn miss_changes_nothing() {
    let (mut store, mut fonts, canvas, _, b) = setup();
    let mut drag = DragController::default();
    assert_eq!(drag.pointer_down(&mut store, &mut fonts, canvas, Point::new(5.0, 5.0)), None);
    assert_eq!(drag.state(), DragState::Idle);
    assert_eq!(store.active_id(), Some(b));
    assert!(!drag.pointer_move(&mut store, canvas, Point::new(50.0, 50.0)));
}

#[test]
fn drag_keeps_offset_and_clamps_at_edges() {
    let (mut store, mut fonts, canvas, a, _) = setup();
    let mut drag = DragController::default();

    let hit = drag.pointer_down(&mut store, &mut fonts, canvas, Point::new(420.0, 290.0));
    assert_eq!(hit, Some(a));
    assert_eq!(store.active_id(), Some(a));
    assert_eq!(
        drag.state(),
        DragState::Dragging {
            id: a,
            offset: Vec2::new(20.0, -10.0)
        }
    );

    assert!(drag.pointer_move(&mut store, canvas, Point::new(100.0, 140.0)));
    let l = store.get(a).unwrap();
    assert!((l.x - 10.0).abs() < 1e-9);
    assert!((l.y - 25.0).abs() < 1e-9);

    // Would be x = -10%.
    drag.pointer_move(&mut store, canvas, Point::new(-60.0, 290.0));
    assert_eq!(store.get(a).unwrap().x, 0.0);
    // Would be x = 150%.
    drag.pointer_move(&mut store, canvas, Point::new(1220.0, 290.0));
    assert_eq!(store.get(a).unwrap().x, 100.0);

    drag.pointer_leave();
    assert_eq!(drag.dragging(), None);
    assert!(!drag.pointer_move(&mut store, canvas, Point::new(400.0, 300.0)));
    assert_eq!(store.get(a).unwrap().x, 100.0);
}

#[test]
fn deleted_target_ends_the_drag() {
    let (mut store, mut fonts, canvas, _, b) = setup();
    let mut drag = DragController::default();
    drag.pointer_down(&mut store, &mut fonts, canvas, Point::new(400.0, 370.0));
    assert_eq!(drag.dragging(), Some(b));
    store.delete_layer(b).unwrap();
    assert!(!drag.pointer_move(&mut store, canvas, Point::new(10.0, 10.0)));
    assert_eq!(drag.state(), DragState::Idle);
}
