use super::*;

#[test]
fn canvas_validation() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 0).is_err());
    assert!(Canvas::new(70_000, 10).is_err());
    let c = Canvas::new(800, 600).unwrap();
    assert_eq!(c.byte_len(), 800 * 600 * 4);
}

#[test]
fn percent_px_roundtrip_clamps() {
    let c = Canvas::new(200, 100).unwrap();
    let p = c.percent_to_px(50.0, 25.0);
    assert_eq!(p, Point::new(100.0, 25.0));

    let (x, y) = c.px_to_percent(Point::new(-20.0, 300.0));
    assert_eq!(x, 0.0);
    assert_eq!(y, 100.0);
}

#[test]
fn clamp_helpers() {
    assert_eq!(clamp_percent(-1.0), 0.0);
    assert_eq!(clamp_percent(150.0), 100.0);
    assert_eq!(clamp_percent(f64::NAN), 0.0);
    assert_eq!(clamp_rotation(270.0), 180.0);
    assert_eq!(clamp_rotation(-181.0), -180.0);
}

#[test]
fn premul_from_straight() {
    let c = Rgba8Premul::from_straight_rgba(255, 128, 0, 128);
    assert_eq!(c.to_array(), [128, 64, 0, 128]);
    assert_eq!(Rgba8Premul::transparent().to_array(), [0, 0, 0, 0]);
}
