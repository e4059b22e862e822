use super::*;

#[test]
fn parses_hex_forms() {
    assert_eq!("#ff0000".parse::<Color>().unwrap(), Color::rgb(255, 0, 0));
    assert_eq!("#FF1493".parse::<Color>().unwrap(), Color::rgb(255, 20, 147));
    assert_eq!("#fff".parse::<Color>().unwrap(), Color::WHITE);
    assert_eq!(
        "#0000ff80".parse::<Color>().unwrap(),
        Color::rgba(0, 0, 255, 128)
    );
    assert!("#12345".parse::<Color>().is_err());
}

#[test]
fn parses_rgba_function() {
    let c: Color = "rgba(255, 255, 255, 0.5)".parse().unwrap();
    assert_eq!(c, Color::rgba(255, 255, 255, 128));
    let c: Color = "rgb(10,20,30)".parse().unwrap();
    assert_eq!(c, Color::rgb(10, 20, 30));
}

#[test]
fn parses_hsl_and_names() {
    let c: Color = "hsl(0, 100%, 50%)".parse().unwrap();
    assert_eq!(c, Color::rgb(255, 0, 0));
    assert_eq!("Gold".parse::<Color>().unwrap(), Color::rgb(255, 215, 0));
    assert_eq!("transparent".parse::<Color>().unwrap(), Color::TRANSPARENT);
    assert!("not-a-color".parse::<Color>().is_err());
}

#[test]
fn display_roundtrips_through_serde() {
    let c = Color::rgba(1, 2, 3, 128);
    let json = serde_json::to_string(&c).unwrap();
    assert_eq!(json, "\"rgba(1, 2, 3, 0.502)\"");
    let back: Color = serde_json::from_str(&json).unwrap();
    assert_eq!(back, c);

    let opaque: Color = serde_json::from_str("\"#FF1493\"").unwrap();
    assert_eq!(serde_json::to_string(&opaque).unwrap(), "\"#FF1493\"");
}

#[test]
fn lerp_endpoints() {
    let a = Color::rgb(0, 0, 0);
    let b = Color::rgb(200, 100, 50);
    assert_eq!(a.lerp(b, 0.0), a);
    assert_eq!(a.lerp(b, 1.0), b);
    assert_eq!(a.lerp(b, 0.5), Color::rgb(100, 50, 25));
}
