use std::io::Cursor;
use std::time::Duration;

use super::*;
use crate::assets::fonts::{FontSource, FontTimings};
use crate::session::notice::NoticeLevel;

fn small_opts() -> EditorOpts {
    EditorOpts::default().with_canvas(Canvas::new(200, 150).unwrap())
}

fn png_bytes() -> Vec<u8> {
    let img = image::RgbaImage::from_raw(2, 2, vec![255; 16]).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn decode(png: &[u8]) -> Vec<u8> {
    image::load_from_memory(png).unwrap().to_rgba8().into_raw()
}

#[test]
fn new_session_renders_with_selection() {
    let s = EditorSession::new(small_opts()).unwrap();
    assert_eq!(s.store().len(), 1);
    assert!(s.frame().is_some());
    assert!(s.last_stats().selection_drawn);
    assert!(!s.fonts_ready());
}

#[test]
fn export_without_surface_is_a_no_op() {
    let mut s = EditorSession::without_surface(small_opts()).unwrap();
    assert_eq!(s.export_png().unwrap(), None);
    assert_eq!(s.export_with(|b| b.len()).unwrap(), None);
    assert!(s.frame().is_none());
    assert!(s.notices().is_empty());

    s.attach_surface().unwrap();
    assert!(s.frame().is_some());
}

#[test]
fn export_excludes_the_selection_and_restores_it() {
    let mut s = EditorSession::new(small_opts()).unwrap();
    let before = s.frame().unwrap();

    let png = s.export_png().unwrap().unwrap();
    assert_eq!(s.frame().unwrap(), before, "selection restored after export");
    assert_eq!(s.notices().last().unwrap().level, NoticeLevel::Success);

    let mut plain = EditorSession::new(small_opts()).unwrap();
    plain.select_layer(None).unwrap();
    let expected = plain.frame().unwrap().to_png().unwrap();
    assert_eq!(decode(&png), decode(&expected));
    assert_ne!(decode(&png), decode(&before.to_png().unwrap()));
}

#[test]
fn export_to_dir_writes_a_timestamped_png() {
    let dir = std::env::temp_dir().join(format!("textcomp-export-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let mut s = EditorSession::new(small_opts()).unwrap();
    let path = s.export_to_dir(&dir).unwrap().unwrap();
    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("text-design-") && name.ends_with(".png"));
    assert!(!std::fs::read(&path).unwrap().is_empty());
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn refused_actions_leave_state_and_warn() {
    let mut s = EditorSession::new(small_opts()).unwrap();
    let only = s.store().active_id().unwrap();
    assert!(s.delete_layer(only).is_err());
    assert_eq!(s.store().len(), 1);
    let n = s.drain_notices();
    assert_eq!(n.len(), 1);
    assert_eq!(n[0].level, NoticeLevel::Warning);
    assert_eq!(n[0].message, "at least one text layer must remain");

    s.select_layer(None).unwrap();
    assert!(s.apply_template("neon-pink").is_err());
    assert_eq!(s.notices()[0].message, "please select a layer first");
}

#[test]
fn neon_pink_template_scenario() {
    let mut s = EditorSession::new(small_opts()).unwrap();
    let id = s.add_layer().unwrap();
    s.update_layer(id, LayerPatch::text("Sale")).unwrap();
    s.apply_template("neon-pink").unwrap();

    let l = s.store().get(id).unwrap();
    assert_eq!(l.font, "ZCOOL KuaiLe");
    assert_eq!(l.font_size, 64.0);
    assert_eq!(l.color.to_string(), "#FF1493");
    assert_eq!(l.effect.kind(), crate::scene::model::EffectKind::Neon);
    assert_eq!(l.text, "Sale");
    assert_eq!(s.notices().last().unwrap().level, NoticeLevel::Success);
}

#[test]
fn split_reports_outcomes() {
    let mut s = EditorSession::new(small_opts()).unwrap();
    let id = s.store().active_id().unwrap();
    assert_eq!(s.split_lines_to_layers(id).unwrap(), SplitOutcome::SingleLine);
    assert_eq!(s.drain_notices()[0].level, NoticeLevel::Info);

    s.update_layer(id, LayerPatch::text("one\ntwo\nthree")).unwrap();
    let SplitOutcome::Split(ids) = s.split_lines_to_layers(id).unwrap() else {
        panic!("expected a split");
    };
    assert_eq!(ids.len(), 3);
    assert_eq!(s.store().len(), 3);
    assert_eq!(s.store().active_id(), Some(ids[0]));
    assert_eq!(s.drain_notices()[0].message, "split into 3 layers");
}

#[test]
fn background_upload_validation_and_fallback() {
    let mut s = EditorSession::new(small_opts()).unwrap();
    let placeholder = s.frame().unwrap();

    assert!(!s.upload_background(b"hello".to_vec(), "text/plain").unwrap());
    assert_eq!(s.drain_notices()[0].message, "please upload an image file");

    assert!(!s.upload_background(b"not a png".to_vec(), "image/png").unwrap());
    assert_eq!(s.drain_notices()[0].level, NoticeLevel::Error);
    assert!(!s.has_background());
    assert_eq!(s.frame().unwrap(), placeholder);

    assert!(s.upload_background(png_bytes(), "image/png").unwrap());
    assert!(s.has_background());
    assert_ne!(s.frame().unwrap(), placeholder);
    let doc = s.to_document();
    assert!(doc.background.unwrap().starts_with("data:image/png;base64,"));

    s.clear_background().unwrap();
    assert_eq!(s.frame().unwrap(), placeholder);
}

#[test]
fn remote_background_urls_fall_back_to_placeholder() {
    let mut s = EditorSession::new(small_opts()).unwrap();
    assert!(!s.set_background("https://example.com/bg.png").unwrap());
    assert_eq!(s.notices()[0].level, NoticeLevel::Error);
    assert!(!s.has_background());
}

#[test]
fn pointer_drag_goes_through_the_viewport() {
    let mut s = EditorSession::new(small_opts()).unwrap();
    let id = s.store().active_id().unwrap();
    s.set_viewport(Viewport {
        client_origin: Point::new(10.0, 10.0),
        client_size: crate::foundation::core::Vec2::new(100.0, 75.0),
        canvas: s.canvas(),
    });

    // Canvas center (100, 75) is client (60, 47.5).
    assert_eq!(s.pointer_down(Point::new(60.0, 47.5)).unwrap(), Some(id));
    assert!(s.pointer_move(Point::new(35.0, 47.5)).unwrap());
    assert!((s.store().get(id).unwrap().x - 25.0).abs() < 1e-9);
    s.pointer_up();
    assert!(!s.pointer_move(Point::new(60.0, 47.5)).unwrap());

    assert_eq!(s.pointer_down(Point::new(10.5, 10.5)).unwrap(), None);
}

#[test]
fn failed_font_load_falls_back_and_rerenders() {
    let opts = small_opts().with_font_timings(FontTimings {
        error_fallback: Duration::ZERO,
        load_timeout: Duration::from_secs(5),
    });
    let mut s = EditorSession::new(opts).unwrap();
    let request = crate::assets::fonts::FontRequest::editor_default(FontSource::Memory(Vec::new()));
    s.start_font_load_with(request);
    assert!(s.wait_for_fonts().unwrap());
    assert!(s.fonts_ready());
    assert_eq!(s.notices()[0].level, NoticeLevel::Error);
    assert!(!s.wait_for_fonts().unwrap());
    assert!(!s.poll_fonts().unwrap());
}

#[test]
fn document_roundtrip_restores_layers() {
    let mut s = EditorSession::new(small_opts()).unwrap();
    let id = s.add_layer().unwrap();
    s.update_layer(id, LayerPatch::text("Second")).unwrap();
    let doc = s.to_document();

    let restored = EditorSession::from_document(&doc, EditorOpts::default()).unwrap();
    assert_eq!(restored.canvas(), s.canvas());
    assert_eq!(restored.store().len(), 2);
    assert_eq!(restored.store().active().unwrap().text, "Second");
    assert_eq!(restored.frame(), s.frame());
}

fn text_is_drawn(s: &mut EditorSession) -> bool {
    s.select_layer(None).unwrap();
    let with_text = s.frame().unwrap();
    let id = s.store().layers()[0].id;
    s.update_layer(id, LayerPatch::text("")).unwrap();
    s.frame().unwrap() != with_text
}

#[test]
fn text_draws_with_a_system_face_before_fonts_load() {
    if crate::assets::fonts::any_system_font().is_none() {
        eprintln!("no system font available; skipping");
        return;
    }
    let mut s = EditorSession::new(small_opts()).unwrap();
    assert!(!s.fonts_ready());
    assert!(s.fonts().has_faces());
    assert_eq!(s.last_stats().estimated_layers, 0);
    assert!(text_is_drawn(&mut s));
}

#[test]
fn text_stays_visible_after_font_load_falls_back() {
    if crate::assets::fonts::any_system_font().is_none() {
        eprintln!("no system font available; skipping");
        return;
    }
    let opts = small_opts()
        .with_font_dir("/definitely/not/a/font/dir")
        .with_font_timings(FontTimings {
            error_fallback: Duration::ZERO,
            load_timeout: Duration::from_secs(5),
        });
    let mut s = EditorSession::new(opts).unwrap();
    s.start_font_load();
    assert!(s.wait_for_fonts().unwrap());
    assert_eq!(s.notices()[0].level, NoticeLevel::Error);
    assert!(s.fonts().has_faces());
    assert!(text_is_drawn(&mut s));
}
