use std::io::Cursor;

use super::*;

fn tiny_png() -> Vec<u8> {
    let img = image::RgbaImage::from_raw(2, 1, vec![255, 0, 0, 255, 0, 0, 255, 255]).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn parses_paths_and_file_urls() {
    assert_eq!(
        BackgroundSource::parse("/tmp/bg.png").unwrap(),
        BackgroundSource::File(PathBuf::from("/tmp/bg.png"))
    );
    assert_eq!(
        BackgroundSource::parse("file:///tmp/bg.png").unwrap(),
        BackgroundSource::File(PathBuf::from("/tmp/bg.png"))
    );
    assert!(BackgroundSource::parse("https://example.com/a.png").is_err());
    assert!(BackgroundSource::parse("   ").is_err());
}

#[test]
fn data_url_roundtrip_decodes() {
    let png = tiny_png();
    let url = BackgroundSource::Data {
        mime: "image/png".to_owned(),
        bytes: png.clone(),
    }
    .to_data_url()
    .unwrap();
    assert!(url.starts_with("data:image/png;base64,"));

    let parsed = BackgroundSource::parse(&url).unwrap();
    let img = parsed.load(Canvas::default()).unwrap();
    assert_eq!((img.width, img.height), (2, 1));
    assert_eq!(&img.rgba8_premul[..4], &[255, 0, 0, 255]);
}

#[test]
fn non_base64_data_url_is_rejected() {
    assert!(BackgroundSource::parse("data:image/png,rawbytes").is_err());
    assert!(BackgroundSource::parse("data:image/png;base64").is_err());
}

#[test]
fn upload_checks_mime_and_size() {
    let err = BackgroundSource::from_upload(vec![0; 4], "text/plain", 100).unwrap_err();
    assert_eq!(err.user_message(), "please upload an image file");

    let err = BackgroundSource::from_upload(vec![0; 101], "image/png", 100).unwrap_err();
    assert!(matches!(err, TextcompError::Rejected(_)));

    let ok = BackgroundSource::from_upload(tiny_png(), "IMAGE/PNG", DEFAULT_MAX_UPLOAD_BYTES)
        .unwrap();
    assert!(matches!(ok, BackgroundSource::Data { ref mime, .. } if mime == "image/png"));
}

#[test]
fn svg_data_is_rasterized_to_fit() {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><rect width="10" height="10" fill="#00ff00"/></svg>"##;
    let src = BackgroundSource::Data {
        mime: "image/svg+xml".to_owned(),
        bytes: svg.to_vec(),
    };
    let img = src.load(Canvas::new(40, 20).unwrap()).unwrap();
    assert_eq!((img.width, img.height), (20, 20));
}

#[test]
fn corrupt_image_fails_to_load() {
    let src = BackgroundSource::Data {
        mime: "image/png".to_owned(),
        bytes: b"nope".to_vec(),
    };
    assert!(src.load(Canvas::default()).is_err());
}
