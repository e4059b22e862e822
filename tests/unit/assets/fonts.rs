use super::*;

#[test]
fn stylesheet_url_lists_every_family_with_weights() {
    let req = FontRequest::editor_default(FontSource::System);
    let url = stylesheet_url(&req);

    assert!(url.starts_with("https://fonts.googleapis.com/css2?family=Montserrat:wght@400;700&"));
    assert!(url.contains("&family=ZCOOL+KuaiLe&"));
    assert!(url.contains("&family=Playfair+Display:wght@400;700&"));
    assert!(url.ends_with("&display=swap"));
    assert_eq!(url.matches("family=").count(), req.families.len());
}

#[test]
fn memory_source_rejects_garbage() {
    let req = FontRequest {
        families: vec![FontFamilySpec::regular("Nope")],
        source: FontSource::Memory(vec![Arc::new(b"not a font".to_vec())]),
    };
    let err = load_fonts(&req).unwrap_err();
    assert!(matches!(err, TextcompError::Asset(_)));
}

#[test]
fn missing_directory_is_an_error() {
    let req = FontRequest {
        families: vec![],
        source: FontSource::Directory(PathBuf::from("/definitely/not/here")),
    };
    assert!(load_fonts(&req).is_err());
}

#[test]
fn load_error_falls_back_after_error_delay() {
    let (tx, rx) = mpsc::channel();
    let timings = FontTimings {
        error_fallback: Duration::from_secs(1),
        load_timeout: Duration::from_secs(5),
    };
    let mut pending = PendingFonts::from_receiver(rx, timings);
    tx.send(Err(TextcompError::asset("offline"))).unwrap();

    let t0 = pending.started;
    assert!(pending.poll_at(t0).is_none());
    assert!(pending.poll_at(t0 + Duration::from_millis(500)).is_none());
    match pending.poll_at(t0 + Duration::from_millis(1000)) {
        Some(FontOutcome::Fallback { reason }) => assert!(reason.contains("offline")),
        other => panic!("expected fallback, got {other:?}"),
    }
    assert!(pending.is_settled());
    assert!(pending.poll_at(t0 + Duration::from_secs(10)).is_none());
}

#[test]
fn silence_falls_back_after_load_timeout() {
    let (_tx, rx) = mpsc::channel();
    let mut pending = PendingFonts::from_receiver(rx, FontTimings::default());
    let t0 = pending.started;

    assert!(pending.poll_at(t0 + Duration::from_millis(4999)).is_none());
    assert!(matches!(
        pending.poll_at(t0 + Duration::from_secs(5)),
        Some(FontOutcome::Fallback { .. })
    ));
}

#[test]
fn ready_is_reported_once() {
    let (tx, rx) = mpsc::channel();
    let mut pending = PendingFonts::from_receiver(rx, FontTimings::default());
    tx.send(Ok(LoadedFonts {
        files: vec![],
        families: vec!["Montserrat".to_owned()],
    }))
    .unwrap();

    match pending.poll() {
        Some(FontOutcome::Ready(fonts)) => assert!(fonts.provides("montserrat")),
        other => panic!("expected ready, got {other:?}"),
    }
    assert!(pending.poll().is_none());
}

#[test]
fn spawned_loader_never_blocks_forever() {
    let req = FontRequest {
        families: vec![FontFamilySpec::regular("Nope")],
        source: FontSource::Memory(vec![]),
    };
    let timings = FontTimings {
        error_fallback: Duration::from_millis(10),
        load_timeout: Duration::from_millis(500),
    };
    let outcome = FontLoader::spawn(req, timings).wait();
    assert!(matches!(outcome, FontOutcome::Fallback { .. }));
}
