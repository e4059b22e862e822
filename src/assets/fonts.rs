use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::time::{Duration, Instant};

use anyhow::Context;
use usvg::fontdb;

use crate::foundation::error::{TextcompError, TextcompResult};

/// Base of the hosted web-font stylesheet API.
pub const STYLESHEET_BASE: &str = "https://fonts.googleapis.com/css2";

/// One family requested from the font provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontFamilySpec {
    /// Family name as shown in the font picker.
    pub name: String,
    /// CSS weights to request, ascending.
    pub weights: Vec<u16>,
}

impl FontFamilySpec {
    /// Family requested at regular and bold weight.
    pub fn regular_bold(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            weights: vec![400, 700],
        }
    }

    /// Family that only ships a regular weight.
    pub fn regular(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            weights: vec![400],
        }
    }
}

/// Where font bytes come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FontSource {
    /// Every `.ttf`/`.otf`/`.ttc`/`.otc` file directly inside a directory.
    Directory(PathBuf),
    /// Installed system fonts matching the requested families.
    System,
    /// Font files already in memory.
    Memory(Vec<Arc<Vec<u8>>>),
}

/// Fixed family list plus the provider to fetch it from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontRequest {
    /// Families offered by the editor.
    pub families: Vec<FontFamilySpec>,
    /// Provider.
    pub source: FontSource,
}

impl FontRequest {
    /// The editor's font picker list.
    pub fn editor_default(source: FontSource) -> Self {
        let families = vec![
            FontFamilySpec::regular_bold("Montserrat"),
            FontFamilySpec::regular_bold("Poppins"),
            FontFamilySpec::regular_bold("Roboto"),
            FontFamilySpec::regular_bold("Open Sans"),
            FontFamilySpec::regular_bold("Lato"),
            FontFamilySpec::regular_bold("Oswald"),
            FontFamilySpec::regular_bold("Playfair Display"),
            FontFamilySpec::regular("Bebas Neue"),
            FontFamilySpec::regular("Pacifico"),
            FontFamilySpec::regular("Lobster"),
            FontFamilySpec::regular_bold("Dancing Script"),
            FontFamilySpec::regular("Anton"),
            FontFamilySpec::regular("Righteous"),
            FontFamilySpec::regular("Permanent Marker"),
            FontFamilySpec::regular("ZCOOL KuaiLe"),
            FontFamilySpec::regular_bold("Noto Sans SC"),
        ];
        Self { families, source }
    }

    /// Family names in picker order.
    pub fn family_names(&self) -> impl Iterator<Item = &str> {
        self.families.iter().map(|f| f.name.as_str())
    }
}

/// Web-font stylesheet link for the requested families.
///
/// ```
/// use textcomp::assets::fonts::{FontFamilySpec, FontRequest, FontSource, stylesheet_url};
///
/// let req = FontRequest {
///     families: vec![FontFamilySpec::regular_bold("Open Sans")],
///     source: FontSource::System,
/// };
/// assert_eq!(
///     stylesheet_url(&req),
///     "https://fonts.googleapis.com/css2?family=Open+Sans:wght@400;700&display=swap"
/// );
/// ```
pub fn stylesheet_url(request: &FontRequest) -> String {
    let mut url = String::from(STYLESHEET_BASE);
    let mut sep = '?';
    for fam in &request.families {
        url.push(sep);
        sep = '&';
        url.push_str("family=");
        url.push_str(&fam.name.trim().replace(' ', "+"));
        let is_regular_only = fam.weights.is_empty() || fam.weights == [400];
        if !is_regular_only {
            let weights: Vec<String> = fam.weights.iter().map(u16::to_string).collect();
            url.push_str(":wght@");
            url.push_str(&weights.join(";"));
        }
    }
    url.push(sep);
    url.push_str("display=swap");
    url
}

/// Font files produced by a successful load.
#[derive(Clone, Debug, Default)]
pub struct LoadedFonts {
    /// Raw font file bytes, one entry per file.
    pub files: Vec<Arc<Vec<u8>>>,
    /// Family names found in those files, deduplicated, in discovery order.
    pub families: Vec<String>,
}

impl LoadedFonts {
    /// `true` when at least one `family` is provided by the loaded files.
    pub fn provides(&self, family: &str) -> bool {
        self.families.iter().any(|f| f.eq_ignore_ascii_case(family))
    }
}

/// How long a pending load may take before the editor stops waiting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FontTimings {
    /// Delay between a reported load error and the fallback.
    pub error_fallback: Duration,
    /// Longest wait for any answer at all.
    pub load_timeout: Duration,
}

impl Default for FontTimings {
    fn default() -> Self {
        Self {
            error_fallback: Duration::from_secs(1),
            load_timeout: Duration::from_secs(5),
        }
    }
}

/// Final state of a font load.
#[derive(Clone, Debug)]
pub enum FontOutcome {
    /// Requested faces are available.
    Ready(LoadedFonts),
    /// Loading failed or timed out; text renders with substitute metrics.
    Fallback {
        /// Human-readable cause.
        reason: String,
    },
}

/// Loads fonts off the session thread.
pub struct FontLoader;

impl FontLoader {
    /// Start loading `request` on a background thread.
    #[tracing::instrument(skip(request), fields(families = request.families.len()))]
    pub fn spawn(request: FontRequest, timings: FontTimings) -> PendingFonts {
        let (tx, rx) = mpsc::channel();
        let spawned = std::thread::Builder::new()
            .name("textcomp-fonts".to_owned())
            .spawn(move || {
                let res = load_fonts(&request);
                // Receiver may be gone if the session was dropped mid-load.
                let _ = tx.send(res);
            });

        let mut pending = PendingFonts::from_receiver(rx, timings);
        if let Err(e) = spawned {
            tracing::warn!(error = %e, "font loader thread failed to start");
            pending.failed = Some((Instant::now(), format!("font loader failed to start: {e}")));
        }
        pending
    }
}

/// Handle to an in-flight font load.
#[derive(Debug)]
pub struct PendingFonts {
    rx: Option<Receiver<TextcompResult<LoadedFonts>>>,
    started: Instant,
    failed: Option<(Instant, String)>,
    timings: FontTimings,
}

impl PendingFonts {
    fn from_receiver(rx: Receiver<TextcompResult<LoadedFonts>>, timings: FontTimings) -> Self {
        Self {
            rx: Some(rx),
            started: Instant::now(),
            failed: None,
            timings,
        }
    }

    /// `true` once an outcome has been handed out.
    pub fn is_settled(&self) -> bool {
        self.rx.is_none()
    }

    /// Non-blocking check. Returns the outcome exactly once, `None` before and after.
    pub fn poll(&mut self) -> Option<FontOutcome> {
        self.poll_at(Instant::now())
    }

    fn poll_at(&mut self, now: Instant) -> Option<FontOutcome> {
        let rx = self.rx.as_ref()?;

        if self.failed.is_none() {
            match rx.try_recv() {
                Ok(Ok(fonts)) => {
                    self.rx = None;
                    tracing::info!(families = ?fonts.families, "fonts ready");
                    return Some(FontOutcome::Ready(fonts));
                }
                Ok(Err(e)) => self.failed = Some((now, e.to_string())),
                Err(TryRecvError::Disconnected) => {
                    self.failed = Some((now, "font loader exited without a result".to_owned()))
                }
                Err(TryRecvError::Empty) => {
                    if now.saturating_duration_since(self.started) >= self.timings.load_timeout {
                        return Some(self.settle_fallback(format!(
                            "fonts did not load within {} ms",
                            self.timings.load_timeout.as_millis()
                        )));
                    }
                    return None;
                }
            }
        }

        let (failed_at, reason) = self.failed.clone()?;
        if now.saturating_duration_since(failed_at) >= self.timings.error_fallback {
            return Some(self.settle_fallback(reason));
        }
        None
    }

    /// Block until the load settles. Never waits longer than the configured timings allow.
    pub fn wait(mut self) -> FontOutcome {
        loop {
            if let Some(out) = self.poll() {
                return out;
            }
            let now = Instant::now();
            let deadline = match &self.failed {
                Some((at, _)) => *at + self.timings.error_fallback,
                None => self.started + self.timings.load_timeout,
            };
            let remaining = deadline.saturating_duration_since(now);
            match (&self.failed, self.rx.as_ref()) {
                (None, Some(rx)) => match rx.recv_timeout(remaining) {
                    Ok(Ok(fonts)) => {
                        self.rx = None;
                        tracing::info!(families = ?fonts.families, "fonts ready");
                        return FontOutcome::Ready(fonts);
                    }
                    Ok(Err(e)) => self.failed = Some((Instant::now(), e.to_string())),
                    Err(RecvTimeoutError::Disconnected) => {
                        self.failed = Some((
                            Instant::now(),
                            "font loader exited without a result".to_owned(),
                        ))
                    }
                    Err(RecvTimeoutError::Timeout) => {}
                },
                _ => std::thread::sleep(remaining),
            }
        }
    }

    fn settle_fallback(&mut self, reason: String) -> FontOutcome {
        self.rx = None;
        tracing::warn!(%reason, "falling back to substitute fonts");
        FontOutcome::Fallback { reason }
    }
}

/// Synchronous load; what the background thread runs.
#[tracing::instrument(skip(request))]
pub fn load_fonts(request: &FontRequest) -> TextcompResult<LoadedFonts> {
    let files = match &request.source {
        FontSource::Directory(dir) => read_font_dir(dir)?,
        FontSource::System => system_font_files(request),
        FontSource::Memory(files) => files.clone(),
    };

    let mut db = fontdb::Database::new();
    let mut usable = Vec::with_capacity(files.len());
    for file in files {
        let before = db.len();
        db.load_font_data(file.as_ref().clone());
        if db.len() > before {
            usable.push(file);
        } else {
            tracing::debug!(bytes = file.len(), "skipping unparsable font file");
        }
    }
    if usable.is_empty() {
        return Err(TextcompError::asset("no usable font faces found"));
    }

    let mut families: Vec<String> = Vec::new();
    for face in db.faces() {
        for (name, _) in &face.families {
            if !families.iter().any(|f| f == name) {
                families.push(name.clone());
            }
        }
    }

    let missing: Vec<&str> = request
        .family_names()
        .filter(|n| !families.iter().any(|f| f.eq_ignore_ascii_case(n)))
        .collect();
    if !missing.is_empty() {
        tracing::debug!(?missing, "requested families not provided by the source");
    }

    Ok(LoadedFonts {
        files: usable,
        families,
    })
}

fn read_font_dir(dir: &Path) -> TextcompResult<Vec<Arc<Vec<u8>>>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("read font dir {}", dir.display()))?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && is_font_file(p))
        .collect();
    paths.sort();

    let mut out = Vec::with_capacity(paths.len());
    for p in paths {
        let bytes = std::fs::read(&p).with_context(|| format!("read font {}", p.display()))?;
        out.push(Arc::new(bytes));
    }
    Ok(out)
}

fn is_font_file(p: &Path) -> bool {
    p.extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc" | "otc"))
        .unwrap_or(false)
}

fn system_font_files(request: &FontRequest) -> Vec<Arc<Vec<u8>>> {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();

    let mut ids = Vec::new();
    for fam in &request.families {
        for &w in &fam.weights {
            let query = fontdb::Query {
                families: &[fontdb::Family::Name(&fam.name)],
                weight: fontdb::Weight(w),
                ..fontdb::Query::default()
            };
            if let Some(id) = db.query(&query) {
                ids.push(id);
            }
        }
    }
    if ids.is_empty() {
        let query = fontdb::Query {
            families: &[fontdb::Family::SansSerif],
            ..fontdb::Query::default()
        };
        ids.extend(db.query(&query));
    }

    let mut out: Vec<Arc<Vec<u8>>> = Vec::new();
    for id in ids {
        if let Some(bytes) = db.with_face_data(id, |data, _index| data.to_vec()) {
            if !out.iter().any(|b| b.as_slice() == bytes.as_slice()) {
                out.push(Arc::new(bytes));
            }
        }
    }
    out
}

/// Bytes of some installed sans-serif face, if the system has one.
pub fn any_system_font() -> Option<Vec<u8>> {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    let query = fontdb::Query {
        families: &[fontdb::Family::SansSerif],
        ..fontdb::Query::default()
    };
    let id = db.query(&query).or_else(|| db.faces().next().map(|f| f.id))?;
    db.with_face_data(id, |data, _| data.to_vec())
}

/// [`any_system_font`], looked up once per process.
pub fn system_substitute_font() -> Option<Arc<Vec<u8>>> {
    static SUBSTITUTE: OnceLock<Option<Arc<Vec<u8>>>> = OnceLock::new();
    SUBSTITUTE
        .get_or_init(|| any_system_font().map(Arc::new))
        .clone()
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
