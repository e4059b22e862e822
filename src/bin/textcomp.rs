use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use textcomp::assets::fonts::{FontRequest, FontSource, stylesheet_url};
use textcomp::scene::templates::{self, TemplateCategory};
use textcomp::{DesignDocument, EditorOpts, EditorSession};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "textcomp", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a design document to PNG.
    Render(RenderArgs),
    /// List style templates.
    Templates(TemplatesArgs),
    /// Print the web-font stylesheet URL for the editor's families.
    FontsUrl,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input design JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Editor options JSON.
    #[arg(long)]
    opts: Option<PathBuf>,

    /// Load fonts from this directory instead of the system.
    #[arg(long)]
    fonts: Option<PathBuf>,

    /// Skip loading the editor families; text draws with a system substitute face.
    #[arg(long, default_value_t = false)]
    no_fonts: bool,

    /// Background source overriding the document's.
    #[arg(long)]
    background: Option<String>,

    /// Keep the selection outline around the active layer.
    #[arg(long, default_value_t = false)]
    selection: bool,
}

#[derive(Parser, Debug)]
struct TemplatesArgs {
    /// Only this category.
    #[arg(long)]
    category: Option<TemplateCategory>,

    /// Print JSON instead of a table.
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Templates(args) => cmd_templates(args),
        Command::FontsUrl => {
            println!("{}", stylesheet_url(&FontRequest::editor_default(FontSource::System)));
            Ok(())
        }
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let doc = DesignDocument::from_path(&args.in_path)?;
    let mut opts = match &args.opts {
        Some(path) => EditorOpts::from_path(path)?,
        None => EditorOpts::default(),
    }
    .with_env_overrides();
    if let Some(dir) = &args.fonts {
        opts = opts.with_font_dir(dir);
    }

    let mut sess = EditorSession::from_document(&doc, opts)?;
    if !args.no_fonts {
        sess.start_font_load();
        sess.wait_for_fonts()?;
    }
    if let Some(src) = &args.background {
        sess.set_background(src)?;
    }

    let png = if args.selection {
        sess.frame().map(|f| f.to_png()).transpose()?
    } else {
        sess.export_png()?
    };
    let png = png.context("no raster surface to export")?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, &png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    for notice in sess.drain_notices() {
        eprintln!("{notice}");
    }
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_templates(args: TemplatesArgs) -> anyhow::Result<()> {
    let list: Vec<_> = match args.category {
        Some(cat) => templates::by_category(cat).collect(),
        None => templates::catalog().iter().collect(),
    };
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&list).context("serialize templates")?
        );
        return Ok(());
    }
    for t in list {
        println!(
            "{:<20} {:<10} {:<18} {:>4.0}px  {}",
            t.id,
            t.category,
            t.font,
            t.font_size,
            t.effect
        );
    }
    Ok(())
}
