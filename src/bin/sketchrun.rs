use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use sha2::Digest as _;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sketchrun", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a JSON summary of the projects and asset packs in a set of archives.
    List(ListArgs),
    /// Print the combined script source a project would be activated with.
    Source(SourceArgs),
    /// Render a JSON draw script to a PNG.
    Frame(FrameArgs),
    /// Bootstrap a session configuration and prepare its startup project.
    Check(CheckArgs),
}

/// Where archives come from: explicit paths, a session configuration, or both.
#[derive(clap::Args, Debug)]
struct ArchiveArgs {
    /// Archive (.zip) to load. Repeatable; loaded in order.
    #[arg(long = "archive")]
    archives: Vec<PathBuf>,

    /// Session configuration JSON whose `archives` are loaded after the explicit ones.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ListArgs {
    #[command(flatten)]
    archives: ArchiveArgs,
}

#[derive(Parser, Debug)]
struct SourceArgs {
    #[command(flatten)]
    archives: ArchiveArgs,

    /// Project to resolve.
    #[arg(long)]
    project: String,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input draw script JSON (array of commands).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    archives: ArchiveArgs,

    /// Project whose images `sprite` commands draw from.
    #[arg(long)]
    project: Option<String>,

    /// TTF/OTF used for `text` commands.
    #[arg(long)]
    font: Option<PathBuf>,

    #[arg(long, default_value_t = 800)]
    width: u32,

    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Print diagnostics about the registered font (family name + SHA-256 of font bytes).
    #[arg(long)]
    dump_fonts: bool,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Session configuration JSON.
    #[arg(long)]
    config: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::List(args) => cmd_list(args),
        Command::Source(args) => cmd_source(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Check(args) => cmd_check(args),
    }
}

/// Catalog built from the requested archives, plus the names of archives that failed to load.
struct Loaded {
    catalog: sketchrun::AssetCatalog,
    failed: Vec<String>,
}

fn load_archives(args: &ArchiveArgs) -> anyhow::Result<Loaded> {
    let mut sources: Vec<sketchrun::ArchiveSource> = args
        .archives
        .iter()
        .map(|p| sketchrun::ArchiveSource::local(p.display().to_string()))
        .collect();
    let mut cache_dir = None;
    if let Some(path) = &args.config {
        let config = sketchrun::SessionConfig::from_path(path)?;
        cache_dir = config.cache_dir.clone();
        sources.extend(config.archives);
    }
    anyhow::ensure!(
        !sources.is_empty(),
        "no archives given (use --archive or --config)"
    );

    let fetcher = sketchrun::Fetcher::open(cache_dir.as_deref());
    Ok(load_sources(&fetcher, &sources))
}

fn load_sources(fetcher: &sketchrun::Fetcher, sources: &[sketchrun::ArchiveSource]) -> Loaded {
    let mut catalog = sketchrun::AssetCatalog::new();
    let mut failed = Vec::new();
    for source in sources {
        let loaded = fetcher
            .fetch(source)
            .and_then(|bytes| catalog.load_archive_bytes(source.label(), &bytes));
        if let Err(e) = loaded {
            tracing::warn!(location = %source.location, "archive skipped: {e}");
            failed.push(source.label().to_string());
        }
    }
    Loaded { catalog, failed }
}

#[derive(serde::Serialize)]
struct ProjectSummary<'a> {
    name: &'a str,
    modules: Vec<&'a str>,
    load_order: &'a [String],
    dependencies: &'a [String],
    images: Vec<&'a str>,
}

#[derive(serde::Serialize)]
struct PackSummary<'a> {
    name: &'a str,
    musics: Vec<&'a str>,
    sounds: Vec<&'a str>,
}

#[derive(serde::Serialize)]
struct CatalogSummary<'a> {
    projects: Vec<ProjectSummary<'a>>,
    packs: Vec<PackSummary<'a>>,
    failed: &'a [String],
}

fn cmd_list(args: ListArgs) -> anyhow::Result<()> {
    let loaded = load_archives(&args.archives)?;
    let summary = CatalogSummary {
        projects: loaded
            .catalog
            .projects()
            .map(|p| ProjectSummary {
                name: &p.name,
                modules: p.code.keys().map(String::as_str).collect(),
                load_order: &p.load_order,
                dependencies: &p.dependencies,
                images: p.images.keys().map(String::as_str).collect(),
            })
            .collect(),
        packs: loaded
            .catalog
            .packs()
            .map(|p| PackSummary {
                name: &p.name,
                musics: p.musics.keys().map(String::as_str).collect(),
                sounds: p.sounds.keys().map(String::as_str).collect(),
            })
            .collect(),
        failed: &loaded.failed,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn cmd_source(args: SourceArgs) -> anyhow::Result<()> {
    let loaded = load_archives(&args.archives)?;
    let source = sketchrun::combined_source(&loaded.catalog, &args.project)?;
    print!("{source}");
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let json = std::fs::read_to_string(&args.in_path)
        .with_context(|| format!("read draw script '{}'", args.in_path.display()))?;
    let commands = sketchrun::parse_commands(&json)?;

    let catalog = if args.archives.archives.is_empty() && args.archives.config.is_none() {
        sketchrun::AssetCatalog::new()
    } else {
        load_archives(&args.archives)?.catalog
    };
    if let Some(project) = &args.project {
        catalog.require_project(project)?;
    }

    let mut text = sketchrun::TextEngine::new();
    if let Some(font) = &args.font {
        let family = text.register_font_path(font)?;
        if args.dump_fonts {
            dump_font(font, &family)?;
        }
    }

    let size = sketchrun::SurfaceSize::new(args.width, args.height)?;
    let mut renderer = sketchrun::Renderer::with_text_engine(size, text);
    let assets = sketchrun::AssetResolver::new(&catalog, args.project.as_deref());
    sketchrun::replay(&commands, &mut renderer, &assets)?;
    let data = renderer.frame_rgba8();

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        &data,
        size.width,
        size.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn dump_font(path: &Path, family: &str) -> anyhow::Result<()> {
    let bytes = std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
    eprintln!("font diagnostics:");
    eprintln!("  source:  {}", path.display());
    eprintln!("  family:  {family}");
    eprintln!("  sha256:  {}", hex::encode(sha2::Sha256::digest(&bytes)));
    Ok(())
}

#[derive(serde::Serialize)]
struct CheckReport {
    loaded: usize,
    failed: Vec<String>,
    project: Option<String>,
    source_bytes: usize,
    images: sketchrun::ImageReport,
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let config = sketchrun::SessionConfig::from_path(&args.config)?;
    let fetcher = sketchrun::Fetcher::open(config.cache_dir.as_deref());
    let loaded = load_sources(&fetcher, &config.archives);

    let mut report = CheckReport {
        loaded: config.archives.len() - loaded.failed.len(),
        failed: loaded.failed.clone(),
        project: None,
        source_bytes: 0,
        images: sketchrun::ImageReport::default(),
    };
    if let Some(name) = &config.startup_project {
        let activation = sketchrun::prepare(&loaded.catalog, name)?;
        report.project = Some(activation.project);
        report.source_bytes = activation.source.len();
        report.images = activation.images;
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    anyhow::ensure!(
        report.failed.is_empty(),
        "{} archive(s) failed to load",
        report.failed.len()
    );
    Ok(())
}
