use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, Mutex};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gb_pixels::{DitherMode, GridMode, TileSort, TransparencyMode};
use gbtile::models::{CropAspect, OutputSize, Settings, SizeRequest};
use gbtile::rendering::{encode_indexed, encode_rgba, export_file_name, SourceImage};
use gbtile::services::{
    FileWatcher, RenderOutcome, RenderSession, ReportBuilder, RunState, TileValidator,
};

/// Environment variable naming a config file
const CONFIG_ENV: &str = "GBTILE_CONFIG";

/// Exit code when analysis finds the image over budget
const EXIT_NOT_OK: i32 = 2;

#[derive(Parser)]
#[command(name = "gbtile")]
#[command(about = "Convert images to a 4-color retro console palette and check tile budgets")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an image to the 4-color palette and write an indexed PNG
    Convert(ConvertArgs),
    /// Check an image against the palette and tile budgets
    Analyze(AnalyzeArgs),
    /// Convert, then convert again whenever the input or config changes
    Watch(ConvertArgs),
}

#[derive(Args, Clone)]
struct ConvertArgs {
    /// Input image (PNG, JPEG, GIF, BMP)
    input: PathBuf,

    /// Output PNG path (default: gb4_<w>x<h>.png next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output size as WxH (e.g. 160x144)
    #[arg(long, conflicts_with_all = ["width", "height"])]
    size: Option<String>,

    /// Output width; height follows the crop aspect
    #[arg(long, conflicts_with = "height")]
    width: Option<u32>,

    /// Output height; width follows the crop aspect
    #[arg(long)]
    height: Option<u32>,

    /// Crop aspect: "free" or "a:b"
    #[arg(long)]
    crop_aspect: Option<CropAspect>,

    /// Crop zoom (>= 1)
    #[arg(long)]
    zoom: Option<f32>,

    /// Horizontal pan in [-1, 1]
    #[arg(long, allow_hyphen_values = true)]
    pan_x: Option<f32>,

    /// Vertical pan in [-1, 1]
    #[arg(long, allow_hyphen_values = true)]
    pan_y: Option<f32>,

    /// Brightness offset (e.g. -20)
    #[arg(long, allow_hyphen_values = true)]
    brightness: Option<f32>,

    /// Contrast (-255..255)
    #[arg(long, allow_hyphen_values = true)]
    contrast: Option<f32>,

    /// Gamma (> 0)
    #[arg(long)]
    gamma: Option<f32>,

    /// Gaussian blur radius in output pixels
    #[arg(long)]
    blur: Option<f32>,

    /// Dither mode: off, bayer or floyd
    #[arg(long)]
    dither: Option<DitherMode>,

    /// Dither strength in [0, 1]
    #[arg(long)]
    strength: Option<f32>,

    /// Integer upscale for the written PNG (1-8)
    #[arg(long)]
    scale: Option<u32>,

    /// Palette as four comma-separated hex colors
    #[arg(long)]
    palette: Option<String>,

    /// YAML config file (or GBTILE_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Input image (PNG, JPEG, GIF, BMP)
    input: PathBuf,

    /// Tile edge in pixels
    #[arg(long)]
    tile_size: Option<usize>,

    /// Maximum number of distinct tiles
    #[arg(long)]
    tile_limit: Option<usize>,

    /// How to reach a multiple of the tile size: pad or crop
    #[arg(long)]
    mode: Option<GridMode>,

    /// Transparent pixel handling: replace or color0
    #[arg(long)]
    transparency: Option<TransparencyMode>,

    /// Write a JSON report here
    #[arg(long)]
    report: Option<PathBuf>,

    /// Write the distinct-tile strip PNG here
    #[arg(long)]
    tileset: Option<PathBuf>,

    /// Tileset order by frequency: asc or desc
    #[arg(long)]
    sort: Option<TileSort>,

    /// Tiles per tileset row
    #[arg(long)]
    columns: Option<usize>,

    /// YAML config file (or GBTILE_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gbtile=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    match cli.command {
        Some(Commands::Convert(args)) => run_convert_command(&args),
        Some(Commands::Analyze(args)) => run_analyze_command(&args),
        Some(Commands::Watch(args)) => run_watch_command(args).await,
        None => {
            run_status_command();
            Ok(())
        }
    }
}

/// `--config`, else `GBTILE_CONFIG`
fn config_path(flag: Option<&Path>) -> Option<PathBuf> {
    flag.map(Path::to_path_buf)
        .or_else(|| std::env::var(CONFIG_ENV).ok().map(PathBuf::from))
}

fn apply_convert_overrides(settings: &mut Settings, args: &ConvertArgs) {
    if let Some(aspect) = args.crop_aspect {
        settings.crop.aspect = aspect;
    }
    if let Some(zoom) = args.zoom {
        settings.crop.zoom = zoom;
    }
    if let Some(pan_x) = args.pan_x {
        settings.crop.pan_x = pan_x;
    }
    if let Some(pan_y) = args.pan_y {
        settings.crop.pan_y = pan_y;
    }
    if let Some(brightness) = args.brightness {
        settings.brightness = brightness;
    }
    if let Some(contrast) = args.contrast {
        settings.contrast = contrast;
    }
    if let Some(gamma) = args.gamma {
        settings.gamma = gamma;
    }
    if let Some(blur) = args.blur {
        settings.blur_radius = blur;
    }
    if let Some(dither) = args.dither {
        settings.dither_mode = dither;
    }
    if let Some(strength) = args.strength {
        settings.dither_strength = strength;
    }
    if let Some(scale) = args.scale {
        settings.export_scale = scale;
    }
    if let Some(ref palette) = args.palette {
        settings.palette = palette.split(',').map(|c| c.trim().to_string()).collect();
    }
}

fn size_request(args: &ConvertArgs, settings: &Settings) -> anyhow::Result<SizeRequest> {
    Ok(match (&args.size, args.width, args.height) {
        (Some(size), _, _) => SizeRequest::Exact(OutputSize::parse(size)?),
        (None, Some(width), _) => SizeRequest::Width(width),
        (None, None, Some(height)) => SizeRequest::Height(height),
        (None, None, None) => SizeRequest::Exact(settings.output),
    })
}

/// Load config and source, then hand both to the session
fn prepare_session(
    session: &mut RenderSession,
    args: &ConvertArgs,
    config: Option<&Path>,
) -> anyhow::Result<()> {
    let mut settings = Settings::load(config);
    apply_convert_overrides(&mut settings, args);

    let source = SourceImage::open(&args.input)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;

    settings.output = size_request(args, &settings)?.resolve(
        settings.crop.aspect.ratio(),
        source.bitmap.width(),
        source.bitmap.height(),
    );

    session.set_settings(settings);
    session.set_source(source);
    Ok(())
}

/// Render and write the PNG. Returns the written path, or `None` when the
/// previous output is still current.
fn render_and_write(
    session: &mut RenderSession,
    output: Option<&Path>,
    input: &Path,
) -> anyhow::Result<Option<PathBuf>> {
    if session.render()? == RenderOutcome::Unchanged {
        return Ok(None);
    }

    let scale = session.settings().export_scale;
    let rendered = session
        .last()
        .context("Render finished without output")?;
    let converted = &rendered.converted;

    let path = output.map(Path::to_path_buf).unwrap_or_else(|| {
        input.with_file_name(export_file_name(converted.width(), converted.height(), scale))
    });

    let png = encode_indexed(converted, scale)?;
    std::fs::write(&path, &png).with_context(|| format!("Failed to write {}", path.display()))?;

    let analysis = &rendered.validation.analysis;
    println!(
        "{} -> {} ({}x{}, x{}, {} bytes) dither={} tiles={}/{} status={}",
        input.display(),
        path.display(),
        converted.width(),
        converted.height(),
        scale,
        png.len(),
        session.settings().dither_mode,
        analysis.unique_tiles,
        analysis.tile_limit,
        analysis.status,
    );

    Ok(Some(path))
}

fn run_convert_command(args: &ConvertArgs) -> anyhow::Result<()> {
    let config = config_path(args.config.as_deref());
    let mut session = RenderSession::new(Settings::default());

    prepare_session(&mut session, args, config.as_deref())?;
    render_and_write(&mut session, args.output.as_deref(), &args.input)?;
    Ok(())
}

fn run_analyze_command(args: &AnalyzeArgs) -> anyhow::Result<()> {
    let config = config_path(args.config.as_deref());
    let mut settings = Settings::load(config.as_deref());

    if let Some(tile_size) = args.tile_size {
        settings.tile_size = tile_size;
    }
    if let Some(tile_limit) = args.tile_limit {
        settings.tile_limit = tile_limit;
    }
    if let Some(mode) = args.mode {
        settings.multiple_of_tile_handling = mode;
    }
    if let Some(transparency) = args.transparency {
        settings.transparency_mode = transparency;
    }
    if let Some(sort) = args.sort {
        settings.tileset_sort = sort;
    }
    if let Some(columns) = args.columns {
        settings.tileset_columns = columns;
    }
    let settings = settings.sanitized();

    let source = SourceImage::open(&args.input)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;

    let validator = TileValidator::new(&settings);
    let analysis = validator.validate(&source.bitmap).analysis;

    println!(
        "{}: {}x{} -> {}x{} tiles={}x{} colors={} unique={} rare={} limit={} status={}",
        source.file_name,
        source.src_width,
        source.src_height,
        analysis.analyzed_width,
        analysis.analyzed_height,
        analysis.tiles_x,
        analysis.tiles_y,
        analysis.unique_colors,
        analysis.unique_tiles,
        analysis.rare_unique_tiles,
        analysis.tile_limit,
        analysis.status,
    );

    if let Some(ref path) = args.report {
        let report = ReportBuilder::for_source(&source)
            .settings(&settings)
            .build(&analysis);
        std::fs::write(path, report.to_json_pretty()?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "Wrote report");
    }

    if let Some(ref path) = args.tileset {
        let strip = validator.tileset(&analysis);
        std::fs::write(path, encode_rgba(&strip)?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!(
            path = %path.display(),
            tiles = analysis.unique_tiles,
            "Wrote tileset"
        );
    }

    if !analysis.status.is_ok() {
        std::process::exit(EXIT_NOT_OK);
    }
    Ok(())
}

async fn run_watch_command(args: ConvertArgs) -> anyhow::Result<()> {
    let args = Arc::new(args);
    let config = config_path(args.config.as_deref());
    let session = Arc::new(Mutex::new(RenderSession::new(Settings::default())));

    let mut files = vec![args.input.clone()];
    files.extend(config.clone());
    let watcher = FileWatcher::new(&files);
    if !watcher.is_active() {
        tracing::warn!("File watching unavailable, rendering once");
    }
    let mut changes = watcher.subscribe();

    let (done_tx, mut done_rx) = mpsc::channel::<()>(4);
    let spawn_render = || {
        let session = session.clone();
        let args = args.clone();
        let config = config.clone();
        let done = done_tx.clone();
        tokio::task::spawn_blocking(move || {
            let mut session = session.blocking_lock();
            let result = prepare_session(&mut session, &args, config.as_deref())
                .and_then(|_| render_and_write(&mut session, args.output.as_deref(), &args.input));
            match result {
                Ok(Some(path)) => tracing::info!(path = %path.display(), "Rendered"),
                Ok(None) => tracing::info!("Inputs unchanged, output kept"),
                Err(e) => tracing::warn!(error = %e, "Render failed"),
            }
            let _ = done.blocking_send(());
        });
    };

    let mut state = RunState::Idle;
    if state.request() {
        spawn_render();
    }

    loop {
        tokio::select! {
            event = changes.recv() => match event {
                Ok(event) => {
                    tracing::info!(paths = ?event.paths, "Change detected");
                    if state.request() {
                        spawn_render();
                    }
                }
                Err(broadcast::error::RecvError::Lagged(_)) => {
                    if state.request() {
                        spawn_render();
                    }
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            Some(()) = done_rx.recv() => {
                if state.finish() {
                    spawn_render();
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Stopping watch");
                break;
            }
        }
    }

    Ok(())
}

/// Print version, configuration source and active defaults
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let config_file = std::env::var(CONFIG_ENV).ok();

    println!("gbtile v{VERSION}");
    println!("4-color retro console image converter and tile validator\n");

    println!("Environment Variables:");
    println!(
        "  {CONFIG_ENV} = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );

    let config_source = match config_file {
        Some(ref path) if Path::new(path).exists() => path.to_string(),
        Some(_) => "defaults (file not found)".to_string(),
        None => "defaults".to_string(),
    };
    println!("\nConfiguration: {config_source}\n");

    let settings = Settings::load(config_file.as_deref().map(Path::new)).sanitized();
    match serde_yaml::to_string(&settings) {
        Ok(yaml) => {
            for line in yaml.lines() {
                println!("  {line}");
            }
        }
        Err(e) => tracing::warn!(%e, "Failed to print settings"),
    }

    println!("\nCommands:");
    println!("  gbtile convert <INPUT>   Convert to the 4-color palette");
    println!("  gbtile analyze <INPUT>   Check palette and tile budgets");
    println!("  gbtile watch <INPUT>     Re-convert on change");
    println!("\nRun 'gbtile --help' for more options.");
}
