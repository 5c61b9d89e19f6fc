//! remold - raster deformation from the command line
//!
//! Loads a PNG, runs tools or effects through an edit session and writes
//! the result with the export pipeline.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use remold_io::{ExportFormat, Resolution, WatermarkPosition};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "remold")]
#[command(author, version, about = "Interactive-style raster deformation from the command line")]
#[command(long_about = "
Applies liquify tools and warp effects to PNG images.

Examples:
  remold tools                                        # List tools
  remold apply face.png -o out.png -t eye-enlarge -p 120,88 -p 180,88
  remold apply face.png -o out.png -t face-slim --regions strokes.json --symmetry
  remold effect face.png -o out.png '{\"effect\": \"twist\", \"center\": {\"x\": 64, \"y\": 64}, \"radius\": 50, \"angle\": 90}'
  remold run face.png -o out.png --script steps.json  # Tools, effects, undo/redo in one session
  remold export face.png -o face.jpg -r 4k -q 85 --watermark \"remold\"
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,

    /// Engine configuration (YAML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the tool catalog
    #[command(visible_alias = "ls")]
    Tools(ToolsArgs),

    /// Apply a tool along one or more strokes
    #[command(visible_alias = "a")]
    Apply(ApplyArgs),

    /// Apply a whole-image effect
    #[command(visible_alias = "fx")]
    Effect(EffectArgs),

    /// Run a script of steps in one session
    Run(RunArgs),

    /// Re-encode with resolution, quality and watermark
    #[command(visible_alias = "e")]
    Export(ExportArgs),
}

#[derive(Args)]
struct ToolsArgs {
    /// Machine-readable output (JSON)
    #[arg(long)]
    json: bool,
}

/// Output encoding shared by every command that writes an image.
#[derive(Args, Clone)]
struct OutputArgs {
    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Format: png, jpeg, webp (default: from output extension)
    #[arg(short, long)]
    format: Option<ExportFormat>,

    /// Quality (1-100, JPEG only)
    #[arg(short, long, default_value = "90")]
    quality: u8,

    /// Resolution: original, hd, 4k
    #[arg(short, long, default_value = "original")]
    resolution: Resolution,

    /// Watermark text
    #[arg(long)]
    watermark: Option<String>,

    /// Watermark anchor: top-left, top-right, bottom-left, bottom-right, center
    #[arg(long, default_value = "top-left")]
    position: WatermarkPosition,

    /// Watermark opacity (0-1)
    #[arg(long, default_value = "0.5")]
    opacity: f64,
}

#[derive(Args)]
struct ApplyArgs {
    /// Input image (PNG)
    input: PathBuf,

    #[command(flatten)]
    out: OutputArgs,

    /// Tool id (see `remold tools`)
    #[arg(short, long)]
    tool: String,

    /// Stroke point "x,y"; repeat for a multi-point stroke
    #[arg(short, long = "point", value_name = "X,Y")]
    points: Vec<String>,

    /// Regions as JSON (array of {id, points, intensity, brush_size, feather})
    #[arg(long, conflicts_with = "points")]
    regions: Option<PathBuf>,

    /// Intensity (0-100)
    #[arg(short, long)]
    intensity: Option<f64>,

    /// Brush radius in pixels
    #[arg(short, long)]
    brush_size: Option<f64>,

    /// Feather (0-100)
    #[arg(long)]
    feather: Option<f64>,

    /// Also apply mirrored across the vertical centre line
    #[arg(long)]
    symmetry: bool,
}

#[derive(Args)]
struct EffectArgs {
    /// Input image (PNG)
    input: PathBuf,

    /// Effect as inline JSON, or @file.json
    effect: String,

    #[command(flatten)]
    out: OutputArgs,
}

#[derive(Args)]
struct RunArgs {
    /// Input image (PNG)
    input: PathBuf,

    /// Steps as JSON or YAML
    #[arg(short, long)]
    script: PathBuf,

    #[command(flatten)]
    out: OutputArgs,
}

#[derive(Args)]
struct ExportArgs {
    /// Input image (PNG)
    input: PathBuf,

    #[command(flatten)]
    out: OutputArgs,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Tools(args) => commands::tools::run(args, &config),
        Commands::Apply(args) => commands::apply::run(args, config, cli.verbose),
        Commands::Effect(args) => commands::effect::run(args, config, cli.verbose),
        Commands::Run(args) => commands::script::run(args, config, cli.verbose),
        Commands::Export(args) => commands::export::run(args, config, cli.verbose),
    }
}
