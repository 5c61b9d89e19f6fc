//! CLI command implementations

pub mod apply;
pub mod effect;
pub mod export;
pub mod script;
pub mod tools;

use anyhow::{bail, Context, Result};
use remold_core::{Point2D, RasterBuffer};
use remold_edit::{EditEngine, EngineConfig, SessionId};
use remold_io::{decode_png, ExportFormat, ExportOptions, Watermark};
use std::path::Path;
use tracing::{debug, info};

use crate::OutputArgs;

/// Loads the engine configuration, or the built-in one.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let config = EngineConfig::from_yaml_str(&text)
        .with_context(|| format!("Invalid config: {}", path.display()))?;
    debug!(path = %path.display(), tools = config.catalog.len(), "config loaded");
    Ok(config)
}

/// Load a PNG from path
pub fn load_image(path: &Path) -> Result<RasterBuffer> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to load: {}", path.display()))?;
    decode_png(&bytes).with_context(|| format!("Failed to decode: {}", path.display()))
}

/// Loads `path` into a fresh session.
pub fn open_session(config: EngineConfig, path: &Path, verbose: bool) -> Result<(EditEngine, SessionId)> {
    let image = load_image(path)?;
    if verbose {
        println!("Loaded: {} ({}x{})", path.display(), image.width(), image.height());
    }
    let mut engine = EditEngine::new(config);
    let id = engine.create_session_from_buffer(image);
    Ok((engine, id))
}

/// Export options from the command line. The format falls back to the
/// output file extension, then PNG.
pub fn export_options(out: &OutputArgs) -> Result<ExportOptions> {
    let format = match out.format {
        Some(f) => f,
        None => match out.output.extension().and_then(|e| e.to_str()) {
            Some(ext) => ext
                .parse::<ExportFormat>()
                .with_context(|| format!("Cannot infer format from '{}'", out.output.display()))?,
            None => ExportFormat::Png,
        },
    };
    if !(0.0..=1.0).contains(&out.opacity) {
        bail!("Watermark opacity must be in 0..1, got {}", out.opacity);
    }
    Ok(ExportOptions {
        format,
        quality: out.quality,
        resolution: out.resolution,
        watermark: out.watermark.as_ref().map(|text| Watermark {
            text: text.clone(),
            position: out.position,
            opacity: out.opacity,
        }),
    })
}

/// Exports the session's canonical buffer to `out.output`.
pub fn save_session(engine: &EditEngine, id: SessionId, out: &OutputArgs, verbose: bool) -> Result<()> {
    let options = export_options(out)?;
    let image = engine.export_image(id, &options).context("Export failed")?;
    std::fs::write(&out.output, &image.bytes)
        .with_context(|| format!("Failed to save: {}", out.output.display()))?;
    info!(
        path = %out.output.display(),
        width = image.width,
        height = image.height,
        format = %image.format,
        mime = image.format.mime_type(),
        size = %format_size(image.bytes.len() as u64),
        "saved"
    );
    if verbose {
        println!("Saved: {} ({}x{})", out.output.display(), image.width, image.height);
    }
    Ok(())
}

/// Parses "x,y".
pub fn parse_point(s: &str) -> Result<Point2D> {
    let Some((x, y)) = s.split_once(',') else {
        bail!("Expected point as X,Y, got '{s}'");
    };
    let x: f64 = x.trim().parse().with_context(|| format!("Bad x in '{s}'"))?;
    let y: f64 = y.trim().parse().with_context(|| format!("Bad y in '{s}'"))?;
    Ok(Point2D::new(x, y))
}

/// Reads inline JSON, or a file when prefixed with `@`.
pub fn read_json_arg(arg: &str) -> Result<String> {
    match arg.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("Failed to read: {path}")),
        None => Ok(arg.to_string()),
    }
}

/// Format file size for display
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
