//! Apply command - run one tool along strokes

use anyhow::{bail, Context, Result};
use remold_edit::{EditRegion, ToolSettings};
use tracing::{debug, info};

use super::{open_session, parse_point, save_session};
use crate::ApplyArgs;

pub fn run(args: ApplyArgs, config: remold_edit::EngineConfig, verbose: bool) -> Result<()> {
    let (mut engine, id) = open_session(config, &args.input, verbose)?;

    let settings = settings_from_args(engine.settings_for(&args.tool)?, &args);
    let regions = regions_from_args(&args, &settings)?;

    if verbose {
        println!(
            "Tool: {} ({} region(s), intensity {}, brush {}, feather {})",
            args.tool,
            regions.len(),
            settings.intensity,
            settings.brush_size,
            settings.feather
        );
    }

    let result = engine.apply_tool(id, &args.tool, regions, settings)?;
    if result.committed {
        info!(tool = %args.tool, pixels = result.affected_pixels, "applied");
    } else {
        info!(tool = %args.tool, "strokes missed the image, output unchanged");
    }

    save_session(&engine, id, &args.out, verbose)
}

fn settings_from_args(mut settings: ToolSettings, args: &ApplyArgs) -> ToolSettings {
    if let Some(v) = args.intensity {
        settings.intensity = v;
    }
    if let Some(v) = args.brush_size {
        settings.brush_size = v;
    }
    if let Some(v) = args.feather {
        settings.feather = v;
    }
    settings.symmetry_enabled |= args.symmetry;
    settings
}

fn regions_from_args(args: &ApplyArgs, settings: &ToolSettings) -> Result<Vec<EditRegion>> {
    if let Some(path) = &args.regions {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read regions: {}", path.display()))?;
        let regions: Vec<EditRegion> = serde_json::from_str(&text)
            .with_context(|| format!("Invalid regions JSON: {}", path.display()))?;
        debug!(count = regions.len(), "regions loaded");
        return Ok(regions);
    }

    if args.points.is_empty() {
        bail!("No stroke given: pass --point X,Y or --regions FILE");
    }
    let points = args.points.iter().map(|p| parse_point(p)).collect::<Result<Vec<_>>>()?;
    Ok(vec![EditRegion::from_settings("cli", points, settings)])
}
