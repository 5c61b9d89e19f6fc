//! Run command - replay a script of steps in one session
//!
//! A script is a JSON or YAML list:
//!
//! ```yaml
//! - step: tool
//!   tool: eye-enlarge
//!   regions:
//!     - {id: left, points: [{x: 40, y: 50}], intensity: 60, brush_size: 20}
//! - step: effect
//!   effect: twist
//!   center: {x: 64, y: 64}
//!   radius: 40
//!   angle: 45
//! - step: undo
//! ```

use anyhow::{Context, Result};
use remold_edit::{EditEngine, EditRegion, Effect, EngineConfig, SessionId, ToolSettings};
use serde::Deserialize;
use tracing::{debug, info};

use super::{open_session, save_session};
use crate::RunArgs;

/// One scripted action.
#[derive(Debug, Deserialize)]
#[serde(tag = "step", rename_all = "kebab-case")]
pub enum Step {
    /// Apply a catalog tool.
    Tool {
        tool: String,
        regions: Vec<EditRegion>,
        #[serde(default)]
        settings: Option<ToolSettings>,
    },
    /// Apply an effect.
    Effect(Effect),
    Undo,
    Redo,
    Reset,
}

/// Parses a script; YAML accepts JSON too.
pub fn parse_script(text: &str) -> Result<Vec<Step>> {
    Ok(serde_yaml::from_str(text)?)
}

/// Runs `steps` in order, stopping at the first error.
pub fn execute(engine: &mut EditEngine, id: SessionId, steps: Vec<Step>, verbose: bool) -> Result<()> {
    for (i, step) in steps.into_iter().enumerate() {
        let n = i + 1;
        match step {
            Step::Tool { tool, regions, settings } => {
                let settings = match settings {
                    Some(s) => s,
                    None => engine.settings_for(&tool)?,
                };
                let res = engine
                    .apply_tool(id, &tool, regions, settings)
                    .with_context(|| format!("Step {n}: tool '{tool}' failed"))?;
                info!(step = n, tool = %tool, committed = res.committed, pixels = res.affected_pixels, "tool");
            }
            Step::Effect(effect) => {
                let res = engine
                    .apply_effect(id, &effect)
                    .with_context(|| format!("Step {n}: effect '{}' failed", effect.name()))?;
                info!(step = n, effect = effect.name(), committed = res.committed, "effect");
            }
            Step::Undo => {
                let done = engine.undo(id)?;
                info!(step = n, done, "undo");
            }
            Step::Redo => {
                let done = engine.redo(id)?;
                info!(step = n, done, "redo");
            }
            Step::Reset => {
                let res = engine.reset_to_original(id)?;
                info!(step = n, committed = res.committed, "reset");
            }
        }
    }

    if verbose {
        let history = engine.history(id)?;
        println!(
            "History: {} operation(s), at {}",
            history.len(),
            history.current_index()
        );
        for (i, op) in history.operations().iter().enumerate() {
            let marker = if i as isize == history.current_index() { '>' } else { ' ' };
            println!("  {marker} #{} {}", op.id, op.tool_id);
        }
    }
    Ok(())
}

pub fn run(args: RunArgs, config: EngineConfig, verbose: bool) -> Result<()> {
    let text = std::fs::read_to_string(&args.script)
        .with_context(|| format!("Failed to read script: {}", args.script.display()))?;
    let steps = parse_script(&text).with_context(|| format!("Invalid script: {}", args.script.display()))?;
    debug!(steps = steps.len(), "script loaded");

    let (mut engine, id) = open_session(config, &args.input, verbose)?;
    execute(&mut engine, id, steps, verbose)?;
    save_session(&engine, id, &args.out, verbose)
}

#[cfg(test)]
mod tests {
    use super::*;
    use remold_core::RasterBuffer;

    const SCRIPT: &str = r#"
- step: tool
  tool: brighten
  regions:
    - {id: a, points: [{x: 10, y: 10}], intensity: 80, brush_size: 6}
- step: effect
  effect: twist
  center: {x: 16, y: 16}
  radius: 12
  angle: 90
- step: undo
- step: tool
  tool: face-slim
  regions:
    - {id: b, points: [{x: 20, y: 20}], intensity: 50, brush_size: 8, feather: 10}
  settings: {undo_levels: 10}
"#;

    #[test]
    fn test_parse_and_execute() {
        let steps = parse_script(SCRIPT).unwrap();
        assert_eq!(steps.len(), 4);
        assert!(matches!(steps[1], Step::Effect(Effect::Twist { .. })));

        let mut engine = EditEngine::default();
        let mut image = RasterBuffer::new(32, 32).unwrap();
        for y in 0..32 {
            for x in 0..32 {
                image.set_pixel(x, y, [(x * 8) as u8, (y * 8) as u8, 60, 255]);
            }
        }
        let id = engine.create_session_from_buffer(image);
        execute(&mut engine, id, steps, false).unwrap();

        let history = engine.history(id).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history.current_index(), 1);
        assert_eq!(history.max_history(), 10);
        let tools: Vec<_> = history.operations().iter().map(|o| o.tool_id.as_str()).collect();
        assert_eq!(tools, ["brighten", "face-slim"]);
    }

    #[test]
    fn test_json_script() {
        let steps = parse_script(r#"[{"step": "redo"}, {"step": "reset"}]"#).unwrap();
        assert!(matches!(steps[0], Step::Redo));
        assert!(matches!(steps[1], Step::Reset));
    }

    #[test]
    fn test_unknown_tool_fails() {
        let steps = parse_script("- {step: tool, tool: nope, regions: [{id: a, points: [{x: 1, y: 1}], intensity: 1, brush_size: 1}]}").unwrap();
        let mut engine = EditEngine::default();
        let id = engine.create_session_from_buffer(RasterBuffer::new(4, 4).unwrap());
        assert!(execute(&mut engine, id, steps, false).is_err());
    }
}
