//! Effect command - apply a whole-image deformation

use anyhow::{Context, Result};
use remold_edit::{Effect, EngineConfig};
use tracing::info;

use super::{open_session, read_json_arg, save_session};
use crate::EffectArgs;

pub fn run(args: EffectArgs, config: EngineConfig, verbose: bool) -> Result<()> {
    let json = read_json_arg(&args.effect)?;
    let effect: Effect = serde_json::from_str(&json).context("Invalid effect JSON")?;

    let (mut engine, id) = open_session(config, &args.input, verbose)?;
    if verbose {
        println!("Effect: {}", effect.name());
    }

    let result = engine.apply_effect(id, &effect)?;
    info!(effect = effect.name(), pixels = result.affected_pixels, "applied");

    save_session(&engine, id, &args.out, verbose)
}
