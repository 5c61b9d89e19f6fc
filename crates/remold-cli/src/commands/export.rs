//! Export command - re-encode an image through the export pipeline

use anyhow::Result;
use remold_edit::EngineConfig;

use super::{open_session, save_session};
use crate::ExportArgs;

pub fn run(args: ExportArgs, config: EngineConfig, verbose: bool) -> Result<()> {
    let (engine, id) = open_session(config, &args.input, verbose)?;
    save_session(&engine, id, &args.out, verbose)
}
