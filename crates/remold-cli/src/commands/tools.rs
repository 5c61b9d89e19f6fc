//! Tools command - list the catalog

use anyhow::Result;
use remold_edit::EngineConfig;

use crate::ToolsArgs;

pub fn run(args: ToolsArgs, config: &EngineConfig) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(&config.catalog)?);
        return Ok(());
    }

    println!("{:<18} {:<18} {}", "ID", "NAME", "MODE");
    for tool in config.catalog.iter() {
        let defaults = match &tool.defaults {
            Some(d) => format!("  (intensity {}, brush {}, feather {})", d.intensity, d.brush_size, d.feather),
            None => String::new(),
        };
        println!("{:<18} {:<18} {}{}", tool.id, tool.name, tool.mode.name(), defaults);
    }
    Ok(())
}
