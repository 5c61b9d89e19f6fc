//! Engine configuration.
//!
//! Loaded from YAML; every field has a default, so an empty document is a
//! valid configuration. A complete sample ships as `config/default.yaml`.
//!
//! ```rust
//! use remold_edit::EngineConfig;
//!
//! let config = EngineConfig::from_yaml_str("max_history: 20\n").unwrap();
//! assert_eq!(config.max_history, 20);
//! assert!(config.catalog.get("eye-enlarge").is_some());
//! ```

use serde::{Deserialize, Serialize};

use crate::catalog::ToolCatalog;
use crate::history::DEFAULT_MAX_HISTORY;
use crate::settings::ToolSettings;
use crate::{EditError, EditResult};

fn default_max_history() -> usize {
    DEFAULT_MAX_HISTORY
}

/// Settings shared by every session of an engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// History cap for new sessions.
    #[serde(default = "default_max_history")]
    pub max_history: usize,
    /// Settings for tools that define none.
    #[serde(default)]
    pub default_settings: ToolSettings,
    /// Tool catalog.
    #[serde(default)]
    pub catalog: ToolCatalog,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_HISTORY,
            default_settings: ToolSettings::default(),
            catalog: ToolCatalog::builtin(),
        }
    }
}

impl EngineConfig {
    /// Parses and validates a YAML document.
    pub fn from_yaml_str(yaml: &str) -> EditResult<Self> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Serializes to YAML.
    pub fn to_yaml_string(&self) -> EditResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> EditResult<()> {
        if self.max_history == 0 {
            return Err(EditError::Config("max_history must be at least 1".into()));
        }
        check_settings("default_settings", &self.default_settings)?;
        for tool in self.catalog.iter() {
            if let Some(defaults) = &tool.defaults {
                check_settings(&format!("tool '{}'", tool.id), defaults)?;
            }
        }
        Ok(())
    }
}

fn check_settings(owner: &str, s: &ToolSettings) -> EditResult<()> {
    let fail = |msg: String| Err(EditError::Config(format!("{owner}: {msg}")));
    if !(0.0..=100.0).contains(&s.intensity) {
        return fail(format!("intensity {} outside 0..=100", s.intensity));
    }
    if !s.brush_size.is_finite() || s.brush_size <= 0.0 {
        return fail(format!("brush_size {} must be > 0", s.brush_size));
    }
    if !(0.0..=100.0).contains(&s.feather) {
        return fail(format!("feather {} outside 0..=100", s.feather));
    }
    if s.undo_levels == Some(0) {
        return fail("undo_levels must be at least 1".into());
    }
    Ok(())
}
