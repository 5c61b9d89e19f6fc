//! Tool catalog: tool ids resolved to closed edit modes.
//!
//! Every tool id maps to exactly one [`EditMode`]. The mode carries its own
//! sign or axis, so the dispatcher never inspects tool names. Catalogs are
//! validated once when built or deserialized; ids are unique.
//!
//! # YAML
//!
//! ```yaml
//! - id: eye-enlarge
//!   name: Eye Enlarge
//!   mode: pinch
//!   direction: enlarge
//! - id: brighten
//!   name: Brighten
//!   mode: brush
//!   tone: 1.0
//!   defaults:
//!     intensity: 30
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::settings::ToolSettings;
use crate::{EditError, EditResult};

/// Pinch direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PinchDirection {
    /// Magnify around the centre.
    Enlarge,
    /// Contract toward the centre.
    Shrink,
}

/// Axis bias of a directional warp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarpAxis {
    /// Doubles the horizontal component.
    Horizontal,
    /// Doubles the vertical component.
    Vertical,
    /// No bias.
    Free,
}

/// Sculpt direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SculptDirection {
    /// Push content outward (enhance, lift).
    Lift,
    /// Pull content inward (slim, tighten).
    Flatten,
}

/// Closed set of edit modes a tool can dispatch to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum EditMode {
    /// Radial magnify or contract at every stroke point.
    Pinch {
        /// Sign of the effect.
        direction: PinchDirection,
    },
    /// Directional push along the stroke, first to last point.
    Warp {
        /// Axis bias.
        axis: WarpAxis,
    },
    /// Radial sculpt at every stroke point.
    Sculpt {
        /// Sign of the effect.
        direction: SculptDirection,
    },
    /// Colour offset brush; `tone` in [-1, 1] scales the per-channel step.
    Brush {
        /// Signed tone factor.
        tone: f64,
    },
    /// Gaussian smoothing brush.
    Smooth,
    /// Push along a Catmull-Rom path through the stroke.
    Curve,
    /// Flip the left half of the stroke box onto the right half.
    Mirror,
    /// Push along each stroke segment.
    Drag,
}

impl EditMode {
    /// Short lowercase name, as used in YAML.
    pub fn name(&self) -> &'static str {
        match self {
            EditMode::Pinch { .. } => "pinch",
            EditMode::Warp { .. } => "warp",
            EditMode::Sculpt { .. } => "sculpt",
            EditMode::Brush { .. } => "brush",
            EditMode::Smooth => "smooth",
            EditMode::Curve => "curve",
            EditMode::Mirror => "mirror",
            EditMode::Drag => "drag",
        }
    }

    /// Modes that move pixels and get the feather blur pass.
    pub fn is_displacement(&self) -> bool {
        matches!(
            self,
            EditMode::Pinch { .. } | EditMode::Warp { .. } | EditMode::Sculpt { .. } | EditMode::Curve | EditMode::Drag
        )
    }
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique tool id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Resolved edit mode.
    #[serde(flatten)]
    pub mode: EditMode,
    /// Settings used when the caller supplies none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<ToolSettings>,
}

impl ToolDefinition {
    /// Definition without default settings.
    pub fn new(id: impl Into<String>, name: impl Into<String>, mode: EditMode) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            mode,
            defaults: None,
        }
    }
}

/// Tool id to definition map with stable listing order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ToolDefinition>", into = "Vec<ToolDefinition>")]
pub struct ToolCatalog {
    tools: Vec<ToolDefinition>,
    index: HashMap<String, usize>,
}

impl ToolCatalog {
    /// Builds a catalog, rejecting duplicate or empty ids.
    pub fn new(tools: Vec<ToolDefinition>) -> EditResult<Self> {
        let mut index = HashMap::with_capacity(tools.len());
        for (i, tool) in tools.iter().enumerate() {
            if tool.id.is_empty() {
                return Err(EditError::Config(format!("tool #{i} has an empty id")));
            }
            if index.insert(tool.id.clone(), i).is_some() {
                return Err(EditError::Config(format!("duplicate tool id '{}'", tool.id)));
            }
        }
        Ok(Self { tools, index })
    }

    /// The tools shipped with the engine.
    pub fn builtin() -> Self {
        use EditMode::*;

        let tools = [
            ("eye-enlarge", "Eye Enlarge", Pinch { direction: PinchDirection::Enlarge }),
            ("nose-shrink", "Nose Shrink", Pinch { direction: PinchDirection::Shrink }),
            ("height-increase", "Height Increase", Warp { axis: WarpAxis::Vertical }),
            ("width-adjust", "Width Adjust", Warp { axis: WarpAxis::Horizontal }),
            ("body-warp", "Body Warp", Warp { axis: WarpAxis::Free }),
            ("face-slim", "Face Slim", Sculpt { direction: SculptDirection::Flatten }),
            ("waist-tighten", "Waist Tighten", Sculpt { direction: SculptDirection::Flatten }),
            ("cheek-lift", "Cheek Lift", Sculpt { direction: SculptDirection::Lift }),
            ("lip-enhance", "Lip Enhance", Sculpt { direction: SculptDirection::Lift }),
            ("brighten", "Brighten", Brush { tone: 1.0 }),
            ("darken", "Darken", Brush { tone: -1.0 }),
            ("skin-smooth", "Skin Smooth", Smooth),
            ("contour-curve", "Contour Curve", Curve),
            ("mirror", "Mirror", Mirror),
            ("liquify-drag", "Liquify Drag", Drag),
        ];

        let tools: Vec<_> = tools
            .into_iter()
            .map(|(id, name, mode)| ToolDefinition::new(id, name, mode))
            .collect();
        let index = tools.iter().enumerate().map(|(i, t)| (t.id.clone(), i)).collect();
        Self { tools, index }
    }

    /// Parses a YAML list of tool definitions.
    pub fn from_yaml_str(yaml: &str) -> EditResult<Self> {
        let tools: Vec<ToolDefinition> = serde_yaml::from_str(yaml)?;
        Self::new(tools)
    }

    /// Looks up a tool.
    pub fn get(&self, id: &str) -> Option<&ToolDefinition> {
        self.index.get(id).map(|&i| &self.tools[i])
    }

    /// Looks up a tool, failing with [`EditError::UnsupportedTool`].
    pub fn resolve(&self, id: &str) -> EditResult<&ToolDefinition> {
        self.get(id).ok_or_else(|| EditError::UnsupportedTool(id.to_string()))
    }

    /// Tools in definition order.
    pub fn iter(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.iter()
    }

    /// Number of tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TryFrom<Vec<ToolDefinition>> for ToolCatalog {
    type Error = EditError;

    fn try_from(tools: Vec<ToolDefinition>) -> EditResult<Self> {
        Self::new(tools)
    }
}

impl From<ToolCatalog> for Vec<ToolDefinition> {
    fn from(catalog: ToolCatalog) -> Self {
        catalog.tools
    }
}
