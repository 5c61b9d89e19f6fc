//! # remold-edit
//!
//! Edit layer of remold: turns tool applications into undoable operations.
//!
//! - [`ToolCatalog`] - tool ids resolved to closed [`EditMode`]s
//! - [`EditRegion`] / [`ToolSettings`] - stroke geometry and parameters
//! - [`dispatch`] - region dispatcher, double-buffered, `Idle → Applying → Committed | Failed`
//! - [`EditHistory`] - bounded linear undo/redo with full snapshots
//! - [`EditSession`] - baseline + canonical buffer + history
//! - [`EditEngine`] - session registry, the public entry point
//! - [`EngineConfig`] - YAML configuration
//!
//! # Example
//!
//! ```rust
//! use remold_core::{Point2D, RasterBuffer};
//! use remold_edit::{EditEngine, EditRegion, ToolSettings};
//!
//! let mut engine = EditEngine::default();
//! let id = engine.create_session_from_buffer(RasterBuffer::filled(100, 100, [255, 0, 0, 255]).unwrap());
//!
//! let settings = ToolSettings { intensity: 50.0, brush_size: 30.0, feather: 0.0, ..Default::default() };
//! let region = EditRegion::from_settings("eye", vec![Point2D::new(50.0, 50.0)], &settings);
//! engine.apply_tool(id, "eye-enlarge", vec![region], settings).unwrap();
//!
//! let history = engine.history(id).unwrap();
//! assert_eq!(history.len(), 1);
//! assert_eq!(history.current_index(), 0);
//! ```
//!
//! # Dependencies
//!
//! - `remold-ops` - kernels
//! - `remold-io` - export
//! - [`serde`] / [`serde_yaml`] - catalog and configuration
//! - [`tracing`] - commit, eviction and dispatch logging

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod catalog;
pub mod config;
pub mod dispatch;
pub mod effect;
pub mod engine;
mod error;
pub mod history;
pub mod session;
pub mod settings;

pub use catalog::{EditMode, PinchDirection, SculptDirection, ToolCatalog, ToolDefinition, WarpAxis};
pub use config::EngineConfig;
pub use dispatch::{DispatchState, Dispatcher};
pub use effect::{Effect, MeshEdit};
pub use engine::EditEngine;
pub use error::{EditError, EditResult};
pub use history::{EditHistory, EditOperation, Snapshot};
pub use session::{EditSession, OperationResult, SessionId};
pub use settings::{EditRegion, ToolSettings};
