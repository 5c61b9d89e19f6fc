//! The engine: a registry of edit sessions behind [`SessionId`] handles.
//!
//! All mutating calls take `&mut self`, so one application runs to
//! completion before the next starts. Read access (buffers, history,
//! export) takes `&self`.
//!
//! # Example
//!
//! ```rust
//! use remold_core::Point2D;
//! use remold_edit::{EditEngine, EditRegion};
//!
//! let mut engine = EditEngine::default();
//! let id = engine.create_session(vec![200; 64 * 64 * 4], 64, 64).unwrap();
//!
//! let settings = engine.settings_for("eye-enlarge").unwrap();
//! let region = EditRegion::from_settings("eye", vec![Point2D::new(32.0, 32.0)], &settings);
//! let result = engine.apply_tool(id, "eye-enlarge", vec![region], settings).unwrap();
//! assert!(result.committed);
//!
//! assert!(engine.undo(id).unwrap());
//! assert!(engine.close_session(id));
//! ```

use std::collections::HashMap;

use remold_core::RasterBuffer;
use remold_io::{ExportOptions, ExportedImage};
use tracing::{debug, trace};

use crate::catalog::ToolCatalog;
use crate::config::EngineConfig;
use crate::effect::Effect;
use crate::history::EditHistory;
use crate::session::{EditSession, OperationResult, SessionId};
use crate::settings::{EditRegion, ToolSettings};
use crate::{EditError, EditResult};

/// Owns every open session.
#[derive(Debug, Default)]
pub struct EditEngine {
    config: EngineConfig,
    sessions: HashMap<SessionId, EditSession>,
    next_id: u64,
}

impl EditEngine {
    /// Engine with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            sessions: HashMap::new(),
            next_id: 0,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Tool catalog.
    pub fn catalog(&self) -> &ToolCatalog {
        &self.config.catalog
    }

    /// Settings to use for `tool_id` when the caller has none: the tool's
    /// own defaults, else the engine defaults.
    pub fn settings_for(&self, tool_id: &str) -> EditResult<ToolSettings> {
        let tool = self.config.catalog.resolve(tool_id)?;
        Ok(tool.defaults.clone().unwrap_or_else(|| self.config.default_settings.clone()))
    }

    /// Opens a session on raw RGBA8 bytes.
    pub fn create_session(&mut self, bytes: Vec<u8>, width: u32, height: u32) -> EditResult<SessionId> {
        let buffer = RasterBuffer::from_raw(width, height, bytes)?;
        Ok(self.create_session_from_buffer(buffer))
    }

    /// Opens a session on an existing buffer.
    pub fn create_session_from_buffer(&mut self, buffer: RasterBuffer) -> SessionId {
        self.next_id += 1;
        let id = SessionId(self.next_id);
        debug!(session = %id, width = buffer.width(), height = buffer.height(), "session created");
        self.sessions.insert(id, EditSession::new(id, buffer, self.config.max_history));
        id
    }

    /// Drops a session. Returns `false` if it did not exist.
    pub fn close_session(&mut self, id: SessionId) -> bool {
        let closed = self.sessions.remove(&id).is_some();
        if closed {
            debug!(session = %id, "session closed");
        }
        closed
    }

    /// Number of open sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Looks up a session.
    pub fn session(&self, id: SessionId) -> EditResult<&EditSession> {
        self.sessions
            .get(&id)
            .ok_or_else(|| EditError::InvalidState(format!("no active session {id}")))
    }

    fn session_mut(&mut self, id: SessionId) -> EditResult<&mut EditSession> {
        self.sessions
            .get_mut(&id)
            .ok_or_else(|| EditError::InvalidState(format!("no active session {id}")))
    }

    /// Applies a catalog tool to the canonical buffer and records it.
    ///
    /// # Errors
    ///
    /// - [`EditError::InvalidState`] for an unknown session or empty `regions`
    /// - [`EditError::UnsupportedTool`] for a tool id missing from the catalog
    /// - [`EditError::InvalidRegion`] for malformed regions
    pub fn apply_tool(
        &mut self,
        id: SessionId,
        tool_id: &str,
        regions: Vec<EditRegion>,
        settings: ToolSettings,
    ) -> EditResult<OperationResult> {
        let session = self
            .sessions
            .get_mut(&id)
            .ok_or_else(|| EditError::InvalidState(format!("no active session {id}")))?;
        if regions.is_empty() {
            return Err(EditError::InvalidState("no regions to apply".into()));
        }
        let mode = self.config.catalog.resolve(tool_id)?.mode;
        trace!(session = %id, tool = tool_id, mode = mode.name(), "apply_tool");
        session.apply(tool_id, &mode, regions, settings)
    }

    /// Renders a tool application without committing it.
    pub fn preview_tool(
        &self,
        id: SessionId,
        tool_id: &str,
        regions: &[EditRegion],
        settings: &ToolSettings,
    ) -> EditResult<RasterBuffer> {
        let session = self.session(id)?;
        if regions.is_empty() {
            return Err(EditError::InvalidState("no regions to preview".into()));
        }
        let mode = self.config.catalog.resolve(tool_id)?.mode;
        session.preview(&mode, regions, settings)
    }

    /// Applies a whole-image effect.
    pub fn apply_effect(&mut self, id: SessionId, effect: &Effect) -> EditResult<OperationResult> {
        self.session_mut(id)?.apply_effect(effect)
    }

    /// Canonical buffer of a session.
    pub fn canonical_buffer(&self, id: SessionId) -> EditResult<&RasterBuffer> {
        Ok(self.session(id)?.current())
    }

    /// Baseline buffer of a session.
    pub fn original_buffer(&self, id: SessionId) -> EditResult<&RasterBuffer> {
        Ok(self.session(id)?.original())
    }

    /// Undoes one operation; `Ok(false)` when there is nothing to undo.
    pub fn undo(&mut self, id: SessionId) -> EditResult<bool> {
        self.session_mut(id)?.undo()
    }

    /// Redoes one operation; `Ok(false)` when there is nothing to redo.
    pub fn redo(&mut self, id: SessionId) -> EditResult<bool> {
        self.session_mut(id)?.redo()
    }

    /// Restores the baseline as an undoable operation.
    pub fn reset_to_original(&mut self, id: SessionId) -> EditResult<OperationResult> {
        self.session_mut(id)?.reset_to_original()
    }

    /// History of a session.
    pub fn history(&self, id: SessionId) -> EditResult<&EditHistory> {
        Ok(self.session(id)?.history())
    }

    /// Clears the unsaved-changes flag of a session.
    pub fn mark_saved(&mut self, id: SessionId) -> EditResult<()> {
        self.session_mut(id)?.mark_saved();
        Ok(())
    }

    /// Encodes the canonical buffer of a session.
    pub fn export_image(&self, id: SessionId, options: &ExportOptions) -> EditResult<ExportedImage> {
        self.session(id)?.export(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use remold_core::Point2D;
    use remold_io::ExportFormat;

    fn engine_with_session() -> (EditEngine, SessionId) {
        let mut engine = EditEngine::default();
        let mut bytes = Vec::with_capacity(32 * 32 * 4);
        for i in 0..32 * 32 {
            bytes.extend_from_slice(&[(i % 251) as u8, 90, 200, 255]);
        }
        let id = engine.create_session(bytes, 32, 32).unwrap();
        (engine, id)
    }

    fn regions(engine: &EditEngine, tool: &str) -> (Vec<EditRegion>, ToolSettings) {
        let settings = engine.settings_for(tool).unwrap();
        let r = EditRegion::from_settings("r", vec![Point2D::new(16.0, 16.0), Point2D::new(20.0, 18.0)], &settings);
        (vec![r], settings)
    }

    #[test]
    fn test_create_session_validates_length() {
        let mut engine = EditEngine::default();
        assert!(matches!(engine.create_session(vec![0; 10], 4, 4), Err(EditError::Core(_))));
        assert!(engine.create_session(vec![0; 64], 4, 4).is_ok());
        assert_eq!(engine.session_count(), 1);
    }

    #[test]
    fn test_error_order() {
        let (mut engine, id) = engine_with_session();
        let (r, s) = regions(&engine, "face-slim");

        let missing = SessionId(999);
        let err = engine.apply_tool(missing, "nope", r.clone(), s.clone()).unwrap_err();
        assert!(matches!(err, EditError::InvalidState(_)));

        let err = engine.apply_tool(id, "nope", Vec::new(), s.clone()).unwrap_err();
        assert!(matches!(err, EditError::InvalidState(_)));

        let err = engine.apply_tool(id, "nope", r, s).unwrap_err();
        assert!(matches!(err, EditError::UnsupportedTool(_)));
    }

    #[test]
    fn test_apply_undo_redo() {
        let (mut engine, id) = engine_with_session();
        let (r, s) = regions(&engine, "liquify-drag");
        let res = engine.apply_tool(id, "liquify-drag", r, s).unwrap();
        assert!(res.committed);
        let edited = engine.canonical_buffer(id).unwrap().clone();
        assert!(edited != *engine.original_buffer(id).unwrap());

        assert!(engine.undo(id).unwrap());
        assert!(engine.canonical_buffer(id).unwrap() == engine.original_buffer(id).unwrap());
        assert!(engine.redo(id).unwrap());
        assert!(*engine.canonical_buffer(id).unwrap() == edited);
    }

    #[test]
    fn test_settings_for() {
        let engine = EditEngine::new(EngineConfig::from_yaml_str(include_str!("../config/default.yaml")).unwrap());
        assert_eq!(engine.settings_for("eye-enlarge").unwrap().brush_size, 25.0);
        assert_eq!(engine.settings_for("mirror").unwrap().feather, 20.0);
        assert!(engine.settings_for("x").is_err());
    }

    #[test]
    fn test_mark_saved_and_export() {
        let (mut engine, id) = engine_with_session();
        let (r, s) = regions(&engine, "brighten");
        engine.apply_tool(id, "brighten", r, s).unwrap();
        assert!(engine.history(id).unwrap().has_unsaved_changes());
        engine.mark_saved(id).unwrap();
        assert!(!engine.history(id).unwrap().has_unsaved_changes());

        let before = engine.canonical_buffer(id).unwrap().clone();
        let options = ExportOptions { format: ExportFormat::Png, ..Default::default() };
        let image = engine.export_image(id, &options).unwrap();
        assert_eq!((image.width, image.height), (32, 32));
        assert!(*engine.canonical_buffer(id).unwrap() == before);
    }

    #[test]
    fn test_close_session() {
        let (mut engine, id) = engine_with_session();
        assert!(engine.close_session(id));
        assert!(!engine.close_session(id));
        assert!(matches!(engine.undo(id), Err(EditError::InvalidState(_))));
    }

    #[test]
    fn test_preview_tool() {
        let (engine, id) = engine_with_session();
        let (r, s) = regions(&engine, "skin-smooth");
        let preview = engine.preview_tool(id, "skin-smooth", &r, &s).unwrap();
        assert_eq!(preview.width(), 32);
        assert!(engine.history(id).unwrap().is_empty());
    }
}
