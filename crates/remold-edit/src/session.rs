//! Edit session: baseline, canonical buffer and history of one image.
//!
//! The session owns both rasters. Every mutation goes through a scratch
//! buffer produced by the dispatcher or an effect; on success the scratch
//! replaces the canonical buffer and an [`EditOperation`] is recorded.

use std::fmt;
use std::time::SystemTime;

use remold_core::{RasterBuffer, Rect};
use remold_io::{ExportOptions, ExportedImage};
use tracing::debug;

use crate::catalog::EditMode;
use crate::dispatch::{render, DispatchState, Dispatcher};
use crate::effect::Effect;
use crate::history::{EditHistory, EditOperation, Snapshot};
use crate::settings::{EditRegion, ToolSettings};
use crate::EditResult;

/// Tool id recorded for [`EditSession::reset_to_original`].
pub const RESET_TOOL_ID: &str = "reset";

/// Opaque session handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub(crate) u64);

impl SessionId {
    /// Numeric value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// What a tool or effect application did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationResult {
    /// Whether an operation was added to history.
    pub committed: bool,
    /// Id of the new operation.
    pub operation_id: Option<u64>,
    /// Box the kernels wrote, `None` when nothing was touched.
    pub affected: Option<Rect>,
    /// Pixels whose value changed.
    pub affected_pixels: u64,
}

impl OperationResult {
    /// Result of an application that touched nothing.
    pub fn noop() -> Self {
        Self {
            committed: false,
            operation_id: None,
            affected: None,
            affected_pixels: 0,
        }
    }
}

/// Bounding box and count of pixels that differ between two equal-size buffers.
pub fn changed_pixels(a: &RasterBuffer, b: &RasterBuffer) -> (Option<Rect>, u64) {
    let mut bounds: Option<Rect> = None;
    let mut count = 0u64;
    for y in 0..a.height() {
        let (ra, rb) = (a.row(y), b.row(y));
        if ra == rb {
            continue;
        }
        for (x, (pa, pb)) in ra.chunks_exact(4).zip(rb.chunks_exact(4)).enumerate() {
            if pa != pb {
                count += 1;
                let px = Rect::new(x as u32, y, 1, 1);
                bounds = Some(bounds.map_or(px, |r| r.union(&px)));
            }
        }
    }
    (bounds, count)
}

/// One loaded image and its edit history.
#[derive(Debug)]
pub struct EditSession {
    id: SessionId,
    original: RasterBuffer,
    current: RasterBuffer,
    created_at: SystemTime,
    last_modified: SystemTime,
    history: EditHistory,
    dispatcher: Dispatcher,
}

impl EditSession {
    /// Starts a session on `buffer`, which becomes both baseline and canonical.
    pub fn new(id: SessionId, buffer: RasterBuffer, max_history: usize) -> Self {
        let now = SystemTime::now();
        Self {
            id,
            original: buffer.clone(),
            current: buffer,
            created_at: now,
            last_modified: now,
            history: EditHistory::new(max_history),
            dispatcher: Dispatcher::new(),
        }
    }

    /// Session handle.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Raster width.
    pub fn width(&self) -> u32 {
        self.current.width()
    }

    /// Raster height.
    pub fn height(&self) -> u32 {
        self.current.height()
    }

    /// Immutable baseline.
    pub fn original(&self) -> &RasterBuffer {
        &self.original
    }

    /// Canonical buffer.
    pub fn current(&self) -> &RasterBuffer {
        &self.current
    }

    /// Creation time.
    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }

    /// Time of the last commit, undo or redo.
    pub fn last_modified(&self) -> SystemTime {
        self.last_modified
    }

    /// Undo history.
    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    /// State of the last tool application.
    pub fn dispatch_state(&self) -> DispatchState {
        self.dispatcher.state()
    }

    /// Applies a tool mode and commits the result.
    ///
    /// Regions that miss the raster leave everything untouched and return
    /// [`OperationResult::noop`].
    pub fn apply(
        &mut self,
        tool_id: &str,
        mode: &EditMode,
        regions: Vec<EditRegion>,
        settings: ToolSettings,
    ) -> EditResult<OperationResult> {
        let outcome = self.dispatcher.apply(&self.current, mode, &regions, &settings)?;
        let Some(affected) = outcome.affected else {
            debug!(session = %self.id, tool = tool_id, "regions outside raster, nothing to commit");
            return Ok(OperationResult::noop());
        };
        let (_, affected_pixels) = changed_pixels(&self.current, &outcome.buffer);
        let id = self.commit(tool_id, regions, settings, outcome.buffer);
        Ok(OperationResult {
            committed: true,
            operation_id: Some(id),
            affected: Some(affected),
            affected_pixels,
        })
    }

    /// Renders a tool application without committing it.
    pub fn preview(&self, mode: &EditMode, regions: &[EditRegion], settings: &ToolSettings) -> EditResult<RasterBuffer> {
        Ok(render(&self.current, mode, regions, settings)?.buffer)
    }

    /// Applies a whole-image effect. Nothing is committed when the effect
    /// leaves every pixel as it was.
    pub fn apply_effect(&mut self, effect: &Effect) -> EditResult<OperationResult> {
        let out = effect.render(&self.current)?;
        self.commit_if_changed(&effect.tool_id(), out)
    }

    /// Restores the baseline as a new, undoable operation.
    pub fn reset_to_original(&mut self) -> EditResult<OperationResult> {
        let baseline = self.original.clone();
        self.commit_if_changed(RESET_TOOL_ID, baseline)
    }

    /// Steps back one operation. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> EditResult<bool> {
        let Some(op) = self.history.undo() else {
            return Ok(false);
        };
        debug!(session = %self.id, id = op.id, tool = %op.tool_id, "undo");
        op.before.restore_into(&mut self.current)?;
        self.last_modified = SystemTime::now();
        Ok(true)
    }

    /// Re-applies the next operation. Returns `false` when there is nothing to redo.
    pub fn redo(&mut self) -> EditResult<bool> {
        let Some(op) = self.history.redo() else {
            return Ok(false);
        };
        debug!(session = %self.id, id = op.id, tool = %op.tool_id, "redo");
        op.after.restore_into(&mut self.current)?;
        self.last_modified = SystemTime::now();
        Ok(true)
    }

    /// Clears the unsaved-changes flag.
    pub fn mark_saved(&mut self) {
        self.history.mark_saved();
    }

    /// Encodes the canonical buffer.
    pub fn export(&self, options: &ExportOptions) -> EditResult<ExportedImage> {
        Ok(remold_io::export(&self.current, options)?)
    }

    fn commit_if_changed(&mut self, tool_id: &str, buffer: RasterBuffer) -> EditResult<OperationResult> {
        let (affected, affected_pixels) = changed_pixels(&self.current, &buffer);
        if affected_pixels == 0 {
            debug!(session = %self.id, tool = tool_id, "no pixel changed, nothing to commit");
            return Ok(OperationResult::noop());
        }
        let id = self.commit(tool_id, Vec::new(), ToolSettings::default(), buffer);
        Ok(OperationResult {
            committed: true,
            operation_id: Some(id),
            affected,
            affected_pixels,
        })
    }

    /// Swaps `buffer` in and records the operation. Returns its id.
    fn commit(&mut self, tool_id: &str, regions: Vec<EditRegion>, parameters: ToolSettings, buffer: RasterBuffer) -> u64 {
        if let Some(levels) = parameters.undo_levels.filter(|&n| n != self.history.max_history()) {
            self.history.set_max_history(levels);
        }

        let before = self.history.snapshot_of(&self.current);
        let after = Snapshot::capture(&buffer);
        self.current = buffer;

        let id = self.history.allocate_id();
        let now = SystemTime::now();
        let evicted = self.history.push(EditOperation {
            id,
            tool_id: tool_id.to_string(),
            timestamp: now,
            regions,
            before,
            after,
            parameters,
        });
        self.last_modified = now;
        debug!(
            session = %self.id,
            id,
            tool = tool_id,
            index = self.history.current_index(),
            evicted,
            "committed operation"
        );
        id
    }
}
