//! Bounded linear undo history with full-buffer snapshots.
//!
//! ```text
//! operations:  [op0] [op1] [op2] [op3]
//!                            ^ current_index = 2
//! undo  -> restore op2.before, index 1
//! redo  -> restore op3.after,  index 3
//! push  -> drop op3, append, evict oldest while len > max_history
//! ```
//!
//! Snapshots hold their own immutable bytes behind an `Arc`, so a snapshot
//! shared between two neighbouring operations is stored once and can never
//! observe later edits of the canonical buffer.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::SystemTime;

use remold_core::RasterBuffer;
use tracing::{debug, trace};

use crate::settings::{EditRegion, ToolSettings};
use crate::EditResult;

/// Default history cap.
pub const DEFAULT_MAX_HISTORY: usize = 50;

/// Immutable full copy of a raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    width: u32,
    height: u32,
    data: Arc<[u8]>,
}

impl Snapshot {
    /// Copies `buffer`.
    pub fn capture(buffer: &RasterBuffer) -> Self {
        Self {
            width: buffer.width(),
            height: buffer.height(),
            data: Arc::from(buffer.as_bytes()),
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Whether the snapshot matches `buffer` byte for byte.
    pub fn matches(&self, buffer: &RasterBuffer) -> bool {
        self.width == buffer.width() && self.height == buffer.height() && *self.data == *buffer.as_bytes()
    }

    /// Decodes into a fresh buffer.
    pub fn to_buffer(&self) -> EditResult<RasterBuffer> {
        Ok(RasterBuffer::from_raw(self.width, self.height, self.data.to_vec())?)
    }

    /// Overwrites `target` with the snapshot; dimensions must agree.
    pub fn restore_into(&self, target: &mut RasterBuffer) -> EditResult<()> {
        if (self.width, self.height) != (target.width(), target.height()) {
            return Err(remold_core::Error::dimension_mismatch(
                (self.width, self.height),
                (target.width(), target.height()),
            )
            .into());
        }
        target.as_bytes_mut().copy_from_slice(&self.data);
        Ok(())
    }

    /// Size of the stored pixels in bytes.
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }
}

/// One committed tool application.
#[derive(Debug, Clone)]
pub struct EditOperation {
    /// Session-unique, increasing id.
    pub id: u64,
    /// Tool that produced it (`effect:<name>` for effects, `reset` for resets).
    pub tool_id: String,
    /// Commit time.
    pub timestamp: SystemTime,
    /// Regions as supplied by the caller.
    pub regions: Vec<EditRegion>,
    /// Canonical buffer before the operation.
    pub before: Snapshot,
    /// Canonical buffer after the operation.
    pub after: Snapshot,
    /// Settings the tool ran with.
    pub parameters: ToolSettings,
}

/// Linear undo/redo stack capped at `max_history` operations.
#[derive(Debug, Clone)]
pub struct EditHistory {
    operations: VecDeque<EditOperation>,
    current_index: isize,
    max_history: usize,
    has_unsaved_changes: bool,
    next_id: u64,
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}

impl EditHistory {
    /// Empty history. A cap of 0 is raised to 1.
    pub fn new(max_history: usize) -> Self {
        let max_history = max_history.max(1);
        Self {
            operations: VecDeque::with_capacity(max_history.min(64)),
            current_index: -1,
            max_history,
            has_unsaved_changes: false,
            next_id: 1,
        }
    }

    /// Operations, oldest first.
    pub fn operations(&self) -> &VecDeque<EditOperation> {
        &self.operations
    }

    /// Number of stored operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Index of the last applied operation, -1 when at the start.
    pub fn current_index(&self) -> isize {
        self.current_index
    }

    /// Last applied operation.
    pub fn current(&self) -> Option<&EditOperation> {
        usize::try_from(self.current_index).ok().and_then(|i| self.operations.get(i))
    }

    /// Cap on stored operations.
    pub fn max_history(&self) -> usize {
        self.max_history
    }

    /// Whether anything changed since the last [`mark_saved`](Self::mark_saved).
    pub fn has_unsaved_changes(&self) -> bool {
        self.has_unsaved_changes
    }

    /// Clears the unsaved flag.
    pub fn mark_saved(&mut self) {
        self.has_unsaved_changes = false;
    }

    /// Whether [`undo`](Self::undo) would do something.
    pub fn can_undo(&self) -> bool {
        self.current_index >= 0
    }

    /// Whether [`redo`](Self::redo) would do something.
    pub fn can_redo(&self) -> bool {
        self.current_index + 1 < self.operations.len() as isize
    }

    /// Hands out the id for the next operation.
    pub fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Snapshot equal to the state the history is positioned at, reusing
    /// stored bytes when `canonical` still matches them.
    pub fn snapshot_of(&self, canonical: &RasterBuffer) -> Snapshot {
        let stored = match self.current() {
            Some(op) => Some(&op.after),
            None => self.operations.front().map(|op| &op.before),
        };
        match stored {
            Some(snap) if snap.matches(canonical) => snap.clone(),
            _ => Snapshot::capture(canonical),
        }
    }

    /// Appends `op` after the current position.
    ///
    /// Drops the redo branch, then evicts the oldest operations while over
    /// the cap. Returns the number of evicted operations.
    pub fn push(&mut self, op: EditOperation) -> usize {
        let keep = (self.current_index + 1) as usize;
        if keep < self.operations.len() {
            debug!(dropped = self.operations.len() - keep, "discarding redo branch");
            self.operations.truncate(keep);
        }

        self.operations.push_back(op);
        self.current_index = self.operations.len() as isize - 1;
        self.has_unsaved_changes = true;

        self.evict_oldest()
    }

    /// Steps back. Returns the operation whose `before` should be restored.
    pub fn undo(&mut self) -> Option<&EditOperation> {
        if !self.can_undo() {
            return None;
        }
        let i = self.current_index as usize;
        self.current_index -= 1;
        self.has_unsaved_changes = true;
        self.operations.get(i)
    }

    /// Steps forward. Returns the operation whose `after` should be restored.
    pub fn redo(&mut self) -> Option<&EditOperation> {
        if !self.can_redo() {
            return None;
        }
        self.current_index += 1;
        self.has_unsaved_changes = true;
        self.operations.get(self.current_index as usize)
    }

    /// Changes the cap. Redo entries go first, then the oldest entries.
    /// Returns the number of dropped operations.
    pub fn set_max_history(&mut self, max_history: usize) -> usize {
        let max_history = max_history.max(1);
        if max_history == self.max_history {
            return 0;
        }
        debug!(from = self.max_history, to = max_history, "history cap changed");
        self.max_history = max_history;

        let mut dropped = 0;
        while self.operations.len() > max_history && self.can_redo() {
            self.operations.pop_back();
            dropped += 1;
        }
        dropped + self.evict_oldest()
    }

    /// Drops every operation.
    pub fn clear(&mut self) {
        self.operations.clear();
        self.current_index = -1;
    }

    fn evict_oldest(&mut self) -> usize {
        let mut evicted = 0;
        while self.operations.len() > self.max_history {
            if let Some(old) = self.operations.pop_front() {
                trace!(id = old.id, tool = %old.tool_id, "evicted oldest operation");
            }
            self.current_index -= 1;
            evicted += 1;
        }
        if evicted > 0 {
            debug!(evicted, max = self.max_history, "history over cap");
        }
        evicted
    }
}
