//! Undo/Redo history for a raster canvas.
//!
//! Every discrete edit (one stroke, one fill, one paste) is preceded by a
//! full snapshot of the surface, pushed onto the undo stack. Undo swaps the
//! surface with the top snapshot and parks the current pixels on the redo
//! stack; redo does the reverse.
//!
//! Pointer gestures use **snapshot batching**: the surface is captured once
//! when the gesture begins and pushed once when it ends, so a stroke made
//! of hundreds of pointer moves is a single undo step.

use sk_core::{CanvasBuffer, CanvasError, PersistedState, Result, Snapshot, Surface};
use std::collections::VecDeque;

/// Default maximum undo depth.
pub const DEFAULT_MAX_DEPTH: usize = 200;

/// Manages the undo/redo snapshot stacks and gesture batching.
///
/// The surface is not owned here; each operation borrows it, so the
/// manager can be exercised against a bare [`CanvasBuffer`].
pub struct HistoryManager {
    /// Oldest first. Evicted from the front when full.
    undo_stack: VecDeque<Snapshot>,
    redo_stack: Vec<Snapshot>,
    /// Maximum undo depth.
    max_depth: usize,
    /// Gesture nesting depth (0 = no gesture open).
    batch_depth: usize,
    /// Surface captured when the outermost gesture began.
    batch_snapshot: Option<Snapshot>,
    /// Whether any edit was recorded during the current gesture.
    batch_dirty: bool,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl HistoryManager {
    /// `max_depth` is clamped to at least 1.
    pub fn new(max_depth: usize) -> Self {
        let max_depth = max_depth.max(1);
        Self {
            undo_stack: VecDeque::with_capacity(max_depth.min(64)),
            redo_stack: Vec::new(),
            max_depth,
            batch_depth: 0,
            batch_snapshot: None,
            batch_dirty: false,
        }
    }

    // ─── Gestures ────────────────────────────────────────────────────────

    /// Open a gesture. The outermost call captures the surface; every edit
    /// until the matching `end_gesture()` becomes one undo step.
    pub fn begin_gesture(&mut self, surface: &impl Surface) {
        if self.batch_depth == 0 {
            self.batch_snapshot = Some(surface.capture_snapshot());
            self.batch_dirty = false;
        }
        self.batch_depth += 1;
    }

    /// Close a gesture. When the outermost gesture closes, push its
    /// pre-gesture snapshot if an edit was recorded and the pixels actually
    /// changed. Returns whether an undo entry was pushed.
    pub fn end_gesture(&mut self, surface: &impl Surface) -> bool {
        if self.batch_depth == 0 {
            return false;
        }
        self.batch_depth -= 1;
        if self.batch_depth > 0 {
            return false;
        }

        let dirty = std::mem::take(&mut self.batch_dirty);
        let Some(before) = self.batch_snapshot.take() else {
            return false;
        };
        if !dirty || before == surface.capture_snapshot() {
            log::trace!("history: gesture closed without changes");
            return false;
        }
        self.commit(before);
        true
    }

    /// Abandon the open gesture entirely. If it had recorded edits the
    /// surface is rolled back to its pre-gesture pixels. Returns whether a
    /// rollback happened.
    pub fn cancel_gesture(&mut self, surface: &mut impl Surface) -> bool {
        if self.batch_depth == 0 {
            return false;
        }
        self.batch_depth = 0;
        let dirty = std::mem::take(&mut self.batch_dirty);
        match self.batch_snapshot.take() {
            Some(before) if dirty => match surface.restore(&before) {
                Ok(()) => {
                    log::debug!("history: gesture cancelled, surface rolled back");
                    true
                }
                Err(e) => {
                    log::warn!("history: could not roll back cancelled gesture: {e}");
                    false
                }
            },
            _ => false,
        }
    }

    pub fn in_gesture(&self) -> bool {
        self.batch_depth > 0
    }

    // ─── Edits ───────────────────────────────────────────────────────────

    /// Capture the surface before a discrete edit and clear the redo stack.
    ///
    /// Inside a gesture the capture already happened at `begin_gesture()`,
    /// so this only marks the gesture dirty.
    pub fn record_before_edit(&mut self, surface: &impl Surface) {
        if self.batch_depth > 0 {
            self.batch_dirty = true;
            return;
        }
        self.commit(surface.capture_snapshot());
    }

    fn commit(&mut self, before: Snapshot) {
        self.push_undo(before);
        if !self.redo_stack.is_empty() {
            log::debug!(
                "history: new edit discards {} redo entries",
                self.redo_stack.len()
            );
        }
        self.redo_stack.clear();
    }

    /// Push onto the undo stack, evicting the oldest entry when full.
    /// Never touches the redo stack.
    fn push_undo(&mut self, snapshot: Snapshot) {
        self.undo_stack.push_back(snapshot);
        while self.undo_stack.len() > self.max_depth {
            self.undo_stack.pop_front();
            log::debug!("history: evicted oldest undo entry (max {})", self.max_depth);
        }
    }

    /// Close any open gesture before undo/redo touches the stacks.
    fn flush_gesture(&mut self, surface: &impl Surface) {
        if self.batch_depth > 0 {
            self.batch_depth = 1;
            self.end_gesture(surface);
        }
    }

    // ─── Undo / Redo ─────────────────────────────────────────────────────

    /// Revert the most recent recorded edit.
    ///
    /// A snapshot that no longer fits the surface is put back and the
    /// surface is left untouched.
    pub fn undo(&mut self, surface: &mut impl Surface) -> Result<()> {
        self.flush_gesture(&*surface);
        let snapshot = self.undo_stack.pop_back().ok_or(CanvasError::NothingToUndo)?;
        if let Err(e) = fits(&*surface, &snapshot) {
            log::warn!("history: undo aborted: {e}");
            self.undo_stack.push_back(snapshot);
            return Err(e);
        }
        let current = surface.capture_snapshot();
        if let Err(e) = surface.restore(&snapshot) {
            log::warn!("history: undo aborted: {e}");
            self.undo_stack.push_back(snapshot);
            return Err(e);
        }
        self.redo_stack.push(current);
        Ok(())
    }

    /// Re-apply the most recently undone edit.
    pub fn redo(&mut self, surface: &mut impl Surface) -> Result<()> {
        self.flush_gesture(&*surface);
        let snapshot = self.redo_stack.pop().ok_or(CanvasError::NothingToRedo)?;
        if let Err(e) = fits(&*surface, &snapshot) {
            log::warn!("history: redo aborted: {e}");
            self.redo_stack.push(snapshot);
            return Err(e);
        }
        let current = surface.capture_snapshot();
        if let Err(e) = surface.restore(&snapshot) {
            log::warn!("history: redo aborted: {e}");
            self.redo_stack.push(snapshot);
            return Err(e);
        }
        self.push_undo(current);
        Ok(())
    }

    /// Drop all history and swap in `buffer` (new canvas, loaded state).
    pub fn reset(&mut self, surface: &mut impl Surface, buffer: CanvasBuffer) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.batch_depth = 0;
        self.batch_snapshot = None;
        self.batch_dirty = false;
        log::debug!("history: reset to {} canvas", buffer.size());
        surface.replace(buffer);
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    pub fn export(&self, surface: &impl Surface) -> PersistedState {
        PersistedState {
            canvas: surface.capture_snapshot(),
            undo: self.undo_stack.iter().cloned().collect(),
            redo: self.redo_stack.clone(),
        }
    }

    /// Reset to the persisted canvas and re-seed both stacks. An undo
    /// stack deeper than `max_depth` loses its oldest entries.
    pub fn import(&mut self, surface: &mut impl Surface, state: PersistedState) {
        let PersistedState { canvas, undo, redo } = state;
        self.reset(surface, CanvasBuffer::from(canvas));
        for snapshot in undo {
            self.push_undo(snapshot);
        }
        self.redo_stack = redo;
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn peek_undo(&self) -> Option<&Snapshot> {
        self.undo_stack.back()
    }

    pub fn peek_redo(&self) -> Option<&Snapshot> {
        self.redo_stack.last()
    }
}

/// A snapshot can only be restored onto a surface of its own size.
fn fits(surface: &impl Surface, snapshot: &Snapshot) -> Result<()> {
    if snapshot.size() == surface.size() {
        return Ok(());
    }
    Err(CanvasError::BufferSizeMismatch {
        expected: surface.size(),
        found: snapshot.size(),
    })
}
