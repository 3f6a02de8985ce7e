//! Editor session: the explicit owner of all drawing state.
//!
//! Holds the canvas buffer, history, tool state, selection, clipboard, and
//! toast queue. Hosts (the WASM bridge, native shells, tests) feed it input
//! events and read back pixels and toasts.
//!
//! Every pointer gesture on the canvas is one history batch: pointer down
//! opens it, moves paint into it, pointer up commits it, and releasing
//! outside the canvas cancels it.

use crate::config::EditorConfig;
use crate::history::HistoryManager;
use crate::input::InputEvent;
use crate::selection::Selection;
use crate::share::{self, ShareTarget};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::toast::{Toast, ToastId, ToastKind, ToastOptions, ToastQueue};
use crate::tools::{
    BrushTool, FillTool, PaintOps, RectTool, SelectTool, Tool, ToolContext, ToolKind,
};
use sk_core::{
    CanvasBuffer, CanvasError, Color, PersistedState, Point, Rect, Result, Size, Snapshot,
    Storage,
};

/// Largest brush the `]` shortcut grows to.
pub const MAX_BRUSH_SIZE: u32 = 64;

pub struct EditorSession {
    config: EditorConfig,
    canvas: CanvasBuffer,
    history: HistoryManager,
    color: Color,
    background: Color,
    brush_size: u32,
    active_tool: ToolKind,
    pencil: BrushTool,
    eraser: BrushTool,
    rect_tool: RectTool,
    fill_tool: FillTool,
    select_tool: SelectTool,
    selection: Option<Selection>,
    clipboard: Option<Snapshot>,
    toasts: ToastQueue,
    /// A pointer gesture is in progress on the canvas.
    pointer_down: bool,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorSession {
    /// Blank canvas filled with the configured background.
    pub fn new(config: EditorConfig) -> Self {
        let config = config.sanitized();
        let canvas = CanvasBuffer::filled(config.canvas_size(), config.background);
        Self {
            canvas,
            history: HistoryManager::new(config.history_depth),
            color: config.foreground,
            background: config.background,
            brush_size: config.brush_size,
            active_tool: config.tool,
            pencil: BrushTool::pencil(),
            eraser: BrushTool::eraser(),
            rect_tool: RectTool::new(),
            fill_tool: FillTool,
            select_tool: SelectTool::new(),
            selection: None,
            clipboard: None,
            toasts: ToastQueue::new(config.toast_duration_ms),
            pointer_down: false,
            config,
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn canvas(&self) -> &CanvasBuffer {
        &self.canvas
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn active_tool(&self) -> ToolKind {
        self.active_tool
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn brush_size(&self) -> u32 {
        self.brush_size
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn clipboard(&self) -> Option<&Snapshot> {
        self.clipboard.as_ref()
    }

    /// Live marquee corners while a selection drag is in progress.
    pub fn marquee(&self) -> Option<Rect> {
        let (a, b) = self.select_tool.marquee?;
        Rect::from_corners(a, b, self.canvas.size())
    }

    pub fn toasts(&self) -> &[Toast] {
        self.toasts.as_slice()
    }

    pub fn next_toast_deadline(&self) -> Option<u64> {
        self.toasts.next_deadline()
    }

    // ─── Tool state ──────────────────────────────────────────────────────

    pub fn set_tool(&mut self, kind: ToolKind) {
        if kind == self.active_tool {
            return;
        }
        self.finish_gesture();
        self.tool_mut().reset();
        self.selection = None;
        log::debug!("session: tool {} -> {kind}", self.active_tool);
        self.active_tool = kind;
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    /// Clamped to `1..=MAX_BRUSH_SIZE`.
    pub fn set_brush_size(&mut self, size: u32) {
        self.brush_size = size.clamp(1, MAX_BRUSH_SIZE);
    }

    fn tool_context(&self) -> ToolContext {
        ToolContext {
            color: self.color,
            background: self.background,
            brush_size: self.brush_size,
        }
    }

    fn tool_mut(&mut self) -> &mut dyn Tool {
        match self.active_tool {
            ToolKind::Pencil => &mut self.pencil,
            ToolKind::Eraser => &mut self.eraser,
            ToolKind::Rect => &mut self.rect_tool,
            ToolKind::Fill => &mut self.fill_tool,
            ToolKind::Select => &mut self.select_tool,
        }
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Route one input event. Returns `true` when the host should redraw.
    pub fn handle_event(&mut self, event: &InputEvent, now_ms: u64) -> bool {
        match event {
            InputEvent::PointerDown { .. } => self.pointer_down(event),
            InputEvent::PointerMove { .. } => self.pointer_move(event),
            InputEvent::PointerUp { .. } => {
                let on_canvas = event
                    .point()
                    .is_some_and(|p| p.is_inside(self.canvas.size()));
                if on_canvas {
                    self.pointer_up(event)
                } else {
                    self.abandon_gesture()
                }
            }
            InputEvent::PointerLeave => self.abandon_gesture(),
            InputEvent::Key { key, modifiers } => match ShortcutMap::resolve(key, *modifiers) {
                Some(action) => self.perform(action, now_ms),
                None => false,
            },
        }
    }

    fn pointer_down(&mut self, event: &InputEvent) -> bool {
        let Some(p) = event.point() else {
            return false;
        };
        if !p.is_inside(self.canvas.size()) {
            return false;
        }
        self.finish_gesture();
        if self.active_tool == ToolKind::Select {
            self.selection = None;
        }
        self.pointer_down = true;
        self.history.begin_gesture(&self.canvas);
        self.dispatch(event);
        true
    }

    fn pointer_move(&mut self, event: &InputEvent) -> bool {
        if !self.pointer_down {
            return false;
        }
        let changed = self.dispatch(event);
        changed || self.select_tool.marquee.is_some()
    }

    fn pointer_up(&mut self, event: &InputEvent) -> bool {
        if !self.pointer_down {
            return false;
        }
        self.dispatch(event);
        self.pointer_down = false;
        self.history.end_gesture(&self.canvas);

        if self.active_tool == ToolKind::Select
            && let Some((start, end)) = self.select_tool.take_completed()
        {
            self.selection = Selection::from_drag(&self.canvas, start, end);
        }
        true
    }

    /// Release outside the canvas: drop the gesture and roll back its paint.
    fn abandon_gesture(&mut self) -> bool {
        if !self.pointer_down {
            return false;
        }
        self.pointer_down = false;
        self.tool_mut().reset();
        self.history.cancel_gesture(&mut self.canvas);
        log::debug!("session: gesture abandoned");
        true
    }

    /// Commit an open pointer gesture (tool switch, undo mid-drag).
    fn finish_gesture(&mut self) {
        if self.pointer_down {
            self.pointer_down = false;
            self.tool_mut().reset();
            self.history.end_gesture(&self.canvas);
        }
    }

    fn dispatch(&mut self, event: &InputEvent) -> bool {
        let ctx = self.tool_context();
        let ops = self.tool_mut().handle(event, &ctx);
        self.apply_ops(ops)
    }

    fn apply_ops(&mut self, ops: PaintOps) -> bool {
        let mut changed = false;
        for op in ops {
            self.history.record_before_edit(&self.canvas);
            changed |= op.apply(&mut self.canvas);
            log::trace!("session: applied {op:?}");
        }
        changed
    }

    /// Run one discrete edit. Recorded in history only if it changed
    /// pixels; returns whether it did.
    fn apply_edit(&mut self, edit: impl FnOnce(&mut CanvasBuffer) -> bool) -> bool {
        let nested = self.history.in_gesture();
        self.history.begin_gesture(&self.canvas);
        self.history.record_before_edit(&self.canvas);
        let wrote = edit(&mut self.canvas);
        let pushed = self.history.end_gesture(&self.canvas);
        if nested { wrote } else { pushed }
    }

    /// Execute a shortcut action. Returns `true` when a redraw is needed.
    pub fn perform(&mut self, action: ShortcutAction, now_ms: u64) -> bool {
        match action {
            ShortcutAction::ToolPencil => self.switch_tool(ToolKind::Pencil),
            ShortcutAction::ToolEraser => self.switch_tool(ToolKind::Eraser),
            ShortcutAction::ToolRect => self.switch_tool(ToolKind::Rect),
            ShortcutAction::ToolFill => self.switch_tool(ToolKind::Fill),
            ShortcutAction::ToolSelect => self.switch_tool(ToolKind::Select),
            ShortcutAction::BrushSmaller => {
                self.set_brush_size(self.brush_size.saturating_sub(1));
                false
            }
            ShortcutAction::BrushLarger => {
                self.set_brush_size(self.brush_size + 1);
                false
            }
            ShortcutAction::Undo => self.undo(now_ms),
            ShortcutAction::Redo => self.redo(now_ms),
            ShortcutAction::Copy => self.copy(),
            ShortcutAction::Cut => self.cut(),
            ShortcutAction::Paste => self.paste(now_ms),
            ShortcutAction::SelectAll => self.select_all(),
            ShortcutAction::Delete => self.delete_selection(),
            ShortcutAction::ClearCanvas => self.clear_canvas(),
            ShortcutAction::Deselect => self.deselect(),
        }
    }

    fn switch_tool(&mut self, kind: ToolKind) -> bool {
        let had_selection = self.selection.is_some();
        self.set_tool(kind);
        had_selection
    }

    // ─── History ─────────────────────────────────────────────────────────

    /// Returns whether the canvas changed. Failures become toasts.
    pub fn undo(&mut self, now_ms: u64) -> bool {
        self.finish_gesture();
        let result = self.history.undo(&mut self.canvas);
        self.after_history(result, now_ms)
    }

    pub fn redo(&mut self, now_ms: u64) -> bool {
        self.finish_gesture();
        let result = self.history.redo(&mut self.canvas);
        self.after_history(result, now_ms)
    }

    fn after_history(&mut self, result: Result<()>, now_ms: u64) -> bool {
        match result {
            Ok(()) => {
                // Captured pixels no longer describe the canvas.
                self.selection = None;
                true
            }
            Err(e) => {
                self.report(&e, now_ms);
                false
            }
        }
    }

    fn report(&mut self, error: &CanvasError, now_ms: u64) {
        let kind = if error.is_empty_history() {
            ToastKind::Info
        } else {
            ToastKind::Error
        };
        self.toasts
            .add(ToastOptions::new(error.to_string(), kind), now_ms);
    }

    /// Start over with a blank canvas of `size`. History is discarded.
    /// Sizes over the canvas limit are refused with an error toast and
    /// leave the current canvas untouched.
    pub fn new_canvas(&mut self, size: Size, now_ms: u64) -> bool {
        if !size.fits_canvas() {
            log::warn!("session: refusing {size} canvas");
            self.report(&CanvasError::CanvasTooLarge { size }, now_ms);
            return false;
        }
        let size = Size::new(size.width.max(1), size.height.max(1));
        self.pointer_down = false;
        self.tool_mut().reset();
        self.selection = None;
        self.clipboard = None;
        self.history
            .reset(&mut self.canvas, CanvasBuffer::filled(size, self.background));
        true
    }

    // ─── Selection & clipboard ───────────────────────────────────────────

    pub fn select_all(&mut self) -> bool {
        self.selection = Selection::capture(&self.canvas, Rect::from_size(self.canvas.size()));
        true
    }

    pub fn deselect(&mut self) -> bool {
        self.select_tool.reset();
        self.selection.take().is_some()
    }

    /// Copy the selected pixels. Returns whether anything was copied.
    pub fn copy(&mut self) -> bool {
        match self.selection.as_ref().and_then(|s| s.pixels.clone()) {
            Some(pixels) => {
                self.clipboard = Some(pixels);
                true
            }
            None => false,
        }
    }

    pub fn cut(&mut self) -> bool {
        if !self.copy() {
            return false;
        }
        self.delete_selection()
    }

    /// Fill the selection with the background color as one edit.
    pub fn delete_selection(&mut self) -> bool {
        self.finish_gesture();
        let Some(rect) = self.selection.as_ref().map(|s| s.rect) else {
            return false;
        };
        let background = self.background;
        let changed = self.apply_edit(|canvas| sk_core::paint::fill_rect(canvas, rect, background));
        self.selection = Selection::capture(&self.canvas, rect);
        changed
    }

    /// Paste the clipboard at the selection origin (or the canvas origin)
    /// as one edit; the pasted area becomes the selection.
    pub fn paste(&mut self, now_ms: u64) -> bool {
        let Some(clip) = self.clipboard.clone() else {
            self.toasts
                .add(ToastOptions::new("Nothing to paste", ToastKind::Info), now_ms);
            return false;
        };
        self.finish_gesture();
        let at = self
            .selection
            .as_ref()
            .map(Selection::origin)
            .unwrap_or(Point::new(0, 0));
        let changed = self.apply_edit(|canvas| canvas.blit(&clip, at));
        let size = clip.size();
        self.selection = Selection::capture(
            &self.canvas,
            Rect::new(at.x as u32, at.y as u32, size.width, size.height),
        );
        changed
    }

    /// Fill the whole canvas with the background color as one edit.
    pub fn clear_canvas(&mut self) -> bool {
        self.finish_gesture();
        self.selection = None;
        let background = self.background;
        let full = Rect::from_size(self.canvas.size());
        self.apply_edit(|canvas| sk_core::paint::fill_rect(canvas, full, background))
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    pub fn save(&self, storage: &mut dyn Storage) -> Result<()> {
        self.history.export(&self.canvas).save_to(storage)
    }

    /// Restore canvas and history. `Ok(false)` when nothing was stored.
    pub fn load(&mut self, storage: &dyn Storage) -> Result<bool> {
        let Some(state) = PersistedState::load_from(storage)? else {
            return Ok(false);
        };
        self.pointer_down = false;
        self.tool_mut().reset();
        self.selection = None;
        self.history.import(&mut self.canvas, state);
        Ok(true)
    }

    // ─── Notifications ───────────────────────────────────────────────────

    pub fn notify(
        &mut self,
        message: &str,
        kind: ToastKind,
        duration_ms: u64,
        now_ms: u64,
    ) -> ToastId {
        self.toasts
            .add(ToastOptions::new(message, kind).duration(duration_ms), now_ms)
    }

    pub fn dismiss(&mut self, id: ToastId) -> bool {
        self.toasts.remove(id)
    }

    pub fn clear_toasts(&mut self) {
        self.toasts.clear();
    }

    /// Expire due toasts. Returns the removed ids.
    pub fn tick(&mut self, now_ms: u64) -> Vec<ToastId> {
        self.toasts.tick(now_ms)
    }

    // ─── Sharing ─────────────────────────────────────────────────────────

    /// Share an encoded image of the canvas. The outcome is reported as a
    /// toast; returns whether delivery succeeded.
    pub fn share(
        &mut self,
        target: &mut dyn ShareTarget,
        data_uri: &str,
        text: &str,
        handle: &str,
        now_ms: u64,
    ) -> bool {
        match share::share(target, &self.config.share, data_uri, text, handle) {
            Ok(()) => {
                self.toasts.add(
                    ToastOptions::new("Drawing shared!", ToastKind::Success),
                    now_ms,
                );
                true
            }
            Err(e) => {
                log::warn!("session: share failed: {e}");
                self.toasts
                    .add(ToastOptions::new(e.to_string(), ToastKind::Error), now_ms);
                false
            }
        }
    }
}
