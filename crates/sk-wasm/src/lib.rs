//! WASM bridge for Sketchboard: exposes the drawing session to the page.
//!
//! Compiled via `wasm-pack build --target web`. The page owns the
//! `<canvas>`, the clock, and network access; everything else lives here.
//! Timestamps are milliseconds from any monotonic JS clock.

mod render2d;
mod storage;

use serde_json::json;
use sk_core::{Color, Size};
use sk_editor::share::build_payload;
use sk_editor::{
    EditorConfig, EditorSession, InputEvent, Modifiers, ShortcutAction, ShortcutMap, ToastKind,
    ToolKind,
};
use storage::LocalStorage;
use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

/// The main WASM-facing canvas controller.
///
/// All interaction from the page goes through this struct.
#[wasm_bindgen]
pub struct SketchCanvas {
    session: EditorSession,
}

#[wasm_bindgen]
impl SketchCanvas {
    /// Create a blank canvas with default settings.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32) -> Self {
        console_error_panic_hook_setup();
        Self {
            session: EditorSession::new(EditorConfig {
                width,
                height,
                ..EditorConfig::default()
            }),
        }
    }

    /// Create a canvas from a JSON `EditorConfig`. Missing fields take
    /// their defaults.
    pub fn with_config(json: &str) -> Result<SketchCanvas, JsValue> {
        console_error_panic_hook_setup();
        let config = EditorConfig::from_json(json)
            .map_err(|e| JsValue::from_str(&format!("Invalid config: {e}")))?;
        Ok(Self {
            session: EditorSession::new(config),
        })
    }

    pub fn width(&self) -> u32 {
        self.session.canvas().width()
    }

    pub fn height(&self) -> u32 {
        self.session.canvas().height()
    }

    /// Draw the buffer and selection chrome. Returns `false` if the
    /// browser rejected the draw.
    pub fn render(&self, ctx: &CanvasRenderingContext2d) -> bool {
        let selection = self.session.selection().map(|s| s.rect);
        match render2d::render_canvas(ctx, self.session.canvas(), self.session.marquee(), selection)
        {
            Ok(()) => true,
            Err(e) => {
                log::warn!("render failed: {e:?}");
                false
            }
        }
    }

    // ─── Pointer API ─────────────────────────────────────────────────────

    /// Handle pointer down. Returns true if a redraw is needed.
    #[allow(clippy::too_many_arguments)]
    pub fn handle_pointer_down(
        &mut self,
        x: f32,
        y: f32,
        pressure: f32,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
        now_ms: f64,
    ) -> bool {
        let mods = modifiers(shift, ctrl, alt, meta);
        let event = InputEvent::from_pointer_down(x, y, pressure, mods);
        self.session.handle_event(&event, millis(now_ms))
    }

    #[allow(clippy::too_many_arguments)]
    pub fn handle_pointer_move(
        &mut self,
        x: f32,
        y: f32,
        pressure: f32,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
        now_ms: f64,
    ) -> bool {
        let mods = modifiers(shift, ctrl, alt, meta);
        let event = InputEvent::from_pointer_move(x, y, pressure, mods);
        self.session.handle_event(&event, millis(now_ms))
    }

    /// Releasing outside the canvas abandons the gesture.
    #[allow(clippy::too_many_arguments)]
    pub fn handle_pointer_up(
        &mut self,
        x: f32,
        y: f32,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
        now_ms: f64,
    ) -> bool {
        let mods = modifiers(shift, ctrl, alt, meta);
        let event = InputEvent::from_pointer_up(x, y, mods);
        self.session.handle_event(&event, millis(now_ms))
    }

    pub fn handle_pointer_leave(&mut self, now_ms: f64) -> bool {
        self.session
            .handle_event(&InputEvent::PointerLeave, millis(now_ms))
    }

    // ─── Keyboard Shortcut API ───────────────────────────────────────────

    /// Handle a keyboard event. Returns a JSON string:
    /// `{"changed":bool, "action":"<action_name>", "tool":"<tool_name>"}`
    pub fn handle_key(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
        now_ms: f64,
    ) -> String {
        let mods = modifiers(shift, ctrl, alt, meta);
        let Some(action) = ShortcutMap::resolve(key, mods) else {
            return key_result_json(false, None, self.session.active_tool());
        };
        let changed = self.session.perform(action, millis(now_ms));
        key_result_json(changed, Some(action), self.session.active_tool())
    }

    // ─── Tools & colors ──────────────────────────────────────────────────

    /// Switch tool by name. Returns `false` for an unknown name.
    pub fn set_tool(&mut self, name: &str) -> bool {
        match ToolKind::from_name(name) {
            Some(kind) => {
                self.session.set_tool(kind);
                true
            }
            None => false,
        }
    }

    pub fn get_tool_name(&self) -> String {
        self.session.active_tool().name().to_string()
    }

    /// Set the drawing color from `#RGB`, `#RRGGBB`, or `#RRGGBBAA`.
    pub fn set_color(&mut self, hex: &str) -> bool {
        match Color::from_hex(hex) {
            Some(color) => {
                self.session.set_color(color);
                true
            }
            None => false,
        }
    }

    pub fn get_color(&self) -> String {
        self.session.color().to_hex()
    }

    pub fn set_background(&mut self, hex: &str) -> bool {
        match Color::from_hex(hex) {
            Some(color) => {
                self.session.set_background(color);
                true
            }
            None => false,
        }
    }

    pub fn get_background(&self) -> String {
        self.session.background().to_hex()
    }

    pub fn set_brush_size(&mut self, size: u32) {
        self.session.set_brush_size(size);
    }

    pub fn get_brush_size(&self) -> u32 {
        self.session.brush_size()
    }

    // ─── Edit API ────────────────────────────────────────────────────────

    pub fn undo(&mut self, now_ms: f64) -> bool {
        self.session.undo(millis(now_ms))
    }

    pub fn redo(&mut self, now_ms: f64) -> bool {
        self.session.redo(millis(now_ms))
    }

    pub fn can_undo(&self) -> bool {
        self.session.history().can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.session.history().can_redo()
    }

    /// Start over with a blank canvas. Discards history. Oversized
    /// canvases are refused with an error toast.
    pub fn new_canvas(&mut self, width: u32, height: u32, now_ms: f64) -> bool {
        self.session.new_canvas(Size::new(width, height), millis(now_ms))
    }

    pub fn clear_canvas(&mut self) -> bool {
        self.session.clear_canvas()
    }

    pub fn select_all(&mut self) -> bool {
        self.session.select_all()
    }

    pub fn deselect(&mut self) -> bool {
        self.session.deselect()
    }

    pub fn copy(&mut self) -> bool {
        self.session.copy()
    }

    pub fn cut(&mut self) -> bool {
        self.session.cut()
    }

    pub fn paste(&mut self, now_ms: f64) -> bool {
        self.session.paste(millis(now_ms))
    }

    pub fn delete_selection(&mut self) -> bool {
        self.session.delete_selection()
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    /// Save canvas and history to `localStorage`. Failures become toasts.
    pub fn save(&mut self, now_ms: f64) -> bool {
        let Some(mut storage) = LocalStorage::from_window() else {
            self.error_toast("Local storage is unavailable", now_ms);
            return false;
        };
        match self.session.save(&mut storage) {
            Ok(()) => true,
            Err(e) => {
                self.error_toast(&e.to_string(), now_ms);
                false
            }
        }
    }

    /// Restore from `localStorage`. Returns `true` if a saved canvas was
    /// loaded.
    pub fn load(&mut self, now_ms: f64) -> bool {
        let Some(storage) = LocalStorage::from_window() else {
            return false;
        };
        match self.session.load(&storage) {
            Ok(loaded) => loaded,
            Err(e) => {
                self.error_toast(&e.to_string(), now_ms);
                false
            }
        }
    }

    // ─── Toasts ──────────────────────────────────────────────────────────

    /// Show a toast. `kind` is `success`, `error`, or `info`; a zero
    /// duration uses the default. Returns the toast id.
    pub fn notify(&mut self, message: &str, kind: &str, duration_ms: f64, now_ms: f64) -> f64 {
        let id = self
            .session
            .notify(message, parse_toast_kind(kind), millis(duration_ms), millis(now_ms));
        id as f64
    }

    pub fn dismiss_toast(&mut self, id: f64) -> bool {
        self.session.dismiss(millis(id))
    }

    /// Expire due toasts. Returns true if any were removed.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        !self.session.tick(millis(now_ms)).is_empty()
    }

    /// Next expiry time, or `-1` when no toast is showing.
    pub fn next_toast_deadline(&self) -> f64 {
        self.session
            .next_toast_deadline()
            .map_or(-1.0, |t| t as f64)
    }

    /// Visible toasts as a JSON array.
    pub fn toasts_json(&self) -> String {
        serde_json::to_string(self.session.toasts()).unwrap_or_else(|_| "[]".to_string())
    }

    // ─── Sharing ─────────────────────────────────────────────────────────

    /// Prepare a webhook post for a `canvas.toDataURL()` image. Returns
    /// `{"ok":true,"endpoint":..,"filename":..,"mimeType":..,"content":..}`
    /// or `{"ok":false,"error":..}`. The page performs the upload.
    pub fn share_payload_json(&self, data_uri: &str, text: &str, handle: &str) -> String {
        let payload = build_payload(&self.session.config().share, data_uri, text, handle);
        let value = match payload {
            Ok(p) => json!({
                "ok": true,
                "endpoint": p.endpoint,
                "filename": p.filename,
                "mimeType": p.mime_type,
                "content": p.content,
                "size": p.image.len(),
            }),
            Err(e) => json!({ "ok": false, "error": e.to_string() }),
        };
        value.to_string()
    }

    fn error_toast(&mut self, message: &str, now_ms: f64) {
        self.session
            .notify(message, ToastKind::Error, 0, millis(now_ms));
    }
}

fn modifiers(shift: bool, ctrl: bool, alt: bool, meta: bool) -> Modifiers {
    Modifiers {
        shift,
        ctrl,
        alt,
        meta,
    }
}

/// JS clock value to whole milliseconds; negatives and NaN become 0.
fn millis(ms: f64) -> u64 {
    if ms.is_finite() && ms > 0.0 {
        ms as u64
    } else {
        0
    }
}

fn parse_toast_kind(kind: &str) -> ToastKind {
    match kind {
        "success" => ToastKind::Success,
        "error" => ToastKind::Error,
        _ => ToastKind::Info,
    }
}

fn key_result_json(changed: bool, action: Option<ShortcutAction>, tool: ToolKind) -> String {
    json!({
        "changed": changed,
        "action": action.map_or("none", action_to_name),
        "tool": tool.name(),
    })
    .to_string()
}

fn action_to_name(action: ShortcutAction) -> &'static str {
    match action {
        ShortcutAction::ToolPencil => "toolPencil",
        ShortcutAction::ToolEraser => "toolEraser",
        ShortcutAction::ToolRect => "toolRect",
        ShortcutAction::ToolFill => "toolFill",
        ShortcutAction::ToolSelect => "toolSelect",
        ShortcutAction::BrushSmaller => "brushSmaller",
        ShortcutAction::BrushLarger => "brushLarger",
        ShortcutAction::Undo => "undo",
        ShortcutAction::Redo => "redo",
        ShortcutAction::Copy => "copy",
        ShortcutAction::Cut => "cut",
        ShortcutAction::Paste => "paste",
        ShortcutAction::SelectAll => "selectAll",
        ShortcutAction::Delete => "delete",
        ShortcutAction::ClearCanvas => "clearCanvas",
        ShortcutAction::Deselect => "deselect",
    }
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Sketchboard WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}
