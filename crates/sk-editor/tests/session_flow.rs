//! Integration tests: editor session flows (sk-editor).
//!
//! Pointer gestures, selection and clipboard, persistence, and sharing,
//! all driven through `EditorSession` the way a host would.

use pretty_assertions::assert_eq;
use sk_core::{Color, MAX_DIMENSION, MemoryStorage, Rect, STORAGE_KEY, Size, Storage};
use sk_editor::{
    EditorConfig, EditorSession, InputEvent, Modifiers, ShareConfig, ShareError, SharePayload,
    ShareTarget, ToastKind, ToolKind,
};

fn session() -> EditorSession {
    let _ = env_logger::builder().is_test(true).try_init();
    EditorSession::new(EditorConfig {
        width: 32,
        height: 24,
        brush_size: 1,
        ..EditorConfig::default()
    })
}

fn drag(s: &mut EditorSession, from: (f32, f32), to: (f32, f32), modifiers: Modifiers) {
    s.handle_event(
        &InputEvent::from_pointer_down(from.0, from.1, 1.0, modifiers),
        0,
    );
    s.handle_event(&InputEvent::from_pointer_move(to.0, to.1, 1.0, modifiers), 0);
    s.handle_event(&InputEvent::from_pointer_up(to.0, to.1, modifiers), 0);
}

const CMD: Modifiers = Modifiers {
    ctrl: true,
    ..Modifiers::NONE
};

// ─── Drawing ────────────────────────────────────────────────────────────

#[test]
fn rect_outline_and_filled_with_alt() {
    let mut s = session();
    s.set_tool(ToolKind::Rect);
    drag(&mut s, (2.0, 2.0), (10.0, 10.0), Modifiers::NONE);
    assert_eq!(s.canvas().pixel(2, 2), Some(Color::BLACK));
    assert_eq!(s.canvas().pixel(6, 6), Some(Color::WHITE));

    let alt = Modifiers {
        alt: true,
        ..Modifiers::NONE
    };
    drag(&mut s, (12.0, 2.0), (20.0, 10.0), alt);
    assert_eq!(s.canvas().pixel(16, 6), Some(Color::BLACK));
    assert_eq!(s.history().undo_depth(), 2);
}

#[test]
fn eraser_paints_background() {
    let mut s = session();
    s.set_tool(ToolKind::Fill);
    drag(&mut s, (1.0, 1.0), (1.0, 1.0), Modifiers::NONE);
    assert_eq!(s.canvas().pixel(5, 5), Some(Color::BLACK));

    s.set_tool(ToolKind::Eraser);
    drag(&mut s, (5.0, 5.0), (5.0, 5.0), Modifiers::NONE);
    assert_eq!(s.canvas().pixel(5, 5), Some(Color::WHITE));
    assert_eq!(s.history().undo_depth(), 2);
}

#[test]
fn pointer_leave_rolls_back_stroke() {
    let mut s = session();
    s.handle_event(
        &InputEvent::from_pointer_down(3.0, 3.0, 1.0, Modifiers::NONE),
        0,
    );
    s.handle_event(
        &InputEvent::from_pointer_move(12.0, 3.0, 1.0, Modifiers::NONE),
        0,
    );
    assert_eq!(s.canvas().pixel(8, 3), Some(Color::BLACK));

    assert!(s.handle_event(&InputEvent::PointerLeave, 0));
    assert_eq!(s.canvas().pixel(8, 3), Some(Color::WHITE));
    assert!(!s.history().can_undo());
}

#[test]
fn far_pointer_move_paints_to_the_edge() {
    let mut s = session();
    s.handle_event(
        &InputEvent::from_pointer_down(5.0, 5.0, 1.0, Modifiers::NONE),
        0,
    );
    s.handle_event(
        &InputEvent::from_pointer_move(-3.0e9, 5.0, 1.0, Modifiers::NONE),
        0,
    );
    s.handle_event(&InputEvent::from_pointer_up(5.0, 5.0, Modifiers::NONE), 0);

    for x in 0..=5 {
        assert_eq!(s.canvas().pixel(x, 5), Some(Color::BLACK));
    }
    assert_eq!(s.canvas().pixel(6, 5), Some(Color::WHITE));
    assert_eq!(s.history().undo_depth(), 1);
}

// ─── Selection & clipboard ──────────────────────────────────────────────

#[test]
fn select_copy_paste_is_one_undo_step() {
    let mut s = session();
    s.set_tool(ToolKind::Rect);
    s.set_color(Color::RED);
    let alt = Modifiers {
        alt: true,
        ..Modifiers::NONE
    };
    drag(&mut s, (0.0, 0.0), (3.0, 3.0), alt);

    s.set_tool(ToolKind::Select);
    drag(&mut s, (0.0, 0.0), (3.0, 3.0), Modifiers::NONE);
    assert_eq!(s.selection().map(|sel| sel.rect), Some(Rect::new(0, 0, 4, 4)));

    assert!(s.handle_event(&InputEvent::key("c", CMD), 0));
    assert_eq!(s.clipboard().map(|c| c.size()), Some(Size::new(4, 4)));

    // Move the selection anchor, then paste there.
    drag(&mut s, (10.0, 10.0), (12.0, 12.0), Modifiers::NONE);
    let depth = s.history().undo_depth();
    assert!(s.handle_event(&InputEvent::key("v", CMD), 0));
    assert_eq!(s.canvas().pixel(13, 13), Some(Color::RED));
    assert_eq!(s.history().undo_depth(), depth + 1);
    assert_eq!(s.selection().map(|sel| sel.rect), Some(Rect::new(10, 10, 4, 4)));

    s.undo(0);
    assert_eq!(s.canvas().pixel(13, 13), Some(Color::WHITE));
}

#[test]
fn cut_clears_to_background() {
    let mut s = session();
    s.set_tool(ToolKind::Fill);
    drag(&mut s, (0.0, 0.0), (0.0, 0.0), Modifiers::NONE);

    s.set_tool(ToolKind::Select);
    drag(&mut s, (4.0, 4.0), (7.0, 7.0), Modifiers::NONE);
    assert!(s.handle_event(&InputEvent::key("x", CMD), 0));

    assert_eq!(s.canvas().pixel(5, 5), Some(Color::WHITE));
    assert_eq!(s.canvas().pixel(8, 8), Some(Color::BLACK));
    assert_eq!(s.clipboard().and_then(|c| c.pixel(0, 0)), Some(Color::BLACK));
}

#[test]
fn delete_mid_stroke_commits_the_stroke_first() {
    let mut s = session();
    s.set_tool(ToolKind::Fill);
    drag(&mut s, (0.0, 0.0), (0.0, 0.0), Modifiers::NONE);

    s.set_tool(ToolKind::Pencil);
    s.set_color(Color::RED);
    assert!(s.handle_event(&InputEvent::key("a", CMD), 0));
    s.handle_event(
        &InputEvent::from_pointer_down(20.0, 20.0, 1.0, Modifiers::NONE),
        0,
    );
    s.handle_event(
        &InputEvent::from_pointer_move(25.0, 20.0, 1.0, Modifiers::NONE),
        0,
    );
    let depth = s.history().undo_depth();

    assert!(s.handle_event(&InputEvent::key("Delete", Modifiers::NONE), 0));
    // The stroke is already committed, so leaving has nothing to roll back.
    assert!(!s.handle_event(&InputEvent::PointerLeave, 0));
    assert_eq!(s.canvas().pixel(20, 20), Some(Color::WHITE));
    assert_eq!(s.history().undo_depth(), depth + 2);
    assert_eq!(
        s.selection()
            .and_then(|sel| sel.pixels.as_ref())
            .and_then(|pixels| pixels.pixel(20, 20)),
        Some(Color::WHITE)
    );

    s.undo(0);
    assert_eq!(s.canvas().pixel(20, 20), Some(Color::RED));
    assert_eq!(s.canvas().pixel(0, 0), Some(Color::BLACK));
}

#[test]
fn escape_deselects_and_click_selects_nothing() {
    let mut s = session();
    s.set_tool(ToolKind::Select);
    drag(&mut s, (1.0, 1.0), (5.0, 5.0), Modifiers::NONE);
    assert!(s.selection().is_some());
    assert!(s.handle_event(&InputEvent::key("Escape", Modifiers::NONE), 0));
    assert!(s.selection().is_none());

    drag(&mut s, (6.0, 6.0), (6.0, 6.0), Modifiers::NONE);
    assert!(s.selection().is_none());
    assert!(!s.history().can_undo());
}

#[test]
fn clear_canvas_shortcut_is_undoable() {
    let mut s = session();
    s.set_tool(ToolKind::Fill);
    drag(&mut s, (0.0, 0.0), (0.0, 0.0), Modifiers::NONE);

    assert!(s.handle_event(&InputEvent::key("Delete", CMD), 0));
    assert_eq!(s.canvas().pixel(0, 0), Some(Color::WHITE));
    // Clearing an already blank canvas records nothing.
    let depth = s.history().undo_depth();
    assert!(!s.clear_canvas());
    assert_eq!(s.history().undo_depth(), depth);

    s.undo(0);
    assert_eq!(s.canvas().pixel(0, 0), Some(Color::BLACK));
}

// ─── Persistence ────────────────────────────────────────────────────────

#[test]
fn save_and_load_restores_canvas_and_history() {
    let mut s = session();
    s.set_tool(ToolKind::Fill);
    drag(&mut s, (0.0, 0.0), (0.0, 0.0), Modifiers::NONE);
    s.set_tool(ToolKind::Pencil);
    s.set_color(Color::RED);
    drag(&mut s, (2.0, 2.0), (9.0, 2.0), Modifiers::NONE);
    s.undo(0);

    let mut storage = MemoryStorage::new();
    s.save(&mut storage).unwrap();
    assert!(storage.get(STORAGE_KEY).is_some());

    let mut restored = session();
    assert!(restored.load(&storage).unwrap());
    assert_eq!(restored.canvas(), s.canvas());
    assert_eq!(restored.history().undo_depth(), 1);
    assert_eq!(restored.history().redo_depth(), 1);

    restored.redo(0);
    assert_eq!(restored.canvas().pixel(5, 2), Some(Color::RED));
}

#[test]
fn load_from_empty_or_corrupt_storage() {
    let mut s = session();
    let mut storage = MemoryStorage::new();
    assert!(!s.load(&storage).unwrap());

    storage.set(STORAGE_KEY, "not base64!".to_string()).unwrap();
    assert!(s.load(&storage).is_err());
    assert_eq!(s.canvas().size(), Size::new(32, 24));
}

#[test]
fn new_canvas_discards_history() {
    let mut s = session();
    s.set_tool(ToolKind::Fill);
    drag(&mut s, (0.0, 0.0), (0.0, 0.0), Modifiers::NONE);
    assert!(s.new_canvas(Size::new(10, 5), 0));

    assert_eq!(s.canvas().size(), Size::new(10, 5));
    assert_eq!(s.canvas().pixel(0, 0), Some(Color::WHITE));
    assert!(!s.history().can_undo());
    assert!(!s.undo(0));
}

#[test]
fn oversized_new_canvas_is_refused() {
    let mut s = session();
    s.set_tool(ToolKind::Fill);
    drag(&mut s, (0.0, 0.0), (0.0, 0.0), Modifiers::NONE);

    assert!(!s.new_canvas(Size::new(u32::MAX, u32::MAX), 0));
    assert!(!s.new_canvas(Size::new(MAX_DIMENSION + 1, 1), 0));
    assert_eq!(s.canvas().size(), Size::new(32, 24));
    assert_eq!(s.canvas().pixel(0, 0), Some(Color::BLACK));
    assert!(s.history().can_undo());
    assert_eq!(s.toasts()[0].kind, ToastKind::Error);
}

// ─── Sharing ────────────────────────────────────────────────────────────

#[derive(Default)]
struct Outbox(Vec<SharePayload>);

impl ShareTarget for Outbox {
    fn deliver(&mut self, payload: &SharePayload) -> Result<(), ShareError> {
        self.0.push(payload.clone());
        Ok(())
    }
}

#[test]
fn share_reports_outcome_as_toast() {
    let mut unconfigured = session();
    let mut outbox = Outbox::default();
    assert!(!unconfigured.share(&mut outbox, "data:image/png;base64,UE5H", "", "", 0));
    assert_eq!(unconfigured.toasts()[0].kind, ToastKind::Error);
    assert!(outbox.0.is_empty());

    let mut s = EditorSession::new(EditorConfig {
        share: ShareConfig {
            webhook_url: Some("https://hooks.example.test/sketch".to_string()),
        },
        ..EditorConfig::default()
    });
    assert!(s.share(&mut outbox, "data:image/png;base64,UE5H", "hi", "@ada", 0));
    assert_eq!(s.toasts()[0].kind, ToastKind::Success);
    assert_eq!(outbox.0[0].filename, "ada_drawing.png");
    assert_eq!(outbox.0[0].content, "By @ada\nhi");
}
