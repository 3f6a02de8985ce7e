//! Integration tests: raster undo/redo history (sk-editor).
//!
//! Drives `HistoryManager` against a bare `CanvasBuffer`, checking the
//! round-trip law, redo invalidation, and depth eviction across crate
//! boundaries.

use pretty_assertions::assert_eq;
use sk_core::paint::fill_rect;
use sk_core::{CanvasBuffer, CanvasError, Color, Rect, Size, Snapshot};
use sk_editor::HistoryManager;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn white(width: u32, height: u32) -> CanvasBuffer {
    CanvasBuffer::filled(Size::new(width, height), Color::WHITE)
}

/// One discrete edit: record, then paint.
fn edit(history: &mut HistoryManager, buffer: &mut CanvasBuffer, rect: Rect, color: Color) {
    history.record_before_edit(&*buffer);
    fill_rect(buffer, rect, color);
}

fn shade(i: u32) -> Color {
    Color::rgb((i * 37 % 256) as u8, (i * 11 % 256) as u8, 90)
}

// ─── Scenarios ──────────────────────────────────────────────────────────

#[test]
fn fill_black_then_undo_and_redo() {
    init_logging();
    let mut buffer = white(32, 32);
    let blank = buffer.snapshot();
    let mut history = HistoryManager::new(100);

    edit(&mut history, &mut buffer, Rect::new(0, 0, 10, 10), Color::BLACK);
    let filled = buffer.snapshot();

    history.undo(&mut buffer).unwrap();
    assert_eq!(buffer.snapshot(), blank, "buffer not all-white after undo");

    history.redo(&mut buffer).unwrap();
    assert_eq!(buffer.snapshot(), filled, "region not black after redo");
    assert_eq!(buffer.pixel(9, 9), Some(Color::BLACK));
    assert_eq!(buffer.pixel(10, 10), Some(Color::WHITE));
}

#[test]
fn new_edit_after_undo_discards_future() {
    init_logging();
    let mut buffer = white(32, 32);
    let blank = buffer.snapshot();
    let mut history = HistoryManager::new(100);

    edit(&mut history, &mut buffer, Rect::new(0, 0, 10, 10), Color::BLACK);
    history.undo(&mut buffer).unwrap();

    edit(&mut history, &mut buffer, Rect::new(20, 20, 5, 5), Color::RED);
    assert_eq!(history.redo(&mut buffer), Err(CanvasError::NothingToRedo));
    assert_eq!(buffer.pixel(20, 20), Some(Color::RED));

    history.undo(&mut buffer).unwrap();
    assert_eq!(buffer.snapshot(), blank);
}

// ─── Laws ───────────────────────────────────────────────────────────────

#[test]
fn undo_n_then_redo_n_round_trips() {
    let mut buffer = white(16, 16);
    let mut history = HistoryManager::new(100);
    let before: Snapshot = buffer.snapshot();

    for i in 0..12 {
        edit(&mut history, &mut buffer, Rect::new(i, i, 4, 4), shade(i));
    }
    let after = buffer.snapshot();

    for _ in 0..12 {
        history.undo(&mut buffer).unwrap();
    }
    assert_eq!(buffer.snapshot(), before);
    assert!(!history.can_undo());

    for _ in 0..12 {
        history.redo(&mut buffer).unwrap();
    }
    assert_eq!(buffer.snapshot(), after);
    assert!(!history.can_redo());
}

#[test]
fn empty_stacks_leave_buffer_unchanged() {
    let mut buffer = white(8, 8);
    let before = buffer.snapshot();
    let mut history = HistoryManager::default();

    let err = history.undo(&mut buffer).unwrap_err();
    assert_eq!(err.to_string(), "Nothing to undo");
    let err = history.redo(&mut buffer).unwrap_err();
    assert_eq!(err.to_string(), "Nothing to redo");
    assert_eq!(buffer.snapshot(), before);
}

#[test]
fn bounded_depth_evicts_oldest_edit() {
    const N: usize = 5;
    let mut buffer = white(16, 16);
    let mut history = HistoryManager::new(N);

    let mut states = vec![buffer.snapshot()];
    for i in 0..=N as u32 {
        edit(&mut history, &mut buffer, Rect::new(i, 0, 1, 16), shade(i + 1));
        states.push(buffer.snapshot());
    }
    assert_eq!(history.undo_depth(), N);

    for _ in 0..N {
        history.undo(&mut buffer).unwrap();
    }
    // The first edit's pre-state was evicted; we stop after it.
    assert_eq!(history.undo(&mut buffer), Err(CanvasError::NothingToUndo));
    assert_eq!(buffer.snapshot(), states[1]);
    assert_eq!(history.redo_depth(), N);
}

// ─── Gestures ───────────────────────────────────────────────────────────

#[test]
fn stroke_of_many_edits_is_one_step() {
    let mut buffer = white(32, 8);
    let blank = buffer.snapshot();
    let mut history = HistoryManager::new(100);

    history.begin_gesture(&buffer);
    for x in 0..32 {
        edit(&mut history, &mut buffer, Rect::new(x, 3, 1, 2), Color::BLACK);
    }
    assert!(history.end_gesture(&buffer));
    assert_eq!(history.undo_depth(), 1);

    history.undo(&mut buffer).unwrap();
    assert_eq!(buffer.snapshot(), blank);
}

#[test]
fn undo_during_gesture_commits_it_first() {
    let mut buffer = white(8, 8);
    let blank = buffer.snapshot();
    let mut history = HistoryManager::new(100);

    history.begin_gesture(&buffer);
    edit(&mut history, &mut buffer, Rect::new(0, 0, 2, 2), Color::RED);
    history.undo(&mut buffer).unwrap();

    assert!(!history.in_gesture());
    assert_eq!(buffer.snapshot(), blank);
    assert!(history.can_redo());
}
