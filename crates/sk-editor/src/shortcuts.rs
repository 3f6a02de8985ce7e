//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s.
//! The shortcut map lives in Rust so it's shared across WASM and native.

use crate::input::Modifiers;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Tool switching ──
    ToolPencil,
    ToolEraser,
    ToolRect,
    ToolFill,
    ToolSelect,

    // ── Brush ──
    BrushSmaller,
    BrushLarger,

    // ── Edit ──
    Undo,
    Redo,
    Copy,
    Cut,
    Paste,
    SelectAll,
    /// Clear the selected area to the background color.
    Delete,
    /// Clear the whole canvas (⌘Delete).
    ClearCanvas,

    // ── UI ──
    Deselect,
}

/// Resolves key events into shortcut actions.
///
/// Uses platform-aware modifier detection: on macOS `meta` is ⌘,
/// on other platforms `ctrl` serves the same role.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"z"`, `"Delete"`).
    /// Returns `None` if the key combo has no binding.
    pub fn resolve(key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        let cmd = modifiers.command();

        // ── Modifier combos first (most specific) ──
        if cmd && modifiers.shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                "a" | "A" => Some(ShortcutAction::SelectAll),
                "c" | "C" => Some(ShortcutAction::Copy),
                "x" | "X" => Some(ShortcutAction::Cut),
                "v" | "V" => Some(ShortcutAction::Paste),
                "Delete" | "Backspace" => Some(ShortcutAction::ClearCanvas),
                _ => None,
            };
        }

        if modifiers.alt {
            return None;
        }

        // ── Single keys ──
        match key {
            "p" | "P" => Some(ShortcutAction::ToolPencil),
            "e" | "E" => Some(ShortcutAction::ToolEraser),
            "r" | "R" => Some(ShortcutAction::ToolRect),
            "f" | "F" => Some(ShortcutAction::ToolFill),
            "s" | "S" => Some(ShortcutAction::ToolSelect),
            "[" => Some(ShortcutAction::BrushSmaller),
            "]" => Some(ShortcutAction::BrushLarger),
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            "Escape" => Some(ShortcutAction::Deselect),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: Modifiers = Modifiers::NONE;
    const CTRL: Modifiers = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };
    const META: Modifiers = Modifiers {
        meta: true,
        ..Modifiers::NONE
    };
    const META_SHIFT: Modifiers = Modifiers {
        meta: true,
        shift: true,
        ..Modifiers::NONE
    };

    #[test]
    fn resolve_tool_shortcuts() {
        assert_eq!(
            ShortcutMap::resolve("p", NONE),
            Some(ShortcutAction::ToolPencil)
        );
        assert_eq!(
            ShortcutMap::resolve("E", NONE),
            Some(ShortcutAction::ToolEraser)
        );
        assert_eq!(ShortcutMap::resolve("r", NONE), Some(ShortcutAction::ToolRect));
        assert_eq!(ShortcutMap::resolve("f", NONE), Some(ShortcutAction::ToolFill));
        assert_eq!(
            ShortcutMap::resolve("s", NONE),
            Some(ShortcutAction::ToolSelect)
        );
    }

    #[test]
    fn resolve_undo_redo() {
        // Cmd+Z → Undo
        assert_eq!(ShortcutMap::resolve("z", META), Some(ShortcutAction::Undo));
        // Ctrl+Z → Undo
        assert_eq!(ShortcutMap::resolve("z", CTRL), Some(ShortcutAction::Undo));
        // Cmd+Shift+Z → Redo
        assert_eq!(
            ShortcutMap::resolve("Z", META_SHIFT),
            Some(ShortcutAction::Redo)
        );
        // Ctrl+Y → Redo
        assert_eq!(ShortcutMap::resolve("y", CTRL), Some(ShortcutAction::Redo));
    }

    #[test]
    fn resolve_clipboard() {
        assert_eq!(ShortcutMap::resolve("c", META), Some(ShortcutAction::Copy));
        assert_eq!(ShortcutMap::resolve("x", META), Some(ShortcutAction::Cut));
        assert_eq!(ShortcutMap::resolve("v", CTRL), Some(ShortcutAction::Paste));
        assert_eq!(
            ShortcutMap::resolve("a", CTRL),
            Some(ShortcutAction::SelectAll)
        );
    }

    #[test]
    fn resolve_delete_variants() {
        assert_eq!(
            ShortcutMap::resolve("Delete", NONE),
            Some(ShortcutAction::Delete)
        );
        assert_eq!(
            ShortcutMap::resolve("Backspace", META),
            Some(ShortcutAction::ClearCanvas)
        );
    }

    #[test]
    fn resolve_brush_size_and_escape() {
        assert_eq!(
            ShortcutMap::resolve("[", NONE),
            Some(ShortcutAction::BrushSmaller)
        );
        assert_eq!(
            ShortcutMap::resolve("]", NONE),
            Some(ShortcutAction::BrushLarger)
        );
        assert_eq!(
            ShortcutMap::resolve("Escape", NONE),
            Some(ShortcutAction::Deselect)
        );
    }

    #[test]
    fn resolve_modifier_precedence() {
        // Bare z is not undo.
        assert_eq!(ShortcutMap::resolve("z", NONE), None);
        // Cmd+P is not the pencil.
        assert_eq!(ShortcutMap::resolve("p", META), None);
        assert_eq!(ShortcutMap::resolve("q", NONE), None);
    }
}
