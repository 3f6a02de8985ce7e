//! Input abstraction layer.
//!
//! Normalizes mouse, touch, and stylus events into a unified `InputEvent`
//! enum consumed by tools and the editor session.

use sk_core::Point;

/// Keyboard modifier state at the time of an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Ctrl on Windows/Linux, ⌘ on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// A normalized input event from any pointing device or the keyboard.
#[derive(Debug, Clone)]
pub enum InputEvent {
    /// Pointer pressed (mouse down, touch start, pencil contact).
    PointerDown {
        x: f32,
        y: f32,
        /// Pressure from 0.0 (none) to 1.0 (max). Mouse is always 1.0.
        pressure: f32,
        modifiers: Modifiers,
    },

    /// Pointer moved (mouse move, touch move, pencil move).
    PointerMove {
        x: f32,
        y: f32,
        pressure: f32,
        modifiers: Modifiers,
    },

    /// Pointer released over the canvas.
    PointerUp { x: f32, y: f32, modifiers: Modifiers },

    /// Pointer released or lost outside the canvas. Abandons the gesture.
    PointerLeave,

    /// Keyboard shortcut.
    Key { key: String, modifiers: Modifiers },
}

impl InputEvent {
    pub fn from_pointer_down(x: f32, y: f32, pressure: f32, modifiers: Modifiers) -> Self {
        Self::PointerDown {
            x,
            y,
            pressure,
            modifiers,
        }
    }

    pub fn from_pointer_move(x: f32, y: f32, pressure: f32, modifiers: Modifiers) -> Self {
        Self::PointerMove {
            x,
            y,
            pressure,
            modifiers,
        }
    }

    pub fn from_pointer_up(x: f32, y: f32, modifiers: Modifiers) -> Self {
        Self::PointerUp { x, y, modifiers }
    }

    pub fn key(key: &str, modifiers: Modifiers) -> Self {
        Self::Key {
            key: key.to_string(),
            modifiers,
        }
    }

    /// Pixel under the pointer, if this is a positioned pointer event.
    pub fn point(&self) -> Option<Point> {
        match self {
            Self::PointerDown { x, y, .. }
            | Self::PointerMove { x, y, .. }
            | Self::PointerUp { x, y, .. } => Some(Point::from_f32(*x, *y)),
            _ => None,
        }
    }

    pub fn modifiers(&self) -> Modifiers {
        match self {
            Self::PointerDown { modifiers, .. }
            | Self::PointerMove { modifiers, .. }
            | Self::PointerUp { modifiers, .. }
            | Self::Key { modifiers, .. } => *modifiers,
            Self::PointerLeave => Modifiers::NONE,
        }
    }
}
