//! Tool system for canvas interactions.
//!
//! Each tool translates input events into `PaintOp`s that the session
//! applies to the canvas inside a gesture. Tools never touch the buffer.
//!
//! ## Modifier behaviors
//!
//! | Modifier | Rect Tool | Select Tool |
//! |----------|-----------|-------------|
//! | **Shift** | Square constraint | Square constraint |
//! | **Alt** | Filled instead of outline | |

use crate::input::{InputEvent, Modifiers};
use serde::{Deserialize, Serialize};
use sk_core::paint::{draw_line, fill_rect, flood_fill, stamp, stroke_rect};
use sk_core::{CanvasBuffer, Color, Point, Rect};
use smallvec::{SmallVec, smallvec};
use std::fmt;

/// The active tool determines how input events are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Pencil,
    Eraser,
    Rect,
    Fill,
    Select,
}

impl ToolKind {
    pub const ALL: [ToolKind; 5] = [
        ToolKind::Pencil,
        ToolKind::Eraser,
        ToolKind::Rect,
        ToolKind::Fill,
        ToolKind::Select,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "pencil" => Some(Self::Pencil),
            "eraser" => Some(Self::Eraser),
            "rect" => Some(Self::Rect),
            "fill" => Some(Self::Fill),
            "select" => Some(Self::Select),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Pencil => "pencil",
            Self::Eraser => "eraser",
            Self::Rect => "rect",
            Self::Fill => "fill",
            Self::Select => "select",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Paint settings the tools draw with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolContext {
    pub color: Color,
    pub background: Color,
    pub brush_size: u32,
}

/// A single raster edit produced by a tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaintOp {
    Stamp {
        at: Point,
        size: u32,
        color: Color,
    },
    Line {
        from: Point,
        to: Point,
        size: u32,
        color: Color,
    },
    /// Rectangle spanned by two drag corners. `thickness: None` fills it.
    Rect {
        a: Point,
        b: Point,
        thickness: Option<u32>,
        color: Color,
    },
    FloodFill {
        at: Point,
        color: Color,
    },
}

pub type PaintOps = SmallVec<[PaintOp; 2]>;

impl PaintOp {
    /// Apply to `buffer`. Returns whether any pixel was written.
    pub fn apply(&self, buffer: &mut CanvasBuffer) -> bool {
        match *self {
            PaintOp::Stamp { at, size, color } => stamp(buffer, at, size, color),
            PaintOp::Line {
                from,
                to,
                size,
                color,
            } => draw_line(buffer, from, to, size, color),
            PaintOp::Rect {
                a,
                b,
                thickness,
                color,
            } => match Rect::from_corners(a, b, buffer.size()) {
                Some(rect) => match thickness {
                    Some(t) => stroke_rect(buffer, rect, t, color),
                    None => fill_rect(buffer, rect, color),
                },
                None => false,
            },
            PaintOp::FloodFill { at, color } => flood_fill(buffer, at, color),
        }
    }
}

/// Trait for tools that handle input and produce paint operations.
pub trait Tool {
    fn kind(&self) -> ToolKind;

    /// Handle an input event, returning zero or more paint operations.
    fn handle(&mut self, event: &InputEvent, ctx: &ToolContext) -> PaintOps;

    /// Forget any in-progress drag (gesture abandoned or tool switched).
    fn reset(&mut self);
}

/// Constrain the drag end `b` so the box from `a` is square.
fn square_corner(a: Point, b: Point) -> Point {
    let dx = i64::from(b.x) - i64::from(a.x);
    let dy = i64::from(b.y) - i64::from(a.y);
    let side = dx.abs().max(dy.abs());
    let clamp = |v: i64| v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
    Point::new(
        clamp(i64::from(a.x) + side * dx.signum()),
        clamp(i64::from(a.y) + side * dy.signum()),
    )
}

// ─── Brush Tool (pencil / eraser) ────────────────────────────────────────

/// Freehand brush. The eraser is the same brush painting the background.
pub struct BrushTool {
    erase: bool,
    last: Option<Point>,
}

impl BrushTool {
    pub fn pencil() -> Self {
        Self {
            erase: false,
            last: None,
        }
    }

    pub fn eraser() -> Self {
        Self {
            erase: true,
            last: None,
        }
    }

    fn color(&self, ctx: &ToolContext) -> Color {
        if self.erase { ctx.background } else { ctx.color }
    }
}

impl Tool for BrushTool {
    fn kind(&self) -> ToolKind {
        if self.erase {
            ToolKind::Eraser
        } else {
            ToolKind::Pencil
        }
    }

    fn handle(&mut self, event: &InputEvent, ctx: &ToolContext) -> PaintOps {
        let color = self.color(ctx);
        match event {
            InputEvent::PointerDown { .. } => {
                let Some(at) = event.point() else {
                    return PaintOps::new();
                };
                self.last = Some(at);
                smallvec![PaintOp::Stamp {
                    at,
                    size: ctx.brush_size,
                    color,
                }]
            }
            InputEvent::PointerMove { .. } | InputEvent::PointerUp { .. } => {
                let (Some(from), Some(to)) = (self.last, event.point()) else {
                    return PaintOps::new();
                };
                self.last = match event {
                    InputEvent::PointerUp { .. } => None,
                    _ => Some(to),
                };
                if from == to {
                    return PaintOps::new();
                }
                smallvec![PaintOp::Line {
                    from,
                    to,
                    size: ctx.brush_size,
                    color,
                }]
            }
            InputEvent::PointerLeave => {
                self.reset();
                PaintOps::new()
            }
            InputEvent::Key { .. } => PaintOps::new(),
        }
    }

    fn reset(&mut self) {
        self.last = None;
    }
}

// ─── Rect Tool ───────────────────────────────────────────────────────────

/// Drag out a rectangle; it is painted once, on release.
#[derive(Default)]
pub struct RectTool {
    start: Option<Point>,
}

impl RectTool {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tool for RectTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Rect
    }

    fn handle(&mut self, event: &InputEvent, ctx: &ToolContext) -> PaintOps {
        match event {
            InputEvent::PointerDown { .. } => {
                self.start = event.point();
                PaintOps::new()
            }
            InputEvent::PointerUp { modifiers, .. } => {
                let (Some(a), Some(mut b)) = (self.start.take(), event.point()) else {
                    return PaintOps::new();
                };
                // Shift: constrain to square
                if modifiers.shift {
                    b = square_corner(a, b);
                }
                let thickness = if modifiers.alt {
                    None
                } else {
                    Some(ctx.brush_size)
                };
                smallvec![PaintOp::Rect {
                    a,
                    b,
                    thickness,
                    color: ctx.color,
                }]
            }
            InputEvent::PointerLeave => {
                self.reset();
                PaintOps::new()
            }
            _ => PaintOps::new(),
        }
    }

    fn reset(&mut self) {
        self.start = None;
    }
}

// ─── Fill Tool ───────────────────────────────────────────────────────────

/// Paint bucket: flood fill on press.
#[derive(Default)]
pub struct FillTool;

impl Tool for FillTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Fill
    }

    fn handle(&mut self, event: &InputEvent, ctx: &ToolContext) -> PaintOps {
        match (event, event.point()) {
            (InputEvent::PointerDown { .. }, Some(at)) => smallvec![PaintOp::FloodFill {
                at,
                color: ctx.color,
            }],
            _ => PaintOps::new(),
        }
    }

    fn reset(&mut self) {}
}

// ─── Select Tool ─────────────────────────────────────────────────────────

/// Marquee selection. Produces no paint; the session reads the marquee.
#[derive(Default)]
pub struct SelectTool {
    /// Set when the pointer goes down.
    pub marquee_start: Option<Point>,
    /// Current drag corners `(start, end)`. Updated during drag.
    pub marquee: Option<(Point, Point)>,
    /// Corners of the last finished drag, taken by the session.
    completed: Option<(Point, Point)>,
}

impl SelectTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the corners of a drag that finished on the canvas.
    pub fn take_completed(&mut self) -> Option<(Point, Point)> {
        self.completed.take()
    }

    fn corners(start: Point, end: Point, modifiers: Modifiers) -> (Point, Point) {
        if modifiers.shift {
            (start, square_corner(start, end))
        } else {
            (start, end)
        }
    }
}

impl Tool for SelectTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Select
    }

    fn handle(&mut self, event: &InputEvent, _ctx: &ToolContext) -> PaintOps {
        match event {
            InputEvent::PointerDown { .. } => {
                self.completed = None;
                self.marquee_start = event.point();
                self.marquee = self.marquee_start.map(|p| (p, p));
            }
            InputEvent::PointerMove { modifiers, .. } => {
                if let (Some(start), Some(end)) = (self.marquee_start, event.point()) {
                    self.marquee = Some(Self::corners(start, end, *modifiers));
                }
            }
            InputEvent::PointerUp { modifiers, .. } => {
                if let (Some(start), Some(end)) = (self.marquee_start.take(), event.point()) {
                    self.completed = Some(Self::corners(start, end, *modifiers));
                }
                self.marquee = None;
            }
            InputEvent::PointerLeave => self.reset(),
            InputEvent::Key { .. } => {}
        }
        PaintOps::new()
    }

    fn reset(&mut self) {
        self.marquee_start = None;
        self.marquee = None;
        self.completed = None;
    }
}
