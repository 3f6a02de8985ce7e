//! Pixel-space geometry: sizes, points, and axis-aligned rectangles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest canvas side, in pixels. Matches the common browser canvas limit.
pub const MAX_DIMENSION: u32 = 16_384;

/// Canvas or region dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of pixels covered, or `None` if it does not fit in `usize`.
    pub const fn checked_area(&self) -> Option<usize> {
        (self.width as usize).checked_mul(self.height as usize)
    }

    /// Both sides within [`MAX_DIMENSION`].
    pub const fn fits_canvas(&self) -> bool {
        self.width <= MAX_DIMENSION && self.height <= MAX_DIMENSION
    }

    /// Each side clamped to [`MAX_DIMENSION`].
    pub const fn clamp_to_max(self) -> Self {
        Self::new(
            if self.width > MAX_DIMENSION { MAX_DIMENSION } else { self.width },
            if self.height > MAX_DIMENSION { MAX_DIMENSION } else { self.height },
        )
    }

    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A pointer position in canvas space. May lie outside the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Round a floating-point pointer position to the pixel it falls in.
    pub fn from_f32(x: f32, y: f32) -> Self {
        Self {
            x: x.floor() as i32,
            y: y.floor() as i32,
        }
    }

    pub fn is_inside(&self, size: Size) -> bool {
        self.x >= 0 && self.y >= 0 && (self.x as u32) < size.width && (self.y as u32) < size.height
    }
}

/// Axis-aligned rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle covering the whole of `size`.
    pub const fn from_size(size: Size) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    /// Normalize a drag from `a` to `b` into a rectangle that covers both
    /// corner pixels, clipped to `bounds`. Returns `None` if nothing of the
    /// drag lies on the canvas.
    pub fn from_corners(a: Point, b: Point, bounds: Size) -> Option<Self> {
        let x0 = a.x.min(b.x) as i64;
        let y0 = a.y.min(b.y) as i64;
        let x1 = a.x.max(b.x) as i64 + 1;
        let y1 = a.y.max(b.y) as i64 + 1;
        clip_span(x0, y0, x1, y1, bounds)
    }

    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub const fn right(&self) -> u32 {
        self.x + self.width
    }

    pub const fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0
            && p.y >= 0
            && (p.x as u32) >= self.x
            && (p.y as u32) >= self.y
            && (p.x as u32) < self.right()
            && (p.y as u32) < self.bottom()
    }

    /// Intersect with a canvas of `bounds`. `None` if nothing remains.
    pub fn clip_to(&self, bounds: Size) -> Option<Self> {
        clip_span(
            self.x as i64,
            self.y as i64,
            self.x as i64 + self.width as i64,
            self.y as i64 + self.height as i64,
            bounds,
        )
    }
}

fn clip_span(x0: i64, y0: i64, x1: i64, y1: i64, bounds: Size) -> Option<Rect> {
    let x0 = x0.clamp(0, bounds.width as i64);
    let y0 = y0.clamp(0, bounds.height as i64);
    let x1 = x1.clamp(0, bounds.width as i64);
    let y1 = y1.clamp(0, bounds.height as i64);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some(Rect::new(
        x0 as u32,
        y0 as u32,
        (x1 - x0) as u32,
        (y1 - y0) as u32,
    ))
}
