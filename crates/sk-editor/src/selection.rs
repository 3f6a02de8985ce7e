//! Rectangular selection with the pixels it covers.
//!
//! A selection lives for one drag-and-release gesture of the select tool
//! and is dropped on tool change, on Escape, or when a new one starts.

use sk_core::{CanvasBuffer, Point, Rect, Snapshot};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub rect: Rect,
    /// Pixels under `rect` at the moment the selection was made.
    pub pixels: Option<Snapshot>,
}

impl Selection {
    /// Select `rect` (clipped to the canvas) and capture its pixels.
    pub fn capture(buffer: &CanvasBuffer, rect: Rect) -> Option<Self> {
        let rect = rect.clip_to(buffer.size())?;
        Some(Self {
            rect,
            pixels: buffer.copy_region(rect),
        })
    }

    /// Selection from a finished drag. A click without movement selects
    /// nothing.
    pub fn from_drag(buffer: &CanvasBuffer, start: Point, end: Point) -> Option<Self> {
        if start == end {
            return None;
        }
        let rect = Rect::from_corners(start, end, buffer.size())?;
        Self::capture(buffer, rect)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.rect.x as i32, self.rect.y as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sk_core::{Color, Size};

    #[test]
    fn drag_captures_pixels() {
        let mut buffer = CanvasBuffer::filled(Size::new(10, 10), Color::WHITE);
        buffer.set_pixel(3, 3, Color::RED);

        let sel = Selection::from_drag(&buffer, Point::new(5, 5), Point::new(2, 2)).unwrap();
        assert_eq!(sel.rect, Rect::new(2, 2, 4, 4));
        assert_eq!(sel.origin(), Point::new(2, 2));
        let pixels = sel.pixels.unwrap();
        assert_eq!(pixels.pixel(1, 1), Some(Color::RED));
    }

    #[test]
    fn click_selects_nothing() {
        let buffer = CanvasBuffer::filled(Size::new(10, 10), Color::WHITE);
        assert_eq!(
            Selection::from_drag(&buffer, Point::new(4, 4), Point::new(4, 4)),
            None
        );
    }

    #[test]
    fn drag_off_canvas_selects_nothing() {
        let buffer = CanvasBuffer::filled(Size::new(10, 10), Color::WHITE);
        assert_eq!(
            Selection::from_drag(&buffer, Point::new(-8, -8), Point::new(-2, -3)),
            None
        );
    }
}
