//! The rendering-surface seam.
//!
//! History only ever reads and writes whole-buffer state through this
//! trait; brush rendering lives elsewhere.

use crate::buffer::{CanvasBuffer, Snapshot};
use crate::error::Result;
use crate::geometry::Size;

/// A drawing surface whose full pixel state can be captured and restored.
pub trait Surface {
    fn size(&self) -> Size;

    /// Deep copy of the current pixels.
    fn capture_snapshot(&self) -> Snapshot;

    /// Overwrite the surface with `snapshot`. Must fail with
    /// `BufferSizeMismatch` and leave the surface untouched when the
    /// dimensions differ.
    fn restore(&mut self, snapshot: &Snapshot) -> Result<()>;

    /// Swap in a new buffer, possibly of different dimensions.
    fn replace(&mut self, buffer: CanvasBuffer);
}

impl Surface for CanvasBuffer {
    fn size(&self) -> Size {
        CanvasBuffer::size(self)
    }

    fn capture_snapshot(&self) -> Snapshot {
        self.snapshot()
    }

    fn restore(&mut self, snapshot: &Snapshot) -> Result<()> {
        CanvasBuffer::restore(self, snapshot)
    }

    fn replace(&mut self, buffer: CanvasBuffer) {
        *self = buffer;
    }
}
