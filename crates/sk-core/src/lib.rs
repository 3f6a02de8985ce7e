pub mod buffer;
pub mod color;
pub mod error;
pub mod geometry;
pub mod paint;
pub mod persist;
pub mod surface;

pub use buffer::{CanvasBuffer, Snapshot};
pub use color::Color;
pub use error::{CanvasError, Result};
pub use geometry::{MAX_DIMENSION, Point, Rect, Size};
pub use persist::{MemoryStorage, PersistedState, STORAGE_KEY, Storage};
pub use surface::Surface;
