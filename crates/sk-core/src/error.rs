//! Error taxonomy shared by the canvas model and the history manager.

use crate::geometry::{MAX_DIMENSION, Size};
use thiserror::Error;

/// Errors from canvas, snapshot, and history operations.
///
/// None of these are fatal: callers surface them as a no-op plus an
/// optional notice and keep the editing session alive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CanvasError {
    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,

    /// A snapshot does not fit the buffer it was applied to, or its pixel
    /// data does not match its declared dimensions.
    #[error("Buffer size mismatch: expected {expected}, found {found}")]
    BufferSizeMismatch { expected: Size, found: Size },

    #[error("Canvas size {size} exceeds the {max}px limit", max = MAX_DIMENSION)]
    CanvasTooLarge { size: Size },

    #[error("Failed to encode canvas state: {0}")]
    Encode(String),

    #[error("Failed to decode canvas state: {0}")]
    Decode(String),

    #[error("Failed to store canvas state: {0}")]
    Storage(String),
}

impl CanvasError {
    /// Empty-stack conditions that only deserve an informational notice.
    pub fn is_empty_history(&self) -> bool {
        matches!(self, Self::NothingToUndo | Self::NothingToRedo)
    }
}

pub type Result<T, E = CanvasError> = std::result::Result<T, E>;
