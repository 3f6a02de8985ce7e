//! Persisted canvas state: the live buffer plus both history stacks.
//!
//! Encoded as MessagePack and wrapped in standard base64 so it fits string
//! key-value stores such as `localStorage`.

use crate::buffer::{RawSnapshot, Snapshot};
use crate::error::{CanvasError, Result};
use base64::{Engine, engine::general_purpose};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Storage key under which the canvas state is kept.
pub const STORAGE_KEY: &str = "sketchboard.canvas";

/// String key-value storage (browser `localStorage`, a file, memory).
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<()>;
}

/// In-process storage, used by native hosts and tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// Serialized editor state: canvas plus undo/redo stacks (oldest first).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    pub canvas: Snapshot,
    pub undo: Vec<Snapshot>,
    pub redo: Vec<Snapshot>,
}

/// Wire form read before any snapshot is validated, so size errors keep
/// their own variant instead of surfacing as a generic decode failure.
#[derive(Deserialize)]
struct RawState {
    canvas: RawSnapshot,
    undo: Vec<RawSnapshot>,
    redo: Vec<RawSnapshot>,
}

impl PersistedState {
    pub fn encode(&self) -> Result<String> {
        let bytes = rmp_serde::to_vec(self).map_err(|e| CanvasError::Encode(e.to_string()))?;
        Ok(general_purpose::STANDARD.encode(bytes))
    }

    /// Decode and validate. Pixel data that does not match its declared
    /// dimensions, a canvas over the size limit, or a history entry with
    /// other dimensions than the canvas is treated as corruption.
    pub fn decode(encoded: &str) -> Result<Self> {
        let bytes = general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|e| CanvasError::Decode(e.to_string()))?;
        let raw: RawState =
            rmp_serde::from_slice(&bytes).map_err(|e| CanvasError::Decode(e.to_string()))?;

        let canvas = Snapshot::try_from(raw.canvas)?;
        let expected = canvas.size();
        if !expected.fits_canvas() {
            return Err(CanvasError::CanvasTooLarge { size: expected });
        }
        let entries = |raws: Vec<RawSnapshot>| -> Result<Vec<Snapshot>> {
            raws.into_iter()
                .map(|raw| {
                    let snapshot = Snapshot::try_from(raw)?;
                    if snapshot.size() != expected {
                        return Err(CanvasError::BufferSizeMismatch {
                            expected,
                            found: snapshot.size(),
                        });
                    }
                    Ok(snapshot)
                })
                .collect()
        };
        Ok(Self {
            canvas,
            undo: entries(raw.undo)?,
            redo: entries(raw.redo)?,
        })
    }

    pub fn save_to(&self, storage: &mut dyn Storage) -> Result<()> {
        let encoded = self.encode()?;
        log::debug!("persist: writing {} bytes to `{STORAGE_KEY}`", encoded.len());
        storage.set(STORAGE_KEY, encoded)
    }

    /// `Ok(None)` when nothing has been stored yet.
    pub fn load_from(storage: &dyn Storage) -> Result<Option<Self>> {
        match storage.get(STORAGE_KEY) {
            Some(encoded) => Self::decode(&encoded).map(Some),
            None => Ok(None),
        }
    }
}
