//! Raster canvas buffer and immutable snapshots of it.
//!
//! The buffer is `width × height` RGBA pixels, row-major, 4 bytes each.
//! A [`Snapshot`] is a deep copy of the whole buffer or of a rectangular
//! region. Snapshots own their bytes outright, so mutating the buffer after
//! capture can never reach back into history.

use crate::color::Color;
use crate::error::{CanvasError, Result};
use crate::geometry::{Point, Rect, Size};
use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Bytes per pixel (RGBA).
pub const CHANNELS: usize = 4;

fn byte_len(size: Size) -> Option<usize> {
    size.checked_area()?.checked_mul(CHANNELS)
}

/// Validate that `len` bytes describe exactly `size` pixels. Dimensions
/// whose byte count overflows `usize` never match.
fn check_len(size: Size, len: usize) -> Result<()> {
    let expected = byte_len(size);
    if expected == Some(len) {
        return Ok(());
    }
    let rows = match (size.width as usize).checked_mul(CHANNELS) {
        None | Some(0) => 0,
        // Truncated data reports the complete rows present; excess data
        // reports the partial trailing row as well.
        Some(row) if expected.is_none_or(|expected| len < expected) => len / row,
        Some(row) => len.div_ceil(row),
    };
    Err(CanvasError::BufferSizeMismatch {
        expected: size,
        found: Size::new(size.width, u32::try_from(rows).unwrap_or(u32::MAX)),
    })
}

// ─── Canvas buffer ───────────────────────────────────────────────────────

/// The live, mutable pixel grid owned by the editor surface.
#[derive(Clone, PartialEq, Eq)]
pub struct CanvasBuffer {
    size: Size,
    pixels: Vec<u8>,
}

impl CanvasBuffer {
    /// A fully transparent buffer. Sides beyond
    /// [`MAX_DIMENSION`](crate::geometry::MAX_DIMENSION) are clamped; callers
    /// with untrusted sizes check [`Size::fits_canvas`].
    pub fn new(size: Size) -> Self {
        let size = size.clamp_to_max();
        // At most 16384² × 4 bytes, which fits even a 32-bit usize.
        let len = size.width as usize * size.height as usize * CHANNELS;
        Self {
            size,
            pixels: vec![0; len],
        }
    }

    /// A buffer with every pixel set to `color`.
    pub fn filled(size: Size, color: Color) -> Self {
        let mut buffer = Self::new(size);
        buffer.fill(color);
        buffer
    }

    /// Wrap raw RGBA bytes (e.g. from `getImageData`).
    pub fn from_raw(size: Size, pixels: Vec<u8>) -> Result<Self> {
        check_len(size, pixels.len())?;
        Ok(Self { size, pixels })
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn width(&self) -> u32 {
        self.size.width
    }

    pub fn height(&self) -> u32 {
        self.size.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.size.width as usize + x as usize) * CHANNELS
    }

    /// Color at `(x, y)`, or `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let i = self.offset(x, y);
        let px = &self.pixels[i..i + CHANNELS];
        Some(Color::from_bytes([px[0], px[1], px[2], px[3]]))
    }

    /// Set one pixel. Returns `false` when `(x, y)` is outside the canvas.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) -> bool {
        if x >= self.size.width || y >= self.size.height {
            return false;
        }
        let i = self.offset(x, y);
        self.pixels[i..i + CHANNELS].copy_from_slice(&color.to_bytes());
        true
    }

    pub fn fill(&mut self, color: Color) {
        let bytes = color.to_bytes();
        for px in self.pixels.chunks_exact_mut(CHANNELS) {
            px.copy_from_slice(&bytes);
        }
    }

    /// Fill one row span `[x0, x1)` on row `y`. Caller guarantees bounds.
    pub(crate) fn fill_span(&mut self, y: u32, x0: u32, x1: u32, color: Color) {
        let bytes = color.to_bytes();
        let start = self.offset(x0, y);
        let end = self.offset(x1, y);
        for px in self.pixels[start..end].chunks_exact_mut(CHANNELS) {
            px.copy_from_slice(&bytes);
        }
    }

    /// Deep copy of the whole buffer.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            size: self.size,
            pixels: self.pixels.clone().into_boxed_slice(),
        }
    }

    /// Overwrite the buffer with `snapshot`. Dimensions are checked before
    /// any byte is written, so a mismatch leaves the buffer untouched.
    pub fn restore(&mut self, snapshot: &Snapshot) -> Result<()> {
        if snapshot.size != self.size {
            return Err(CanvasError::BufferSizeMismatch {
                expected: self.size,
                found: snapshot.size,
            });
        }
        self.pixels.copy_from_slice(&snapshot.pixels);
        Ok(())
    }

    /// Capture the pixels under `rect` (clipped to the canvas).
    pub fn copy_region(&self, rect: Rect) -> Option<Snapshot> {
        let rect = rect.clip_to(self.size)?;
        let row = rect.width as usize * CHANNELS;
        let mut pixels = Vec::with_capacity(row * rect.height as usize);
        for y in rect.y..rect.bottom() {
            let start = self.offset(rect.x, y);
            pixels.extend_from_slice(&self.pixels[start..start + row]);
        }
        Some(Snapshot {
            size: rect.size(),
            pixels: pixels.into_boxed_slice(),
        })
    }

    /// Copy `region` into the buffer with its top-left corner at `at`.
    /// Parts falling outside the canvas are dropped. Returns whether any
    /// pixel was written.
    pub fn blit(&mut self, region: &Snapshot, at: Point) -> bool {
        let mut written = false;
        for ry in 0..region.size.height {
            let y = at.y as i64 + ry as i64;
            if y < 0 || y >= self.size.height as i64 {
                continue;
            }
            for rx in 0..region.size.width {
                let x = at.x as i64 + rx as i64;
                if x < 0 || x >= self.size.width as i64 {
                    continue;
                }
                let src = (ry as usize * region.size.width as usize + rx as usize) * CHANNELS;
                let dst = self.offset(x as u32, y as u32);
                self.pixels[dst..dst + CHANNELS]
                    .copy_from_slice(&region.pixels[src..src + CHANNELS]);
                written = true;
            }
        }
        written
    }
}

impl fmt::Debug for CanvasBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CanvasBuffer")
            .field("size", &self.size)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

impl From<Snapshot> for CanvasBuffer {
    fn from(snapshot: Snapshot) -> Self {
        Self {
            size: snapshot.size,
            pixels: snapshot.pixels.into_vec(),
        }
    }
}

// ─── Snapshot ────────────────────────────────────────────────────────────

/// Immutable deep copy of canvas pixels at one instant.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawSnapshot")]
pub struct Snapshot {
    size: Size,
    pixels: Box<[u8]>,
}

impl Snapshot {
    /// Build a snapshot from raw RGBA bytes. Data whose length does not
    /// match `size` is rejected as [`CanvasError::BufferSizeMismatch`].
    pub fn from_raw(size: Size, pixels: Vec<u8>) -> Result<Self> {
        check_len(size, pixels.len())?;
        Ok(Self {
            size,
            pixels: pixels.into_boxed_slice(),
        })
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let i = (y as usize * self.size.width as usize + x as usize) * CHANNELS;
        let px = &self.pixels[i..i + CHANNELS];
        Some(Color::from_bytes([px[0], px[1], px[2], px[3]]))
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("size", &self.size)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

struct Bytes<'a>(&'a [u8]);

impl Serialize for Bytes<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_bytes(self.0)
    }
}

impl Serialize for Snapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Snapshot", 3)?;
        state.serialize_field("width", &self.size.width)?;
        state.serialize_field("height", &self.size.height)?;
        state.serialize_field("pixels", &Bytes(&self.pixels))?;
        state.end()
    }
}

/// Wire form of a snapshot, validated on conversion.
#[derive(Deserialize)]
pub(crate) struct RawSnapshot {
    width: u32,
    height: u32,
    pixels: PixelBytes,
}

impl TryFrom<RawSnapshot> for Snapshot {
    type Error = CanvasError;

    fn try_from(raw: RawSnapshot) -> Result<Self> {
        Snapshot::from_raw(Size::new(raw.width, raw.height), raw.pixels.0)
    }
}

/// Accepts pixel data as a byte string or as a sequence of integers.
struct PixelBytes(Vec<u8>);

impl<'de> Deserialize<'de> for PixelBytes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct PixelVisitor;

        impl<'de> Visitor<'de> for PixelVisitor {
            type Value = PixelBytes;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("RGBA pixel bytes")
            }

            fn visit_bytes<E: de::Error>(self, v: &[u8]) -> std::result::Result<PixelBytes, E> {
                Ok(PixelBytes(v.to_vec()))
            }

            fn visit_byte_buf<E: de::Error>(
                self,
                v: Vec<u8>,
            ) -> std::result::Result<PixelBytes, E> {
                Ok(PixelBytes(v))
            }

            fn visit_seq<A: SeqAccess<'de>>(
                self,
                mut seq: A,
            ) -> std::result::Result<PixelBytes, A::Error> {
                // The length prefix is untrusted; grow on demand past 1 MiB.
                let mut out = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(1 << 20));
                while let Some(b) = seq.next_element::<u8>()? {
                    out.push(b);
                }
                Ok(PixelBytes(out))
            }
        }

        deserializer.deserialize_byte_buf(PixelVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn white(w: u32, h: u32) -> CanvasBuffer {
        CanvasBuffer::filled(Size::new(w, h), Color::WHITE)
    }

    #[test]
    fn snapshot_is_isolated_from_later_edits() {
        let mut buffer = white(4, 4);
        let snap = buffer.snapshot();
        buffer.set_pixel(1, 1, Color::BLACK);

        assert_eq!(snap.pixel(1, 1), Some(Color::WHITE));
        assert_eq!(buffer.pixel(1, 1), Some(Color::BLACK));
    }

    #[test]
    fn restore_round_trip() {
        let mut buffer = white(3, 2);
        let snap = buffer.snapshot();
        buffer.fill(Color::RED);
        buffer.restore(&snap).unwrap();
        assert_eq!(buffer, white(3, 2));
    }

    #[test]
    fn restore_rejects_other_dimensions_without_writing() {
        let mut buffer = white(4, 4);
        buffer.set_pixel(0, 0, Color::RED);
        let before = buffer.clone();

        let other = white(2, 8).snapshot();
        let err = buffer.restore(&other).unwrap_err();
        assert_eq!(
            err,
            CanvasError::BufferSizeMismatch {
                expected: Size::new(4, 4),
                found: Size::new(2, 8),
            }
        );
        assert_eq!(buffer, before);
    }

    #[test]
    fn truncated_data_is_a_size_mismatch() {
        let err = Snapshot::from_raw(Size::new(2, 3), vec![0; 2 * 4 * 2 + 3]).unwrap_err();
        assert_eq!(
            err,
            CanvasError::BufferSizeMismatch {
                expected: Size::new(2, 3),
                found: Size::new(2, 2),
            }
        );
        assert!(Snapshot::from_raw(Size::new(2, 3), vec![0; 24]).is_ok());
    }

    #[test]
    fn absurd_dimensions_never_match_short_data() {
        let huge = Size::new(u32::MAX, u32::MAX);
        let err = Snapshot::from_raw(huge, vec![0; 4]).unwrap_err();
        assert_eq!(
            err,
            CanvasError::BufferSizeMismatch {
                expected: huge,
                found: Size::new(u32::MAX, 0),
            }
        );
        assert!(CanvasBuffer::from_raw(huge, Vec::new()).is_err());
    }

    #[test]
    fn new_buffer_clamps_oversized_sides() {
        let buffer = CanvasBuffer::new(Size::new(u32::MAX, 2));
        assert_eq!(buffer.size(), Size::new(crate::geometry::MAX_DIMENSION, 2));
    }

    #[test]
    fn out_of_bounds_pixel_access() {
        let mut buffer = white(2, 2);
        assert_eq!(buffer.pixel(2, 0), None);
        assert!(!buffer.set_pixel(0, 2, Color::BLACK));
    }

    #[test]
    fn copy_region_and_blit() {
        let mut buffer = white(6, 6);
        buffer.set_pixel(1, 1, Color::RED);
        buffer.set_pixel(2, 2, Color::BLACK);

        let region = buffer.copy_region(Rect::new(1, 1, 2, 2)).unwrap();
        assert_eq!(region.size(), Size::new(2, 2));
        assert_eq!(region.pixel(0, 0), Some(Color::RED));
        assert_eq!(region.pixel(1, 1), Some(Color::BLACK));

        assert!(buffer.blit(&region, Point::new(4, 4)));
        assert_eq!(buffer.pixel(4, 4), Some(Color::RED));
        assert_eq!(buffer.pixel(5, 5), Some(Color::BLACK));
    }

    #[test]
    fn blit_clips_partially_offscreen() {
        let mut buffer = white(4, 4);
        let region = CanvasBuffer::filled(Size::new(3, 3), Color::BLACK).snapshot();
        assert!(buffer.blit(&region, Point::new(-2, 3)));
        assert_eq!(buffer.pixel(0, 3), Some(Color::BLACK));
        assert_eq!(buffer.pixel(1, 3), Some(Color::BLACK));
        assert_eq!(buffer.pixel(2, 3), Some(Color::WHITE));

        assert!(!buffer.blit(&region, Point::new(10, 10)));
    }

    #[test]
    fn snapshot_serde_validates_length() {
        let snap = white(2, 2).snapshot();
        let bytes = rmp_serde::to_vec(&snap).unwrap();
        let back: Snapshot = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(back, snap);

        #[derive(Serialize)]
        struct Forged {
            width: u32,
            height: u32,
            pixels: Vec<u8>,
        }
        let forged = rmp_serde::to_vec(&Forged {
            width: 2,
            height: 2,
            pixels: vec![255; 5],
        })
        .unwrap();
        assert!(rmp_serde::from_slice::<Snapshot>(&forged).is_err());
    }
}
