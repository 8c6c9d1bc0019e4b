//! # Chunk Index Arithmetic
//!
//! A chunk is a fixed-size square region of the tile grid, addressed by
//! an integer pair in chunk-space. The index is a plain hashable key -
//! no string formatting, no sign ambiguity for negative coordinates.
//!
//! ## Geometry
//!
//! A chunk of size `s` at index `c` governs the world cells starting at
//! `c * s - floor(s / 2)` per axis. A world position maps back with
//! `floor((pos + s / 2) / s)` (float halving), the inverse of the origin
//! formula: a position at a chunk's nominal center lands in that chunk.

/// Identifies a chunk in chunk-space (not world units).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChunkIndex {
    /// X coordinate, in chunks.
    pub x: i32,
    /// Y coordinate, in chunks.
    pub y: i32,
}

impl ChunkIndex {
    /// Creates a new chunk index.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Maps a world position to the chunk index governing it.
    #[inline]
    #[must_use]
    pub fn from_position(position: (f64, f64), chunk_size: u32) -> Self {
        let size = f64::from(chunk_size);
        Self {
            x: ((position.0 + size / 2.0) / size).floor() as i32,
            y: ((position.1 + size / 2.0) / size).floor() as i32,
        }
    }

    /// Returns the world cell at this chunk's lower corner.
    #[inline]
    #[must_use]
    pub const fn origin(self, chunk_size: u32) -> (i32, i32) {
        let size = chunk_size as i32;
        (self.x * size - size / 2, self.y * size - size / 2)
    }

    /// Returns the index shifted by a chunk-space offset.
    #[inline]
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}
