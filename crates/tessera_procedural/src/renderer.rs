//! # Renderer Seam
//!
//! The engine never paints anything itself. Whatever actually displays
//! tiles implements [`TileRenderer`]; generation and streaming only call
//! through this trait. Both operations are assumed O(1) and
//! side-effect-only.

use crate::biome::TileSprite;

/// The rendering surface consumed by map generation and chunk eviction.
pub trait TileRenderer {
    /// Draws one tile sprite at a world grid cell.
    fn draw_tile(&mut self, x: i32, y: i32, sprite: TileSprite);

    /// Clears whatever tile occupies a world grid cell.
    fn clear_tile(&mut self, x: i32, y: i32);
}
