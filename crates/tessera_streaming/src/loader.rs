//! # Chunk Loader
//!
//! The generate/destroy bridge between chunk indices and the renderer.
//!
//! The loader owns the renderer and one map generator, tracks which
//! chunks it has materialized, and keeps both operations idempotent:
//! loading a loaded chunk and unloading an absent one are defined
//! no-ops, never errors.

use std::collections::HashSet;

use tessera_procedural::{ProceduralMapGenerator, TileRenderer};

use crate::chunk::ChunkIndex;

/// Materializes and destroys chunk tile regions.
pub struct ChunkLoader<R: TileRenderer> {
    /// Tile cells per chunk side.
    chunk_size: u32,
    /// The rendering surface all draws and clears go through.
    renderer: R,
    /// Deterministic tile generation.
    generator: ProceduralMapGenerator,
    /// Chunks currently materialized.
    loaded: HashSet<ChunkIndex>,
}

impl<R: TileRenderer> ChunkLoader<R> {
    /// Creates a loader over a renderer and generator.
    #[must_use]
    pub fn new(chunk_size: u32, renderer: R, generator: ProceduralMapGenerator) -> Self {
        Self {
            chunk_size,
            renderer,
            generator,
            loaded: HashSet::new(),
        }
    }

    /// Generates the chunk's tile region if it is not already loaded.
    ///
    /// Returns true when generation actually ran.
    pub fn load_chunk(&mut self, index: ChunkIndex) -> bool {
        if self.loaded.contains(&index) {
            return false;
        }

        let origin = index.origin(self.chunk_size);
        self.generator
            .generate_map(self.chunk_size, self.chunk_size, origin, &mut self.renderer);
        self.loaded.insert(index);
        tracing::debug!(?index, ?origin, "chunk generated");
        true
    }

    /// Clears the chunk's tile region if it is currently loaded.
    ///
    /// Returns true when destruction actually ran.
    pub fn unload_chunk(&mut self, index: ChunkIndex) -> bool {
        if !self.loaded.remove(&index) {
            return false;
        }

        let (ox, oy) = index.origin(self.chunk_size);
        let size = self.chunk_size as i32;
        for y in 0..size {
            for x in 0..size {
                self.renderer.clear_tile(ox + x, oy + y);
            }
        }
        tracing::debug!(?index, "chunk destroyed");
        true
    }

    /// Unloads every currently tracked chunk; used for teardown.
    pub fn unload_all_chunks(&mut self) {
        let indices: Vec<ChunkIndex> = self.loaded.iter().copied().collect();
        for index in indices {
            let _ = self.unload_chunk(index);
        }
    }

    /// Maps a world position to its governing chunk index.
    #[inline]
    #[must_use]
    pub fn chunk_index_from_position(&self, position: (f64, f64)) -> ChunkIndex {
        ChunkIndex::from_position(position, self.chunk_size)
    }

    /// True when the chunk is currently materialized.
    #[inline]
    #[must_use]
    pub fn is_loaded(&self, index: ChunkIndex) -> bool {
        self.loaded.contains(&index)
    }

    /// Number of chunks currently materialized.
    #[inline]
    #[must_use]
    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }

    /// Read access to the renderer collaborator.
    #[inline]
    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}
