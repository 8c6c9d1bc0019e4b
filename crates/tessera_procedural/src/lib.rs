//! # TESSERA Procedural Generation
//!
//! Deterministic tile generation for infinite, reproducible worlds.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same seed always produces the same tiles
//! 2. **Region-local**: Any rectangular region can be generated in
//!    isolation, in any order, with seam-free results
//! 3. **Reproducible**: Regenerating an evicted region is bit-identical
//! 4. **Renderer-agnostic**: All drawing goes through the
//!    [`TileRenderer`] trait
//!
//! ## Core Components
//!
//! - [`Mulberry32`]: Seeded PRNG for tile-variant selection
//! - [`NoiseGenerator`]: Wave-stacked 2D noise fields
//! - [`BiomePreset`]: Threshold-matched terrain classification
//! - [`ProceduralMapGenerator`]: Noise fields in, tile draws out
//!
//! ## Example
//!
//! ```rust,ignore
//! use tessera_procedural::{MapConfig, ProceduralMapGenerator};
//!
//! let generator = ProceduralMapGenerator::new(MapConfig::default())?;
//!
//! // Draw a 15x15 region anchored at (-7, -7) through a renderer.
//! generator.generate_map(15, 15, (-7, -7), &mut renderer);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod biome;
pub mod map;
pub mod noise;
pub mod renderer;

pub use biome::{default_catalog, BiomePreset, TileSprite};
pub use map::{GenError, MapConfig, ProceduralMapGenerator};
pub use noise::{Mulberry32, NoiseField, NoiseGenerator, Wave};
pub use renderer::TileRenderer;
