//! # Procedural Map Generator
//!
//! Turns three noise channels (height, moisture, heat) plus a biome
//! catalog into concrete tile draws over a rectangular region.
//!
//! ## Regeneration Guarantee
//!
//! The tile-variant PRNG is reseeded per generation call from the world
//! seed and the region origin, so regenerating a previously evicted
//! region reproduces **bit-identical** tiles. A single shared PRNG
//! sequence would drift as other regions consume draws.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::biome::{default_catalog, BiomePreset};
use crate::noise::{Mulberry32, NoiseGenerator, Wave};
use crate::renderer::TileRenderer;

/// Errors produced while building a map generator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenError {
    /// The biome catalog has no entries, so the fallback-to-first-entry
    /// selection policy would be undefined.
    #[error("biome catalog is empty")]
    EmptyBiomeCatalog,
}

/// Generation parameters for the map generator.
///
/// Loaded once at startup (typically from TOML via the streaming crate)
/// and never mutated afterward.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// World seed; drives tile-variant selection.
    pub seed: u32,
    /// Noise sample scale, applied after the region offset.
    pub scale: f64,
    /// Base 2D offset added to every region origin, in cell units.
    pub offset: (f64, f64),
    /// Wave stack for the height channel.
    pub height_waves: Vec<Wave>,
    /// Wave stack for the moisture channel.
    pub moisture_waves: Vec<Wave>,
    /// Wave stack for the heat channel.
    pub heat_waves: Vec<Wave>,
    /// Biome catalog; entry 0 is the no-match fallback.
    pub biomes: Vec<BiomePreset>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            seed: 0xDEAD_CAFE,
            scale: 1.0,
            offset: (0.0, 0.0),
            height_waves: vec![Wave::new(56.0, 0.05, 1.0), Wave::new(199.36, 0.1, 0.5)],
            moisture_waves: vec![Wave::new(621.0, 0.03, 1.0)],
            heat_waves: vec![Wave::new(318.6, 0.04, 1.0), Wave::new(329.7, 0.02, 0.5)],
            biomes: default_catalog(),
        }
    }
}

/// Deterministic tile/biome assignment over rectangular regions.
///
/// Pure function of its configuration and the region origin; the only
/// effect is the draw calls issued to the renderer collaborator.
#[derive(Clone, Debug)]
pub struct ProceduralMapGenerator {
    /// Immutable generation parameters.
    config: MapConfig,
}

impl ProceduralMapGenerator {
    /// Builds a generator, validating the biome catalog.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::EmptyBiomeCatalog`] when the catalog has no
    /// entries.
    pub fn new(config: MapConfig) -> Result<Self, GenError> {
        if config.biomes.is_empty() {
            return Err(GenError::EmptyBiomeCatalog);
        }
        Ok(Self { config })
    }

    /// Generates tiles for a `width` x `height` region anchored at
    /// `origin` (world cell units), issuing one draw call per cell.
    pub fn generate_map<R: TileRenderer>(
        &self,
        width: u32,
        height: u32,
        origin: (i32, i32),
        renderer: &mut R,
    ) {
        let config = &self.config;
        let offset = (
            config.offset.0 + f64::from(origin.0),
            config.offset.1 + f64::from(origin.1),
        );

        let height_map =
            NoiseGenerator::generate(width, height, config.scale, &config.height_waves, offset);
        let moisture_map =
            NoiseGenerator::generate(width, height, config.scale, &config.moisture_waves, offset);
        let heat_map =
            NoiseGenerator::generate(width, height, config.scale, &config.heat_waves, offset);

        // Region-local PRNG: reseeded from the world seed and the origin
        // so eviction and regeneration reproduce the same variants.
        let mut rng = Mulberry32::new(derive_region_seed(config.seed, origin));

        for x in 0..width {
            for y in 0..height {
                let h = height_map.get(x, y);
                let m = moisture_map.get(x, y);
                let t = heat_map.get(x, y);

                let biome = self.select_biome(h, m, t);
                let sprite = biome.pick_tile(&mut rng);
                renderer.draw_tile(origin.0 + x as i32, origin.1 + y as i32, sprite);
            }
        }

        tracing::debug!(width, height, ?origin, "generated map region");
    }

    /// Selects the tightest-fitting biome for one cell.
    ///
    /// All matching presets compete on [`BiomePreset::slack`]; the
    /// smallest slack wins, first match winning ties. When nothing
    /// matches, catalog entry 0 is the defined fallback.
    #[must_use]
    pub fn select_biome(&self, height: f64, moisture: f64, heat: f64) -> &BiomePreset {
        let biomes = &self.config.biomes;

        let mut best: Option<&BiomePreset> = None;
        let mut best_slack = 0.0;
        for preset in biomes {
            if !preset.matches(height, moisture, heat) {
                continue;
            }
            let slack = preset.slack(height, moisture, heat);
            if best.is_none() || slack < best_slack {
                best = Some(preset);
                best_slack = slack;
            }
        }

        // Catalog is non-empty by construction.
        best.unwrap_or(&biomes[0])
    }

    /// Read access to the generation parameters.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &MapConfig {
        &self.config
    }
}

/// Derives the region-local PRNG seed from the world seed and origin.
///
/// FNV-style mixing; two regions with different origins get independent
/// variant streams, while the same origin always gets the same stream.
#[must_use]
const fn derive_region_seed(seed: u32, origin: (i32, i32)) -> u32 {
    let mut hash =
        (seed as u64) ^ (((origin.0 as u32 as u64) << 32) | (origin.1 as u32 as u64));
    hash = hash.wrapping_mul(0x517c_c1b7_2722_0a95);
    hash ^= hash >> 32;
    hash as u32
}
