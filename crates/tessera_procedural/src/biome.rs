//! # Biome Presets
//!
//! Threshold-matched terrain classification.
//!
//! A biome is a named rule: a cell belongs to the biome when its sampled
//! height, moisture and heat all clear the preset's minimums. When several
//! presets match, the *tightest fitting* one wins - the preset with the
//! smallest total slack over its thresholds (see
//! [`BiomePreset::slack`]).

use serde::{Deserialize, Serialize};

use crate::noise::Mulberry32;

/// One drawable tile variant: an index into a sprite atlas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileSprite {
    /// Sprite index within the atlas.
    pub index: u32,
    /// Which atlas the sprite lives in.
    pub atlas: u32,
}

impl TileSprite {
    /// Creates a new tile sprite reference.
    #[inline]
    #[must_use]
    pub const fn new(index: u32, atlas: u32) -> Self {
        Self { index, atlas }
    }
}

/// A threshold rule plus the tile variants it may draw.
///
/// Presets are read-only catalog entries; they are never mutated after
/// the catalog is built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BiomePreset {
    /// Human-readable biome name, used in logs and config files.
    pub name: String,
    /// Minimum height for a cell to match.
    pub min_height: f64,
    /// Minimum moisture for a cell to match.
    pub min_moisture: f64,
    /// Minimum heat for a cell to match.
    pub min_heat: f64,
    /// Tile variants drawn for this biome, picked uniformly.
    pub tiles: Vec<TileSprite>,
}

impl BiomePreset {
    /// Creates a preset from thresholds and a tile table.
    #[must_use]
    pub fn new(
        name: &str,
        min_height: f64,
        min_moisture: f64,
        min_heat: f64,
        tiles: Vec<TileSprite>,
    ) -> Self {
        Self {
            name: name.to_owned(),
            min_height,
            min_moisture,
            min_heat,
            tiles,
        }
    }

    /// Returns true when all three sampled values clear the minimums.
    #[inline]
    #[must_use]
    pub fn matches(&self, height: f64, moisture: f64, heat: f64) -> bool {
        height >= self.min_height && moisture >= self.min_moisture && heat >= self.min_heat
    }

    /// Total excess of the sampled values over the preset minimums.
    ///
    /// Among matching presets, the one with the smallest slack is the
    /// tightest fit and wins selection.
    #[inline]
    #[must_use]
    pub fn slack(&self, height: f64, moisture: f64, heat: f64) -> f64 {
        (height - self.min_height) + (moisture - self.min_moisture) + (heat - self.min_heat)
    }

    /// Picks one tile variant with a single PRNG draw.
    ///
    /// Advances the PRNG state. An empty tile table falls back to the
    /// default sprite rather than panicking.
    #[must_use]
    pub fn pick_tile(&self, rng: &mut Mulberry32) -> TileSprite {
        let draw = rng.next();
        if self.tiles.is_empty() {
            return TileSprite::default();
        }
        // draw < 1.0, so the index never reaches tiles.len().
        let index = (draw * self.tiles.len() as f64) as usize;
        self.tiles[index]
    }
}

/// The built-in seven-biome catalog.
///
/// Ocean sits at index 0 and doubles as the fallback when no preset
/// matches a cell. Thresholds are the classic height/moisture/heat
/// minimums this engine shipped with.
#[must_use]
pub fn default_catalog() -> Vec<BiomePreset> {
    vec![
        BiomePreset::new("ocean", 0.0, 0.0, 0.0, vec![TileSprite::new(0, 0)]),
        BiomePreset::new("tundra", 0.2, 0.0, 0.0, vec![TileSprite::new(1, 0)]),
        BiomePreset::new("mountains", 0.2, 0.0, 0.0, vec![TileSprite::new(2, 0)]),
        BiomePreset::new("grassland", 0.2, 0.5, 0.3, vec![TileSprite::new(3, 0)]),
        BiomePreset::new("forest", 0.2, 0.4, 0.4, vec![TileSprite::new(4, 0)]),
        BiomePreset::new("jungle", 0.2, 0.5, 0.62, vec![TileSprite::new(5, 0)]),
        BiomePreset::new("desert", 0.2, 0.0, 0.5, vec![TileSprite::new(6, 0)]),
    ]
}
