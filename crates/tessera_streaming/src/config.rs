//! # World Configuration
//!
//! The full configuration surface exposed to the host, loadable from
//! TOML. Everything here is read at initialization; the streaming
//! settings (`chunk_size`, `view_distance`) are additionally write-once
//! through the generator's setters and sealed afterward.

use serde::{Deserialize, Serialize};

use tessera_procedural::MapConfig;

use crate::error::{WorldError, WorldResult};

/// Complete world configuration: streaming plus generation parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Tile cells per chunk side. Must be positive.
    pub chunk_size: u32,
    /// View radius in chunks around each viewer. Zero loads nothing.
    pub view_distance: u32,
    /// Generation parameters (seed, scale, offset, waves, biomes).
    #[serde(flatten)]
    pub map: MapConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            chunk_size: 15,
            view_distance: 3,
            map: MapConfig::default(),
        }
    }
}

impl WorldConfig {
    /// Parses and validates a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidConfig`] for unparseable TOML or
    /// out-of-range values.
    pub fn from_toml_str(text: &str) -> WorldResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| WorldError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidConfig`] when the chunk size is
    /// zero or the scale is not a positive finite number. An empty
    /// biome catalog is reported at initialization instead, as
    /// [`tessera_procedural::GenError::EmptyBiomeCatalog`].
    pub fn validate(&self) -> WorldResult<()> {
        if self.chunk_size == 0 {
            return Err(WorldError::InvalidConfig(
                "chunk_size must be positive".to_owned(),
            ));
        }
        if !(self.map.scale.is_finite() && self.map.scale > 0.0) {
            return Err(WorldError::InvalidConfig(format!(
                "scale must be a positive finite number, got {}",
                self.map.scale
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = WorldConfig::default();
        assert_eq!(config.chunk_size, 15);
        assert_eq!(config.view_distance, 3);
        assert!(config.validate().is_ok());
        assert_eq!(config.map.biomes.len(), 7);
    }

    #[test]
    fn test_toml_round_trip() {
        let text = r#"
            chunk_size = 16
            view_distance = 5
            seed = 1337
            scale = 0.5
            offset = [10.0, -4.0]

            [[height_waves]]
            seed = 56.0
            frequency = 0.05
            amplitude = 1.0

            [[biomes]]
            name = "ocean"
            min_height = 0.0
            min_moisture = 0.0
            min_heat = 0.0
            tiles = [{ index = 0, atlas = 0 }]
        "#;

        let config = WorldConfig::from_toml_str(text).unwrap();
        assert_eq!(config.chunk_size, 16);
        assert_eq!(config.view_distance, 5);
        assert_eq!(config.map.seed, 1337);
        assert_eq!(config.map.offset, (10.0, -4.0));
        assert_eq!(config.map.height_waves.len(), 1);
        assert_eq!(config.map.biomes.len(), 1);
        assert_eq!(config.map.biomes[0].name, "ocean");
        // Unspecified sections fall back to defaults.
        assert_eq!(config.map.moisture_waves.len(), 1);
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let err = WorldConfig::from_toml_str("chunk_size = 0").unwrap_err();
        assert!(matches!(err, WorldError::InvalidConfig(_)));
    }

    #[test]
    fn test_bad_scale_rejected() {
        let err = WorldConfig::from_toml_str("scale = -1.0").unwrap_err();
        assert!(matches!(err, WorldError::InvalidConfig(_)));
    }

    #[test]
    fn test_garbage_toml_rejected() {
        let err = WorldConfig::from_toml_str("chunk_size = \"many\"").unwrap_err();
        assert!(matches!(err, WorldError::InvalidConfig(_)));
    }
}
