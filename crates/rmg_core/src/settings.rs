//! Map generation settings.
//!
//! Settings can be built in code or loaded from RON:
//!
//! ```
//! use rmg_core::settings::MapSettings;
//!
//! let settings = MapSettings::from_ron_str(
//!     "(size: 128, base_height: 2.0, base_texture: \"sand\", seed: 7)",
//! ).unwrap();
//! assert_eq!(settings.size, 128);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MapGenError, Result};
use crate::rng::DEFAULT_SEED;

/// Largest supported map edge length in tiles.
pub const MAX_MAP_SIZE: u32 = 2048;

/// Map configuration for one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    /// Map edge length in tiles.
    pub size: u32,
    /// Initial elevation of every vertex.
    pub base_height: f32,
    /// Initial texture of every tile.
    pub base_texture: String,
    /// Random seed for deterministic generation.
    pub seed: u64,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            size: 128,
            base_height: 0.0,
            base_texture: "blank".to_string(),
            seed: DEFAULT_SEED,
        }
    }
}

impl MapSettings {
    /// Create a tiny map (64 tiles), mostly useful in tests.
    #[must_use]
    pub fn tiny() -> Self {
        Self {
            size: 64,
            ..Default::default()
        }
    }

    /// Create a small map (128 tiles).
    #[must_use]
    pub fn small() -> Self {
        Self {
            size: 128,
            ..Default::default()
        }
    }

    /// Create a medium map (192 tiles).
    #[must_use]
    pub fn medium() -> Self {
        Self {
            size: 192,
            ..Default::default()
        }
    }

    /// Create a large map (256 tiles).
    #[must_use]
    pub fn large() -> Self {
        Self {
            size: 256,
            ..Default::default()
        }
    }

    /// Set the random seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the map size.
    #[must_use]
    pub const fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    /// Set the base elevation.
    #[must_use]
    pub const fn with_base_height(mut self, height: f32) -> Self {
        self.base_height = height;
        self
    }

    /// Set the base texture.
    #[must_use]
    pub fn with_base_texture(mut self, texture: impl Into<String>) -> Self {
        self.base_texture = texture.into();
        self
    }

    /// Check that the settings describe a map the generator can build.
    pub fn validate(&self) -> Result<()> {
        if self.size == 0 || self.size > MAX_MAP_SIZE {
            return Err(MapGenError::InvalidMapSize(self.size));
        }
        if !self.base_height.is_finite() {
            return Err(MapGenError::SettingsParse {
                path: "<settings>".to_string(),
                message: format!("base_height must be finite, got {}", self.base_height),
            });
        }
        Ok(())
    }

    /// Parse and validate settings from a RON string.
    pub fn from_ron_str(source: &str) -> Result<Self> {
        Self::parse(source, "<string>")
    }

    /// Load and validate settings from a RON file.
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::parse(&source, &path.display().to_string())
    }

    fn parse(source: &str, label: &str) -> Result<Self> {
        let settings: Self = ron::from_str(source).map_err(|e| MapGenError::SettingsParse {
            path: label.to_string(),
            message: e.to_string(),
        })?;
        settings.validate()?;
        Ok(settings)
    }
}
