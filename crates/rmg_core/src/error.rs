//! Error types for map generation.
//!
//! Only programmer errors live here. A placer that cannot satisfy its
//! constraint is a normal outcome and is reported as `None`, never as an
//! error.

use std::fmt;

use thiserror::Error;

/// Result type alias using [`MapGenError`].
pub type Result<T> = std::result::Result<T, MapGenError>;

/// Which coordinate space an accessor was indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridSpace {
    /// Tile (cell) coordinates, valid in `0..size`.
    Tile,
    /// Vertex (corner) coordinates, valid in `0..=size`.
    Vertex,
}

impl fmt::Display for GridSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tile => f.write_str("tile"),
            Self::Vertex => f.write_str("vertex"),
        }
    }
}

/// Top-level error type for all map generation errors.
#[derive(Debug, Error)]
pub enum MapGenError {
    /// A grid coordinate outside the valid range for its space.
    #[error("Invalid {space} coordinate ({x}, {z}): expected 0 <= x, z < {limit}")]
    InvalidCoordinate {
        /// X coordinate.
        x: i32,
        /// Z coordinate.
        z: i32,
        /// Coordinate space that was indexed.
        space: GridSpace,
        /// Exclusive upper bound of that space.
        limit: u32,
    },

    /// Map size outside the supported range.
    #[error("Invalid map size {0}: expected 1..={}", crate::settings::MAX_MAP_SIZE)]
    InvalidMapSize(u32),

    /// Malformed painter configuration.
    #[error("Invalid painter: {0}")]
    InvalidPainter(String),

    /// Tile class id that was never issued by this grid.
    #[error("Unknown tile class: {0}")]
    UnknownTileClass(u32),

    /// Area id that was never issued by this grid.
    #[error("Unknown area: {0}")]
    UnknownArea(u32),

    /// Every texture id is taken; the name could not be registered.
    #[error("Texture table full: cannot register '{0}'")]
    TextureTableFull(String),

    /// Settings file parsing error.
    #[error("Failed to parse settings '{path}': {message}")]
    SettingsParse {
        /// Path (or source label) of the settings.
        path: String,
        /// Error message.
        message: String,
    },

    /// Export encoding or decoding failed.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Filesystem error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
