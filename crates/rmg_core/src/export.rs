//! Conversion of a finished grid into the engine's exchange format.
//!
//! - Heights become `u16` samples: `(h + SEA_LEVEL) * HEIGHT_UNITS_PER_METRE`,
//!   floored and clamped.
//! - Tiles are grouped in `PATCH_SIZE × PATCH_SIZE` patches, patch-major,
//!   each patch row-major. A map whose size is not a multiple of the patch
//!   size gets its last patches padded with texture 0.
//! - Entity positions move from tile units to world units (`CELL_SIZE`) and
//!   become fixed-point.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::{MapGenError, Result};
use crate::grid::MapGrid;
use crate::math::{fixed_serde, Fixed, Vec2Fixed};
use crate::texture::TextureId;

/// Elevation added to every height before scaling.
pub const SEA_LEVEL: f32 = 20.0;

/// Fixed-point height units per metre of elevation.
pub const HEIGHT_UNITS_PER_METRE: f32 = 92.0;

/// World units per tile edge.
pub const CELL_SIZE: u32 = 4;

/// Tiles per patch edge.
pub const PATCH_SIZE: u32 = 16;

/// One exported tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExportTile {
    /// Index into [`MapExport::texture_names`].
    pub index: TextureId,
    /// Blend priority; higher priorities blend over lower ones.
    pub priority: u32,
}

/// One exported entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExportEntity {
    /// Entity id.
    pub id: u32,
    /// Template name.
    pub template: String,
    /// Owning player.
    pub player: u32,
    /// Position in world units.
    pub position: Vec2Fixed,
    /// Terrain elevation under the entity.
    #[serde(with = "fixed_serde")]
    pub elevation: Fixed,
    /// Rotation around the vertical axis, radians.
    #[serde(with = "fixed_serde")]
    pub orientation: Fixed,
}

/// Everything the simulation needs to load a generated map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MapExport {
    /// Edge length in tiles.
    pub size: u32,
    /// Placed objects followed by tile decorations (row-major).
    pub entities: Vec<ExportEntity>,
    /// One sample per vertex, row-major over `(size + 1)²`.
    pub height: Vec<u16>,
    /// Texture names indexed by [`ExportTile::index`].
    pub texture_names: Vec<String>,
    /// Patch-tiled texture assignment.
    pub tiles: Vec<ExportTile>,
}

/// Convert an elevation to its exported fixed-point sample.
#[must_use]
pub fn height_to_sample(height: f32) -> u16 {
    ((height + SEA_LEVEL) * HEIGHT_UNITS_PER_METRE)
        .floor()
        .clamp(0.0, f32::from(u16::MAX)) as u16
}

fn to_fixed(value: f64) -> Fixed {
    if value.is_nan() {
        Fixed::ZERO
    } else {
        Fixed::saturating_from_num(value)
    }
}

impl MapExport {
    /// Build the export from a grid.
    #[must_use]
    pub fn from_grid(grid: &MapGrid) -> Self {
        let size = grid.size();
        let height = grid.heights().iter().map(|&h| height_to_sample(h)).collect();

        let patches = patches_per_side(size);
        let ids = grid.texture_ids();
        let mut tiles = Vec::with_capacity((patches * patches * PATCH_SIZE * PATCH_SIZE) as usize);
        for pz in 0..patches {
            for px in 0..patches {
                for j in 0..PATCH_SIZE {
                    for i in 0..PATCH_SIZE {
                        let x = px * PATCH_SIZE + i;
                        let z = pz * PATCH_SIZE + j;
                        let index = if x < size && z < size {
                            ids[(z * size + x) as usize]
                        } else {
                            0
                        };
                        tiles.push(ExportTile {
                            index,
                            priority: u32::from(index),
                        });
                    }
                }
            }
        }

        let entities = grid
            .objects()
            .iter()
            .chain(grid.terrain_objects())
            .map(|e| ExportEntity {
                id: e.id.0,
                template: e.template.clone(),
                player: e.player,
                position: Vec2Fixed::from_tile_units(e.x, e.z, CELL_SIZE),
                elevation: to_fixed(f64::from(grid.height_at(e.x, e.z))),
                orientation: to_fixed(e.orientation),
            })
            .collect::<Vec<_>>();

        tracing::info!(
            size,
            entities = entities.len(),
            textures = grid.texture_registry().len(),
            "Exported map"
        );

        Self {
            size,
            entities,
            height,
            texture_names: grid.texture_registry().names().to_vec(),
            tiles,
        }
    }

    /// Patches along one map edge.
    #[must_use]
    pub fn patches_per_side(&self) -> u32 {
        patches_per_side(self.size)
    }

    /// Exported tile at tile coordinates, undoing the patch layout.
    #[must_use]
    pub fn tile(&self, x: u32, z: u32) -> Option<&ExportTile> {
        if x >= self.size || z >= self.size {
            return None;
        }
        let patches = self.patches_per_side();
        let patch = (z / PATCH_SIZE) * patches + x / PATCH_SIZE;
        let offset = (z % PATCH_SIZE) * PATCH_SIZE + x % PATCH_SIZE;
        self.tiles
            .get((patch * PATCH_SIZE * PATCH_SIZE + offset) as usize)
    }

    /// Encode with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| MapGenError::Serialization(e.to_string()))
    }

    /// Decode from bincode.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes).map_err(|e| MapGenError::Serialization(e.to_string()))
    }

    /// Hash of the whole export, for determinism checks.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

fn patches_per_side(size: u32) -> u32 {
    size.div_ceil(PATCH_SIZE)
}
