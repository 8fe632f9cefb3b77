//! Placed objects: resources, decoration, starting bases.

use serde::{Deserialize, Serialize};

/// Identifier of a placed entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// First id handed out by a grid; lower ids belong to player entities.
pub const FIRST_ENTITY_ID: u32 = 150;

/// Player number for unowned (gaia) objects.
pub const GAIA: u32 = 0;

/// An object waiting to be added to the grid.
///
/// Positions are in tile units, fractional, with `(0, 0)` at the map corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEntity {
    /// Template name understood by the simulation.
    pub template: String,
    /// Owning player.
    pub player: u32,
    /// X position in tile units.
    pub x: f64,
    /// Z position in tile units.
    pub z: f64,
    /// Rotation around the vertical axis, radians.
    pub orientation: f64,
}

impl NewEntity {
    /// Create a new object record.
    #[must_use]
    pub fn new(template: impl Into<String>, player: u32, x: f64, z: f64, orientation: f64) -> Self {
        Self {
            template: template.into(),
            player,
            x,
            z,
            orientation,
        }
    }
}

/// An object committed to the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Unique id.
    pub id: EntityId,
    /// Template name understood by the simulation.
    pub template: String,
    /// Owning player.
    pub player: u32,
    /// X position in tile units.
    pub x: f64,
    /// Z position in tile units.
    pub z: f64,
    /// Rotation around the vertical axis, radians.
    pub orientation: f64,
}

impl Entity {
    pub(crate) fn from_new(id: EntityId, object: NewEntity) -> Self {
        Self {
            id,
            template: object.template,
            player: object.player,
            x: object.x,
            z: object.z,
            orientation: object.orientation,
        }
    }
}
