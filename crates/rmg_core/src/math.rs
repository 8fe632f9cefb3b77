//! Fixed-point math for exported world coordinates.
//!
//! Generation itself runs on `f32`/`f64` in a fixed operation order. Anything
//! that leaves the generator in world units is converted to fixed-point so
//! the exported data serializes to identical bytes on every client.

use fixed::types::I32F32;
use serde::{Deserialize, Serialize};

/// Fixed-point number type for exported world values.
///
/// Uses 32 bits for integer part and 32 bits for fractional part.
pub type Fixed = I32F32;

/// Fixed-point 2D vector (world x/z plane).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Vec2Fixed {
    /// X coordinate.
    #[serde(with = "fixed_serde")]
    pub x: Fixed,
    /// Z coordinate.
    #[serde(with = "fixed_serde")]
    pub z: Fixed,
}

/// Serde support for fixed-point numbers.
///
/// Serializes fixed-point numbers as their raw bit representation (i64)
/// to preserve exact precision across serialization boundaries.
pub mod fixed_serde {
    use super::Fixed;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a fixed-point number as its raw bit representation.
    pub fn serialize<S>(value: &Fixed, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.to_bits().serialize(serializer)
    }

    /// Deserialize a fixed-point number from its raw bit representation.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Fixed, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = i64::deserialize(deserializer)?;
        Ok(Fixed::from_bits(bits))
    }
}

impl Vec2Fixed {
    /// Create a new fixed-point vector.
    #[must_use]
    pub const fn new(x: Fixed, z: Fixed) -> Self {
        Self { x, z }
    }

    /// Convert a position in tile units to world units.
    #[must_use]
    pub fn from_tile_units(x: f64, z: f64, cell_size: u32) -> Self {
        let scale = f64::from(cell_size);
        Self::new(Fixed::from_num(x * scale), Fixed::from_num(z * scale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tile_units_scales_by_cell_size() {
        let v = Vec2Fixed::from_tile_units(2.5, 10.0, 4);
        assert_eq!(v.x, Fixed::from_num(10));
        assert_eq!(v.z, Fixed::from_num(40));
    }

    #[test]
    fn test_fixed_serde_preserves_bits() {
        let v = Vec2Fixed::new(Fixed::from_num(1) / Fixed::from_num(3), Fixed::from_num(-7));
        let bytes = bincode::serialize(&v).unwrap();
        let restored: Vec2Fixed = bincode::deserialize(&bytes).unwrap();
        assert_eq!(v, restored);
    }
}
