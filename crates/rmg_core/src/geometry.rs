//! Integer grid points and rectangles.

use serde::{Deserialize, Serialize};

/// A point on the tile or vertex grid.
///
/// Coordinates are signed so that placers can produce off-map candidates
/// and reject them, rather than wrapping.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Point {
    /// X coordinate.
    pub x: i32,
    /// Z coordinate.
    pub z: i32,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Offset this point by `(dx, dz)`.
    #[must_use]
    pub const fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            z: self.z + dz,
        }
    }

    /// Squared Euclidean distance to another point.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> i64 {
        let dx = i64::from(self.x - other.x);
        let dz = i64::from(self.z - other.z);
        dx * dx + dz * dz
    }

    /// Round fractional coordinates half-up onto the grid.
    #[must_use]
    pub fn round(x: f64, z: f64) -> Self {
        Self::new(round_half_up(x), round_half_up(z))
    }
}

/// Round to the nearest integer, ties toward positive infinity.
#[must_use]
pub fn round_half_up(v: f64) -> i32 {
    (v + 0.5).floor() as i32
}

/// Half-open rectangle `[x0, x1) × [z0, z1)` on the tile grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    /// Minimum x (inclusive).
    pub x0: i32,
    /// Minimum z (inclusive).
    pub z0: i32,
    /// Maximum x (exclusive).
    pub x1: i32,
    /// Maximum z (exclusive).
    pub z1: i32,
}

impl Rect {
    /// Create a rectangle from two corners in any order.
    #[must_use]
    pub fn new(x0: i32, z0: i32, x1: i32, z1: i32) -> Self {
        Self {
            x0: x0.min(x1),
            z0: z0.min(z1),
            x1: x0.max(x1),
            z1: z0.max(z1),
        }
    }

    /// The half-open box `[x0, x1) × [z0, z1)` exactly as given; it is empty
    /// when `x1 <= x0` or `z1 <= z0`.
    #[must_use]
    pub const fn half_open(x0: i32, z0: i32, x1: i32, z1: i32) -> Self {
        Self { x0, z0, x1, z1 }
    }

    /// Whether the rectangle covers no cells.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.x1 <= self.x0 || self.z1 <= self.z0
    }

    /// Whether the point lies inside the rectangle.
    #[must_use]
    pub const fn contains(&self, p: Point) -> bool {
        p.x >= self.x0 && p.x < self.x1 && p.z >= self.z0 && p.z < self.z1
    }

    /// Number of cells covered.
    #[must_use]
    pub const fn area(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        ((self.x1 - self.x0) as usize) * ((self.z1 - self.z0) as usize)
    }

    /// Iterate the covered points, x-major.
    pub fn points(self) -> impl Iterator<Item = Point> {
        (self.x0..self.x1).flat_map(move |x| (self.z0..self.z1).map(move |z| Point::new(x, z)))
    }
}
