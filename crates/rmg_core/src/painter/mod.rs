//! Painters: commit an accepted area to the grid.
//!
//! Painting is a pure side effect. Painters never fail: an empty area is a
//! no-op, and a painter referring to something the grid does not know (an
//! unknown tile class, say) logs a warning and leaves the grid untouched.

mod elevation;
mod layered;
mod multi;
mod smooth;
mod terrain;
mod tile_class;

pub use elevation::ElevationPainter;
pub use layered::LayeredPainter;
pub use multi::MultiPainter;
pub use smooth::{SmoothElevationPainter, SmoothMode};
pub use terrain::TerrainPainter;
pub use tile_class::{TileClassPainter, TileClassUnPainter};

use std::fmt::Debug;

use crate::area::Area;
use crate::geometry::Point;
use crate::grid::MapGrid;
use crate::rng::MapRng;

/// Writes an area into the grid.
pub trait Painter: Debug {
    /// Apply this painter to every cell of `area`.
    fn paint(&self, grid: &mut MapGrid, rng: &mut MapRng, area: &Area);
}

/// A borrowed painter list paints its members in order.
impl Painter for [&dyn Painter] {
    fn paint(&self, grid: &mut MapGrid, rng: &mut MapRng, area: &Area) {
        for painter in self {
            painter.paint(grid, rng, area);
        }
    }
}

/// The 8-neighbourhood offsets, row by row.
pub(crate) const NEIGHBOURS_8: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Decode a row-major index over a grid `stride` wide.
pub(crate) fn point_of(idx: usize, stride: usize) -> Point {
    Point::new((idx % stride) as i32, (idx / stride) as i32)
}
