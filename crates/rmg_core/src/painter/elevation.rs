use serde::{Deserialize, Serialize};

use super::Painter;
use crate::area::Area;
use crate::grid::MapGrid;
use crate::rng::MapRng;

/// Sets the four corner vertices of every area cell to one elevation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElevationPainter {
    /// Elevation written to each corner.
    pub elevation: f32,
}

impl ElevationPainter {
    /// Flat painter at `elevation`.
    #[must_use]
    pub const fn new(elevation: f32) -> Self {
        Self { elevation }
    }
}

impl Painter for ElevationPainter {
    fn paint(&self, grid: &mut MapGrid, _rng: &mut MapRng, area: &Area) {
        for p in area.points() {
            for (dx, dz) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
                if let Some(idx) = grid.vertex_index(p.offset(dx, dz)) {
                    grid.set_height_at_index(idx, self.elevation);
                }
            }
        }
    }
}
