use serde::{Deserialize, Serialize};

use super::Painter;
use crate::area::Area;
use crate::grid::MapGrid;
use crate::rng::MapRng;
use crate::tile_class::{TileClass, TileClassId};

fn apply(grid: &mut MapGrid, class: TileClassId, area: &Area, op: fn(&mut TileClass, usize)) {
    let indices: Vec<usize> = area
        .points()
        .iter()
        .filter_map(|&p| grid.tile_index(p))
        .collect();
    match grid.tile_class_mut(class) {
        Ok(tc) => indices.into_iter().for_each(|idx| op(tc, idx)),
        Err(err) => tracing::warn!(%err, area = area.id().0, "Skipping tile class paint"),
    }
}

/// Adds every area cell to a tile class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileClassPainter(pub TileClassId);

impl Painter for TileClassPainter {
    fn paint(&self, grid: &mut MapGrid, _rng: &mut MapRng, area: &Area) {
        apply(grid, self.0, area, TileClass::increment);
    }
}

/// Removes every area cell from a tile class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileClassUnPainter(pub TileClassId);

impl Painter for TileClassUnPainter {
    fn paint(&self, grid: &mut MapGrid, _rng: &mut MapRng, area: &Area) {
        apply(grid, self.0, area, TileClass::decrement);
    }
}
