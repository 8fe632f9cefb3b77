//! Concentric terrain bands measured from the area's edge.

use serde::{Deserialize, Serialize};

use super::{point_of, Painter, NEIGHBOURS_8};
use crate::area::Area;
use crate::error::{MapGenError, Result};
use crate::grid::MapGrid;
use crate::rng::MapRng;
use crate::scratch::BoundaryScratch;
use crate::texture::Terrain;

/// Paints bands of terrain by distance from the area's boundary.
///
/// Band `i` covers cells whose boundary distance is at most
/// `widths[0] + ... + widths[i]`; deeper cells get the last terrain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayeredPainter {
    terrains: Vec<Terrain>,
    widths: Vec<u32>,
}

impl LayeredPainter {
    /// Create a painter; there must be exactly one more terrain than widths.
    pub fn new(terrains: Vec<Terrain>, widths: Vec<u32>) -> Result<Self> {
        if terrains.len() != widths.len() + 1 {
            return Err(MapGenError::InvalidPainter(format!(
                "layered painter needs {} terrains for {} widths, got {}",
                widths.len() + 1,
                widths.len(),
                terrains.len()
            )));
        }
        Ok(Self { terrains, widths })
    }

    /// Terrains from the rim inward.
    #[must_use]
    pub fn terrains(&self) -> &[Terrain] {
        &self.terrains
    }

    /// Band widths from the rim inward.
    #[must_use]
    pub fn widths(&self) -> &[u32] {
        &self.widths
    }

    fn band(&self, distance: Option<u32>) -> &Terrain {
        let last = self.terrains.len() - 1;
        let Some(d) = distance else {
            return &self.terrains[last];
        };
        let mut edge = 0;
        for (i, w) in self.widths.iter().enumerate() {
            edge += w;
            if edge >= d {
                return &self.terrains[i];
            }
        }
        &self.terrains[last]
    }

    fn paint_with(
        &self,
        grid: &mut MapGrid,
        rng: &mut MapRng,
        area: &Area,
        s: &mut BoundaryScratch,
    ) {
        let stride = grid.size() as usize;
        s.begin(stride * stride);

        for &p in area.points() {
            if let Some(idx) = grid.tile_index(p) {
                s.touched.insert(idx);
            }
        }

        for &p in area.points() {
            for (dx, dz) in NEIGHBOURS_8 {
                if let Some(n) = grid.tile_index(p.offset(dx, dz)) {
                    if !s.touched.contains(n) {
                        s.visit(n, 0);
                    }
                }
            }
        }

        while let Some(idx) = s.queue.pop_front() {
            let d = s.distance[idx] + 1;
            let p = point_of(idx, stride);
            for (dx, dz) in NEIGHBOURS_8 {
                if let Some(n) = grid.tile_index(p.offset(dx, dz)) {
                    if s.touched.contains(n) {
                        s.visit(n, d);
                    }
                }
            }
        }

        for &p in area.points() {
            if let Some(idx) = grid.tile_index(p) {
                grid.place_terrain_at(idx, self.band(s.distance(idx)), rng);
            }
        }
    }
}

impl Painter for LayeredPainter {
    fn paint(&self, grid: &mut MapGrid, rng: &mut MapRng, area: &Area) {
        if area.is_empty() {
            return;
        }
        let mut scratch = grid.take_scratch();
        self.paint_with(grid, rng, area, &mut scratch);
        grid.restore_scratch(scratch);
    }
}
