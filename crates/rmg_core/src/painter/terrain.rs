use serde::{Deserialize, Serialize};

use super::Painter;
use crate::area::Area;
use crate::grid::MapGrid;
use crate::rng::MapRng;
use crate::texture::Terrain;

/// Stamps one terrain on every area cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainPainter {
    /// Terrain to stamp.
    pub terrain: Terrain,
}

impl TerrainPainter {
    /// Painter for `terrain`; strings parse as `texture|decoration`.
    #[must_use]
    pub fn new(terrain: impl Into<Terrain>) -> Self {
        Self {
            terrain: terrain.into(),
        }
    }
}

impl Painter for TerrainPainter {
    fn paint(&self, grid: &mut MapGrid, rng: &mut MapRng, area: &Area) {
        for &p in area.points() {
            if let Some(idx) = grid.tile_index(p) {
                grid.place_terrain_at(idx, &self.terrain, rng);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::painter::test_support::{grid, rect_area};

    #[test]
    fn test_stamps_texture_and_decoration() {
        let mut g = grid(8);
        let id = rect_area(&mut g, 1, 1, 3, 2);
        let area = g.area(id).unwrap().clone();
        TerrainPainter::new("forest|tree_oak").paint(&mut g, &mut MapRng::default(), &area);
        assert_eq!(g.texture(1, 1).unwrap(), "forest");
        assert_eq!(g.texture(2, 1).unwrap(), "forest");
        assert_eq!(g.texture(3, 1).unwrap(), "blank");
        assert_eq!(g.terrain_object(2, 1).unwrap().unwrap().template, "tree_oak");
    }

    #[test]
    fn test_random_terrain_picks_from_choices() {
        let mut g = grid(16);
        let id = rect_area(&mut g, 0, 0, 16, 16);
        let area = g.area(id).unwrap().clone();
        let painter = TerrainPainter::new(Terrain::random(vec![
            Terrain::simple("dirt"),
            Terrain::simple("grass"),
        ]));
        painter.paint(&mut g, &mut MapRng::from_seed_u64(2), &area);
        let grass = area
            .points()
            .iter()
            .filter(|p| g.texture(p.x, p.z).unwrap() == "grass")
            .count();
        assert!(grass > 0 && grass < 256);
    }
}
