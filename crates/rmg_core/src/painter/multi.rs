use super::Painter;
use crate::area::Area;
use crate::grid::MapGrid;
use crate::rng::MapRng;

/// An owned, ordered list of painters applied one after another.
#[derive(Debug, Default)]
pub struct MultiPainter {
    painters: Vec<Box<dyn Painter>>,
}

impl MultiPainter {
    /// Empty painter list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a painter.
    #[must_use]
    pub fn with(mut self, painter: impl Painter + 'static) -> Self {
        self.painters.push(Box::new(painter));
        self
    }

    /// Number of painters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.painters.len()
    }

    /// Whether there are no painters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.painters.is_empty()
    }
}

impl Painter for MultiPainter {
    fn paint(&self, grid: &mut MapGrid, rng: &mut MapRng, area: &Area) {
        for painter in &self.painters {
            painter.paint(grid, rng, area);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::painter::test_support::{grid, rect_area};
    use crate::painter::{ElevationPainter, TerrainPainter};

    #[test]
    fn test_later_painters_win() {
        let mut g = grid(8);
        let id = rect_area(&mut g, 0, 0, 2, 2);
        let area = g.area(id).unwrap().clone();
        let multi = MultiPainter::new()
            .with(TerrainPainter::new("sand"))
            .with(ElevationPainter::new(1.0))
            .with(TerrainPainter::new("rock"));
        assert_eq!(multi.len(), 3);
        multi.paint(&mut g, &mut MapRng::default(), &area);
        assert_eq!(g.texture(0, 0).unwrap(), "rock");
        assert_eq!(g.height(2, 2).unwrap(), 1.0);
    }

    #[test]
    fn test_borrowed_list_paints_in_order() {
        let mut g = grid(8);
        let id = rect_area(&mut g, 0, 0, 1, 1);
        let area = g.area(id).unwrap().clone();
        let sand = TerrainPainter::new("sand");
        let rock = TerrainPainter::new("rock");
        let list: [&dyn Painter; 2] = [&rock, &sand];
        list[..].paint(&mut g, &mut MapRng::default(), &area);
        assert_eq!(g.texture(0, 0).unwrap(), "sand");
    }
}
