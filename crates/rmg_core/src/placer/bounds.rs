//! Placers that filter a fixed candidate set: a box, the map, a height band.

use serde::{Deserialize, Serialize};

use super::{Candidates, Placer};
use crate::constraint::Constraint;
use crate::geometry::{Point, Rect};
use crate::grid::MapGrid;
use crate::rng::MapRng;

fn filter<I>(
    grid: &MapGrid,
    constraint: &Constraint,
    candidates: I,
    fail_fraction: f64,
) -> Option<Vec<Point>>
where
    I: IntoIterator<Item = Point>,
{
    let mut found = Candidates::new(grid, constraint);
    for p in candidates {
        found.offer(p);
    }
    if found.rejected() as f64 > found.considered() as f64 * fail_fraction {
        tracing::trace!(
            rejected = found.rejected(),
            considered = found.considered(),
            "Bounded placement infeasible"
        );
        return None;
    }
    Some(found.into_points())
}

/// Every point of a half-open box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectPlacer {
    /// Box to fill.
    pub rect: Rect,
    /// Tolerated share of rejected points.
    pub fail_fraction: f64,
}

impl RectPlacer {
    /// Box `[x0, x1) × [z0, z1)` with zero tolerance.
    #[must_use]
    pub fn new(x0: i32, z0: i32, x1: i32, z1: i32) -> Self {
        Self {
            rect: Rect::half_open(x0, z0, x1, z1),
            fail_fraction: 0.0,
        }
    }

    /// Set the tolerated share of rejected points.
    #[must_use]
    pub const fn with_fail_fraction(mut self, fail_fraction: f64) -> Self {
        self.fail_fraction = fail_fraction;
        self
    }
}

impl Placer for RectPlacer {
    fn place(
        &self,
        grid: &MapGrid,
        _rng: &mut MapRng,
        constraint: &Constraint,
    ) -> Option<Vec<Point>> {
        filter(grid, constraint, self.rect.points(), self.fail_fraction)
    }
}

/// Every tile of the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapBoundsPlacer {
    /// Tolerated share of rejected points.
    pub fail_fraction: f64,
}

impl Default for MapBoundsPlacer {
    fn default() -> Self {
        Self { fail_fraction: 1.0 }
    }
}

impl Placer for MapBoundsPlacer {
    fn place(
        &self,
        grid: &MapGrid,
        _rng: &mut MapRng,
        constraint: &Constraint,
    ) -> Option<Vec<Point>> {
        let size = grid.size() as i32;
        filter(
            grid,
            constraint,
            Rect::new(0, 0, size, size).points(),
            self.fail_fraction,
        )
    }
}

/// How [`HeightPlacer`] treats the ends of its band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HeightBounds {
    /// `min < h < max`
    ExcludeMinExcludeMax,
    /// `min <= h < max`
    #[default]
    IncludeMinExcludeMax,
    /// `min < h <= max`
    ExcludeMinIncludeMax,
    /// `min <= h <= max`
    IncludeMinIncludeMax,
}

impl HeightBounds {
    /// Whether `h` lies in the band.
    #[must_use]
    pub fn contains(self, h: f32, min: f32, max: f32) -> bool {
        let above = match self {
            Self::IncludeMinExcludeMax | Self::IncludeMinIncludeMax => h >= min,
            Self::ExcludeMinExcludeMax | Self::ExcludeMinIncludeMax => h > min,
        };
        let below = match self {
            Self::ExcludeMinIncludeMax | Self::IncludeMinIncludeMax => h <= max,
            Self::ExcludeMinExcludeMax | Self::IncludeMinExcludeMax => h < max,
        };
        above && below
    }
}

/// Every tile whose corner height lies in a band.
///
/// A tile is judged by the vertex at its minimum corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeightPlacer {
    /// Band end handling.
    pub bounds: HeightBounds,
    /// Lower end of the band.
    pub min: f32,
    /// Upper end of the band.
    pub max: f32,
    /// Tolerated share of rejected in-band points.
    pub fail_fraction: f64,
}

impl HeightPlacer {
    /// Band `[min, max]` under `bounds`.
    #[must_use]
    pub fn new(bounds: HeightBounds, min: f32, max: f32) -> Self {
        Self {
            bounds,
            min,
            max,
            fail_fraction: 1.0,
        }
    }

    /// Set the tolerated share of rejected points.
    #[must_use]
    pub const fn with_fail_fraction(mut self, fail_fraction: f64) -> Self {
        self.fail_fraction = fail_fraction;
        self
    }
}

impl Placer for HeightPlacer {
    fn place(
        &self,
        grid: &MapGrid,
        _rng: &mut MapRng,
        constraint: &Constraint,
    ) -> Option<Vec<Point>> {
        let size = grid.size() as i32;
        let in_band = Rect::new(0, 0, size, size).points().filter(|p| {
            grid.vertex_index(*p)
                .is_some_and(|i| self.bounds.contains(grid.height_at_index(i), self.min, self.max))
        });
        filter(grid, constraint, in_band, self.fail_fraction)
    }
}
