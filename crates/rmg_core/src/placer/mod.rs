//! Placers: algorithms proposing a point set under a constraint.
//!
//! A placer never errors. When its starting position is unusable or too
//! many candidates are rejected it returns `None` and the caller moves on.
//!
//! | placer | shape | default fail fraction |
//! |--------|-------|-----------------------|
//! | [`RectPlacer`] | box | 0 |
//! | [`MapBoundsPlacer`] | whole map | 1 |
//! | [`HeightPlacer`] | height band | 1 |
//! | [`ClumpPlacer`] | noisy blob | 0 |
//! | [`ChainPlacer`] | chained disks | 0 |
//! | [`PathPlacer`] | winding ribbon | 5 |
//! | [`RandomPathPlacer`] | random walk of clumps | - |

mod bounds;
mod chain;
mod clump;
mod path;
mod random_path;

pub use bounds::{HeightBounds, HeightPlacer, MapBoundsPlacer, RectPlacer};
pub use chain::ChainPlacer;
pub use clump::ClumpPlacer;
pub use path::PathPlacer;
pub use random_path::RandomPathPlacer;

use crate::constraint::Constraint;
use crate::geometry::Point;
use crate::grid::MapGrid;
use crate::rng::MapRng;

/// Computes candidate point sets.
pub trait Placer {
    /// Propose a point set, or `None` if the placement is infeasible.
    ///
    /// Every returned point is on the map and satisfies `constraint`.
    fn place(&self, grid: &MapGrid, rng: &mut MapRng, constraint: &Constraint)
        -> Option<Vec<Point>>;
}

/// A placer whose origin can be moved between attempts.
pub trait CenteredPlacer: Placer {
    /// Move the placer's origin.
    fn set_center(&mut self, center: Point);
}

/// Accepts or rejects candidates, deduplicating accepted points.
pub(crate) struct Candidates<'a> {
    grid: &'a MapGrid,
    constraint: &'a Constraint,
    seen: Vec<bool>,
    points: Vec<Point>,
    rejected: usize,
    considered: usize,
}

impl<'a> Candidates<'a> {
    pub(crate) fn new(grid: &'a MapGrid, constraint: &'a Constraint) -> Self {
        let n = grid.size() as usize;
        Self {
            grid,
            constraint,
            seen: vec![false; n * n],
            points: Vec::new(),
            rejected: 0,
            considered: 0,
        }
    }

    /// Test a candidate; off-map candidates count as rejected.
    pub(crate) fn offer(&mut self, p: Point) -> bool {
        self.considered += 1;
        match self.grid.tile_index(p) {
            Some(idx) if self.constraint.allows(self.grid, p) => {
                if !self.seen[idx] {
                    self.seen[idx] = true;
                    self.points.push(p);
                }
                true
            }
            _ => {
                self.rejected += 1;
                false
            }
        }
    }

    /// Test a candidate; off-map candidates are ignored entirely.
    pub(crate) fn offer_on_map(&mut self, p: Point) {
        if self.grid.in_bounds(p) {
            self.offer(p);
        }
    }

    pub(crate) fn rejected(&self) -> usize {
        self.rejected
    }

    pub(crate) fn considered(&self) -> usize {
        self.considered
    }

    pub(crate) fn into_points(self) -> Vec<Point> {
        self.points
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::grid::MapGrid;
    use crate::settings::MapSettings;

    pub(crate) fn flat_grid(size: u32) -> MapGrid {
        MapGrid::new(&MapSettings::default().with_size(size)).unwrap()
    }
}
