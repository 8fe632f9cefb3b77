//! Iterative growth by stamping disks on a moving frontier.

use serde::{Deserialize, Serialize};

use super::{Candidates, CenteredPlacer, Placer};
use crate::constraint::Constraint;
use crate::geometry::Point;
use crate::grid::MapGrid;
use crate::rng::MapRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    Unseen,
    Accepted,
    /// Accepted and on the frontier at this index.
    Frontier(usize),
}

/// Grows a region by repeatedly stamping filled disks centred on random
/// frontier cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainPlacer {
    /// Smallest random disk radius.
    pub min_radius: i32,
    /// Largest random disk radius.
    pub max_radius: i32,
    /// Number of disks.
    pub num_circles: usize,
    /// Tolerated share of rejected disk cells.
    pub fail_fraction: f64,
    /// Starting cell.
    pub center: Point,
    /// Frontier cells further than this (Chebyshev) from the centre are
    /// dropped; 0 keeps them all.
    pub fcc: i32,
    /// Radii used before random ones, consumed from the back.
    pub radius_queue: Vec<i32>,
}

impl ChainPlacer {
    /// Chain of `num_circles` disks with radii in `[min_radius, max_radius]`.
    #[must_use]
    pub fn new(min_radius: i32, max_radius: i32, num_circles: usize, center: Point) -> Self {
        Self {
            min_radius,
            max_radius,
            num_circles,
            fail_fraction: 0.0,
            center,
            fcc: 0,
            radius_queue: Vec::new(),
        }
    }

    /// Set the tolerated share of rejected disk cells.
    #[must_use]
    pub const fn with_fail_fraction(mut self, fail_fraction: f64) -> Self {
        self.fail_fraction = fail_fraction;
        self
    }

    /// Restrict the frontier to a Chebyshev radius around the centre.
    #[must_use]
    pub const fn with_fcc(mut self, fcc: i32) -> Self {
        self.fcc = fcc;
        self
    }

    /// Radii to use first; the last entry is used first.
    #[must_use]
    pub fn with_radius_queue(mut self, radius_queue: Vec<i32>) -> Self {
        self.radius_queue = radius_queue;
        self
    }

    fn outside_fcc(&self, p: Point) -> bool {
        self.fcc > 0
            && ((p.x - self.center.x).abs() > self.fcc || (p.z - self.center.z).abs() > self.fcc)
    }
}

impl Placer for ChainPlacer {
    fn place(
        &self,
        grid: &MapGrid,
        rng: &mut MapRng,
        constraint: &Constraint,
    ) -> Option<Vec<Point>> {
        if !grid.in_bounds(self.center) || !constraint.allows(grid, self.center) {
            return None;
        }

        let size = grid.size() as i32;
        let min_radius = self.min_radius.max(1).min(self.max_radius);
        let max_radius = self.max_radius.max(min_radius);
        let mut queue = self.radius_queue.clone();
        let mut cells = vec![Cell::Unseen; (size * size) as usize];
        let index = |p: Point| (p.z * size + p.x) as usize;

        let mut found = Candidates::new(grid, constraint);
        let mut frontier = vec![self.center];

        for _ in 0..self.num_circles {
            if frontier.is_empty() {
                break;
            }
            let c = frontier[rng.index(frontier.len())];
            let radius = match queue.pop() {
                Some(r) => r,
                None => rng.int_inclusive(min_radius, max_radius),
            };

            let (sx, sz) = ((c.x - radius).max(0), (c.z - radius).max(0));
            let (lx, lz) = ((c.x + radius).min(size - 1), (c.z + radius).min(size - 1));
            let radius2 = i64::from(radius) * i64::from(radius);

            for x in sx..=lx {
                for z in sz..=lz {
                    let p = Point::new(x, z);
                    if p.distance_squared(c) > radius2 || !found.offer(p) {
                        continue;
                    }
                    match cells[index(p)] {
                        Cell::Unseen => cells[index(p)] = Cell::Accepted,
                        Cell::Frontier(at) => {
                            frontier.remove(at);
                            cells[index(p)] = Cell::Accepted;
                            for q in &frontier[at..] {
                                if let Cell::Frontier(i) = &mut cells[index(*q)] {
                                    *i -= 1;
                                }
                            }
                        }
                        Cell::Accepted => {}
                    }
                }
            }

            for x in sx..=lx {
                for z in sz..=lz {
                    let p = Point::new(x, z);
                    if self.outside_fcc(p) || cells[index(p)] != Cell::Accepted {
                        continue;
                    }
                    let borders_unseen = [(-1, 0), (0, -1), (1, 0), (0, 1)]
                        .iter()
                        .any(|&(dx, dz)| {
                            let q = p.offset(dx, dz);
                            grid.in_bounds(q) && cells[index(q)] == Cell::Unseen
                        });
                    if borders_unseen {
                        frontier.push(p);
                        cells[index(p)] = Cell::Frontier(frontier.len() - 1);
                    }
                }
            }
        }

        if found.rejected() as f64 > found.considered() as f64 * self.fail_fraction {
            tracing::trace!(
                center = ?self.center,
                rejected = found.rejected(),
                considered = found.considered(),
                "Chain placement infeasible"
            );
            return None;
        }
        Some(found.into_points())
    }
}

impl CenteredPlacer for ChainPlacer {
    fn set_center(&mut self, center: Point) {
        self.center = center;
    }
}
