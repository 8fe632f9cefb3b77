//! Random-walk paths built from a trail of small clumps.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::{ClumpPlacer, Placer};
use crate::constraint::Constraint;
use crate::geometry::Point;
use crate::grid::MapGrid;
use crate::rng::MapRng;

/// Walks from `start` toward `end` one tile at a time, turning randomly at
/// each step and stamping a coherent clump of radius `width` on the way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomPathPlacer {
    /// Nominal start of the walk.
    pub start: Point,
    /// Target of the walk.
    pub end: Point,
    /// Radius of the clump stamped at each step.
    pub width: f64,
    /// Start jitter, also the distance at which `end` counts as reached.
    pub offset: f64,
    /// Halve the maximum turn for a smoother trail.
    pub blended: bool,
}

impl RandomPathPlacer {
    /// Random walk from `start` to `end`.
    #[must_use]
    pub const fn new(start: Point, end: Point, width: f64, offset: f64, blended: bool) -> Self {
        Self {
            start,
            end,
            width,
            offset,
            blended,
        }
    }

    fn max_turn(&self) -> f64 {
        if self.blended {
            PI / 4.0
        } else {
            PI / 2.0
        }
    }
}

impl Placer for RandomPathPlacer {
    fn place(
        &self,
        grid: &MapGrid,
        rng: &mut MapRng,
        constraint: &Constraint,
    ) -> Option<Vec<Point>> {
        let jitter = rng.float_between(0.0, self.offset);
        let angle = rng.angle();
        let mut position = Point::round(
            f64::from(self.start.x) - jitter * angle.sin(),
            f64::from(self.start.z) + jitter * angle.cos(),
        );

        let mut clump = ClumpPlacer::new(PI * self.width * self.width, 1.0, 1.0, position)
            .with_fail_fraction(1.0);
        let reach = self.offset * self.offset;
        let max_steps = 2 * grid.size() as usize;

        let n = grid.size() as usize;
        let mut seen = vec![false; n * n];
        let mut points = Vec::new();
        let mut steps = 0;
        while (position.distance_squared(self.end) as f64) > reach && steps < max_steps {
            clump.center = position;
            for p in clump.place(grid, rng, constraint).unwrap_or_default() {
                let idx = p.z as usize * n + p.x as usize;
                if !seen[idx] {
                    seen[idx] = true;
                    points.push(p);
                }
            }

            let dx = f64::from(self.end.x - position.x);
            let dz = f64::from(self.end.z - position.z);
            let length = (dx * dx + dz * dz).sqrt();
            let turn = rng.float_between(-1.0, 1.0) * self.max_turn();
            let (sin, cos) = turn.sin_cos();
            let (ux, uz) = (dx / length, dz / length);
            position = Point::round(
                f64::from(position.x) + ux * cos - uz * sin,
                f64::from(position.z) + ux * sin + uz * cos,
            );
            steps += 1;
        }

        tracing::trace!(steps, points = points.len(), "Random path walked");
        (!points.is_empty()).then_some(points)
    }
}
