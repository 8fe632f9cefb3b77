//! Organic blobs grown by casting noisy rays from a centre cell.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::{Candidates, CenteredPlacer, Placer};
use crate::constraint::Constraint;
use crate::geometry::Point;
use crate::grid::MapGrid;
use crate::noise::perimeter_noise;
use crate::rng::MapRng;

/// A roughly circular blob of about `size` tiles.
///
/// Rays are cast from the centre of the centre cell, one per unit of an
/// enlarged perimeter. Each ray's length is the disk radius scaled by
/// smoothed perimeter noise; `coherence = 1` disables the noise and yields a
/// rasterised disk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClumpPlacer {
    /// Target area in tiles.
    pub size: f64,
    /// 0 is maximally ragged, 1 is a clean disk.
    pub coherence: f64,
    /// Higher values mean fewer noise control points.
    pub smoothness: f64,
    /// Tolerated rejected ray steps, as a share of `size`.
    pub fail_fraction: f64,
    /// Centre cell.
    pub center: Point,
}

impl ClumpPlacer {
    /// Clump of `size` tiles around `center`, with zero tolerance.
    #[must_use]
    pub const fn new(size: f64, coherence: f64, smoothness: f64, center: Point) -> Self {
        Self {
            size,
            coherence,
            smoothness,
            fail_fraction: 0.0,
            center,
        }
    }

    /// Set the tolerated share of rejected ray steps.
    #[must_use]
    pub const fn with_fail_fraction(mut self, fail_fraction: f64) -> Self {
        self.fail_fraction = fail_fraction;
        self
    }

    /// Radius of the disk with area `size`.
    #[must_use]
    pub fn radius(&self) -> f64 {
        (self.size / PI).sqrt()
    }
}

impl Placer for ClumpPlacer {
    fn place(
        &self,
        grid: &MapGrid,
        rng: &mut MapRng,
        constraint: &Constraint,
    ) -> Option<Vec<Point>> {
        if !grid.in_bounds(self.center) || !constraint.allows(grid, self.center) {
            return None;
        }

        let radius = self.radius();
        let perimeter = 8.0 * PI * radius;
        let samples = perimeter.ceil() as usize;
        let smoothness = self.smoothness.max(1.0 / samples as f64);
        let mut control_points = 1 + (1.0 / smoothness).floor() as usize;
        if control_points as f64 > 2.0 * PI * radius {
            control_points = (2.0 * PI * radius).floor() as usize + 1;
        }
        let noise = perimeter_noise(rng, samples, perimeter, control_points);

        let cx = f64::from(self.center.x) + 0.5;
        let cz = f64::from(self.center.z) + 0.5;
        let mut found = Candidates::new(grid, constraint);
        for (p, n) in noise.iter().enumerate() {
            let theta = 2.0 * PI * p as f64 / perimeter;
            let (sin, cos) = theta.sin_cos();
            let length = radius * (1.0 + (1.0 - self.coherence) * n);
            let (mut x, mut z) = (cx, cz);
            for _ in 0..length.ceil().max(0.0) as usize {
                found.offer(Point::new(x.floor() as i32, z.floor() as i32));
                x += sin;
                z += cos;
            }
        }

        if found.rejected() as f64 > self.size * self.fail_fraction {
            tracing::trace!(
                center = ?self.center,
                rejected = found.rejected(),
                "Clump placement infeasible"
            );
            return None;
        }
        Some(found.into_points())
    }
}

impl CenteredPlacer for ClumpPlacer {
    fn set_center(&mut self, center: Point) {
        self.center = center;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placer::test_support::flat_grid;

    fn disk_check(size: f64) {
        let grid = flat_grid(128);
        let mut rng = MapRng::from_seed_u64(7);
        let center = Point::new(64, 64);
        let clump = ClumpPlacer::new(size, 1.0, 1.0, center);
        let points = clump.place(&grid, &mut rng, &Constraint::Null).unwrap();
        let radius = clump.radius();

        let count = points.len() as f64;
        assert!((count - size).abs() <= size * 0.15 + 2.0, "size {size}: got {count}");

        let dist = |p: &Point| {
            let dx = f64::from(p.x) + 0.5 - 64.5;
            let dz = f64::from(p.z) + 0.5 - 64.5;
            (dx * dx + dz * dz).sqrt()
        };
        assert!(points.iter().all(|p| dist(p) <= radius + 1.5));
        for x in 40..90 {
            for z in 40..90 {
                let p = Point::new(x, z);
                if dist(&p) <= radius - 1.5 {
                    assert!(points.contains(&p), "size {size}: hole at {p:?}");
                }
            }
        }
    }

    #[test]
    fn test_coherent_clump_approximates_disk() {
        for size in [20.0, 50.0, 100.0, 200.0, 400.0, 1000.0] {
            disk_check(size);
        }
    }

    #[test]
    fn test_points_are_unique() {
        let grid = flat_grid(64);
        let mut rng = MapRng::from_seed_u64(1);
        let points = ClumpPlacer::new(150.0, 0.3, 0.5, Point::new(32, 32))
            .place(&grid, &mut rng, &Constraint::Null)
            .unwrap();
        let mut sorted = points.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), points.len());
    }

    #[test]
    fn test_center_must_be_allowed() {
        let grid = flat_grid(32);
        let mut rng = MapRng::default();
        let clump = ClumpPlacer::new(20.0, 1.0, 1.0, Point::new(5, 5)).with_fail_fraction(1.0);
        assert!(clump
            .place(&grid, &mut rng, &Constraint::within_rect(10, 10, 32, 32))
            .is_none());
        let off_map = ClumpPlacer::new(20.0, 1.0, 1.0, Point::new(-1, 5));
        assert!(off_map.place(&grid, &mut rng, &Constraint::Null).is_none());
    }

    #[test]
    fn test_fail_fraction_against_size() {
        let grid = flat_grid(32);
        let mut rng = MapRng::default();
        // Half of the clump hangs off the left edge.
        let strict = ClumpPlacer::new(50.0, 1.0, 1.0, Point::new(0, 16));
        assert!(strict.place(&grid, &mut rng, &Constraint::Null).is_none());

        let tolerant = strict.with_fail_fraction(100.0);
        let points = tolerant.place(&grid, &mut rng, &Constraint::Null).unwrap();
        assert!(points.iter().all(|p| grid.in_bounds(*p)));
        assert!(!points.is_empty());
    }

    #[test]
    fn test_same_seed_same_clump() {
        let grid = flat_grid(64);
        let clump = ClumpPlacer::new(120.0, 0.5, 0.5, Point::new(30, 30));
        let a = clump.place(&grid, &mut MapRng::from_seed_u64(9), &Constraint::Null);
        let b = clump.place(&grid, &mut MapRng::from_seed_u64(9), &Constraint::Null);
        assert_eq!(a, b);
    }
}
