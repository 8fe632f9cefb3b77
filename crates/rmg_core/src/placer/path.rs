//! Winding ribbons between two points, rasterised as triangle strips.

use serde::{Deserialize, Serialize};

use super::{Candidates, Placer};
use crate::constraint::Constraint;
use crate::geometry::{round_half_up, Point};
use crate::grid::MapGrid;
use crate::noise::path_noise;
use crate::rng::MapRng;

/// A ribbon from `start` to `end` with a noisy centre line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathPlacer {
    /// First end of the path.
    pub start: Point,
    /// Second end of the path.
    pub end: Point,
    /// Ribbon width in tiles.
    pub width: f64,
    /// Noise control points per four tiles of length.
    pub waviness: f64,
    /// Interpolated samples per four tiles of length.
    pub smoothness: f64,
    /// Noise amplitude per four tiles of length.
    pub offset: f64,
    /// Share of the width lost by the far end, 0 for a constant width.
    pub tapering: f64,
    /// Tolerated rejected cells, relative to `width × length`.
    pub fail_fraction: f64,
}

impl PathPlacer {
    /// Path with the given shape parameters and a fail fraction of 5.
    #[must_use]
    pub const fn new(
        start: Point,
        end: Point,
        width: f64,
        waviness: f64,
        smoothness: f64,
        offset: f64,
        tapering: f64,
    ) -> Self {
        Self {
            start,
            end,
            width,
            waviness,
            smoothness,
            offset,
            tapering,
            fail_fraction: 5.0,
        }
    }

    /// Set the tolerated rejected cells relative to `width × length`.
    #[must_use]
    pub const fn with_fail_fraction(mut self, fail_fraction: f64) -> Self {
        self.fail_fraction = fail_fraction;
        self
    }

    /// The two edge polylines of the ribbon.
    fn edges(&self, rng: &mut MapRng, length: f64) -> (Vec<Point>, Vec<Point>) {
        let (x1, z1) = (f64::from(self.start.x), f64::from(self.start.z));
        let (x2, z2) = (f64::from(self.end.x), f64::from(self.end.z));
        let dx = (x2 - x1) / length;
        let dz = (z2 - z1) / length;

        let steps = 1 + (length / 4.0 * self.waviness).floor() as usize;
        let substeps = 1 + (length / 4.0 * self.smoothness).floor() as usize;
        let amplitude = 1.0 + (length / 4.0 * self.offset).floor();
        let noise = path_noise(rng, steps, substeps, amplitude);
        let total = steps * substeps;
        let half_width = 0.5 * self.width;

        let centre: Vec<(f64, f64)> = (0..=total)
            .map(|j| {
                let t = j as f64 / total as f64;
                let x = x1 * (1.0 - t) + x2 * t;
                let z = z1 * (1.0 - t) + z2 * t;
                (x - dz * noise[j], z + dx * noise[j])
            })
            .collect();

        let mut left = Vec::with_capacity(total + 1);
        let mut right = Vec::with_capacity(total + 1);
        for (j, &(nx, nz)) in centre.iter().enumerate() {
            // The last sample reuses the direction of the final segment.
            let (a, b) = if j < total { (j, j + 1) } else { (j - 1, j) };
            let (sx, sz) = (centre[b].0 - centre[a].0, centre[b].1 - centre[a].1);
            let slope = (sx * sx + sz * sz).sqrt();
            let (sx, sz) = if slope > 0.0 { (sx / slope, sz / slope) } else { (dx, dz) };
            let tapered = (1.0 - j as f64 / total as f64 * self.tapering) * half_width;
            left.push(Point::round(nx + sz * tapered, nz - sx * tapered));
            right.push(Point::round(nx - sz * tapered, nz + sx * tapered));
        }
        (left, right)
    }
}

fn fill_line(found: &mut Candidates<'_>, z: i32, xa: f64, xb: f64) {
    let left = round_half_up(xa.min(xb));
    let right = round_half_up(xa.max(xb));
    for x in left..=right {
        found.offer_on_map(Point::new(x, z));
    }
}

/// Scan-fill a triangle with integer vertices.
fn fill_triangle(found: &mut Candidates<'_>, mut tri: [Point; 3]) {
    tri.sort_by_key(|p| p.z);
    let [a, b, c] = tri;
    let slope = |from: Point, to: Point| {
        if to.z == from.z {
            0.0
        } else {
            f64::from(to.x - from.x) / f64::from(to.z - from.z)
        }
    };
    let (ab, ac, bc) = (slope(a, b), slope(a, c), slope(b, c));
    let ax = f64::from(a.x);
    let bx = f64::from(b.x);

    if a.z == b.z {
        fill_line(found, a.z, ax, bx);
    } else {
        for z in a.z..=b.z {
            let dz = f64::from(z - a.z);
            fill_line(found, z, ax + ab * dz, ax + ac * dz);
        }
    }
    if b.z == c.z {
        fill_line(found, b.z, bx, f64::from(c.x));
    } else {
        for z in (b.z + 1)..=c.z {
            fill_line(found, z, bx + bc * f64::from(z - b.z), ax + ac * f64::from(z - a.z));
        }
    }
}

impl Placer for PathPlacer {
    fn place(
        &self,
        grid: &MapGrid,
        rng: &mut MapRng,
        constraint: &Constraint,
    ) -> Option<Vec<Point>> {
        let length = (self.start.distance_squared(self.end) as f64).sqrt();
        if length == 0.0 {
            tracing::trace!(start = ?self.start, "Zero-length path");
            return None;
        }
        let (left, right) = self.edges(rng, length);

        let mut found = Candidates::new(grid, constraint);
        for j in 1..left.len() {
            let (l0, l1, r0, r1) = (left[j - 1], left[j], right[j - 1], right[j]);
            fill_triangle(&mut found, [l1, l0, r0]);
            fill_triangle(&mut found, [l1, r0, r1]);
        }

        if found.rejected() as f64 > self.fail_fraction * self.width * length {
            tracing::trace!(
                start = ?self.start,
                end = ?self.end,
                rejected = found.rejected(),
                "Path placement infeasible"
            );
            return None;
        }
        Some(found.into_points())
    }
}
