//! Elevation changes blended into the surroundings by boundary distance.
//!
//! A vertex is a *member* when any of the up to four tiles around it belongs
//! to the area. A multi-source BFS starts from the non-member vertices
//! bordering the members (distance 0) and walks inward through members, so
//! every member learns how far it is from the area's edge. Members within
//! `blend_radius` of the edge get a partial change; the rest get the full
//! one. With a positive blend radius a final 3×3 weighted average (self
//! weighted 8) softens the result.

use serde::{Deserialize, Serialize};

use super::{point_of, Painter, NEIGHBOURS_8};
use crate::area::{Area, AreaId};
use crate::geometry::Point;
use crate::grid::MapGrid;
use crate::rng::MapRng;
use crate::scratch::BoundaryScratch;

/// How [`SmoothElevationPainter`] combines its elevation with the terrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SmoothMode {
    /// Move heights toward the elevation.
    Set,
    /// Add the elevation to current heights.
    Modify,
}

/// Raises or lowers an area with a blended rim.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothElevationPainter {
    /// Combination mode.
    pub mode: SmoothMode,
    /// Target elevation, or offset in [`SmoothMode::Modify`].
    pub elevation: f32,
    /// Rim width in vertices over which the change fades in.
    pub blend_radius: f32,
}

impl SmoothElevationPainter {
    /// Create a painter.
    #[must_use]
    pub const fn new(mode: SmoothMode, elevation: f32, blend_radius: f32) -> Self {
        Self {
            mode,
            elevation,
            blend_radius,
        }
    }

    fn blended(&self, current: f32, distance: Option<u32>) -> f32 {
        let share = match distance {
            Some(d) if self.blend_radius > 0.0 && d as f32 <= self.blend_radius => {
                Some((d as f32 - 1.0) / self.blend_radius)
            }
            _ => None,
        };
        match (self.mode, share) {
            (SmoothMode::Set, Some(a)) => a * self.elevation + (1.0 - a) * current,
            (SmoothMode::Modify, Some(a)) => current + a * self.elevation,
            (SmoothMode::Set, None) => self.elevation,
            (SmoothMode::Modify, None) => current + self.elevation,
        }
    }
}

fn is_member(grid: &MapGrid, id: AreaId, v: Point) -> bool {
    [(-1, -1), (0, -1), (-1, 0), (0, 0)]
        .iter()
        .any(|&(dx, dz)| grid.area_at(v.offset(dx, dz)) == Some(id))
}

impl Painter for SmoothElevationPainter {
    fn paint(&self, grid: &mut MapGrid, _rng: &mut MapRng, area: &Area) {
        if area.is_empty() {
            return;
        }
        let mut scratch = grid.take_scratch();
        self.paint_with(grid, area, &mut scratch);
        grid.restore_scratch(scratch);
    }
}

impl SmoothElevationPainter {
    fn paint_with(&self, grid: &mut MapGrid, area: &Area, s: &mut BoundaryScratch) {
        let id = area.id();
        let stride = grid.vertex_size() as usize;
        s.begin(stride * stride);

        // Members, deduplicated in first-seen order, and their heights.
        for p in area.points() {
            if grid.area_at(*p) != Some(id) {
                continue;
            }
            for (dx, dz) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
                if let Some(v) = grid.vertex_index(p.offset(dx, dz)) {
                    if s.touched.insert(v) {
                        s.buffer[v] = grid.height_at_index(v);
                        s.order.push(v);
                    }
                }
            }
        }
        let members = s.order.len();

        // Non-member neighbours seed the search and join the buffer.
        for i in 0..members {
            let v = point_of(s.order[i], stride);
            for (dx, dz) in NEIGHBOURS_8 {
                let n = v.offset(dx, dz);
                let Some(idx) = grid.vertex_index(n) else {
                    continue;
                };
                if s.touched.insert(idx) {
                    s.buffer[idx] = grid.height_at_index(idx);
                }
                if !is_member(grid, id, n) {
                    s.visit(idx, 0);
                }
            }
        }

        while let Some(idx) = s.queue.pop_front() {
            let d = s.distance[idx] + 1;
            let v = point_of(idx, stride);
            for (dx, dz) in NEIGHBOURS_8 {
                let n = v.offset(dx, dz);
                if let Some(next) = grid.vertex_index(n) {
                    if is_member(grid, id, n) {
                        s.visit(next, d);
                    }
                }
            }
        }

        for &v in &s.order[..members] {
            s.buffer[v] = self.blended(s.buffer[v], s.distance(v));
        }

        if self.blend_radius > 0.0 {
            for &v in &s.order[..members] {
                let p = point_of(v, stride);
                let mut sum = 8.0 * s.buffer[v];
                let mut count = 8.0;
                for (dx, dz) in NEIGHBOURS_8 {
                    if let Some(n) = grid.vertex_index(p.offset(dx, dz)) {
                        sum += s.buffer[n];
                        count += 1.0;
                    }
                }
                grid.set_height_at_index(v, sum / count);
            }
        } else {
            for &v in &s.order[..members] {
                grid.set_height_at_index(v, s.buffer[v]);
            }
        }

        tracing::trace!(area = id.0, members, "Smoothed elevation");
    }
}
