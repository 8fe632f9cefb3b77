//! Tile classes: per-cell counters used for spatial bookkeeping.
//!
//! A cell "is in" a class while its counter is positive. Constraints ask
//! radius questions ("any member within 12 tiles?"), so membership is also
//! kept in one Fenwick tree per row and a disk query costs `O(r log n)`.

use serde::{Deserialize, Serialize};

use crate::error::{GridSpace, MapGenError, Result};
use crate::geometry::Point;

/// Radius cap for disk queries. Any larger radius already spans every cell
/// reachable from an `i32` centre on the largest map.
const MAX_REACH: i64 = 1 << 34;

/// Identifier of a tile class within one grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileClassId(pub u32);

/// Binary indexed tree over one row of membership flags.
#[derive(Debug, Clone)]
struct RowIndex {
    tree: Vec<i32>,
}

impl RowIndex {
    fn new(len: usize) -> Self {
        Self {
            tree: vec![0; len + 1],
        }
    }

    fn add(&mut self, index: usize, delta: i32) {
        let mut i = index + 1;
        while i < self.tree.len() {
            self.tree[i] += delta;
            i += i & i.wrapping_neg();
        }
    }

    /// Sum of `[0, end)`.
    fn prefix(&self, end: usize) -> i32 {
        let mut i = end;
        let mut sum = 0;
        while i > 0 {
            sum += self.tree[i];
            i -= i & i.wrapping_neg();
        }
        sum
    }

    /// Sum of `[start, end)`.
    fn range(&self, start: usize, end: usize) -> i32 {
        self.prefix(end) - self.prefix(start)
    }
}

/// Per-cell counter grid.
#[derive(Debug, Clone)]
pub struct TileClass {
    id: TileClassId,
    size: u32,
    counts: Vec<u32>,
    rows: Vec<RowIndex>,
}

/// Members and non-members found by a radius query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RadiusCount {
    /// Cells in the class.
    pub members: usize,
    /// In-map cells not in the class.
    pub non_members: usize,
}

impl TileClass {
    /// Create an empty class over a `size × size` grid.
    #[must_use]
    pub fn new(id: TileClassId, size: u32) -> Self {
        let n = size as usize;
        Self {
            id,
            size,
            counts: vec![0; n * n],
            rows: (0..n).map(|_| RowIndex::new(n)).collect(),
        }
    }

    /// This class's id.
    #[must_use]
    pub const fn id(&self) -> TileClassId {
        self.id
    }

    fn index(&self, p: Point) -> Result<usize> {
        if p.x < 0 || p.z < 0 || p.x as u32 >= self.size || p.z as u32 >= self.size {
            return Err(MapGenError::InvalidCoordinate {
                x: p.x,
                z: p.z,
                space: GridSpace::Tile,
                limit: self.size,
            });
        }
        Ok(p.z as usize * self.size as usize + p.x as usize)
    }

    /// Increment the counter of a cell.
    pub fn add(&mut self, p: Point) -> Result<()> {
        let idx = self.index(p)?;
        self.increment(idx);
        Ok(())
    }

    /// Decrement the counter of a cell; a cell already at zero is left alone.
    pub fn remove(&mut self, p: Point) -> Result<()> {
        let idx = self.index(p)?;
        self.decrement(idx);
        Ok(())
    }

    /// Counter value of a cell.
    pub fn count(&self, p: Point) -> Result<u32> {
        Ok(self.counts[self.index(p)?])
    }

    /// Whether a cell is in the class. Off-map cells never are.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        self.index(p).map(|i| self.counts[i] > 0).unwrap_or(false)
    }

    pub(crate) fn increment(&mut self, idx: usize) {
        let n = self.size as usize;
        self.counts[idx] += 1;
        if self.counts[idx] == 1 {
            self.rows[idx / n].add(idx % n, 1);
        }
    }

    pub(crate) fn decrement(&mut self, idx: usize) {
        let n = self.size as usize;
        if self.counts[idx] == 0 {
            return;
        }
        self.counts[idx] -= 1;
        if self.counts[idx] == 0 {
            self.rows[idx / n].add(idx % n, -1);
        }
    }

    /// Count members and non-members among in-map cells within Euclidean
    /// distance `radius` of `center`.
    #[must_use]
    pub fn count_in_radius(&self, center: Point, radius: f64) -> RadiusCount {
        let mut result = RadiusCount::default();
        if radius.is_nan() || radius < 0.0 {
            return result;
        }
        let n = self.size as i64;
        let cx = i64::from(center.x);
        let cz = i64::from(center.z);
        let reach = radius.floor().min(MAX_REACH as f64) as i64;
        let r2 = radius * radius;
        for z in (cz - reach).max(0)..=(cz + reach).min(n - 1) {
            let dz = z - cz;
            let half = (r2 - (dz * dz) as f64)
                .max(0.0)
                .sqrt()
                .floor()
                .min(MAX_REACH as f64) as i64;
            let lo = (cx - half).max(0);
            let hi = (cx + half + 1).min(n);
            if hi <= lo {
                continue;
            }
            let members = self.rows[z as usize].range(lo as usize, hi as usize) as usize;
            result.members += members;
            result.non_members += (hi - lo) as usize - members;
        }
        result
    }

    /// Number of members within `radius` of `center`.
    #[must_use]
    pub fn count_members_in_radius(&self, center: Point, radius: f64) -> usize {
        self.count_in_radius(center, radius).members
    }

    /// Number of in-map non-members within `radius` of `center`.
    #[must_use]
    pub fn count_non_members_in_radius(&self, center: Point, radius: f64) -> usize {
        self.count_in_radius(center, radius).non_members
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(size: u32) -> TileClass {
        TileClass::new(TileClassId(0), size)
    }

    #[test]
    fn test_add_remove_counts() {
        let mut tc = class(8);
        let p = Point::new(3, 4);
        tc.add(p).unwrap();
        tc.add(p).unwrap();
        assert_eq!(tc.count(p).unwrap(), 2);
        tc.remove(p).unwrap();
        assert!(tc.contains(p));
        tc.remove(p).unwrap();
        assert!(!tc.contains(p));
        tc.remove(p).unwrap();
        assert_eq!(tc.count(p).unwrap(), 0);
    }

    #[test]
    fn test_out_of_range_is_error() {
        let mut tc = class(8);
        assert!(matches!(
            tc.add(Point::new(8, 0)),
            Err(MapGenError::InvalidCoordinate { space: GridSpace::Tile, .. })
        ));
        assert!(!tc.contains(Point::new(-1, 2)));
    }

    #[test]
    fn test_radius_count_matches_brute_force() {
        let mut tc = class(16);
        for (x, z) in [(2, 2), (5, 7), (8, 8), (9, 8), (15, 15), (0, 12)] {
            tc.add(Point::new(x, z)).unwrap();
        }
        for &(cx, cz, r) in &[(8, 8, 0.0), (8, 8, 1.5), (4, 4, 4.2), (0, 0, 6.0), (15, 15, 3.0)] {
            let center = Point::new(cx, cz);
            let mut expected = RadiusCount::default();
            for z in 0..16 {
                for x in 0..16 {
                    let p = Point::new(x, z);
                    if (p.distance_squared(center) as f64) <= r * r {
                        if tc.contains(p) {
                            expected.members += 1;
                        } else {
                            expected.non_members += 1;
                        }
                    }
                }
            }
            assert_eq!(tc.count_in_radius(center, r), expected, "center {center:?} r {r}");
        }
    }

    #[test]
    fn test_huge_radius_covers_whole_map() {
        let mut tc = class(32);
        tc.add(Point::new(0, 31)).unwrap();
        for radius in [1e9, f64::MAX, f64::INFINITY] {
            let all = tc.count_in_radius(Point::new(5, 5), radius);
            assert_eq!(all, RadiusCount { members: 1, non_members: 32 * 32 - 1 });
        }
        let far = tc.count_in_radius(Point::new(i32::MIN, i32::MAX), f64::INFINITY);
        assert_eq!(far.members + far.non_members, 32 * 32);
        assert_eq!(tc.count_in_radius(Point::new(5, 5), f64::NAN), RadiusCount::default());
    }

    #[test]
    fn test_zero_radius_is_single_cell() {
        let mut tc = class(4);
        tc.add(Point::new(1, 1)).unwrap();
        let hit = tc.count_in_radius(Point::new(1, 1), 0.0);
        assert_eq!(hit, RadiusCount { members: 1, non_members: 0 });
    }
}
