//! Reusable scratch storage for boundary-distance searches.
//!
//! Painters run many times per map. Instead of allocating visited and
//! distance grids per call, the grid owns one arena sized for the vertex
//! grid and painters borrow it. Visited flags are generation-stamped, so
//! starting a new search is O(1) rather than a full clear.

use std::collections::VecDeque;

/// A set of grid indices, cleared in O(1) by bumping an epoch.
#[derive(Debug, Clone, Default)]
pub(crate) struct StampSet {
    epoch: u32,
    stamps: Vec<u32>,
}

impl StampSet {
    /// Empty the set and make sure it can index `len` cells.
    pub(crate) fn reset(&mut self, len: usize) {
        if self.stamps.len() < len {
            self.stamps.resize(len, 0);
        }
        self.epoch = self.epoch.wrapping_add(1);
        if self.epoch == 0 {
            self.stamps.fill(0);
            self.epoch = 1;
        }
    }

    /// Insert `idx`; returns `true` if it was not already present.
    pub(crate) fn insert(&mut self, idx: usize) -> bool {
        if self.stamps[idx] == self.epoch {
            false
        } else {
            self.stamps[idx] = self.epoch;
            true
        }
    }

    pub(crate) fn contains(&self, idx: usize) -> bool {
        self.stamps[idx] == self.epoch
    }
}

/// Arena for one multi-source BFS plus a height working buffer.
#[derive(Debug, Clone, Default)]
pub(crate) struct BoundaryScratch {
    /// Cells reached by the search.
    pub(crate) visited: StampSet,
    /// Cells whose `buffer` entry is live.
    pub(crate) touched: StampSet,
    /// Distance from the boundary; valid where `visited` holds.
    pub(crate) distance: Vec<u32>,
    /// Working heights; valid where `touched` holds.
    pub(crate) buffer: Vec<f32>,
    /// BFS frontier.
    pub(crate) queue: VecDeque<usize>,
    /// Touched cells in first-touch order.
    pub(crate) order: Vec<usize>,
}

impl BoundaryScratch {
    /// Prepare for a search over `len` cells.
    pub(crate) fn begin(&mut self, len: usize) {
        self.visited.reset(len);
        self.touched.reset(len);
        if self.distance.len() < len {
            self.distance.resize(len, 0);
            self.buffer.resize(len, 0.0);
        }
        self.queue.clear();
        self.order.clear();
    }

    /// Enqueue `idx` at `distance` unless already visited.
    pub(crate) fn visit(&mut self, idx: usize, distance: u32) -> bool {
        if !self.visited.insert(idx) {
            return false;
        }
        self.distance[idx] = distance;
        self.queue.push_back(idx);
        true
    }

    /// Distance of a visited cell.
    pub(crate) fn distance(&self, idx: usize) -> Option<u32> {
        self.visited.contains(idx).then(|| self.distance[idx])
    }
}
