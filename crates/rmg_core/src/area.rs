//! Areas: immutable point sets committed by one generation step.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Identifier of a registered area. Ids start at 1 and only grow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AreaId(pub u32);

/// An identified, ordered set of tile points.
///
/// Points are shared, so handing an area to a painter while the grid is
/// being mutated is a cheap clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Area {
    id: AreaId,
    points: Arc<[Point]>,
}

impl Area {
    pub(crate) fn new(id: AreaId, points: Vec<Point>) -> Self {
        Self {
            id,
            points: points.into(),
        }
    }

    /// This area's id.
    #[must_use]
    pub const fn id(&self) -> AreaId {
        self.id
    }

    /// Points in placement order.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the area has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
