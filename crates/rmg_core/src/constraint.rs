//! Constraints: composable predicates gating which cells a placer accepts.
//!
//! Constraints are a closed set of variants so that recipes stay analyzable
//! (and serializable) instead of passing arbitrary closures around. They only
//! read the grid.

use serde::{Deserialize, Serialize};

use crate::area::AreaId;
use crate::geometry::{Point, Rect};
use crate::grid::MapGrid;
use crate::tile_class::TileClassId;

/// A predicate over candidate tiles.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Constraint {
    /// Allows every tile.
    #[default]
    Null,
    /// Allows a tile only if every inner constraint does.
    And(Vec<Constraint>),
    /// Rejects tiles currently claimed by the area.
    AvoidArea(AreaId),
    /// Rejects tiles painted with the texture.
    AvoidTexture(String),
    /// Rejects tiles with a class member within `distance`.
    AvoidClass {
        /// Class to keep away from.
        class: TileClassId,
        /// Euclidean radius in tiles.
        distance: f64,
    },
    /// Rejects tiles with a non-member of the class within `distance`.
    StayClass {
        /// Class to stay inside.
        class: TileClassId,
        /// Euclidean radius in tiles.
        distance: f64,
    },
    /// Allows tiles near the border of a class: a member within `outside`
    /// and a non-member within `inside`.
    BorderClass {
        /// Class whose border is targeted.
        class: TileClassId,
        /// Radius searched for non-members.
        inside: f64,
        /// Radius searched for members.
        outside: f64,
    },
    /// Allows only tiles inside the rectangle.
    WithinRect(Rect),
}

impl Constraint {
    /// Combine constraints with AND; an empty list allows everything.
    #[must_use]
    pub fn all(constraints: &[Constraint]) -> Self {
        match constraints {
            [] => Self::Null,
            [single] => single.clone(),
            many => Self::And(many.to_vec()),
        }
    }

    /// Avoid each `(class, distance)` pair.
    #[must_use]
    pub fn avoid_classes(pairs: &[(TileClassId, f64)]) -> Self {
        Self::all(
            &pairs
                .iter()
                .map(|&(class, distance)| Self::AvoidClass { class, distance })
                .collect::<Vec<_>>(),
        )
    }

    /// Stay inside each `(class, distance)` pair.
    #[must_use]
    pub fn stay_classes(pairs: &[(TileClassId, f64)]) -> Self {
        Self::all(
            &pairs
                .iter()
                .map(|&(class, distance)| Self::StayClass { class, distance })
                .collect::<Vec<_>>(),
        )
    }

    /// Allow only the half-open box `[x0, x1) × [z0, z1)`. Corners are not
    /// reordered, so `x1 <= x0` or `z1 <= z0` allows nothing.
    #[must_use]
    pub fn within_rect(x0: i32, z0: i32, x1: i32, z1: i32) -> Self {
        Self::WithinRect(Rect::half_open(x0, z0, x1, z1))
    }

    /// Allow only tiles at least `margin` tiles from the map edge. A margin of
    /// half the map or more allows nothing.
    #[must_use]
    pub fn within_map_margin(size: u32, margin: i32) -> Self {
        let size = size as i32;
        Self::within_rect(margin, margin, size - margin, size - margin)
    }

    /// Whether tile `p` passes. Off-map tiles pass only the `Null` constraint.
    #[must_use]
    pub fn allows(&self, grid: &MapGrid, p: Point) -> bool {
        match self {
            Self::Null => true,
            Self::And(inner) => inner.iter().all(|c| c.allows(grid, p)),
            _ if !grid.in_bounds(p) => false,
            Self::AvoidArea(id) => grid.area_at(p) != Some(*id),
            Self::AvoidTexture(name) => match grid.texture_registry().id(name) {
                Some(id) => grid.texture_id(p.x, p.z).is_ok_and(|t| t != id),
                None => true,
            },
            Self::AvoidClass { class, distance } => grid
                .tile_class(*class)
                .is_ok_and(|tc| tc.count_members_in_radius(p, *distance) == 0),
            Self::StayClass { class, distance } => grid
                .tile_class(*class)
                .is_ok_and(|tc| tc.count_non_members_in_radius(p, *distance) == 0),
            Self::BorderClass {
                class,
                inside,
                outside,
            } => grid.tile_class(*class).is_ok_and(|tc| {
                tc.count_members_in_radius(p, *outside) > 0
                    && tc.count_non_members_in_radius(p, *inside) > 0
            }),
            Self::WithinRect(rect) => rect.contains(p),
        }
    }
}
