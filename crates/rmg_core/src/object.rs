//! Scattering entities around a centre: single object types and groups.

use serde::{Deserialize, Serialize};

use crate::constraint::Constraint;
use crate::entity::{EntityId, NewEntity};
use crate::error::Result;
use crate::geometry::Point;
use crate::grid::MapGrid;
use crate::rng::MapRng;
use crate::tile_class::TileClassId;

/// Candidates drawn for one object type before it gives up.
pub const MAX_PLACEMENT_FAILURES: usize = 20;

/// A random number of one entity template at random polar offsets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleObject {
    /// Template name.
    pub template: String,
    /// Fewest entities placed.
    pub min_count: u32,
    /// Most entities placed.
    pub max_count: u32,
    /// Smallest distance from the group centre.
    pub min_distance: f64,
    /// Largest distance from the group centre.
    pub max_distance: f64,
    /// Smallest orientation, radians.
    pub min_angle: f64,
    /// Largest orientation, radians.
    pub max_angle: f64,
}

impl SimpleObject {
    /// Between `min_count` and `max_count` copies of `template`, any
    /// orientation.
    #[must_use]
    pub fn new(
        template: impl Into<String>,
        min_count: u32,
        max_count: u32,
        min_distance: f64,
        max_distance: f64,
    ) -> Self {
        Self {
            template: template.into(),
            min_count,
            max_count,
            min_distance,
            max_distance,
            min_angle: 0.0,
            max_angle: std::f64::consts::TAU,
        }
    }

    /// Restrict the orientation range.
    #[must_use]
    pub const fn with_angles(mut self, min_angle: f64, max_angle: f64) -> Self {
        self.min_angle = min_angle;
        self.max_angle = max_angle;
        self
    }

    /// Draw positions around `center`, appending to `placed`.
    ///
    /// Returns `false`, leaving `placed` partially extended, once more than
    /// [`MAX_PLACEMENT_FAILURES`] candidates were rejected.
    fn place(
        &self,
        grid: &MapGrid,
        rng: &mut MapRng,
        placement: &Placement<'_>,
        placed: &mut Vec<NewEntity>,
    ) -> bool {
        let count = rng.int_inclusive(self.min_count as i32, self.max_count as i32);
        let max = f64::from(grid.size());
        let mut failures = 0;
        for _ in 0..count {
            loop {
                let distance = rng.float_between(self.min_distance, self.max_distance);
                let direction = rng.angle();
                let x = f64::from(placement.center.x) + 0.5 + distance * direction.cos();
                let z = f64::from(placement.center.z) + 0.5 + distance * direction.sin();

                let on_map = x >= 0.0 && z >= 0.0 && x < max && z < max;
                let crowded = placement.avoid_self
                    && placed.iter().any(|e| {
                        let (dx, dz) = (x - e.x, z - e.z);
                        dx * dx + dz * dz < 1.0
                    });
                let cell = Point::new(x.floor() as i32, z.floor() as i32);
                if on_map && !crowded && placement.constraint.allows(grid, cell) {
                    let orientation = rng.float_between(self.min_angle, self.max_angle);
                    placed.push(NewEntity::new(
                        self.template.clone(),
                        placement.player,
                        x,
                        z,
                        orientation,
                    ));
                    break;
                }

                failures += 1;
                if failures > MAX_PLACEMENT_FAILURES {
                    return false;
                }
            }
        }
        true
    }
}

struct Placement<'a> {
    center: Point,
    player: u32,
    avoid_self: bool,
    constraint: &'a Constraint,
}

/// Object types placed together around one centre, all or nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleGroup {
    /// Object types, placed in order.
    pub objects: Vec<SimpleObject>,
    /// Keep entities of this group at least one tile apart.
    pub avoid_self: bool,
    /// Class receiving the cell of every placed entity.
    pub tile_class: Option<TileClassId>,
    /// Group centre.
    pub center: Point,
}

impl SimpleGroup {
    /// Group of `objects` around `center`.
    #[must_use]
    pub fn new(objects: Vec<SimpleObject>, avoid_self: bool, center: Point) -> Self {
        Self {
            objects,
            avoid_self,
            tile_class: None,
            center,
        }
    }

    /// Record placed cells in `class`.
    #[must_use]
    pub const fn with_tile_class(mut self, class: TileClassId) -> Self {
        self.tile_class = Some(class);
        self
    }

    /// Move the group centre.
    pub fn set_center(&mut self, center: Point) {
        self.center = center;
    }

    /// Place every object or nothing.
    ///
    /// Returns the ids of the committed entities, or `None` when some object
    /// ran out of attempts. Fails only for a tile class the grid never issued.
    pub fn place(
        &self,
        grid: &mut MapGrid,
        rng: &mut MapRng,
        player: u32,
        constraint: &Constraint,
    ) -> Result<Option<Vec<EntityId>>> {
        if let Some(class) = self.tile_class {
            grid.tile_class(class)?;
        }

        let placement = Placement {
            center: self.center,
            player,
            avoid_self: self.avoid_self,
            constraint,
        };
        let mut placed = Vec::new();
        for object in &self.objects {
            if !object.place(grid, rng, &placement, &mut placed) {
                tracing::trace!(
                    template = %object.template,
                    center = ?self.center,
                    "Object group placement failed"
                );
                return Ok(None);
            }
        }

        let mut ids = Vec::with_capacity(placed.len());
        for entity in placed {
            let cell = Point::new(entity.x.floor() as i32, entity.z.floor() as i32);
            ids.push(grid.add_object(entity)?);
            if let Some(class) = self.tile_class {
                grid.add_to_class(class, cell)?;
            }
        }
        Ok(Some(ids))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::GAIA;
    use crate::settings::MapSettings;

    fn grid() -> MapGrid {
        MapGrid::new(&MapSettings::default().with_size(32)).unwrap()
    }

    #[test]
    fn test_group_places_counts_within_range() {
        let mut g = grid();
        let mut rng = MapRng::from_seed_u64(8);
        let group = SimpleGroup::new(
            vec![SimpleObject::new("tree", 3, 5, 0.0, 4.0)],
            true,
            Point::new(16, 16),
        );
        let ids = group
            .place(&mut g, &mut rng, GAIA, &Constraint::Null)
            .unwrap()
            .unwrap();
        assert!((3..=5).contains(&ids.len()));
        for e in g.objects() {
            let (dx, dz) = (e.x - 16.5, e.z - 16.5);
            assert!((dx * dx + dz * dz).sqrt() <= 4.0);
        }
    }

    #[test]
    fn test_avoid_self_keeps_spacing() {
        let mut g = grid();
        let mut rng = MapRng::from_seed_u64(1);
        let group = SimpleGroup::new(
            vec![SimpleObject::new("stone", 6, 6, 0.0, 5.0)],
            true,
            Point::new(16, 16),
        );
        group.place(&mut g, &mut rng, GAIA, &Constraint::Null).unwrap().unwrap();
        let objects = g.objects();
        for (i, a) in objects.iter().enumerate() {
            for b in &objects[i + 1..] {
                let (dx, dz) = (a.x - b.x, a.z - b.z);
                assert!(dx * dx + dz * dz >= 1.0);
            }
        }
    }

    #[test]
    fn test_failure_commits_nothing() {
        let mut g = grid();
        let tc = g.create_tile_class();
        let mut rng = MapRng::default();
        let group = SimpleGroup::new(
            vec![
                SimpleObject::new("stone", 1, 1, 0.0, 1.0),
                SimpleObject::new("metal", 1, 1, 0.0, 1.0),
            ],
            false,
            Point::new(16, 16),
        )
        .with_tile_class(tc);
        let outcome = group
            .place(&mut g, &mut rng, GAIA, &Constraint::within_rect(0, 0, 4, 4))
            .unwrap();
        assert!(outcome.is_none());
        assert!(g.objects().is_empty());
        assert!(!g.tile_class(tc).unwrap().contains(Point::new(16, 16)));
    }

    #[test]
    fn test_success_marks_tile_class() {
        let mut g = grid();
        let tc = g.create_tile_class();
        let mut rng = MapRng::default();
        let objects = vec![SimpleObject::new("cc", 1, 1, 0.0, 0.0)];
        let group = SimpleGroup::new(objects, false, Point::new(8, 9)).with_tile_class(tc);
        let ids = group.place(&mut g, &mut rng, 1, &Constraint::Null).unwrap().unwrap();
        assert_eq!(ids.len(), 1);
        assert_eq!(g.objects()[0].player, 1);
        assert_eq!((g.objects()[0].x, g.objects()[0].z), (8.5, 9.5));
        assert!(g.tile_class(tc).unwrap().contains(Point::new(8, 9)));
    }

    #[test]
    fn test_unknown_tile_class_is_error() {
        let mut g = grid();
        let group =
            SimpleGroup::new(vec![], false, Point::new(1, 1)).with_tile_class(TileClassId(4));
        assert!(group
            .place(&mut g, &mut MapRng::default(), GAIA, &Constraint::Null)
            .is_err());
    }
}
