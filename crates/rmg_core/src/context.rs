//! Orchestration: placer, constraint and painters glued into one step.

use crate::area::AreaId;
use crate::constraint::Constraint;
use crate::error::Result;
use crate::export::MapExport;
use crate::geometry::Point;
use crate::grid::MapGrid;
use crate::object::SimpleGroup;
use crate::painter::Painter;
use crate::placer::{CenteredPlacer, Placer};
use crate::rng::MapRng;
use crate::settings::MapSettings;

/// Failures tolerated per requested item by the multi-placement helpers.
pub const DEFAULT_RETRY_FACTOR: usize = 10;

/// A generation session: the grid plus the random source driving it.
///
/// All generation goes through one context so that the call sequence, and
/// with it the RNG stream, fully determines the result.
#[derive(Debug, Clone)]
pub struct MapContext {
    grid: MapGrid,
    rng: MapRng,
}

impl MapContext {
    /// Start a session from settings, seeding the RNG from `settings.seed`.
    pub fn new(settings: &MapSettings) -> Result<Self> {
        Ok(Self {
            grid: MapGrid::new(settings)?,
            rng: MapRng::from_seed_u64(settings.seed),
        })
    }

    /// Start a session with an injected RNG.
    pub fn with_rng(settings: &MapSettings, rng: MapRng) -> Result<Self> {
        Ok(Self {
            grid: MapGrid::new(settings)?,
            rng,
        })
    }

    /// The grid.
    #[must_use]
    pub fn grid(&self) -> &MapGrid {
        &self.grid
    }

    /// Mutable access to the grid, for direct edits between steps.
    pub fn grid_mut(&mut self) -> &mut MapGrid {
        &mut self.grid
    }

    /// The random source.
    pub fn rng(&mut self) -> &mut MapRng {
        &mut self.rng
    }

    /// Edge length in tiles.
    #[must_use]
    pub fn size(&self) -> u32 {
        self.grid.size()
    }

    /// A uniformly random tile.
    pub fn random_tile(&mut self) -> Point {
        let size = self.grid.size() as i32;
        let x = self.rng.int_inclusive(0, size - 1);
        let z = self.rng.int_inclusive(0, size - 1);
        Point::new(x, z)
    }

    /// Place once; on success register the area and paint it.
    ///
    /// Returns `None`, leaving the grid untouched, when the placement is
    /// infeasible or empty.
    pub fn create_area(
        &mut self,
        placer: &dyn Placer,
        painters: &[&dyn Painter],
        constraints: &[Constraint],
    ) -> Result<Option<AreaId>> {
        let constraint = Constraint::all(constraints);
        self.create_area_with(placer, painters, &constraint)
    }

    fn create_area_with(
        &mut self,
        placer: &dyn Placer,
        painters: &[&dyn Painter],
        constraint: &Constraint,
    ) -> Result<Option<AreaId>> {
        let points = match placer.place(&self.grid, &mut self.rng, constraint) {
            Some(points) if !points.is_empty() => points,
            _ => return Ok(None),
        };
        let id = self.grid.create_area(points)?;
        let area = self.grid.area(id)?.clone();
        painters.paint(&mut self.grid, &mut self.rng, &area);
        Ok(Some(id))
    }

    /// Create up to `amount` areas, each attempt centred on a random tile.
    ///
    /// Gives up once failures exceed `amount × retry_factor`.
    pub fn create_areas<P: CenteredPlacer>(
        &mut self,
        placer: &mut P,
        painters: &[&dyn Painter],
        constraints: &[Constraint],
        amount: usize,
        retry_factor: usize,
    ) -> Result<Vec<AreaId>> {
        self.create_areas_from(placer, painters, constraints, amount, retry_factor, |ctx| {
            Some(ctx.random_tile())
        })
    }

    /// Like [`MapContext::create_areas`], but each centre is a random point
    /// of a random area from `areas`.
    pub fn create_areas_in_areas<P: CenteredPlacer>(
        &mut self,
        placer: &mut P,
        painters: &[&dyn Painter],
        constraints: &[Constraint],
        amount: usize,
        retry_factor: usize,
        areas: &[AreaId],
    ) -> Result<Vec<AreaId>> {
        let mut pools = Vec::with_capacity(areas.len());
        for &id in areas {
            let area = self.grid.area(id)?;
            if !area.is_empty() {
                pools.push(area.clone());
            }
        }
        if pools.is_empty() {
            return Ok(Vec::new());
        }
        self.create_areas_from(placer, painters, constraints, amount, retry_factor, |ctx| {
            let area = &pools[ctx.rng.index(pools.len())];
            Some(area.points()[ctx.rng.index(area.len())])
        })
    }

    fn create_areas_from<P, F>(
        &mut self,
        placer: &mut P,
        painters: &[&dyn Painter],
        constraints: &[Constraint],
        amount: usize,
        retry_factor: usize,
        mut next_center: F,
    ) -> Result<Vec<AreaId>>
    where
        P: CenteredPlacer,
        F: FnMut(&mut Self) -> Option<Point>,
    {
        let constraint = Constraint::all(constraints);
        let max_failures = amount * retry_factor;
        let mut created = Vec::with_capacity(amount);
        let mut failures = 0;

        while created.len() < amount && failures <= max_failures {
            let Some(center) = next_center(self) else {
                break;
            };
            placer.set_center(center);
            match self.create_area_with(&*placer, painters, &constraint)? {
                Some(id) => created.push(id),
                None => failures += 1,
            }
        }

        if created.len() < amount {
            tracing::warn!(
                requested = amount,
                created = created.len(),
                failures,
                "Could not create all requested areas"
            );
        } else {
            tracing::debug!(created = created.len(), failures, "Created areas");
        }
        Ok(created)
    }

    /// Place up to `amount` object groups at random centres.
    ///
    /// Returns the number of groups placed.
    pub fn create_object_groups(
        &mut self,
        group: &mut SimpleGroup,
        player: u32,
        constraints: &[Constraint],
        amount: usize,
        retry_factor: usize,
    ) -> Result<usize> {
        let constraint = Constraint::all(constraints);
        let max_failures = amount * retry_factor;
        let mut placed = 0;
        let mut failures = 0;

        while placed < amount && failures <= max_failures {
            let center = self.random_tile();
            group.set_center(center);
            match group.place(&mut self.grid, &mut self.rng, player, &constraint)? {
                Some(_) => placed += 1,
                None => failures += 1,
            }
        }

        if placed < amount {
            tracing::warn!(
                requested = amount,
                placed,
                failures,
                "Could not place all object groups"
            );
        }
        Ok(placed)
    }

    /// Place one object group at its current centre.
    pub fn place_object_group(
        &mut self,
        group: &SimpleGroup,
        player: u32,
        constraints: &[Constraint],
    ) -> Result<bool> {
        let constraint = Constraint::all(constraints);
        Ok(group
            .place(&mut self.grid, &mut self.rng, player, &constraint)?
            .is_some())
    }

    /// Export the finished map.
    #[must_use]
    pub fn export(&self) -> MapExport {
        self.grid.export()
    }

    /// Consume the session, returning the grid.
    #[must_use]
    pub fn into_grid(self) -> MapGrid {
        self.grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::painter::{TerrainPainter, TileClassPainter};
    use crate::placer::{ClumpPlacer, RectPlacer};

    fn context(size: u32) -> MapContext {
        MapContext::new(&MapSettings::default().with_size(size)).unwrap()
    }

    #[test]
    fn test_create_area_registers_and_paints() {
        let mut ctx = context(16);
        let id = ctx
            .create_area(&RectPlacer::new(2, 2, 4, 4), &[&TerrainPainter::new("sand")], &[])
            .unwrap()
            .unwrap();
        assert_eq!(ctx.grid().area(id).unwrap().len(), 4);
        assert_eq!(ctx.grid().texture(3, 3).unwrap(), "sand");
    }

    #[test]
    fn test_infeasible_placement_leaves_grid_untouched() {
        let mut ctx = context(16);
        let before = ctx.grid().state_hash();
        let outcome = ctx
            .create_area(
                &RectPlacer::new(2, 2, 4, 4),
                &[&TerrainPainter::new("sand")],
                &[Constraint::within_rect(0, 0, 3, 3)],
            )
            .unwrap();
        assert!(outcome.is_none());
        assert!(ctx.grid().areas().is_empty());
        assert_eq!(ctx.grid().state_hash(), before);
    }

    #[test]
    fn test_create_areas_respects_avoidance() {
        let mut ctx = context(64);
        let lakes = ctx.grid_mut().create_tile_class();
        let mut clump = ClumpPlacer::new(30.0, 1.0, 1.0, Point::default());
        let ids = ctx
            .create_areas(
                &mut clump,
                &[&TileClassPainter(lakes)],
                &[Constraint::AvoidClass { class: lakes, distance: 4.0 }],
                5,
                DEFAULT_RETRY_FACTOR,
            )
            .unwrap();
        assert!(!ids.is_empty() && ids.len() <= 5);
        // Every area was placed clear of the ones before it.
        for (i, &id) in ids.iter().enumerate() {
            for &earlier in &ids[..i] {
                for p in ctx.grid().area(id).unwrap().points() {
                    for q in ctx.grid().area(earlier).unwrap().points() {
                        assert!(p.distance_squared(*q) > 16);
                    }
                }
            }
        }
    }

    #[test]
    fn test_create_areas_gives_up() {
        let mut ctx = context(16);
        let mut clump = ClumpPlacer::new(10.0, 1.0, 1.0, Point::default());
        let ids = ctx
            .create_areas(
                &mut clump,
                &[],
                &[Constraint::within_rect(0, 0, 0, 0)],
                3,
                2,
            )
            .unwrap();
        assert!(ids.is_empty());
    }

    #[test]
    fn test_create_areas_in_areas_stays_inside() {
        let mut ctx = context(32);
        let region = ctx
            .create_area(&RectPlacer::new(20, 20, 28, 28), &[], &[])
            .unwrap()
            .unwrap();
        let mut rect_center = ClumpPlacer::new(1.0, 1.0, 1.0, Point::default());
        let ids = ctx
            .create_areas_in_areas(&mut rect_center, &[], &[], 4, DEFAULT_RETRY_FACTOR, &[region])
            .unwrap();
        assert_eq!(ids.len(), 4);
        for id in ids {
            for p in ctx.grid().area(id).unwrap().points() {
                assert!((19..=28).contains(&p.x) && (19..=28).contains(&p.z));
            }
        }
    }

    #[test]
    fn test_object_groups_counted() {
        use crate::object::SimpleObject;
        let mut ctx = context(32);
        let mut group = SimpleGroup::new(
            vec![SimpleObject::new("bush", 1, 2, 0.0, 2.0)],
            true,
            Point::default(),
        );
        let placed = ctx
            .create_object_groups(&mut group, 0, &[], 3, DEFAULT_RETRY_FACTOR)
            .unwrap();
        assert_eq!(placed, 3);
        assert!(ctx.grid().objects().len() >= 3);
    }
}
