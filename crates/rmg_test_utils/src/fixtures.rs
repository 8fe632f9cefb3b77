//! Test fixtures and helpers.
//!
//! A compact recipe that touches every placer and painter, split into named
//! steps so that determinism checks can pinpoint the step that diverged.

use rmg_core::prelude::*;

/// Settings used by the fixture recipe: a 64×64 grassland.
#[must_use]
pub fn fixture_settings(seed: u64) -> MapSettings {
    MapSettings::tiny()
        .with_seed(seed)
        .with_base_height(2.0)
        .with_base_texture("grass")
}

/// A fresh context for `settings`.
///
/// # Panics
///
/// Panics if the settings are invalid.
#[must_use]
pub fn context(settings: &MapSettings) -> MapContext {
    MapContext::new(settings).expect("fixture settings are valid")
}

/// Tile classes shared by the fixture steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixtureClasses {
    /// Lake cells.
    pub water: TileClassId,
    /// Forest cells.
    pub forest: TileClassId,
    /// Road cells.
    pub road: TileClassId,
    /// Mine cells.
    pub mines: TileClassId,
}

impl FixtureClasses {
    /// Register the classes on a fresh context.
    pub fn create(ctx: &mut MapContext) -> Self {
        let grid = ctx.grid_mut();
        Self {
            water: grid.create_tile_class(),
            forest: grid.create_tile_class(),
            road: grid.create_tile_class(),
            mines: grid.create_tile_class(),
        }
    }
}

/// One named recipe step.
pub type FixtureStep = fn(&mut MapContext, &FixtureClasses) -> Result<()>;

/// The fixture recipe, in order.
pub const FIXTURE_STEPS: &[(&str, FixtureStep)] = &[
    ("lakes", lakes),
    ("hills", hills),
    ("river", river),
    ("road", road),
    ("forests", forests),
    ("lowlands", lowlands),
    ("mines", mines),
];

/// Run every fixture step on `ctx`.
pub fn run_fixture(ctx: &mut MapContext) -> Result<FixtureClasses> {
    let classes = FixtureClasses::create(ctx);
    for (name, step) in FIXTURE_STEPS {
        tracing::debug!(step = name, "Running fixture step");
        step(ctx, &classes)?;
    }
    Ok(classes)
}

/// Build the fixture map for `seed` from scratch.
///
/// # Panics
///
/// Panics if a fixture step fails.
#[must_use]
pub fn fixture_map(seed: u64) -> MapContext {
    let mut ctx = context(&fixture_settings(seed));
    run_fixture(&mut ctx).expect("fixture recipe runs");
    ctx
}

fn lakes(ctx: &mut MapContext, classes: &FixtureClasses) -> Result<()> {
    let shore = LayeredPainter::new(
        vec![Terrain::simple("sand"), Terrain::simple("water")],
        vec![1],
    )?;
    let depth = SmoothElevationPainter::new(SmoothMode::Set, -4.0, 2.0);
    let mut clump = ClumpPlacer::new(60.0, 0.6, 0.5, Point::default());
    ctx.create_areas(
        &mut clump,
        &[&shore, &depth, &TileClassPainter(classes.water)],
        &[
            Constraint::within_map_margin(ctx.size(), 4),
            Constraint::AvoidClass {
                class: classes.water,
                distance: 8.0,
            },
        ],
        2,
        DEFAULT_RETRY_FACTOR,
    )?;
    Ok(())
}

fn hills(ctx: &mut MapContext, classes: &FixtureClasses) -> Result<()> {
    let raise = SmoothElevationPainter::new(SmoothMode::Modify, 6.0, 3.0);
    let mut chain = ChainPlacer::new(2, 4, 6, Point::default()).with_fail_fraction(0.2);
    ctx.create_areas(
        &mut chain,
        &[&raise, &TerrainPainter::new("grass_dry")],
        &[Constraint::AvoidClass {
            class: classes.water,
            distance: 4.0,
        }],
        2,
        DEFAULT_RETRY_FACTOR,
    )?;
    Ok(())
}

fn river(ctx: &mut MapContext, classes: &FixtureClasses) -> Result<()> {
    let size = ctx.size() as i32;
    let path = PathPlacer::new(
        Point::new(0, size / 3),
        Point::new(size - 1, size / 2),
        3.0,
        0.4,
        0.5,
        0.2,
        0.0,
    );
    ctx.create_area(
        &path,
        &[
            &TerrainPainter::new("water_shallow"),
            &ElevationPainter::new(-1.0),
            &TileClassPainter(classes.water),
        ],
        &[],
    )?;
    Ok(())
}

fn road(ctx: &mut MapContext, classes: &FixtureClasses) -> Result<()> {
    let size = ctx.size() as i32;
    let walk = RandomPathPlacer::new(
        Point::new(size / 2, 2),
        Point::new(size / 2, size - 3),
        1.0,
        2.0,
        true,
    );
    ctx.create_area(
        &walk,
        &[&TerrainPainter::new("road"), &TileClassPainter(classes.road)],
        &[Constraint::AvoidClass {
            class: classes.water,
            distance: 1.0,
        }],
    )?;
    Ok(())
}

fn forests(ctx: &mut MapContext, classes: &FixtureClasses) -> Result<()> {
    let mut clump = ClumpPlacer::new(25.0, 0.4, 0.8, Point::default());
    ctx.create_areas(
        &mut clump,
        &[
            &TerrainPainter::new(Terrain::random(vec![
                Terrain::parse("forest_floor|tree_oak"),
                Terrain::parse("forest_floor|tree_pine"),
                Terrain::simple("forest_floor"),
            ])),
            &TileClassPainter(classes.forest),
        ],
        &[Constraint::avoid_classes(&[
            (classes.water, 3.0),
            (classes.road, 2.0),
            (classes.forest, 5.0),
        ])],
        4,
        DEFAULT_RETRY_FACTOR,
    )?;
    Ok(())
}

fn lowlands(ctx: &mut MapContext, classes: &FixtureClasses) -> Result<()> {
    // Everything at or below zero that is not already water turns to mud.
    let low = HeightPlacer::new(HeightBounds::IncludeMinIncludeMax, -100.0, 0.0);
    ctx.create_area(
        &low,
        &[&TerrainPainter::new("mud"), &TileClassUnPainter(classes.forest)],
        &[Constraint::AvoidClass {
            class: classes.water,
            distance: 0.0,
        }],
    )?;
    Ok(())
}

fn mines(ctx: &mut MapContext, classes: &FixtureClasses) -> Result<()> {
    let mut group = SimpleGroup::new(
        vec![
            SimpleObject::new("mine_stone", 1, 1, 0.0, 0.0),
            SimpleObject::new("rock_small", 2, 3, 1.0, 2.5),
        ],
        true,
        Point::default(),
    )
    .with_tile_class(classes.mines);
    ctx.create_object_groups(
        &mut group,
        GAIA,
        &[
            Constraint::within_map_margin(ctx.size(), 3),
            Constraint::avoid_classes(&[
                (classes.water, 2.0),
                (classes.forest, 1.0),
                (classes.mines, 8.0),
            ]),
        ],
        3,
        DEFAULT_RETRY_FACTOR,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_map_uses_every_layer() {
        let ctx = fixture_map(42);
        let grid = ctx.grid();
        assert!(!grid.areas().is_empty());
        assert!(grid.texture_registry().len() > 3);
        assert!(grid.heights().iter().any(|&h| h < 0.0));
    }

    #[test]
    fn test_steps_are_named_uniquely() {
        let mut names: Vec<_> = FIXTURE_STEPS.iter().map(|(name, _)| *name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), FIXTURE_STEPS.len());
    }
}
