use rmg_core::prelude::*;
use rmg_test_utils::determinism::{
    find_first_divergence, run_parallel_generations_scoped, verify_recipe_determinism,
    verify_serialization_determinism,
};
use rmg_test_utils::fixtures::{context, fixture_map, fixture_settings, run_fixture};

fn blank(size: u32) -> MapContext {
    context(&MapSettings::default().with_size(size))
}

#[test]
fn clump_paints_grass_around_its_center() {
    let mut ctx = blank(64);
    let clump = ClumpPlacer::new(100.0, 1.0, 1.0, Point::new(32, 32));
    let id = ctx
        .create_area(&clump, &[&TerrainPainter::new("grass")], &[])
        .unwrap()
        .expect("unconstrained clump is feasible");

    let grid = ctx.grid();
    assert_eq!(grid.texture(32, 32).unwrap(), "grass");
    assert_eq!(grid.texture(0, 0).unwrap(), "blank");
    let points = grid.area(id).unwrap().points();
    let count = points.len() as f64;
    assert!((count - 100.0).abs() <= 100.0 * 0.15 + 2.0, "{count} points");
    assert!(points.iter().all(|p| grid.area_at(*p) == Some(id)));
}

#[test]
fn coherent_clumps_approximate_disks() {
    for size in [150.0, 300.0, 700.0] {
        let mut ctx = blank(128);
        let clump = ClumpPlacer::new(size, 1.0, 1.0, Point::new(64, 64));
        let radius = clump.radius();
        let id = ctx.create_area(&clump, &[], &[]).unwrap().unwrap();
        let points = ctx.grid().area(id).unwrap().points();

        let count = points.len() as f64;
        assert!((count - size).abs() <= size * 0.15 + 2.0, "size {size}: {count} points");
        assert!(points.iter().all(|p| {
            let dx = f64::from(p.x - 64);
            let dz = f64::from(p.z - 64);
            (dx * dx + dz * dz).sqrt() <= radius + 1.5
        }));
    }
}

#[test]
fn second_clump_avoids_the_first() {
    let mut ctx = blank(64);
    let taken = ctx.grid_mut().create_tile_class();
    let first = ClumpPlacer::new(30.0, 1.0, 1.0, Point::new(16, 16));
    ctx.create_area(&first, &[&TileClassPainter(taken)], &[])
        .unwrap()
        .unwrap();

    let avoid = [Constraint::AvoidClass {
        class: taken,
        distance: 6.0,
    }];

    // Centre inside the first clump.
    let blocked = ClumpPlacer::new(30.0, 1.0, 1.0, Point::new(17, 17));
    assert_eq!(ctx.create_area(&blocked, &[], &avoid).unwrap(), None);

    let second = ClumpPlacer::new(30.0, 1.0, 1.0, Point::new(48, 48));
    let id = ctx
        .create_area(&second, &[&TileClassPainter(taken)], &avoid)
        .unwrap()
        .unwrap();

    let grid = ctx.grid();
    let class = grid.tile_class(taken).unwrap();
    for p in grid.area(id).unwrap().points() {
        assert!(class.contains(*p));
        assert!(p.distance_squared(Point::new(16, 16)) > 36);
    }

    // Both clumps now repel further placements.
    for (x, z) in [(16, 16), (20, 16), (16, 19), (48, 48), (48, 52), (45, 48)] {
        assert!(!avoid[0].allows(grid, Point::new(x, z)), "({x}, {z}) allowed");
    }
    for (x, z) in [(32, 32), (2, 60), (60, 2), (16, 28), (48, 36)] {
        assert!(avoid[0].allows(grid, Point::new(x, z)), "({x}, {z}) rejected");
    }
}

#[test]
fn layered_painter_bands_from_the_edge() {
    let mut ctx = blank(32);
    let shore = LayeredPainter::new(
        vec![Terrain::simple("a"), Terrain::simple("b"), Terrain::simple("c")],
        vec![1, 2],
    )
    .unwrap();
    ctx.create_area(&RectPlacer::new(11, 11, 22, 22), &[&shore], &[])
        .unwrap()
        .unwrap();

    let row: Vec<&str> = (10..=22).map(|x| ctx.grid().texture(x, 16).unwrap()).collect();
    assert_eq!(
        row,
        vec!["blank", "a", "b", "b", "c", "c", "c", "c", "c", "b", "b", "a", "blank"]
    );
}

#[test]
fn smooth_set_without_blend_only_touches_area_corners() {
    let mut ctx = blank(16);
    let flat = SmoothElevationPainter::new(SmoothMode::Set, 10.0, 0.0);
    ctx.create_area(&RectPlacer::new(4, 4, 7, 6), &[&flat], &[])
        .unwrap()
        .unwrap();

    for x in 0..=16 {
        for z in 0..=16 {
            let expected = if (4..=7).contains(&x) && (4..=6).contains(&z) { 10.0 } else { 0.0 };
            assert_eq!(ctx.grid().height(x, z).unwrap(), expected, "vertex ({x}, {z})");
        }
    }
}

#[test]
fn rect_placer_fail_fraction_threshold() {
    let mut ctx = blank(32);
    let left_half = [Constraint::within_rect(0, 0, 10, 32)];

    let strict = RectPlacer::new(0, 0, 20, 20).with_fail_fraction(0.49);
    assert_eq!(ctx.create_area(&strict, &[], &left_half).unwrap(), None);

    let tolerant = RectPlacer::new(0, 0, 20, 20).with_fail_fraction(0.5);
    let id = ctx.create_area(&tolerant, &[], &left_half).unwrap().unwrap();
    let area = ctx.grid().area(id).unwrap();
    assert_eq!(area.len(), 200);
    assert!(area.points().iter().all(|p| p.x < 10 && p.z < 20));
}

#[test]
fn unpainting_restores_class_membership() {
    let mut ctx = blank(32);
    let marked = ctx.grid_mut().create_tile_class();
    let rect = RectPlacer::new(2, 2, 6, 6);
    ctx.create_area(&rect, &[&TileClassPainter(marked), &TileClassPainter(marked)], &[])
        .unwrap()
        .unwrap();
    ctx.create_area(&rect, &[&TileClassUnPainter(marked)], &[])
        .unwrap()
        .unwrap();

    let class = ctx.grid().tile_class(marked).unwrap();
    assert_eq!(class.count(Point::new(3, 3)).unwrap(), 1);
}

#[test]
fn fixture_recipe_is_deterministic() {
    assert!(verify_recipe_determinism(&fixture_settings(21), |ctx| {
        run_fixture(ctx).map(|_| ())
    }));
    assert_eq!(find_first_divergence(&fixture_settings(21)).unwrap(), None);
}

#[test]
fn fixture_exports_match_across_threads() {
    run_parallel_generations_scoped(|| fixture_map(8).export(), 3).assert_deterministic();
}

#[test]
fn export_survives_bincode() {
    let export = fixture_map(13).export();
    assert_eq!(export.height.len(), 65 * 65);
    assert!(verify_serialization_determinism(&export));
}
