use rmg_core::prelude::*;
use rmg_test_utils::determinism::strategies::{
    arb_clump_params, arb_path_shape, arb_rect_constraint, arb_seed, arb_smooth_mode,
};
use rmg_test_utils::fixtures::fixture_map;
use rmg_test_utils::proptest::prelude::*;

const SIZE: u32 = 48;

fn grid_with_water(seed: u64) -> (MapGrid, TileClassId) {
    let mut ctx = MapContext::new(&MapSettings::default().with_size(SIZE).with_seed(seed)).unwrap();
    let water = ctx.grid_mut().create_tile_class();
    let mut lake = ClumpPlacer::new(40.0, 0.5, 0.5, Point::default());
    ctx.create_areas(
        &mut lake,
        &[&TileClassPainter(water)],
        &[],
        3,
        DEFAULT_RETRY_FACTOR,
    )
    .unwrap();
    (ctx.into_grid(), water)
}

fn assert_all_allowed(grid: &MapGrid, constraint: &Constraint, points: &[Point]) {
    for p in points {
        assert!(grid.in_bounds(*p), "{p:?} is off the map");
        assert!(constraint.allows(grid, *p), "{p:?} violates {constraint:?}");
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn clump_points_satisfy_constraint(
        seed in arb_seed(),
        (size, coherence, smoothness) in arb_clump_params(),
        rect in arb_rect_constraint(SIZE),
        cx in 0..SIZE as i32,
        cz in 0..SIZE as i32,
    ) {
        let (grid, water) = grid_with_water(seed);
        let avoid_water = Constraint::AvoidClass { class: water, distance: 2.0 };
        let constraint = Constraint::all(&[rect, avoid_water]);
        let placer = ClumpPlacer::new(size, coherence, smoothness, Point::new(cx, cz))
            .with_fail_fraction(1.0);
        if let Some(points) = placer.place(&grid, &mut MapRng::from_seed_u64(seed), &constraint) {
            assert_all_allowed(&grid, &constraint, &points);
        }
    }

    #[test]
    fn chain_points_satisfy_constraint(
        seed in arb_seed(),
        rect in arb_rect_constraint(SIZE),
        max_radius in 1..6i32,
        circles in 0..12usize,
        cx in 0..SIZE as i32,
        cz in 0..SIZE as i32,
    ) {
        let (grid, water) = grid_with_water(seed);
        let on_water = Constraint::StayClass { class: water, distance: 0.0 };
        let constraint = Constraint::all(&[rect, on_water]);
        let placer = ChainPlacer::new(1, max_radius, circles, Point::new(cx, cz))
            .with_fail_fraction(1.0);
        if let Some(points) = placer.place(&grid, &mut MapRng::from_seed_u64(seed), &constraint) {
            assert_all_allowed(&grid, &constraint, &points);
        }
    }

    #[test]
    fn path_points_satisfy_constraint(
        seed in arb_seed(),
        (width, waviness, smoothness, offset, tapering) in arb_path_shape(),
        rect in arb_rect_constraint(SIZE),
        z0 in 0..SIZE as i32,
        z1 in 0..SIZE as i32,
    ) {
        let (grid, _) = grid_with_water(seed);
        let placer = PathPlacer::new(
            Point::new(0, z0),
            Point::new(SIZE as i32 - 1, z1),
            width,
            waviness,
            smoothness,
            offset,
            tapering,
        )
        .with_fail_fraction(f64::INFINITY);
        if let Some(points) = placer.place(&grid, &mut MapRng::from_seed_u64(seed), &rect) {
            assert_all_allowed(&grid, &rect, &points);
        }
    }

    #[test]
    fn random_path_points_satisfy_constraint(
        seed in arb_seed(),
        blended in any::<bool>(),
        rect in arb_rect_constraint(SIZE),
    ) {
        let (grid, _) = grid_with_water(seed);
        let placer = RandomPathPlacer::new(Point::new(4, 4), Point::new(40, 40), 1.5, 3.0, blended);
        if let Some(points) = placer.place(&grid, &mut MapRng::from_seed_u64(seed), &rect) {
            assert_all_allowed(&grid, &rect, &points);
        }
    }

    #[test]
    fn height_placer_respects_band(
        seed in arb_seed(),
        min in -6.0f32..0.0,
        max in 0.0f32..6.0,
    ) {
        let settings = MapSettings::default().with_size(SIZE).with_seed(seed);
        let mut ctx = MapContext::new(&settings).unwrap();
        let mut hill = ClumpPlacer::new(80.0, 0.5, 0.5, Point::default());
        let raise = SmoothElevationPainter::new(SmoothMode::Modify, 8.0, 3.0);
        let sink = SmoothElevationPainter::new(SmoothMode::Modify, -8.0, 3.0);
        ctx.create_areas(&mut hill, &[&raise], &[], 2, DEFAULT_RETRY_FACTOR).unwrap();
        ctx.create_areas(&mut hill, &[&sink], &[], 2, DEFAULT_RETRY_FACTOR).unwrap();

        let placer = HeightPlacer::new(HeightBounds::IncludeMinExcludeMax, min, max);
        let grid = ctx.grid();
        let mut rng = MapRng::from_seed_u64(seed);
        if let Some(points) = placer.place(grid, &mut rng, &Constraint::Null) {
            for p in points {
                let h = grid.height(p.x, p.z).unwrap();
                prop_assert!(h >= min && h < max, "{p:?} at height {h}");
            }
        }
    }

    #[test]
    fn smooth_painter_is_reproducible(
        seed in arb_seed(),
        mode in arb_smooth_mode(),
        elevation in -10.0f32..10.0,
        blend_radius in 0.0f32..5.0,
    ) {
        let run = || {
            let settings = MapSettings::default().with_size(SIZE).with_seed(seed);
            let mut ctx = MapContext::new(&settings).unwrap();
            let mut clump = ClumpPlacer::new(60.0, 0.6, 0.4, Point::default());
            let painter = SmoothElevationPainter::new(mode, elevation, blend_radius);
            ctx.create_areas(&mut clump, &[&painter], &[], 3, DEFAULT_RETRY_FACTOR).unwrap();
            ctx.grid().heights().to_vec()
        };
        let first = run();
        prop_assert!(first.iter().all(|h| h.is_finite()));
        prop_assert_eq!(first, run());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(4))]

    #[test]
    fn fixture_export_is_reproducible(seed in arb_seed()) {
        prop_assert_eq!(fixture_map(seed).export(), fixture_map(seed).export());
    }
}
