//! Determinism testing utilities.
//!
//! Provides a harness for verifying that map generation produces identical
//! results given identical settings and an identical call sequence.
//!
//! # Testing Strategy
//!
//! Every client regenerates the map locally from a seed, so generation must
//! be 100% deterministic. Sources of non-determinism include:
//!
//! - **HashMap iteration order**: Rust's default hasher is randomized.
//!   The grid only iterates vectors; hashed maps are used for lookups.
//!
//! - **System randomness**: every random draw goes through the seeded
//!   [`MapRng`].
//!
//! - **Unstable sorts**: the path rasteriser sorts triangle vertices with a
//!   stable sort.
//!
//! # Test Levels
//!
//! 1. **Unit tests**: individual placers and painters
//! 2. **Property tests**: random parameters still give reproducible output
//! 3. **Integration tests**: the full fixture recipe is reproducible
//! 4. **Parallel tests**: N generations on N threads all match

use std::cell::Cell;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

use rmg_core::context::MapContext;
use rmg_core::error::Result;
use rmg_core::export::MapExport;
use rmg_core::rng::MapRng;
use rmg_core::settings::MapSettings;

use crate::fixtures::{FixtureClasses, FIXTURE_STEPS};

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Seed every run started from.
    pub seed: u64,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for deterministic generation).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that generation was deterministic, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Map generation is non-deterministic!\n\
                 Runs: {}\n\
                 Seed: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.seed,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a generator several times and compare the final hashes.
///
/// # Arguments
///
/// * `runs` - Number of generations
/// * `seed` - Seed handed to `setup`
/// * `setup` - Creates the initial state from the seed
/// * `generate` - Runs the recipe on the state
/// * `hash` - Hashes the finished state
pub fn verify_determinism<S, Setup, Generate, HashFn>(
    runs: usize,
    seed: u64,
    setup: Setup,
    generate: Generate,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn(u64) -> S,
    Generate: Fn(&mut S),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup(seed);
        generate(&mut state);
        hashes.push(hash(&state));
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        seed,
    }
}

/// Run `recipe` twice from `settings` and compare exported state hashes.
///
/// A recipe error fails the check.
///
/// # Example
///
/// ```ignore
/// use rmg_test_utils::determinism::verify_recipe_determinism;
/// use rmg_test_utils::fixtures::{fixture_settings, run_fixture};
///
/// assert!(verify_recipe_determinism(&fixture_settings(7), |ctx| {
///     run_fixture(ctx).map(|_| ())
/// }));
/// ```
pub fn verify_recipe_determinism<R>(settings: &MapSettings, recipe: R) -> bool
where
    R: Fn(&mut MapContext) -> Result<()>,
{
    let failed = Cell::new(false);
    let result = verify_determinism(
        2,
        settings.seed,
        |seed| MapContext::with_rng(settings, MapRng::from_seed_u64(seed)),
        |ctx| match ctx {
            Ok(ctx) => {
                if let Err(err) = recipe(ctx) {
                    tracing::warn!(%err, "Recipe failed during determinism check");
                    failed.set(true);
                }
            }
            Err(_) => failed.set(true),
        },
        |ctx| ctx.as_ref().map_or(0, |c| c.grid().state_hash()),
    );
    result.is_deterministic && !failed.get()
}

/// Result of parallel generation runs.
#[derive(Debug, Clone)]
pub struct ParallelGenResult {
    /// Final state hash from each generation.
    pub hashes: Vec<u64>,
    /// Number of generations run.
    pub num_runs: usize,
}

impl ParallelGenResult {
    /// Check if all generations produced identical results.
    #[must_use]
    pub fn is_deterministic(&self) -> bool {
        self.hashes.windows(2).all(|w| w[0] == w[1])
    }

    /// Assert all generations matched.
    ///
    /// # Panics
    ///
    /// Panics if generations produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic() {
            let mut unique: Vec<u64> = self.hashes.clone();
            unique.sort_unstable();
            unique.dedup();
            panic!(
                "Parallel generations diverged!\n\
                 Generations: {}\n\
                 Unique hashes: {}\n\
                 All hashes: {:?}",
                self.num_runs,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Generate N maps on scoped threads and collect their export hashes.
///
/// Catches non-determinism that only shows up under different thread
/// scheduling or memory layouts.
///
/// # Panics
///
/// Panics if a generation thread panics.
pub fn run_parallel_generations_scoped<F>(generate: F, num_runs: usize) -> ParallelGenResult
where
    F: Fn() -> MapExport + Sync,
{
    let hashes = thread::scope(|s| {
        let handles: Vec<_> = (0..num_runs)
            .map(|_| s.spawn(|| generate().state_hash()))
            .collect();

        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    ParallelGenResult { hashes, num_runs }
}

/// Run the fixture recipe twice step by step, finding the first step after
/// which the two grids differ.
///
/// # Returns
///
/// `None` if every step matched, `Some(name)` for the first diverging step.
/// Creating the tile classes is reported as `"classes"`.
///
/// # Errors
///
/// Returns the first error raised by a fixture step.
pub fn find_first_divergence(settings: &MapSettings) -> Result<Option<&'static str>> {
    let mut first = MapContext::new(settings)?;
    let mut second = MapContext::new(settings)?;
    let classes = FixtureClasses::create(&mut first);
    if FixtureClasses::create(&mut second) != classes
        || first.grid().state_hash() != second.grid().state_hash()
    {
        return Ok(Some("classes"));
    }

    for (name, step) in FIXTURE_STEPS {
        step(&mut first, &classes)?;
        step(&mut second, &classes)?;
        if first.grid().state_hash() != second.grid().state_hash() {
            return Ok(Some(*name));
        }
    }

    Ok(None)
}

/// Verify that an export survives a bincode round trip unchanged.
pub fn verify_serialization_determinism(export: &MapExport) -> bool {
    let Ok(bytes) = export.to_bytes() else {
        return false;
    };
    match MapExport::from_bytes(&bytes) {
        Ok(restored) => restored == *export && restored.state_hash() == export.state_hash(),
        Err(_) => false,
    }
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Proptest strategies for generation tests.
///
/// These strategies generate random but reproducible parameters for
/// property-based testing of placers and painters.
pub mod strategies {
    use proptest::prelude::*;
    use rmg_core::constraint::Constraint;
    use rmg_core::geometry::Point;
    use rmg_core::painter::SmoothMode;

    /// A map size small enough for fast property tests.
    ///
    /// Range: 16 to 96 tiles
    pub fn arb_map_size() -> impl Strategy<Value = u32> {
        16u32..=96u32
    }

    /// A seed.
    pub fn arb_seed() -> impl Strategy<Value = u64> {
        any::<u64>()
    }

    /// A tile on a map of `size`.
    pub fn arb_tile(size: u32) -> impl Strategy<Value = Point> {
        let max = size as i32;
        (0..max, 0..max).prop_map(|(x, z)| Point::new(x, z))
    }

    /// Clump parameters `(size, coherence, smoothness)`.
    pub fn arb_clump_params() -> impl Strategy<Value = (f64, f64, f64)> {
        (4.0f64..300.0, 0.0f64..=1.0, 0.05f64..=1.0)
    }

    /// Path shape parameters `(width, waviness, smoothness, offset, tapering)`.
    pub fn arb_path_shape() -> impl Strategy<Value = (f64, f64, f64, f64, f64)> {
        (1.0f64..8.0, 0.0f64..1.0, 0.1f64..1.0, 0.0f64..0.5, 0.0f64..1.0)
    }

    /// Smooth painter mode.
    pub fn arb_smooth_mode() -> impl Strategy<Value = SmoothMode> {
        prop_oneof![Just(SmoothMode::Set), Just(SmoothMode::Modify)]
    }

    /// A rectangle constraint inside a map of `size`.
    pub fn arb_rect_constraint(size: u32) -> impl Strategy<Value = Constraint> {
        let max = size as i32;
        (0..max, 0..max, 0..=max, 0..=max)
            .prop_map(|(xa, za, xb, zb)| {
                Constraint::within_rect(xa.min(xb), za.min(zb), xa.max(xb), za.max(zb))
            })
    }
}
