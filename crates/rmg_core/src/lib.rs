//! # RMG Core
//!
//! Deterministic random map generation engine.
//!
//! A map is built by repeatedly asking a [`placer`] for a point set that
//! satisfies a [`constraint`], registering it as an [`area`], and handing it
//! to one or more [`painter`]s that commit heights, textures and bookkeeping
//! to the [`grid`]. The finished grid is converted to the simulation's
//! exchange format by [`export`].
//!
//! This crate contains **only** deterministic logic:
//! - No IO beyond loading settings files
//! - No system randomness (every call takes a seeded [`rng::MapRng`])
//! - No iteration over hashed containers
//!
//! The same seed and call sequence always produce a byte-identical export.
//!
//! ## Crate Structure
//!
//! - [`grid`] - Heights, textures, areas, tile classes and objects
//! - [`placer`] - Algorithms proposing point sets
//! - [`painter`] - Algorithms committing point sets
//! - [`context`] - `create_area` / `create_areas` orchestration
//! - [`export`] - Exchange format for the simulation

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod area;
pub mod constraint;
pub mod context;
pub mod entity;
pub mod error;
pub mod export;
pub mod geometry;
pub mod grid;
pub mod math;
pub mod noise;
pub mod object;
pub mod painter;
pub mod placer;
pub mod rng;
mod scratch;
pub mod settings;
pub mod texture;
pub mod tile_class;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::area::{Area, AreaId};
    pub use crate::constraint::Constraint;
    pub use crate::context::{MapContext, DEFAULT_RETRY_FACTOR};
    pub use crate::entity::{Entity, EntityId, NewEntity, GAIA};
    pub use crate::error::{MapGenError, Result};
    pub use crate::export::MapExport;
    pub use crate::geometry::{Point, Rect};
    pub use crate::grid::MapGrid;
    pub use crate::math::Fixed;
    pub use crate::object::{SimpleGroup, SimpleObject};
    pub use crate::painter::{
        ElevationPainter, LayeredPainter, MultiPainter, Painter, SmoothElevationPainter,
        SmoothMode, TerrainPainter, TileClassPainter, TileClassUnPainter,
    };
    pub use crate::placer::{
        CenteredPlacer, ChainPlacer, ClumpPlacer, HeightBounds, HeightPlacer, MapBoundsPlacer,
        PathPlacer, Placer, RandomPathPlacer, RectPlacer,
    };
    pub use crate::rng::MapRng;
    pub use crate::settings::MapSettings;
    pub use crate::texture::Terrain;
    pub use crate::tile_class::TileClassId;
}
