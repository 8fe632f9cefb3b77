//! The map grid: heights, textures, area ids, objects and bookkeeping.
//!
//! Two coordinate spaces live side by side:
//!
//! - **tile** coordinates address cells, valid in `0..size`;
//! - **vertex** coordinates address height samples at cell corners,
//!   valid in `0..=size`.
//!
//! Public accessors check the space they index and report
//! [`MapGenError::InvalidCoordinate`] naming it. Painters work on points
//! that were validated when their area was registered and go through the
//! crate-internal index helpers instead.

use crate::area::{Area, AreaId};
use crate::entity::{Entity, EntityId, NewEntity, FIRST_ENTITY_ID, GAIA};
use crate::error::{GridSpace, MapGenError, Result};
use crate::export::MapExport;
use crate::geometry::Point;
use crate::rng::MapRng;
use crate::scratch::BoundaryScratch;
use crate::settings::MapSettings;
use crate::texture::{Terrain, TextureId, TextureRegistry};
use crate::tile_class::{TileClass, TileClassId};

/// Shared mutable state of one generation run.
#[derive(Debug, Clone)]
pub struct MapGrid {
    size: u32,
    heights: Vec<f32>,
    textures: Vec<TextureId>,
    area_ids: Vec<Option<AreaId>>,
    terrain_objects: Vec<Option<Entity>>,
    registry: TextureRegistry,
    areas: Vec<Area>,
    tile_classes: Vec<TileClass>,
    objects: Vec<Entity>,
    next_entity_id: u32,
    scratch: BoundaryScratch,
}

impl MapGrid {
    /// Create a grid filled with the base height and base texture.
    pub fn new(settings: &MapSettings) -> Result<Self> {
        settings.validate()?;
        let n = settings.size as usize;
        let mut registry = TextureRegistry::new();
        let base = registry.id_or_insert(&settings.base_texture)?;
        Ok(Self {
            size: settings.size,
            heights: vec![settings.base_height; (n + 1) * (n + 1)],
            textures: vec![base; n * n],
            area_ids: vec![None; n * n],
            terrain_objects: vec![None; n * n],
            registry,
            areas: Vec::new(),
            tile_classes: Vec::new(),
            objects: Vec::new(),
            next_entity_id: FIRST_ENTITY_ID,
            scratch: BoundaryScratch::default(),
        })
    }

    /// Edge length in tiles.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Edge length in vertices (`size + 1`).
    #[must_use]
    pub const fn vertex_size(&self) -> u32 {
        self.size + 1
    }

    // -- coordinate spaces ---------------------------------------------------

    /// Whether `p` is a valid tile coordinate.
    #[must_use]
    pub fn in_bounds(&self, p: Point) -> bool {
        p.x >= 0 && p.z >= 0 && (p.x as u32) < self.size && (p.z as u32) < self.size
    }

    /// Whether `p` is a valid vertex coordinate.
    #[must_use]
    pub fn in_vertex_bounds(&self, p: Point) -> bool {
        p.x >= 0 && p.z >= 0 && (p.x as u32) <= self.size && (p.z as u32) <= self.size
    }

    pub(crate) fn tile_index(&self, p: Point) -> Option<usize> {
        self.in_bounds(p)
            .then(|| p.z as usize * self.size as usize + p.x as usize)
    }

    pub(crate) fn vertex_index(&self, p: Point) -> Option<usize> {
        self.in_vertex_bounds(p)
            .then(|| p.z as usize * self.vertex_size() as usize + p.x as usize)
    }

    fn checked_tile(&self, p: Point) -> Result<usize> {
        self.tile_index(p).ok_or(MapGenError::InvalidCoordinate {
            x: p.x,
            z: p.z,
            space: GridSpace::Tile,
            limit: self.size,
        })
    }

    fn checked_vertex(&self, p: Point) -> Result<usize> {
        self.vertex_index(p).ok_or(MapGenError::InvalidCoordinate {
            x: p.x,
            z: p.z,
            space: GridSpace::Vertex,
            limit: self.vertex_size(),
        })
    }

    // -- heights -------------------------------------------------------------

    /// Elevation at vertex `(x, z)`.
    pub fn height(&self, x: i32, z: i32) -> Result<f32> {
        Ok(self.heights[self.checked_vertex(Point::new(x, z))?])
    }

    /// Set the elevation at vertex `(x, z)`.
    pub fn set_height(&mut self, x: i32, z: i32, value: f32) -> Result<()> {
        let idx = self.checked_vertex(Point::new(x, z))?;
        self.heights[idx] = value;
        Ok(())
    }

    pub(crate) fn height_at_index(&self, idx: usize) -> f32 {
        self.heights[idx]
    }

    pub(crate) fn set_height_at_index(&mut self, idx: usize, value: f32) {
        self.heights[idx] = value;
    }

    /// Bilinear elevation at fractional tile coordinates, clamped to the map.
    #[must_use]
    pub fn height_at(&self, x: f64, z: f64) -> f32 {
        let max = f64::from(self.size);
        let x = x.clamp(0.0, max);
        let z = z.clamp(0.0, max);
        let x0 = (x.floor() as u32).min(self.size.saturating_sub(1));
        let z0 = (z.floor() as u32).min(self.size.saturating_sub(1));
        let fx = (x - f64::from(x0)) as f32;
        let fz = (z - f64::from(z0)) as f32;
        let stride = self.vertex_size() as usize;
        let i = z0 as usize * stride + x0 as usize;
        let h00 = self.heights[i];
        let h10 = self.heights[i + 1];
        let h01 = self.heights[i + stride];
        let h11 = self.heights[i + stride + 1];
        let near = h00 + (h10 - h00) * fx;
        let far = h01 + (h11 - h01) * fx;
        near + (far - near) * fz
    }

    /// Raw vertex heights, row-major over `(size + 1)²`.
    #[must_use]
    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    // -- textures ------------------------------------------------------------

    /// Texture name of tile `(x, z)`.
    pub fn texture(&self, x: i32, z: i32) -> Result<&str> {
        let id = self.texture_id(x, z)?;
        Ok(self.registry.name(id).unwrap_or_default())
    }

    /// Texture id of tile `(x, z)`.
    pub fn texture_id(&self, x: i32, z: i32) -> Result<TextureId> {
        Ok(self.textures[self.checked_tile(Point::new(x, z))?])
    }

    /// Set the texture of tile `(x, z)`, registering unseen names.
    pub fn set_texture(&mut self, x: i32, z: i32, name: &str) -> Result<()> {
        let idx = self.checked_tile(Point::new(x, z))?;
        self.textures[idx] = self.registry.id_or_insert(name)?;
        Ok(())
    }

    /// The texture-name registry.
    #[must_use]
    pub fn texture_registry(&self) -> &TextureRegistry {
        &self.registry
    }

    pub(crate) fn texture_ids(&self) -> &[TextureId] {
        &self.textures
    }

    /// Stamp a terrain onto tile `p`.
    pub fn place_terrain(&mut self, p: Point, terrain: &Terrain, rng: &mut MapRng) -> Result<()> {
        let idx = self.checked_tile(p)?;
        self.try_place_terrain_at(idx, terrain, rng)
    }

    /// Stamp a terrain from a painter. A full texture table leaves the tile
    /// untouched.
    pub(crate) fn place_terrain_at(&mut self, idx: usize, terrain: &Terrain, rng: &mut MapRng) {
        if let Err(err) = self.try_place_terrain_at(idx, terrain, rng) {
            tracing::warn!(tile = idx, %err, "Terrain not placed");
        }
    }

    fn try_place_terrain_at(
        &mut self,
        idx: usize,
        terrain: &Terrain,
        rng: &mut MapRng,
    ) -> Result<()> {
        match terrain {
            Terrain::Simple {
                texture,
                decoration,
            } => {
                self.textures[idx] = self.registry.id_or_insert(texture)?;
                let object = match decoration {
                    Some(template) => {
                        let n = self.size as usize;
                        Some(Entity {
                            id: self.issue_entity_id(),
                            template: template.clone(),
                            player: GAIA,
                            x: (idx % n) as f64 + 0.5,
                            z: (idx / n) as f64 + 0.5,
                            orientation: rng.float() * std::f64::consts::PI,
                        })
                    }
                    None => None,
                };
                self.terrain_objects[idx] = object;
                Ok(())
            }
            Terrain::Random(choices) => {
                if choices.is_empty() {
                    return Ok(());
                }
                let pick = rng.index(choices.len());
                self.try_place_terrain_at(idx, &choices[pick], rng)
            }
        }
    }

    /// Decoration object attached to tile `(x, z)`, if any.
    pub fn terrain_object(&self, x: i32, z: i32) -> Result<Option<&Entity>> {
        Ok(self.terrain_objects[self.checked_tile(Point::new(x, z))?].as_ref())
    }

    pub(crate) fn terrain_objects(&self) -> impl Iterator<Item = &Entity> {
        self.terrain_objects.iter().flatten()
    }

    // -- areas ---------------------------------------------------------------

    /// Register a new area over `points`, overwriting their area ids.
    ///
    /// Later areas win at shared cells.
    pub fn create_area(&mut self, points: Vec<Point>) -> Result<AreaId> {
        let indices = points
            .iter()
            .map(|&p| self.checked_tile(p))
            .collect::<Result<Vec<_>>>()?;
        let id = AreaId(self.areas.len() as u32 + 1);
        for idx in indices {
            self.area_ids[idx] = Some(id);
        }
        tracing::debug!(area = id.0, points = points.len(), "Registered area");
        self.areas.push(Area::new(id, points));
        Ok(id)
    }

    /// A registered area.
    pub fn area(&self, id: AreaId) -> Result<&Area> {
        id.0.checked_sub(1)
            .and_then(|i| self.areas.get(i as usize))
            .ok_or(MapGenError::UnknownArea(id.0))
    }

    /// All registered areas in creation order.
    #[must_use]
    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    /// Id of the area that last claimed tile `p`; `None` off-map or unclaimed.
    #[must_use]
    pub fn area_at(&self, p: Point) -> Option<AreaId> {
        self.tile_index(p).and_then(|i| self.area_ids[i])
    }

    // -- tile classes --------------------------------------------------------

    /// Create a new, empty tile class.
    pub fn create_tile_class(&mut self) -> TileClassId {
        let id = TileClassId(self.tile_classes.len() as u32);
        self.tile_classes.push(TileClass::new(id, self.size));
        id
    }

    /// A tile class issued by this grid.
    pub fn tile_class(&self, id: TileClassId) -> Result<&TileClass> {
        self.tile_classes
            .get(id.0 as usize)
            .ok_or(MapGenError::UnknownTileClass(id.0))
    }

    /// Mutable access to a tile class issued by this grid.
    pub fn tile_class_mut(&mut self, id: TileClassId) -> Result<&mut TileClass> {
        self.tile_classes
            .get_mut(id.0 as usize)
            .ok_or(MapGenError::UnknownTileClass(id.0))
    }

    /// Increment tile class `id` at `p`.
    pub fn add_to_class(&mut self, id: TileClassId, p: Point) -> Result<()> {
        self.tile_class_mut(id)?.add(p)
    }

    /// Decrement tile class `id` at `p`.
    pub fn remove_from_class(&mut self, id: TileClassId, p: Point) -> Result<()> {
        self.tile_class_mut(id)?.remove(p)
    }

    // -- objects -------------------------------------------------------------

    fn issue_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_entity_id);
        self.next_entity_id += 1;
        id
    }

    /// Add an object; its position must lie on the map.
    pub fn add_object(&mut self, object: NewEntity) -> Result<EntityId> {
        let max = f64::from(self.size);
        if !(object.x >= 0.0 && object.x < max && object.z >= 0.0 && object.z < max) {
            return Err(MapGenError::InvalidCoordinate {
                x: object.x.floor() as i32,
                z: object.z.floor() as i32,
                space: GridSpace::Tile,
                limit: self.size,
            });
        }
        let id = self.issue_entity_id();
        self.objects.push(Entity::from_new(id, object));
        Ok(id)
    }

    /// Objects added with [`MapGrid::add_object`], in insertion order.
    #[must_use]
    pub fn objects(&self) -> &[Entity] {
        &self.objects
    }

    // -- scratch & export ----------------------------------------------------

    pub(crate) fn take_scratch(&mut self) -> BoundaryScratch {
        std::mem::take(&mut self.scratch)
    }

    pub(crate) fn restore_scratch(&mut self, scratch: BoundaryScratch) {
        self.scratch = scratch;
    }

    /// Convert the grid into the engine's exchange format.
    #[must_use]
    pub fn export(&self) -> MapExport {
        MapExport::from_grid(self)
    }

    /// Hash of the exported state, for determinism checks.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        self.export().state_hash()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(size: u32) -> MapGrid {
        MapGrid::new(&MapSettings::default().with_size(size).with_base_height(1.5)).unwrap()
    }

    #[test]
    fn test_new_grid_uses_base_values() {
        let g = grid(8);
        assert_eq!(g.heights().len(), 81);
        assert_eq!(g.height(8, 8).unwrap(), 1.5);
        assert_eq!(g.texture(7, 7).unwrap(), "blank");
    }

    #[test]
    fn test_vertex_and_tile_spaces_differ() {
        let mut g = grid(8);
        assert!(g.set_height(8, 0, 3.0).is_ok());
        assert!(matches!(
            g.set_height(9, 0, 3.0),
            Err(MapGenError::InvalidCoordinate { space: GridSpace::Vertex, limit: 9, .. })
        ));
        assert!(matches!(
            g.texture(8, 0),
            Err(MapGenError::InvalidCoordinate { space: GridSpace::Tile, limit: 8, .. })
        ));
        assert!(g.height(-1, 0).is_err());
    }

    #[test]
    fn test_set_texture_registers_names() {
        let mut g = grid(4);
        g.set_texture(1, 2, "snow").unwrap();
        assert_eq!(g.texture(1, 2).unwrap(), "snow");
        assert_eq!(g.texture_registry().len(), 2);
        g.set_texture(2, 2, "snow").unwrap();
        assert_eq!(g.texture_registry().len(), 2);
    }

    #[test]
    fn test_create_area_last_writer_wins() {
        let mut g = grid(8);
        let a = g.create_area(vec![Point::new(1, 1), Point::new(2, 1)]).unwrap();
        let b = g.create_area(vec![Point::new(2, 1)]).unwrap();
        assert!(b.0 > a.0);
        assert_eq!(g.area_at(Point::new(1, 1)), Some(a));
        assert_eq!(g.area_at(Point::new(2, 1)), Some(b));
        assert_eq!(g.area(a).unwrap().len(), 2);
        assert!(g.area(AreaId(0)).is_err());
    }

    #[test]
    fn test_create_area_rejects_off_map_points() {
        let mut g = grid(8);
        assert!(g.create_area(vec![Point::new(8, 1)]).is_err());
        assert!(g.areas().is_empty());
    }

    #[test]
    fn test_tile_classes() {
        let mut g = grid(8);
        let tc = g.create_tile_class();
        g.add_to_class(tc, Point::new(3, 3)).unwrap();
        assert!(g.tile_class(tc).unwrap().contains(Point::new(3, 3)));
        g.remove_from_class(tc, Point::new(3, 3)).unwrap();
        assert!(!g.tile_class(tc).unwrap().contains(Point::new(3, 3)));
        assert!(matches!(
            g.tile_class(TileClassId(5)),
            Err(MapGenError::UnknownTileClass(5))
        ));
    }

    #[test]
    fn test_add_object_assigns_increasing_ids() {
        let mut g = grid(8);
        let a = g.add_object(NewEntity::new("stone", GAIA, 1.5, 2.5, 0.0)).unwrap();
        let b = g.add_object(NewEntity::new("metal", GAIA, 3.0, 3.0, 0.0)).unwrap();
        assert_eq!(a, EntityId(FIRST_ENTITY_ID));
        assert_eq!(b, EntityId(FIRST_ENTITY_ID + 1));
        assert!(g.add_object(NewEntity::new("tree", GAIA, 8.0, 0.0, 0.0)).is_err());
    }

    #[test]
    fn test_decorated_terrain_fills_object_slot() {
        let mut g = grid(8);
        let mut rng = MapRng::default();
        g.place_terrain(Point::new(2, 3), &Terrain::parse("forest|tree_pine"), &mut rng)
            .unwrap();
        let tree = g.terrain_object(2, 3).unwrap().unwrap();
        assert_eq!(tree.template, "tree_pine");
        assert_eq!((tree.x, tree.z), (2.5, 3.5));

        g.place_terrain(Point::new(2, 3), &Terrain::simple("grass"), &mut rng)
            .unwrap();
        assert!(g.terrain_object(2, 3).unwrap().is_none());
    }

    #[test]
    fn test_height_at_interpolates() {
        let mut g = grid(4);
        g.set_height(1, 1, 10.0).unwrap();
        assert_eq!(g.height_at(1.0, 1.0), 10.0);
        assert!((g.height_at(0.5, 1.0) - 5.75).abs() < 1e-5);
        assert_eq!(g.height_at(100.0, 100.0), 1.5);
    }
}
