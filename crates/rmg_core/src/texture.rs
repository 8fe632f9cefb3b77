//! Texture-name registry and terrain definitions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{MapGenError, Result};

/// Index into the texture-name table.
pub type TextureId = u16;

/// Bijective texture-name ↔ id table that grows on first use.
///
/// Ids are issued in registration order, so the exported name table is
/// identical for identical call sequences. The map is only ever used for
/// lookups, never iterated.
#[derive(Debug, Clone, Default)]
pub struct TextureRegistry {
    names: Vec<String>,
    ids: HashMap<String, TextureId>,
}

impl TextureRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the id of `name`, registering it if unseen.
    ///
    /// Fails once every [`TextureId`] has been issued; ids never wrap.
    pub fn id_or_insert(&mut self, name: &str) -> Result<TextureId> {
        if let Some(&id) = self.ids.get(name) {
            return Ok(id);
        }
        let id = TextureId::try_from(self.names.len())
            .map_err(|_| MapGenError::TextureTableFull(name.to_string()))?;
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        Ok(id)
    }

    /// Look up the id of an already registered name.
    #[must_use]
    pub fn id(&self, name: &str) -> Option<TextureId> {
        self.ids.get(name).copied()
    }

    /// Name registered for `id`.
    #[must_use]
    pub fn name(&self, id: TextureId) -> Option<&str> {
        self.names.get(id as usize).map(String::as_str)
    }

    /// All names in id order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of registered textures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether nothing has been registered yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// What a painter stamps onto a tile.
///
/// A terrain string of the form `"texture|template"` also drops a decoration
/// object (a tree, a bush) into the tile's object slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Terrain {
    /// A single texture with an optional decoration object.
    Simple {
        /// Texture name.
        texture: String,
        /// Template of the decoration object placed on the tile, if any.
        decoration: Option<String>,
    },
    /// One of several terrains, chosen uniformly per tile.
    Random(Vec<Terrain>),
}

impl Terrain {
    /// A plain texture.
    #[must_use]
    pub fn simple(texture: impl Into<String>) -> Self {
        Self::Simple {
            texture: texture.into(),
            decoration: None,
        }
    }

    /// A texture carrying a decoration object.
    #[must_use]
    pub fn decorated(texture: impl Into<String>, template: impl Into<String>) -> Self {
        Self::Simple {
            texture: texture.into(),
            decoration: Some(template.into()),
        }
    }

    /// Uniform choice among `terrains`.
    #[must_use]
    pub fn random(terrains: Vec<Terrain>) -> Self {
        Self::Random(terrains)
    }

    /// Parse `"texture"` or `"texture|template"`.
    #[must_use]
    pub fn parse(spec: &str) -> Self {
        match spec.split_once('|') {
            Some((texture, template)) if !template.is_empty() => {
                Self::decorated(texture, template)
            }
            Some((texture, _)) => Self::simple(texture),
            None => Self::simple(spec),
        }
    }
}

impl From<&str> for Terrain {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}
