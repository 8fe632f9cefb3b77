//! Settings validation.

use std::path::Path;

use rmg_core::settings::MapSettings;
use ron::ser::PrettyConfig;

use crate::error::Result;

/// Load `path` as RON map settings and check that they are usable.
pub fn validate_settings_file(path: &Path) -> Result<MapSettings> {
    let settings = MapSettings::load(path)?;
    tracing::debug!(
        size = settings.size,
        seed = settings.seed,
        texture = %settings.base_texture,
        "Settings are valid"
    );
    Ok(settings)
}

/// Render settings back to RON with every default filled in.
pub fn normalized_settings(settings: &MapSettings) -> Result<String> {
    Ok(ron::ser::to_string_pretty(settings, PrettyConfig::default())?)
}
