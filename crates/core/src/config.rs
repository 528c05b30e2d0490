//! Generator tuning knobs, loadable from TOML. Missing keys fall back to defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::archetype::ArchetypeId;
use crate::error::GenError;

/// Smallest width or height the generator accepts.
pub const MIN_DIMENSION: usize = 8;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    pub width: usize,
    pub height: usize,
    /// Fixed archetype; `None` picks one uniformly per level.
    pub archetype: Option<ArchetypeId>,
    pub spawn_radius: usize,
    pub boss_door_level: u32,
    pub door_fallback_radius: usize,
    pub boss_door_search_radius: usize,
    pub repair_sample_limit: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            width: 40,
            height: 20,
            archetype: None,
            spawn_radius: 1,
            boss_door_level: 3,
            door_fallback_radius: 12,
            boss_door_search_radius: 5,
            repair_sample_limit: 50,
        }
    }
}

impl GeneratorConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, GenError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, GenError> {
        let raw = fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<(), GenError> {
        check_dimensions(self.width, self.height)?;
        if self.spawn_radius == 0 {
            return Err(GenError::InvalidConfig("spawn_radius must be at least 1".to_string()));
        }
        let spawn_span = 2 * self.spawn_radius + 3;
        if spawn_span > self.width || spawn_span > self.height {
            return Err(GenError::InvalidConfig(format!(
                "spawn_radius {} does not fit a {}x{} grid",
                self.spawn_radius, self.width, self.height
            )));
        }
        if self.repair_sample_limit == 0 {
            return Err(GenError::InvalidConfig(
                "repair_sample_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

pub fn check_dimensions(width: usize, height: usize) -> Result<(), GenError> {
    if width < MIN_DIMENSION || height < MIN_DIMENSION {
        return Err(GenError::InvalidDimensions { width, height, minimum: MIN_DIMENSION });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn empty_document_yields_defaults() {
        let config = GeneratorConfig::from_toml_str("").expect("empty config is valid");
        assert_eq!(config, GeneratorConfig::default());
    }

    #[test]
    fn partial_document_overrides_only_given_keys() {
        let config = GeneratorConfig::from_toml_str(
            "width = 60\nheight = 30\narchetype = \"forest\"\nboss_door_level = 5\n",
        )
        .expect("valid config");
        assert_eq!(config.width, 60);
        assert_eq!(config.height, 30);
        assert_eq!(config.archetype, Some(ArchetypeId::Forest));
        assert_eq!(config.boss_door_level, 5);
        assert_eq!(config.spawn_radius, 1);
    }

    #[test]
    fn rejects_tiny_grids_and_unknown_keys() {
        assert!(matches!(
            GeneratorConfig::from_toml_str("width = 4"),
            Err(GenError::InvalidDimensions { width: 4, .. })
        ));
        assert!(matches!(GeneratorConfig::from_toml_str("colour = 3"), Err(GenError::Toml(_))));
        assert!(matches!(
            GeneratorConfig::from_toml_str("spawn_radius = 0"),
            Err(GenError::InvalidConfig(_))
        ));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("levelgen.toml");
        fs::write(&path, "height = 24\nspawn_radius = 2\n").expect("write");

        let config = GeneratorConfig::load(&path).expect("load");
        assert_eq!(config.height, 24);
        assert_eq!(config.spawn_radius, 2);

        let missing = GeneratorConfig::load(&dir.path().join("missing.toml"));
        assert!(matches!(missing, Err(GenError::Io(_))));
    }
}
