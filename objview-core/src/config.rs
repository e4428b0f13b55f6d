/// Loader configuration
///
/// Every field has a default, so a config file only needs the keys it
/// changes:
///
/// ```toml
/// [loader]
/// triangulate_polygons = true
///
/// [textures]
/// flip_vertically = false
/// ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::buffer::{GEOMETRY_BASE_CAPACITY, MATERIAL_BASE_CAPACITY};
use crate::error::ConfigError;
use crate::material::MAX_MATERIAL_NAME_LEN;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub loader: LoaderConfig,
    pub textures: TextureConfig,
}

impl ViewerConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}

/// Parser settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Initial capacity of the vertex, normal, texcoord and face buffers
    pub geometry_capacity: usize,
    /// Initial capacity of the material table
    pub material_capacity: usize,
    /// Material names are truncated to this many characters
    pub max_material_name_len: usize,
    /// Fan-split faces with more than three corners instead of dropping them
    pub triangulate_polygons: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            geometry_capacity: GEOMETRY_BASE_CAPACITY,
            material_capacity: MATERIAL_BASE_CAPACITY,
            max_material_name_len: MAX_MATERIAL_NAME_LEN,
            triangulate_polygons: false,
        }
    }
}

/// Texture decoding settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureConfig {
    /// Flip rows so the first row is the bottom of the image
    pub flip_vertically: bool,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            flip_vertically: true,
        }
    }
}
