/// Material records and the name-indexed material table

use std::path::PathBuf;

use crate::buffer::{DynamicBuffer, MATERIAL_BASE_CAPACITY};
use crate::error::BufferError;
use crate::texture::TextureHandle;

/// Longest material name kept; longer names are truncated
pub const MAX_MATERIAL_NAME_LEN: usize = 127;

/// Index of a material in its [`MaterialTable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MaterialId(pub usize);

impl MaterialId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Shading attributes of a named material
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    pub shininess: f32,
    /// Handle returned by texture acquisition; `None` while untextured
    pub texture: Option<TextureHandle>,
    /// Resolved path of the texture map that was requested, if any
    pub texture_path: Option<PathBuf>,
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ambient: [0.2, 0.2, 0.2, 1.0],
            diffuse: [0.8, 0.8, 0.8, 1.0],
            specular: [0.0, 0.0, 0.0, 1.0],
            shininess: 0.0,
            texture: None,
            texture_path: None,
        }
    }

    /// Shading used for faces drawn without any material
    pub fn unassigned() -> Self {
        Self {
            ambient: [0.0, 0.0, 0.0, 1.0],
            diffuse: [1.0, 1.0, 1.0, 1.0],
            ..Self::new("")
        }
    }
}

/// Materials in definition order.
///
/// `add` never deduplicates: defining the same name twice yields two entries,
/// and `find` returns the first, leaving the later one unreachable by name.
#[derive(Debug, Clone)]
pub struct MaterialTable {
    materials: DynamicBuffer<Material>,
    max_name_len: usize,
}

impl MaterialTable {
    pub fn new() -> Self {
        Self::with_limits(MATERIAL_BASE_CAPACITY, MAX_MATERIAL_NAME_LEN)
    }

    pub fn with_limits(base_capacity: usize, max_name_len: usize) -> Self {
        Self {
            materials: DynamicBuffer::new(base_capacity),
            max_name_len,
        }
    }

    /// Create a material with default attributes and return its id
    pub fn add(&mut self, name: &str) -> Result<MaterialId, BufferError> {
        let name = truncate_name(name, self.max_name_len);
        self.materials.append(Material::new(name)).map(MaterialId)
    }

    /// Exact, case-sensitive lookup; the first match wins
    pub fn find(&self, name: &str) -> Option<MaterialId> {
        let name = truncate_name(name, self.max_name_len);
        self.materials
            .iter()
            .position(|material| material.name == name)
            .map(MaterialId)
    }

    pub fn get(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0)
    }

    pub fn get_mut(&mut self, id: MaterialId) -> Option<&mut Material> {
        self.materials.get_mut(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (MaterialId, &Material)> {
        self.materials
            .iter()
            .enumerate()
            .map(|(index, material)| (MaterialId(index), material))
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Material> {
        self.materials.iter_mut()
    }
}

impl Default for MaterialTable {
    fn default() -> Self {
        Self::new()
    }
}

fn truncate_name(name: &str, max_len: usize) -> &str {
    match name.char_indices().nth(max_len) {
        Some((cut, _)) => &name[..cut],
        None => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_material_defaults() {
        let material = Material::new("steel");
        assert_eq!(material.ambient, [0.2, 0.2, 0.2, 1.0]);
        assert_eq!(material.diffuse, [0.8, 0.8, 0.8, 1.0]);
        assert_eq!(material.specular, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(material.shininess, 0.0);
        assert!(material.texture.is_none());
    }

    #[test]
    fn test_find_is_exact_and_case_sensitive() {
        let mut table = MaterialTable::new();
        let red = table.add("Red").unwrap();
        table.add("blue").unwrap();

        assert_eq!(table.find("Red"), Some(red));
        assert_eq!(table.find("red"), None);
        assert_eq!(table.find("Re"), None);
    }

    #[test]
    fn test_redefinition_keeps_both_and_first_wins() {
        let mut table = MaterialTable::new();
        let first = table.add("dup").unwrap();
        let second = table.add("dup").unwrap();

        assert_ne!(first, second);
        assert_eq!(table.len(), 2);
        assert_eq!(table.find("dup"), Some(first));
    }

    #[test]
    fn test_long_names_are_truncated() {
        let mut table = MaterialTable::with_limits(8, 4);
        let id = table.add("abcdefgh").unwrap();
        assert_eq!(table.get(id).unwrap().name, "abcd");
        assert_eq!(table.find("abcdxyz"), Some(id));
    }
}
