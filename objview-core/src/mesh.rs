/// The loaded model and its render grouping
///
/// A [`MeshModel`] is immutable geometry. Renderers draw it one
/// [`MaterialBatch`] at a time so material and texture state changes once per
/// material rather than once per face.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use crate::diagnostics::Diagnostics;
use crate::geometry::{Bounds, Face, FaceVertexRef, Normal, TexCoord, Vertex};
use crate::material::{Material, MaterialId, MaterialTable};
use crate::texture::TextureHandle;

/// Indexed triangle mesh with its materials and bounds
#[derive(Debug, Clone)]
pub struct MeshModel {
    source: PathBuf,
    vertices: Vec<Vertex>,
    normals: Vec<Normal>,
    texcoords: Vec<TexCoord>,
    faces: Vec<Face>,
    materials: MaterialTable,
    bounds: Bounds,
    diagnostics: Diagnostics,
    default_texture: Option<TextureHandle>,
}

/// One triangle corner with its indices resolved. Slots that are absent or
/// out of range are `None`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedCorner<'a> {
    pub position: Option<&'a Vertex>,
    pub normal: Option<&'a Normal>,
    pub texcoord: Option<&'a TexCoord>,
}

/// Faces sharing one material, in insertion order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialBatch {
    /// `None` for faces drawn without a material
    pub material: Option<MaterialId>,
    pub faces: Vec<usize>,
}

impl MaterialBatch {
    /// Material state to bind before drawing this batch
    pub fn shading<'m>(&self, model: &'m MeshModel) -> Cow<'m, Material> {
        match self.material.and_then(|id| model.material(id)) {
            Some(material) => Cow::Borrowed(material),
            None => Cow::Owned(Material::unassigned()),
        }
    }

    /// Texture to bind. The unassigned batch uses the model's default texture.
    pub fn texture(&self, model: &MeshModel) -> Option<TextureHandle> {
        match self.material.and_then(|id| model.material(id)) {
            Some(material) => material.texture,
            None => model.default_texture,
        }
    }
}

impl MeshModel {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        source: PathBuf,
        vertices: Vec<Vertex>,
        normals: Vec<Normal>,
        texcoords: Vec<TexCoord>,
        faces: Vec<Face>,
        materials: MaterialTable,
        bounds: Bounds,
        diagnostics: Diagnostics,
    ) -> Self {
        Self {
            source,
            vertices,
            normals,
            texcoords,
            faces,
            materials,
            bounds,
            diagnostics,
            default_texture: None,
        }
    }

    /// File the model was loaded from
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn normals(&self) -> &[Normal] {
        &self.normals
    }

    pub fn texcoords(&self) -> &[TexCoord] {
        &self.texcoords
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn materials(&self) -> &MaterialTable {
        &self.materials
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id)
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Texture bound to faces without a material, set by
    /// [`MeshModel::fill_missing_textures`]
    pub fn default_texture(&self) -> Option<TextureHandle> {
        self.default_texture
    }

    /// Look up a corner's attributes, treating out-of-range indices as absent
    pub fn resolve(&self, corner: &FaceVertexRef) -> ResolvedCorner<'_> {
        ResolvedCorner {
            position: corner.vertex.and_then(|i| self.vertices.get(i)),
            normal: corner.normal.and_then(|i| self.normals.get(i)),
            texcoord: corner.texcoord.and_then(|i| self.texcoords.get(i)),
        }
    }

    /// Group faces by material.
    ///
    /// The unassigned batch comes first, followed by one batch per material in
    /// table order (empty batches included). Every face lands in exactly one
    /// batch; a material id outside the table counts as unassigned.
    pub fn batches(&self) -> Vec<MaterialBatch> {
        let mut batches = Vec::with_capacity(self.materials.len() + 1);
        batches.push(MaterialBatch {
            material: None,
            faces: Vec::new(),
        });
        batches.extend(self.materials.iter().map(|(id, _)| MaterialBatch {
            material: Some(id),
            faces: Vec::new(),
        }));

        for (index, face) in self.faces.iter().enumerate() {
            let slot = match face.material {
                Some(id) if id.index() < self.materials.len() => id.index() + 1,
                _ => 0,
            };
            batches[slot].faces.push(index);
        }

        batches
    }

    /// Give every untextured material `texture` and make it the texture of
    /// the unassigned batch. Returns how many materials changed.
    pub fn fill_missing_textures(&mut self, texture: TextureHandle) -> usize {
        self.default_texture = Some(texture);
        let mut filled = 0;
        for material in self.materials.iter_mut() {
            if material.texture.is_none() {
                material.texture = Some(texture);
                filled += 1;
            }
        }
        filled
    }
}
