/// Geometry primitives produced by the OBJ parser
use nalgebra::{Point3, Vector2, Vector3};

use crate::material::MaterialId;

/// A vertex position in model space
pub type Vertex = Point3<f32>;
/// A vertex normal
pub type Normal = Vector3<f32>;
/// A texture coordinate (u, v)
pub type TexCoord = Vector2<f32>;

/// Index triple selecting the position, normal and texture coordinate of one
/// triangle corner. Indices are 0-based; `None` means the slot is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FaceVertexRef {
    pub vertex: Option<usize>,
    pub normal: Option<usize>,
    pub texcoord: Option<usize>,
}

impl FaceVertexRef {
    pub fn new(vertex: Option<usize>, normal: Option<usize>, texcoord: Option<usize>) -> Self {
        Self {
            vertex,
            normal,
            texcoord,
        }
    }

    /// Build a reference from raw 1-based OBJ indices. Zero and negative
    /// values are not resolved and become absent.
    pub fn from_obj(vertex: i64, normal: Option<i64>, texcoord: Option<i64>) -> Self {
        Self {
            vertex: obj_index(vertex),
            normal: normal.and_then(obj_index),
            texcoord: texcoord.and_then(obj_index),
        }
    }
}

fn obj_index(raw: i64) -> Option<usize> {
    if raw >= 1 {
        usize::try_from(raw - 1).ok()
    } else {
        None
    }
}

/// A triangle face with the material that was active when it was parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    pub corners: [FaceVertexRef; 3],
    pub material: Option<MaterialId>,
}

impl Face {
    pub fn new(corners: [FaceVertexRef; 3], material: Option<MaterialId>) -> Self {
        Self { corners, material }
    }
}

/// Running axis-aligned extents of the vertex stream
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl BoundingBox {
    /// An inverted box that any point will expand
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: Point3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn include(&mut self, point: &Vertex) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }

    /// Center and largest-axis span, or `None` if no point was included
    pub fn bounds(&self) -> Option<Bounds> {
        if self.is_empty() {
            return None;
        }

        let extent = self.max - self.min;
        Some(Bounds {
            center: nalgebra::center(&self.min, &self.max),
            size: extent.x.abs().max(extent.y.abs()).max(extent.z.abs()),
        })
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

/// Bounding statistics used to frame a camera around the model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub center: Point3<f32>,
    /// Largest of the three axis extents; zero for single-point or planar models
    pub size: f32,
}

impl Bounds {
    /// Size safe for deriving camera distance and far plane
    pub fn framing_size(&self) -> f32 {
        if self.size > f32::EPSILON {
            self.size
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_obj_indices_are_rebased() {
        let corner = FaceVertexRef::from_obj(3, Some(1), None);
        assert_eq!(corner.vertex, Some(2));
        assert_eq!(corner.normal, Some(0));
        assert_eq!(corner.texcoord, None);
    }

    #[test]
    fn test_zero_and_negative_indices_are_absent() {
        let corner = FaceVertexRef::from_obj(0, Some(-1), Some(-5));
        assert_eq!(corner, FaceVertexRef::default());
    }

    #[test]
    fn test_bounding_box_center_and_size() {
        let mut bbox = BoundingBox::empty();
        assert!(bbox.bounds().is_none());

        bbox.include(&Vertex::new(-1.0, -1.0, -1.0));
        bbox.include(&Vertex::new(1.0, 1.0, 1.0));

        let bounds = bbox.bounds().unwrap();
        assert_eq!(bounds.center, Point3::origin());
        assert!((bounds.size - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_size_uses_largest_axis() {
        let mut bbox = BoundingBox::empty();
        bbox.include(&Vertex::new(0.0, 0.0, 0.0));
        bbox.include(&Vertex::new(1.0, 4.0, -2.0));

        let bounds = bbox.bounds().unwrap();
        assert!((bounds.size - 4.0).abs() < 1e-6);
        assert!((bounds.center.y - 2.0).abs() < 1e-6);
        assert!((bounds.center.z + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_bounds_framing() {
        let mut bbox = BoundingBox::empty();
        bbox.include(&Vertex::new(5.0, 5.0, 5.0));

        let bounds = bbox.bounds().unwrap();
        assert_eq!(bounds.size, 0.0);
        assert_eq!(bounds.framing_size(), 1.0);
    }
}
