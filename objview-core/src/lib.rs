/// objview core library - Wavefront OBJ/MTL loading
///
/// Parses OBJ geometry and MTL material libraries into an indexed
/// [`MeshModel`]: vertex, normal and texcoord buffers, triangle faces bound to
/// materials, and the bounding statistics used to frame a camera. Rendering is
/// left to the caller, which consumes the model batch by batch.

pub mod buffer;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod geometry;
pub mod material;
pub mod mesh;
pub mod mtl;
pub mod obj;
mod parse;
pub mod texture;

// Re-export commonly used types
pub use config::{LoaderConfig, TextureConfig, ViewerConfig};
pub use diagnostics::Diagnostics;
pub use error::{ConfigError, LoadError};
pub use geometry::{Bounds, Face, FaceVertexRef, Normal, TexCoord, Vertex};
pub use material::{Material, MaterialId, MaterialTable};
pub use mesh::{MaterialBatch, MeshModel, ResolvedCorner};
pub use obj::{ObjLoader, ParserContext};
pub use texture::{ImageTextureLoader, NullTextureLoader, TextureHandle, TextureLoader};
