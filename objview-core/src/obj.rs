/// Wavefront OBJ geometry parser
///
/// The parser is a single pass over the file. All mutable state lives in a
/// [`ParserContext`], so independent loads never share anything.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::buffer::DynamicBuffer;
use crate::config::LoaderConfig;
use crate::diagnostics::Diagnostics;
use crate::error::LoadError;
use crate::geometry::{BoundingBox, Bounds, Face, FaceVertexRef, Normal, TexCoord, Vertex};
use crate::material::{MaterialId, MaterialTable};
use crate::mesh::MeshModel;
use crate::mtl;
use crate::parse;
use crate::texture::TextureLoader;

/// Loads OBJ files into [`MeshModel`]s
#[derive(Debug, Clone, Default)]
pub struct ObjLoader {
    config: LoaderConfig,
}

impl ObjLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Load the OBJ file at `path`. Material libraries and texture maps are
    /// resolved relative to the file's directory.
    pub fn load(
        &self,
        path: impl AsRef<Path>,
        textures: &mut dyn TextureLoader,
    ) -> Result<MeshModel, LoadError> {
        let path = path.as_ref();
        let base_dir = base_dir(path);

        let file = File::open(path).map_err(|source| LoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        log::info!("Loading {} (base dir: {})", path.display(), base_dir.display());
        self.read(BufReader::new(file), path, base_dir, textures)
    }

    /// Parse OBJ text from any reader, resolving relative paths against `base_dir`
    pub fn parse<R: BufRead>(
        &self,
        reader: R,
        base_dir: impl Into<PathBuf>,
        textures: &mut dyn TextureLoader,
    ) -> Result<MeshModel, LoadError> {
        self.read(reader, Path::new("<input>"), base_dir.into(), textures)
    }

    fn read<R: BufRead>(
        &self,
        reader: R,
        source: &Path,
        base_dir: PathBuf,
        textures: &mut dyn TextureLoader,
    ) -> Result<MeshModel, LoadError> {
        let mut context = ParserContext::new(&self.config, base_dir, textures);

        parse::for_each_line(reader, |line| context.parse_line(line).map_err(ReadFailure::Load))
            .map_err(|failure| match failure {
                ReadFailure::Io(e) => LoadError::Read {
                    path: source.to_path_buf(),
                    source: e,
                },
                ReadFailure::Load(e) => e,
            })?;

        context.finish(source)
    }
}

enum ReadFailure {
    Io(io::Error),
    Load(LoadError),
}

impl From<io::Error> for ReadFailure {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// Directory that relative `mtllib` and texture paths are resolved against
pub fn base_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Mutable state of one load: geometry buffers, material table, the current
/// material cursor and the running bounding box.
pub struct ParserContext<'t> {
    base_dir: PathBuf,
    triangulate: bool,
    vertices: DynamicBuffer<Vertex>,
    normals: DynamicBuffer<Normal>,
    texcoords: DynamicBuffer<TexCoord>,
    faces: DynamicBuffer<Face>,
    materials: MaterialTable,
    current_material: Option<MaterialId>,
    bbox: BoundingBox,
    diagnostics: Diagnostics,
    textures: &'t mut dyn TextureLoader,
}

impl<'t> ParserContext<'t> {
    pub fn new(
        config: &LoaderConfig,
        base_dir: impl Into<PathBuf>,
        textures: &'t mut dyn TextureLoader,
    ) -> Self {
        let capacity = config.geometry_capacity;
        Self {
            base_dir: base_dir.into(),
            triangulate: config.triangulate_polygons,
            vertices: DynamicBuffer::new(capacity),
            normals: DynamicBuffer::new(capacity),
            texcoords: DynamicBuffer::new(capacity),
            faces: DynamicBuffer::new(capacity),
            materials: MaterialTable::with_limits(
                config.material_capacity,
                config.max_material_name_len,
            ),
            current_material: None,
            bbox: BoundingBox::empty(),
            diagnostics: Diagnostics::default(),
            textures,
        }
    }

    /// Material that faces parsed now would be bound to
    pub fn current_material(&self) -> Option<MaterialId> {
        self.current_material
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Apply one line of OBJ text. Only allocation failure is an error.
    pub fn parse_line(&mut self, line: &str) -> Result<(), LoadError> {
        let Some((keyword, args)) = parse::directive(line) else {
            self.diagnostics.ignored_lines += 1;
            return Ok(());
        };

        match keyword {
            "v" => match parse::vector3(args) {
                Ok((_, (x, y, z))) => {
                    let vertex = Vertex::new(x, y, z);
                    self.vertices.append(vertex)?;
                    self.bbox.include(&vertex);
                }
                Err(_) => self.malformed_geometry(line),
            },
            "vn" => match parse::vector3(args) {
                Ok((_, (x, y, z))) => {
                    self.normals.append(Normal::new(x, y, z))?;
                }
                Err(_) => self.malformed_geometry(line),
            },
            "vt" => match parse::vector2(args) {
                Ok((_, (u, v))) => {
                    self.texcoords.append(TexCoord::new(u, v))?;
                }
                Err(_) => self.malformed_geometry(line),
            },
            "mtllib" => self.load_libraries(args)?,
            "usemtl" => self.use_material(args),
            "f" => self.add_faces(line, args)?,
            _ => self.diagnostics.ignored_lines += 1,
        }
        Ok(())
    }

    fn malformed_geometry(&mut self, line: &str) {
        log::debug!("Skipping malformed line: {:?}", line.trim_end());
        self.diagnostics.malformed_geometry += 1;
    }

    /// Every listed library is parsed, even one seen before
    fn load_libraries(&mut self, args: &str) -> Result<(), LoadError> {
        let mut any = false;
        for file_name in args.split_whitespace() {
            any = true;
            let path = self.base_dir.join(file_name);
            mtl::load_library(
                &path,
                &self.base_dir,
                &mut self.materials,
                &mut *self.textures,
                &mut self.diagnostics,
            )?;
        }
        if !any {
            log::debug!("mtllib without a file name");
            self.diagnostics.ignored_lines += 1;
        }
        Ok(())
    }

    fn use_material(&mut self, args: &str) {
        let name = parse::first_token(args).unwrap_or("");
        self.current_material = self.materials.find(name);
        if self.current_material.is_none() {
            log::warn!("Material '{}' not found, using no material", name);
            self.diagnostics.unresolved_materials += 1;
        }
    }

    fn add_faces(&mut self, line: &str, args: &str) -> Result<(), LoadError> {
        let corners = match parse::face_corners(args) {
            Some(corners) if corners.len() == 3 || (corners.len() > 3 && self.triangulate) => {
                corners
            }
            _ => {
                log::debug!("Dropping unsupported face: {:?}", line.trim_end());
                self.diagnostics.dropped_faces += 1;
                return Ok(());
            }
        };

        // Fan around the first corner; a triangle yields exactly one face
        for pair in corners[1..].windows(2) {
            let triangle: [FaceVertexRef; 3] = [corners[0], pair[0], pair[1]];
            self.faces.append(Face::new(triangle, self.current_material))?;
        }
        Ok(())
    }

    /// Finalize bounds and hand the buffers to a [`MeshModel`]
    pub fn finish(self, source: &Path) -> Result<MeshModel, LoadError> {
        if self.vertices.is_empty() {
            return Err(LoadError::NoVertices {
                path: source.to_path_buf(),
            });
        }

        let bounds = self.bbox.bounds().unwrap_or(Bounds {
            center: Vertex::origin(),
            size: 0.0,
        });

        log::info!(
            "Loaded {}: center ({:.2}, {:.2}, {:.2}), size {:.2}",
            source.display(),
            bounds.center.x,
            bounds.center.y,
            bounds.center.z,
            bounds.size
        );
        log::info!(
            "Vertices: {}, normals: {}, texcoords: {}, faces: {}, materials: {}",
            self.vertices.len(),
            self.normals.len(),
            self.texcoords.len(),
            self.faces.len(),
            self.materials.len()
        );
        if !self.diagnostics.is_clean() {
            log::warn!(
                "{} line(s) skipped while loading {}",
                self.diagnostics.skipped(),
                source.display()
            );
        }

        Ok(MeshModel::from_parts(
            source.to_path_buf(),
            self.vertices.into_vec(),
            self.normals.into_vec(),
            self.texcoords.into_vec(),
            self.faces.into_vec(),
            self.materials,
            bounds,
            self.diagnostics,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::NullTextureLoader;

    fn parse(source: &str) -> Result<MeshModel, LoadError> {
        ObjLoader::default().parse(source.as_bytes(), ".", &mut NullTextureLoader)
    }

    #[test]
    fn test_vertices_appended_in_file_order() {
        let mut textures = NullTextureLoader;
        let mut context = ParserContext::new(&LoaderConfig::default(), ".", &mut textures);

        for (i, line) in ["v 1 2 3", "v 4 5 6", "v 7 8 9"].iter().enumerate() {
            context.parse_line(line).unwrap();
            assert_eq!(context.vertex_count(), i + 1);
        }

        let model = context.finish(Path::new("test.obj")).unwrap();
        assert_eq!(model.vertices()[1], Vertex::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn test_full_face_format_resolves_every_slot() {
        let model = parse(
            "v 0 0 0\nv 1 0 0\nv 0 1 0\n\
             vt 0 0\nvt 1 0\nvt 0 1\n\
             vn 0 0 1\nvn 0 0 1\nvn 0 0 1\n\
             f 1/1/1 2/2/2 3/3/3\n",
        )
        .unwrap();

        assert_eq!(model.faces().len(), 1);
        for corner in &model.faces()[0].corners {
            let resolved = model.resolve(corner);
            assert!(resolved.position.is_some());
            assert!(resolved.normal.is_some());
            assert!(resolved.texcoord.is_some());
        }
        assert_eq!(model.resolve(&model.faces()[0].corners[2]).texcoord.unwrap().y, 1.0);
    }

    #[test]
    fn test_bare_face_has_no_normals_or_texcoords() {
        let model = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        let face = &model.faces()[0];
        for (i, corner) in face.corners.iter().enumerate() {
            assert_eq!(corner.vertex, Some(i));
            assert_eq!(corner.normal, None);
            assert_eq!(corner.texcoord, None);
        }
    }

    #[test]
    fn test_normal_only_face_format() {
        let model = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1\n").unwrap();
        let corner = model.faces()[0].corners[1];
        assert_eq!(corner, FaceVertexRef::new(Some(1), Some(0), None));
    }

    #[test]
    fn test_trailing_comments_are_ignored() {
        let model = parse("v 0 0 0 # origin\nv 1 0 0\nv 0 1 0\nf 1 2 3 # tri\n").unwrap();
        assert_eq!(model.faces().len(), 1);
        assert_eq!(model.diagnostics().dropped_faces, 0);
        assert_eq!(model.faces()[0].corners[2].vertex, Some(2));
    }

    #[test]
    fn test_unsupported_faces_are_dropped() {
        let model = parse(
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nv 1 1 0\n\
             f 1 2 3 4\nf 1/1 2/2 3/3\nf 1/1/1 2//2 3\nf 1 2\nf 1 2 3\n",
        )
        .unwrap();

        assert_eq!(model.faces().len(), 1);
        assert_eq!(model.diagnostics().dropped_faces, 4);
    }

    #[test]
    fn test_polygons_fan_split_when_enabled() {
        let config = LoaderConfig {
            triangulate_polygons: true,
            ..Default::default()
        };
        let model = ObjLoader::new(config)
            .parse(
                "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nv 0 2 0\nf 1 2 3 4 5\n".as_bytes(),
                ".",
                &mut NullTextureLoader,
            )
            .unwrap();

        let vertex_ids: Vec<[Option<usize>; 3]> = model
            .faces()
            .iter()
            .map(|f| [f.corners[0].vertex, f.corners[1].vertex, f.corners[2].vertex])
            .collect();
        assert_eq!(
            vertex_ids,
            vec![
                [Some(0), Some(1), Some(2)],
                [Some(0), Some(2), Some(3)],
                [Some(0), Some(3), Some(4)],
            ]
        );
    }

    #[test]
    fn test_unknown_material_resets_cursor_and_continues() {
        let mut textures = NullTextureLoader;
        let mut context = ParserContext::new(&LoaderConfig::default(), ".", &mut textures);
        for line in ["v 0 0 0", "v 1 0 0", "v 0 1 0", "usemtl ghost", "f 1 2 3"] {
            context.parse_line(line).unwrap();
        }

        assert_eq!(context.current_material(), None);
        assert_eq!(context.diagnostics().unresolved_materials, 1);
        assert_eq!(context.face_count(), 1);

        let model = context.finish(Path::new("ghost.obj")).unwrap();
        assert_eq!(model.faces()[0].material, None);
    }

    #[test]
    fn test_bounds_of_unit_cube_corners() {
        let model = parse("v -1 -1 -1\nv 1 1 1\n").unwrap();
        let bounds = model.bounds();
        assert_eq!(bounds.center, Vertex::origin());
        assert!((bounds.size - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_no_vertices_is_fatal() {
        let result = parse("vn 0 0 1\nvt 0 0\nf 1 2 3\nf 1//1 2//1 3//1\n");
        assert!(matches!(result, Err(LoadError::NoVertices { .. })));
    }

    #[test]
    fn test_malformed_and_unknown_lines_are_counted() {
        let model = parse("# comment\no cube\nv 1 2\nv 0 0 0\nvn x y z\nvt 1\ns off\n\n").unwrap();
        let diagnostics = model.diagnostics();
        assert_eq!(model.vertices().len(), 1);
        assert_eq!(diagnostics.malformed_geometry, 3);
        assert_eq!(diagnostics.ignored_lines, 4);
    }

    #[test]
    fn test_base_dir() {
        assert_eq!(base_dir(Path::new("models/cube.obj")), PathBuf::from("models"));
        assert_eq!(base_dir(Path::new("cube.obj")), PathBuf::from("."));
    }
}
