/// Counters for lines the loader skipped or degraded on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Diagnostics {
    /// `v`, `vn` or `vt` lines without enough numbers
    pub malformed_geometry: usize,
    /// `f` lines that matched none of the supported formats
    pub dropped_faces: usize,
    /// `usemtl` lines naming a material that was never defined
    pub unresolved_materials: usize,
    /// Material libraries that could not be opened or read
    pub missing_libraries: usize,
    /// Material library lines with missing or non-numeric values
    pub malformed_material_lines: usize,
    /// Texture maps whose acquisition failed
    pub failed_textures: usize,
    /// Comments, blank lines and directives the loader does not handle
    pub ignored_lines: usize,
}

impl Diagnostics {
    /// Number of lines that lost information
    pub fn skipped(&self) -> usize {
        self.malformed_geometry
            + self.dropped_faces
            + self.unresolved_materials
            + self.malformed_material_lines
    }

    pub fn is_clean(&self) -> bool {
        self.skipped() == 0 && self.missing_libraries == 0 && self.failed_textures == 0
    }
}
