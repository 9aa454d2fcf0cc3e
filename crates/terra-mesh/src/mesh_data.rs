//! Render-ready mesh buffers with a skirt for boundary normals.

use glam::{DVec2, DVec3};

/// Index of a vertex produced by the mesh builder.
///
/// `Main` vertices land in the render buffers. `Skirt` vertices form the
/// outermost grid ring: they are kept in a separate buffer, referenced only
/// by skirt triangles, and exist solely so boundary vertices receive the
/// same normal contributions they would get from the neighbouring chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VertexId {
    /// Index into the render vertex buffer.
    Main(u32),
    /// Index into the skirt vertex buffer.
    Skirt(u32),
}

/// Vertex, triangle, uv, and normal buffers for one chunk at one LOD.
///
/// Immutable once built. Triangle indices only ever reference the render
/// vertex buffer; the skirt buffers are internal to normal baking and are
/// never exposed.
#[derive(Clone, Debug, Default)]
pub struct TerrainMeshData {
    vertices: Vec<DVec3>,
    triangles: Vec<[u32; 3]>,
    uvs: Vec<DVec2>,
    normals: Vec<DVec3>,
    skirt_vertices: Vec<DVec3>,
    skirt_triangles: Vec<[VertexId; 3]>,
    use_flat_shading: bool,
}

impl TerrainMeshData {
    /// Create an empty mesh with exactly-sized buffers.
    pub(crate) fn with_capacities(
        vertex_count: usize,
        triangle_count: usize,
        skirt_vertex_count: usize,
        skirt_triangle_count: usize,
        use_flat_shading: bool,
    ) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            triangles: Vec::with_capacity(triangle_count),
            uvs: Vec::with_capacity(vertex_count),
            normals: Vec::new(),
            skirt_vertices: Vec::with_capacity(skirt_vertex_count),
            skirt_triangles: Vec::with_capacity(skirt_triangle_count),
            use_flat_shading,
        }
    }

    /// Append a vertex. Main vertices carry a uv; skirt vertices only a
    /// position. Vertices must arrive in index order within each buffer.
    pub(crate) fn add_vertex(&mut self, id: VertexId, position: DVec3, uv: DVec2) {
        match id {
            VertexId::Main(index) => {
                debug_assert_eq!(index as usize, self.vertices.len());
                self.vertices.push(position);
                self.uvs.push(uv);
            }
            VertexId::Skirt(index) => {
                debug_assert_eq!(index as usize, self.skirt_vertices.len());
                self.skirt_vertices.push(position);
            }
        }
    }

    /// Append a triangle. Triangles touching the skirt go to the skirt
    /// buffer and contribute only to normal baking.
    pub(crate) fn add_triangle(&mut self, a: VertexId, b: VertexId, c: VertexId) {
        match (a, b, c) {
            (VertexId::Main(a), VertexId::Main(b), VertexId::Main(c)) => {
                self.triangles.push([a, b, c]);
            }
            _ => self.skirt_triangles.push([a, b, c]),
        }
    }

    /// Finalize the mesh: bake smooth normals, or duplicate vertices per
    /// triangle for flat shading.
    pub(crate) fn process(&mut self) {
        if self.use_flat_shading {
            self.flat_shade();
        } else {
            self.normals = self.bake_normals();
        }
    }

    fn position(&self, id: VertexId) -> DVec3 {
        match id {
            VertexId::Main(index) => self.vertices[index as usize],
            VertexId::Skirt(index) => self.skirt_vertices[index as usize],
        }
    }

    fn face_normal(&self, a: VertexId, b: VertexId, c: VertexId) -> DVec3 {
        let pa = self.position(a);
        let ab = self.position(b) - pa;
        let ac = self.position(c) - pa;
        ab.cross(ac).normalize_or_zero()
    }

    /// Smooth per-vertex normals: sum of adjacent face normals, including
    /// skirt triangles so the true boundary shades like chunk interior.
    fn bake_normals(&self) -> Vec<DVec3> {
        let mut normals = vec![DVec3::ZERO; self.vertices.len()];

        for &[a, b, c] in &self.triangles {
            let face = self.face_normal(VertexId::Main(a), VertexId::Main(b), VertexId::Main(c));
            normals[a as usize] += face;
            normals[b as usize] += face;
            normals[c as usize] += face;
        }

        for &[a, b, c] in &self.skirt_triangles {
            let face = self.face_normal(a, b, c);
            for id in [a, b, c] {
                if let VertexId::Main(index) = id {
                    normals[index as usize] += face;
                }
            }
        }

        for normal in &mut normals {
            *normal = normal.normalize_or_zero();
        }
        normals
    }

    /// Give every triangle its own three vertices so each face shades
    /// uniformly. The per-face normal is stored on all three duplicates;
    /// hosts with a recompute-normals step may ignore the buffer.
    fn flat_shade(&mut self) {
        let mut flat_vertices = Vec::with_capacity(self.triangles.len() * 3);
        let mut flat_uvs = Vec::with_capacity(self.triangles.len() * 3);
        let mut flat_normals = Vec::with_capacity(self.triangles.len() * 3);
        let mut flat_triangles = Vec::with_capacity(self.triangles.len());

        for &[a, b, c] in &self.triangles {
            let base = flat_vertices.len() as u32;
            let face = self.face_normal(VertexId::Main(a), VertexId::Main(b), VertexId::Main(c));
            for index in [a, b, c] {
                flat_vertices.push(self.vertices[index as usize]);
                flat_uvs.push(self.uvs[index as usize]);
                flat_normals.push(face);
            }
            flat_triangles.push([base, base + 1, base + 2]);
        }

        self.vertices = flat_vertices;
        self.uvs = flat_uvs;
        self.normals = flat_normals;
        self.triangles = flat_triangles;
        self.skirt_vertices.clear();
        self.skirt_triangles.clear();
    }

    /// Render vertex positions.
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Triangle index triples into the render vertex buffer.
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Per-vertex texture coordinates.
    pub fn uvs(&self) -> &[DVec2] {
        &self.uvs
    }

    /// Per-vertex normals (smooth-baked, or per-face when flat-shaded).
    pub fn normals(&self) -> &[DVec3] {
        &self.normals
    }

    /// Whether the mesh was flat-shaded during processing.
    pub fn is_flat_shaded(&self) -> bool {
        self.use_flat_shading
    }
}
