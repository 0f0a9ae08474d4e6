//! Mesh representation for 3D models
//!
//! [`MeshData`] is CPU-side geometry. Compiling it through a
//! [`RenderBackend`] yields a [`Mesh`], a lightweight handle that drawables
//! share through `Rc`.
//!
//! Built-in primitives are unit-sized and centered at the origin, with
//! counter-clockwise front faces.

use std::f32::consts::{PI, TAU};

use crate::foundation::math::Vec3;
use crate::render::{BackendResult, RenderBackend, RenderError};

/// Vertex with position and normal
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshVertex {
    /// Position in model space
    pub position: [f32; 3],
    /// Unit normal
    pub normal: [f32; 3],
}

impl MeshVertex {
    /// Create a new vertex
    pub fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }
}

/// Indexed triangle list
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshData {
    /// Vertex data
    pub vertices: Vec<MeshVertex>,
    /// Triangle indices, three per face
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Create mesh data from vertices and indices
    pub fn new(vertices: Vec<MeshVertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check that the data forms a non-empty, in-bounds triangle list
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.vertices.is_empty() || self.indices.is_empty() {
            return Err(RenderError::InvalidMesh("mesh has no geometry".to_string()));
        }
        if self.indices.len() % 3 != 0 {
            return Err(RenderError::InvalidMesh(format!(
                "index count {} is not a multiple of 3",
                self.indices.len()
            )));
        }
        let vertex_count = self.vertices.len();
        if let Some(&index) = self.indices.iter().find(|&&index| index as usize >= vertex_count) {
            return Err(RenderError::InvalidMesh(format!(
                "index {index} out of range for {vertex_count} vertices"
            )));
        }
        Ok(())
    }

    /// Solid cube spanning [-1, 1] on each axis with flat face normals.
    ///
    /// 24 vertices (four per face) and 36 indices.
    pub fn cube_solid() -> Self {
        // (normal, in-face horizontal axis); the vertical axis is normal × horizontal
        const FACES: [([f32; 3], [f32; 3]); 6] = [
            ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
            ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0]),
            ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0]),
            ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0]),
            ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0]),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (normal, horizontal) in FACES {
            let n = Vec3::from(normal);
            let u = Vec3::from(horizontal);
            let v = n.cross(&u);
            let base = vertices.len() as u32;

            for corner in [n - u - v, n + u - v, n + u + v, n - u + v] {
                vertices.push(MeshVertex::new(corner.into(), normal));
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self { vertices, indices }
    }

    /// Solid unit UV sphere.
    ///
    /// `rings` is the number of latitude bands (at least 2), `segments` the
    /// number of longitude slices (at least 3). Poles are single vertices.
    pub fn uv_sphere_solid(rings: u32, segments: u32) -> Result<Self, RenderError> {
        if rings < 2 || segments < 3 {
            return Err(RenderError::InvalidMesh(format!(
                "UV sphere needs at least 2 rings and 3 segments, got {rings} and {segments}"
            )));
        }

        let ring_count = rings - 1;
        let mut vertices = Vec::with_capacity((2 + ring_count * segments) as usize);
        vertices.push(MeshVertex::new([0.0, -1.0, 0.0], [0.0, -1.0, 0.0]));
        for ring in 1..rings {
            let latitude = -PI / 2.0 + ring as f32 * PI / rings as f32;
            let (y, radius) = latitude.sin_cos();
            for segment in 0..segments {
                let longitude = segment as f32 * TAU / segments as f32;
                let (sin, cos) = longitude.sin_cos();
                let point = [radius * sin, y, radius * cos];
                vertices.push(MeshVertex::new(point, point));
            }
        }
        let top = vertices.len() as u32;
        vertices.push(MeshVertex::new([0.0, 1.0, 0.0], [0.0, 1.0, 0.0]));

        let ring_start = |ring: u32| 1 + ring * segments;
        let mut indices = Vec::with_capacity((segments * (2 * rings - 2) * 3) as usize);

        for segment in 0..segments {
            let next = (segment + 1) % segments;
            indices.extend_from_slice(&[0, ring_start(0) + next, ring_start(0) + segment]);
        }
        for ring in 0..ring_count - 1 {
            let (lower, upper) = (ring_start(ring), ring_start(ring + 1));
            for segment in 0..segments {
                let next = (segment + 1) % segments;
                indices.extend_from_slice(&[
                    lower + segment,
                    lower + next,
                    upper + next,
                    lower + segment,
                    upper + next,
                    upper + segment,
                ]);
            }
        }
        let last = ring_start(ring_count - 1);
        for segment in 0..segments {
            let next = (segment + 1) % segments;
            indices.extend_from_slice(&[last + segment, last + next, top]);
        }

        Ok(Self { vertices, indices })
    }
}

/// Backend handle for an uploaded mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(pub u32);

/// A compiled mesh
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mesh {
    id: MeshId,
    name: String,
    vertex_count: usize,
    index_count: usize,
}

impl Mesh {
    /// Validate `data` and upload it through `backend`
    pub fn compile(backend: &mut dyn RenderBackend, name: impl Into<String>, data: &MeshData) -> BackendResult<Self> {
        let name = name.into();
        data.validate()?;
        let id = backend.compile_mesh(data)?;
        log::debug!(
            "Compiled mesh '{name}' as {id:?}: {} vertices, {} triangles",
            data.vertices.len(),
            data.triangle_count()
        );
        Ok(Self {
            id,
            name,
            vertex_count: data.vertices.len(),
            index_count: data.indices.len(),
        })
    }

    /// Backend handle
    pub fn id(&self) -> MeshId {
        self.id
    }

    /// Debug name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Number of indices
    pub fn index_count(&self) -> usize {
        self.index_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    fn triangles(data: &MeshData) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        data.indices.chunks(3).map(|face| {
            [0, 1, 2].map(|corner| Vec3::from(data.vertices[face[corner] as usize].position))
        })
    }

    /// Every face winds counter-clockwise seen from outside
    fn assert_outward(data: &MeshData) {
        for [a, b, c] in triangles(data) {
            let normal = (b - a).cross(&(c - a));
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(&centroid) > 0.0, "inward face {a:?} {b:?} {c:?}");
        }
    }

    #[test]
    fn test_cube_layout() {
        let cube = MeshData::cube_solid();
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.indices.len(), 36);
        cube.validate().unwrap();

        for vertex in &cube.vertices {
            assert!(vertex.position.iter().all(|c| (c.abs() - 1.0).abs() < EPSILON));
            // Flat normals point along the vertex's face
            let along = Vec3::from(vertex.position).dot(&Vec3::from(vertex.normal));
            assert_relative_eq!(along, 1.0, epsilon = EPSILON);
        }
        assert_outward(&cube);
    }

    #[test]
    fn test_sphere_layout() {
        let sphere = MeshData::uv_sphere_solid(16, 32).unwrap();
        assert_eq!(sphere.vertices.len(), 2 + 15 * 32);
        assert_eq!(sphere.triangle_count(), 32 * (2 * 16 - 2));
        sphere.validate().unwrap();

        for vertex in &sphere.vertices {
            assert_relative_eq!(Vec3::from(vertex.position).norm(), 1.0, epsilon = EPSILON);
            assert_eq!(vertex.position, vertex.normal);
        }
        assert_outward(&sphere);
    }

    #[test]
    fn test_minimal_sphere() {
        let sphere = MeshData::uv_sphere_solid(2, 3).unwrap();
        assert_eq!(sphere.vertices.len(), 5);
        assert_eq!(sphere.triangle_count(), 6);
        assert_outward(&sphere);
    }

    #[test]
    fn test_degenerate_sphere_rejected() {
        assert!(matches!(MeshData::uv_sphere_solid(1, 8), Err(RenderError::InvalidMesh(_))));
        assert!(matches!(MeshData::uv_sphere_solid(8, 2), Err(RenderError::InvalidMesh(_))));
    }

    #[test]
    fn test_validate_rejects_bad_indices() {
        let vertex = MeshVertex::new([0.0; 3], [0.0, 1.0, 0.0]);
        let data = MeshData::new(vec![vertex; 3], vec![0, 1, 3]);
        assert!(matches!(data.validate(), Err(RenderError::InvalidMesh(_))));

        let data = MeshData::new(vec![vertex; 3], vec![0, 1]);
        assert!(matches!(data.validate(), Err(RenderError::InvalidMesh(_))));

        assert!(MeshData::default().validate().is_err());
    }
}
