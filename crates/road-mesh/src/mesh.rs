use road_core::error::{Result, RoadError};
use road_core::traits::Validate;
use road_math::{DVec4, Point2, Point3, Vector3};

use crate::triangle::Triangle;

/// Sub-mesh holding the asphalt surface.
pub const SURFACE_SUBMESH: usize = 0;
/// Sub-mesh holding painted lines.
pub const MARKING_SUBMESH: usize = 1;

/// Road mesh: one vertex buffer shared by two triangle lists.
#[derive(Debug, Clone, Default)]
pub struct RoadMesh {
    pub positions: Vec<Point3>,
    pub normals: Vec<Vector3>,
    /// Tangent xyz plus handedness in w.
    pub tangents: Vec<DVec4>,
    /// Placeholder texture coordinates, all zero.
    pub uvs: Vec<Point2>,
    pub submeshes: [Vec<Triangle>; 2],
}

impl RoadMesh {
    pub fn new(positions: Vec<Point3>, surface: Vec<Triangle>, markings: Vec<Triangle>) -> Self {
        let uvs = vec![Point2::ZERO; positions.len()];
        let mut mesh = Self {
            positions,
            normals: Vec::new(),
            tangents: Vec::new(),
            uvs,
            submeshes: [surface, markings],
        };
        mesh.compute_normals();
        mesh.compute_tangents();
        mesh
    }

    /// Number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles across both sub-meshes.
    pub fn triangle_count(&self) -> usize {
        self.submeshes.iter().map(Vec::len).sum()
    }

    pub fn surface(&self) -> &[Triangle] {
        &self.submeshes[SURFACE_SUBMESH]
    }

    pub fn markings(&self) -> &[Triangle] {
        &self.submeshes[MARKING_SUBMESH]
    }

    /// Flattened index list of one sub-mesh.
    pub fn indices(&self, submesh: usize) -> Vec<u32> {
        self.submeshes
            .get(submesh)
            .map(|tris| tris.iter().flat_map(|t| t.indices).collect())
            .unwrap_or_default()
    }

    pub fn triangle_lists(&self) -> [Vec<[u32; 3]>; 2] {
        [
            self.submeshes[SURFACE_SUBMESH].iter().map(|t| t.indices).collect(),
            self.submeshes[MARKING_SUBMESH].iter().map(|t| t.indices).collect(),
        ]
    }

    fn all_triangles(&self) -> impl Iterator<Item = &Triangle> {
        self.submeshes.iter().flatten()
    }

    /// Accumulate face normals onto each vertex and normalize the result.
    pub fn compute_normals(&mut self) {
        let n = self.positions.len();
        let mut normals = vec![Vector3::ZERO; n];

        for tri in self.all_triangles() {
            let [i0, i1, i2] = tri.indices.map(|i| i as usize);
            let p0 = self.positions[i0];
            let p1 = self.positions[i1];
            let p2 = self.positions[i2];
            let normal = (p1 - p0).cross(p2 - p0);
            normals[i0] += normal;
            normals[i1] += normal;
            normals[i2] += normal;
        }

        for n in &mut normals {
            let len = n.length();
            if len > 1e-12 {
                *n /= len;
            }
        }
        self.normals = normals;
    }

    /// Per-vertex tangents from each triangle's first edge, made orthogonal
    /// to the vertex normal. Requires normals.
    pub fn compute_tangents(&mut self) {
        let n = self.positions.len();
        let mut accum = vec![Vector3::ZERO; n];

        for tri in self.all_triangles() {
            let [i0, i1, i2] = tri.indices.map(|i| i as usize);
            let edge = self.positions[i1] - self.positions[i0];
            accum[i0] += edge;
            accum[i1] += edge;
            accum[i2] += edge;
        }

        self.tangents = accum
            .into_iter()
            .enumerate()
            .map(|(i, t)| {
                let normal = self.normals.get(i).copied().unwrap_or(Vector3::ZERO);
                let t = (t - normal * t.dot(normal)).normalize_or_zero();
                t.extend(1.0)
            })
            .collect();
    }
}

impl Validate for RoadMesh {
    fn validate(&self) -> Result<()> {
        let n = self.positions.len();
        for (name, len) in [
            ("normals", self.normals.len()),
            ("tangents", self.tangents.len()),
            ("uvs", self.uvs.len()),
        ] {
            if len != n {
                return Err(RoadError::Validation(format!(
                    "{} has {} entries for {} vertices",
                    name, len, n
                )));
            }
        }
        for (submesh, tris) in self.submeshes.iter().enumerate() {
            for tri in tris {
                if let Some(&bad) = tri.indices.iter().find(|&&i| i as usize >= n) {
                    return Err(RoadError::Validation(format!(
                        "sub-mesh {} references vertex {} of {}",
                        submesh, bad, n
                    )));
                }
            }
        }
        Ok(())
    }
}
