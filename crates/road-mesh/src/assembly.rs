//! End-to-end mesh generation for one road segment.

use road_core::MaterialHandle;
use road_geometry::ArcLengthCurve;
use road_math::{Point3, Transform};
use road_profile::{CrossSectionProfile, LineSpec, RoadSettings};
use tracing::debug;

use crate::markings::LineMarkingGenerator;
use crate::mesh::RoadMesh;
use crate::surface::SurfaceMeshBuilder;
use crate::vertex::VertexBuffer;

/// Receives finished meshes.
pub trait MeshSink {
    /// `triangles[0]` is the asphalt surface, `triangles[1]` the markings;
    /// `materials` follows the same order.
    fn submit_mesh(
        &mut self,
        vertices: &[Point3],
        triangles: [Vec<[u32; 3]>; 2],
        materials: [MaterialHandle; 2],
    );
}

/// Sink that keeps the last submission in memory.
#[derive(Debug, Clone, Default)]
pub struct CapturedMesh {
    pub vertices: Vec<Point3>,
    pub triangles: [Vec<[u32; 3]>; 2],
    pub materials: [MaterialHandle; 2],
    pub submissions: usize,
}

impl MeshSink for CapturedMesh {
    fn submit_mesh(
        &mut self,
        vertices: &[Point3],
        triangles: [Vec<[u32; 3]>; 2],
        materials: [MaterialHandle; 2],
    ) {
        self.vertices = vertices.to_vec();
        self.triangles = triangles;
        self.materials = materials;
        self.submissions += 1;
    }
}

/// Heal `profile` and `lines` against the curve, then tessellate the surface
/// and markings into one mesh.
pub fn generate_road_mesh(
    curve: &ArcLengthCurve,
    profile: &mut CrossSectionProfile,
    lines: &mut LineSpec,
    settings: &RoadSettings,
    transform: &Transform,
) -> RoadMesh {
    let total = curve.total_distance();
    profile.normalize(total);
    lines.normalize(profile);

    let mut buffer = VertexBuffer::new();
    let surface = SurfaceMeshBuilder::new(curve, profile, transform).build(&mut buffer);
    let markings =
        LineMarkingGenerator::new(curve, profile, lines, settings, transform).generate(&mut buffer);

    let mesh = RoadMesh::new(buffer.positions(), surface.triangles, markings.triangles);
    debug!(
        total,
        samples = surface.sample_distances.len(),
        strokes = markings.strokes.len(),
        vertices = mesh.vertex_count(),
        surface_triangles = mesh.surface().len(),
        marking_triangles = mesh.markings().len(),
        "generated road mesh"
    );
    mesh
}

/// Hand `mesh` to `sink` with the configured asphalt and line materials.
pub fn submit_road_mesh<S: MeshSink + ?Sized>(mesh: &RoadMesh, settings: &RoadSettings, sink: &mut S) {
    sink.submit_mesh(
        &mesh.positions,
        mesh.triangle_lists(),
        [settings.asphalt_material, settings.line_material],
    );
}
