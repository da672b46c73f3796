pub mod assembly;
pub mod markings;
pub mod mesh;
pub mod surface;
pub mod triangle;
pub mod vertex;

pub use assembly::{generate_road_mesh, submit_road_mesh, CapturedMesh, MeshSink};
pub use markings::{LineMarkingGenerator, MarkingMesh, MarkingStroke};
pub use mesh::{RoadMesh, MARKING_SUBMESH, SURFACE_SUBMESH};
pub use surface::{SurfaceMesh, SurfaceMeshBuilder};
pub use triangle::{stitch_strip, Triangle};
pub use vertex::{Vertex, VertexBuffer};
