//! Indexed vertices shared by every sub-mesh.

use road_math::Point3;

/// A position with its index in the final vertex buffer.
///
/// The index is assigned on creation and never changes, so triangles can
/// refer to vertices before the buffer is complete.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3,
    pub index: u32,
}

/// Append-only vertex storage.
#[derive(Debug, Clone, Default)]
pub struct VertexBuffer {
    vertices: Vec<Vertex>,
}

impl VertexBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a vertex and return it with its assigned index.
    pub fn push(&mut self, position: Point3) -> Vertex {
        let vertex = Vertex {
            position,
            index: self.vertices.len() as u32,
        };
        self.vertices.push(vertex);
        vertex
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn get(&self, index: u32) -> Option<&Vertex> {
        self.vertices.get(index as usize)
    }

    pub fn positions(&self) -> Vec<Point3> {
        self.vertices.iter().map(|v| v.position).collect()
    }
}
