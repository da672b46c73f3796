//! Triangles with winding fixed at construction.

use road_math::{Plane, Point2, Point3, Vector3};

use crate::vertex::Vertex;

/// Three vertex indices in clockwise order around `up`.
///
/// Clockwise means: projected onto the plane orthogonal to `up`, with the
/// plane's side axis as x and forward axis as y, the corners turn clockwise
/// around their centroid. Equivalently `(b - a) x (c - a)` points along
/// `up`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub indices: [u32; 3],
    pub up: Vector3,
}

fn planar_angles(positions: [Point3; 3], up: Vector3) -> [f64; 3] {
    let plane = Plane::orthogonal_to(up);
    let coords: [Point2; 3] = positions.map(|p| plane.planar_coords(p));
    let center = (coords[0] + coords[1] + coords[2]) / 3.0;
    coords.map(|c| (c.x - center.x).atan2(c.y - center.y))
}

impl Triangle {
    /// Order `vertices` clockwise around `up`.
    pub fn clockwise(vertices: [Vertex; 3], up: Vector3) -> Self {
        let angles = planar_angles(vertices.map(|v| v.position), up);
        let mut order = [0usize, 1, 2];
        order.sort_by(|&a, &b| angles[a].total_cmp(&angles[b]));
        Self {
            indices: order.map(|i| vertices[i].index),
            up,
        }
    }

    pub fn reversed(&self) -> Self {
        let [a, b, c] = self.indices;
        Self {
            indices: [c, b, a],
            up: self.up,
        }
    }

    /// Signed doubled area in the plane orthogonal to `up`; negative for a
    /// clockwise triangle.
    pub fn planar_signed_area(&self, positions: &[Point3]) -> f64 {
        let plane = Plane::orthogonal_to(self.up);
        let [a, b, c] = self
            .indices
            .map(|i| plane.planar_coords(positions[i as usize]));
        (b - a).perp_dot(c - a)
    }

    pub fn is_clockwise(&self, positions: &[Point3]) -> bool {
        self.planar_signed_area(positions) < 0.0
    }
}

/// Triangulate the ribbon between two vertex columns sampled at the same
/// steps. Each step pair yields two triangles wound around `ups[i]`.
pub fn stitch_strip(left: &[Vertex], right: &[Vertex], ups: &[Vector3], out: &mut Vec<Triangle>) {
    let steps = left.len().min(right.len()).min(ups.len());
    for i in 0..steps.saturating_sub(1) {
        out.push(Triangle::clockwise([left[i], left[i + 1], right[i]], ups[i]));
        out.push(Triangle::clockwise([left[i + 1], right[i + 1], right[i]], ups[i]));
    }
}
