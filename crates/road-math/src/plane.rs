use crate::{Point2, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// A plane in 3D space defined by a point and normal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Plane {
    pub origin: Point3,
    pub normal: Vector3,
}

impl Plane {
    pub fn new(origin: Point3, normal: Vector3) -> Self {
        Self {
            origin,
            normal: normal.normalize_or(Vector3::Y),
        }
    }

    /// Plane through the origin orthogonal to `up`.
    pub fn orthogonal_to(up: Vector3) -> Self {
        Self::new(Point3::ZERO, up)
    }

    /// Signed distance from a point to this plane.
    pub fn signed_distance(&self, point: Point3) -> f64 {
        (point - self.origin).dot(self.normal)
    }

    /// Project a point onto this plane.
    pub fn project_point(&self, point: Point3) -> Point3 {
        point - self.normal * self.signed_distance(point)
    }

    /// In-plane `(side, forward)` axes. For a +Y normal these are +X and +Z;
    /// flipping the normal flips `side`, which mirrors any angular order.
    pub fn axes(&self) -> (Vector3, Vector3) {
        let mut forward = Vector3::Z - self.normal * Vector3::Z.dot(self.normal);
        if forward.length_squared() < 1e-12 {
            forward = Vector3::NEG_Y - self.normal * Vector3::NEG_Y.dot(self.normal);
        }
        let forward = forward.normalize();
        let side = self.normal.cross(forward);
        (side, forward)
    }

    /// 2D coordinates of the projection of `point`, as `(side, forward)`.
    pub fn planar_coords(&self, point: Point3) -> Point2 {
        let (side, forward) = self.axes();
        let local = self.project_point(point) - self.origin;
        Point2::new(local.dot(side), local.dot(forward))
    }
}
