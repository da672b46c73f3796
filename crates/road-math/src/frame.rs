//! Stateless orthonormal frames along a road spine.

use crate::{Point3, Vector3};

/// Position plus an orthonormal `right`/`up`/`forward` basis.
///
/// Headings are in degrees around +Y, measured from +Z toward +X, so a
/// heading of 0 faces +Z and a heading of 90 faces +X.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub origin: Point3,
    pub right: Vector3,
    pub up: Vector3,
    pub forward: Vector3,
}

impl Frame {
    /// Level frame rotated by `heading_degrees` around +Y.
    pub fn from_heading(origin: Point3, heading_degrees: f64) -> Self {
        let (sin, cos) = heading_degrees.to_radians().sin_cos();
        Self {
            origin,
            right: Vector3::new(cos, 0.0, -sin),
            up: Vector3::Y,
            forward: Vector3::new(sin, 0.0, cos),
        }
    }

    /// Frame whose forward axis follows `direction`, keeping world +Y as the
    /// reference up. Used to tilt `up` with the road's slope.
    pub fn look_along(origin: Point3, direction: Vector3) -> Self {
        let forward = direction.normalize_or(Vector3::Z);
        let mut right = Vector3::Y.cross(forward);
        if right.length_squared() < 1e-12 {
            right = Vector3::X;
        }
        let right = right.normalize();
        let up = forward.cross(right);
        Self {
            origin,
            right,
            up,
            forward,
        }
    }

    /// Point `lateral` units along `right` from the origin.
    pub fn offset(&self, lateral: f64) -> Point3 {
        self.origin + self.right * lateral
    }

    /// Point `lateral` units along `right` and `lift` units along `up`.
    pub fn offset_lifted(&self, lateral: f64, lift: f64) -> Point3 {
        self.origin + self.right * lateral + self.up * lift
    }
}
