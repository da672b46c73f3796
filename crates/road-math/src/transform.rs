use crate::{DMat4, DQuat, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Object-to-world transform of a road segment.
///
/// Control points are authored in the object's local frame; generated
/// vertices are converted back into that frame before they are stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub matrix: [f64; 16],
}

impl Transform {
    pub fn identity() -> Self {
        Self::from_mat4(DMat4::IDENTITY)
    }

    pub fn from_translation(t: Vector3) -> Self {
        Self::from_mat4(DMat4::from_translation(t))
    }

    /// Translation followed by a rotation of `yaw_degrees` around +Y.
    pub fn from_translation_yaw(t: Vector3, yaw_degrees: f64) -> Self {
        let rotation = DQuat::from_rotation_y(yaw_degrees.to_radians());
        Self::from_mat4(DMat4::from_rotation_translation(rotation, t))
    }

    pub fn from_mat4(m: DMat4) -> Self {
        Self {
            matrix: m.to_cols_array(),
        }
    }

    pub fn to_mat4(&self) -> DMat4 {
        DMat4::from_cols_array(&self.matrix)
    }

    /// Local to world.
    pub fn transform_point(&self, p: Point3) -> Point3 {
        self.to_mat4().transform_point3(p)
    }

    /// World to local. A singular matrix leaves the point untouched.
    pub fn inverse_transform_point(&self, p: Point3) -> Point3 {
        match self.inverse() {
            Some(inv) => inv.transform_point(p),
            None => p,
        }
    }

    pub fn transform_vector(&self, v: Vector3) -> Vector3 {
        self.to_mat4().transform_vector3(v)
    }

    /// World direction to local. A singular matrix leaves it untouched.
    pub fn inverse_transform_vector(&self, v: Vector3) -> Vector3 {
        match self.inverse() {
            Some(inv) => inv.transform_vector(v),
            None => v,
        }
    }

    pub fn inverse(&self) -> Option<Transform> {
        let m = self.to_mat4();
        if m.determinant().abs() < 1e-15 {
            None
        } else {
            Some(Self::from_mat4(m.inverse()))
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
