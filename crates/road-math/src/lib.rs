pub mod frame;
pub mod plane;
pub mod transform;

pub use glam::{DAffine3, DMat4, DQuat, DVec2, DVec3, DVec4};
pub use frame::Frame;
pub use plane::Plane;
pub use transform::Transform;

pub type Point2 = DVec2;
pub type Point3 = DVec3;
pub type Vector3 = DVec3;
