//! Curve traits and implementations.

mod arc_length;
mod bezier;
mod distance_table;

use road_math::{Point3, Vector3};

pub use arc_length::ArcLengthCurve;
pub use bezier::CubicBezier;
pub use distance_table::DistanceTable;

/// Trait for parametric curves in 3D space.
pub trait Curve {
    /// Evaluate the curve at parameter `t`.
    fn point_at(&self, t: f64) -> Point3;

    /// Evaluate the (unnormalized) derivative at parameter `t`.
    fn tangent_at(&self, t: f64) -> Vector3;

    /// Return the parameter domain `(t_min, t_max)`.
    fn domain(&self) -> (f64, f64);
}
