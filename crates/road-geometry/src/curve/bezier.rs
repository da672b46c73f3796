//! Cubic Bezier curve.

use road_math::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use super::Curve;

/// A cubic Bezier defined by `p0` (start), `p1`/`p2` (tangent handles) and
/// `p3` (end), parameterized over `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubicBezier {
    pub p0: Point3,
    pub p1: Point3,
    pub p2: Point3,
    pub p3: Point3,
}

impl CubicBezier {
    pub fn new(p0: Point3, p1: Point3, p2: Point3, p3: Point3) -> Self {
        Self { p0, p1, p2, p3 }
    }

    pub fn control_points(&self) -> [Point3; 4] {
        [self.p0, self.p1, self.p2, self.p3]
    }

    /// Same geometry traversed from `p3` to `p0`.
    pub fn reversed(&self) -> Self {
        Self::new(self.p3, self.p2, self.p1, self.p0)
    }

    /// `p1 - p0`
    pub fn start_tangent(&self) -> Vector3 {
        self.p1 - self.p0
    }

    /// `p2 - p3`, pointing back into the curve.
    pub fn end_tangent(&self) -> Vector3 {
        self.p2 - self.p3
    }

    /// Unit travel direction at `t`.
    ///
    /// Where the derivative vanishes (a handle sitting on its endpoint) the
    /// direction is taken from a short chord around `t` instead.
    pub fn direction_at(&self, t: f64) -> Vector3 {
        let d = self.tangent_at(t);
        if d.length_squared() > 1e-18 {
            return d.normalize();
        }
        const H: f64 = 1e-4;
        let a = self.point_at((t - H).max(0.0));
        let b = self.point_at((t + H).min(1.0));
        (b - a).normalize_or_zero()
    }

    /// Heading in degrees of the horizontal travel direction, measured around
    /// +Y from +Z toward +X.
    pub fn heading_at(&self, t: f64) -> f64 {
        let d = self.direction_at(t);
        d.x.atan2(d.z).to_degrees()
    }
}

impl Curve for CubicBezier {
    fn point_at(&self, t: f64) -> Point3 {
        // de Casteljau
        let a = self.p0.lerp(self.p1, t);
        let b = self.p1.lerp(self.p2, t);
        let c = self.p2.lerp(self.p3, t);
        let ab = a.lerp(b, t);
        let bc = b.lerp(c, t);
        ab.lerp(bc, t)
    }

    fn tangent_at(&self, t: f64) -> Vector3 {
        let tt = t * t;
        self.p0 * (-3.0 * tt + 6.0 * t - 3.0)
            + self.p1 * (9.0 * tt - 12.0 * t + 3.0)
            + self.p2 * (-9.0 * tt + 6.0 * t)
            + self.p3 * (3.0 * tt)
    }

    fn domain(&self) -> (f64, f64) {
        (0.0, 1.0)
    }
}
