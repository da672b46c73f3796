//! Arc-length addressing for a cubic Bezier spine.

use road_math::{Frame, Point3, Vector3};

use super::{CubicBezier, Curve, DistanceTable};

/// A cubic Bezier that can be sampled by travelled distance rather than by
/// parameter.
///
/// The distance table is rebuilt eagerly on every control-point change, so
/// queries are always consistent with the current geometry.
#[derive(Debug, Clone)]
pub struct ArcLengthCurve {
    bezier: CubicBezier,
    samples: usize,
    buckets: usize,
    distance: f64,
    table: DistanceTable,
}

impl ArcLengthCurve {
    /// Parameter step used to measure chord lengths.
    pub const DISTANCE_ACCURACY: f64 = 0.1;
    /// Entries in the resampled distance table.
    pub const TABLE_RESOLUTION: usize = 25;

    pub fn new(bezier: CubicBezier) -> Self {
        let samples = (1.0 / Self::DISTANCE_ACCURACY).round() as usize;
        Self::with_resolution(bezier, samples, Self::TABLE_RESOLUTION)
    }

    /// Build with `samples` chord segments and a `buckets`-entry lookup.
    pub fn with_resolution(bezier: CubicBezier, samples: usize, buckets: usize) -> Self {
        let mut curve = Self {
            bezier,
            samples: samples.max(1),
            buckets: buckets.max(2),
            distance: 0.0,
            table: DistanceTable::from_samples(&[], 2),
        };
        curve.rebuild();
        curve
    }

    pub fn from_points(p0: Point3, p1: Point3, p2: Point3, p3: Point3) -> Self {
        Self::new(CubicBezier::new(p0, p1, p2, p3))
    }

    pub fn bezier(&self) -> &CubicBezier {
        &self.bezier
    }

    /// Replace the control points and rebuild the distance table.
    pub fn set_bezier(&mut self, bezier: CubicBezier) {
        self.bezier = bezier;
        self.rebuild();
    }

    fn rebuild(&mut self) {
        let n = self.samples;
        let mut table = Vec::with_capacity(n + 1);
        let mut total = 0.0;
        let mut prev = self.bezier.point_at(0.0);
        table.push((0.0, 0.0));
        for i in 1..=n {
            let t = i as f64 / n as f64;
            let p = self.bezier.point_at(t);
            total += p.distance(prev);
            prev = p;
            table.push((total, t));
        }
        self.distance = total;
        self.table = DistanceTable::from_samples(&table, self.buckets);
    }

    /// Total arc length.
    pub fn total_distance(&self) -> f64 {
        self.distance
    }

    pub fn table(&self) -> &DistanceTable {
        &self.table
    }

    /// Curve parameter at arc length `distance`. A zero-length curve maps
    /// every distance to `t = 0`.
    pub fn parameter_at(&self, distance: f64) -> f64 {
        if self.distance <= 0.0 {
            return 0.0;
        }
        self.table.evaluate(distance / self.distance)
    }

    pub fn position_at(&self, distance: f64) -> Point3 {
        self.bezier.point_at(self.parameter_at(distance))
    }

    /// Unnormalized derivative `B'(t)` at arc length `distance`.
    pub fn derivative_at(&self, distance: f64) -> Vector3 {
        self.bezier.tangent_at(self.parameter_at(distance))
    }

    /// Unit travel direction at arc length `distance`.
    pub fn tangent_at(&self, distance: f64) -> Vector3 {
        self.bezier.direction_at(self.parameter_at(distance))
    }

    /// Heading in degrees at arc length `distance`.
    pub fn heading_at(&self, distance: f64) -> f64 {
        self.bezier.heading_at(self.parameter_at(distance))
    }

    /// Level frame at `distance`, rotated by the heading.
    pub fn frame_at(&self, distance: f64) -> Frame {
        let t = self.parameter_at(distance);
        Frame::from_heading(self.bezier.point_at(t), self.bezier.heading_at(t))
    }

    /// Frame whose forward axis follows the derivative, including slope.
    pub fn sloped_frame_at(&self, distance: f64) -> Frame {
        let t = self.parameter_at(distance);
        Frame::look_along(self.bezier.point_at(t), self.bezier.direction_at(t))
    }
}
