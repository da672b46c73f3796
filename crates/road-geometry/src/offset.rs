//! Arc-length remapping for paths running parallel to the spine.
//!
//! A path offset sideways from a curved spine is longer on the outside of a
//! bend and shorter on the inside. Markings are measured along their own
//! path, so every marking lane needs its own distance mapping back to the
//! spine.

use road_math::Point3;

use crate::curve::ArcLengthCurve;

/// Maps distance travelled along a laterally offset path to the spine
/// distance at which that path point is generated.
///
/// The spine is walked forward in fixed sub-steps while the offset path's
/// chord length is accumulated. The walk position is cached, so a sequence
/// of non-decreasing queries never re-walks covered ground.
#[derive(Debug)]
pub struct OffsetDistanceRemapper<'a> {
    curve: &'a ArcLengthCurve,
    offset: f64,
    step: f64,
    spine_distance: f64,
    path_distance: f64,
    last_position: Point3,
}

impl<'a> OffsetDistanceRemapper<'a> {
    pub const DEFAULT_STEP: f64 = 0.05;

    pub fn new(curve: &'a ArcLengthCurve, offset: f64) -> Self {
        Self::with_step(curve, offset, Self::DEFAULT_STEP)
    }

    pub fn with_step(curve: &'a ArcLengthCurve, offset: f64, step: f64) -> Self {
        let step = if step > 0.0 { step } else { Self::DEFAULT_STEP };
        Self {
            curve,
            offset,
            step,
            spine_distance: 0.0,
            path_distance: 0.0,
            last_position: Self::offset_point(curve, offset, 0.0),
        }
    }

    fn offset_point(curve: &ArcLengthCurve, offset: f64, distance: f64) -> Point3 {
        curve.frame_at(distance).offset(offset)
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Spine distance where the offset path has covered `target` units.
    ///
    /// Zero maps to zero; targets beyond the end of the path map to the
    /// spine's total distance.
    pub fn spine_distance(&mut self, target: f64) -> f64 {
        if target <= 0.0 {
            return 0.0;
        }
        if self.path_distance >= target {
            return self.spine_distance;
        }

        let total = self.curve.total_distance();
        let mut distance = self.spine_distance;
        while distance < total {
            distance = (distance + self.step).min(total);
            let position = Self::offset_point(self.curve, self.offset, distance);
            self.path_distance += position.distance(self.last_position);
            self.last_position = position;
            self.spine_distance = distance;

            if self.path_distance >= target {
                return distance;
            }
        }
        total
    }

    /// Full length of the offset path at this remapper's resolution.
    pub fn path_length(&mut self) -> f64 {
        self.spine_distance(f64::INFINITY);
        self.path_distance
    }
}
