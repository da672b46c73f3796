//! Lateral layout of the road surface.
//!
//! Offsets are signed distances along the spine frame's right axis:
//! negative values lie on the left half of the road.

use road_core::Tolerance;
use road_geometry::{KeyedCurve, MinMaxCurve, TangentMode};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::settings::RoadSettings;

/// How the green-lane width is authored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WidthMode {
    /// Fixed total width, split evenly around the spine.
    Constant,
    /// Independent min/max boundary curves over distance.
    #[default]
    Custom,
}

/// An optional width curve indexed by distance along the spine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Taper {
    pub enabled: bool,
    pub curve: KeyedCurve,
}

impl Taper {
    pub fn enabled(curve: KeyedCurve) -> Self {
        Self {
            enabled: true,
            curve,
        }
    }
}

/// Width contribution of an extension/narrowing pair at one distance.
fn taper_width(extension: &Taper, narrowing: &Taper, distance: f64) -> f64 {
    match (extension.enabled, narrowing.enabled) {
        (true, true) => extension
            .curve
            .evaluate(distance)
            .max(narrowing.curve.evaluate(distance)),
        (true, false) => extension.curve.evaluate(distance),
        (false, true) => narrowing.curve.evaluate(distance),
        (false, false) => 0.0,
    }
}

/// Authored cross-section of a road segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossSectionProfile {
    pub left_lanes: i32,
    pub right_lanes: i32,
    pub lane_width: f64,
    /// Spine step for surface sampling.
    pub curve_accuracy: f64,

    pub left_shoulder: bool,
    pub left_shoulder_width: f64,
    pub right_shoulder: bool,
    pub right_shoulder_width: f64,

    pub left_extension: Taper,
    pub left_narrowing: Taper,
    pub right_extension: Taper,
    pub right_narrowing: Taper,

    pub green_lane: bool,
    pub green_lane_mode: WidthMode,
    /// Total divider width used in [`WidthMode::Constant`].
    pub green_lane_width: f64,
    pub green_lane_curve: MinMaxCurve,
}

impl Default for CrossSectionProfile {
    fn default() -> Self {
        Self::from_settings(&RoadSettings::default())
    }
}

impl CrossSectionProfile {
    pub fn from_settings(settings: &RoadSettings) -> Self {
        Self {
            left_lanes: 2,
            right_lanes: 2,
            lane_width: settings.lane_width,
            curve_accuracy: settings.curve_accuracy,
            left_shoulder: false,
            left_shoulder_width: 1.0,
            right_shoulder: false,
            right_shoulder_width: 1.0,
            left_extension: Taper::default(),
            left_narrowing: Taper::default(),
            right_extension: Taper::default(),
            right_narrowing: Taper::default(),
            green_lane: false,
            green_lane_mode: WidthMode::Custom,
            green_lane_width: 2.0,
            green_lane_curve: MinMaxCurve::default(),
        }
    }

    /// Symmetric profile with `lanes` on each side and nothing else enabled.
    pub fn with_lanes(left_lanes: i32, right_lanes: i32) -> Self {
        Self {
            left_lanes,
            right_lanes,
            ..Self::default()
        }
    }

    pub fn left_lane_count(&self) -> usize {
        self.left_lanes.max(0) as usize
    }

    pub fn right_lane_count(&self) -> usize {
        self.right_lanes.max(0) as usize
    }

    pub fn left_shoulder_width(&self) -> f64 {
        if self.left_shoulder {
            self.left_shoulder_width
        } else {
            0.0
        }
    }

    pub fn right_shoulder_width(&self) -> f64 {
        if self.right_shoulder {
            self.right_shoulder_width
        } else {
            0.0
        }
    }

    pub fn has_left_shoulder(&self) -> bool {
        self.left_shoulder_width() > 0.0
    }

    pub fn has_right_shoulder(&self) -> bool {
        self.right_shoulder_width() > 0.0
    }

    /// Index of the marking that separates the two driving directions.
    pub fn center_line_index(&self) -> Option<usize> {
        if self.left_lanes <= 0 || self.right_lanes <= 0 {
            return None;
        }
        Some(self.left_lane_count() - 1 + usize::from(self.has_left_shoulder()))
    }

    /// Whether marking `index` lies left of the direction-change boundary.
    pub fn is_left_of_center(&self, index: usize) -> bool {
        let mid = self.left_lanes - 1 + i32::from(self.has_left_shoulder());
        (index as i64) < i64::from(mid)
    }

    /// Number of marking lanes between lanes and shoulders.
    pub fn marking_count(&self) -> usize {
        let (left, right) = (self.left_lane_count(), self.right_lane_count());
        if left == 0 && right == 0 {
            return 0;
        }
        left + right - 1
            + usize::from(self.has_left_shoulder())
            + usize::from(self.has_right_shoulder())
    }

    /// Bind the profile to a spine of length `total`.
    pub fn at_length(&self, total: f64) -> CrossSection<'_> {
        CrossSection {
            profile: self,
            total,
        }
    }

    /// Replace out-of-range parameters and stale width curves with generated
    /// defaults. Returns how many fields were repaired.
    pub fn normalize(&mut self, total: f64) -> usize {
        let tol = Tolerance::default();
        let lane = self.lane_width;
        let mut repaired = 0;

        if self.left_lanes < 0 {
            self.left_lanes = 0;
            repaired += 1;
        }
        if self.right_lanes < 0 {
            self.right_lanes = 0;
            repaired += 1;
        }
        if self.green_lane && (self.left_lanes == 0 || self.right_lanes == 0) {
            self.green_lane = false;
            repaired += 1;
        }
        if self.curve_accuracy.is_nan() || self.curve_accuracy <= 0.0 {
            self.curve_accuracy = tol.positive_step(self.curve_accuracy);
            repaired += 1;
        }

        let stale_extension = |c: &KeyedCurve| c.last_value().map_or(true, |v| !tol.linear_eq(v, lane));
        let stale_narrowing = |c: &KeyedCurve| c.first_value().map_or(true, |v| !tol.linear_eq(v, lane));

        for taper in [&mut self.left_extension, &mut self.right_extension] {
            if stale_extension(&taper.curve) {
                taper.curve = KeyedCurve::ramp(0.0, 0.0, total, lane);
                repaired += 1;
            }
        }
        for taper in [&mut self.left_narrowing, &mut self.right_narrowing] {
            if stale_narrowing(&taper.curve) {
                taper.curve = KeyedCurve::ramp(0.0, lane, total, 0.0);
                repaired += 1;
            }
        }
        if !self.green_lane_curve.is_two_branch() {
            self.green_lane_curve = default_green_lane_curve(total);
            repaired += 1;
        }

        if repaired > 0 {
            warn!(repaired, total, "regenerated cross-section defaults");
        }
        repaired
    }
}

/// Divider that bulges from 1 to 1.5 units either side of the spine over the
/// middle half of the road, with straight plateaus between the inner keys.
pub fn default_green_lane_curve(total: f64) -> MinMaxCurve {
    let branch = |sign: f64| {
        let mut curve = KeyedCurve::new();
        curve.add_key(0.0, sign);
        curve.add_key(0.25 * total, 1.5 * sign);
        curve.add_key(0.75 * total, 1.5 * sign);
        curve.add_key(total, sign);
        curve.set_out_mode(1, TangentMode::Linear);
        curve.set_in_mode(2, TangentMode::Linear);
        curve
    };
    MinMaxCurve::new(branch(-1.0), branch(1.0))
}

/// A profile evaluated against a spine of known length.
#[derive(Debug, Clone, Copy)]
pub struct CrossSection<'a> {
    profile: &'a CrossSectionProfile,
    total: f64,
}

impl<'a> CrossSection<'a> {
    pub fn profile(&self) -> &'a CrossSectionProfile {
        self.profile
    }

    pub fn total_distance(&self) -> f64 {
        self.total
    }

    /// Extra width on the left edge. Evaluated at the complementary
    /// distance so tapers compose from the far end of the road.
    pub fn left_extension(&self, distance: f64) -> f64 {
        let p = self.profile;
        taper_width(&p.left_extension, &p.left_narrowing, self.total - distance)
    }

    pub fn right_extension(&self, distance: f64) -> f64 {
        let p = self.profile;
        taper_width(&p.right_extension, &p.right_narrowing, distance)
    }

    /// Left inner boundary of the green lane (zero when disabled).
    pub fn left_green_offset(&self, distance: f64) -> f64 {
        let p = self.profile;
        if !p.green_lane {
            return 0.0;
        }
        match p.green_lane_mode {
            WidthMode::Constant => -0.5 * p.green_lane_width,
            WidthMode::Custom => p.green_lane_curve.evaluate_min(distance),
        }
    }

    /// Right inner boundary of the green lane (zero when disabled).
    pub fn right_green_offset(&self, distance: f64) -> f64 {
        let p = self.profile;
        if !p.green_lane {
            return 0.0;
        }
        match p.green_lane_mode {
            WidthMode::Constant => 0.5 * p.green_lane_width,
            WidthMode::Custom => p.green_lane_curve.evaluate_max(distance),
        }
    }

    pub fn left_outer_offset(&self, distance: f64) -> f64 {
        let p = self.profile;
        -(p.left_lane_count() as f64 * p.lane_width + p.left_shoulder_width())
            + self.left_green_offset(distance)
            - self.left_extension(distance)
    }

    pub fn right_outer_offset(&self, distance: f64) -> f64 {
        let p = self.profile;
        p.right_lane_count() as f64 * p.lane_width
            + p.right_shoulder_width()
            + self.right_green_offset(distance)
            + self.right_extension(distance)
    }

    /// Offset of marking `index` ignoring green lane and tapers. This is the
    /// path measured by the marking's distance remapper.
    pub fn marking_base_offset(&self, index: usize) -> f64 {
        let p = self.profile;
        let slot = if p.has_left_shoulder() { index } else { index + 1 };
        -(p.left_lane_count() as f64) * p.lane_width + slot as f64 * p.lane_width
    }

    /// Center offset of marking `index` out of `count` at `distance`.
    pub fn marking_offset(&self, index: usize, count: usize, distance: f64) -> f64 {
        let p = self.profile;
        let mut offset = self.marking_base_offset(index);
        offset += if p.is_left_of_center(index) {
            self.left_green_offset(distance)
        } else {
            self.right_green_offset(distance)
        };
        if p.has_left_shoulder() && index == 0 {
            offset -= self.left_extension(distance);
        }
        if p.has_right_shoulder() && index + 1 == count {
            offset += self.right_extension(distance);
        }
        offset
    }
}
