//! Authoring defaults shared by every road segment.

use road_core::{MaterialHandle, Result};
use serde::{Deserialize, Serialize};

/// Persisted generator configuration.
///
/// Every field has a default, so partial JSON documents are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoadSettings {
    /// Width of one traffic lane.
    pub lane_width: f64,
    /// Half the width of a painted line.
    pub line_half_width: f64,
    /// Offset of each stroke of a double line from the marking center.
    pub double_line_half_space: f64,
    /// Spine step used for the asphalt surface.
    pub curve_accuracy: f64,
    /// Marking-path step used for painted lines.
    pub line_accuracy: f64,
    /// Length of one dash and of the gap after it.
    pub dash_length: f64,
    /// Height of paint above the asphalt.
    pub marking_lift: f64,
    /// Spine sub-step used when measuring offset marking paths.
    pub remap_step: f64,
    pub asphalt_material: MaterialHandle,
    pub line_material: MaterialHandle,
}

impl RoadSettings {
    pub const LANE_WIDTH: f64 = 3.5;
    pub const LINE_HALF_WIDTH: f64 = 0.1;
    pub const DOUBLE_LINES_HALF_SPACE: f64 = 0.2;
    pub const DASH_LENGTH: f64 = 4.0;

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for RoadSettings {
    fn default() -> Self {
        Self {
            lane_width: Self::LANE_WIDTH,
            line_half_width: Self::LINE_HALF_WIDTH,
            double_line_half_space: Self::DOUBLE_LINES_HALF_SPACE,
            curve_accuracy: 1.0,
            line_accuracy: 1.0,
            dash_length: Self::DASH_LENGTH,
            marking_lift: 0.03,
            remap_step: 0.05,
            asphalt_material: MaterialHandle::new(0),
            line_material: MaterialHandle::new(1),
        }
    }
}
