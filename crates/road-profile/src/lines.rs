//! Lane-marking layout.

use road_core::Tolerance;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::profile::CrossSectionProfile;
use crate::settings::RoadSettings;

/// Paint style of one marking lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineType {
    None,
    Single,
    #[default]
    Dashed,
    Double,
}

/// One [`LineType`] per boundary between lanes and shoulders, left to right.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineSpec {
    pub types: Vec<LineType>,
    /// Length of each dash, and of the gap that follows it.
    pub dash_length: f64,
    /// Step along the marking path.
    pub line_accuracy: f64,
}

impl Default for LineSpec {
    fn default() -> Self {
        Self::from_settings(&RoadSettings::default())
    }
}

impl LineSpec {
    pub fn from_settings(settings: &RoadSettings) -> Self {
        Self {
            types: Vec::new(),
            dash_length: settings.dash_length,
            line_accuracy: settings.line_accuracy,
        }
    }

    pub fn with_types(types: Vec<LineType>) -> Self {
        Self {
            types,
            ..Self::default()
        }
    }

    /// Default layout for `profile`: dashed between lanes, solid at shoulders
    /// and at the direction change (left unpainted when a green lane divides
    /// the directions).
    pub fn default_types(profile: &CrossSectionProfile) -> Vec<LineType> {
        let count = profile.marking_count();
        let mut types = vec![LineType::Dashed; count];
        if count == 0 {
            return types;
        }
        if let Some(center) = profile.center_line_index() {
            if let Some(slot) = types.get_mut(center) {
                *slot = if profile.green_lane {
                    LineType::None
                } else {
                    LineType::Single
                };
            }
        }
        if profile.has_left_shoulder() {
            types[0] = LineType::Single;
        }
        if profile.has_right_shoulder() {
            types[count - 1] = LineType::Single;
        }
        types
    }

    /// Repair the marking array and accuracy for `profile`. Returns `true`
    /// if anything changed.
    pub fn normalize(&mut self, profile: &CrossSectionProfile) -> bool {
        let mut changed = false;
        if self.line_accuracy.is_nan() || self.line_accuracy <= 0.0 {
            self.line_accuracy = Tolerance::default().positive_step(self.line_accuracy);
            changed = true;
        }
        if self.dash_length.is_nan() || self.dash_length <= 0.0 {
            self.dash_length = RoadSettings::DASH_LENGTH;
            changed = true;
        }
        let expected = profile.marking_count();
        if self.types.len() != expected {
            warn!(
                found = self.types.len(),
                expected, "marking layout does not match lanes, regenerating defaults"
            );
            self.types = Self::default_types(profile);
            changed = true;
        }
        changed
    }
}
