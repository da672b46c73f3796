//! Cross-section profiles, lane-marking layout, and authoring settings.

pub mod lines;
pub mod profile;
pub mod settings;

pub use lines::{LineSpec, LineType};
pub use profile::{CrossSection, CrossSectionProfile, Taper, WidthMode};
pub use settings::RoadSettings;
