//! Road generator geometry: Bezier spines, arc-length addressing, width curves.

pub mod curve;
pub mod keyed;
pub mod offset;
pub mod sampling;

pub use curve::{ArcLengthCurve, CubicBezier, Curve, DistanceTable};
pub use keyed::{KeyedCurve, Keyframe, MinMaxCurve, TangentMode};
pub use offset::OffsetDistanceRemapper;
pub use sampling::distance_steps;
