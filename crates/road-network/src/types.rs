use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    pub struct CurveId;
}

/// One end of a road segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Endpoint {
    Start,
    End,
}

impl Endpoint {
    pub fn opposite(self) -> Self {
        match self {
            Endpoint::Start => Endpoint::End,
            Endpoint::End => Endpoint::Start,
        }
    }
}

/// Editable control point of a segment's spine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handle {
    P0,
    P1,
    P2,
    P3,
}

impl Handle {
    pub const ALL: [Handle; 4] = [Handle::P0, Handle::P1, Handle::P2, Handle::P3];

    /// The endpoint this handle belongs to.
    pub fn endpoint(self) -> Endpoint {
        match self {
            Handle::P0 | Handle::P1 => Endpoint::Start,
            Handle::P2 | Handle::P3 => Endpoint::End,
        }
    }

    /// `P0`/`P3` sit on the curve; `P1`/`P2` steer its tangents.
    pub fn is_knot(self) -> bool {
        matches!(self, Handle::P0 | Handle::P3)
    }
}

impl std::fmt::Display for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Handle::P0 => "P0",
            Handle::P1 => "P1",
            Handle::P2 => "P2",
            Handle::P3 => "P3",
        };
        f.write_str(name)
    }
}
