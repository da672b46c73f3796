//! Road segment network: curve arena, endpoint locks, editing surface and
//! persistence.

pub mod document;
pub mod listener;
pub mod network;
pub mod provider;
pub mod segment;
pub mod types;

pub use document::{CurveRecord, NetworkDocument};
pub use listener::ChangeListener;
pub use network::RoadNetwork;
pub use provider::{attach, EndpointProvider};
pub use segment::RoadSegment;
pub use types::{CurveId, Endpoint, Handle};
