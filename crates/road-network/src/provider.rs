//! Endpoint queries used for locking and snapping.

use road_geometry::CubicBezier;
use road_math::{Point3, Vector3};

use crate::types::Endpoint;

/// World-space endpoints and tangent handles of something a road can attach
/// to.
pub trait EndpointProvider {
    fn start_point(&self) -> Point3;
    fn end_point(&self) -> Point3;
    /// `P1 - P0`
    fn start_tangent(&self) -> Vector3;
    /// `P2 - P3`
    fn end_tangent(&self) -> Vector3;

    fn point(&self, endpoint: Endpoint) -> Point3 {
        match endpoint {
            Endpoint::Start => self.start_point(),
            Endpoint::End => self.end_point(),
        }
    }

    fn tangent(&self, endpoint: Endpoint) -> Vector3 {
        match endpoint {
            Endpoint::Start => self.start_tangent(),
            Endpoint::End => self.end_tangent(),
        }
    }

    /// Unit direction of the tangent handle at `endpoint`. Zero when the
    /// handle sits on its knot and nothing better is known.
    fn handle_direction(&self, endpoint: Endpoint) -> Vector3 {
        self.tangent(endpoint).normalize_or_zero()
    }
}

impl EndpointProvider for CubicBezier {
    fn start_point(&self) -> Point3 {
        self.p0
    }

    fn end_point(&self) -> Point3 {
        self.p3
    }

    fn start_tangent(&self) -> Vector3 {
        CubicBezier::start_tangent(self)
    }

    fn end_tangent(&self) -> Vector3 {
        CubicBezier::end_tangent(self)
    }

    /// Falls back to the travel direction when a handle is collapsed.
    fn handle_direction(&self, endpoint: Endpoint) -> Vector3 {
        let handle = self.tangent(endpoint);
        if handle.length_squared() > 1e-18 {
            return handle.normalize();
        }
        match endpoint {
            Endpoint::Start => self.direction_at(0.0),
            Endpoint::End => -self.direction_at(1.0),
        }
    }
}

/// Move `side` of `bezier` onto the opposite endpoint of `target`, keeping
/// the tangent handle's length and continuing the target's direction.
///
/// A start attaches to the target's end and an end attaches to the target's
/// start.
pub fn attach(bezier: &CubicBezier, side: Endpoint, target: &dyn EndpointProvider) -> CubicBezier {
    let anchor_side = side.opposite();
    let anchor = target.point(anchor_side);
    let direction = target.handle_direction(anchor_side);
    let mut out = *bezier;
    match side {
        Endpoint::Start => {
            let length = bezier.p0.distance(bezier.p1);
            out.p0 = anchor;
            out.p1 = anchor - direction * length;
        }
        Endpoint::End => {
            let length = bezier.p3.distance(bezier.p2);
            out.p3 = anchor;
            out.p2 = anchor - direction * length;
        }
    }
    out
}
