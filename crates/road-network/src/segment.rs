//! One road segment: spine, cross-section, and lock links.

use road_geometry::{ArcLengthCurve, CubicBezier};
use road_math::{Point3, Transform, Vector3};
use road_mesh::{generate_road_mesh, RoadMesh};
use road_profile::{CrossSectionProfile, LineSpec, RoadSettings};

use crate::provider::EndpointProvider;
use crate::types::{CurveId, Endpoint, Handle};

/// A road segment owned by a [`RoadNetwork`](crate::RoadNetwork).
///
/// Control points are stored in the segment's local frame. The arc-length
/// spine is kept in world space and rebuilt whenever a point or the
/// transform changes.
#[derive(Debug, Clone)]
pub struct RoadSegment {
    transform: Transform,
    local: CubicBezier,
    curve: ArcLengthCurve,
    pub profile: CrossSectionProfile,
    pub lines: LineSpec,
    pub(crate) start_lock: Option<CurveId>,
    pub(crate) end_lock: Option<CurveId>,
    pub(crate) mesh: Option<RoadMesh>,
}

impl RoadSegment {
    pub fn new(transform: Transform, local: CubicBezier) -> Self {
        Self::with_settings(transform, local, &RoadSettings::default())
    }

    pub fn with_settings(transform: Transform, local: CubicBezier, settings: &RoadSettings) -> Self {
        let curve = ArcLengthCurve::new(to_world(&transform, &local));
        Self {
            transform,
            local,
            curve,
            profile: CrossSectionProfile::from_settings(settings),
            lines: LineSpec::from_settings(settings),
            start_lock: None,
            end_lock: None,
            mesh: None,
        }
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
        self.rebuild();
    }

    /// Control points in the segment's local frame.
    pub fn local_bezier(&self) -> &CubicBezier {
        &self.local
    }

    /// Control points in world space.
    pub fn world_bezier(&self) -> &CubicBezier {
        self.curve.bezier()
    }

    pub fn curve(&self) -> &ArcLengthCurve {
        &self.curve
    }

    pub fn world_point(&self, handle: Handle) -> Point3 {
        let b = self.world_bezier();
        match handle {
            Handle::P0 => b.p0,
            Handle::P1 => b.p1,
            Handle::P2 => b.p2,
            Handle::P3 => b.p3,
        }
    }

    /// Place `handle` at a world position without any lock checks.
    pub(crate) fn put_world_point(&mut self, handle: Handle, world: Point3) {
        let local = self.transform.inverse_transform_point(world);
        match handle {
            Handle::P0 => self.local.p0 = local,
            Handle::P1 => self.local.p1 = local,
            Handle::P2 => self.local.p2 = local,
            Handle::P3 => self.local.p3 = local,
        }
        self.rebuild();
    }

    /// Replace all control points from a world-space curve.
    pub(crate) fn put_world_bezier(&mut self, world: &CubicBezier) {
        let inv = |p: Point3| self.transform.inverse_transform_point(p);
        self.local = CubicBezier::new(inv(world.p0), inv(world.p1), inv(world.p2), inv(world.p3));
        self.rebuild();
    }

    pub(crate) fn put_local_bezier(&mut self, local: CubicBezier) {
        self.local = local;
        self.rebuild();
    }

    fn rebuild(&mut self) {
        self.curve.set_bezier(to_world(&self.transform, &self.local));
    }

    pub fn lock(&self, side: Endpoint) -> Option<CurveId> {
        match side {
            Endpoint::Start => self.start_lock,
            Endpoint::End => self.end_lock,
        }
    }

    pub(crate) fn set_lock(&mut self, side: Endpoint, target: Option<CurveId>) {
        match side {
            Endpoint::Start => self.start_lock = target,
            Endpoint::End => self.end_lock = target,
        }
    }

    pub fn start_lock(&self) -> Option<CurveId> {
        self.start_lock
    }

    pub fn end_lock(&self) -> Option<CurveId> {
        self.end_lock
    }

    pub fn is_locked(&self) -> bool {
        self.start_lock.is_some() || self.end_lock.is_some()
    }

    /// Last generated mesh, in the segment's local frame.
    pub fn mesh(&self) -> Option<&RoadMesh> {
        self.mesh.as_ref()
    }

    /// Rebuild the mesh from the current spine and cross-section. Heals the
    /// profile and line layout first.
    pub fn regenerate(&mut self, settings: &RoadSettings) -> &RoadMesh {
        let mesh = generate_road_mesh(
            &self.curve,
            &mut self.profile,
            &mut self.lines,
            settings,
            &self.transform,
        );
        self.mesh.insert(mesh)
    }
}

fn to_world(transform: &Transform, local: &CubicBezier) -> CubicBezier {
    let [p0, p1, p2, p3] = local.control_points().map(|p| transform.transform_point(p));
    CubicBezier::new(p0, p1, p2, p3)
}

impl EndpointProvider for RoadSegment {
    fn start_point(&self) -> Point3 {
        self.world_bezier().p0
    }

    fn end_point(&self) -> Point3 {
        self.world_bezier().p3
    }

    fn start_tangent(&self) -> Vector3 {
        self.world_bezier().start_tangent()
    }

    fn end_tangent(&self) -> Vector3 {
        self.world_bezier().end_tangent()
    }

    fn handle_direction(&self, endpoint: Endpoint) -> Vector3 {
        self.world_bezier().handle_direction(endpoint)
    }
}
