//! Segment arena with endpoint locks and change propagation.

use std::collections::HashSet;

use road_core::error::{Result, RoadError};
use road_geometry::CubicBezier;
use road_math::{Point3, Transform};
use road_mesh::{submit_road_mesh, MeshSink, RoadMesh};
use road_profile::{CrossSectionProfile, LineSpec, RoadSettings};
use slotmap::SlotMap;
use tracing::{debug, info, warn};

use crate::listener::ChangeListener;
use crate::provider::{attach, EndpointProvider};
use crate::segment::RoadSegment;
use crate::types::{CurveId, Endpoint, Handle};

/// All road segments of a scene plus the lock links between them.
///
/// Every accepted edit notifies listeners, regenerates the edited segment's
/// mesh, and moves segments locked to it before the call returns.
pub struct RoadNetwork {
    pub(crate) curves: SlotMap<CurveId, RoadSegment>,
    pub(crate) settings: RoadSettings,
    listeners: Vec<Box<dyn ChangeListener>>,
    sink: Option<Box<dyn MeshSink>>,
}

impl Default for RoadNetwork {
    fn default() -> Self {
        Self::new(RoadSettings::default())
    }
}

impl std::fmt::Debug for RoadNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoadNetwork")
            .field("curves", &self.curves.len())
            .field("listeners", &self.listeners.len())
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}

impl RoadNetwork {
    pub fn new(settings: RoadSettings) -> Self {
        Self {
            curves: SlotMap::with_key(),
            settings,
            listeners: Vec::new(),
            sink: None,
        }
    }

    pub fn settings(&self) -> &RoadSettings {
        &self.settings
    }

    pub fn add_listener(&mut self, listener: impl ChangeListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Every regenerated mesh is handed to `sink`.
    pub fn set_mesh_sink(&mut self, sink: impl MeshSink + 'static) {
        self.sink = Some(Box::new(sink));
    }

    // --- Arena ---

    /// Add a segment with default profile and markings, and build its mesh.
    pub fn add_curve(&mut self, transform: Transform, local: CubicBezier) -> CurveId {
        let segment = RoadSegment::with_settings(transform, local, &self.settings);
        self.insert_segment(segment)
    }

    /// Add a prepared segment. Lock links on it are cleared.
    pub fn insert_segment(&mut self, mut segment: RoadSegment) -> CurveId {
        segment.start_lock = None;
        segment.end_lock = None;
        let id = self.curves.insert(segment);
        if let Err(e) = self.regenerate(id) {
            warn!(?id, error = %e, "initial mesh generation failed");
        }
        id
    }

    /// Remove a segment. Segments locked to it keep their geometry and lose
    /// the link.
    pub fn remove_curve(&mut self, id: CurveId) -> Result<RoadSegment> {
        let segment = self.curves.remove(id).ok_or_else(|| not_found(id))?;
        for (dep, seg) in self.curves.iter_mut() {
            for side in [Endpoint::Start, Endpoint::End] {
                if seg.lock(side) == Some(id) {
                    seg.set_lock(side, None);
                    info!(curve = ?dep, ?side, removed = ?id, "lock target removed");
                }
            }
        }
        Ok(segment)
    }

    pub fn get(&self, id: CurveId) -> Option<&RoadSegment> {
        self.curves.get(id)
    }

    pub fn segment(&self, id: CurveId) -> Result<&RoadSegment> {
        self.curves.get(id).ok_or_else(|| not_found(id))
    }

    pub fn contains(&self, id: CurveId) -> bool {
        self.curves.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = CurveId> + '_ {
        self.curves.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CurveId, &RoadSegment)> {
        self.curves.iter()
    }

    pub fn mesh(&self, id: CurveId) -> Option<&RoadMesh> {
        self.curves.get(id).and_then(RoadSegment::mesh)
    }

    // --- Editing ---

    /// Whether `handle` of `id` may be moved directly. Knots on a locked
    /// side follow their target and are not editable.
    pub fn handle_editable(&self, id: CurveId, handle: Handle) -> bool {
        self.curves
            .get(id)
            .is_some_and(|seg| !(handle.is_knot() && seg.lock(handle.endpoint()).is_some()))
    }

    /// Move a control point to a world position.
    ///
    /// A tangent handle on a locked side keeps the edited length but stays
    /// aligned with the lock target's tangent.
    pub fn set_handle(&mut self, id: CurveId, handle: Handle, world: Point3) -> Result<()> {
        let seg = self.segment(id)?;
        let side = handle.endpoint();
        let position = match seg.lock(side) {
            None => world,
            Some(_) if handle.is_knot() => {
                warn!(curve = ?id, %handle, "rejected edit of locked knot");
                return Err(RoadError::HandleLocked(format!("{} of {:?}", handle, id)));
            }
            Some(target) => {
                let target = self.segment(target)?;
                let direction = target.handle_direction(side.opposite());
                let knot = seg.point(side);
                knot - direction * world.distance(knot)
            }
        };
        self.segment_mut(id)?.put_world_point(handle, position);
        self.notify(id, 0)
    }

    pub fn set_transform(&mut self, id: CurveId, transform: Transform) -> Result<()> {
        self.segment_mut(id)?.set_transform(transform);
        for side in [Endpoint::Start, Endpoint::End] {
            self.follow(id, side)?;
        }
        self.notify(id, 0)
    }

    pub fn set_profile(&mut self, id: CurveId, profile: CrossSectionProfile) -> Result<()> {
        self.segment_mut(id)?.profile = profile;
        self.notify(id, 0)
    }

    pub fn set_lines(&mut self, id: CurveId, lines: LineSpec) -> Result<()> {
        self.segment_mut(id)?.lines = lines;
        self.notify(id, 0)
    }

    /// Swap the direction of travel. Both ends must be unlocked.
    pub fn reverse(&mut self, id: CurveId) -> Result<()> {
        let seg = self.segment_mut(id)?;
        if seg.is_locked() {
            warn!(curve = ?id, "rejected reverse of locked curve");
            return Err(RoadError::EndpointsLocked);
        }
        let reversed = seg.local_bezier().reversed();
        seg.put_local_bezier(reversed);
        self.notify(id, 0)
    }

    // --- Locks ---

    /// Lock `side` of `id` to `target`: a start attaches to the target's end
    /// and an end to the target's start. The endpoint is moved into place
    /// immediately.
    pub fn lock(&mut self, id: CurveId, side: Endpoint, target: CurveId) -> Result<()> {
        self.check_lock(id, target)?;
        self.segment_mut(id)?.set_lock(side, Some(target));
        self.follow(id, side)?;
        info!(curve = ?id, ?side, ?target, "locked");
        self.notify(id, 0)
    }

    pub fn lock_start(&mut self, id: CurveId, target: CurveId) -> Result<()> {
        self.lock(id, Endpoint::Start, target)
    }

    pub fn lock_end(&mut self, id: CurveId, target: CurveId) -> Result<()> {
        self.lock(id, Endpoint::End, target)
    }

    /// Remove the lock on `side`. Geometry stays where it is.
    pub fn unlock(&mut self, id: CurveId, side: Endpoint) -> Result<()> {
        let seg = self.segment_mut(id)?;
        if seg.lock(side).is_none() {
            return Ok(());
        }
        seg.set_lock(side, None);
        info!(curve = ?id, ?side, "unlocked");
        self.notify(id, 0)
    }

    pub fn unlock_start(&mut self, id: CurveId) -> Result<()> {
        self.unlock(id, Endpoint::Start)
    }

    pub fn unlock_end(&mut self, id: CurveId) -> Result<()> {
        self.unlock(id, Endpoint::End)
    }

    pub fn unlock_both(&mut self, id: CurveId) -> Result<()> {
        self.unlock(id, Endpoint::Start)?;
        self.unlock(id, Endpoint::End)
    }

    pub(crate) fn check_lock(&self, id: CurveId, target: CurveId) -> Result<()> {
        self.segment(id)?;
        self.segment(target)?;
        if id == target {
            warn!(curve = ?id, "rejected self-lock");
            return Err(RoadError::InvalidOperation(format!(
                "{:?} cannot lock to itself",
                id
            )));
        }
        if self.depends_on(target, id) {
            warn!(curve = ?id, ?target, "rejected cyclic lock");
            return Err(RoadError::LockCycle(format!(
                "{:?} already follows {:?}",
                target, id
            )));
        }
        Ok(())
    }

    /// Whether `from` follows `to` through a chain of locks.
    pub fn depends_on(&self, from: CurveId, to: CurveId) -> bool {
        let mut stack = vec![from];
        let mut seen = HashSet::new();
        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            let Some(seg) = self.curves.get(current) else {
                continue;
            };
            for target in [seg.start_lock, seg.end_lock].into_iter().flatten() {
                if target == to {
                    return true;
                }
                stack.push(target);
            }
        }
        false
    }

    // --- Snapping ---

    /// Move `side` of `id` onto the nearest matching endpoint of another
    /// curve, optionally locking to it. Without `lock` any existing lock on
    /// `side` is released. Returns the curve snapped to, or `None` when there
    /// is no other curve.
    pub fn snap(&mut self, id: CurveId, side: Endpoint, lock: bool) -> Result<Option<CurveId>> {
        let point = self.segment(id)?.point(side);
        let nearest = self
            .curves
            .iter()
            .filter(|(other, _)| *other != id)
            .map(|(other, seg)| (other, seg.point(side.opposite()).distance(point)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(other, _)| other);

        let Some(target) = nearest else {
            debug!(curve = ?id, ?side, "nothing to snap to");
            return Ok(None);
        };

        if lock {
            self.check_lock(id, target)?;
            self.segment_mut(id)?.set_lock(side, Some(target));
        } else if let Some(previous) = self.segment(id)?.lock(side) {
            // an unlocked snap leaves the side free
            self.segment_mut(id)?.set_lock(side, None);
            info!(curve = ?id, ?side, ?previous, "released lock for unlocked snap");
        }
        let snapped = attach(self.segment(id)?.world_bezier(), side, self.segment(target)?);
        self.segment_mut(id)?.put_world_bezier(&snapped);
        info!(curve = ?id, ?side, ?target, lock, "snapped");
        self.notify(id, 0)?;
        Ok(Some(target))
    }

    pub fn snap_start(&mut self, id: CurveId, lock: bool) -> Result<Option<CurveId>> {
        self.snap(id, Endpoint::Start, lock)
    }

    pub fn snap_end(&mut self, id: CurveId, lock: bool) -> Result<Option<CurveId>> {
        self.snap(id, Endpoint::End, lock)
    }

    /// Snap the start, then the end.
    pub fn snap_both(&mut self, id: CurveId, lock: bool) -> Result<[Option<CurveId>; 2]> {
        let start = self.snap(id, Endpoint::Start, lock)?;
        let end = self.snap(id, Endpoint::End, lock)?;
        Ok([start, end])
    }

    // --- Propagation ---

    /// Report a change of `id` at `depth`.
    ///
    /// Listeners hear every change and the curve's mesh is rebuilt. Only a
    /// depth-0 change moves the curves locked to `id`; each of those is then
    /// reported at depth 1, which ends the walk.
    pub fn notify(&mut self, id: CurveId, depth: u32) -> Result<()> {
        self.segment(id)?;
        for listener in &mut self.listeners {
            listener.on_change(id, depth);
        }
        self.regenerate(id)?;
        if depth > 0 {
            return Ok(());
        }

        let mut dependents = Vec::new();
        for (dep, seg) in self.curves.iter() {
            for side in [Endpoint::Start, Endpoint::End] {
                if seg.lock(side) == Some(id) {
                    dependents.push((dep, side));
                }
            }
        }
        for &(dep, side) in &dependents {
            self.follow(dep, side)?;
        }
        let mut moved: Vec<CurveId> = dependents.into_iter().map(|(dep, _)| dep).collect();
        moved.dedup();
        for dep in moved {
            self.notify(dep, depth + 1)?;
        }
        Ok(())
    }

    /// Re-attach `side` of `id` to its lock target, if any.
    fn follow(&mut self, id: CurveId, side: Endpoint) -> Result<()> {
        let seg = self.segment(id)?;
        let Some(target) = seg.lock(side) else {
            return Ok(());
        };
        let moved = attach(seg.world_bezier(), side, self.segment(target)?);
        self.segment_mut(id)?.put_world_bezier(&moved);
        Ok(())
    }

    /// Rebuild the mesh of `id` and hand it to the mesh sink.
    pub fn regenerate(&mut self, id: CurveId) -> Result<&RoadMesh> {
        let seg = self.curves.get_mut(id).ok_or_else(|| not_found(id))?;
        let mesh = seg.regenerate(&self.settings);
        if let Some(sink) = self.sink.as_mut() {
            submit_road_mesh(mesh, &self.settings, &mut **sink);
        }
        Ok(mesh)
    }

    fn segment_mut(&mut self, id: CurveId) -> Result<&mut RoadSegment> {
        self.curves.get_mut(id).ok_or_else(|| not_found(id))
    }
}

fn not_found(id: CurveId) -> RoadError {
    RoadError::NotFound(format!("curve {:?}", id))
}
