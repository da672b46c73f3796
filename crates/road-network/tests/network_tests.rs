use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_abs_diff_eq;
use road_core::{MaterialHandle, RoadError};
use road_geometry::CubicBezier;
use road_math::{DVec3, Point3, Transform};
use road_network::{
    CurveId, CurveRecord, Endpoint, EndpointProvider, Handle, NetworkDocument, RoadNetwork,
};

fn dvec3(x: f64, y: f64, z: f64) -> Point3 {
    DVec3::new(x, y, z)
}

/// Straight segment along +Z from `z0` to `z0 + 10`.
fn along_z(network: &mut RoadNetwork, x: f64, z0: f64) -> CurveId {
    network.add_curve(
        Transform::identity(),
        CubicBezier::new(
            dvec3(x, 0.0, z0),
            dvec3(x, 0.0, z0 + 3.0),
            dvec3(x, 0.0, z0 + 7.0),
            dvec3(x, 0.0, z0 + 10.0),
        ),
    )
}

/// Saved documents match in topology and authored data; floats within 1e-9.
fn assert_same_document(loaded: &NetworkDocument, saved: &NetworkDocument) {
    assert_eq!(loaded.settings, saved.settings);
    assert_eq!(loaded.curves.len(), saved.curves.len());
    for (l, s) in loaded.curves.iter().zip(&saved.curves) {
        assert_eq!(l.start_lock, s.start_lock);
        assert_eq!(l.end_lock, s.end_lock);
        assert_eq!(l.profile, s.profile);
        assert_eq!(l.lines, s.lines);
        for (a, b) in l.transform.matrix.iter().zip(&s.transform.matrix) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-9);
        }
        let (lp, sp) = (&l.control_points, &s.control_points);
        for (a, b) in [(lp.p0, sp.p0), (lp.p1, sp.p1), (lp.p2, sp.p2), (lp.p3, sp.p3)] {
            assert_abs_diff_eq!(a.x, b.x, epsilon = 1e-9);
            assert_abs_diff_eq!(a.y, b.y, epsilon = 1e-9);
            assert_abs_diff_eq!(a.z, b.z, epsilon = 1e-9);
        }
    }
}

fn record_changes(network: &mut RoadNetwork) -> Rc<RefCell<Vec<(CurveId, u32)>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    network.add_listener(move |id, depth| sink.borrow_mut().push((id, depth)));
    log
}

fn close(a: Point3, b: Point3) -> bool {
    (a - b).length() < 1e-9
}

#[test]
fn test_lock_then_move_scenario() {
    let mut network = RoadNetwork::default();
    let a = along_z(&mut network, 0.0, 0.0);
    let b = along_z(&mut network, 0.0, 10.0);
    network.lock_start(b, a).unwrap();

    let before = network.segment(b).unwrap().start_point();
    let old_end = network.segment(a).unwrap().end_point();
    network
        .set_handle(a, Handle::P3, old_end + dvec3(5.0, 0.0, 0.0))
        .unwrap();

    let seg_b = network.segment(b).unwrap();
    assert!(close(seg_b.start_point(), before + dvec3(5.0, 0.0, 0.0)));
    assert!((seg_b.world_point(Handle::P1).distance(seg_b.start_point()) - 3.0).abs() < 1e-9);

    // B's tangent continues A's end direction
    let a_dir = -network.segment(a).unwrap().end_tangent().normalize();
    let b_dir = seg_b.start_tangent().normalize();
    assert!((a_dir - b_dir).length() < 1e-9);
}

#[test]
fn test_lock_chain_updates_each_curve_once() {
    let mut network = RoadNetwork::default();
    let a = along_z(&mut network, 0.0, 0.0);
    let b = along_z(&mut network, 0.0, 10.0);
    let c = along_z(&mut network, 0.0, 20.0);
    network.lock_start(b, a).unwrap();
    network.lock_start(c, b).unwrap();
    network.lock_end(c, a).unwrap();

    let log = record_changes(&mut network);
    let b_tangent = network.segment(b).unwrap().start_tangent().length();
    network.set_handle(a, Handle::P3, dvec3(2.0, 0.0, 10.0)).unwrap();

    let events = log.borrow().clone();
    assert_eq!(events[0], (a, 0));
    assert_eq!(events.iter().filter(|e| e.0 == b).count(), 1);
    assert_eq!(events.iter().filter(|e| e.0 == c).count(), 1);
    assert!(events.iter().skip(1).all(|&(_, depth)| depth == 1));
    assert_eq!(events.len(), 3);

    let seg_b = network.segment(b).unwrap();
    assert!(close(seg_b.start_point(), dvec3(2.0, 0.0, 10.0)));
    assert!((seg_b.start_tangent().length() - b_tangent).abs() < 1e-9);
}

#[test]
fn test_depth_one_does_not_move_second_hop() {
    let mut network = RoadNetwork::default();
    let a = along_z(&mut network, 0.0, 0.0);
    let b = along_z(&mut network, 0.0, 10.0);
    let c = along_z(&mut network, 0.0, 20.0);
    network.lock_start(b, a).unwrap();
    network.lock_start(c, b).unwrap();

    let log = record_changes(&mut network);
    let c_before = *network.segment(c).unwrap().world_bezier();
    network.set_handle(a, Handle::P3, dvec3(0.0, 1.0, 10.0)).unwrap();

    assert_eq!(*log.borrow(), vec![(a, 0), (b, 1)]);
    assert_eq!(*network.segment(c).unwrap().world_bezier(), c_before);

    // moving B's free end drags C
    network.set_handle(b, Handle::P3, dvec3(1.0, 0.0, 21.0)).unwrap();
    assert!(close(network.segment(c).unwrap().start_point(), dvec3(1.0, 0.0, 21.0)));
}

#[test]
fn test_self_lock_and_cycles_are_rejected() {
    let mut network = RoadNetwork::default();
    let a = along_z(&mut network, 0.0, 0.0);
    let b = along_z(&mut network, 0.0, 10.0);

    assert!(matches!(network.lock_start(a, a), Err(RoadError::InvalidOperation(_))));

    network.lock_start(b, a).unwrap();
    assert!(matches!(network.lock_end(a, b), Err(RoadError::LockCycle(_))));
    assert!(network.segment(a).unwrap().end_lock().is_none());
    assert!(network.depends_on(b, a));
    assert!(!network.depends_on(a, b));
}

#[test]
fn test_relock_replaces_registration() {
    let mut network = RoadNetwork::default();
    let a = along_z(&mut network, 0.0, 0.0);
    let b = along_z(&mut network, 5.0, 0.0);
    let c = along_z(&mut network, 0.0, 10.0);
    network.lock_start(c, a).unwrap();
    network.lock_start(c, b).unwrap();
    network.lock_start(c, b).unwrap();
    assert_eq!(network.segment(c).unwrap().start_lock(), Some(b));

    let log = record_changes(&mut network);
    network.set_handle(a, Handle::P3, dvec3(0.0, 0.0, 12.0)).unwrap();
    assert_eq!(*log.borrow(), vec![(a, 0)]);
    assert!(close(network.segment(c).unwrap().start_point(), dvec3(5.0, 0.0, 10.0)));
}

#[test]
fn test_unlock_keeps_geometry_and_stops_following() {
    let mut network = RoadNetwork::default();
    let a = along_z(&mut network, 0.0, 0.0);
    let b = along_z(&mut network, 3.0, 12.0);
    network.lock_start(b, a).unwrap();
    let attached = network.segment(b).unwrap().start_point();
    assert!(close(attached, dvec3(0.0, 0.0, 10.0)));

    network.unlock_start(b).unwrap();
    network.unlock_start(b).unwrap();
    assert!(close(network.segment(b).unwrap().start_point(), attached));

    network.set_handle(a, Handle::P3, dvec3(4.0, 0.0, 10.0)).unwrap();
    assert!(close(network.segment(b).unwrap().start_point(), attached));
}

#[test]
fn test_reverse() {
    let mut network = RoadNetwork::default();
    let a = along_z(&mut network, 0.0, 0.0);
    let b = along_z(&mut network, 0.0, 10.0);

    network.reverse(a).unwrap();
    let seg = network.segment(a).unwrap();
    assert!(close(seg.start_point(), dvec3(0.0, 0.0, 10.0)));
    assert!(close(seg.world_point(Handle::P1), dvec3(0.0, 0.0, 7.0)));
    assert!(close(seg.end_point(), DVec3::ZERO));

    network.lock_start(b, a).unwrap();
    let before = *network.segment(b).unwrap().local_bezier();
    let err = network.reverse(b).unwrap_err();
    assert!(matches!(err, RoadError::EndpointsLocked));
    assert_eq!(err.to_string(), "endpoints must be unlocked before reversing");
    assert_eq!(*network.segment(b).unwrap().local_bezier(), before);
}

#[test]
fn test_locked_knots_are_not_editable() {
    let mut network = RoadNetwork::default();
    let a = along_z(&mut network, 0.0, 0.0);
    let b = along_z(&mut network, 0.0, 10.0);
    network.lock_start(b, a).unwrap();

    assert!(!network.handle_editable(b, Handle::P0));
    assert!(network.handle_editable(b, Handle::P1));
    assert!(network.handle_editable(b, Handle::P3));
    assert!(network.handle_editable(a, Handle::P3));

    let result = network.set_handle(b, Handle::P0, dvec3(9.0, 9.0, 9.0));
    assert!(matches!(result, Err(RoadError::HandleLocked(_))));
    assert!(close(network.segment(b).unwrap().start_point(), dvec3(0.0, 0.0, 10.0)));
}

#[test]
fn test_locked_tangent_edit_keeps_direction() {
    let mut network = RoadNetwork::default();
    let a = along_z(&mut network, 0.0, 0.0);
    let b = along_z(&mut network, 0.0, 10.0);
    network.lock_start(b, a).unwrap();

    // dragged off-axis by 3 and forward by 4: length 5 along +Z
    network.set_handle(b, Handle::P1, dvec3(3.0, 0.0, 14.0)).unwrap();
    let p1 = network.segment(b).unwrap().world_point(Handle::P1);
    assert!(close(p1, dvec3(0.0, 0.0, 15.0)));
}

#[test]
fn test_snap_to_nearest_other_curve() {
    let mut network = RoadNetwork::default();
    let a = along_z(&mut network, 0.0, 0.0);
    assert_eq!(network.snap_start(a, true).unwrap(), None);

    let far = along_z(&mut network, 50.0, 0.0);
    let b = along_z(&mut network, 1.0, 11.0);

    assert_eq!(network.snap_start(b, false).unwrap(), Some(a));
    let seg = network.segment(b).unwrap();
    assert!(close(seg.start_point(), dvec3(0.0, 0.0, 10.0)));
    assert!((seg.start_tangent().length() - 3.0).abs() < 1e-9);
    assert!(seg.start_lock().is_none());
    assert!(close(network.segment(far).unwrap().end_point(), dvec3(50.0, 0.0, 10.0)));

    assert_eq!(network.snap_start(b, true).unwrap(), Some(a));
    assert_eq!(network.segment(b).unwrap().start_lock(), Some(a));
}

#[test]
fn test_snap_end_targets_start_points() {
    let mut network = RoadNetwork::default();
    let a = along_z(&mut network, 0.0, 0.0);
    let b = along_z(&mut network, 0.5, -11.0);
    assert_eq!(network.snap_end(b, true).unwrap(), Some(a));
    let seg = network.segment(b).unwrap();
    assert!(close(seg.end_point(), DVec3::ZERO));
    assert!(close(seg.world_point(Handle::P2), dvec3(0.0, 0.0, -3.0)));
    assert_eq!(seg.end_lock(), Some(a));
}

#[test]
fn test_unlocked_snap_releases_lock() {
    let mut network = RoadNetwork::default();
    let a = along_z(&mut network, 0.0, 0.0);
    let b = along_z(&mut network, 2.0, 12.0);
    network.lock_start(b, a).unwrap();
    assert!(!network.handle_editable(b, Handle::P0));

    assert_eq!(network.snap_start(b, false).unwrap(), Some(a));
    assert!(network.segment(b).unwrap().start_lock().is_none());
    assert!(network.handle_editable(b, Handle::P0));

    let snapped = network.segment(b).unwrap().start_point();
    network.set_handle(a, Handle::P3, dvec3(3.0, 0.0, 10.0)).unwrap();
    assert!(close(network.segment(b).unwrap().start_point(), snapped));
}

#[test]
fn test_snap_both_then_unlock_both() {
    let mut network = RoadNetwork::default();
    let a = along_z(&mut network, 0.0, 0.0);
    let c = along_z(&mut network, 0.0, 30.0);
    let b = network.add_curve(
        Transform::identity(),
        CubicBezier::new(
            dvec3(1.0, 0.0, 11.0),
            dvec3(1.0, 0.0, 14.0),
            dvec3(1.0, 0.0, 26.0),
            dvec3(1.0, 0.0, 29.0),
        ),
    );

    assert_eq!(network.snap_both(b, true).unwrap(), [Some(a), Some(c)]);
    let seg = network.segment(b).unwrap();
    assert_eq!(seg.start_lock(), Some(a));
    assert_eq!(seg.end_lock(), Some(c));
    assert!(close(seg.world_point(Handle::P1), dvec3(0.0, 0.0, 13.0)));
    assert!(close(seg.world_point(Handle::P2), dvec3(0.0, 0.0, 27.0)));

    network.unlock_both(b).unwrap();
    let seg = network.segment(b).unwrap();
    assert!(seg.start_lock().is_none());
    assert!(seg.end_lock().is_none());
    assert!(close(seg.start_point(), dvec3(0.0, 0.0, 10.0)));
    assert!(close(seg.end_point(), dvec3(0.0, 0.0, 30.0)));
}

#[test]
fn test_lock_to_collapsed_handle_keeps_tangent_length() {
    let mut network = RoadNetwork::default();
    let a = network.add_curve(
        Transform::identity(),
        CubicBezier::new(DVec3::ZERO, dvec3(0.0, 0.0, 4.0), dvec3(0.0, 0.0, 10.0), dvec3(0.0, 0.0, 10.0)),
    );
    let b = along_z(&mut network, 0.0, 10.0);
    network.lock_start(b, a).unwrap();
    network.set_handle(a, Handle::P3, dvec3(0.0, 0.0, 12.0)).unwrap();
    network.set_handle(a, Handle::P2, dvec3(0.0, 0.0, 12.0)).unwrap();

    let seg = network.segment(b).unwrap();
    assert!(close(seg.start_point(), dvec3(0.0, 0.0, 12.0)));
    assert!((seg.start_tangent().length() - 3.0).abs() < 1e-9);
}

#[test]
fn test_every_notified_curve_regenerates() {
    #[derive(Clone, Default)]
    struct Counter(Rc<RefCell<Vec<[MaterialHandle; 2]>>>);

    impl road_mesh::MeshSink for Counter {
        fn submit_mesh(&mut self, vertices: &[Point3], _: [Vec<[u32; 3]>; 2], materials: [MaterialHandle; 2]) {
            assert!(!vertices.is_empty());
            self.0.borrow_mut().push(materials);
        }
    }

    let mut network = RoadNetwork::default();
    let a = along_z(&mut network, 0.0, 0.0);
    let b = along_z(&mut network, 0.0, 10.0);
    network.lock_start(b, a).unwrap();
    assert!(network.mesh(a).is_some());

    let counter = Counter::default();
    network.set_mesh_sink(counter.clone());
    network.set_handle(a, Handle::P2, dvec3(0.0, 0.0, 6.0)).unwrap();

    let submissions = counter.0.borrow();
    assert_eq!(submissions.len(), 2);
    assert_eq!(submissions[0], [MaterialHandle::new(0), MaterialHandle::new(1)]);
}

#[test]
fn test_remove_curve_clears_dependent_locks() {
    let mut network = RoadNetwork::default();
    let a = along_z(&mut network, 0.0, 0.0);
    let b = along_z(&mut network, 0.0, 10.0);
    network.lock_start(b, a).unwrap();
    network.remove_curve(a).unwrap();
    assert!(network.segment(b).unwrap().start_lock().is_none());
    assert!(matches!(network.segment(a), Err(RoadError::NotFound(_))));
    assert_eq!(network.len(), 1);
}

#[test]
fn test_json_round_trip_restores_locks() {
    let mut network = RoadNetwork::default();
    let a = network.add_curve(
        Transform::from_translation_yaw(dvec3(2.0, 0.0, 1.0), 45.0),
        CubicBezier::new(DVec3::ZERO, dvec3(0.0, 0.0, 3.0), dvec3(0.0, 0.0, 7.0), dvec3(0.0, 0.0, 10.0)),
    );
    let b = along_z(&mut network, 20.0, 20.0);
    network.lock_start(b, a).unwrap();
    let mut profile = network.segment(b).unwrap().profile.clone();
    profile.green_lane = true;
    network.set_profile(b, profile).unwrap();

    let json = network.to_json().unwrap();
    let mut loaded = RoadNetwork::from_json(&json).unwrap();
    assert_same_document(&loaded.to_document(), &network.to_document());

    let ids: Vec<CurveId> = loaded.ids().collect();
    let (la, lb) = (ids[0], ids[1]);
    assert_eq!(loaded.segment(lb).unwrap().start_lock(), Some(la));
    assert!(loaded.segment(lb).unwrap().profile.green_lane);
    assert!(loaded.mesh(lb).is_some());

    // locks keep working after load
    let end = loaded.segment(la).unwrap().end_point();
    loaded.set_handle(la, Handle::P3, end + DVec3::Y).unwrap();
    assert!(close(loaded.segment(lb).unwrap().start_point(), end + DVec3::Y));
}

#[test]
fn test_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roads.json");

    let mut network = RoadNetwork::default();
    let a = along_z(&mut network, 0.0, 0.0);
    let b = along_z(&mut network, 0.0, 10.0);
    network.lock_end(a, b).unwrap();
    network.save(&path).unwrap();

    let loaded = RoadNetwork::load(&path).unwrap();
    assert_eq!(loaded.len(), 2);
    assert_same_document(&loaded.to_document(), &network.to_document());
    assert!(matches!(
        RoadNetwork::load(dir.path().join("missing.json")),
        Err(RoadError::Io(_))
    ));
}

#[test]
fn test_cyclic_document_is_rejected() {
    let record = |start_lock: Option<usize>| CurveRecord {
        transform: Transform::identity(),
        control_points: CubicBezier::new(DVec3::ZERO, DVec3::Z, DVec3::Z * 2.0, DVec3::Z * 3.0),
        profile: Default::default(),
        lines: Default::default(),
        start_lock,
        end_lock: None,
    };
    let cyclic = NetworkDocument {
        settings: Default::default(),
        curves: vec![record(Some(1)), record(Some(0))],
    };
    assert!(matches!(
        RoadNetwork::from_document(cyclic),
        Err(RoadError::LockCycle(_))
    ));

    let dangling = NetworkDocument {
        settings: Default::default(),
        curves: vec![record(Some(4))],
    };
    assert!(matches!(
        RoadNetwork::from_document(dangling),
        Err(RoadError::Validation(_))
    ));

    assert!(matches!(
        RoadNetwork::from_json("{ \"curves\": 3 }"),
        Err(RoadError::Serialization(_))
    ));
}

#[test]
fn test_endpoint_helpers() {
    assert_eq!(Endpoint::Start.opposite(), Endpoint::End);
    assert_eq!(Handle::P1.endpoint(), Endpoint::Start);
    assert_eq!(Handle::P2.endpoint(), Endpoint::End);
    assert!(Handle::P3.is_knot());
    assert!(!Handle::P2.is_knot());
    assert_eq!(Handle::ALL.len(), 4);
}
