use arplace_core::{seeded_rng, AnchorId, ObjectKind, PlaneAlignment, ScreenPoint};
use arplace_placement::{
    CoachingGoal, PlacementConfig, SessionController, SessionObserver, TapOutcome,
};
use arplace_scene::Geometry;
use arplace_testkit::{
    assert_json_snapshot, assert_vec3_near, detect_floor, idle_session, init_tracing,
    running_session, wall_transform, Millimeters, FLOOR_HIT,
};
use arplace_tracking::{
    EstimatedSurface, RunOptions, SimulatedSession, TrackingError, TrackingSession,
    WorldTrackingConfiguration,
};
use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use serde::Serialize;
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

/// Tap low on the screen: steep enough to land inside a 2 m floor.
const NEAR_TAP: ScreenPoint = ScreenPoint::new(195.0, 800.0);

type Controller = SessionController<SimulatedSession, StdRng>;

fn started(session: SimulatedSession) -> Controller {
    init_tracing();
    let mut controller = SessionController::new(session, seeded_rng(21), &PlacementConfig::default());
    controller.start();
    controller.process_events().expect("events");
    controller
}

fn center(controller: &Controller) -> ScreenPoint {
    controller.session().camera().screen_center()
}

#[test]
fn start_configures_tracking_and_coaching() {
    let controller = started(idle_session());
    let runs = controller.session().runs();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].config, WorldTrackingConfiguration::planes_and_light());
    assert_eq!(runs[0].options, RunOptions::empty());

    let coaching = controller.coaching();
    assert_eq!(coaching.goal(), CoachingGoal::HorizontalPlane);
    assert!(coaching.activates_automatically());
    assert!(coaching.is_session_bound());
    assert!(coaching.is_active());
}

#[test]
fn taps_before_start_are_ignored() {
    let mut session = running_session();
    session.add_estimated_surface(EstimatedSurface::horizontal(0.0));
    let mut controller: Controller =
        SessionController::new(session, seeded_rng(1), &PlacementConfig::default());
    let point = center(&controller);
    assert_eq!(controller.handle_tap(point).unwrap(), TapOutcome::Miss);
    assert!(controller.registries().is_empty());
}

#[test]
fn tap_over_existing_plane_places_box_at_hit() {
    let mut controller = started(idle_session());
    detect_floor(controller.session_mut(), 10.0);
    controller.process_events().unwrap();

    let outcome = controller.handle_tap(center(&controller)).unwrap();
    let TapOutcome::Box { node, position, .. } = outcome else {
        panic!("expected box, got {outcome:?}");
    };
    assert_vec3_near(position, FLOOR_HIT);
    assert_eq!(controller.scene().world_position(node), Some(position));
    assert_eq!(
        controller.scene().node(node).unwrap().name.as_deref(),
        Some("box")
    );
    assert!(controller.scene().is_attached(node));
    assert_eq!(controller.counts().boxes, 1);
    assert_eq!(controller.counts().spheres, 0);
}

#[test]
fn tap_over_estimated_surface_places_sphere() {
    let mut controller = started(idle_session());
    controller
        .session_mut()
        .add_estimated_surface(EstimatedSurface::horizontal(0.0));

    let outcome = controller.handle_tap(center(&controller)).unwrap();
    assert_eq!(outcome.kind(), Some(ObjectKind::Sphere));
    let TapOutcome::Sphere { node, .. } = outcome else { unreachable!() };
    assert_eq!(
        controller.scene().node(node).unwrap().name.as_deref(),
        Some("sphere")
    );
    assert_eq!(controller.counts().spheres, 1);
    let sphere = controller.registries().spheres().next().unwrap();
    assert_eq!(sphere.color.a, 1.0);
}

#[test]
fn tap_with_nothing_under_it_changes_nothing() {
    let mut controller = started(idle_session());
    let nodes_before = controller.scene().len();
    for _ in 0..3 {
        assert_eq!(
            controller.handle_tap(center(&controller)).unwrap(),
            TapOutcome::Miss
        );
    }
    assert!(controller.registries().is_empty());
    assert_eq!(controller.scene().len(), nodes_before);
}

fn populated() -> Controller {
    let mut controller = started(idle_session());
    let session = controller.session_mut();
    detect_floor(session, 2.0);
    session
        .detect_plane(PlaneAlignment::Vertical, wall_transform(3.0), Vec2::splat(2.0))
        .expect("wall detected");
    session.add_estimated_surface(EstimatedSurface::horizontal(0.0));
    controller.process_events().unwrap();
    controller
}

#[test]
fn reset_clears_registries_scene_and_anchors() {
    let mut controller = populated();
    for _ in 0..3 {
        assert!(controller.handle_tap(NEAR_TAP).unwrap().plane_intersected());
    }
    for _ in 0..2 {
        let point = center(&controller);
        assert_eq!(
            controller.handle_tap(point).unwrap().kind(),
            Some(ObjectKind::Sphere)
        );
    }
    let query_point = center(&controller);
    controller.track_point(query_point).expect("tracked raycast");

    let counts = controller.counts();
    assert_eq!(
        (counts.boxes, counts.spheres, counts.horizontal_planes, counts.vertical_planes),
        (3, 2, 1, 1)
    );
    let nodes = controller.registries().nodes();

    controller.reset();

    assert_eq!(controller.counts().total(), 0);
    assert!(nodes.iter().all(|node| !controller.scene().is_attached(*node)));
    assert!(controller.scene().is_empty());

    let session = controller.session();
    let last = session.runs().last().unwrap();
    assert_eq!(last.config, WorldTrackingConfiguration::planes_and_light());
    assert_eq!(last.options, RunOptions::full_reset());
    assert_eq!(session.anchor_count(), 0);
    assert_eq!(session.tracked_raycast_count(), 0);

    // Removal events for the discarded anchors must not resurrect anything.
    controller.process_events().unwrap();
    assert_eq!(controller.counts().total(), 0);
}

#[test]
fn reset_drops_planes_detected_since_last_poll() {
    let mut controller = started(idle_session());
    detect_floor(controller.session_mut(), 2.0);
    controller
        .session_mut()
        .detect_plane(PlaneAlignment::Vertical, wall_transform(3.0), Vec2::splat(2.0))
        .expect("wall detected");

    controller.reset();
    controller.process_events().unwrap();

    assert_eq!(controller.counts().total(), 0);
    assert!(controller.scene().is_empty());
    assert_eq!(controller.session().anchor_count(), 0);
}

#[test]
fn reset_before_start_is_ignored() {
    let mut controller: Controller =
        SessionController::new(idle_session(), seeded_rng(6), &PlacementConfig::default());
    controller.reset();
    assert!(!controller.is_started());
    assert!(controller.session().runs().is_empty());
    assert!(!controller.coaching().is_active());

    controller.start();
    let runs = controller.session().runs();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].options, RunOptions::empty());
}

#[test]
fn planes_detected_after_reset_restart_naming() {
    let mut controller = populated();
    controller.reset();
    controller.process_events().unwrap();

    let id = detect_floor(controller.session_mut(), 2.0);
    controller.process_events().unwrap();
    assert_eq!(
        controller.registries().plane(id).unwrap().name,
        "horizontalPlane0"
    );
}

#[test]
fn plane_updates_regenerate_mesh() {
    let mut controller = started(idle_session());
    let id = detect_floor(controller.session_mut(), 1.0);
    controller.process_events().unwrap();
    assert_eq!(
        controller.handle_tap(center(&controller)).unwrap(),
        TapOutcome::Miss
    );

    controller
        .session_mut()
        .grow_plane(id, Vec3::ZERO, Vec2::splat(4.0));
    controller.process_events().unwrap();

    let node = controller.registries().plane(id).unwrap().node;
    let Some(Geometry::PlaneMesh(mesh)) = &controller.scene().node(node).unwrap().geometry else {
        panic!("plane node must carry a plane mesh");
    };
    assert_eq!(mesh.revision, 1);
    assert!(mesh.vertices.iter().any(|v| (v.x - 2.0).abs() < 1e-5));

    assert!(controller
        .handle_tap(center(&controller))
        .unwrap()
        .plane_intersected());
}

#[test]
fn plane_nodes_hang_under_anchor_nodes() {
    let mut controller = started(idle_session());
    let id = controller
        .session_mut()
        .detect_plane(PlaneAlignment::Vertical, wall_transform(3.0), Vec2::splat(2.0))
        .unwrap();
    controller.process_events().unwrap();

    let anchor_node = controller.anchor_node(id).expect("anchor node");
    let plane = controller.registries().plane(id).unwrap();
    assert_eq!(plane.name, "verticalPlane0");
    let node = controller.scene().node(plane.node).unwrap();
    assert_eq!(node.parent(), Some(anchor_node));
    assert_vec3_near(
        controller.scene().world_position(anchor_node).unwrap(),
        Vec3::new(3.0, 0.0, 0.0),
    );
}

#[test]
fn removed_anchor_keeps_plane_until_reset() {
    let mut controller = started(idle_session());
    let id = detect_floor(controller.session_mut(), 2.0);
    controller.process_events().unwrap();
    assert!(!controller.coaching().is_active());

    controller.session_mut().remove_anchor(id);
    controller.process_events().unwrap();
    let plane = controller.registries().plane(id).expect("plane kept");
    assert!(controller.scene().is_attached(plane.node));
}

#[test]
fn point_anchors_get_no_plane() {
    let mut controller = started(idle_session());
    let id = controller
        .session_mut()
        .add_point_anchor(glam::Mat4::IDENTITY);
    controller.process_events().unwrap();
    assert!(controller.anchor_node(id).is_some());
    assert!(controller.registries().is_empty());
    assert!(controller.anchor_node(AnchorId(id.0 + 100)).is_none());
}

#[derive(Default)]
struct Recorded {
    failures: Vec<TrackingError>,
    interruptions: usize,
    resumptions: usize,
}

struct Recorder(Rc<RefCell<Recorded>>);

impl SessionObserver for Recorder {
    fn session_failed(&mut self, error: &TrackingError) {
        self.0.borrow_mut().failures.push(error.clone());
    }

    fn session_was_interrupted(&mut self) {
        self.0.borrow_mut().interruptions += 1;
    }

    fn session_interruption_ended(&mut self) {
        self.0.borrow_mut().resumptions += 1;
    }
}

#[test]
fn lifecycle_hooks_reach_observer() {
    let recorded = Rc::new(RefCell::new(Recorded::default()));
    let mut controller: Controller =
        SessionController::new(idle_session(), seeded_rng(4), &PlacementConfig::default())
            .with_observer(Box::new(Recorder(Rc::clone(&recorded))));
    controller.start();
    detect_floor(controller.session_mut(), 4.0);
    controller.process_events().unwrap();

    controller.session_mut().interrupt();
    controller.process_events().unwrap();
    assert!(controller.is_interrupted());
    assert!(controller.coaching().is_active());

    controller.session_mut().end_interruption();
    controller.process_events().unwrap();
    assert!(!controller.coaching().is_active());

    controller.session_mut().fail(TrackingError::Unsupported);
    controller.process_events().unwrap();
    assert!(controller.has_failed());
    assert_eq!(
        controller.handle_tap(center(&controller)).unwrap(),
        TapOutcome::Miss
    );

    controller.reset();
    assert!(!controller.has_failed());

    let recorded = recorded.borrow();
    assert_eq!(recorded.failures, vec![TrackingError::Unsupported]);
    assert_eq!(recorded.interruptions, 1);
    assert_eq!(recorded.resumptions, 1);
}

#[test]
fn interruption_pending_at_reset_still_reaches_observer() {
    let recorded = Rc::new(RefCell::new(Recorded::default()));
    let mut controller: Controller =
        SessionController::new(idle_session(), seeded_rng(4), &PlacementConfig::default())
            .with_observer(Box::new(Recorder(Rc::clone(&recorded))));
    controller.start();
    controller.session_mut().interrupt();

    controller.reset();
    assert_eq!(recorded.borrow().interruptions, 1);
    assert!(!controller.is_interrupted());

    controller.process_events().unwrap();
    assert!(!controller.is_interrupted());
    assert!(controller.coaching().is_active());
}

#[derive(Serialize)]
struct PlacedSnapshot {
    kind: ObjectKind,
    name: String,
    position_mm: Millimeters,
}

#[derive(Serialize)]
struct ResetSnapshot {
    before_reset: arplace_placement::RegistryCounts,
    after_reset: arplace_placement::RegistryCounts,
    planes: Vec<String>,
    objects: Vec<PlacedSnapshot>,
    anchors_removed: bool,
    tracking_reset: bool,
    tracked_raycasts_stopped: bool,
}

#[test]
fn reset_scenario_matches_snapshot() {
    let mut controller = populated();
    controller.handle_tap(NEAR_TAP).unwrap();
    let point = center(&controller);
    controller.handle_tap(point).unwrap();

    let registries = controller.registries();
    let mut planes: Vec<String> = registries
        .planes(PlaneAlignment::Horizontal)
        .chain(registries.planes(PlaneAlignment::Vertical))
        .map(|p| p.name.clone())
        .collect();
    planes.sort();
    let objects = registries
        .boxes()
        .chain(registries.spheres())
        .map(|o| PlacedSnapshot {
            kind: o.kind,
            name: controller
                .scene()
                .node(o.node)
                .and_then(|n| n.name.clone())
                .unwrap_or_default(),
            position_mm: o.position.into(),
        })
        .collect();
    let before_reset = controller.counts();

    controller.reset();
    let options = controller.session().runs().last().unwrap().options;

    let snapshot = ResetSnapshot {
        before_reset,
        after_reset: controller.counts(),
        planes,
        objects,
        anchors_removed: options.contains(RunOptions::REMOVE_EXISTING_ANCHORS),
        tracking_reset: options.contains(RunOptions::RESET_TRACKING),
        tracked_raycasts_stopped: options.contains(RunOptions::STOP_TRACKED_RAYCASTS),
    };
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/snapshots/reset_scenario.json");
    assert_json_snapshot(path, &snapshot).expect("snapshot matches");
}
