//! In-memory tracking session for headless runs and tests.

use crate::anchor::{Anchor, PlaneAnchor};
use crate::camera::Camera;
use crate::config::{RunOptions, WorldTrackingConfiguration};
use crate::raycast::{RaycastQuery, RaycastResult, RaycastTarget};
use crate::session::{SessionEvent, TrackedRaycastId, TrackingError, TrackingSession};
use arplace_core::{AnchorId, PlaneAlignment};
use glam::{Mat4, Quat, Vec2, Vec3};
use std::collections::{BTreeMap, VecDeque};
use tracing::debug;

/// Unbounded surface inferred from feature points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatedSurface {
    /// Any point on the surface.
    pub point: Vec3,
    /// Surface normal.
    pub normal: Vec3,
    /// Alignment used for raycast filtering.
    pub alignment: PlaneAlignment,
}

impl EstimatedSurface {
    /// Horizontal surface at height `y`.
    pub fn horizontal(y: f32) -> Self {
        Self {
            point: Vec3::new(0.0, y, 0.0),
            normal: Vec3::Y,
            alignment: PlaneAlignment::Horizontal,
        }
    }

    /// Vertical surface through `point` facing along `normal`.
    pub fn vertical(point: Vec3, normal: Vec3) -> Self {
        Self {
            point,
            normal: normal.normalize(),
            alignment: PlaneAlignment::Vertical,
        }
    }
}

/// One call to [`TrackingSession::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunRecord {
    /// Configuration that was applied.
    pub config: WorldTrackingConfiguration,
    /// Options that were applied.
    pub options: RunOptions,
}

/// A deterministic [`TrackingSession`] driven entirely by its owner.
#[derive(Debug, Clone)]
pub struct SimulatedSession {
    camera: Camera,
    initial_camera: Camera,
    configuration: Option<WorldTrackingConfiguration>,
    interrupted: bool,
    planes: BTreeMap<AnchorId, PlaneAnchor>,
    points: BTreeMap<AnchorId, Mat4>,
    estimated: Vec<EstimatedSurface>,
    events: VecDeque<SessionEvent>,
    tracked: BTreeMap<TrackedRaycastId, RaycastQuery>,
    runs: Vec<RunRecord>,
    next_anchor: u64,
    next_tracked: u64,
}

impl SimulatedSession {
    /// Create an idle session viewed through `camera`.
    pub fn new(camera: Camera) -> Self {
        Self {
            initial_camera: camera.clone(),
            camera,
            configuration: None,
            interrupted: false,
            planes: BTreeMap::new(),
            points: BTreeMap::new(),
            estimated: Vec::new(),
            events: VecDeque::new(),
            tracked: BTreeMap::new(),
            runs: Vec::new(),
            next_anchor: 1,
            next_tracked: 1,
        }
    }

    /// Whether `run` has been called and the session is not interrupted.
    pub fn is_running(&self) -> bool {
        self.configuration.is_some() && !self.interrupted
    }

    /// Configuration of the most recent run.
    pub fn configuration(&self) -> Option<&WorldTrackingConfiguration> {
        self.configuration.as_ref()
    }

    /// Every run applied so far, oldest first.
    pub fn runs(&self) -> &[RunRecord] {
        &self.runs
    }

    /// Mutable access to the camera, to simulate device motion.
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Currently tracked plane anchors.
    pub fn planes(&self) -> impl Iterator<Item = &PlaneAnchor> {
        self.planes.values()
    }

    /// Number of anchors of any kind.
    pub fn anchor_count(&self) -> usize {
        self.planes.len() + self.points.len()
    }

    /// Detect a new plane, if the active configuration looks for its alignment.
    pub fn detect_plane(
        &mut self,
        alignment: PlaneAlignment,
        transform: Mat4,
        extent: Vec2,
    ) -> Option<AnchorId> {
        let config = self.configuration.filter(|_| !self.interrupted)?;
        if !config.detects(alignment) {
            debug!(?alignment, "Plane alignment not enabled; ignoring detection");
            return None;
        }
        let id = self.allocate_anchor();
        let plane = PlaneAnchor::new(id, alignment, transform, extent);
        self.events
            .push_back(SessionEvent::AnchorAdded(Anchor::Plane(plane.clone())));
        self.planes.insert(id, plane);
        Some(id)
    }

    /// Refine the estimated extent of a tracked plane.
    pub fn grow_plane(&mut self, id: AnchorId, center: Vec3, extent: Vec2) -> bool {
        let Some(plane) = self.planes.get_mut(&id) else {
            return false;
        };
        plane.set_extent(center, extent);
        self.events
            .push_back(SessionEvent::AnchorUpdated(Anchor::Plane(plane.clone())));
        true
    }

    /// Add a bare pose anchor.
    pub fn add_point_anchor(&mut self, transform: Mat4) -> AnchorId {
        let id = self.allocate_anchor();
        self.points.insert(id, transform);
        self.events
            .push_back(SessionEvent::AnchorAdded(Anchor::Point { id, transform }));
        id
    }

    /// Drop a single anchor, queueing a removal event.
    pub fn remove_anchor(&mut self, id: AnchorId) -> bool {
        let removed = self.planes.remove(&id).is_some() || self.points.remove(&id).is_some();
        if removed {
            self.events.push_back(SessionEvent::AnchorRemoved(id));
        }
        removed
    }

    /// Register a surface that only estimated-plane raycasts can hit.
    pub fn add_estimated_surface(&mut self, surface: EstimatedSurface) {
        self.estimated.push(surface);
    }

    /// Stop the session with `error`.
    pub fn fail(&mut self, error: TrackingError) {
        self.configuration = None;
        self.events.push_back(SessionEvent::Failed(error));
    }

    /// Suspend tracking.
    pub fn interrupt(&mut self) {
        if !self.interrupted {
            self.interrupted = true;
            self.events.push_back(SessionEvent::Interrupted);
        }
    }

    /// Resume tracking after [`Self::interrupt`].
    pub fn end_interruption(&mut self) {
        if self.interrupted {
            self.interrupted = false;
            self.events.push_back(SessionEvent::InterruptionEnded);
        }
    }

    fn allocate_anchor(&mut self) -> AnchorId {
        let id = AnchorId(self.next_anchor);
        self.next_anchor += 1;
        id
    }

    fn raycast_existing(
        &self,
        query: &RaycastQuery,
        config: &WorldTrackingConfiguration,
    ) -> Vec<RaycastResult> {
        self.planes
            .values()
            .filter(|plane| {
                config.detects(plane.alignment) && query.alignment.accepts(plane.alignment)
            })
            .filter_map(|plane| {
                let normal = plane.world_normal();
                let t = query.ray.intersect_plane(plane.world_position(), normal)?;
                let hit = query.ray.at(t);
                let local = plane.transform.inverse().transform_point3(hit);
                if !plane.contains_local(local) {
                    return None;
                }
                let (_, rotation, _) = plane.transform.to_scale_rotation_translation();
                Some(RaycastResult::new(
                    hit,
                    rotation,
                    RaycastTarget::ExistingPlaneGeometry,
                    Some(plane.id),
                    t,
                ))
            })
            .collect()
    }

    fn raycast_estimated(&self, query: &RaycastQuery) -> Vec<RaycastResult> {
        self.estimated
            .iter()
            .filter(|surface| query.alignment.accepts(surface.alignment))
            .filter_map(|surface| {
                let t = query.ray.intersect_plane(surface.point, surface.normal)?;
                let rotation = Quat::from_rotation_arc(Vec3::Y, surface.normal);
                Some(RaycastResult::new(
                    query.ray.at(t),
                    rotation,
                    RaycastTarget::EstimatedPlane,
                    None,
                    t,
                ))
            })
            .collect()
    }
}

impl TrackingSession for SimulatedSession {
    fn run(&mut self, config: WorldTrackingConfiguration, options: RunOptions) {
        if options.contains(RunOptions::REMOVE_EXISTING_ANCHORS) {
            let ids: Vec<AnchorId> = self
                .planes
                .keys()
                .chain(self.points.keys())
                .copied()
                .collect();
            self.planes.clear();
            self.points.clear();
            // Queued adds and updates would otherwise outlive their anchors.
            self.events.retain(|event| match event {
                SessionEvent::AnchorAdded(anchor) | SessionEvent::AnchorUpdated(anchor) => {
                    !ids.contains(&anchor.id())
                }
                _ => true,
            });
            self.events
                .extend(ids.into_iter().map(SessionEvent::AnchorRemoved));
        }
        if options.contains(RunOptions::RESET_TRACKING) {
            self.camera = self.initial_camera.clone();
            self.estimated.clear();
        }
        if options.contains(RunOptions::STOP_TRACKED_RAYCASTS) {
            self.tracked.clear();
        }
        debug!(?config, ?options, "Running simulated session");
        self.configuration = Some(config);
        self.interrupted = false;
        self.runs.push(RunRecord { config, options });
    }

    fn camera(&self) -> &Camera {
        &self.camera
    }

    fn raycast(&self, query: &RaycastQuery) -> Vec<RaycastResult> {
        let Some(config) = self.configuration.filter(|_| !self.interrupted) else {
            return Vec::new();
        };
        let mut hits = match query.target {
            RaycastTarget::ExistingPlaneGeometry => self.raycast_existing(query, &config),
            RaycastTarget::EstimatedPlane => self.raycast_estimated(query),
        };
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    fn poll_events(&mut self) -> Vec<SessionEvent> {
        self.events.drain(..).collect()
    }

    fn start_tracked_raycast(&mut self, query: RaycastQuery) -> Option<TrackedRaycastId> {
        if !self.is_running() {
            return None;
        }
        let id = TrackedRaycastId(self.next_tracked);
        self.next_tracked += 1;
        self.tracked.insert(id, query);
        Some(id)
    }

    fn tracked_raycast_count(&self) -> usize {
        self.tracked.len()
    }
}
