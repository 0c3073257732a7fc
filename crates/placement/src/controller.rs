//! Owns the AR session lifecycle and everything placed into the scene.

use crate::coaching::{CoachingGoal, CoachingOverlay, EdgeConstraints};
use crate::config::PlacementConfig;
use crate::factory::ObjectFactory;
use crate::interaction::{InteractionHandler, TapOutcome};
use crate::plane_mesh::PlaneMeshAdapter;
use crate::registry::{Registries, RegistryCounts};
use crate::PlacementError;
use arplace_core::{AnchorId, PlaneAlignment, ScreenPoint};
use arplace_scene::{NodeAction, NodeHandle, SceneError, SceneGraph};
use arplace_tracking::{
    Anchor, RaycastAlignment, RaycastTarget, RunOptions, SessionEvent, TrackedRaycastId, TrackingError,
    TrackingSession, WorldTrackingConfiguration,
};
use rand::Rng;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Hooks for session failures and interruptions.
///
/// Every method defaults to doing nothing; hosts override them to surface
/// messages or recovery UI.
pub trait SessionObserver {
    /// The session stopped with an error.
    fn session_failed(&mut self, _error: &TrackingError) {}
    /// Tracking was suspended.
    fn session_was_interrupted(&mut self) {}
    /// Tracking resumed.
    fn session_interruption_ended(&mut self) {}
}

/// Observer that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SessionObserver for NoopObserver {}

/// Single owner of session state: scene, registries and the tracking session.
pub struct SessionController<S, R> {
    session: S,
    scene: SceneGraph,
    registries: Registries,
    anchor_nodes: BTreeMap<AnchorId, NodeHandle>,
    factory: ObjectFactory<R>,
    planes: PlaneMeshAdapter,
    interaction: InteractionHandler,
    coaching: CoachingOverlay,
    observer: Box<dyn SessionObserver>,
    configuration: WorldTrackingConfiguration,
    started: bool,
    failed: bool,
    interrupted: bool,
}

impl<S: TrackingSession, R: Rng> SessionController<S, R> {
    /// Controller for `session`, coloring objects with `rng`.
    pub fn new(session: S, rng: R, config: &PlacementConfig) -> Self {
        Self {
            session,
            scene: SceneGraph::new(),
            registries: Registries::new(),
            anchor_nodes: BTreeMap::new(),
            factory: ObjectFactory::new(rng),
            planes: PlaneMeshAdapter::new(config),
            interaction: InteractionHandler::new(config),
            coaching: CoachingOverlay::new(),
            observer: Box::new(NoopObserver),
            configuration: WorldTrackingConfiguration::planes_and_light(),
            started: false,
            failed: false,
            interrupted: false,
        }
    }

    /// Replace the failure/interruption observer.
    pub fn with_observer(mut self, observer: Box<dyn SessionObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Start world tracking, enable taps and install the coaching overlay.
    pub fn start(&mut self) {
        if self.started {
            warn!("Session already started; ignoring start request");
            return;
        }
        self.configuration = WorldTrackingConfiguration::planes_and_light();
        self.session.run(self.configuration, RunOptions::empty());
        self.started = true;
        self.coaching
            .install(CoachingGoal::HorizontalPlane, EdgeConstraints::fill_parent());
        info!(config = ?self.configuration, "AR session started");
    }

    /// Whether [`Self::start`] has run.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Whether the session reported a failure since the last (re)start.
    pub fn has_failed(&self) -> bool {
        self.failed
    }

    /// Remove every plane and placed object, then restart tracking from scratch.
    ///
    /// Pending anchor events are discarded since their anchors are about to be
    /// removed; lifecycle events still reach the observer. Does nothing before
    /// [`Self::start`].
    pub fn reset(&mut self) {
        if !self.started {
            warn!("Session not started; ignoring reset request");
            return;
        }
        self.discard_pending_anchor_events();

        let counts = self.registries.counts();
        for node in self.registries.nodes() {
            self.remove_node(node);
        }
        self.registries.clear();
        for node in std::mem::take(&mut self.anchor_nodes).into_values() {
            self.remove_node(node);
        }
        self.planes.reset_counters();

        self.configuration = WorldTrackingConfiguration::planes_and_light();
        self.session.run(self.configuration, RunOptions::full_reset());
        self.interrupted = false;
        self.failed = false;
        self.refresh_coaching();
        info!(?counts, "AR session reset");
    }

    fn discard_pending_anchor_events(&mut self) {
        for event in self.session.poll_events() {
            match event {
                SessionEvent::AnchorAdded(_)
                | SessionEvent::AnchorUpdated(_)
                | SessionEvent::AnchorRemoved(_) => {
                    debug!(?event, "Anchor event dropped by reset");
                }
                lifecycle => self.lifecycle_event(lifecycle),
            }
        }
    }

    fn remove_node(&mut self, node: NodeHandle) {
        match self.scene.run_action(node, NodeAction::RemoveFromParent) {
            Ok(_) => {}
            // Already released together with an ancestor.
            Err(SceneError::UnknownNode(_)) => {}
            Err(err) => warn!(%err, ?node, "Failed to remove node"),
        }
    }

    /// Handle a tap at a view location.
    pub fn handle_tap(&mut self, point: ScreenPoint) -> Result<TapOutcome, PlacementError> {
        if !self.started {
            debug!("Tap before session start ignored");
            return Ok(TapOutcome::Miss);
        }
        self.interaction.handle_tap(
            point,
            &self.session,
            &mut self.scene,
            &mut self.registries,
            &mut self.factory,
        )
    }

    /// Start a tracked estimated-plane raycast through a view location.
    ///
    /// Outstanding tracked raycasts are cancelled by [`Self::reset`].
    pub fn track_point(&mut self, point: ScreenPoint) -> Option<TrackedRaycastId> {
        let query = self.session.raycast_query(
            point,
            RaycastTarget::EstimatedPlane,
            RaycastAlignment::Any,
        )?;
        self.session.start_tracked_raycast(query)
    }

    /// Drain session events and apply them, returning how many were handled.
    pub fn process_events(&mut self) -> Result<usize, PlacementError> {
        let events = self.session.poll_events();
        let handled = events.len();
        for event in events {
            self.apply_event(event)?;
        }
        self.refresh_coaching();
        Ok(handled)
    }

    fn apply_event(&mut self, event: SessionEvent) -> Result<(), PlacementError> {
        match event {
            SessionEvent::AnchorAdded(anchor) => self.anchor_added(&anchor)?,
            SessionEvent::AnchorUpdated(anchor) => self.anchor_updated(&anchor),
            SessionEvent::AnchorRemoved(id) => {
                // Planes are only retired by a full reset.
                debug!(anchor = %id, "Anchor removed; keeping visualisation until reset");
            }
            lifecycle => self.lifecycle_event(lifecycle),
        }
        Ok(())
    }

    fn lifecycle_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Failed(error) => {
                warn!(%error, "AR session failed");
                self.failed = true;
                self.observer.session_failed(&error);
            }
            SessionEvent::Interrupted => {
                warn!("AR session interrupted");
                self.interrupted = true;
                self.observer.session_was_interrupted();
            }
            SessionEvent::InterruptionEnded => {
                info!("AR session interruption ended");
                self.interrupted = false;
                self.observer.session_interruption_ended();
            }
            SessionEvent::AnchorAdded(_)
            | SessionEvent::AnchorUpdated(_)
            | SessionEvent::AnchorRemoved(_) => {}
        }
    }

    fn anchor_added(&mut self, anchor: &Anchor) -> Result<(), PlacementError> {
        let id = anchor.id();
        if self.anchor_nodes.contains_key(&id) {
            debug!(anchor = %id, "Duplicate anchor add ignored");
            return Ok(());
        }
        let node = self.scene.create_node(None);
        if let Some(n) = self.scene.node_mut(node) {
            n.name = Some(id.to_string());
            n.position = anchor.transform().w_axis.truncate();
        }
        self.scene.add_child(self.scene.root(), node)?;
        self.anchor_nodes.insert(id, node);

        self.planes
            .on_plane_added(&mut self.scene, &mut self.registries, anchor, node)?;
        Ok(())
    }

    fn anchor_updated(&mut self, anchor: &Anchor) {
        let Some(&node) = self.anchor_nodes.get(&anchor.id()) else {
            debug!(anchor = %anchor.id(), "Update for unknown anchor ignored");
            return;
        };
        if let Some(n) = self.scene.node_mut(node) {
            n.position = anchor.transform().w_axis.truncate();
        }
        self.planes
            .on_plane_updated(&mut self.scene, &self.registries, anchor, node);
    }

    fn refresh_coaching(&mut self) {
        let counts = self.registries.counts();
        self.coaching.update(
            counts.horizontal_planes,
            self.started && !self.interrupted && !self.failed,
        );
    }

    /// Size of each registry.
    pub fn counts(&self) -> RegistryCounts {
        self.registries.counts()
    }

    /// Plane and object registries.
    pub fn registries(&self) -> &Registries {
        &self.registries
    }

    /// The scene graph.
    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    /// The tracking session.
    pub fn session(&self) -> &S {
        &self.session
    }

    /// Mutable tracking session, e.g. to feed a simulated session.
    pub fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }

    /// The coaching overlay state.
    pub fn coaching(&self) -> &CoachingOverlay {
        &self.coaching
    }

    /// Scene node created for `anchor`.
    pub fn anchor_node(&self, anchor: AnchorId) -> Option<NodeHandle> {
        self.anchor_nodes.get(&anchor).copied()
    }

    /// Whether the session reported an interruption that has not ended.
    pub fn is_interrupted(&self) -> bool {
        self.interrupted
    }

    /// Number of registered planes with `alignment`.
    pub fn plane_count(&self, alignment: PlaneAlignment) -> usize {
        self.registries.planes(alignment).count()
    }
}
